use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::api::chart_config::ChartConfig;
use crate::api::component::{
    ChartComponent, EnterLeaveContext, RenderContext, RenderStage, TransformContext,
};
use crate::api::data_source::{DataSource, DataSourceRenderer};
use crate::api::diagnostics::{ChartValidationResult, Diagnostics, ErrorReporter};
use crate::api::legend::Legend;
use crate::core::{
    Axis, AxisId, AxisSet, ComponentId, LayoutContext, LayoutOutcome, Rect, Size,
};
use crate::error::{ChartError, ChartResult};
use crate::render::VisualSurface;

/// Outcome of one [`Chart::refresh`] cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// `true` when the render phase ran (something was dirty).
    pub rendered: bool,
    pub series_area: Rect,
}

/// Capability registry driving layout, render and transforms for a set of
/// axes, data sources and components.
pub struct Chart<T, S: VisualSurface> {
    config: ChartConfig,
    surface: S,
    axes: AxisSet,
    components: IndexMap<ComponentId, Box<dyn ChartComponent<T>>>,
    data_sources: IndexMap<String, DataSource<T>>,
    diagnostics: Diagnostics,
    layout: Option<LayoutOutcome>,
    next_id: u32,
    needs_full_render: bool,
}

impl<T: 'static, S: VisualSurface> Chart<T, S> {
    pub fn new(surface: S, config: ChartConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            surface,
            axes: AxisSet::new(),
            components: IndexMap::new(),
            data_sources: IndexMap::new(),
            diagnostics: Diagnostics::new(),
            layout: None,
            next_id: 0,
            needs_full_render: true,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    #[must_use]
    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.by_name(name)
    }

    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[must_use]
    pub fn layout(&self) -> Option<&LayoutOutcome> {
        self.layout.as_ref()
    }

    pub fn add_axis(&mut self, axis: Axis) -> ChartResult<AxisId> {
        let id = self.axes.insert(axis)?;
        self.needs_full_render = true;
        Ok(id)
    }

    pub fn add_value_axis(&mut self, name: impl Into<String>) -> ChartResult<AxisId> {
        self.add_axis(Axis::value(name).with_max_ticks(self.config.max_ticks))
    }

    pub fn add_category_axis(&mut self, name: impl Into<String>) -> ChartResult<AxisId> {
        self.add_axis(Axis::category(name).with_max_ticks(self.config.max_ticks))
    }

    /// Adds a data source and registers every existing renderer naming it.
    pub fn add_data_source(&mut self, mut source: DataSource<T>) -> ChartResult<()> {
        if source.name().is_empty() {
            return Err(ChartError::InvalidConfig(
                "data source name must not be empty".to_owned(),
            ));
        }
        if self.data_sources.contains_key(source.name()) {
            return Err(ChartError::DuplicateName(source.name().to_owned()));
        }
        for (id, component) in &mut self.components {
            let Some(renderer) = component.as_data_source_renderer() else {
                continue;
            };
            if renderer.data_source_name() == source.name() {
                source.register(*id)?;
            }
        }
        debug!(source = %source.name(), renderers = source.renderers().len(), "data source added");
        self.data_sources.insert(source.name().to_owned(), source);
        self.needs_full_render = true;
        Ok(())
    }

    #[must_use]
    pub fn data_source(&self, name: &str) -> Option<&DataSource<T>> {
        self.data_sources.get(name)
    }

    pub fn data_source_mut(&mut self, name: &str) -> Option<&mut DataSource<T>> {
        self.data_sources.get_mut(name)
    }

    pub fn add_component<C>(&mut self, component: C) -> ChartResult<ComponentId>
    where
        C: ChartComponent<T> + 'static,
    {
        self.add_boxed_component(Box::new(component))
    }

    pub fn add_boxed_component(
        &mut self,
        mut component: Box<dyn ChartComponent<T>>,
    ) -> ChartResult<ComponentId> {
        let name = component.name().to_owned();
        if name.is_empty() {
            return Err(ChartError::InvalidConfig(
                "component name must not be empty".to_owned(),
            ));
        }
        if self.component_id(&name).is_some() {
            return Err(ChartError::DuplicateName(name));
        }

        self.next_id += 1;
        let id = ComponentId::new(self.next_id);

        if let Some(hooks) = component.as_enter_leave() {
            let mut ctx = EnterLeaveContext {
                config: &self.config,
                axes: &self.axes,
                surface: &mut self.surface,
                errors: &mut self.diagnostics,
            };
            hooks.enter(&mut ctx);
        }

        if let Some(renderer) = component.as_data_source_renderer() {
            let source_name = renderer.data_source_name().to_owned();
            match self.data_sources.get_mut(&source_name) {
                Some(source) => source.register(id)?,
                None => self.diagnostics.report(
                    ChartValidationResult::new(
                        name.clone(),
                        format!("data source '{source_name}' was not found"),
                    )
                    .with_members(["data_source_name"]),
                ),
            }
        }

        debug!(component = %name, id = id.raw(), "component added");
        self.components.insert(id, component);
        self.needs_full_render = true;
        Ok(id)
    }

    /// Detaches a component; returns it so the caller can re-add or inspect it.
    pub fn remove_component(&mut self, id: ComponentId) -> ChartResult<Box<dyn ChartComponent<T>>> {
        let mut component = self
            .components
            .shift_remove(&id)
            .ok_or(ChartError::UnknownComponent(id))?;

        for source in self.data_sources.values_mut() {
            source.unregister(id);
        }
        if let Some(hooks) = component.as_enter_leave() {
            let mut ctx = EnterLeaveContext {
                config: &self.config,
                axes: &self.axes,
                surface: &mut self.surface,
                errors: &mut self.diagnostics,
            };
            hooks.leave(&mut ctx);
        }

        debug!(component = %component.name(), id = id.raw(), "component removed");
        self.needs_full_render = true;
        Ok(component)
    }

    #[must_use]
    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .find(|(_, component)| component.name() == name)
            .map(|(id, _)| *id)
    }

    /// Concrete access to a registered component, e.g. to move a rule.
    pub fn component_mut<C: 'static>(&mut self, name: &str) -> Option<&mut C> {
        self.components
            .values_mut()
            .find(|component| component.name() == name)
            .and_then(|component| component.as_any_mut().downcast_mut::<C>())
    }

    /// Legend entries of every component that provides one, in declaration
    /// order.
    #[must_use]
    pub fn legend_items(&self) -> Vec<Legend> {
        self.components
            .values()
            .filter_map(|component| component.legend())
            .collect()
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.needs_full_render
            || self
                .data_sources
                .values()
                .any(DataSource::has_pending_render)
            || self.components.values().any(|component| component.needs_render())
    }

    /// Forces the next refresh to re-run the render phase.
    pub fn invalidate(&mut self) {
        self.needs_full_render = true;
    }

    /// Runs one cycle: layout, render when something is dirty, then transforms.
    pub fn refresh(&mut self, dimensions: Size) -> ChartResult<CycleReport> {
        let outcome = self.run_layout(dimensions)?;

        let rendered = self.needs_render();
        if rendered {
            self.run_render(&outcome);
            self.needs_full_render = false;
        }

        self.run_transforms(&outcome);
        let series_area = outcome.series_area;
        self.layout = Some(outcome);
        trace!(rendered, "refresh cycle complete");
        Ok(CycleReport {
            rendered,
            series_area,
        })
    }

    fn run_layout(&mut self, dimensions: Size) -> ChartResult<LayoutOutcome> {
        let mut ctx = LayoutContext::new(dimensions)?;
        for (id, component) in &mut self.components {
            if let Some(layout) = component.as_layout() {
                layout.layout(*id, &mut ctx, &self.axes)?;
            }
        }
        Ok(ctx.finalize())
    }

    fn run_render(&mut self, outcome: &LayoutOutcome) {
        let Self {
            axes,
            components,
            data_sources,
            surface,
            diagnostics,
            ..
        } = self;

        axes.reset_all();
        let extents: Vec<(String, f64, f64)> = components
            .values()
            .flat_map(|component| {
                let value = component
                    .value_extents()
                    .map(|extent| (extent.axis_name, extent.minimum, extent.maximum));
                let category = component
                    .category_extents()
                    .map(|extent| (extent.axis_name, extent.minimum, extent.maximum));
                value.into_iter().chain(category)
            })
            .collect();

        {
            let mut renderers: HashMap<ComponentId, &mut dyn DataSourceRenderer<T>> = components
                .iter_mut()
                .filter_map(|(id, component)| {
                    component
                        .as_data_source_renderer()
                        .map(|renderer| (*id, renderer))
                })
                .collect();

            let mut hook = |_source: &str, ctx: &mut RenderContext<'_>| {
                apply_extents(&extents, ctx.axes);
            };
            for source in data_sources.values_mut() {
                source.mark_dirty();
                let mut ordered: Vec<&mut dyn DataSourceRenderer<T>> = source
                    .renderers()
                    .iter()
                    .filter_map(|id| renderers.remove(id))
                    .collect();
                let mut ctx = RenderContext {
                    dimensions: outcome.dimensions,
                    area: outcome.series_area,
                    series_area: outcome.series_area,
                    axes: &mut *axes,
                    surface: &mut *surface,
                    errors: &mut *diagnostics,
                };
                source.render(&mut ordered, &mut ctx, &mut hook);
            }
        }
        apply_extents(&extents, axes);

        for stage in [RenderStage::Geometry, RenderStage::Axes] {
            for (id, component) in components.iter_mut() {
                let Some(renderer) = component.as_render() else {
                    continue;
                };
                if renderer.render_stage() != stage {
                    continue;
                }
                let mut ctx = RenderContext {
                    dimensions: outcome.dimensions,
                    area: outcome.area_for(*id),
                    series_area: outcome.series_area,
                    axes: &mut *axes,
                    surface: &mut *surface,
                    errors: &mut *diagnostics,
                };
                renderer.render(&mut ctx);
            }
        }
        debug!(
            components = components.len(),
            sources = data_sources.len(),
            "render pass complete"
        );
    }

    fn run_transforms(&mut self, outcome: &LayoutOutcome) {
        for (id, component) in &mut self.components {
            let Some(transforms) = component.as_transforms() else {
                continue;
            };
            let mut ctx = TransformContext {
                dimensions: outcome.dimensions,
                area: outcome.area_for(*id),
                series_area: outcome.series_area,
                axes: &self.axes,
                surface: &mut self.surface,
            };
            transforms.transforms(&mut ctx);
        }
    }
}

/// Folds `(axis name, minimum, maximum)` extents into the named axes.
fn apply_extents(extents: &[(String, f64, f64)], axes: &mut AxisSet) {
    for (axis_name, minimum, maximum) in extents {
        if let Some(axis) = axes.by_name_mut(axis_name) {
            axis.update_limits(*minimum);
            axis.update_limits(*maximum);
        }
    }
}
