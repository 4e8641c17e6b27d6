use tracing::{debug, trace};

use crate::api::component::RenderContext;
use crate::api::refresh::{RefreshRequest, RefreshSignal, SubscriptionId};
use crate::core::ComponentId;
use crate::error::{ChartError, ChartResult};

/// Participant in a data source's traversal.
pub trait DataSourceRenderer<T> {
    /// Name of the data source this renderer draws from.
    fn data_source_name(&self) -> &str;

    /// Starts a pass. `None` opts out of this pass (nothing is traversed for
    /// this renderer, and its postamble is not called).
    fn preamble<'a>(&'a mut self, ctx: &mut RenderContext<'_>) -> Option<Box<dyn RenderPass<T> + 'a>>;
}

/// Per-pass state returned from [`DataSourceRenderer::preamble`].
pub trait RenderPass<T> {
    fn render(&mut self, ctx: &mut RenderContext<'_>, index: usize, item: &T);

    /// Called once every item was traversed by every pass.
    fn render_complete(&mut self, ctx: &mut RenderContext<'_>);

    /// Commits the pass; runs after the owner's completion hook.
    fn postamble(self: Box<Self>, ctx: &mut RenderContext<'_>);
}

/// Owner callback between the completion barrier and the postambles.
pub trait RenderCompleteHook {
    fn after_render_complete(&mut self, source: &str, ctx: &mut RenderContext<'_>);
}

impl<F> RenderCompleteHook for F
where
    F: FnMut(&str, &mut RenderContext<'_>),
{
    fn after_render_complete(&mut self, source: &str, ctx: &mut RenderContext<'_>) {
        self(source, ctx);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceState {
    Clean,
    Dirty,
    Rendering,
}

/// Named item collection traversed once per render pass for all its
/// renderers.
#[derive(Debug)]
pub struct DataSource<T> {
    name: String,
    items: Option<Vec<T>>,
    renderers: Vec<ComponentId>,
    state: DataSourceState,
    refresh: RefreshSignal,
}

impl<T> DataSource<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: None,
            renderers: Vec::new(),
            state: DataSourceState::Dirty,
            refresh: RefreshSignal::new(),
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<T>) -> Self {
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn items(&self) -> Option<&[T]> {
        self.items.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> DataSourceState {
        self.state
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state == DataSourceState::Dirty
    }

    /// Dirty with something to traverse and someone to traverse it for.
    #[must_use]
    pub fn has_pending_render(&self) -> bool {
        self.is_dirty() && self.items.is_some() && !self.renderers.is_empty()
    }

    #[must_use]
    pub fn renderers(&self) -> &[ComponentId] {
        &self.renderers
    }

    pub fn set_items(&mut self, items: Option<Vec<T>>) {
        self.items = items;
        self.refresh();
    }

    /// Mutates the collection in place; any mutation counts as a change.
    pub fn update_items(&mut self, update: impl FnOnce(&mut Vec<T>)) {
        update(self.items.get_or_insert_with(Vec::new));
        self.refresh();
    }

    pub fn push_item(&mut self, item: T) {
        self.items.get_or_insert_with(Vec::new).push(item);
        self.refresh();
    }

    pub fn register(&mut self, renderer: ComponentId) -> ChartResult<()> {
        if self.renderers.contains(&renderer) {
            return Err(ChartError::InvalidData(format!(
                "{renderer} is already registered with data source `{}`",
                self.name
            )));
        }
        self.renderers.push(renderer);
        trace!(source = %self.name, renderer = renderer.raw(), "renderer registered");
        Ok(())
    }

    /// Returns `false` when `renderer` was not registered.
    pub fn unregister(&mut self, renderer: ComponentId) -> bool {
        let before = self.renderers.len();
        self.renderers.retain(|registered| *registered != renderer);
        self.renderers.len() != before
    }

    /// Marks the source dirty and notifies refresh subscribers.
    pub fn refresh(&mut self) {
        self.state = DataSourceState::Dirty;
        self.refresh
            .raise(&RefreshRequest::DataSource(self.name.clone()));
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.state = DataSourceState::Dirty;
    }

    pub fn on_refresh_request(
        &mut self,
        listener: impl FnMut(&RefreshRequest) + 'static,
    ) -> SubscriptionId {
        self.refresh.subscribe(listener)
    }

    pub fn remove_refresh_listener(&mut self, id: SubscriptionId) -> bool {
        self.refresh.unsubscribe(id)
    }

    /// Runs one coordinated traversal for `renderers`, given in registration
    /// order.
    ///
    /// Returns `true` when a pass ran. Items are visited exactly once; every
    /// pass sees `render_complete` only after the last item, and `hook` runs
    /// before any postamble.
    pub fn render(
        &mut self,
        renderers: &mut [&mut dyn DataSourceRenderer<T>],
        ctx: &mut RenderContext<'_>,
        hook: &mut dyn RenderCompleteHook,
    ) -> bool {
        if self.state != DataSourceState::Dirty {
            return false;
        }
        let Some(items) = self.items.as_deref() else {
            trace!(source = %self.name, "render skipped: no items");
            return false;
        };
        if renderers.is_empty() {
            trace!(source = %self.name, "render skipped: no renderers");
            return false;
        }

        self.state = DataSourceState::Rendering;
        let mut passes: Vec<Box<dyn RenderPass<T> + '_>> = Vec::with_capacity(renderers.len());
        for renderer in renderers.iter_mut() {
            if let Some(pass) = renderer.preamble(ctx) {
                passes.push(pass);
            }
        }

        if !passes.is_empty() {
            for (index, item) in items.iter().enumerate() {
                for pass in &mut passes {
                    pass.render(ctx, index, item);
                }
            }
            for pass in &mut passes {
                pass.render_complete(ctx);
            }
        }
        hook.after_render_complete(&self.name, ctx);
        let pass_count = passes.len();
        for pass in passes {
            pass.postamble(ctx);
        }

        self.state = DataSourceState::Clean;
        debug!(
            source = %self.name,
            items = items.len(),
            passes = pass_count,
            "data source rendered"
        );
        true
    }
}
