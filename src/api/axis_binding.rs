use crate::api::diagnostics::{ChartValidationResult, ErrorReporter};
use crate::core::{AxisId, AxisSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    Value,
    Category,
}

impl AxisRole {
    fn label(self) -> &'static str {
        match self {
            Self::Value => "Value",
            Self::Category => "Category",
        }
    }

    fn members(self) -> [&'static str; 2] {
        match self {
            Self::Value => ["value_axis", "value_axis_name"],
            Self::Category => ["category_axis", "category_axis_name"],
        }
    }
}

/// Named reference from a component to one of the chart's axes.
///
/// Resolution happens lazily before every pass; a failure is reported and the
/// binding stays unresolved so the component can skip its work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisBinding {
    role: AxisRole,
    name: Option<String>,
    resolved: Option<AxisId>,
}

impl AxisBinding {
    #[must_use]
    pub fn new(role: AxisRole) -> Self {
        Self {
            role,
            name: None,
            resolved: None,
        }
    }

    #[must_use]
    pub fn named(role: AxisRole, name: impl Into<String>) -> Self {
        Self {
            role,
            name: Some(name.into()),
            resolved: None,
        }
    }

    #[must_use]
    pub fn role(&self) -> AxisRole {
        self.role
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn resolved(&self) -> Option<AxisId> {
        self.resolved
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
        self.resolved = None;
    }

    pub fn clear(&mut self) {
        self.resolved = None;
    }

    /// Resolves the axis by name without reporting; used before the pass that
    /// reports through [`AxisBinding::ensure`].
    pub fn lookup(&mut self, axes: &AxisSet) -> Option<AxisId> {
        if self.resolved.is_none() {
            self.resolved = self.name.as_deref().and_then(|name| axes.find(name));
        }
        self.resolved
    }

    /// Resolves the axis by name, reporting a problem on failure.
    pub fn ensure(
        &mut self,
        axes: &AxisSet,
        errors: &mut dyn ErrorReporter,
        component: &str,
    ) -> Option<AxisId> {
        if let Some(id) = self.resolved {
            return Some(id);
        }
        let Some(name) = self.name.as_deref() else {
            errors.report(
                ChartValidationResult::new(
                    component,
                    format!("{} axis name is not set", self.role.label()),
                )
                .with_members(self.role.members()),
            );
            return None;
        };
        match axes.find(name) {
            Some(id) => {
                self.resolved = Some(id);
                Some(id)
            }
            None => {
                errors.report(
                    ChartValidationResult::new(
                        component,
                        format!("{} axis '{name}' was not found", self.role.label()),
                    )
                    .with_members(self.role.members()),
                );
                None
            }
        }
    }
}
