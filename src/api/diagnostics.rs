use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One configuration problem found while a component prepared to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartValidationResult {
    /// Name of the reporting component.
    pub source: String,
    pub message: String,
    /// Configuration members involved, e.g. `["value_axis", "value_axis_name"]`.
    pub members: Vec<String>,
}

impl ChartValidationResult {
    #[must_use]
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for ChartValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)?;
        if !self.members.is_empty() {
            write!(f, " [{}]", self.members.join(", "))?;
        }
        Ok(())
    }
}

/// Sink for configuration problems; components never panic on them.
pub trait ErrorReporter {
    fn report(&mut self, result: ChartValidationResult);
}

/// Default reporter owned by the chart.
///
/// Keeps each distinct problem once (components re-report on every pass) and
/// logs it the first time it is seen.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    results: Vec<ChartValidationResult>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn results(&self) -> &[ChartValidationResult] {
        &self.results
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn for_source<'a>(
        &'a self,
        source: &'a str,
    ) -> impl Iterator<Item = &'a ChartValidationResult> + 'a {
        self.results
            .iter()
            .filter(move |result| result.source == source)
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

impl ErrorReporter for Diagnostics {
    fn report(&mut self, result: ChartValidationResult) {
        if self.results.contains(&result) {
            return;
        }
        warn!(
            component = %result.source,
            members = ?result.members,
            "{}",
            result.message
        );
        self.results.push(result);
    }
}
