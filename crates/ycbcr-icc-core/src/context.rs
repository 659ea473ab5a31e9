//! Build context
//!
//! Every construction call receives a [`BuildContext`]. It carries an
//! identifier for the build pass and a [`LogSink`] that observes numeric
//! faults as they happen. Reporting never changes control flow: the error
//! that triggered the report is still returned to the caller.

use crate::error::ConstructionError;

/// Receiver for informational faults raised during a build
pub trait LogSink: Send + Sync {
    /// `context` is the build identifier, `code` one of [`ConstructionError::code`]
    fn log(&self, context: u64, code: u32, message: &str);
}

/// Default sink: forwards every report to `tracing` at WARN level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, context: u64, code: u32, message: &str) {
        tracing::warn!(context, code, "{message}");
    }
}

/// State shared by all construction calls of one build pass
pub struct BuildContext {
    id: u64,
    sink: Box<dyn LogSink>,
}

impl BuildContext {
    /// Create a context reporting through [`TracingSink`]
    pub fn new(id: u64) -> Self {
        Self::with_sink(id, TracingSink)
    }

    /// Create a context with a caller-supplied sink
    pub fn with_sink(id: u64, sink: impl LogSink + 'static) -> Self {
        Self {
            id,
            sink: Box::new(sink),
        }
    }

    /// Identifier of this build pass
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Forward a construction failure to the sink
    pub fn report(&self, err: &ConstructionError) {
        self.sink.log(self.id, err.code(), &err.to_string());
    }

    /// Pass `result` through, reporting it first if it failed
    pub fn check<T>(&self, result: Result<T, ConstructionError>) -> Result<T, ConstructionError> {
        result.inspect_err(|err| self.report(err))
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext").field("id", &self.id).finish_non_exhaustive()
    }
}
