//! Observer hooks for read-side events.
//!
//! [`crate::CsvReader`] reports every row-shape warning and structural failure
//! to an optional [`ReadObserver`]. Implementors can record metrics, logs, or
//! trigger alerts without the reader taking a logging dependency.

use std::fmt;
use std::sync::Arc;

use crate::error::CsvError;
use crate::record::CsvWarning;

/// Severity classification for observer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadSeverity {
    /// Informational event.
    Info,
    /// Non-fatal row-shape mismatch (padded/truncated).
    Warning,
    /// The current read failed (structural parse error, bad value).
    Error,
    /// Infrastructure failure (I/O, charset).
    Critical,
}

/// Context about the read session an event belongs to.
#[derive(Debug, Clone)]
pub struct ReadContext {
    /// Short description of the source (path, `"<memory>"`, `"<reader>"`).
    pub source: String,
    /// 1-based line the event was observed at.
    pub line: u64,
}

/// Observer interface for read-side outcomes.
pub trait ReadObserver: Send + Sync {
    /// Called for every row-shape warning the reader records.
    fn on_warning(&self, _ctx: &ReadContext, _warning: &CsvWarning) {}

    /// Called when a read fails.
    fn on_error(&self, _ctx: &ReadContext, _severity: ReadSeverity, _error: &CsvError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReadObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ReadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ReadObserver for CompositeObserver {
    fn on_warning(&self, ctx: &ReadContext, warning: &CsvWarning) {
        for o in &self.observers {
            o.on_warning(ctx, warning);
        }
    }

    fn on_error(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CsvError) {
        for o in &self.observers {
            o.on_error(ctx, severity, error);
        }
    }
}

/// Logs read events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReadObserver for StdErrObserver {
    fn on_warning(&self, ctx: &ReadContext, warning: &CsvWarning) {
        eprintln!(
            "[csv][warn] source={} line={} kind={:?} {}",
            ctx.source, warning.line, warning.kind, warning.message
        );
    }

    fn on_error(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CsvError) {
        eprintln!(
            "[csv][{:?}] source={} line={} err={}",
            severity, ctx.source, ctx.line, error
        );
    }
}

pub(crate) fn severity_for_error(e: &CsvError) -> ReadSeverity {
    match e {
        CsvError::Io(_) | CsvError::Charset { .. } => ReadSeverity::Critical,
        CsvError::Parse { .. }
        | CsvError::Config { .. }
        | CsvError::Header { .. }
        | CsvError::Value(_) => ReadSeverity::Error,
    }
}
