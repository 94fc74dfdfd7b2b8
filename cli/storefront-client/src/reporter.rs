//! Observing failed requests.
//!
//! Every client operation hands its error to an [`ErrorReporter`] before
//! returning or swallowing it.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use derive_more::Display;

use crate::error::{StorefrontClientError, display_chain};

/// The client operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    #[display("list products")]
    ListProducts,
    #[display("create product")]
    CreateProduct,
    #[display("update product")]
    UpdateProduct,
    #[display("delete product")]
    DeleteProduct,
    #[display("list categories")]
    ListCategories,
}

pub trait ErrorReporter: Send + Sync + Debug {
    fn report(&self, operation: Operation, error: &StorefrontClientError);
}

/// Report errors as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, operation: Operation, error: &StorefrontClientError) {
        tracing::error!(
            %operation,
            status = error.status().map(|status| status.as_u16()),
            "{}",
            display_chain(error)
        );
    }
}

/// Keep every reported error in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<(Operation, String)>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reported operations with their formatted errors, oldest first.
    pub fn reports(&self) -> Vec<(Operation, String)> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, operation: Operation, error: &StorefrontClientError) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((operation, display_chain(error)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_reporter_shares_reports_between_clones() {
        let reporter = RecordingReporter::new();
        let clone = reporter.clone();

        clone.report(
            Operation::DeleteProduct,
            &StorefrontClientError::Other("gone".to_string()),
        );

        assert_eq!(reporter.reports(), vec![(
            Operation::DeleteProduct,
            "gone".to_string()
        )]);
    }

    #[test]
    fn operations_display_as_phrases() {
        assert_eq!(Operation::ListCategories.to_string(), "list categories");
    }
}
