//! Timing and error telemetry around arbitrary operations
//!
//! [`Interceptor`] wraps a callable with a label and records how it went:
//! one histogram observation on success, one error increment on failure.
//! The wrapped result or error is always handed back untouched. Decorators
//! for the metadata store, the blob store and the HTTP boundary are built on
//! top of it.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::core::metrics::Metrics;

/// Call site family an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Database,
    Storage,
    Http,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::Database => "database",
            Boundary::Storage => "storage",
            Boundary::Http => "http",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(component, operation)` pair identifying one instrumented call site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationLabel {
    pub boundary: Boundary,
    pub component: Cow<'static, str>,
    pub operation: Cow<'static, str>,
}

impl OperationLabel {
    pub fn new(
        boundary: Boundary,
        component: impl Into<Cow<'static, str>>,
        operation: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            boundary,
            component: component.into(),
            operation: operation.into(),
        }
    }

    /// Label for `operation` on the type `T`, named after the type itself
    pub fn for_type<T: ?Sized>(boundary: Boundary, operation: &'static str) -> Self {
        Self::new(boundary, short_type_name::<T>(), operation)
    }

    pub(crate) fn values(&self) -> [&str; 3] {
        [
            self.boundary.as_str(),
            self.component.as_ref(),
            self.operation.as_ref(),
        ]
    }
}

impl fmt::Display for OperationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.component, self.operation)
    }
}

/// Last path segment of a type name, without generic arguments
///
/// `crate::modules::storage::S3Client` becomes `S3Client` and
/// `InstrumentedBlobStore<S3Client>` becomes `InstrumentedBlobStore`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[derive(Clone)]
pub struct Interceptor {
    metrics: Arc<Metrics>,
}

impl Interceptor {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Run `operation` and record its outcome under `label`
    pub async fn intercept<T, E, F, Fut>(&self, label: &OperationLabel, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        info!(boundary = %label.boundary, "{} operation: {}", label.boundary, label);

        let start = Instant::now();
        match operation().await {
            Ok(value) => {
                let elapsed = start.elapsed();
                self.metrics.observe_duration(label, elapsed);
                info!(
                    boundary = %label.boundary,
                    "{} operation: {} completed in {} ms",
                    label.boundary,
                    label,
                    elapsed.as_millis()
                );
                Ok(value)
            }
            Err(e) => {
                self.metrics.record_error(label);
                error!(
                    boundary = %label.boundary,
                    "{} operation: {} failed: {}",
                    label.boundary,
                    label,
                    e
                );
                Err(e)
            }
        }
    }

    /// Like [`Interceptor::intercept`], counting the inbound call first
    ///
    /// The call counter is bumped before the outcome is known so request
    /// rate stays independent of latency and failures.
    pub async fn intercept_request<T, E, F, Fut>(
        &self,
        method: &str,
        path: &str,
        label: &OperationLabel,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.metrics.record_request(method, path);
        self.intercept(label, operation).await
    }
}
