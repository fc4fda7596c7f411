//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use argdesigner_core::{
    semantics::{
        ExtensionRequest, FilterRequest, GradualRequest, SemanticsService, ServiceResponse,
    },
    DesignerError,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A semantics service answering every request with canned results.
///
/// Requests are recorded so tests can assert on what the session sent.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockSemantics {
    pub labelings: Vec<&'static str>,
    pub strengths: Vec<&'static str>,
    pub filtered: Vec<Vec<&'static str>>,
    pub error: Option<&'static str>,
    pub extension_requests: Mutex<Vec<ExtensionRequest>>,
    pub gradual_requests: Mutex<Vec<GradualRequest>>,
    pub filter_requests: Mutex<Vec<FilterRequest>>,
}

impl MockSemantics {
    fn respond(&self, results: Value) -> ServiceResponse {
        match self.error {
            Some(message) => ServiceResponse::error(message),
            None => ServiceResponse::results(results),
        }
    }
}

#[async_trait]
impl SemanticsService for MockSemantics {
    async fn compute_extensions(
        &self,
        request: ExtensionRequest,
    ) -> Result<ServiceResponse, DesignerError> {
        self.extension_requests.lock().unwrap().push(request);
        Ok(self.respond(json!(self.labelings)))
    }

    async fn compute_strengths(
        &self,
        request: GradualRequest,
    ) -> Result<ServiceResponse, DesignerError> {
        self.gradual_requests.lock().unwrap().push(request);
        Ok(self.respond(json!(self.strengths)))
    }

    async fn filter_labelings(
        &self,
        request: FilterRequest,
    ) -> Result<ServiceResponse, DesignerError> {
        self.filter_requests.lock().unwrap().push(request);
        Ok(self.respond(json!(self.filtered)))
    }
}
