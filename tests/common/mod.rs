//! Common test utilities for yql-rs integration tests.
//!
//! # Scripted transport
//!
//! Most integration tests run against [`ScriptedTransport`], an in-memory
//! `HttpTransport` that answers requests from a queue of canned responses and
//! records every request it receives. This drives the whole
//! Driver → Connection → Statement → Cursor chain without network access.
//!
//! # Live service
//!
//! Tests marked `#[ignore]` talk to the real service. They read the
//! connection descriptor from the environment:
//!
//! | Environment Variable | Default Value                              |
//! |----------------------|--------------------------------------------|
//! | `YQL_DESCRIPTOR`     | "store://datatables.org/alltableswithkeys" |
//!
//! ```bash
//! cargo test --test integration_tests -- --ignored
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex};
use yql_rs::connection::StaticPinProvider;
use yql_rs::error::TransportError;
use yql_rs::transport::{HttpRequest, HttpResponse, HttpTransport};
use yql_rs::Driver;

// ============================================================================
// Live Service Configuration
// ============================================================================

/// Default descriptor for live tests.
pub const DEFAULT_DESCRIPTOR: &str = "store://datatables.org/alltableswithkeys";

/// Environment variable name for overriding the descriptor.
const ENV_YQL_DESCRIPTOR: &str = "YQL_DESCRIPTOR";

/// Get the live-test descriptor from environment or use default.
pub fn get_descriptor() -> String {
    env::var(ENV_YQL_DESCRIPTOR).unwrap_or_else(|_| DEFAULT_DESCRIPTOR.to_string())
}

// ============================================================================
// Scripted Transport
// ============================================================================

/// In-memory transport answering from a queue of responses.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Create a transport with no scripted responses.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response with the given status and body.
    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of scripted responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::RequestFailed(format!(
                "no scripted response for {}",
                request.base_url
            )))
        })
    }
}

/// Build a driver over `transport` whose secure-mode PIN is `pin`.
pub fn scripted_driver(transport: &Arc<ScriptedTransport>, pin: &str) -> Driver {
    let transport: Arc<dyn HttpTransport> = transport.clone();
    Driver::new(transport).with_pin_provider(Arc::new(StaticPinProvider::new(pin)))
}

/// Script the two successful token exchange responses of secure mode.
pub fn script_token_exchange(transport: &ScriptedTransport) {
    transport.respond(
        200,
        "oauth_token=request-token&oauth_token_secret=request-secret&oauth_expires_in=3600",
    );
    transport.respond(
        200,
        "oauth_token=access-token&oauth_token_secret=access-secret&oauth_session_handle=h",
    );
}
