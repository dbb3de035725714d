//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Replays queued outcomes in order and records every request it receives.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.respond_raw(status, &body.to_string())
    }

    pub(crate) fn respond_raw(self, status: u16, body: &str) -> Self {
        self.outcomes.lock().push_back(Ok(HttpResponse {
            status,
            status_text: status_text(status).into(),
            body: body.into(),
        }));
        self
    }

    pub(crate) fn refuse(self) -> Self {
        self.outcomes
            .lock()
            .push_back(Err(TransportError::Connect("connection refused".into())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Paths (URL without the API root) of every request, in order.
    pub(crate) fn paths(&self, api_root: &str) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.url.strip_prefix(api_root).unwrap_or(&r.url).to_owned())
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.requests.lock().push(request);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for {url}"))
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "",
    }
}
