//! Pre-forward decision hooks.
//!
//! A hook is consulted once per proxied request, before forwarding. It can
//! veto the forward (optionally supplying the response to return), annotate
//! the outbound request with headers, or redirect it to a different target
//! for that request only.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;
use url::Url;

/// Read-only view of the request handed to a hook.
#[derive(Debug, Clone)]
pub struct ForwardContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Wildcard captures from the matched pattern (`param0`, `param1`, …).
    pub params: HashMap<String, String>,
    /// The target the rule would forward to.
    pub target: Url,
}

/// A hook's decision. A closed enum consumed at a single await point, so a
/// veto can never fall through to the forwarding path.
pub enum HookOutcome {
    /// Forward the request. `headers` override rule-level headers on key
    /// collision; `target` overrides the rule target for this request only.
    Proceed {
        headers: HashMap<String, String>,
        target: Option<Url>,
    },
    /// Skip forwarding. `None` synthesizes the default failure response.
    ShortCircuit { response: Option<Response> },
}

impl HookOutcome {
    /// Forward unchanged.
    pub fn proceed() -> Self {
        HookOutcome::Proceed {
            headers: HashMap::new(),
            target: None,
        }
    }

    /// Forward with extra outbound headers.
    pub fn proceed_with_headers(headers: HashMap<String, String>) -> Self {
        HookOutcome::Proceed {
            headers,
            target: None,
        }
    }

    /// Forward to a different target for this request only.
    pub fn redirect(target: Url) -> Self {
        HookOutcome::Proceed {
            headers: HashMap::new(),
            target: Some(target),
        }
    }

    /// Veto the forward and return the given response verbatim.
    pub fn reject(response: Response) -> Self {
        HookOutcome::ShortCircuit {
            response: Some(response),
        }
    }

    /// Veto the forward; the gateway synthesizes the failure response.
    pub fn deny() -> Self {
        HookOutcome::ShortCircuit { response: None }
    }
}

pub type HookFuture = Pin<Box<dyn Future<Output = HookOutcome> + Send>>;

/// Type-erased asynchronous pre-forward hook. Stored behind `Arc` so rules
/// can be shared across requests without copying the closure.
pub type PreForwardHook = Arc<dyn Fn(ForwardContext) -> HookFuture + Send + Sync>;

/// Wrap an async closure as a [`PreForwardHook`].
pub fn hook<F, Fut>(f: F) -> PreForwardHook
where
    F: Fn(ForwardContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HookOutcome> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}
