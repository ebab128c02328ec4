//! Route definitions: handler, parameter schemas, documentation metadata.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;

use super::template::PathTemplate;
use crate::schema::Schema;

/// The single content type a route documents its request/response bodies
/// under. Documentation metadata only; the dispatcher never uses it to
/// coerce or validate what a handler actually returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Text,
    FormData,
}

impl ResponseFormat {
    /// The one content-type key this format maps to; the other two keys are
    /// absent from the assembled description, not merely empty.
    pub fn content_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::Text => "text/plain",
            ResponseFormat::FormData => "multipart/form-data",
        }
    }
}

/// Declarative response metadata. Only ever read by the docs assembler.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    pub description: String,
    pub schema: Schema,
}

/// Documentation metadata for one route.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub summary: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub response_format: ResponseFormat,
    pub responses: BTreeMap<u16, ResponseSpec>,
}

impl Default for RouteSpec {
    fn default() -> Self {
        Self {
            summary: String::new(),
            description: None,
            tags: Vec::new(),
            response_format: ResponseFormat::Json,
            responses: BTreeMap::new(),
        }
    }
}

/// Parameter schemas a route declares, one optional slot per kind. Slots a
/// route does not declare are skipped entirely during validation.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchemas {
    pub path: Option<Schema>,
    pub query: Option<Schema>,
    pub headers: Option<Schema>,
    pub body: Option<Schema>,
}

/// Everything the dispatcher hands a handler: the raw request pieces plus
/// the values parsed against the route's declared schemas.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Dynamic template segments, bound by declared name.
    pub path_params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// Parsed JSON body, present only when the route declares a body schema.
    pub body: Option<serde_json::Value>,
    pub raw_body: Bytes,
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Type-erased asynchronous route handler. Stored behind `Arc` so routes
/// can be shared across worker threads without copying the closure.
pub type Handler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// A locally handled endpoint: method + template + schemas + handler.
/// Built once at startup, owned exclusively by the route table.
pub struct Route {
    pub method: Method,
    pub template: PathTemplate,
    pub parameters: ParameterSchemas,
    pub spec: RouteSpec,
    handler: Handler,
}

impl Route {
    pub fn new<F, Fut>(method: Method, template: &str, handler: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            method,
            template: PathTemplate::parse(template),
            parameters: ParameterSchemas::default(),
            spec: RouteSpec::default(),
            handler: Arc::new(move |ctx| Box::pin(handler(ctx))),
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.spec.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.spec.tags.push(tag.into());
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.spec.response_format = format;
        self
    }

    /// Declare one documented response.
    pub fn response(mut self, status: u16, description: impl Into<String>, schema: Schema) -> Self {
        self.spec.responses.insert(
            status,
            ResponseSpec {
                description: description.into(),
                schema,
            },
        );
        self
    }

    pub fn path_params(mut self, schema: Schema) -> Self {
        self.parameters.path = Some(schema);
        self
    }

    pub fn query_params(mut self, schema: Schema) -> Self {
        self.parameters.query = Some(schema);
        self
    }

    pub fn header_params(mut self, schema: Schema) -> Self {
        self.parameters.headers = Some(schema);
        self
    }

    pub fn body(mut self, schema: Schema) -> Self {
        self.parameters.body = Some(schema);
        self
    }

    /// Invoke the handler. The returned response passes through to the
    /// client unmodified.
    pub fn handle(&self, ctx: RequestContext) -> HandlerFuture {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .field("parameters", &self.parameters)
            .field("spec", &self.spec)
            .finish()
    }
}
