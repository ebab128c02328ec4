//! Route lookup table.
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Duplicate (method, normalized template) is a build-time error
//! - O(n) scan over compiled templates (acceptable for typical route counts)
//! - Routes are consulted in registration order; register literal templates
//!   before dynamic ones that overlap them

use std::collections::HashMap;
use std::collections::HashSet;

use axum::http::Method;

use super::route::Route;
use crate::error::GatewayError;

/// The immutable mapping from (method, path template) to routes.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile a route set, rejecting duplicate (method, template shape)
    /// pairs. Parameter names do not disambiguate: `GET /items/{id}` and
    /// `GET /items/{name}` conflict.
    pub fn build(routes: Vec<Route>) -> Result<Self, GatewayError> {
        let mut seen = HashSet::new();
        for route in &routes {
            let key = (route.method.clone(), route.template.normalized());
            if !seen.insert(key) {
                return Err(GatewayError::RouteConflict {
                    method: route.method.to_string(),
                    template: route.template.normalized(),
                });
            }
        }
        Ok(Self { routes })
    }

    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// Find the route handling `method` + `path`, with its named parameter
    /// bindings. Exact on method and on template shape.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            if let Some(params) = route.template.match_path(path) {
                return Some((route, params));
            }
        }
        None
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
