//! Builds the structured API description from the route table.
//!
//! The output follows the OpenAPI 3.1 shape for the constructs the route
//! model can express. Assembly is pure: same table and config in, same JSON
//! out, so the server builds the document once at startup and serves the
//! cached value.

use serde_json::{json, Map, Value};

use crate::config::AppConfig;
use crate::routing::{Route, RouteTable};
use crate::schema::{Schema, SchemaKind};

/// Assemble the full API description for a route table.
pub fn assemble(table: &RouteTable, config: &AppConfig) -> Value {
    let mut paths = Map::new();

    for route in table.routes() {
        let path = route.template.as_str().to_string();
        let entry = paths
            .entry(path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(item) = entry {
            item.insert(
                route.method.as_str().to_lowercase(),
                Value::Object(operation(route)),
            );
        }
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": config.title,
            "description": config.description,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths,
    })
}

/// Render one route as an operation object.
fn operation(route: &Route) -> Map<String, Value> {
    let mut op = Map::new();

    if !route.spec.summary.is_empty() {
        op.insert("summary".to_string(), json!(route.spec.summary));
    }
    if let Some(description) = &route.spec.description {
        op.insert("description".to_string(), json!(description));
    }
    if !route.spec.tags.is_empty() {
        op.insert("tags".to_string(), json!(route.spec.tags));
    }

    let mut parameters = Vec::new();
    if let Some(schema) = &route.parameters.path {
        parameter_descriptors(schema, "path", &mut parameters);
    }
    if let Some(schema) = &route.parameters.query {
        parameter_descriptors(schema, "query", &mut parameters);
    }
    if let Some(schema) = &route.parameters.headers {
        parameter_descriptors(schema, "header", &mut parameters);
    }
    if !parameters.is_empty() {
        op.insert("parameters".to_string(), Value::Array(parameters));
    }

    let content_type = route.spec.response_format.content_type();

    if let Some(schema) = &route.parameters.body {
        op.insert(
            "requestBody".to_string(),
            json!({
                "required": true,
                "content": {
                    content_type: { "schema": schema_value(schema) },
                },
            }),
        );
    }

    let mut responses = Map::new();
    for (status, spec) in &route.spec.responses {
        responses.insert(
            status.to_string(),
            json!({
                "description": spec.description,
                "content": {
                    content_type: { "schema": schema_value(&spec.schema) },
                },
            }),
        );
    }
    if !responses.is_empty() {
        op.insert("responses".to_string(), Value::Object(responses));
    }

    op
}

/// Flatten a declared object schema into one parameter descriptor per field.
/// Non-object declarations describe no named parameters.
fn parameter_descriptors(schema: &Schema, location: &str, out: &mut Vec<Value>) {
    let SchemaKind::Object(fields) = schema.kind() else {
        return;
    };
    for field in fields {
        let mut descriptor = Map::new();
        descriptor.insert("name".to_string(), json!(field.name));
        descriptor.insert("in".to_string(), json!(location));
        descriptor.insert("required".to_string(), json!(field.required));
        if let Some(description) = field.schema.description() {
            descriptor.insert("description".to_string(), json!(description));
        }
        descriptor.insert("schema".to_string(), schema_value(&field.schema));
        out.push(Value::Object(descriptor));
    }
}

/// Render a schema as a JSON-schema-like value.
///
/// Binary schemas become an opaque `{"type": "object"}` carrying only the
/// description; file contents are not introspectable.
fn schema_value(schema: &Schema) -> Value {
    let mut value = Map::new();

    match schema.kind() {
        SchemaKind::String => {
            value.insert("type".to_string(), json!("string"));
        }
        SchemaKind::Number => {
            value.insert("type".to_string(), json!("number"));
        }
        SchemaKind::Boolean => {
            value.insert("type".to_string(), json!("boolean"));
        }
        SchemaKind::Binary => {
            value.insert("type".to_string(), json!("object"));
        }
        SchemaKind::Array(items) => {
            value.insert("type".to_string(), json!("array"));
            value.insert("items".to_string(), schema_value(items));
        }
        SchemaKind::Object(fields) => {
            value.insert("type".to_string(), json!("object"));

            let mut properties = Map::new();
            let mut required = Vec::new();
            for field in fields {
                properties.insert(field.name.clone(), schema_value(&field.schema));
                if field.required {
                    required.push(json!(field.name));
                }
            }
            value.insert("properties".to_string(), Value::Object(properties));
            if !required.is_empty() {
                value.insert("required".to_string(), Value::Array(required));
            }
        }
    }

    if let Some(description) = schema.description() {
        value.insert("description".to_string(), json!(description));
    }

    Value::Object(value)
}
