//! Declarative parameter and body schemas.
//!
//! Routes declare the shape of their path/query/header/body parameters; the
//! dispatcher validates inbound values against these declarations and the
//! docs assembler renders them into the structured API description. The
//! schema language is deliberately closed: strings, numbers, booleans,
//! arrays, objects with required fields, and opaque binary uploads.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::FieldViolation;

/// A parameter or body schema with an optional human-readable description.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Array(Box<Schema>),
    Object(Vec<Field>),
    /// Opaque binary upload (e.g. a file field). Not introspectable.
    Binary,
}

/// A named object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

impl Schema {
    pub fn string() -> Self {
        Self::of(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    pub fn binary() -> Self {
        Self::of(SchemaKind::Binary)
    }

    pub fn array(items: Schema) -> Self {
        Self::of(SchemaKind::Array(Box::new(items)))
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Self::of(SchemaKind::Object(fields))
    }

    fn of(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    /// Attach a human-readable description, carried into the documentation.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Validate a JSON value, appending one violation per mismatch.
    ///
    /// `at` names the position being checked (e.g. `body` or `body.name`)
    /// and prefixes every reported field.
    pub fn validate(&self, value: &Value, at: &str, out: &mut Vec<FieldViolation>) {
        match &self.kind {
            SchemaKind::String => {
                if !value.is_string() {
                    out.push(FieldViolation::new(at, "expected a string"));
                }
            }
            SchemaKind::Number => {
                if !value.is_number() {
                    out.push(FieldViolation::new(at, "expected a number"));
                }
            }
            SchemaKind::Boolean => {
                if !value.is_boolean() {
                    out.push(FieldViolation::new(at, "expected a boolean"));
                }
            }
            // Opaque payloads are not introspectable; nothing to check.
            SchemaKind::Binary => {}
            SchemaKind::Array(items) => match value.as_array() {
                Some(values) => {
                    for (index, item) in values.iter().enumerate() {
                        items.validate(item, &format!("{at}[{index}]"), out);
                    }
                }
                None => out.push(FieldViolation::new(at, "expected an array")),
            },
            SchemaKind::Object(fields) => match value.as_object() {
                Some(map) => {
                    for field in fields {
                        let child = join(at, &field.name);
                        match map.get(&field.name) {
                            Some(value) => field.schema.validate(value, &child, out),
                            None if field.required => {
                                out.push(FieldViolation::new(child, "missing required field"));
                            }
                            None => {}
                        }
                    }
                }
                None => out.push(FieldViolation::new(at, "expected an object")),
            },
        }
    }

    /// Validate a raw text value. Path, query, and header parameters arrive
    /// as strings; primitive kinds check that the text parses accordingly.
    pub fn validate_text(&self, raw: &str, at: &str, out: &mut Vec<FieldViolation>) {
        match &self.kind {
            SchemaKind::String | SchemaKind::Binary => {}
            SchemaKind::Number => {
                if raw.parse::<f64>().is_err() {
                    out.push(FieldViolation::new(at, "expected a number"));
                }
            }
            SchemaKind::Boolean => {
                if !matches!(raw, "true" | "false" | "1" | "0") {
                    out.push(FieldViolation::new(at, "expected a boolean"));
                }
            }
            SchemaKind::Array(_) | SchemaKind::Object(_) => {
                out.push(FieldViolation::new(at, "expected a primitive value"));
            }
        }
    }
}

fn join(at: &str, name: &str) -> String {
    if at.is_empty() {
        name.to_string()
    } else {
        format!("{at}.{name}")
    }
}

/// Validate a map of named text parameters (path, query, or headers) against
/// a declared object schema. Non-object declarations have no named fields to
/// check and are ignored. Header names should be declared lowercase; the
/// dispatcher lowercases inbound header keys before the lookup.
pub fn validate_text_params(
    schema: &Schema,
    values: &HashMap<String, String>,
    location: &str,
    out: &mut Vec<FieldViolation>,
) {
    let SchemaKind::Object(fields) = &schema.kind else {
        return;
    };
    for field in fields {
        let at = format!("{location}.{}", field.name);
        match values.get(&field.name) {
            Some(raw) => field.schema.validate_text(raw, &at, out),
            None if field.required => {
                out.push(FieldViolation::new(at, "missing required parameter"));
            }
            None => {}
        }
    }
}
