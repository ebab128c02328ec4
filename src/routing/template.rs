//! Route path templates with named dynamic segments.
//!
//! Templates are a distinct mechanism from proxy wildcard patterns: dynamic
//! segments are declared by name (`/storage/{id}`) and bind their captured
//! value to that name rather than to a positional key.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    Literal(String),
    Param(String),
}

/// A compiled path template. Immutable after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<TemplateSegment>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Self {
        let raw = if template != "/" && template.ends_with('/') {
            &template[..template.len() - 1]
        } else {
            template
        };
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                {
                    Some(name) => TemplateSegment::Param(name.to_string()),
                    None => TemplateSegment::Literal(segment.to_string()),
                }
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The template as declared, with `{name}` placeholders. This is also
    /// the rendering used by the docs assembler.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Template with parameter names erased; used for duplicate detection.
    /// `/items/{id}` and `/items/{name}` normalize identically.
    pub fn normalized(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                TemplateSegment::Literal(literal) => out.push_str(literal),
                TemplateSegment::Param(_) => out.push_str("{}"),
            }
        }
        out
    }

    /// Match a request path, binding each dynamic segment to its declared
    /// name. Dynamic segments match any single non-empty segment.
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                TemplateSegment::Literal(literal) if literal == part => {}
                TemplateSegment::Literal(_) => return None,
                TemplateSegment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}
