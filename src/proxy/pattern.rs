//! Wildcard path pattern matching.
//!
//! # Responsibilities
//! - Compile `/api/*/users`-style patterns into literal/wildcard segments
//! - Match request paths segment by segment
//! - Capture wildcard values positionally (`param0`, `param1`, …)
//!
//! # Design Decisions
//! - Segment counts must match exactly (no variable-depth tails)
//! - Literals compare as opaque strings (`.` has no special meaning)
//! - No regex to guarantee O(n) matching

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Literal(String),
    Wildcard,
}

/// A compiled wildcard pattern. Immutable after parsing; the segment count
/// is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<PatternSegment>,
}

/// Outcome of matching one path against one pattern. Ephemeral, produced
/// per lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    pub params: HashMap<String, String>,
}

impl MatchResult {
    fn miss() -> Self {
        Self::default()
    }
}

impl PathPattern {
    /// Compile a pattern string. `*` segments match exactly one arbitrary
    /// non-empty path segment; everything else is a literal.
    pub fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|segment| {
                if segment == "*" {
                    PatternSegment::Wildcard
                } else {
                    PatternSegment::Literal(segment.to_string())
                }
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern exactly as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PatternSegment::Wildcard))
            .count()
    }

    /// Match a request path against this pattern. Wildcard captures are
    /// keyed `param0`, `param1`, … in left-to-right order of occurrence.
    pub fn match_path(&self, path: &str) -> MatchResult {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return MatchResult::miss();
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                PatternSegment::Literal(literal) if literal == part => {}
                PatternSegment::Literal(_) => return MatchResult::miss(),
                PatternSegment::Wildcard => {
                    params.insert(format!("param{}", params.len()), (*part).to_string());
                }
            }
        }

        MatchResult {
            matched: true,
            params,
        }
    }
}

// Empty leading/trailing components are discarded for patterns and request
// paths alike, so `/api/` and `/api` split identically.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
