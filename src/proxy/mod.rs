//! Reverse-proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → resolver.rs (match every enabled rule, rank by specificity)
//!     → pattern.rs (segment-wise wildcard matching)
//!     → ProxyDecision consumed by the dispatcher
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Selection is specificity-based, not declaration-order-based
//! - Executable hooks live outside the serializable configuration

pub mod hook;
pub mod pattern;
pub mod resolver;
pub mod rule;

pub use hook::{hook, ForwardContext, HookOutcome, PreForwardHook};
pub use pattern::{MatchResult, PathPattern};
pub use resolver::{resolve, ProxyDecision};
pub use rule::{attach_hook, rules_from_config, ProxyRule};
