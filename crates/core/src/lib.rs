//! # Webdesk Core
//!
//! Domain types, traits, and error definitions for the webdesk support-agent
//! pipeline. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (generation provider, durable keyed store,
//! tool) is defined as a trait here. Implementations live in their respective
//! crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod store;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{ChatMessage, Role, SessionId};
pub use provider::{GenerationRequest, Provider};
pub use store::KeyValueStore;
pub use tool::{Tool, ToolDefinition, ToolRegistry, ToolResult};
