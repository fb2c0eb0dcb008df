//! In-Memory Store Adapters
//!
//! Reference implementations of the decisioning ports backed by in-process
//! hash maps. Production deployments swap these for a real document store
//! behind the same traits; tests and demos use them directly.
//!
//! # Modules
//!
//! - `claims`: claim store with push subscriptions
//! - `rules`: rule store
//! - `alerts`: fraud alert store
//! - `workflows`: workflow templates and version-checked approval chains

pub mod claims;
pub mod rules;
pub mod alerts;
pub mod workflows;

pub use claims::MemoryClaimStore;
pub use rules::MemoryRuleStore;
pub use alerts::MemoryAlertStore;
pub use workflows::MemoryWorkflowStore;
