//! Claims Domain
//!
//! This crate implements the claim aggregate for warranty, exchange, return,
//! and repair requests: intake, the status lifecycle, and the store port the
//! decisioning engines consume.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Draft -> Submitted -> Under Review -> Pending Approval -> Approved/Rejected
//!                   \__ auto-decided by rules _________________/
//! ```

pub mod claim;
pub mod ports;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimType, ClaimPriority, Customer};
pub use ports::{ClaimsPort, ClaimFilter, ClaimOrdering, ClaimCallback};
pub use error::ClaimError;
