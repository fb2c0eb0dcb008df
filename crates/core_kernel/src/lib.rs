//! Core Kernel - Foundational types and utilities for the claims decisioning system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Local-time windows for business-hours and timing-anomaly checks
//! - Port error taxonomy shared by all adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{Timezone, LocalTimeWindow, BUSINESS_HOURS, OVERNIGHT_QUIET_HOURS};
pub use identifiers::{
    ClaimId, RuleId, WorkflowId, ChainId, AlertId,
    CustomerId, ApproverId,
};
pub use ports::{PortError, DomainPort, Subscription};
