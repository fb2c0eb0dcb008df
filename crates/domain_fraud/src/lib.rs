//! Fraud Scoring Domain
//!
//! Computes a 0-100 anomaly score for a claim from historical claim
//! patterns: amount deviation, duplicate detection via text and numeric
//! similarity, submission frequency, and time-of-day anomalies. Suspicious
//! claims become persisted fraud alerts with their own review lifecycle.

pub mod similarity;
pub mod scorer;
pub mod alert;
pub mod ports;
pub mod error;

pub use similarity::{text_similarity, claim_similarity};
pub use scorer::{AnomalyScore, FraudScorer, Recommendation, ScoreFactor};
pub use alert::{AlertSeverity, AlertStatus, AlertType, FraudAlert};
pub use ports::{AlertsPort, AlertFilter};
pub use error::FraudError;
