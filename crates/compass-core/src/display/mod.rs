//! Display formatting for operation results.
//!
//! Domain models get direct `Display` implementations, collections get
//! newtype wrappers, and generic confirmations go through
//! [`OperationStatus`]. Everything renders markdown so the same output
//! works for rich terminal display and for MCP tool results.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Display impls & │    │   Formatted     │
//! │ (StepInfo, ...) │───▶│    wrappers     │───▶│    Output       │
//! │                 │    │                 │    │ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrappers (SessionSummaries, TriggerMatches,
//!   DefinitionCatalog, PlanOutline)
//! - [`models`]: Display implementations for domain models
//! - [`status`]: Confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{DefinitionCatalog, PlanOutline, SessionSummaries, TriggerMatches};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
