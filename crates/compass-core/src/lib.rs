//! Core library for the Compass workflow guidance system.
//!
//! This crate provides the business logic for turning declarative workflow
//! and checklist definitions into step-by-step guidance sessions, plus an
//! independent persistent plan tree. It contains the definition registry,
//! the session orchestrator and its file-backed store, the plan manager,
//! data models, and error handling.
//!
//! # Display Architecture
//!
//! The crate implements a Display-based architecture for formatting output:
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for
//!   direct formatting
//! - **Display Wrappers** ([`display`]): Provide contextual and specialized
//!   formatting for collections and confirmations
//! - **Terminal Rendering**: Rich markdown output via the CLI's terminal
//!   renderer
//!
//! All formatted output is markdown, so the same rendering serves the
//! terminal and MCP tool results.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use compass_core::{params::StartSession, OrchestratorBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an orchestrator with default XDG directories
//! let mut orchestrator = OrchestratorBuilder::new().build().await?;
//!
//! // Start a session; with no explicit workflows the prompt is matched
//! // against every definition's triggers
//! let started = orchestrator
//!     .start(&StartSession {
//!         prompt: "fix the flaky integration test".to_string(),
//!         workflows: vec![],
//!     })
//!     .await?;
//! println!("{started}");
//!
//! // Work through the steps
//! let outcome = orchestrator.advance(&started.id).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod plan;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use display::{
    DefinitionCatalog, LocalDateTime, OperationStatus, PlanOutline, SessionSummaries,
    TriggerMatches,
};
pub use engine::{Orchestrator, OrchestratorBuilder};
pub use error::{CompassError, Result};
pub use models::{
    AdvanceOutcome, ChecklistDefinition, DefinitionKind, Frame, ItemStatus, PlanDocument,
    PlanItem, PlanStats, Session, SessionStatus, SessionSummary, StartedSession, Step, StepInfo,
    WorkflowDefinition,
};
pub use plan::PlanManager;
pub use registry::{Registry, TriggerMatch};
pub use store::SessionStore;
