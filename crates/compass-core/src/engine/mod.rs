//! High-level orchestrator API for guidance sessions.
//!
//! The [`Orchestrator`] is the central coordinator between the interface
//! layers (CLI, MCP) and the underlying state: it resolves workflow names
//! through the [`Registry`](crate::registry::Registry), tracks per-session
//! frame stacks, and persists every state change through the
//! [`SessionStore`](crate::store::SessionStore) before returning.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Interfaces  │    │ Orchestrator │    │  Registry +  │
//! │  (CLI, MCP)  │───▶│ (session_ops)│───▶│ SessionStore │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Sessions are single-writer: operations take `&mut self`, and concurrent
//! adapters serialize access with a mutex. That keeps every operation an
//! uninterrupted load-mutate-save cycle without file locking.
//!
//! # Usage
//!
//! ```rust,no_run
//! use compass_core::{params::StartSession, OrchestratorBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut orchestrator = OrchestratorBuilder::new().build().await?;
//!
//! let started = orchestrator
//!     .start(&StartSession {
//!         prompt: "implement the parser".to_string(),
//!         workflows: vec![],
//!     })
//!     .await?;
//! println!("session {} step: {}", started.id, started.step.text);
//! # Ok(())
//! # }
//! ```

pub mod builder;
mod session_ops;

pub use builder::OrchestratorBuilder;

use crate::{
    error::{CompassError, Result},
    models::Session,
    registry::Registry,
    store::SessionStore,
};

/// Coordinator for guidance sessions: definition resolution, frame-stack
/// navigation, and persistence.
#[derive(Debug)]
pub struct Orchestrator {
    registry: Registry,
    store: SessionStore,
}

impl Orchestrator {
    pub(crate) fn new(registry: Registry, store: SessionStore) -> Self {
        Self { registry, store }
    }

    /// Direct access to the definition registry, for operations that read
    /// definitions without touching any session.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Loads an open session or fails with `SessionNotFound`.
    fn load_open(&self, id: &str) -> Result<Session> {
        self.store
            .get(id)?
            .ok_or_else(|| CompassError::SessionNotFound { id: id.to_string() })
    }
}
