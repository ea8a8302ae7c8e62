//! Data models for definitions, sessions, and the plan tree.
//!
//! This module contains the core domain models of the compass guidance
//! system. Display implementations live in [`crate::display`] to keep data
//! structures separate from presentation logic.
//!
//! Three families of types live here:
//!
//! - **Definitions** ([`definition`]): immutable workflow and checklist
//!   definitions as loaded by the registry.
//! - **Sessions** ([`session`]): the frame stack tracked per session, plus the
//!   result types navigation operations hand back to adapters.
//! - **Plan** ([`plan`]): the recursive plan-item forest and its derived
//!   statistics.

use rand::Rng;

pub mod definition;
pub mod plan;
pub mod session;

pub use definition::{ChecklistDefinition, DefinitionKind, Step, WorkflowDefinition};
pub use plan::{ItemStatus, PlanDocument, PlanItem, PlanStats};
pub use session::{
    AdvanceOutcome, Frame, Session, SessionStatus, SessionSummary, StartedSession, StepInfo,
};

/// Length of generated identifiers for sessions and plan items.
const ID_LEN: usize = 8;

/// Generate a short opaque alphanumeric token.
///
/// Used for session and plan item IDs. Short enough for a human to retype,
/// random enough that collisions are not a practical concern at the scale of
/// a local single-user store.
pub(crate) fn short_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| rng.sample(rand::distr::Alphanumeric) as char)
        .collect()
}
