//! Session and frame models, plus navigation result types.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{short_id, Step};

/// One activation of a workflow inside a session's stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Name of the workflow this frame was created from
    pub workflow_name: String,

    /// Snapshot of the definition's steps taken at push time. Registry
    /// reloads cannot mutate an in-progress session.
    pub steps: Vec<Step>,

    /// Index of the current step (0-based)
    pub current_step: usize,

    /// Free-form context data carried by this frame
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl Frame {
    /// Creates a new frame positioned at the first step.
    pub fn new(workflow_name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            steps,
            current_step: 0,
            context: BTreeMap::new(),
        }
    }

    /// Whether every step in this frame has been passed.
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.steps.len()
    }

    /// The current step, or `None` if the frame is exhausted.
    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.current_step)
    }
}

/// A stack of frames tracking progress through one or more nested workflows.
///
/// While a session is open its stack depth is at least 1 and exactly one
/// frame, the top of the stack, is active. A session closes when its last
/// frame is popped, at which point it is removed from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Opaque short token identifying this session
    pub id: String,

    /// The original prompt that started this session
    pub prompt: String,

    /// Stack of workflow frames; the last element is active
    pub stack: Vec<Frame>,

    /// Timestamp when this session was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the most recent successful operation (UTC)
    pub last_accessed_at: Timestamp,
}

impl Session {
    /// Creates a new session from pre-resolved frames. The last frame in
    /// `stack` becomes active.
    pub fn create(prompt: impl Into<String>, stack: Vec<Frame>) -> Self {
        let now = Timestamp::now();
        Self {
            id: short_id(),
            prompt: prompt.into(),
            stack,
            created_at: now,
            last_accessed_at: now,
        }
    }

    /// The active frame (top of stack).
    pub fn active(&self) -> Option<&Frame> {
        self.stack.last()
    }

    /// Mutable access to the active frame.
    pub fn active_mut(&mut self) -> Option<&mut Frame> {
        self.stack.last_mut()
    }

    /// Workflow names bottom-to-top.
    pub fn stack_names(&self) -> Vec<String> {
        self.stack.iter().map(|f| f.workflow_name.clone()).collect()
    }

    /// Refreshes the last-accessed timestamp.
    pub fn touch(&mut self) {
        self.last_accessed_at = Timestamp::now();
    }
}

/// The step an agent should act on next, as returned by navigation calls.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepInfo {
    /// ID of the session this step belongs to
    pub session_id: String,
    /// Name of the active workflow
    pub workflow: String,
    /// Position of the step within the workflow (1-based for display)
    pub step_number: usize,
    /// Total number of steps in the active workflow
    pub total_steps: usize,
    /// Guidance text
    pub text: String,
    /// Suggested command, if the step carries one
    pub command: Option<String>,
    /// Working directory for the suggested command
    pub working_dir: Option<String>,
    /// Current stack depth of the session
    pub depth: usize,
}

impl StepInfo {
    /// Builds the step info for a session's active frame, or `None` if the
    /// active frame is exhausted.
    pub(crate) fn for_session(session: &Session) -> Option<Self> {
        let frame = session.active()?;
        let step = frame.current()?;
        Some(Self {
            session_id: session.id.clone(),
            workflow: frame.workflow_name.clone(),
            step_number: frame.current_step + 1,
            total_steps: frame.steps.len(),
            text: step.text.clone(),
            command: step.command.clone(),
            working_dir: step.working_dir.clone(),
            depth: session.stack.len(),
        })
    }
}

/// Snapshot of a session's state as reported by `status`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionStatus {
    pub id: String,
    pub prompt: String,
    /// Name of the active workflow
    pub workflow: String,
    /// Position of the current step (1-based)
    pub step_number: usize,
    pub total_steps: usize,
    /// The current step, or `None` if the active frame is exhausted
    pub step: Option<Step>,
    /// Workflow names bottom-to-top
    pub stack: Vec<String>,
    /// Whether the active frame has passed its last step
    pub complete: bool,
    pub created_at: Timestamp,
    pub last_accessed_at: Timestamp,
}

impl SessionStatus {
    pub(crate) fn for_session(session: &Session, frame: &Frame) -> Self {
        Self {
            id: session.id.clone(),
            prompt: session.prompt.clone(),
            workflow: frame.workflow_name.clone(),
            step_number: (frame.current_step + 1).min(frame.steps.len()),
            total_steps: frame.steps.len(),
            step: frame.current().cloned(),
            stack: session.stack_names(),
            complete: frame.is_complete(),
            created_at: session.created_at,
            last_accessed_at: session.last_accessed_at,
        }
    }
}

/// One-line summary of an open session, as reported by `list`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub prompt: String,
    /// Name of the active workflow
    pub workflow: String,
    /// Position of the current step (1-based)
    pub step_number: usize,
    pub total_steps: usize,
    /// Current stack depth
    pub depth: usize,
    pub created_at: Timestamp,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        let (workflow, step_number, total_steps) = match session.active() {
            Some(frame) => (
                frame.workflow_name.clone(),
                (frame.current_step + 1).min(frame.steps.len()),
                frame.steps.len(),
            ),
            None => (String::new(), 0, 0),
        };
        Self {
            id: session.id.clone(),
            prompt: session.prompt.clone(),
            workflow,
            step_number,
            total_steps,
            depth: session.stack.len(),
            created_at: session.created_at,
        }
    }
}

/// Result of `advance` and `break`: either another step to act on, a return
/// to a suspended parent workflow, or session completion.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum AdvanceOutcome {
    /// The active workflow has another step
    NextStep(StepInfo),
    /// The active frame was popped and its parent resumed
    ReturnedToParent {
        /// Name of the workflow that was closed
        closed: String,
        /// Current step of the revealed parent frame
        step: StepInfo,
    },
    /// The last frame was popped; the session is closed and removed
    SessionComplete { session_id: String },
}

/// Result of `start`: the new session and its first actionable step.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StartedSession {
    pub id: String,
    pub prompt: String,
    /// Activated workflow names bottom-to-top (the last one is active)
    pub workflows: Vec<String>,
    /// First step of the active workflow
    pub step: StepInfo,
}
