//! Session lifecycle and navigation operations.
//!
//! Every operation is a load-mutate-save cycle against the session store.
//! State is persisted before the result is returned, so a crash between
//! calls never loses an acknowledged transition.

use jiff::Timestamp;
use log::{info, warn};

use super::Orchestrator;
use crate::{
    error::{CompassError, Result},
    models::{
        AdvanceOutcome, Frame, Session, SessionStatus, SessionSummary, StartedSession, StepInfo,
    },
    params::{CleanupSessions, PushWorkflow, StartSession},
    registry::TriggerMatch,
};

impl Orchestrator {
    /// Starts a new session for a prompt.
    ///
    /// Named workflows and checklists are activated in order, the last one
    /// becoming active. When no names are given, the prompt is matched
    /// against every definition's triggers and the matches are activated
    /// instead. Names that resolve to nothing are skipped with a warning;
    /// if nothing at all resolves the start fails with
    /// `DefinitionNotFound`.
    pub async fn start(&mut self, params: &StartSession) -> Result<StartedSession> {
        let names: Vec<String> = if params.workflows.is_empty() {
            self.registry
                .match_prompt(&params.prompt)
                .into_iter()
                .map(|m| m.name)
                .collect()
        } else {
            params.workflows.clone()
        };

        let mut stack = Vec::new();
        for name in &names {
            match self.registry.resolve_steps(name) {
                Some((resolved, steps)) => stack.push(Frame::new(resolved, steps)),
                None => warn!("no definition named '{name}', skipping"),
            }
        }

        if stack.is_empty() {
            let name = if params.workflows.is_empty() {
                params.prompt.clone()
            } else {
                params.workflows.join(", ")
            };
            return Err(CompassError::DefinitionNotFound { name });
        }

        let session = Session::create(&params.prompt, stack);
        self.store.save(&session)?;
        info!(
            "started session {} with stack [{}]",
            session.id,
            session.stack_names().join(", ")
        );

        let step = step_info(&session)?;
        Ok(StartedSession {
            id: session.id,
            prompt: session.prompt,
            workflows: names_of(&session.stack),
            step,
        })
    }

    /// Reports the state of an open session and refreshes its
    /// last-accessed timestamp.
    pub async fn status(&mut self, id: &str) -> Result<SessionStatus> {
        let mut session = self.load_open(id)?;
        session.touch();
        self.store.save(&session)?;

        let frame = active(&session)?;
        Ok(SessionStatus::for_session(&session, frame))
    }

    /// Marks the current step done and moves forward.
    ///
    /// When the active workflow is exhausted its frame is popped: either a
    /// suspended parent resumes at the step it was left on, or, with no
    /// parent remaining, the session closes and its record is removed.
    pub async fn advance(&mut self, id: &str) -> Result<AdvanceOutcome> {
        let mut session = self.load_open(id)?;
        let frame = active_mut(&mut session)?;
        frame.current_step += 1;

        if !frame.is_complete() {
            session.touch();
            self.store.save(&session)?;
            return Ok(AdvanceOutcome::NextStep(step_info(&session)?));
        }

        self.pop_active(session).await
    }

    /// Moves one step backwards in the active workflow. Already at the
    /// first step, this is a no-op rather than an error.
    pub async fn back(&mut self, id: &str) -> Result<StepInfo> {
        let mut session = self.load_open(id)?;
        let frame = active_mut(&mut session)?;
        frame.current_step = frame.current_step.saturating_sub(1);

        session.touch();
        self.store.save(&session)?;
        step_info(&session)
    }

    /// Restarts the active workflow from its first step. Suspended parent
    /// frames keep their positions.
    pub async fn restart(&mut self, id: &str) -> Result<StepInfo> {
        let mut session = self.load_open(id)?;
        let frame = active_mut(&mut session)?;
        frame.current_step = 0;

        session.touch();
        self.store.save(&session)?;
        step_info(&session)
    }

    /// Abandons the active workflow regardless of its progress, popping
    /// its frame. Resumes the parent or closes the session, exactly as an
    /// advance off the last step would.
    pub async fn break_workflow(&mut self, id: &str) -> Result<AdvanceOutcome> {
        let session = self.load_open(id)?;
        self.pop_active(session).await
    }

    /// Activates a nested workflow on top of an open session. The current
    /// frame is suspended at its position and resumes when the pushed
    /// workflow completes or is broken out of.
    pub async fn push(&mut self, params: &PushWorkflow) -> Result<StepInfo> {
        let mut session = self.load_open(&params.id)?;
        let (name, steps) = self
            .registry
            .resolve_steps(&params.workflow)
            .ok_or_else(|| CompassError::DefinitionNotFound {
                name: params.workflow.clone(),
            })?;

        session.stack.push(Frame::new(name, steps));
        session.touch();
        self.store.save(&session)?;
        step_info(&session)
    }

    /// Summaries of every open session, oldest first.
    pub async fn list(&mut self) -> Result<Vec<SessionSummary>> {
        Ok(self.store.list()?.iter().map(SessionSummary::from).collect())
    }

    /// Removes sessions whose last access is older than the configured
    /// threshold. Returns how many were removed.
    pub async fn cleanup(&mut self, params: &CleanupSessions) -> Result<usize> {
        let max_age_ms = params.max_age_ms();
        let now = Timestamp::now();

        let mut removed = 0;
        for session in self.store.list()? {
            let idle_ms = now.as_millisecond() - session.last_accessed_at.as_millisecond();
            if idle_ms > max_age_ms && self.store.delete(&session.id)? {
                info!("expired session {} (idle {idle_ms}ms)", session.id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Matches a prompt against every definition's triggers.
    pub async fn match_prompt(&mut self, prompt: &str) -> Result<Vec<TriggerMatch>> {
        Ok(self.registry.match_prompt(prompt))
    }

    /// Pops the active frame, then either resumes the parent or closes the
    /// session. Persists the surviving state (or deletes the record).
    async fn pop_active(&mut self, mut session: Session) -> Result<AdvanceOutcome> {
        let closed = session
            .stack
            .pop()
            .ok_or_else(|| CompassError::invalid_state("session has no active workflow"))?;

        if session.stack.is_empty() {
            self.store.delete(&session.id)?;
            info!("session {} complete", session.id);
            return Ok(AdvanceOutcome::SessionComplete {
                session_id: session.id,
            });
        }

        session.touch();
        self.store.save(&session)?;
        Ok(AdvanceOutcome::ReturnedToParent {
            closed: closed.workflow_name,
            step: step_info(&session)?,
        })
    }
}

fn names_of(stack: &[Frame]) -> Vec<String> {
    stack.iter().map(|f| f.workflow_name.clone()).collect()
}

fn active(session: &Session) -> Result<&Frame> {
    session
        .active()
        .ok_or_else(|| CompassError::invalid_state("session has no active workflow"))
}

fn active_mut(session: &mut Session) -> Result<&mut Frame> {
    session
        .active_mut()
        .ok_or_else(|| CompassError::invalid_state("session has no active workflow"))
}

/// The current step of the active frame. Open sessions always hold one:
/// frames are validated non-empty and exhausted frames are popped before
/// the state is persisted.
fn step_info(session: &Session) -> Result<StepInfo> {
    StepInfo::for_session(session)
        .ok_or_else(|| CompassError::invalid_state("active workflow has no current step"))
}
