//! Display implementations for domain models.
//!
//! Kept separate from the model definitions so the data structures stay
//! presentation-free. All output is markdown: headers for the thing being
//! shown, bullet lists for metadata, fenced inline code for commands.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{
        AdvanceOutcome, ChecklistDefinition, PlanStats, SessionStatus, SessionSummary,
        StartedSession, StepInfo, WorkflowDefinition,
    },
    registry::TriggerMatch,
};

impl fmt::Display for StepInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} (step {}/{})",
            self.workflow, self.step_number, self.total_steps
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.text)?;

        if self.command.is_some() || self.working_dir.is_some() {
            writeln!(f)?;
            if let Some(command) = &self.command {
                writeln!(f, "- Command: `{command}`")?;
            }
            if let Some(dir) = &self.working_dir {
                writeln!(f, "- Working directory: {dir}")?;
            }
        }

        writeln!(f)?;
        write!(f, "- Session: {}", self.session_id)?;
        if self.depth > 1 {
            write!(f, " (depth {})", self.depth)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for StartedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Session {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "- Prompt: {}", self.prompt)?;
        writeln!(f, "- Workflows: {}", self.workflows.join(", "))?;
        writeln!(f)?;
        write!(f, "{}", self.step)
    }
}

impl fmt::Display for AdvanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextStep(step) => write!(f, "{step}"),
            Self::ReturnedToParent { closed, step } => {
                writeln!(f, "Workflow '{closed}' closed; resuming the parent workflow.")?;
                writeln!(f)?;
                write!(f, "{step}")
            }
            Self::SessionComplete { session_id } => {
                writeln!(f, "Session {session_id} complete. All workflows finished.")
            }
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Session {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "- Prompt: {}", self.prompt)?;
        writeln!(f, "- Stack: {}", self.stack.join(" > "))?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Last accessed: {}", LocalDateTime(&self.last_accessed_at))?;
        writeln!(f)?;
        writeln!(
            f,
            "## {} (step {}/{})",
            self.workflow, self.step_number, self.total_steps
        )?;
        writeln!(f)?;

        match &self.step {
            Some(step) => {
                writeln!(f, "{}", step.text)?;
                if let Some(command) = &step.command {
                    writeln!(f)?;
                    writeln!(f, "- Command: `{command}`")?;
                }
            }
            None => writeln!(f, "All steps complete.")?,
        }
        Ok(())
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}: {}", self.id, self.prompt)?;
        writeln!(f)?;
        write!(
            f,
            "- Workflow: {} (step {}/{}",
            self.workflow, self.step_number, self.total_steps
        )?;
        if self.depth > 1 {
            write!(f, ", depth {}", self.depth)?;
        }
        writeln!(f, ")")?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for TriggerMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}** ({}): {}", self.name, self.kind, self.description)
    }
}

impl fmt::Display for WorkflowDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        if !self.triggers.is_empty() {
            writeln!(f, "- Triggers: {}", self.triggers.join(", "))?;
        }
        if !self.dependencies.is_empty() {
            writeln!(f, "- Dependencies: {}", self.dependencies.join(", "))?;
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for (i, step) in self.steps.iter().enumerate() {
            write!(f, "{}. {}", i + 1, step.text)?;
            if let Some(command) = &step.command {
                write!(f, " (`{command}`)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ChecklistDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        if let Some(description) = &self.description {
            writeln!(f, "{description}")?;
            writeln!(f)?;
        }
        if !self.triggers.is_empty() {
            writeln!(f, "- Triggers: {}", self.triggers.join(", "))?;
        }

        writeln!(f, "\n## Items")?;
        writeln!(f)?;
        for item in &self.items {
            writeln!(f, "- [ ] {item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plan Statistics")?;
        writeln!(f)?;
        writeln!(f, "- Total items: {}", self.total)?;
        writeln!(f, "- Completed: {}", self.completed)?;
        writeln!(f, "- Completion: {:.0}%", self.completion_rate * 100.0)?;
        writeln!(f, "- Max depth: {}", self.max_depth)?;
        Ok(())
    }
}
