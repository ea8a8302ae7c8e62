//! Collection wrapper types for formatting lists of results.
//!
//! Newtype wrappers give collections a `Display` implementation without
//! attaching presentation logic to the element types themselves.

use std::fmt;

use crate::{
    models::{
        ChecklistDefinition, ItemStatus, PlanDocument, PlanItem, SessionSummary,
        WorkflowDefinition,
    },
    registry::TriggerMatch,
};

/// Wrapper for displaying a list of open sessions.
pub struct SessionSummaries(pub Vec<SessionSummary>);

impl fmt::Display for SessionSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No open sessions.");
        }
        writeln!(f, "# Open Sessions")?;
        writeln!(f)?;
        for summary in &self.0 {
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}

/// Wrapper for displaying the definitions whose triggers matched a prompt.
pub struct TriggerMatches(pub Vec<TriggerMatch>);

impl fmt::Display for TriggerMatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No definitions matched.");
        }
        writeln!(f, "# Matching Definitions")?;
        writeln!(f)?;
        for matched in &self.0 {
            writeln!(f, "{matched}")?;
        }
        Ok(())
    }
}

/// Wrapper for displaying every available definition, grouped by kind.
pub struct DefinitionCatalog {
    pub workflows: Vec<WorkflowDefinition>,
    pub checklists: Vec<ChecklistDefinition>,
}

impl fmt::Display for DefinitionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Workflows")?;
        writeln!(f)?;
        if self.workflows.is_empty() {
            writeln!(f, "No workflows defined.")?;
        }
        for workflow in &self.workflows {
            writeln!(
                f,
                "- **{}**: {} ({} steps)",
                workflow.name,
                workflow.description,
                workflow.steps.len()
            )?;
        }

        writeln!(f, "\n# Checklists")?;
        writeln!(f)?;
        if self.checklists.is_empty() {
            writeln!(f, "No checklists defined.")?;
        }
        for checklist in &self.checklists {
            write!(f, "- **{}**", checklist.name)?;
            if let Some(description) = &checklist.description {
                write!(f, ": {description}")?;
            }
            writeln!(f, " ({} items)", checklist.items.len())?;
        }
        Ok(())
    }
}

/// Wrapper rendering the plan forest as an indented markdown checklist.
pub struct PlanOutline(pub PlanDocument);

impl fmt::Display for PlanOutline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.items.is_empty() {
            return writeln!(f, "The plan is empty.");
        }
        writeln!(f, "# Plan")?;
        writeln!(f)?;
        for item in &self.0.items {
            fmt_item(f, item, 0)?;
        }
        Ok(())
    }
}

fn fmt_item(f: &mut fmt::Formatter<'_>, item: &PlanItem, depth: usize) -> fmt::Result {
    let marker = match item.status {
        ItemStatus::Complete => "x",
        ItemStatus::Pending => " ",
    };
    writeln!(
        f,
        "{:indent$}- [{marker}] {} ({})",
        "",
        item.text,
        item.id,
        indent = depth * 2
    )?;
    for child in &item.children {
        fmt_item(f, child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sessions_say_so() {
        let out = format!("{}", SessionSummaries(Vec::new()));
        assert!(out.contains("No open sessions."));
    }

    #[test]
    fn plan_outline_nests_children() {
        let mut root = PlanItem::new("root task".to_string());
        let mut child = PlanItem::new("child task".to_string());
        child.complete();
        root.children.push(child);
        let mut doc = PlanDocument::empty();
        doc.items.push(root);

        let out = format!("{}", PlanOutline(doc));
        assert!(out.contains("- [ ] root task"));
        assert!(out.contains("  - [x] child task"));
    }
}
