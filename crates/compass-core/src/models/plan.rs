//! Plan-tree models: the recursive task forest and derived statistics.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::short_id;

/// Type-safe enumeration of plan item statuses.
///
/// The state machine is one-directional: pending items become complete and
/// no operation reopens them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Item has not been completed
    #[default]
    Pending,

    /// Item has been completed
    Complete,
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ItemStatus::Pending),
            "complete" | "completed" | "done" => Ok(ItemStatus::Complete),
            _ => Err(format!("Invalid plan item status: {s}")),
        }
    }
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Complete => "complete",
        }
    }
}

/// One task in the plan forest.
///
/// Invariant: `completed_at` is set if and only if `status` is complete.
/// Completion is independent of children in both directions; nothing
/// cascades.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    /// Opaque short token identifying this item
    pub id: String,

    /// Task text
    pub text: String,

    /// Current status
    #[serde(default)]
    pub status: ItemStatus,

    /// Ordered child items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlanItem>,

    /// Timestamp when the item was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the item was completed (set iff status is complete)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl PlanItem {
    /// Creates a new pending item with a fresh ID.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: short_id(),
            text: text.into(),
            status: ItemStatus::Pending,
            children: Vec::new(),
            created_at: Timestamp::now(),
            completed_at: None,
        }
    }

    /// Marks the item complete and stamps `completed_at`. Children and
    /// parents are untouched.
    pub fn complete(&mut self) {
        self.status = ItemStatus::Complete;
        self.completed_at = Some(Timestamp::now());
    }
}

/// The single persisted plan document: an ordered forest of plan items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDocument {
    /// Root items, in insertion order
    #[serde(default)]
    pub items: Vec<PlanItem>,

    /// Timestamp when the plan was first created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last mutation (UTC)
    pub last_modified: Timestamp,
}

impl PlanDocument {
    /// Creates an empty plan document.
    pub fn empty() -> Self {
        let now = Timestamp::now();
        Self {
            items: Vec::new(),
            created_at: now,
            last_modified: now,
        }
    }

    /// Depth-first search for an item by ID.
    pub fn find(&self, id: &str) -> Option<&PlanItem> {
        fn walk<'a>(items: &'a [PlanItem], id: &str) -> Option<&'a PlanItem> {
            for item in items {
                if item.id == id {
                    return Some(item);
                }
                if let Some(found) = walk(&item.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.items, id)
    }

    /// Depth-first search for an item by ID, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut PlanItem> {
        fn walk<'a>(items: &'a mut [PlanItem], id: &str) -> Option<&'a mut PlanItem> {
            for item in items {
                if item.id == id {
                    return Some(item);
                }
                if let Some(found) = walk(&mut item.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&mut self.items, id)
    }

    /// Derives counts over the whole forest by depth-first walk.
    pub fn stats(&self) -> PlanStats {
        fn walk(items: &[PlanItem], depth: usize, stats: &mut PlanStats) {
            for item in items {
                stats.total += 1;
                if item.status == ItemStatus::Complete {
                    stats.completed += 1;
                }
                stats.max_depth = stats.max_depth.max(depth);
                walk(&item.children, depth + 1, stats);
            }
        }

        let mut stats = PlanStats::default();
        walk(&self.items, 1, &mut stats);
        if stats.total > 0 {
            stats.completion_rate = stats.completed as f64 / stats.total as f64;
        }
        stats
    }
}

/// Aggregate statistics over the plan forest.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct PlanStats {
    /// Total number of items at every depth
    pub total: usize,
    /// Number of completed items at every depth
    pub completed: usize,
    /// `completed / total`, defined as 0 when the plan is empty
    pub completion_rate: f64,
    /// Depth of the deepest item (1 for a flat list, 0 when empty)
    pub max_depth: usize,
}
