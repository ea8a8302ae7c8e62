//! Global plan-tree manager.
//!
//! Maintains one mutable forest of tasks, persisted as a single JSON
//! document at a fixed path. The document is reloaded before every call
//! (there is no in-memory cache) so independent one-shot invocations never
//! operate on stale state. Each operation is one load/apply/save cycle;
//! [`PlanManager::add_items`] applies a whole batch inside a single cycle
//! and is the preferred bulk path.
//!
//! The plan is entirely independent of guidance sessions.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    error::{CompassError, PersistenceResultExt, Result},
    models::{PlanDocument, PlanItem, PlanStats},
    params::{AddPlanItem, ExpandPlanItem},
};

/// Manager for the single persisted plan document.
#[derive(Debug)]
pub struct PlanManager {
    path: PathBuf,
}

impl PlanManager {
    /// Creates a manager persisting at `path`, creating parent directories
    /// as needed. The document itself is created lazily on first mutation.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).at_path(parent)?;
        }
        Ok(Self { path })
    }

    /// Default document location following the XDG Base Directory
    /// specification: `$XDG_DATA_HOME/compass/plan.json`.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("compass")
            .place_data_file("plan.json")
            .map_err(|e| CompassError::XdgDirectory(e.to_string()))
    }

    /// The path of the persisted document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PlanDocument> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PlanDocument::empty())
            }
            Err(e) => return Err(CompassError::persistence(&self.path, e)),
        };
        match serde_json::from_str(&text) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(
                    "plan document {} is corrupt, starting empty: {e}",
                    self.path.display()
                );
                Ok(PlanDocument::empty())
            }
        }
    }

    /// Stamps `last_modified` and writes atomically (temp file + rename).
    fn save(&self, doc: &mut PlanDocument) -> Result<()> {
        doc.last_modified = jiff::Timestamp::now();
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(doc)?;
        fs::write(&tmp, body).at_path(&tmp)?;
        fs::rename(&tmp, &self.path).at_path(&self.path)?;
        Ok(())
    }

    /// Adds one pending item: under `parent_id` when given (failing with
    /// `PlanItemNotFound` if that parent is absent), otherwise as a new
    /// root. Returns the created item.
    pub async fn add_item(&self, params: &AddPlanItem) -> Result<PlanItem> {
        let mut doc = self.load()?;
        let item = apply_add(&mut doc, params)?;
        self.save(&mut doc)?;
        Ok(item)
    }

    /// Adds a batch of pending items in one load/apply-all/save cycle,
    /// preserving input order. Any missing parent fails the whole batch
    /// before anything is written.
    pub async fn add_items(&self, params: &[AddPlanItem]) -> Result<Vec<PlanItem>> {
        let mut doc = self.load()?;
        let mut created = Vec::with_capacity(params.len());
        for add in params {
            created.push(apply_add(&mut doc, add)?);
        }
        self.save(&mut doc)?;
        Ok(created)
    }

    /// Marks an item complete and stamps `completed_at`. Nothing cascades
    /// to children or parents. Returns `false` (not an error) when the ID
    /// does not exist; completing an already-complete item keeps its
    /// original completion time.
    pub async fn complete_item(&self, id: &str) -> Result<bool> {
        let mut doc = self.load()?;
        let Some(item) = doc.find_mut(id) else {
            return Ok(false);
        };
        if item.completed_at.is_none() {
            item.complete();
            self.save(&mut doc)?;
        }
        Ok(true)
    }

    /// Appends one pending child per text under an existing item, in input
    /// order. Fails with `PlanItemNotFound` when the ID is absent.
    pub async fn expand_item(&self, params: &ExpandPlanItem) -> Result<Vec<PlanItem>> {
        let mut doc = self.load()?;
        let item = doc
            .find_mut(&params.id)
            .ok_or_else(|| CompassError::PlanItemNotFound {
                id: params.id.clone(),
            })?;

        let children: Vec<PlanItem> = params
            .texts
            .iter()
            .map(|text| PlanItem::new(text.clone()))
            .collect();
        item.children.extend(children.iter().cloned());

        self.save(&mut doc)?;
        Ok(children)
    }

    /// Replaces the forest with an empty list. Irreversible, so the caller
    /// must pass explicit confirmation.
    pub async fn clear(&self, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(CompassError::invalid_input(
                "confirmed",
                "Clearing the plan discards every item and cannot be undone. \
                 Set 'confirmed' to true to proceed.",
            ));
        }
        let mut doc = self.load()?;
        let discarded = doc.stats().total;
        doc.items.clear();
        self.save(&mut doc)?;
        info!("cleared plan ({discarded} items discarded)");
        Ok(())
    }

    /// The current document, for display.
    pub async fn outline(&self) -> Result<PlanDocument> {
        self.load()
    }

    /// Aggregate statistics over the whole forest.
    pub async fn stats(&self) -> Result<PlanStats> {
        Ok(self.load()?.stats())
    }
}

fn apply_add(doc: &mut PlanDocument, params: &AddPlanItem) -> Result<PlanItem> {
    if params.text.trim().is_empty() {
        return Err(CompassError::invalid_input(
            "text",
            "Plan item text must not be empty",
        ));
    }

    let item = PlanItem::new(params.text.clone());
    match &params.parent_id {
        Some(parent_id) => {
            let parent =
                doc.find_mut(parent_id)
                    .ok_or_else(|| CompassError::PlanItemNotFound {
                        id: parent_id.clone(),
                    })?;
            parent.children.push(item.clone());
        }
        None => doc.items.push(item.clone()),
    }
    Ok(item)
}
