//! Workflow and checklist definition registry.
//!
//! Loads named definitions from YAML files in a definitions directory
//! (workflows at the top level, checklists under `checklists/`) and caches
//! them in memory. Every access revalidates the cache with a cheap
//! modification-timestamp comparison: any added, removed, or newer source
//! file triggers a full reload. There is no background watcher; staleness is
//! checked on demand, which keeps the registry deterministic and easy to
//! test without timers.
//!
//! Invalid files are skipped with a warning, never failing the whole load.
//! If a scan yields no valid definitions at all, a small built-in default
//! set is served instead so guidance keeps working on a fresh install.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use log::{debug, warn};
use serde::Deserialize;

use crate::{
    error::{CompassError, Result},
    models::{ChecklistDefinition, DefinitionKind, Step, WorkflowDefinition},
};

pub mod builtin;

/// Declarative step shape as written in definition files: either a bare
/// string or a map with command metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawStep {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        command: Option<String>,
        #[serde(default)]
        working_dir: Option<String>,
    },
}

impl From<RawStep> for Step {
    fn from(raw: RawStep) -> Self {
        match raw {
            RawStep::Text(text) => Step::text(text),
            RawStep::Detailed {
                text,
                command,
                working_dir,
            } => Step {
                text,
                command,
                working_dir,
            },
        }
    }
}

/// Raw YAML shape of a workflow definition file.
#[derive(Debug, Deserialize)]
struct RawWorkflow {
    name: String,
    description: String,
    #[serde(default)]
    triggers: Vec<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    project_types: Vec<String>,
    #[serde(default)]
    conditions: Vec<String>,
}

/// Raw YAML shape of a checklist definition file.
#[derive(Debug, Deserialize)]
struct RawChecklist {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    triggers: Vec<String>,
    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    project_types: Vec<String>,
    #[serde(default)]
    conditions: Vec<String>,
}

/// One definition whose triggers matched a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Name of the matched definition
    pub name: String,
    /// Whether the match is a workflow or a checklist
    pub kind: DefinitionKind,
    /// Description of the matched definition
    pub description: String,
}

#[derive(Debug, Default)]
struct Cache {
    workflows: HashMap<String, WorkflowDefinition>,
    checklists: HashMap<String, ChecklistDefinition>,
    timestamps: HashMap<PathBuf, SystemTime>,
}

/// Definition registry with reload-if-stale caching.
#[derive(Debug)]
pub struct Registry {
    dir: PathBuf,
    cache: Option<Cache>,
}

impl Registry {
    /// Creates a registry over a definitions directory. Nothing is read
    /// until the first access.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, cache: None }
    }

    /// The directory definitions are loaded from.
    pub fn definitions_dir(&self) -> &Path {
        &self.dir
    }

    fn checklists_dir(&self) -> PathBuf {
        self.dir.join("checklists")
    }

    /// Revalidates the cache against the current source files, reloading on
    /// any addition, removal, or newer timestamp.
    fn ensure_loaded(&mut self) {
        let current = scan_sources(&self.dir);
        let valid = self
            .cache
            .as_ref()
            .is_some_and(|cache| cache.timestamps == current);
        if !valid {
            self.cache = Some(self.load_all(current));
        }
    }

    /// Loads every definition file, skipping invalid ones. Falls back to
    /// the built-in set when nothing valid was found.
    fn load_all(&self, timestamps: HashMap<PathBuf, SystemTime>) -> Cache {
        let checklists_dir = self.checklists_dir();
        let mut workflows = HashMap::new();
        let mut checklists = HashMap::new();

        for path in timestamps.keys() {
            if path.starts_with(&checklists_dir) {
                match load_checklist_file(path) {
                    Ok(checklist) => {
                        checklists.insert(checklist.name.clone(), checklist);
                    }
                    Err(e) => warn!("skipping checklist {}: {e}", path.display()),
                }
            } else {
                match load_workflow_file(path) {
                    Ok(workflow) => {
                        workflows.insert(workflow.name.clone(), workflow);
                    }
                    Err(e) => warn!("skipping workflow {}: {e}", path.display()),
                }
            }
        }

        if workflows.is_empty() && checklists.is_empty() {
            debug!(
                "no valid definitions under {}, using built-in defaults",
                self.dir.display()
            );
            let (default_workflows, default_checklists) = builtin::defaults();
            workflows = default_workflows;
            checklists = default_checklists;
        } else {
            debug!(
                "loaded {} workflows and {} checklists from {}",
                workflows.len(),
                checklists.len(),
                self.dir.display()
            );
        }

        Cache {
            workflows,
            checklists,
            timestamps,
        }
    }

    fn cache(&mut self) -> &Cache {
        self.ensure_loaded();
        // ensure_loaded always leaves the cache populated
        self.cache.get_or_insert_with(Cache::default)
    }

    /// All workflow definitions, sorted by name.
    pub fn workflows(&mut self) -> Vec<WorkflowDefinition> {
        let mut all: Vec<_> = self.cache().workflows.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// All checklist definitions, sorted by name.
    pub fn checklists(&mut self) -> Vec<ChecklistDefinition> {
        let mut all: Vec<_> = self.cache().checklists.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Looks up a workflow by name. Absence is not an error.
    pub fn get_workflow(&mut self, name: &str) -> Option<WorkflowDefinition> {
        self.cache().workflows.get(name).cloned()
    }

    /// Looks up a checklist by name. Absence is not an error.
    pub fn get_checklist(&mut self, name: &str) -> Option<ChecklistDefinition> {
        self.cache().checklists.get(name).cloned()
    }

    /// Resolves a name to session-ready steps: workflows first, then
    /// checklists (items become advisory steps).
    pub fn resolve_steps(&mut self, name: &str) -> Option<(String, Vec<Step>)> {
        if let Some(workflow) = self.get_workflow(name) {
            return Some((workflow.name, workflow.steps));
        }
        self.get_checklist(name)
            .map(|checklist| (checklist.name.clone(), checklist.items_as_steps()))
    }

    /// Case-insensitive substring match of a prompt against every trigger
    /// of every definition. Results are sorted by name for determinism.
    pub fn match_prompt(&mut self, prompt: &str) -> Vec<TriggerMatch> {
        let needle = prompt.to_lowercase();
        let cache = self.cache();

        let mut matches: Vec<TriggerMatch> = cache
            .workflows
            .values()
            .filter(|w| matches_any_trigger(&needle, &w.triggers))
            .map(|w| TriggerMatch {
                name: w.name.clone(),
                kind: DefinitionKind::Workflow,
                description: w.description.clone(),
            })
            .chain(
                cache
                    .checklists
                    .values()
                    .filter(|c| matches_any_trigger(&needle, &c.triggers))
                    .map(|c| TriggerMatch {
                        name: c.name.clone(),
                        kind: DefinitionKind::Checklist,
                        description: c.description.clone().unwrap_or_default(),
                    }),
            )
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }
}

fn matches_any_trigger(lowercase_prompt: &str, triggers: &[String]) -> bool {
    triggers
        .iter()
        .any(|t| !t.is_empty() && lowercase_prompt.contains(&t.to_lowercase()))
}

/// Collects every YAML source under the definitions directory with its
/// modification timestamp. Unreadable entries are simply absent, which the
/// cache comparison treats as a change.
fn scan_sources(dir: &Path) -> HashMap<PathBuf, SystemTime> {
    let mut sources = HashMap::new();
    collect_yaml(dir, &mut sources);
    sources
}

fn collect_yaml(dir: &Path, sources: &mut HashMap<PathBuf, SystemTime>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_yaml(&path, sources);
        } else if is_yaml(&path) {
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                sources.insert(path, modified);
            }
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

fn load_workflow_file(path: &Path) -> Result<WorkflowDefinition> {
    let text = fs::read_to_string(path).map_err(|e| CompassError::persistence(path, e))?;
    let raw: RawWorkflow =
        serde_yaml::from_str(&text).map_err(|e| CompassError::DefinitionParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    validate(path, &raw.name, &raw.description, raw.steps.len(), "steps")?;

    Ok(WorkflowDefinition {
        name: raw.name,
        description: raw.description,
        triggers: raw.triggers,
        steps: raw.steps.into_iter().map(Step::from).collect(),
        dependencies: raw.dependencies,
        project_types: raw.project_types,
        conditions: raw.conditions,
    })
}

fn load_checklist_file(path: &Path) -> Result<ChecklistDefinition> {
    let text = fs::read_to_string(path).map_err(|e| CompassError::persistence(path, e))?;
    let raw: RawChecklist =
        serde_yaml::from_str(&text).map_err(|e| CompassError::DefinitionParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    // Checklist descriptions are optional; validate name and items only.
    validate(path, &raw.name, "-", raw.items.len(), "items")?;

    Ok(ChecklistDefinition {
        name: raw.name,
        description: raw.description,
        triggers: raw.triggers,
        items: raw.items,
        dependencies: raw.dependencies,
        project_types: raw.project_types,
        conditions: raw.conditions,
    })
}

fn validate(
    path: &Path,
    name: &str,
    description: &str,
    step_count: usize,
    steps_field: &str,
) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("missing or empty 'name'".to_string())
    } else if description.trim().is_empty() {
        Some("missing or empty 'description'".to_string())
    } else if step_count == 0 {
        Some(format!("'{steps_field}' must contain at least one entry"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CompassError::InvalidDefinition {
            path: path.to_path_buf(),
            reason,
        }),
        None => Ok(()),
    }
}
