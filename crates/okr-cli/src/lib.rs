//! Command-line harness for the OKR tree builder
//!
//! Loads a JSON snapshot of goals and projects, applies options from a TOML
//! file and command-line overrides, and renders the resulting forest.

use anyhow::{bail, Context, Result};
use okr_tree::{
    build_tree, render_outline, GoalRecord, Person, ProjectRecord, SortColumn, SortDirection,
    TreeError, TreeOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Everything a goal list view loads before building its tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// People `--user` may refer to
    #[serde(default)]
    pub people: Vec<Person>,
    /// All goals
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    /// All projects
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    /// Look up a person by id
    pub fn person(&self, id: &str) -> Result<&Person> {
        self.people
            .iter()
            .find(|p| p.id.as_str() == id)
            .with_context(|| format!("unknown user {id}: not listed in snapshot people"))
    }
}

/// Read tree options from a TOML file, or the defaults when no file is given
pub fn load_options(path: Option<&Path>) -> Result<TreeOptions> {
    let Some(path) = path else {
        return Ok(TreeOptions::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse options {}", path.display()))
}

/// Command-line flags layered over file options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--sort`
    pub sort: Option<SortColumn>,
    /// `--desc`
    pub desc: bool,
    /// `--show-paused`
    pub show_paused: bool,
    /// `--show-completed`
    pub show_completed: bool,
    /// `--hide-active`
    pub hide_active: bool,
    /// `--hide-goals`
    pub hide_goals: bool,
    /// `--show-projects`
    pub show_projects: bool,
    /// `--owned-by-me`
    pub owned_by_me: bool,
    /// `--reviewed-by-me`
    pub reviewed_by_me: bool,
    /// `--space`
    pub space: Option<String>,
    /// `--goal`
    pub goal: Option<String>,
}

impl Overrides {
    /// Apply the flags that were set; unset flags keep the file value
    #[must_use]
    pub fn apply(self, mut options: TreeOptions) -> TreeOptions {
        if let Some(column) = self.sort {
            options.sort_column = column;
        }
        if self.desc {
            options.sort_direction = SortDirection::Desc;
        }
        options.show_paused |= self.show_paused;
        options.show_completed |= self.show_completed;
        options.show_projects |= self.show_projects;
        if self.hide_active {
            options.show_active = false;
        }
        if self.hide_goals {
            options.show_goals = false;
        }
        if self.owned_by_me {
            options = options.owned_by_me();
        }
        if self.reviewed_by_me {
            options = options.reviewed_by_me();
        }
        if let Some(space) = self.space {
            options = options.in_space(space);
        }
        if let Some(goal) = self.goal {
            options = options.under_goal(goal);
        }
        options
    }
}

/// How `build` prints the forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented text outline
    #[default]
    Outline,
    /// Pretty-printed JSON forest
    Json,
}

/// Build the forest for `snapshot` and render it
pub fn run_build(
    snapshot: &Snapshot,
    options: &TreeOptions,
    user: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let current_user = if options.needs_current_user() {
        user.map(|id| snapshot.person(id)).transpose()?
    } else {
        if let Some(id) = user {
            tracing::debug!("Ignoring user {}: no owned_by/reviewed_by filter is set", id);
        }
        None
    };
    let forest = build_tree(current_user, &snapshot.goals, &snapshot.projects, options)
        .context("failed to build goal tree")?;

    tracing::info!("Rendering {} root nodes", forest.len());

    match format {
        OutputFormat::Outline => Ok(render_outline(&forest)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&forest).context("failed to serialize forest")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Data problems found in a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// `(child id, missing parent id)`; these render as roots
    pub dangling: Vec<(String, String)>,
    /// Goal ids listed more than once
    pub duplicate_goals: Vec<String>,
    /// Project ids listed more than once
    pub duplicate_projects: Vec<String>,
    /// Cycle or runaway chain that prevents building any tree
    pub fatal: Option<TreeError>,
}

impl CheckReport {
    /// Cycles and runaway chains fail the check; the rest are warnings
    #[must_use]
    pub fn passed(&self) -> bool {
        self.fatal.is_none()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Snapshot Check")?;
        writeln!(f, "==============")?;
        writeln!(f, "Dangling parents: {}", self.dangling.len())?;
        for (child, parent) in &self.dangling {
            writeln!(f, "  {child} -> {parent}")?;
        }
        writeln!(f, "Duplicate goals: {}", self.duplicate_goals.len())?;
        for id in &self.duplicate_goals {
            writeln!(f, "  {id}")?;
        }
        writeln!(f, "Duplicate projects: {}", self.duplicate_projects.len())?;
        for id in &self.duplicate_projects {
            writeln!(f, "  {id}")?;
        }
        match &self.fatal {
            Some(err) => writeln!(f, "Result: FAIL ({err})"),
            None => writeln!(f, "Result: PASS"),
        }
    }
}

/// Report dangling parents, duplicate ids and cycles in `snapshot`
pub fn check(snapshot: &Snapshot) -> CheckReport {
    let goal_ids: HashSet<&str> = snapshot.goals.iter().map(|g| g.id.as_str()).collect();

    let goal_parents = snapshot
        .goals
        .iter()
        .filter_map(|g| Some((g.id.as_str(), g.parent_goal_id.as_ref()?.as_str())));
    let project_parents = snapshot
        .projects
        .iter()
        .filter_map(|p| Some((p.id.as_str(), p.goal_id.as_ref()?.as_str())));
    let dangling = goal_parents
        .chain(project_parents)
        .filter(|(_, parent)| !goal_ids.contains(parent))
        .map(|(child, parent)| (child.to_owned(), parent.to_owned()))
        .collect();

    let everything = TreeOptions::new()
        .with_statuses(true, true, true)
        .with_types(true, true);
    let fatal = build_tree(None, &snapshot.goals, &snapshot.projects, &everything)
        .err()
        .filter(TreeError::is_data_error);

    CheckReport {
        dangling,
        duplicate_goals: duplicates(snapshot.goals.iter().map(|g| g.id.as_str())),
        duplicate_projects: duplicates(snapshot.projects.iter().map(|p| p.id.as_str())),
        fatal,
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    ids.filter(|id| !seen.insert(*id) && reported.insert(*id))
        .map(str::to_owned)
        .collect()
}

/// Parse a `--sort` value
pub fn parse_sort_column(value: &str) -> Result<SortColumn> {
    match value.parse() {
        Ok(column) => Ok(column),
        Err(msg) => {
            let names: Vec<_> = SortColumn::ALL.iter().map(|c| c.as_str()).collect();
            bail!("{msg} (expected one of: {})", names.join(", "))
        }
    }
}
