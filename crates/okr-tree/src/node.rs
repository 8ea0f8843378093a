//! Output nodes
//!
//! A [`Node`] wraps either a goal or a project with hierarchy metadata.
//! Fields shared by both kinds live on the node itself, kind-specific data
//! in [`NodeDetails`].

use crate::types::{CheckIn, Person, Space, Timeframe};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Node type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Built from a [`GoalRecord`](crate::GoalRecord)
    Goal,
    /// Built from a [`ProjectRecord`](crate::ProjectRecord)
    Project,
}

/// Status class driving the show-active/paused/completed toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Open goal or active project
    Active,
    /// Paused project
    Paused,
    /// Closed goal or project
    Completed,
}

/// Goal-specific node data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDetails {
    /// Period the goal is planned for
    pub timeframe: Option<Timeframe>,
    /// Percentage rolled up from targets
    pub progress: Option<f64>,
    /// When the goal was closed
    pub closed_at: Option<DateTime<Utc>>,
    /// Latest check-in
    pub last_check_in: Option<CheckIn>,
}

/// Project-specific node data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetails {
    /// When work started
    pub started_at: Option<DateTime<Utc>>,
    /// When the project was closed
    pub closed_at: Option<DateTime<Utc>>,
    /// Target end date
    pub deadline: Option<NaiveDate>,
    /// Milestones marked done
    pub milestones_done: usize,
    /// All milestones
    pub milestones_total: usize,
    /// Latest check-in
    pub last_check_in: Option<CheckIn>,
}

/// Kind-specific node data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDetails {
    /// Goal data
    Goal(GoalDetails),
    /// Project data
    Project(ProjectDetails),
}

impl NodeDetails {
    /// Goal progress, or the share of done milestones of a project
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        match self {
            NodeDetails::Goal(goal) => goal.progress,
            NodeDetails::Project(project) if project.milestones_total > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let ratio = project.milestones_done as f64 / project.milestones_total as f64;
                Some(ratio * 100.0)
            }
            NodeDetails::Project(_) => None,
        }
    }

    /// Latest check-in of either kind
    #[must_use]
    pub fn last_check_in(&self) -> Option<&CheckIn> {
        match self {
            NodeDetails::Goal(goal) => goal.last_check_in.as_ref(),
            NodeDetails::Project(project) => project.last_check_in.as_ref(),
        }
    }
}

/// One entry of the built forest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Goal or project id
    pub id: String,
    /// Display name
    pub name: String,
    /// 0 for roots
    pub depth: usize,
    /// Status class of the record
    pub status: WorkStatus,
    /// Owning space
    pub space: Space,
    /// Person accountable for the work
    pub champion: Option<Person>,
    /// Person reviewing the work
    pub reviewer: Option<Person>,
    /// Parent goal id, for lookups only
    pub parent_id: Option<String>,
    /// False when the node is only kept as an ancestor of a visible node
    pub matches_filters: bool,
    /// Kind-specific data
    pub details: NodeDetails,
    /// Sorted child nodes
    pub children: Vec<Node>,
}

impl Drop for Node {
    fn drop(&mut self) {
        // Detach descendants into a flat list so deep chains drop without recursion.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl Node {
    /// Type tag
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self.details {
            NodeDetails::Goal(_) => NodeKind::Goal,
            NodeDetails::Project(_) => NodeKind::Project,
        }
    }

    /// Whether any child was retained
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Closed goals and projects sort after open siblings
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == WorkStatus::Completed
    }

    /// Progress in percent, see [`NodeDetails::progress`]
    #[inline]
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.details.progress()
    }

    /// Latest check-in, if any
    #[inline]
    #[must_use]
    pub fn last_check_in(&self) -> Option<&CheckIn> {
        self.details.last_check_in()
    }

    /// Completion summary shown next to the node, e.g. `"2/5 milestones"`
    #[must_use]
    pub fn completion_label(&self) -> Option<String> {
        match &self.details {
            NodeDetails::Goal(goal) => goal.progress.map(|p| format!("{p:.0}%")),
            NodeDetails::Project(project) if project.milestones_total > 0 => Some(format!(
                "{}/{} milestones",
                project.milestones_done, project.milestones_total
            )),
            NodeDetails::Project(_) => None,
        }
    }

    /// Summary of direct children shown when the node is collapsed
    ///
    /// `"1 subgoal"`, `"3 subgoals, 2 projects"`, `None` without children.
    #[must_use]
    pub fn children_info_label(&self) -> Option<String> {
        let goals = self
            .children
            .iter()
            .filter(|c| c.kind() == NodeKind::Goal)
            .count();
        let projects = self.children.len() - goals;

        let parts: Vec<String> = [(goals, "subgoal"), (projects, "project")]
            .into_iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, noun)| pluralize(count, noun))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Depth-first pre-order walk over this node and its descendants
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Pre-order iterator returned by [`Node::walk`]
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Walk every tree of a forest in display order
pub fn walk_forest(forest: &[Node]) -> impl Iterator<Item = &Node> {
    forest.iter().flat_map(Node::walk)
}

/// Find a node anywhere in the forest
#[must_use]
pub fn find_node<'a>(forest: &'a [Node], id: &str) -> Option<&'a Node> {
    walk_forest(forest).find(|n| n.id == id)
}

/// Total number of nodes in the forest
#[must_use]
pub fn count_nodes(forest: &[Node]) -> usize {
    walk_forest(forest).count()
}

/// Indented text rendering, one node per line
///
/// Each line is two spaces per depth level followed by the name; completed
/// nodes get a ` (closed)` suffix and projects a `[project]` prefix.
#[must_use]
pub fn render_outline(forest: &[Node]) -> String {
    let mut out = String::new();
    for node in walk_forest(forest) {
        out.push_str(&"  ".repeat(node.depth));
        if node.kind() == NodeKind::Project {
            out.push_str("[project] ");
        }
        out.push_str(&node.name);
        if node.is_closed() {
            out.push_str(" (closed)");
        }
        out.push('\n');
    }
    out
}
