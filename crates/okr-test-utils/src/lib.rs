//! Testing utilities for the OKR tree workspace
//!
//! Shared record fixtures and forest assertions.

#![allow(missing_docs)]

use chrono::{NaiveDate, TimeZone, Utc};
use okr_tree::{
    walk_forest, GoalRecord, Milestone, MilestoneStatus, Node, Person, ProjectRecord,
    ProjectStatus, Space, Timeframe, TimeframeType,
};
use std::collections::HashSet;

pub fn company() -> Space {
    Space::new("company", "Company")
}

pub fn marketing() -> Space {
    Space::new("marketing", "Marketing")
}

pub fn me() -> Person {
    Person::new("me", "Mary Maker")
}

pub fn someone_else() -> Person {
    Person::new("other", "Otto Other")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn quarter(year: i32, quarter: u32) -> Timeframe {
    let start = date(year, quarter * 3 - 2, 1);
    let end = if quarter == 4 {
        date(year, 12, 31)
    } else {
        date(year, quarter * 3 + 1, 1).pred_opt().unwrap()
    };
    Timeframe::new(start, end, TimeframeType::Quarter)
}

/// Open goal named after its id, in the company space
pub fn create_goal(id: &str, parent: Option<&str>) -> GoalRecord {
    let mut goal = GoalRecord::new(id, id, company());
    goal.parent_goal_id = parent.map(Into::into);
    goal
}

pub fn create_closed_goal(id: &str, parent: Option<&str>) -> GoalRecord {
    let mut goal = create_goal(id, parent);
    goal.is_closed = true;
    goal.closed_at = Some(Utc.with_ymd_and_hms(2024, 6, 30, 17, 0, 0).unwrap());
    goal
}

pub fn create_goal_in(id: &str, parent: Option<&str>, space: Space) -> GoalRecord {
    let mut goal = create_goal(id, parent);
    goal.space = space;
    goal
}

pub fn create_goal_owned_by(id: &str, parent: Option<&str>, champion: Person) -> GoalRecord {
    let mut goal = create_goal(id, parent);
    goal.champion = Some(champion);
    goal
}

/// Active project named after its id, in the company space
pub fn create_project(id: &str, goal: Option<&str>) -> ProjectRecord {
    let mut project = ProjectRecord::new(id, id, company());
    project.goal_id = goal.map(Into::into);
    project
}

pub fn create_project_with_status(
    id: &str,
    goal: Option<&str>,
    status: ProjectStatus,
) -> ProjectRecord {
    let mut project = create_project(id, goal);
    project.status = status;
    project
}

pub fn with_milestones(mut project: ProjectRecord, done: usize, pending: usize) -> ProjectRecord {
    let done = (0..done).map(|i| Milestone {
        title: format!("done {i}"),
        status: MilestoneStatus::Done,
    });
    let pending = (0..pending).map(|i| Milestone {
        title: format!("pending {i}"),
        status: MilestoneStatus::Pending,
    });
    project.milestones = done.chain(pending).collect();
    project
}

/// Ids in display order, indented two spaces per level
pub fn id_outline(forest: &[Node]) -> String {
    walk_forest(forest)
        .map(|n| format!("{}{}\n", "  ".repeat(n.depth), n.id))
        .collect()
}

/// Ids of one sibling group
pub fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

/// Depths, parent links and uniqueness hold across the whole forest
pub fn assert_forest_integrity(forest: &[Node]) {
    fn check(node: &Node, depth: usize, parent: Option<&str>, seen: &mut HashSet<(bool, String)>) {
        assert_eq!(node.depth, depth, "depth of {}", node.id);
        assert_eq!(node.parent_id.as_deref(), parent, "parent of {}", node.id);
        let key = (node.kind() == okr_tree::NodeKind::Goal, node.id.clone());
        assert!(seen.insert(key), "{} appears twice", node.id);
        for child in &node.children {
            check(child, depth + 1, Some(&node.id), seen);
        }
    }

    let mut seen = HashSet::new();
    for root in forest {
        check(root, 0, None, &mut seen);
    }
}
