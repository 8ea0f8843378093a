//! Candidate normalization
//!
//! Goals and projects are flattened into one uniform [`Candidate`] shape so
//! filtering, retention and sorting never branch on the record type.

use crate::node::{GoalDetails, NodeDetails, NodeKind, ProjectDetails, WorkStatus};
use crate::options::TreeOptions;
use crate::types::{GoalRecord, Person, ProjectRecord, ProjectStatus, Space, Timeframe};

/// Uniform view over a goal or project
#[derive(Debug, Clone)]
pub(crate) struct Candidate<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) kind: NodeKind,
    /// Parent goal id, from `parent_goal_id` or the project's `goal_id`
    pub(crate) parent_id: Option<&'a str>,
    pub(crate) status: WorkStatus,
    pub(crate) space: &'a Space,
    pub(crate) champion: Option<&'a Person>,
    pub(crate) reviewer: Option<&'a Person>,
    pub(crate) details: NodeDetails,
}

impl<'a> Candidate<'a> {
    pub(crate) fn from_goal(goal: &'a GoalRecord) -> Self {
        let status = if goal.is_closed {
            WorkStatus::Completed
        } else {
            WorkStatus::Active
        };

        Self {
            id: goal.id.as_str(),
            name: &goal.name,
            kind: NodeKind::Goal,
            parent_id: goal.parent_goal_id.as_ref().map(|id| id.as_str()),
            status,
            space: &goal.space,
            champion: goal.champion.as_ref(),
            reviewer: goal.reviewer.as_ref(),
            details: NodeDetails::Goal(GoalDetails {
                timeframe: goal.timeframe,
                progress: goal.progress,
                closed_at: goal.closed_at,
                last_check_in: goal.last_check_in.clone(),
            }),
        }
    }

    pub(crate) fn from_project(project: &'a ProjectRecord) -> Self {
        let status = match project.status {
            ProjectStatus::Closed => WorkStatus::Completed,
            ProjectStatus::Paused => WorkStatus::Paused,
            ProjectStatus::Active => WorkStatus::Active,
        };
        let (done, total) = project.milestone_counts();

        Self {
            id: project.id.as_str(),
            name: &project.name,
            kind: NodeKind::Project,
            parent_id: project.goal_id.as_ref().map(|id| id.as_str()),
            status,
            space: &project.space,
            champion: project.champion.as_ref(),
            reviewer: project.reviewer.as_ref(),
            details: NodeDetails::Project(ProjectDetails {
                started_at: project.started_at,
                closed_at: project.closed_at,
                deadline: project.deadline,
                milestones_done: done,
                milestones_total: total,
                last_check_in: project.last_check_in.clone(),
            }),
        }
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.status == WorkStatus::Completed
    }

    /// Type toggle for this candidate's kind
    pub(crate) fn kind_enabled(&self, options: &TreeOptions) -> bool {
        match self.kind {
            NodeKind::Goal => options.show_goals,
            NodeKind::Project => options.show_projects,
        }
    }

    /// Status toggle for this candidate's status class
    pub(crate) fn status_enabled(&self, options: &TreeOptions) -> bool {
        match self.status {
            WorkStatus::Active => options.show_active,
            WorkStatus::Paused => options.show_paused,
            WorkStatus::Completed => options.show_completed,
        }
    }

    /// Space and timeframe filters
    pub(crate) fn in_range(&self, options: &TreeOptions) -> bool {
        let space_ok = options
            .space_id
            .as_ref()
            .map_or(true, |space_id| &self.space.id == space_id);
        let timeframe_ok = options
            .timeframe
            .as_ref()
            .map_or(true, |range| self.covers(range));

        space_ok && timeframe_ok
    }

    /// Timeframe filter
    ///
    /// Goals without a timeframe always pass. Projects cover
    /// `[started_at, closed_at]`, a missing end leaving that side open.
    pub(crate) fn covers(&self, range: &Timeframe) -> bool {
        match &self.details {
            NodeDetails::Goal(goal) => goal.timeframe.map_or(true, |tf| tf.overlaps(range)),
            NodeDetails::Project(project) => {
                let start = project.started_at.map(|t| t.date_naive());
                let end = project.closed_at.map(|t| t.date_naive());
                start.map_or(true, |s| s <= range.end_date)
                    && end.map_or(true, |e| e >= range.start_date)
            }
        }
    }

    pub(crate) fn championed_by(&self, person: &Person) -> bool {
        self.champion.is_some_and(|c| c.id == person.id)
    }

    pub(crate) fn reviewed_by(&self, person: &Person) -> bool {
        self.reviewer.is_some_and(|r| r.id == person.id)
    }
}
