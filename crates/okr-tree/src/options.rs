//! Tree options
//!
//! Filter and sort configuration for a single build, usually driven by the
//! filter widgets of a goal list view. Loadable from TOML/JSON; every field
//! falls back to the default baseline when omitted.

use crate::types::{GoalId, SpaceId, Timeframe};
use serde::{Deserialize, Serialize};

/// Column siblings are ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    /// Node name
    #[default]
    Name,
    /// Goal timeframe or project deadline
    Timeframe,
    /// Goal progress or project milestone completion
    Progress,
    /// Date of the latest check-in
    LastCheckIn,
    /// Champion name
    Champion,
    /// Space name
    Space,
}

impl SortColumn {
    /// All columns, in menu order
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Name,
        SortColumn::Timeframe,
        SortColumn::Progress,
        SortColumn::LastCheckIn,
        SortColumn::Champion,
        SortColumn::Space,
    ];

    /// Stable identifier used in config files and on the command line
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Timeframe => "timeframe",
            SortColumn::Progress => "progress",
            SortColumn::LastCheckIn => "last_check_in",
            SortColumn::Champion => "champion",
            SortColumn::Space => "space",
        }
    }
}

impl std::str::FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown sort column: {s}"))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

/// Identity filter for champion / reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonFilter {
    /// No restriction
    #[default]
    Anyone,
    /// The current user
    Me,
}

/// Filter and sort configuration for one build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Column siblings are ordered by
    pub sort_column: SortColumn,
    /// Direction of the column comparison
    pub sort_direction: SortDirection,
    /// Show open goals and active projects
    pub show_active: bool,
    /// Show paused projects
    pub show_paused: bool,
    /// Show closed goals and projects
    pub show_completed: bool,
    /// Show goals
    pub show_goals: bool,
    /// Show projects
    pub show_projects: bool,
    /// Restrict to work championed by the current user
    pub owned_by: PersonFilter,
    /// Restrict to work reviewed by the current user
    pub reviewed_by: PersonFilter,
    /// Only show work overlapping this range
    pub timeframe: Option<Timeframe>,
    /// Only show work in this space (ancestors from other spaces are retained)
    pub space_id: Option<SpaceId>,
    /// Restrict the forest to the strict descendants of this goal
    pub goal_id: Option<GoalId>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            sort_column: SortColumn::Name,
            sort_direction: SortDirection::Asc,
            show_active: true,
            show_paused: false,
            show_completed: false,
            show_goals: true,
            show_projects: false,
            owned_by: PersonFilter::Anyone,
            reviewed_by: PersonFilter::Anyone,
            timeframe: None,
            space_id: None,
            goal_id: None,
        }
    }
}

impl TreeOptions {
    /// Create options with the default baseline
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With sort column and direction
    #[inline]
    #[must_use]
    pub fn with_sort(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.sort_column = column;
        self.sort_direction = direction;
        self
    }

    /// With status toggles (active, paused, completed)
    #[inline]
    #[must_use]
    pub fn with_statuses(mut self, active: bool, paused: bool, completed: bool) -> Self {
        self.show_active = active;
        self.show_paused = paused;
        self.show_completed = completed;
        self
    }

    /// With type toggles (goals, projects)
    #[inline]
    #[must_use]
    pub fn with_types(mut self, goals: bool, projects: bool) -> Self {
        self.show_goals = goals;
        self.show_projects = projects;
        self
    }

    /// Only subtrees championed by the current user
    #[inline]
    #[must_use]
    pub fn owned_by_me(mut self) -> Self {
        self.owned_by = PersonFilter::Me;
        self
    }

    /// Only subtrees reviewed by the current user
    #[inline]
    #[must_use]
    pub fn reviewed_by_me(mut self) -> Self {
        self.reviewed_by = PersonFilter::Me;
        self
    }

    /// Only work in the given space
    #[inline]
    #[must_use]
    pub fn in_space(mut self, space_id: impl Into<SpaceId>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    /// Only work overlapping the given range
    #[inline]
    #[must_use]
    pub fn within(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// Only the descendants of the given goal
    #[inline]
    #[must_use]
    pub fn under_goal(mut self, goal_id: impl Into<GoalId>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    /// Whether any filter needs the current user
    #[inline]
    #[must_use]
    pub fn needs_current_user(&self) -> bool {
        self.owned_by == PersonFilter::Me || self.reviewed_by == PersonFilter::Me
    }
}
