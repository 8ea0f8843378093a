//! Input records
//!
//! Goals and projects as handed over by the data-fetch layer:
//! - identifiers for goals, projects, people and spaces
//! - people, spaces and timeframes
//! - goal and project records with their parent pointers

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Goal identifier
    GoalId
);
string_id!(
    /// Project identifier
    ProjectId
);
string_id!(
    /// Person identifier
    PersonId
);
string_id!(
    /// Space identifier
    SpaceId
);

/// A person acting as champion or reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique person id
    pub id: PersonId,
    /// Name shown as champion or reviewer
    pub full_name: String,
}

impl Person {
    /// Create a person
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<PersonId>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
        }
    }
}

/// A space (team or department) owning goals and projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Unique space id
    pub id: SpaceId,
    /// Display name
    pub name: String,
}

impl Space {
    /// Create a space
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<SpaceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Granularity a timeframe was picked with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeframeType {
    /// Calendar year
    #[default]
    Year,
    /// Calendar quarter
    Quarter,
    /// Calendar month
    Month,
    /// Custom day range
    Days,
}

/// Inclusive calendar range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    /// First day, inclusive
    pub start_date: NaiveDate,
    /// Last day, inclusive
    pub end_date: NaiveDate,
    /// Granularity picked in the UI
    #[serde(default, rename = "type")]
    pub kind: TimeframeType,
}

impl Timeframe {
    /// Create a timeframe of the given granularity
    #[inline]
    #[must_use]
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, kind: TimeframeType) -> Self {
        Self {
            start_date,
            end_date,
            kind,
        }
    }

    /// Whole-year timeframe
    #[must_use]
    pub fn year(year: i32) -> Option<Self> {
        Some(Self::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
            TimeframeType::Year,
        ))
    }

    /// Check whether two inclusive ranges share at least one day
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Timeframe) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

/// Health reported by the latest check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    /// Progressing as planned
    OnTrack,
    /// At risk
    Caution,
    /// Off track
    OffTrack,
}

/// Latest progress update on a goal or project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    /// When the check-in was submitted
    pub checked_in_at: DateTime<Utc>,
    /// Reported health
    pub status: CheckInStatus,
}

/// Goal as loaded from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Unique goal id
    pub id: GoalId,
    /// Display name
    pub name: String,
    /// Owning space
    pub space: Space,
    /// Person accountable for the goal
    #[serde(default)]
    pub champion: Option<Person>,
    /// Person reviewing the goal
    #[serde(default)]
    pub reviewer: Option<Person>,
    /// Parent goal, `None` for top-level goals
    #[serde(default)]
    pub parent_goal_id: Option<GoalId>,
    /// Period the goal is planned for
    #[serde(default)]
    pub timeframe: Option<Timeframe>,
    /// Whether the goal was closed
    #[serde(default)]
    pub is_closed: bool,
    /// When the goal was closed
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Latest check-in
    #[serde(default)]
    pub last_check_in: Option<CheckIn>,
    /// Percentage (0..=100) rolled up from the goal's targets
    #[serde(default)]
    pub progress: Option<f64>,
}

impl GoalRecord {
    /// Create an open, top-level goal
    #[must_use]
    pub fn new(id: impl Into<GoalId>, name: impl Into<String>, space: Space) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            space,
            champion: None,
            reviewer: None,
            parent_goal_id: None,
            timeframe: None,
            is_closed: false,
            closed_at: None,
            last_check_in: None,
            progress: None,
        }
    }
}

/// Project lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work in progress
    #[default]
    Active,
    /// On hold
    Paused,
    /// Finished or cancelled
    Closed,
}

/// Milestone state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    /// Not reached yet
    #[default]
    Pending,
    /// Reached
    Done,
}

/// Project milestone, only counted for completion info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone title
    pub title: String,
    /// Progress state
    #[serde(default)]
    pub status: MilestoneStatus,
}

/// Project as loaded from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique project id
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Owning space
    pub space: Space,
    /// Person accountable for the project
    #[serde(default)]
    pub champion: Option<Person>,
    /// Person reviewing the project
    #[serde(default)]
    pub reviewer: Option<Person>,
    /// Parent goal, if the project contributes to one
    #[serde(default)]
    pub goal_id: Option<GoalId>,
    /// Lifecycle state
    #[serde(default)]
    pub status: ProjectStatus,
    /// When work started
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When the project was closed
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Target end date
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Milestones in display order
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Latest check-in
    #[serde(default)]
    pub last_check_in: Option<CheckIn>,
}

impl ProjectRecord {
    /// Create an active project with no parent goal
    #[must_use]
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>, space: Space) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            space,
            champion: None,
            reviewer: None,
            goal_id: None,
            status: ProjectStatus::Active,
            started_at: None,
            closed_at: None,
            deadline: None,
            milestones: Vec::new(),
            last_check_in: None,
        }
    }

    /// Count of (done, total) milestones
    #[must_use]
    pub fn milestone_counts(&self) -> (usize, usize) {
        let done = self
            .milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Done)
            .count();
        (done, self.milestones.len())
    }
}
