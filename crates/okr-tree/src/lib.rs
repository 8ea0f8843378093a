//! OKR Tree
//!
//! Builds the goal/project hierarchy shown by goal list views.
//!
//! # Overview
//!
//! Goals point at their parent goal, projects at the goal they contribute
//! to. [`build_tree`] turns those flat records into an ordered forest:
//! - **Filter**: status, type, owner, reviewer, space, timeframe and subtree
//!   toggles from [`TreeOptions`]
//! - **Retain**: ancestors of every visible node stay in the tree for context
//! - **Sort**: sibling groups by a [`SortColumn`], closed nodes always last
//!
//! The builder is a pure function of its inputs; memoizing results is up to
//! the caller.
//!
//! # Example
//!
//! ```rust
//! use okr_tree::{build_tree, render_outline, GoalRecord, Space, TreeOptions};
//!
//! let company = Space::new("s1", "Company");
//! let mut closed = GoalRecord::new("g1", "Grow revenue", company.clone());
//! closed.is_closed = true;
//! let mut open = GoalRecord::new("g2", "Win enterprise deals", company);
//! open.parent_goal_id = Some("g1".into());
//!
//! // Only active work is shown, but the closed parent stays for context.
//! let forest = build_tree(None, &[closed, open], &[], &TreeOptions::default()).unwrap();
//! assert_eq!(
//!     render_outline(&forest),
//!     "Grow revenue (closed)\n  Win enterprise deals\n"
//! );
//! assert!(!forest[0].matches_filters);
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod error;
pub mod node;
pub mod options;
pub mod types;

mod candidate;
mod index;
mod sort;

// Re-exports
pub use builder::{build_tree, TreeBuilder, DEFAULT_MAX_DEPTH};
pub use error::{IdentityFilter, TreeError};
pub use node::{
    count_nodes, find_node, render_outline, walk_forest, GoalDetails, Node, NodeDetails,
    NodeKind, ProjectDetails, Walk, WorkStatus,
};
pub use options::{PersonFilter, SortColumn, SortDirection, TreeOptions};
pub use types::{
    CheckIn, CheckInStatus, GoalId, GoalRecord, Milestone, MilestoneStatus, Person, PersonId,
    ProjectId, ProjectRecord, ProjectStatus, Space, SpaceId, Timeframe, TimeframeType,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building goal trees
    pub use crate::{
        build_tree, GoalRecord, Node, NodeKind, Person, ProjectRecord, SortColumn,
        SortDirection, TreeBuilder, TreeError, TreeOptions,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
