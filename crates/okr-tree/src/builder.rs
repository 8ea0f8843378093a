//! Tree builder
//!
//! Turns flat goal/project records into the ordered forest a goal list view
//! renders. The pipeline runs in four passes over the candidate arena:
//! 1. **Filter**: mark candidates matching every visibility rule
//! 2. **Retain**: keep the ancestors of every match for context
//! 3. **Assemble**: link retained candidates, orphans become roots
//! 4. **Sort**: order every sibling group, closed nodes last

use crate::candidate::Candidate;
use crate::error::{IdentityFilter, TreeError};
use crate::index::CandidateIndex;
use crate::node::Node;
use crate::options::{PersonFilter, TreeOptions};
use crate::sort::SiblingOrder;
use crate::types::{GoalRecord, Person, ProjectRecord};

/// Default bound on ancestor chains
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Builds forests for one set of options
///
/// The builder owns no state between calls: every [`TreeBuilder::build`] is
/// a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    options: TreeOptions,
    max_depth: usize,
}

impl TreeBuilder {
    /// Create a builder for the given options
    #[inline]
    #[must_use]
    pub fn new(options: TreeOptions) -> Self {
        Self {
            options,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// With a bound on how deep parent chains may go
    ///
    /// `usize::MAX` disables the bound. Building and dropping a forest is
    /// iterative; the derived `Clone`, `PartialEq`, `Debug` and `Serialize`
    /// of [`Node`] still recurse once per level.
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Options this builder filters and sorts with
    #[inline]
    #[must_use]
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Build the forest
    ///
    /// # Arguments
    /// * `current_user` - Person "me" refers to in `owned_by` / `reviewed_by`
    /// * `goals` - All goals visible to the caller
    /// * `projects` - All projects visible to the caller
    ///
    /// # Errors
    /// - [`TreeError::MissingCurrentUser`] if a "me" filter is set without a user
    /// - [`TreeError::CycleDetected`] if goal parent pointers loop
    /// - [`TreeError::DepthLimitExceeded`] if a parent chain exceeds the bound
    pub fn build(
        &self,
        current_user: Option<&Person>,
        goals: &[GoalRecord],
        projects: &[ProjectRecord],
    ) -> Result<Vec<Node>, TreeError> {
        let owner = resolve_identity(self.options.owned_by, IdentityFilter::OwnedBy, current_user)?;
        let reviewer =
            resolve_identity(self.options.reviewed_by, IdentityFilter::ReviewedBy, current_user)?;

        let index = CandidateIndex::new(goals, projects, self.max_depth)?;
        let scope = self.scope(&index);

        let matches = self.filter(&index, &scope, owner, reviewer);
        let retained = self.retain(&index, &scope, &matches);

        let order = SiblingOrder::new(self.options.sort_column, self.options.sort_direction);
        let forest = assemble(&index, &retained, &matches, order);

        tracing::debug!(
            "Built goal tree: {} candidates, {} matching, {} retained, {} roots",
            index.len(),
            matches.iter().filter(|m| **m).count(),
            retained.iter().filter(|r| **r).count(),
            forest.len()
        );

        Ok(forest)
    }

    /// Candidates allowed by the `goal_id` restriction
    fn scope(&self, index: &CandidateIndex<'_>) -> Vec<bool> {
        match &self.options.goal_id {
            None => vec![true; index.len()],
            Some(goal_id) => match index.goal(goal_id.as_str()) {
                Some(root) => index.descendants_mask(root),
                None => {
                    tracing::debug!("Scoped goal {} not found, tree is empty", goal_id);
                    vec![false; index.len()]
                }
            },
        }
    }

    /// Raw visibility of every candidate
    fn filter(
        &self,
        index: &CandidateIndex<'_>,
        scope: &[bool],
        owner: Option<&Person>,
        reviewer: Option<&Person>,
    ) -> Vec<bool> {
        let owned = subtree_matches(index, owner, Candidate::championed_by);
        let reviewed = subtree_matches(index, reviewer, Candidate::reviewed_by);

        (0..index.len())
            .map(|idx| {
                let candidate = index.get(idx);
                scope[idx]
                    && candidate.kind_enabled(&self.options)
                    && candidate.status_enabled(&self.options)
                    && candidate.in_range(&self.options)
                    && owned[idx]
                    && reviewed[idx]
            })
            .collect()
    }

    /// Matches plus every in-scope ancestor of a match
    ///
    /// Ancestors are kept whatever their status, owner, space or timeframe,
    /// but only while goals are shown at all.
    fn retain(&self, index: &CandidateIndex<'_>, scope: &[bool], matches: &[bool]) -> Vec<bool> {
        let mut retained = matches.to_vec();
        if !self.options.show_goals {
            return retained;
        }

        for idx in (0..index.len()).filter(|&i| matches[i]) {
            let mut cursor = index.parent(idx);
            while let Some(parent) = cursor {
                if retained[parent] || !scope[parent] {
                    break;
                }
                retained[parent] = true;
                cursor = index.parent(parent);
            }
        }

        retained
    }
}

/// `Some(person)` when the filter is "me", checking the precondition
fn resolve_identity(
    filter: PersonFilter,
    which: IdentityFilter,
    current_user: Option<&Person>,
) -> Result<Option<&Person>, TreeError> {
    match filter {
        PersonFilter::Anyone => Ok(None),
        PersonFilter::Me => current_user
            .map(Some)
            .ok_or(TreeError::MissingCurrentUser { filter: which }),
    }
}

/// Per candidate: does it or one of its ancestors satisfy `predicate`
///
/// Without a person every candidate passes.
fn subtree_matches<'a>(
    index: &CandidateIndex<'a>,
    person: Option<&Person>,
    predicate: impl Fn(&Candidate<'a>, &Person) -> bool,
) -> Vec<bool> {
    let Some(person) = person else {
        return vec![true; index.len()];
    };

    let mut result = vec![false; index.len()];
    for &idx in index.top_down() {
        let inherited = index.parent(idx).is_some_and(|p| result[p]);
        result[idx] = inherited || predicate(index.get(idx), person);
    }
    result
}

/// Link retained candidates into sorted trees
///
/// Nodes are built bottom-up over the parents-first order, so chain length
/// never grows the call stack.
fn assemble(
    index: &CandidateIndex<'_>,
    retained: &[bool],
    matches: &[bool],
    order: SiblingOrder,
) -> Vec<Node> {
    let retained_parent = |idx: usize| index.parent(idx).filter(|&p| retained[p]);
    let sorted = |mut group: Vec<usize>| {
        group.sort_by(|&a, &b| order.compare(index.get(a), index.get(b)));
        group
    };

    // Distance from the nearest retained root.
    let mut depths = vec![0usize; index.len()];
    for &idx in index.top_down() {
        if let Some(parent) = retained_parent(idx) {
            depths[idx] = depths[parent] + 1;
        }
    }

    let mut built: Vec<Option<Node>> = (0..index.len()).map(|_| None).collect();
    for &idx in index.top_down().iter().rev() {
        if !retained[idx] {
            continue;
        }
        let group = index
            .children(idx)
            .iter()
            .copied()
            .filter(|&child| retained[child])
            .collect();
        let children = sorted(group)
            .into_iter()
            .filter_map(|child| built[child].take())
            .collect();

        let candidate = index.get(idx);
        built[idx] = Some(Node {
            id: candidate.id.to_string(),
            name: candidate.name.to_string(),
            depth: depths[idx],
            status: candidate.status,
            space: candidate.space.clone(),
            champion: candidate.champion.cloned(),
            reviewer: candidate.reviewer.cloned(),
            parent_id: retained_parent(idx).map(|p| index.get(p).id.to_string()),
            matches_filters: matches[idx],
            details: candidate.details.clone(),
            children,
        });
    }

    let roots = (0..index.len())
        .filter(|&idx| retained[idx] && retained_parent(idx).is_none())
        .collect();
    sorted(roots)
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect()
}

/// Build the forest with default builder settings
///
/// Shorthand for `TreeBuilder::new(options.clone()).build(..)`.
///
/// # Errors
/// See [`TreeBuilder::build`].
pub fn build_tree(
    current_user: Option<&Person>,
    goals: &[GoalRecord],
    projects: &[ProjectRecord],
    options: &TreeOptions,
) -> Result<Vec<Node>, TreeError> {
    TreeBuilder::new(options.clone()).build(current_user, goals, projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{count_nodes, find_node, render_outline, NodeKind};
    use crate::types::{ProjectStatus, Space};

    fn company() -> Space {
        Space::new("company", "Company")
    }

    fn goal(id: &str, parent: Option<&str>) -> GoalRecord {
        let mut goal = GoalRecord::new(id, id, company());
        goal.parent_goal_id = parent.map(Into::into);
        goal
    }

    fn closed_goal(id: &str, parent: Option<&str>) -> GoalRecord {
        let mut goal = goal(id, parent);
        goal.is_closed = true;
        goal
    }

    fn project(id: &str, goal_id: Option<&str>) -> ProjectRecord {
        let mut project = ProjectRecord::new(id, id, company());
        project.goal_id = goal_id.map(Into::into);
        project
    }

    fn all_types() -> TreeOptions {
        TreeOptions::new().with_types(true, true)
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        let forest = build_tree(None, &[], &[], &TreeOptions::default()).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn assembles_depths_and_parent_ids() {
        let goals = vec![goal("g1", None), goal("g2", Some("g1")), goal("g3", Some("g2"))];
        let projects = vec![project("p1", Some("g2"))];
        let forest = build_tree(None, &goals, &projects, &all_types()).unwrap();

        assert_eq!(render_outline(&forest), "g1\n  g2\n    g3\n    [project] p1\n");
        let p1 = find_node(&forest, "p1").unwrap();
        assert_eq!(p1.depth, 2);
        assert_eq!(p1.parent_id.as_deref(), Some("g2"));
        assert_eq!(p1.kind(), NodeKind::Project);
        assert!(forest[0].parent_id.is_none());
    }

    #[test]
    fn retained_ancestors_do_not_match_filters() {
        let goals = vec![closed_goal("g1", None), goal("g2", Some("g1"))];
        let forest = build_tree(None, &goals, &[], &TreeOptions::default()).unwrap();

        assert_eq!(count_nodes(&forest), 2);
        assert!(!forest[0].matches_filters);
        assert!(forest[0].children[0].matches_filters);
    }

    #[test]
    fn unmatched_subtrees_are_dropped() {
        let goals = vec![goal("g1", None), closed_goal("g2", Some("g1"))];
        let forest = build_tree(None, &goals, &[], &TreeOptions::default()).unwrap();

        assert_eq!(render_outline(&forest), "g1\n");
        assert!(!forest[0].has_children());
    }

    #[test]
    fn hidden_goals_orphan_projects_to_roots() {
        let goals = vec![goal("g1", None)];
        let projects = vec![project("p1", Some("g1"))];
        let options = TreeOptions::new().with_types(false, true);
        let forest = build_tree(None, &goals, &projects, &options).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "p1");
        assert_eq!(forest[0].depth, 0);
        assert!(forest[0].parent_id.is_none());
    }

    #[test]
    fn paused_projects_need_show_paused() {
        let goals = vec![goal("g1", None)];
        let mut paused = project("p1", Some("g1"));
        paused.status = ProjectStatus::Paused;
        let projects = vec![paused];

        let forest = build_tree(None, &goals, &projects, &all_types()).unwrap();
        assert!(find_node(&forest, "p1").is_none());

        let options = all_types().with_statuses(true, true, false);
        let forest = build_tree(None, &goals, &projects, &options).unwrap();
        assert!(find_node(&forest, "p1").is_some());
    }

    #[test]
    fn unknown_scope_goal_yields_empty_forest() {
        let goals = vec![goal("g1", None)];
        let options = TreeOptions::new().under_goal("nope");
        assert!(build_tree(None, &goals, &[], &options).unwrap().is_empty());
    }

    #[test]
    fn me_filter_requires_user() {
        let options = TreeOptions::new().owned_by_me();
        let err = build_tree(None, &[], &[], &options).unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingCurrentUser {
                filter: IdentityFilter::OwnedBy
            }
        );

        let options = TreeOptions::new().reviewed_by_me();
        let err = build_tree(None, &[], &[], &options).unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingCurrentUser {
                filter: IdentityFilter::ReviewedBy
            }
        );
    }

    #[test]
    fn cycles_surface_as_errors() {
        let goals = vec![goal("a", Some("b")), goal("b", Some("a"))];
        let err = build_tree(None, &goals, &[], &TreeOptions::default()).unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn builder_exposes_options_and_depth_bound() {
        let goals = vec![goal("g1", None), goal("g2", Some("g1")), goal("g3", Some("g2"))];
        let builder = TreeBuilder::new(TreeOptions::default()).with_max_depth(1);

        assert_eq!(builder.options(), &TreeOptions::default());
        assert!(matches!(
            builder.build(None, &goals, &[]),
            Err(TreeError::DepthLimitExceeded { limit: 1, .. })
        ));

        let unbounded = TreeBuilder::new(TreeOptions::default()).with_max_depth(usize::MAX);
        let forest = unbounded.build(None, &goals, &[]).unwrap();
        assert_eq!(render_outline(&forest), "g1\n  g2\n    g3\n");
    }

    #[test]
    fn deep_chain_within_bound_builds_and_drops() {
        const LEN: usize = 100_000;
        let goals: Vec<GoalRecord> = (0..LEN)
            .map(|i| {
                let parent = i.checked_sub(1).map(|p| format!("g{p}"));
                goal(&format!("g{i}"), parent.as_deref())
            })
            .collect();

        let forest = TreeBuilder::new(TreeOptions::default())
            .with_max_depth(LEN)
            .build(None, &goals, &[])
            .unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(count_nodes(&forest), LEN);
        let deepest = find_node(&forest, "g99999").unwrap();
        assert_eq!(deepest.depth, LEN - 1);
        assert_eq!(deepest.parent_id.as_deref(), Some("g99998"));
        drop(forest);
    }
}
