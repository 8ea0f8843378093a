//! Candidate arena
//!
//! Candidates live in one `Vec`; parent and child links are indices into it.
//! Construction resolves every parent pointer once, validates that the goal
//! hierarchy is acyclic and orders candidates parents-first, so later passes
//! never re-scan the record lists.

use crate::candidate::Candidate;
use crate::error::TreeError;
use crate::types::{GoalRecord, ProjectRecord};
use std::collections::HashMap;

/// Arena of normalized candidates with resolved links
#[derive(Debug)]
pub(crate) struct CandidateIndex<'a> {
    candidates: Vec<Candidate<'a>>,
    goals: HashMap<&'a str, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Indices sorted so every parent precedes its children
    top_down: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

impl<'a> CandidateIndex<'a> {
    /// Normalize and link the records
    ///
    /// Goals come first, then projects, each in input order. A record whose
    /// id was already seen for its kind is dropped.
    ///
    /// # Errors
    /// [`TreeError::CycleDetected`] when parent pointers loop, and
    /// [`TreeError::DepthLimitExceeded`] when a chain is deeper than `max_depth`.
    pub(crate) fn new(
        goals: &'a [GoalRecord],
        projects: &'a [ProjectRecord],
        max_depth: usize,
    ) -> Result<Self, TreeError> {
        let mut candidates = Vec::with_capacity(goals.len() + projects.len());
        let mut goal_ids: HashMap<&'a str, usize> = HashMap::with_capacity(goals.len());
        let mut project_ids: HashMap<&'a str, usize> = HashMap::with_capacity(projects.len());

        for goal in goals {
            let candidate = Candidate::from_goal(goal);
            if goal_ids.contains_key(candidate.id) {
                tracing::warn!("Dropping duplicate goal {}", candidate.id);
                continue;
            }
            goal_ids.insert(candidate.id, candidates.len());
            candidates.push(candidate);
        }

        for project in projects {
            let candidate = Candidate::from_project(project);
            if project_ids.contains_key(candidate.id) {
                tracing::warn!("Dropping duplicate project {}", candidate.id);
                continue;
            }
            project_ids.insert(candidate.id, candidates.len());
            candidates.push(candidate);
        }

        let parents: Vec<Option<usize>> = candidates
            .iter()
            .map(|c| c.parent_id.and_then(|pid| goal_ids.get(pid).copied()))
            .collect();

        let mut children = vec![Vec::new(); candidates.len()];
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(child);
            }
        }

        let mut index = Self {
            candidates,
            goals: goal_ids,
            parents,
            children,
            top_down: Vec::new(),
        };
        index.order_top_down(max_depth)?;
        Ok(index)
    }

    /// Resolve every candidate's depth and order parents first, detecting
    /// cycles along the way
    fn order_top_down(&mut self, max_depth: usize) -> Result<(), TreeError> {
        let len = self.candidates.len();
        let mut marks = vec![Mark::Unvisited; len];
        let mut depths = vec![0usize; len];
        let mut path = Vec::new();

        for start in 0..len {
            if marks[start] == Mark::Done {
                continue;
            }

            // Climb until a resolved node or a root; the path is child-first.
            let mut cursor = Some(start);
            let mut base = None;
            while let Some(current) = cursor {
                match marks[current] {
                    Mark::Done => {
                        base = Some(depths[current]);
                        break;
                    }
                    Mark::OnPath => {
                        return Err(TreeError::CycleDetected {
                            id: self.candidates[current].id.to_string(),
                        });
                    }
                    Mark::Unvisited => {
                        marks[current] = Mark::OnPath;
                        path.push(current);
                        if path.len() > max_depth.saturating_add(1) {
                            return Err(TreeError::DepthLimitExceeded {
                                id: self.candidates[start].id.to_string(),
                                limit: max_depth,
                            });
                        }
                        cursor = self.parents[current];
                    }
                }
            }

            let mut depth = base.map_or(0, |d| d + 1);
            while let Some(node) = path.pop() {
                if depth > max_depth {
                    return Err(TreeError::DepthLimitExceeded {
                        id: self.candidates[node].id.to_string(),
                        limit: max_depth,
                    });
                }
                depths[node] = depth;
                marks[node] = Mark::Done;
                depth += 1;
            }
        }

        let mut top_down: Vec<usize> = (0..len).collect();
        top_down.sort_by_key(|&i| depths[i]);

        self.top_down = top_down;
        Ok(())
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> &Candidate<'a> {
        &self.candidates[idx]
    }

    #[inline]
    pub(crate) fn parent(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    #[inline]
    pub(crate) fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    /// Indices ordered so parents come before their children
    #[inline]
    pub(crate) fn top_down(&self) -> &[usize] {
        &self.top_down
    }

    /// Look up a goal by id
    #[inline]
    pub(crate) fn goal(&self, id: &str) -> Option<usize> {
        self.goals.get(id).copied()
    }

    /// Strict descendants of `root` as a membership mask
    pub(crate) fn descendants_mask(&self, root: usize) -> Vec<bool> {
        let mut mask = vec![false; self.len()];
        let mut stack: Vec<usize> = self.children(root).to_vec();
        while let Some(idx) = stack.pop() {
            if !mask[idx] {
                mask[idx] = true;
                stack.extend_from_slice(self.children(idx));
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Space;

    fn company() -> Space {
        Space::new("company", "Company")
    }

    fn goal(id: &str, parent: Option<&str>) -> GoalRecord {
        let mut goal = GoalRecord::new(id, id, company());
        goal.parent_goal_id = parent.map(Into::into);
        goal
    }

    fn project(id: &str, goal_id: Option<&str>) -> ProjectRecord {
        let mut project = ProjectRecord::new(id, id, company());
        project.goal_id = goal_id.map(Into::into);
        project
    }

    #[test]
    fn links_parents_and_children() {
        let goals = vec![goal("g3", Some("g2")), goal("g1", None), goal("g2", Some("g1"))];
        let projects = vec![project("p1", Some("g1")), project("p2", Some("missing"))];
        let index = CandidateIndex::new(&goals, &projects, 64).unwrap();

        let g1 = index.goal("g1").unwrap();
        let g2 = index.goal("g2").unwrap();
        let g3 = index.goal("g3").unwrap();

        assert_eq!(index.parent(g3), Some(g2));
        assert_eq!(index.parent(g1), None);
        assert_eq!(index.children(g1), &[g2, 3]);
        assert_eq!(index.parent(4), None);
        assert_eq!(index.parent(3), Some(g1));
    }

    #[test]
    fn top_down_puts_parents_first() {
        let goals = vec![goal("c", Some("b")), goal("b", Some("a")), goal("a", None)];
        let index = CandidateIndex::new(&goals, &[], 64).unwrap();
        let order: Vec<&str> = index.top_down().iter().map(|&i| index.get(i).id).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let mut second = goal("g1", None);
        second.name = "Second".into();
        let goals = vec![goal("g1", None), second];
        let index = CandidateIndex::new(&goals, &[], 64).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(0).name, "g1");
    }

    #[test]
    fn goal_and_project_may_share_an_id() {
        let goals = vec![goal("x", None)];
        let projects = vec![project("x", Some("x"))];
        let index = CandidateIndex::new(&goals, &projects, 64).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.parent(1), Some(0));
    }

    #[test]
    fn detects_cycles() {
        let goals = vec![goal("a", Some("c")), goal("b", Some("a")), goal("c", Some("b"))];
        let err = CandidateIndex::new(&goals, &[], 64).unwrap_err();
        assert!(matches!(err, TreeError::CycleDetected { .. }));
    }

    #[test]
    fn detects_self_parent() {
        let goals = vec![goal("a", Some("a"))];
        let err = CandidateIndex::new(&goals, &[], 64).unwrap_err();
        assert_eq!(err, TreeError::CycleDetected { id: "a".into() });
    }

    #[test]
    fn enforces_depth_limit() {
        let goals: Vec<GoalRecord> = (0..10)
            .map(|i| {
                let parent = (i > 0).then(|| format!("g{}", i - 1));
                goal(&format!("g{i}"), parent.as_deref())
            })
            .collect();

        assert!(CandidateIndex::new(&goals, &[], 9).is_ok());
        let err = CandidateIndex::new(&goals, &[], 8).unwrap_err();
        assert!(matches!(err, TreeError::DepthLimitExceeded { limit: 8, .. }));
    }

    #[test]
    fn unbounded_depth_accepts_any_chain() {
        let goals = vec![goal("c", Some("b")), goal("b", Some("a")), goal("a", None)];
        let index = CandidateIndex::new(&goals, &[], usize::MAX).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.parent(0), Some(1));
    }

    #[test]
    fn descendants_mask_excludes_root() {
        let goals = vec![
            goal("g1", None),
            goal("g2", Some("g1")),
            goal("g3", Some("g2")),
            goal("g4", None),
        ];
        let projects = vec![project("p1", Some("g2"))];
        let index = CandidateIndex::new(&goals, &projects, 64).unwrap();

        let mask = index.descendants_mask(index.goal("g2").unwrap());
        assert_eq!(mask, vec![false, false, true, false, true]);
    }
}
