//! Sibling ordering
//!
//! Closed nodes always follow open ones. Within the same closed state the
//! selected column decides, and the direction only flips that column
//! comparison. Missing values (no timeframe, no check-in...) sort last in
//! both directions.

use crate::candidate::Candidate;
use crate::node::NodeDetails;
use crate::options::{SortColumn, SortDirection};
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

/// Comparator for one sibling group
#[derive(Debug, Clone, Copy)]
pub(crate) struct SiblingOrder {
    column: SortColumn,
    direction: SortDirection,
}

impl SiblingOrder {
    #[inline]
    pub(crate) fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Total order over candidates
    pub(crate) fn compare(&self, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
        a.is_closed()
            .cmp(&b.is_closed())
            .then_with(|| self.compare_column(a, b))
    }

    fn compare_column(&self, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
        match self.column {
            SortColumn::Name => self.directed(compare_names(a.name, b.name)),
            SortColumn::Timeframe => self.missing_last(due_date(a), due_date(b), Ord::cmp),
            SortColumn::Progress => {
                self.missing_last(progress(a), progress(b), |x: &f64, y: &f64| x.total_cmp(y))
            }
            SortColumn::LastCheckIn => {
                self.missing_last(checked_in_at(a), checked_in_at(b), Ord::cmp)
            }
            SortColumn::Champion => self.missing_last(
                a.champion.map(|p| p.full_name.as_str()),
                b.champion.map(|p| p.full_name.as_str()),
                |x: &&str, y: &&str| compare_names(x, y),
            ),
            SortColumn::Space => self.directed(compare_names(&a.space.name, &b.space.name)),
        }
    }

    #[inline]
    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    fn missing_last<T>(
        &self,
        a: Option<T>,
        b: Option<T>,
        cmp: impl Fn(&T, &T) -> Ordering,
    ) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.directed(cmp(&a, &b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Case-insensitive first, exact bytes as tie-break
fn compare_names(a: &str, b: &str) -> Ordering {
    fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars().flat_map(char::to_lowercase)
    }
    folded(a).cmp(folded(b)).then_with(|| a.cmp(b))
}

fn due_date(candidate: &Candidate<'_>) -> Option<NaiveDate> {
    match &candidate.details {
        NodeDetails::Goal(goal) => goal.timeframe.map(|tf| tf.end_date),
        NodeDetails::Project(project) => project.deadline,
    }
}

fn progress(candidate: &Candidate<'_>) -> Option<f64> {
    candidate.details.progress()
}

fn checked_in_at(candidate: &Candidate<'_>) -> Option<DateTime<Utc>> {
    candidate.details.last_check_in().map(|c| c.checked_in_at)
}
