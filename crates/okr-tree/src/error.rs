//! Error types for the tree builder
//!
//! The builder is total over well-formed input. It only fails on:
//! - precondition violations (a "me" filter without a current user)
//! - malformed parent pointers (cycles, runaway chains)

/// Which identity filter asked for the current user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityFilter {
    /// `owned_by = me`
    OwnedBy,
    /// `reviewed_by = me`
    ReviewedBy,
}

impl std::fmt::Display for IdentityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityFilter::OwnedBy => write!(f, "owned_by"),
            IdentityFilter::ReviewedBy => write!(f, "reviewed_by"),
        }
    }
}

/// Tree building errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A "me" filter is set but no current user was given
    #[error("{filter} = me requires a current user")]
    MissingCurrentUser {
        /// Filter that needs the user
        filter: IdentityFilter,
    },

    /// Parent pointers loop back onto a goal
    #[error("parent goal cycle detected at {id}")]
    CycleDetected {
        /// Goal where the loop was noticed
        id: String,
    },

    /// Ancestor chain longer than the configured bound
    #[error("ancestor chain of {id} exceeds {limit} levels")]
    DepthLimitExceeded {
        /// Record whose chain is too deep
        id: String,
        /// Configured maximum depth
        limit: usize,
    },
}

impl TreeError {
    /// Check if the error comes from the input data rather than the caller
    #[inline]
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::CycleDetected { .. } | Self::DepthLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = TreeError::MissingCurrentUser {
            filter: IdentityFilter::ReviewedBy,
        };
        assert_eq!(err.to_string(), "reviewed_by = me requires a current user");
        assert!(!err.is_data_error());

        let err = TreeError::CycleDetected { id: "g7".into() };
        assert_eq!(err.to_string(), "parent goal cycle detected at g7");
        assert!(err.is_data_error());
    }
}
