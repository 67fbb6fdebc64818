//! Project membership records.

use super::EmployeeId;
use serde::{Deserialize, Serialize};

/// Role label carrying leader semantics.
///
/// Any other label is ordinary membership.
pub const LEADER_ROLE: &str = "Leader";

/// Role label assigned to participants added after project creation.
pub const MEMBER_ROLE: &str = "Member";

/// An employee's membership record in a project.
///
/// At most one participant exists per (project, employee) pair. The role
/// label is free-form; only [`LEADER_ROLE`] carries special semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    employee_id: EmployeeId,
    role: String,
}

impl Participant {
    /// Creates a participant with the given role label.
    #[must_use]
    pub fn new(employee_id: EmployeeId, role: impl Into<String>) -> Self {
        Self {
            employee_id,
            role: role.into(),
        }
    }

    /// Creates an ordinary member.
    #[must_use]
    pub fn member(employee_id: EmployeeId) -> Self {
        Self::new(employee_id, MEMBER_ROLE)
    }

    /// Returns the employee this record belongs to.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns the role label.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns true when the role label carries leader semantics.
    #[must_use]
    pub fn is_leader_label(&self) -> bool {
        self.role == LEADER_ROLE
    }
}
