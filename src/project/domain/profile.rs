//! Directory resolution results.
//!
//! The employee/client directory is an external collaborator; these value
//! types are what it resolves identifiers into.

use super::{ActorRole, ClientId, EmployeeId};
use serde::{Deserialize, Serialize};

/// Display attributes and role of a directory-resolved employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Directory identifier.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact mobile number.
    pub mobile: String,
    /// Directory-recorded role of the employee.
    pub role: ActorRole,
}

/// Display attributes of a directory-resolved client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Directory identifier.
    pub id: ClientId,
    /// Display name.
    pub name: String,
}
