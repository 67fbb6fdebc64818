//! Acting-user roles for the tenant security model.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Role of the acting user within a tenant.
///
/// The numeric codes mirror the token role model consumed at the system
/// boundary (Admin=1, Executive=2, Employee=3, Client=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Tenant administrator.
    Admin,
    /// Executive staff.
    Executive,
    /// Ordinary employee.
    Employee,
    /// External client user.
    Client,
}

impl ActorRole {
    /// Returns the numeric wire code for this role.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Admin => 1,
            Self::Executive => 2,
            Self::Employee => 3,
            Self::Client => 4,
        }
    }

    /// Parses a role from its numeric wire code.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRoleCode`] when the code is outside 1..=4.
    pub const fn from_code(code: u8) -> Result<Self, UnknownRoleCode> {
        match code {
            1 => Ok(Self::Admin),
            2 => Ok(Self::Executive),
            3 => Ok(Self::Employee),
            4 => Ok(Self::Client),
            _ => Err(UnknownRoleCode(code)),
        }
    }

    /// Returns true for roles that bypass ordinary creator/leader checks.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::Executive)
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::Executive => "executive",
            Self::Employee => "employee",
            Self::Client => "client",
        };
        write!(f, "{name}")
    }
}

/// Error returned while parsing numeric role codes.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("unknown role code: {0}")]
pub struct UnknownRoleCode(pub u8);
