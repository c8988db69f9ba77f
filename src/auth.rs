//! Access boundary in front of the payroll core
//!
//! Credential checks and token issuance belong to the external login
//! service. This module only consumes its success response, keeps the
//! resulting session, and gates entry to the core: the register and grid
//! facades can only be opened with an [`AccessGrant`], and a grant can only
//! come out of an [`AccessGate`].

use crate::error::{PayrollError, PayrollResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Durable key for the logged-in session
pub const SESSION_KEY: &str = "session";

/// Role required to open the payroll register and the raw grid viewer
pub const PAYROLL_ROLE: Role = Role::Admin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PayrollError;

    /// Case-insensitive: "Admin", "ADMIN" and "admin" are the same role
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            other => Err(PayrollError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Success body of `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub role: String,
}

/// A logged-in identity: bearer token plus normalized role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

impl Session {
    pub fn from_login_response(response: LoginResponse) -> PayrollResult<Self> {
        if response.token.is_empty() {
            return Err(PayrollError::Unauthorized(
                "Login response carried no token".to_string(),
            ));
        }
        Ok(Self {
            token: response.token,
            role: response.user.role.parse()?,
        })
    }

    /// Parse the raw JSON body returned by the login service
    pub fn from_login_json(json: &str) -> PayrollResult<Self> {
        let response: LoginResponse = serde_json::from_str(json)?;
        Self::from_login_response(response)
    }
}

/// Proof that the gate admitted a caller for `role`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    role: Role,
}

impl AccessGrant {
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Decides whether a bearer token may reach a role-restricted area
pub trait AccessGate {
    fn authorize(&self, token: Option<&str>, required: Role) -> PayrollResult<AccessGrant>;
}

/// Gate backed by the session the login service issued
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    session: Option<Session>,
}

impl SessionGate {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

impl AccessGate for SessionGate {
    fn authorize(&self, token: Option<&str>, required: Role) -> PayrollResult<AccessGrant> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(PayrollError::Unauthorized(
                    "No token provided".to_string(),
                ))
            }
        };

        let session = self
            .session
            .as_ref()
            .filter(|s| s.token == token)
            .ok_or_else(|| PayrollError::Unauthorized("Invalid token".to_string()))?;

        if session.role != required {
            return Err(PayrollError::Forbidden(format!(
                "role '{}' may not access the {} area",
                session.role, required
            )));
        }

        Ok(AccessGrant { role: required })
    }
}
