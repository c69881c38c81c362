use actix_session::Session;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::proposal::WorkProposal;

/// Role of the signed-in user, as written to the session by the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Engineer,
    DepartmentUser,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "engineer" => Ok(Role::Engineer),
            "department_user" => Ok(Role::DepartmentUser),
            other => Err(AppError::Session(format!("Unknown role '{other}'"))),
        }
    }
}

/// The user performing a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
    pub department_id: Option<i64>,
}

impl Actor {
    pub fn new(user_id: i64, role: Role) -> Self {
        Actor { user_id, role, department_id: None }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::SuperAdmin)
    }

    /// Approvals, tender and work-order actions.
    pub fn can_manage_workflow(&self) -> bool {
        self.is_admin()
    }

    /// Progress may be recorded by the appointed engineer or an admin.
    pub fn can_record_progress(&self, proposal: &WorkProposal) -> bool {
        self.is_admin() || proposal.appointed_engineer_id == Some(self.user_id)
    }
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Read the actor from the session; fails when nobody is signed in.
pub fn current_actor(session: &Session) -> Result<Actor, AppError> {
    let user_id = get_user_id(session)
        .ok_or_else(|| AppError::Session("User not logged in".to_string()))?;
    let role = session
        .get::<String>("role")
        .map_err(|e| AppError::Session(format!("Session error: {e}")))?
        .ok_or_else(|| AppError::Session("No role in session".to_string()))?
        .parse::<Role>()?;
    let department_id = session.get::<i64>("department_id").unwrap_or(None);

    Ok(Actor { user_id, role, department_id })
}

/// Current actor, required to be an admin or super-admin.
pub fn require_workflow_manager(session: &Session) -> Result<Actor, AppError> {
    let actor = current_actor(session)?;
    if actor.can_manage_workflow() {
        Ok(actor)
    } else {
        Err(AppError::PermissionDenied("workflow actions require an admin role".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_manage_workflow() {
        assert!(Actor::new(1, Role::SuperAdmin).can_manage_workflow());
        assert!(Actor::new(1, Role::Admin).can_manage_workflow());
        assert!(!Actor::new(1, Role::Engineer).can_manage_workflow());
        assert!(!Actor::new(1, Role::DepartmentUser).can_manage_workflow());
    }

    #[test]
    fn unknown_role_is_a_session_error() {
        assert!(matches!("clerk".parse::<Role>(), Err(AppError::Session(_))));
    }
}
