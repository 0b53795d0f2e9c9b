//! User Model

use serde::{Deserialize, Serialize};

/// Portal role derived from identity-provider groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
}

/// Employee profile returned by `GET user-info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub work_email: String,
    #[serde(default)]
    pub employee_thumbnail: Option<String>,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub privileges: Vec<i64>,
    #[serde(default)]
    pub manager_email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub team: String,
}

impl UserInfo {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// The acting user, as handed over by the identity-provider layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Work email, used for `addedBy` / `updatedBy` stamps
    pub email: String,
    pub roles: Vec<Role>,
}

impl Session {
    pub fn new(email: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            email: email.into(),
            roles,
        }
    }

    /// Derive roles from identity-provider group claims
    ///
    /// Members of `admin_group` are admins; every signed-in user is an employee.
    pub fn from_groups(email: impl Into<String>, groups: &[String], admin_group: &str) -> Self {
        let mut roles = vec![Role::Employee];
        if groups.iter().any(|g| g == admin_group) {
            roles.insert(0, Role::Admin);
        }
        Self::new(email, roles)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
