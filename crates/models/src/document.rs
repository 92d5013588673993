use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user::User;

/// The whole datastore: every user record and every group name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub users: Vec<User>,
    pub groups: Vec<String>,
}

impl Document {
    pub fn user(&self, userid: &str) -> Option<&User> {
        self.users.iter().find(|u| u.userid == userid)
    }

    pub fn user_position(&self, userid: &str) -> Option<usize> {
        self.users.iter().position(|u| u.userid == userid)
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g == name)
    }

    /// Names in `groups` that are not present in the group set.
    pub fn unknown_groups(&self, groups: &[String]) -> Vec<String> {
        groups.iter().filter(|g| !self.has_group(g)).cloned().collect()
    }

    /// Userids of every user whose membership list contains `name`.
    pub fn members_of(&self, name: &str) -> Vec<String> {
        self.users
            .iter()
            .filter(|u| u.is_member_of(name))
            .map(|u| u.userid.clone())
            .collect()
    }

    /// Verify uniqueness of userids and group names, and that every membership
    /// references an existing group.
    pub fn check_integrity(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for u in &self.users {
            if !seen.insert(u.userid.as_str()) {
                return Err(ModelError::Integrity(format!("duplicate userid {}", u.userid)));
            }
        }

        let mut names = HashSet::new();
        for g in &self.groups {
            if !names.insert(g.as_str()) {
                return Err(ModelError::Integrity(format!("duplicate group {g}")));
            }
        }

        for u in &self.users {
            if let Some(g) = u.groups.iter().find(|g| !names.contains(g.as_str())) {
                return Err(ModelError::Integrity(format!(
                    "user {} references unknown group {g}",
                    u.userid
                )));
            }
        }
        Ok(())
    }
}
