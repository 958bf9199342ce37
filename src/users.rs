// 🔐 User Directory - Operator and administrator accounts
// A flat credential list with two roles. No hashing, no sessions; the shell
// keeps the logged-in user for the lifetime of one menu loop.

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Operator,
    Administrator,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Administrator => "administrator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        UserDirectory { users: Vec::new() }
    }

    pub fn from_records(users: Vec<User>) -> Self {
        UserDirectory { users }
    }

    /// Flat credential check. Returns the matched account, which carries the
    /// role the shell gates its menus on.
    pub fn login(&self, username: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
    }

    /// Returns false when the username is blank or already taken; the
    /// directory is unchanged in both cases.
    pub fn add(&mut self, username: &str, password: &str, role: Role) -> bool {
        let username = username.trim();
        if username.is_empty() || self.get(username).is_some() {
            return false;
        }
        self.users.push(User {
            username: username.to_string(),
            password: password.to_string(),
            role,
        });
        true
    }

    pub fn remove(&mut self, username: &str) -> DeskResult<User> {
        let pos = self
            .users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| DeskError::not_found("user", username))?;
        Ok(self.users.remove(pos))
    }

    /// Promote to administrator. `Ok(false)` when the user already holds
    /// the role.
    pub fn assign_admin(&mut self, username: &str) -> DeskResult<bool> {
        let user = self.get_mut(username)?;
        if user.role == Role::Administrator {
            return Ok(false);
        }
        user.role = Role::Administrator;
        Ok(true)
    }

    /// Demote to operator. `Ok(false)` when the user is not an
    /// administrator.
    pub fn remove_admin(&mut self, username: &str) -> DeskResult<bool> {
        let user = self.get_mut(username)?;
        if user.role != Role::Administrator {
            return Ok(false);
        }
        user.role = Role::Operator;
        Ok(true)
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn by_role(&self, role: Role) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect()
    }

    /// Raw records in insertion order, for listing and persistence.
    pub fn records(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn get_mut(&mut self, username: &str) -> DeskResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| DeskError::not_found("user", username))
    }
}
