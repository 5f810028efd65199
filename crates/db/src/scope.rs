//! Record visibility scopes.
//!
//! Superusers see every user's records; everyone else only sees their own.

use crate::entities::user;

/// Which owners' records a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every record, regardless of owner.
    All,
    /// Only records owned by this user id.
    Owner(String),
}

impl Scope {
    /// Scope for an authenticated user.
    #[must_use]
    pub fn for_user(user: &user::Model) -> Self {
        if user.is_superuser {
            Self::All
        } else {
            Self::Owner(user.id.clone())
        }
    }

    /// Owner id this scope is restricted to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Owner(id) => Some(id),
        }
    }

    /// Whether a record owned by `owner_id` is visible in this scope.
    #[must_use]
    pub fn permits(&self, owner_id: &str) -> bool {
        self.owner().is_none_or(|id| id == owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, is_superuser: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_string(),
            password: String::new(),
            token: None,
            is_active: true,
            is_staff: is_superuser,
            is_superuser,
            last_login: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_superuser_sees_everything() {
        let scope = Scope::for_user(&user("admin", true));
        assert_eq!(scope, Scope::All);
        assert!(scope.permits("someone-else"));
        assert_eq!(scope.owner(), None);
    }

    #[test]
    fn test_regular_user_sees_own_records() {
        let scope = Scope::for_user(&user("u1", false));
        assert_eq!(scope.owner(), Some("u1"));
        assert!(scope.permits("u1"));
        assert!(!scope.permits("u2"));
    }
}
