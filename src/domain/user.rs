use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    #[must_use]
    pub fn new(email: String, username: String, first_name: String, last_name: String) -> Self {
        Self {
            email: email.to_lowercase(),
            username,
            first_name,
            last_name,
        }
    }
}

/// Patch data applied to a user profile. `None` leaves a field untouched.
#[derive(Clone, Debug)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateUser {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateUser {
    pub fn new() -> Self {
        Self {
            username: None,
            first_name: None,
            last_name: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Profiles are provisioned from identity claims the first time a user shows up.
/// The e-mail doubles as the initial username since both must be unique.
impl From<&AuthenticatedUser> for NewUser {
    fn from(value: &AuthenticatedUser) -> Self {
        let display_name = value.name.trim();
        let (first_name, last_name) = match display_name.split_once(char::is_whitespace) {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (display_name.to_string(), String::new()),
        };

        NewUser::new(
            value.email.clone(),
            value.email.to_lowercase(),
            first_name,
            last_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str, email: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "42".to_string(),
            email: email.to_string(),
            hub_id: 1,
            name: name.to_string(),
            roles: vec![],
            exp: 0,
        }
    }

    #[test]
    fn new_user_from_identity_splits_display_name() {
        let new_user = NewUser::from(&identity("  Ivan  Petrov ", "Ivan@Example.com"));

        assert_eq!(new_user.email, "ivan@example.com");
        assert_eq!(new_user.username, "ivan@example.com");
        assert_eq!(new_user.first_name, "Ivan");
        assert_eq!(new_user.last_name, "Petrov");
    }

    #[test]
    fn new_user_from_identity_with_single_name() {
        let new_user = NewUser::from(&identity("Cher", "cher@example.com"));

        assert_eq!(new_user.first_name, "Cher");
        assert_eq!(new_user.last_name, "");
    }
}
