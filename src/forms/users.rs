use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::user::UpdateUser;
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for usernames and personal names.
const NAME_MAX_LEN: usize = 150;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

pub type UserFormResult<T> = Result<T, UserFormError>;

#[derive(Debug, Error)]
pub enum UserFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Usernames may only contain letters, digits and `@.+-_`.
    #[error("invalid username `{0}`")]
    InvalidUsername(String),
    #[error("no profile fields supplied")]
    NothingToUpdate,
    #[error("an avatar image is required")]
    MissingAvatar,
}

/// JSON payload accepted when a user edits their own profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub username: Option<String>,
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub first_name: Option<String>,
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub last_name: Option<String>,
}

impl UpdateProfileForm {
    pub fn into_update_user(self, updated_at: NaiveDateTime) -> UserFormResult<UpdateUser> {
        self.validate()?;

        if self.username.is_none() && self.first_name.is_none() && self.last_name.is_none() {
            return Err(UserFormError::NothingToUpdate);
        }

        let username = match self.username.as_deref().map(str::trim) {
            Some(username) if !is_valid_username(username) => {
                return Err(UserFormError::InvalidUsername(username.to_string()));
            }
            other => other.map(str::to_string),
        };

        Ok(UpdateUser {
            username,
            first_name: self.first_name.as_deref().map(sanitize_inline_text),
            last_name: self.last_name.as_deref().map(sanitize_inline_text),
            updated_at,
        })
    }
}

fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|ch| ch.is_alphanumeric() || matches!(ch, '@' | '.' | '+' | '-' | '_'))
}

/// JSON payload carrying a new avatar as a base64 data URL.
#[derive(Debug, Deserialize)]
pub struct AvatarForm {
    pub avatar: Option<String>,
}

impl AvatarForm {
    pub fn into_data_url(self) -> UserFormResult<String> {
        match self.avatar.as_deref().map(str::trim) {
            Some(data_url) if !data_url.is_empty() => Ok(data_url.to_string()),
            _ => Err(UserFormError::MissingAvatar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 8)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn profile_form_builds_partial_update() {
        let form = UpdateProfileForm {
            username: Some(" chef.anna ".to_string()),
            first_name: Some("  Анна ".to_string()),
            last_name: None,
        };

        let update = form
            .into_update_user(timestamp())
            .expect("expected valid update");

        assert_eq!(update.username.as_deref(), Some("chef.anna"));
        assert_eq!(update.first_name.as_deref(), Some("Анна"));
        assert_eq!(update.last_name, None);
        assert_eq!(update.updated_at, timestamp());
    }

    #[test]
    fn profile_form_rejects_bad_username() {
        let form = UpdateProfileForm {
            username: Some("chef anna!".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            form.into_update_user(timestamp()),
            Err(UserFormError::InvalidUsername(_))
        ));
    }

    #[test]
    fn profile_form_rejects_empty_payload() {
        assert!(matches!(
            UpdateProfileForm::default().into_update_user(timestamp()),
            Err(UserFormError::NothingToUpdate)
        ));
    }

    #[test]
    fn avatar_form_requires_payload() {
        let form = AvatarForm { avatar: None };

        assert!(matches!(
            form.into_data_url(),
            Err(UserFormError::MissingAvatar)
        ));
    }
}
