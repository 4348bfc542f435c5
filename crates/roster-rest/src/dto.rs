//! Request and response bodies.

use chrono::{DateTime, Utc};
use roster_core::rules::valid_username;
use roster_core::{Email, PageInfo, RosterError, RosterResult, User, UserFields, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3-32 characters"),
        custom(function = "valid_username")
    )]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl CreateUserRequest {
    /// Converts the validated request into store fields.
    pub fn into_fields(self) -> RosterResult<UserFields> {
        Ok(UserFields::new(self.username, parse_email(self.email)?))
    }
}

/// Request to update a user. Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3-32 characters"),
        custom(function = "valid_username")
    )]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Merges the request over the current record.
    pub fn merge_into(self, current: &User) -> RosterResult<UserFields> {
        let username = self.username.unwrap_or_else(|| current.username.clone());
        let email = match self.email {
            Some(email) => parse_email(email)?,
            None => current.email.clone(),
        };
        Ok(UserFields::new(username, email))
    }
}

fn parse_email(email: String) -> RosterResult<Email> {
    Email::parse(email).map_err(|e| RosterError::validation(format!("email: {}", e)))
}

/// User response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User list response with pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub page_info: PageInfo,
}
