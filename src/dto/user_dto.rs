use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{User, UserRole};
use crate::utils::validation::non_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, max = 200), custom(function = "non_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[validate(length(max = 500))]
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, max = 200), custom(function = "non_blank"))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub skills: Option<Vec<String>>,
    pub expertise: Option<Vec<String>>,
    #[validate(length(max = 500))]
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub skills: Vec<String>,
    pub expertise: Vec<String>,
    pub availability: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            skills: value.skills,
            expertise: value.expertise,
            availability: value.availability,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
