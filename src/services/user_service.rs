use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload};
use crate::error::{conflict_on_unique, Error, Result};
use crate::models::user::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, name, email, role, skills, expertise, availability, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User> {
        let query = format!(
            r#"
            INSERT INTO users (name, email, role, skills, expertise, availability)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(payload.name.trim())
            .bind(payload.email.trim().to_lowercase())
            .bind(payload.role.as_str())
            .bind(payload.skills)
            .bind(payload.expertise)
            .bind(payload.availability)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "A user with this email address already exists."))?;

        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))
    }

    pub async fn update_profile(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User> {
        let query = format!(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                skills = COALESCE($4, skills),
                expertise = COALESCE($5, expertise),
                availability = COALESCE($6, availability),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(payload.name.as_deref().map(str::trim))
            .bind(payload.email.map(|e| e.trim().to_lowercase()))
            .bind(payload.skills)
            .bind(payload.expertise)
            .bind(payload.availability)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "A user with this email address already exists."))?;

        Ok(user)
    }
}
