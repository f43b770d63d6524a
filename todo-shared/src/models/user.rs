/// User model (credential store)
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(150) NOT NULL UNIQUE,
///     hashed_password VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Usernames are compared byte-for-byte, so `Alice` and `alice` are distinct
/// accounts. Only Argon2id hashes are ever written; hashing happens before a
/// [`CreateUser`] is built.
///
/// # Example
///
/// ```no_run
/// use todo_shared::auth::password::hash_password;
/// use todo_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let created = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     hashed_password: hash_password("pw1")?,
/// })
/// .await?;
///
/// match created {
///     Some(user) => println!("registered {}", user.id),
///     None => println!("username taken"),
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Registered account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// Argon2id PHC string, never serialized
    #[serde(skip_serializing)]
    pub hashed_password: String,

    pub created_at: DateTime<Utc>,
}

/// Input for registering a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    /// Already-hashed password
    pub hashed_password: String,
}

impl User {
    /// Inserts a new user
    ///
    /// Returns `Ok(None)` when the username is already registered. The
    /// existence check and the insert are one statement, so two concurrent
    /// registrations of the same name cannot both succeed.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, hashed_password)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, hashed_password, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.hashed_password)
        .fetch_optional(pool)
        .await
    }

    /// Exact, case-sensitive lookup by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, hashed_password, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user and, via cascade, all of their tasks
    ///
    /// No endpoint exposes this. Tokens already issued to the user stop
    /// authenticating because the guard can no longer resolve the subject.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_omits_hash() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            hashed_password: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "alice");
        assert!(json.get("hashed_password").is_none());
    }
}
