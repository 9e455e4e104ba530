use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::auth::{Identity, Role};
use crate::database::manager::DatabaseError;
use crate::database::sql::{bind_value, ColumnMapping, PartialUpdate};

/// Payload field -> column for profile updates.
pub const USER_COLUMNS: &ColumnMapping = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("profilePic", "profile_pic"),
];

const USER_FIELDS: &str = "id, first_name, last_name, email, role, bio, profile_pic";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
            role: Role::parse(&self.role).unwrap_or(Role::User),
        }
    }
}

#[derive(Debug, FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub bio: Option<&'a str>,
    pub profile_pic: Option<&'a str>,
}

impl User {
    pub async fn register(pool: &PgPool, new_user: NewUser<'_>) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (first_name, last_name, email, password, role, bio, profile_pic)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            USER_FIELDS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(new_user.first_name)
            .bind(new_user.last_name)
            .bind(new_user.email)
            .bind(new_user.password_hash)
            .bind(new_user.role.as_str())
            .bind(new_user.bio)
            .bind(new_user.profile_pic)
            .fetch_one(pool)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::Conflict(_) => DatabaseError::Conflict(format!("Email already registered: {}", new_user.email)),
                other => other,
            })?;

        Ok(user)
    }

    /// User and stored password hash for a login attempt.
    pub async fn find_credentials(pool: &PgPool, email: &str) -> Result<Option<(User, String)>, DatabaseError> {
        let sql = format!("SELECT {}, password FROM users WHERE email = $1", USER_FIELDS);

        let row = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| (r.user, r.password)))
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_FIELDS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn get_all(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY last_name, first_name", USER_FIELDS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
    }

    /// Case-insensitive match on first name, last name or email.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM users
             WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
             ORDER BY last_name, first_name",
            USER_FIELDS
        );
        let pattern = format!("%{}%", escape_like(term));
        Ok(sqlx::query_as::<_, User>(&sql).bind(pattern).fetch_all(pool).await?)
    }

    pub async fn update(pool: &PgPool, id: i32, update: &PartialUpdate) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET {} WHERE id = ${} RETURNING {}",
            update.set_cols,
            update.next_placeholder(),
            USER_FIELDS
        );

        let mut q = sqlx::query_as::<_, User>(&sql);
        for value in &update.values {
            q = bind_value(q, value);
        }
        Ok(q.bind(id).fetch_optional(pool).await.map_err(|e| match DatabaseError::from(e) {
            DatabaseError::Conflict(_) => DatabaseError::Conflict("Email already registered".to_string()),
            other => other,
        })?)
    }

    pub async fn update_role(pool: &PgPool, id: i32, role: Role) -> Result<Option<User>, DatabaseError> {
        let sql = format!("UPDATE users SET role = $1 WHERE id = $2 RETURNING {}", USER_FIELDS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(role.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let deleted: Option<(i32,)> = sqlx::query_as("DELETE FROM users WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        deleted
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("No user found with ID: {}", id)))
    }
}

/// Escape LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("mark"), "mark");
    }

    #[test]
    fn serializes_camel_case_without_password() {
        let user = User {
            id: 1,
            first_name: "Mark".to_string(),
            last_name: "Aurelius".to_string(),
            email: "mark@example.com".to_string(),
            role: "admin".to_string(),
            bio: None,
            profile_pic: Some("pic.png".to_string()),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["firstName"], "Mark");
        assert_eq!(value["profilePic"], "pic.png");
        assert!(value.get("password").is_none());
        assert_eq!(user.identity().role, Role::Admin);
    }
}
