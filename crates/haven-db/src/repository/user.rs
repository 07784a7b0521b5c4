//! # User Repository
//!
//! Database operations for users (hosts, guests and admins).

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use haven_core::validation::validate_new_user;
use haven_core::{NewUser, User, UserRole};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, role, created_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user in its own transaction.
    ///
    /// ## Errors
    /// * `DbError::Rule` - username or email invalid
    /// * `DbError::UniqueViolation` - username taken
    pub async fn create(&self, new_user: &NewUser) -> DbResult<User> {
        let mut tx = begin_write(&self.pool).await?;
        let user = Self::create_in(&mut *tx, new_user).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Creates a user on a caller-owned connection or transaction.
    pub async fn create_in(conn: &mut SqliteConnection, new_user: &NewUser) -> DbResult<User> {
        validate_new_user(new_user)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_string(),
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            role: new_user.role,
            created_at: Utc::now(),
        };

        debug!(id = %user.id, username = %user.username, role = %user.role, "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &user.username),
            other => other,
        })?;

        Ok(user)
    }

    /// Gets a user by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - User not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by username.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Lists users holding the given role.
    pub async fn list_by_role(&self, role: UserRole) -> DbResult<Vec<User>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_by_role_in(&mut *conn, role).await
    }

    /// Lists users holding the given role, on a caller-owned connection.
    pub async fn list_by_role_in(
        conn: &mut SqliteConnection,
        role: UserRole,
    ) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY username"
        ))
        .bind(role)
        .fetch_all(&mut *conn)
        .await?;

        debug!(role = %role, count = users.len(), "Listed users by role");
        Ok(users)
    }

    /// Counts all users.
    pub async fn count(&self) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::count_in(&mut *conn).await
    }

    /// Counts all users on a caller-owned connection.
    pub async fn count_in(conn: &mut SqliteConnection) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Deletes a user. Their listings, bookings and reviews go with them.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{test_db, user};
    use haven_core::CoreError;

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let db = test_db().await;
        let created = user(&db, "ana", UserRole::Host).await;

        let by_id = db.users().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "ana");
        assert_eq!(by_id.role, UserRole::Host);

        let by_name = db.users().get_by_username("ana").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        assert!(db.users().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_violation() {
        let db = test_db().await;
        user(&db, "ana", UserRole::Host).await;

        let err = db
            .users()
            .create(&NewUser {
                username: "ana".to_string(),
                email: "other@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: UserRole::Guest,
            })
            .await
            .unwrap_err();

        assert!(err.is_constraint_violation());
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_username_rejected_before_insert() {
        let db = test_db().await;

        let err = db
            .users()
            .create(&NewUser {
                username: "has space".to_string(),
                email: "x@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: UserRole::Guest,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Rule(CoreError::Validation(_))));
        assert_eq!(db.users().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_by_role_and_delete() {
        let db = test_db().await;
        let host = user(&db, "host1", UserRole::Host).await;
        user(&db, "guest1", UserRole::Guest).await;
        user(&db, "guest2", UserRole::Guest).await;

        let guests = db.users().list_by_role(UserRole::Guest).await.unwrap();
        assert_eq!(guests.len(), 2);
        assert!(db.users().list_by_role(UserRole::Admin).await.unwrap().is_empty());
        assert_eq!(db.users().list().await.unwrap().len(), 3);

        db.users().delete(&host.id).await.unwrap();
        assert!(db.users().delete(&host.id).await.unwrap_err().is_not_found());
        assert_eq!(db.users().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_trimmed_from_username() {
        let db = test_db().await;

        let created = db
            .users()
            .create(&NewUser {
                username: " bob ".to_string(),
                email: "bob@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: UserRole::Guest,
            })
            .await
            .unwrap();

        assert_eq!(created.username, "bob");
        assert!(db.users().get_by_username("bob").await.unwrap().is_some());
    }
}
