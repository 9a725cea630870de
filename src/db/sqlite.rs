use crate::db::models::{AccountFields, AccountRecord, DbUser, NewUser};
use crate::db::schema::SQLITE_INIT;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Error as SqlxError, Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Access layer over the `users` and `accounts` tables. Constructed once at
/// start-up and injected into the router state; every method is a single
/// atomic store call scoped by the relevant ids.
///
/// Methods return raw `sqlx::Error` so callers can attach the
/// operation-specific failure response.
#[derive(Clone)]
pub struct VaultStorage {
    pool: SqlitePool,
}

impl VaultStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the SQLite database behind `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, SqlxError> {
        let connect_opts =
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SqlxError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new user row. Returns the new row id; a UNIQUE violation on
    /// `email` surfaces as the underlying database error.
    pub async fn insert_user(&self, user: &NewUser) -> Result<i64, SqlxError> {
        let result = sqlx::query(
            r#"INSERT INTO users (firstname, middlename, lastname, email, password_hash, profile_picture)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user.firstname)
        .bind(&user.middlename)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_picture)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<DbUser>, SqlxError> {
        let row = sqlx::query(
            r#"SELECT id, firstname, middlename, lastname, email, password_hash, profile_picture, token
               FROM users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<DbUser>, SqlxError> {
        let row = sqlx::query(
            r#"SELECT id, firstname, middlename, lastname, email, password_hash, profile_picture, token
               FROM users WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    /// Rotate or clear the stored session token; passing `None` revokes any
    /// live token for the user.
    pub async fn set_session_token(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> Result<(), SqlxError> {
        sqlx::query("UPDATE users SET token = ? WHERE id = ?")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert a new account row owned by `user_id`. Returns the new row id.
    pub async fn insert_account(
        &self,
        user_id: i64,
        fields: &AccountFields,
    ) -> Result<i64, SqlxError> {
        let result = sqlx::query(
            r#"INSERT INTO accounts (user_id, site, username, password, image)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(&fields.site)
        .bind(&fields.username)
        .bind(&fields.password)
        .bind(&fields.image)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn accounts_for_user(&self, user_id: i64) -> Result<Vec<AccountRecord>, SqlxError> {
        sqlx::query_as::<_, AccountRecord>(
            r#"SELECT id, site, username, password, image
               FROM accounts WHERE user_id = ? ORDER BY id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Update an account filtered by both `id` and owner. Returns the number
    /// of rows affected; zero means the row does not exist or belongs to a
    /// different user, which callers deliberately do not distinguish.
    pub async fn update_account(
        &self,
        id: i64,
        user_id: i64,
        fields: &AccountFields,
    ) -> Result<u64, SqlxError> {
        let result = sqlx::query(
            r#"UPDATE accounts SET site = ?, username = ?, password = ?, image = ?
               WHERE id = ? AND user_id = ?"#,
        )
        .bind(&fields.site)
        .bind(&fields.username)
        .bind(&fields.password)
        .bind(&fields.image)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete an account filtered by both `id` and owner. Returns the number
    /// of rows affected, with the same zero-rows semantics as `update_account`.
    pub async fn delete_account(&self, id: i64, user_id: i64) -> Result<u64, SqlxError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn row_to_user(row: SqliteRow) -> Result<DbUser, SqlxError> {
        Ok(DbUser {
            id: row.try_get("id")?,
            firstname: row.try_get("firstname")?,
            middlename: row.try_get("middlename")?,
            lastname: row.try_get("lastname")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            profile_picture: row.try_get("profile_picture")?,
            token: row.try_get("token")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_storage() -> VaultStorage {
        // Single connection so every query sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory sqlite");
        let storage = VaultStorage::new(pool);
        storage.init_schema().await.expect("schema init failed");
        storage
    }

    fn test_user(email: &str) -> NewUser {
        NewUser {
            firstname: "Ada".to_string(),
            middlename: None,
            lastname: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "$2b$12$notarealhash".to_string(),
            profile_picture: "https://example.com/default-profile.png".to_string(),
        }
    }

    fn sample_fields(site: &str) -> AccountFields {
        AccountFields {
            site: site.to_string(),
            username: "alice".to_string(),
            password: "p@ss".to_string(),
            image: "images/default.png".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let storage = memory_storage().await;
        storage.insert_user(&test_user("a@b.com")).await.unwrap();
        let err = storage.insert_user(&test_user("a@b.com")).await.unwrap_err();
        assert!(
            err.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
        );
    }

    #[tokio::test]
    async fn session_token_rotation_round_trips() {
        let storage = memory_storage().await;
        let id = storage.insert_user(&test_user("a@b.com")).await.unwrap();

        storage.set_session_token(id, Some("tok-1")).await.unwrap();
        let user = storage.user_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.token.as_deref(), Some("tok-1"));

        storage.set_session_token(id, None).await.unwrap();
        let user = storage.user_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.token, None);
    }

    #[tokio::test]
    async fn account_access_is_owner_scoped() {
        let storage = memory_storage().await;
        let owner = storage.insert_user(&test_user("owner@b.com")).await.unwrap();
        let other = storage.insert_user(&test_user("other@b.com")).await.unwrap();

        let account_id = storage
            .insert_account(owner, &sample_fields("github.com"))
            .await
            .unwrap();

        // The other user sees nothing and mutates nothing.
        assert!(storage.accounts_for_user(other).await.unwrap().is_empty());
        let changed = storage
            .update_account(account_id, other, &sample_fields("evil.com"))
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(storage.delete_account(account_id, other).await.unwrap(), 0);

        // The owner's row is untouched by the failed takeover.
        let rows = storage.accounts_for_user(owner).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].site, "github.com");

        assert_eq!(storage.delete_account(account_id, owner).await.unwrap(), 1);
        assert_eq!(storage.delete_account(account_id, owner).await.unwrap(), 0);
    }
}
