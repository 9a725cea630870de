//! SQL DDL for initializing the user and account storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `users.email` UNIQUE (creates an index implicitly)
/// - `users.token` holding the single live session token, NULL when revoked
/// - `accounts.user_id` referencing the owning user; every access path
///   filters on it in addition to `accounts.id`
/// - `accounts.image` defaulting to the bundled placeholder image
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    firstname TEXT NOT NULL,
    middlename TEXT NULL,
    lastname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    profile_picture TEXT NULL,
    token TEXT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    site TEXT NOT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL,
    image TEXT NOT NULL DEFAULT 'images/default.png'
);

CREATE INDEX IF NOT EXISTS idx_accounts_user_id ON accounts(user_id);
"#;
