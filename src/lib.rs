pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod token;
pub mod types;

pub use error::VaultError;
pub use router::AppState;
