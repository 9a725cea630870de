//! Blob storage for uploaded account images.
//!
//! One capability behind one interface: the deploy target picks an
//! implementation at start-up instead of branching inside request handlers.
//! Stored references are either `images/<name>.<ext>` paths served by this
//! process or absolute URLs for externally hosted defaults.

pub mod local;

pub use local::LocalImageStore;

use async_trait::async_trait;
use std::io;

/// Well-known placeholder used when an account has no uploaded image.
pub const DEFAULT_IMAGE: &str = "images/default.png";

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an uploaded image under a generated name and return its
    /// stored `images/...` reference.
    async fn store(&self, original_name: &str, bytes: &[u8]) -> io::Result<String>;

    /// Remove a previously stored image. The default placeholder and
    /// absolute URLs are left alone.
    async fn remove(&self, image: &str) -> io::Result<()>;
}

/// True for references hosted outside this process (e.g. a CDN default).
pub fn is_absolute_url(image: &str) -> bool {
    url::Url::parse(image).is_ok()
}

/// Normalize a stored image reference for client consumption: absolute URLs
/// pass through untouched, stored paths get backslashes folded to forward
/// slashes so rows written by a Windows host read the same everywhere.
pub fn normalize_image_path(image: &str) -> String {
    if is_absolute_url(image) {
        image.to_string()
    } else {
        image.replace('\\', "/")
    }
}
