use super::{DEFAULT_IMAGE, ImageStore, is_absolute_url};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Filesystem-backed image store rooted at a configured directory. The
/// directory is created eagerly so a misconfigured root fails at start-up,
/// not on the first upload.
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generated_name(original_name: &str) -> String {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "png".to_string());
        format!("image-{}.{ext}", Uuid::new_v4())
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let name = Self::generated_name(original_name);
        tokio::fs::write(self.root.join(&name), bytes).await?;
        debug!(name, size = bytes.len(), "stored uploaded image");
        Ok(format!("images/{name}"))
    }

    async fn remove(&self, image: &str) -> io::Result<()> {
        if image == DEFAULT_IMAGE || is_absolute_url(image) {
            return Ok(());
        }
        let Some(name) = image.strip_prefix("images/") else {
            return Ok(());
        };
        // Stored names are flat; anything path-like did not come from us.
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Ok(());
        }
        tokio::fs::remove_file(self.root.join(name)).await?;
        debug!(name, "removed stored image");
        Ok(())
    }
}
