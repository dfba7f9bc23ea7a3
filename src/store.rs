use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

#[derive(Clone, Debug)]
pub struct StoredUpload {
    pub id: Uuid,
    pub path: PathBuf,
    /// Client-supplied name, reduced to its last path component. Display only.
    pub display_name: String,
}

/// Directory of uploaded files. Every upload gets its own generated name, so
/// client filenames never touch the filesystem.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredUpload> {
        let id = Uuid::new_v4();
        let file_name = match safe_extension(original_name) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        };
        let path = self.dir.join(file_name);

        tokio::fs::write(&path, bytes).await?;
        debug!(bytes = bytes.len(), "Wrote upload");

        Ok(StoredUpload {
            id,
            path,
            display_name: display_name(original_name),
        })
    }
}

pub fn display_name(original_name: &str) -> String {
    original_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("upload")
        .to_string()
}

fn safe_extension(original_name: &str) -> Option<String> {
    let name = display_name(original_name);
    let (stem, ext) = name.rsplit_once('.')?;
    let valid = !stem.is_empty()
        && !ext.is_empty()
        && ext.len() <= 8
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}
