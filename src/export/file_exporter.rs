use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;

use crate::error_handling::types::ExportError;
use crate::export::exporter::Exporter;

/// Writes exported captures into a target directory.
///
/// Filenames that already exist get a ` (n)` counter inserted before the
/// extension, the way browser download managers uniquify, since several
/// captures can legitimately share a display name.
pub struct FileExporter {
    out_dir: PathBuf,
}

impl FileExporter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    async fn unique_path(&self, filename: &str) -> Result<PathBuf, ExportError> {
        let candidate = self.out_dir.join(filename);
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        let (stem, ext) = match filename.rsplit_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (filename, None),
        };
        let mut counter = 1u32;
        loop {
            let name = match ext {
                Some(ext) => format!("{} ({}).{}", stem, counter, ext),
                None => format!("{} ({})", stem, counter),
            };
            let candidate = self.out_dir.join(name);
            if !tokio::fs::try_exists(&candidate).await? {
                return Ok(candidate);
            }
            counter += 1;
        }
    }
}

#[async_trait]
impl Exporter for FileExporter {
    async fn save(&self, payload: &[u8], filename: &str) -> Result<(), ExportError> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.unique_path(filename).await?;
        tokio::fs::write(&path, payload).await?;
        info!("exported {} ({} bytes)", path.display(), payload.len());
        Ok(())
    }
}
