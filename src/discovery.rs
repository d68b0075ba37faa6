//! Recursive discovery of HTML files under the input directory

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{GalleryError, Result};

/// Validated input root; `iter()` can be called any number of times
#[derive(Debug, Clone)]
pub struct HtmlFiles {
    root: PathBuf,
    extensions: BTreeSet<String>,
}

impl HtmlFiles {
    pub fn open(root: &Path, extensions: &BTreeSet<String>) -> Result<Self> {
        let access_err = |e: std::io::Error| match e.kind() {
            ErrorKind::NotFound => GalleryError::InputNotFound(root.to_path_buf()),
            _ => GalleryError::PermissionDenied(root.to_path_buf()),
        };

        let metadata = fs::metadata(root).map_err(access_err)?;
        if !metadata.is_dir() {
            return Err(GalleryError::InputNotFound(root.to_path_buf()));
        }
        fs::read_dir(root).map_err(access_err)?;

        let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        Ok(Self {
            root,
            extensions: extensions.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh lexically-ordered walk over matching files
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(move |e| has_extension(e.path(), &self.extensions))
            .map(|e| e.into_path())
    }
}

/// Case-insensitive extension check against a normalized set
pub fn has_extension(path: &Path, extensions: &BTreeSet<String>) -> bool {
    path.extension()
        .map(|ext| extensions.contains(&ext.to_string_lossy().to_lowercase()))
        .unwrap_or(false)
}
