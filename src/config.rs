//! Run configuration: defaults, optional CONL file, CLI overrides

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GalleryError, Result};

pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_FALLBACK_ENCODINGS: &[&str] = &["windows-1251", "windows-1252"];
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];
pub const DEFAULT_HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Resolved, immutable configuration passed to every component
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    /// Preferred encoding label, tried first
    pub encoding: String,
    /// Tried in order when the preferred encoding fails
    pub fallback_encodings: Vec<String>,
    pub output_dir: PathBuf,
    /// Lowercase, without leading dot
    pub image_extensions: BTreeSet<String>,
    pub html_extensions: BTreeSet<String>,
}

impl Config {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            encoding: DEFAULT_ENCODING.to_string(),
            fallback_encodings: DEFAULT_FALLBACK_ENCODINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_dir: PathBuf::from("."),
            image_extensions: normalize_extensions(DEFAULT_IMAGE_EXTENSIONS.iter().copied()),
            html_extensions: normalize_extensions(DEFAULT_HTML_EXTENSIONS.iter().copied()),
        }
    }

    /// Overlay values from a config file; fields absent from the file keep their current value
    pub fn apply_file(mut self, file: ConfigFile) -> Self {
        if let Some(dir) = file.input_dir {
            self.input_dir = dir;
        }
        if let Some(encoding) = file.encoding {
            self.encoding = encoding;
        }
        if let Some(fallbacks) = file.fallback_encodings {
            self.fallback_encodings = fallbacks;
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if let Some(exts) = file.image_extensions {
            self.image_extensions = normalize_extensions(exts.iter().map(String::as_str));
        }
        if let Some(exts) = file.html_extensions {
            self.html_extensions = normalize_extensions(exts.iter().map(String::as_str));
        }
        self
    }
}

/// On-disk config, every field optional:
///
/// ```text
/// encoding = windows-1251
/// output_dir = galleries
/// image_extensions
///   = jpg
///   = png
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input_dir: Option<PathBuf>,
    pub encoding: Option<String>,
    pub fallback_encodings: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub image_extensions: Option<Vec<String>>,
    pub html_extensions: Option<Vec<String>>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GalleryError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_conl::from_str(content).map_err(|e| GalleryError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Lowercase and strip leading dots so ".JPG" and "jpg" compare equal
pub fn normalize_extensions<'a>(exts: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    exts.map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
