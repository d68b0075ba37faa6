//! Gallery data model shared by the extraction, aggregation and rendering passes

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// A single image reference found in an HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub source_file: PathBuf,
    /// Path or URL exactly as it appeared in the markup (trimmed)
    pub image_reference: String,
    /// Date marker active when the reference was encountered
    pub associated_date: Option<NaiveDate>,
}

/// Key of a date group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Dated(NaiveDate),
    Undated,
}

impl GroupKey {
    pub fn from_date(date: Option<NaiveDate>) -> Self {
        match date {
            Some(d) => GroupKey::Dated(d),
            None => GroupKey::Undated,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            GroupKey::Dated(d) => Some(*d),
            GroupKey::Undated => None,
        }
    }

    /// Human-readable label, e.g. "15.01.2024"
    pub fn display_name(&self) -> String {
        match self {
            GroupKey::Dated(d) => d.format("%d.%m.%Y").to_string(),
            GroupKey::Undated => "Undated".to_string(),
        }
    }
}

/// Images sharing one calendar day (or the undated bucket)
#[derive(Debug, Clone)]
pub struct DateGroup {
    pub key: GroupKey,
    pub images: Vec<ImageRecord>,
}

impl DateGroup {
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            images: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.images.len()
    }
}

/// Run-level counters reported after a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub images_found: usize,
    pub unique_images: usize,
    pub distinct_dates: usize,
}

impl RunStats {
    pub fn is_partial(&self) -> bool {
        self.files_skipped > 0
    }
}

/// Aggregated, sorted result of one run
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    pub groups: Vec<DateGroup>,
    pub stats: RunStats,
}

impl Gallery {
    pub fn total_images(&self) -> usize {
        self.groups.iter().map(|g| g.count()).sum()
    }
}

/// Structured outcome of a completed run, printed as the summary
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub output_file: PathBuf,
    #[serde(flatten)]
    pub stats: RunStats,
}
