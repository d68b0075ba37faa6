//! Grouping of extracted records into date-ordered groups

use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use crate::types::{DateGroup, Gallery, GroupKey, ImageRecord, RunStats};

/// Accumulates records across files in traversal order
#[derive(Debug, Default)]
pub struct Aggregator {
    dated: BTreeMap<Reverse<NaiveDate>, Vec<ImageRecord>>,
    undated: Vec<ImageRecord>,
    unique: HashSet<String>,
    files_processed: usize,
    files_skipped: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add all records of one successfully read file
    pub fn push_file(&mut self, records: Vec<ImageRecord>) {
        self.files_processed += 1;
        for record in records {
            self.push(record);
        }
    }

    fn push(&mut self, record: ImageRecord) {
        self.unique.insert(record.image_reference.clone());
        match record.associated_date {
            Some(date) => self.dated.entry(Reverse(date)).or_default().push(record),
            None => self.undated.push(record),
        }
    }

    /// Count a file that could not be read or decoded
    pub fn record_skipped(&mut self) {
        self.files_skipped += 1;
    }

    /// Freeze into groups: most recent date first, undated last
    pub fn finish(self) -> Gallery {
        let distinct_dates = self.dated.len();
        let mut groups: Vec<DateGroup> = self
            .dated
            .into_iter()
            .map(|(Reverse(date), images)| DateGroup {
                key: GroupKey::Dated(date),
                images,
            })
            .collect();

        if !self.undated.is_empty() {
            let mut undated = DateGroup::new(GroupKey::from_date(None));
            undated.images = self.undated;
            groups.push(undated);
        }

        let stats = RunStats {
            files_discovered: self.files_processed + self.files_skipped,
            files_processed: self.files_processed,
            files_skipped: self.files_skipped,
            images_found: groups.iter().map(|g| g.count()).sum(),
            unique_images: self.unique.len(),
            distinct_dates,
        };

        Gallery { groups, stats }
    }
}

/// Group a flat record sequence in one step; file counters stay at zero
#[cfg(test)]
pub(crate) fn aggregate(records: impl IntoIterator<Item = ImageRecord>) -> Gallery {
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish()
}
