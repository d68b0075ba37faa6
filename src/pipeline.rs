//! One batch run: discover, read, extract, aggregate, render, write

use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::discovery::HtmlFiles;
use crate::encoding::read_with_fallback;
use crate::error::{Result, RunFailure};
use crate::extract::extract_images;
use crate::output::{gallery_file_name, write_gallery};
use crate::render::render_gallery;
use crate::types::{Gallery, RunReport};

/// Files between two progress lines
const PROGRESS_INTERVAL: usize = 50;

/// Report on the first file, every `PROGRESS_INTERVAL` files, and the last one
fn is_progress_step(done: usize, total: usize) -> bool {
    done == 1 || done == total || done % PROGRESS_INTERVAL == 0
}

pub struct Pipeline<'a> {
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Scan every HTML file and build the in-memory gallery.
    ///
    /// Only an unusable input directory is an error; unreadable files are skipped and counted.
    pub fn collect(&self) -> Result<Gallery> {
        let files = HtmlFiles::open(&self.config.input_dir, &self.config.html_extensions)?;
        let paths: Vec<PathBuf> = files.iter().collect();
        let total = paths.len();
        info!("Scanning {} ({} HTML files)", files.root().display(), total);

        let start = Instant::now();
        let mut aggregator = Aggregator::new();

        for (i, path) in paths.into_iter().enumerate() {
            if is_progress_step(i + 1, total) {
                info!("[{}/{}] {}", i + 1, total, path.display());
            }
            let decoded = match read_with_fallback(
                &path,
                &self.config.encoding,
                &self.config.fallback_encodings,
            ) {
                Ok(d) => d,
                Err(e) if e.is_recoverable() => {
                    warn!("Could not read file: {}", e);
                    aggregator.record_skipped();
                    continue;
                }
                Err(e) => return Err(e),
            };

            let records = extract_images(&path, &decoded.text, &self.config.image_extensions);
            debug!(
                "{}: {} images ({})",
                path.display(),
                records.len(),
                decoded.encoding.name()
            );
            aggregator.push_file(records);
        }

        let gallery = aggregator.finish();
        if gallery.stats.files_discovered == 0 {
            warn!("No HTML files found to process");
        }
        info!(
            "Processing completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );
        info!("Found {} total images", gallery.stats.images_found);

        Ok(gallery)
    }

    /// Render and write the gallery; the gallery stays with the caller if this fails
    pub fn write(&self, gallery: &Gallery, generated_at: &NaiveDateTime) -> Result<PathBuf> {
        let html = render_gallery(gallery, generated_at);
        let path = write_gallery(
            &self.config.output_dir,
            &gallery_file_name(generated_at),
            &html,
        )?;
        info!("Gallery created: {}", path.display());
        Ok(path)
    }

    /// Collect then write. A write failure still carries the collected counts.
    pub fn run(&self) -> std::result::Result<RunReport, RunFailure> {
        let gallery = self.collect()?;
        match self.write(&gallery, &Local::now().naive_local()) {
            Ok(output_file) => Ok(RunReport {
                output_file,
                stats: gallery.stats,
            }),
            Err(error) => Err(RunFailure {
                stats: Some(gallery.stats),
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;
    use crate::types::GroupKey;
    use chrono::NaiveDate;
    use encoding_rs::WINDOWS_1251;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const CHAT_A: &str = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Сообщения</title></head>
<body>
<div class="message">
  <div class="message__header">Вы, 15 янв 2024 в 10:12</div>
  <div>Смотри <a href="https://sun9-1.userapi.com/photo1.jpg?size=604x453">фото</a></div>
  <a href="photos/IMG_0002.JPG">фото</a>
</div>
<div class="message">
  <div class="message__header">Вы, 3 мар 2023 в 09:00</div>
  <a href="files/doc.pdf">doc</a>
  <a href="photos/old.png">old</a>
</div>
</body></html>"#;

    const CHAT_B: &str = r#"<html><body>
<a href="b/first.gif">no date yet</a>
<div class="message__header">Иван, 15 янв 2024</div>
<img src="b/second.webp">
</body></html>"#;

    fn setup() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export");
        fs::create_dir_all(input.join("sub")).unwrap();
        fs::write(input.join("a.html"), CHAT_A).unwrap();
        fs::write(input.join("sub/b.htm"), CHAT_B).unwrap();
        fs::write(input.join("readme.txt"), "<a href=\"x.jpg\">").unwrap();

        let mut config = Config::new(&input);
        config.output_dir = dir.path().join("out");
        (dir, config)
    }

    fn group_refs(gallery: &Gallery) -> Vec<(GroupKey, Vec<String>)> {
        gallery
            .groups
            .iter()
            .map(|g| {
                (
                    g.key,
                    g.images.iter().map(|r| r.image_reference.clone()).collect(),
                )
            })
            .collect()
    }

    fn dated(y: i32, m: u32, d: u32) -> GroupKey {
        GroupKey::Dated(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_collect_groups_across_files() {
        let (_dir, config) = setup();
        let gallery = Pipeline::new(&config).collect().unwrap();

        assert_eq!(
            group_refs(&gallery),
            vec![
                (
                    dated(2024, 1, 15),
                    vec![
                        "https://sun9-1.userapi.com/photo1.jpg?size=604x453".to_string(),
                        "photos/IMG_0002.JPG".to_string(),
                        "b/second.webp".to_string(),
                    ]
                ),
                (dated(2023, 3, 3), vec!["photos/old.png".to_string()]),
                (GroupKey::Undated, vec!["b/first.gif".to_string()]),
            ]
        );
        assert_eq!(gallery.stats.files_discovered, 2);
        assert_eq!(gallery.stats.files_processed, 2);
        assert_eq!(gallery.stats.files_skipped, 0);
        assert_eq!(gallery.stats.images_found, 5);
        assert_eq!(gallery.stats.distinct_dates, 2);
        assert_eq!(gallery.total_images(), gallery.stats.images_found);
    }

    #[test]
    fn test_collect_is_deterministic() {
        let (_dir, config) = setup();
        let pipeline = Pipeline::new(&config);
        let first = pipeline.collect().unwrap();
        let second = pipeline.collect().unwrap();
        assert_eq!(group_refs(&first), group_refs(&second));
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_fallback_encoding_and_skipped_file() {
        let (_dir, mut config) = setup();
        let (bytes, _, _) =
            WINDOWS_1251.encode("<p>Петр, 1 фев 2022</p><a href=\"cp.jpg\">фото</a>");
        fs::write(config.input_dir.join("c.html"), &bytes).unwrap();

        let gallery = Pipeline::new(&config).collect().unwrap();
        let feb = gallery
            .groups
            .iter()
            .find(|g| g.key == dated(2022, 2, 1))
            .unwrap();
        assert_eq!(feb.images[0].image_reference, "cp.jpg");

        // Without fallbacks the cp1251 file cannot be decoded and is skipped
        config.fallback_encodings.clear();
        let gallery = Pipeline::new(&config).collect().unwrap();
        assert_eq!(gallery.stats.files_skipped, 1);
        assert_eq!(gallery.stats.files_processed, 2);
        assert_eq!(gallery.stats.images_found, 5);
        assert!(gallery.stats.is_partial());
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path().join("nope"));
        let failure = Pipeline::new(&config).run().unwrap_err();
        assert!(matches!(failure.error, GalleryError::InputNotFound(_)));
        assert!(failure.stats.is_none());
    }

    #[test]
    fn test_run_writes_gallery() {
        let (_dir, config) = setup();
        let report = Pipeline::new(&config).run().unwrap();

        let name = report.output_file.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("gallery_") && name.ends_with(".html"));
        assert_eq!(report.output_file.parent(), Some(config.output_dir.as_path()));

        let html = fs::read_to_string(&report.output_file).unwrap();
        assert_eq!(html.matches("<img ").count(), report.stats.images_found);
        assert!(html.contains("15.01.2024"));
    }

    #[test]
    fn test_empty_input_produces_empty_gallery() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("page.html"), "<p>нет картинок</p>").unwrap();
        let mut config = Config::new(&input);
        config.output_dir = dir.path().to_path_buf();

        let report = Pipeline::new(&config).run().unwrap();
        assert_eq!(report.stats.images_found, 0);
        assert_eq!(report.stats.files_processed, 1);
        let html = fs::read_to_string(&report.output_file).unwrap();
        assert!(html.contains("No images found."));
    }

    #[test]
    fn test_write_failure_keeps_gallery() {
        let (dir, mut config) = setup();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        config.output_dir = blocker.join("out");

        let pipeline = Pipeline::new(&config);
        let gallery = pipeline.collect().unwrap();
        let at = Local::now().naive_local();
        let err = pipeline.write(&gallery, &at).unwrap_err();
        assert!(matches!(err, GalleryError::OutputWrite { .. }));

        // Retry to a writable location with the same in-memory result
        let retry = Config {
            output_dir: dir.path().join("retry"),
            ..config.clone()
        };
        let path = Pipeline::new(&retry).write(&gallery, &at).unwrap();
        assert!(Path::new(&path).exists());
    }

    #[test]
    fn test_failed_write_still_reports_counts() {
        let (dir, mut config) = setup();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        config.output_dir = blocker.join("out");

        let failure = Pipeline::new(&config).run().unwrap_err();
        assert!(matches!(failure.error, GalleryError::OutputWrite { .. }));
        assert!(failure.to_string().starts_with("Failed to write gallery"));

        let stats = failure.stats.unwrap();
        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_skipped, 0);
        assert_eq!(stats.images_found, 5);
        assert_eq!(stats.distinct_dates, 2);
    }

    #[test]
    fn test_progress_steps() {
        let steps: Vec<usize> = (1..=120).filter(|&i| is_progress_step(i, 120)).collect();
        assert_eq!(steps, vec![1, 50, 100, 120]);
        assert!(is_progress_step(1, 1));
        assert!(!is_progress_step(2, 3));
    }
}
