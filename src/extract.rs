//! Image reference extraction from parsed HTML

use scraper::{Html, Node};
use std::collections::BTreeSet;
use std::path::Path;

use crate::dates::DateContext;
use crate::types::ImageRecord;

/// (element, attribute) pairs that can point at an image
const REFERENCE_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("img", "src"),
    ("img", "data-src"),
    ("source", "src"),
    ("image", "href"),
];

/// Elements whose text is never shown and so never carries a date marker
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "template"];

/// True if `reference` ends in one of `extensions` once query and fragment are stripped
pub fn is_image_reference(reference: &str, extensions: &BTreeSet<String>) -> bool {
    let path = reference.trim();
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => extensions.contains(&ext.to_lowercase()),
        _ => false,
    }
}

/// Walk `html` in document order and emit one record per qualifying image reference.
///
/// Text is buffered between references and fed to the date context just before
/// each reference is considered, so markers split across inline elements
/// ("15 <b>янв</b> 2024") still resolve.
pub fn extract_images(
    source_file: &Path,
    html: &str,
    extensions: &BTreeSet<String>,
) -> Vec<ImageRecord> {
    let document = Html::parse_document(html);
    let mut context = DateContext::new();
    let mut pending_text = String::new();
    let mut records = Vec::new();

    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
                });
                if !hidden {
                    pending_text.push_str(text);
                    pending_text.push(' ');
                }
            }
            Node::Element(element) => {
                let name = element.name();
                let references = REFERENCE_ATTRIBUTES
                    .iter()
                    .filter(|(tag, _)| *tag == name)
                    .filter_map(|(_, attr)| element.attr(attr))
                    .map(str::trim)
                    .filter(|r| is_image_reference(r, extensions));

                for reference in references {
                    if !pending_text.is_empty() {
                        context.observe(&pending_text);
                        pending_text.clear();
                    }
                    records.push(ImageRecord {
                        source_file: source_file.to_path_buf(),
                        image_reference: reference.to_string(),
                        associated_date: context.current(),
                    });
                }
            }
            _ => {}
        }
    }

    records
}
