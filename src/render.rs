use chrono::NaiveDateTime;

use crate::types::{DateGroup, Gallery, RunStats};

// HTML generation helpers
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// CSS styles for the gallery page
fn css_styles() -> &'static str {
    r#"
:root {
    --text: #333;
    --text-muted: #666;
    --border: #ccc;
    --bg: #f9f9f9;
    --radius: 8px;
}

body {
    font-family: Arial, sans-serif;
    margin: 0;
    padding: 20px;
    background: var(--bg);
    color: var(--text);
}

h1 {
    text-align: center;
    margin-bottom: 20px;
}

h2 {
    margin-top: 40px;
    border-bottom: 2px solid var(--border);
    padding-bottom: 5px;
    color: #555;
}

h2 .count {
    font-size: 0.7em;
    font-weight: normal;
    color: var(--text-muted);
}

.stats {
    text-align: center;
    margin-bottom: 30px;
    color: var(--text-muted);
}

.gallery {
    display: grid;
    gap: 20px;
    padding: 20px;
}

@media (min-width: 1200px) {
    .gallery { grid-template-columns: repeat(12, 1fr); }
}

@media (min-width: 800px) and (max-width: 1199px) {
    .gallery { grid-template-columns: repeat(10, 1fr); }
}

@media (max-width: 799px) {
    .gallery { grid-template-columns: repeat(6, 1fr); }
}

.gallery a {
    position: relative;
    overflow: hidden;
    border-radius: var(--radius);
    transition: transform 0.3s, box-shadow 0.3s;
}

.gallery a:hover {
    transform: scale(1.05);
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1);
}

.gallery img {
    width: 100%;
    height: auto;
    display: block;
    object-fit: cover;
}

.no-images {
    text-align: center;
    color: #888;
    margin-top: 50px;
}

footer {
    text-align: center;
    margin-top: 50px;
    color: #999;
    font-size: 0.9em;
}
"#
}

/// Generate page header HTML
fn page_header(stats: &RunStats, generated_at: &NaiveDateTime) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Image Gallery</title>
    <style>{}</style>
</head>
<body>
    <h1>Image Gallery</h1>
    <div class="stats">
        <p>Total images found: {}</p>
        <p>{} date groups &middot; {} files processed &middot; {} skipped</p>
        <p>Generated {}</p>
    </div>
"#,
        css_styles(),
        stats.images_found,
        stats.distinct_dates,
        stats.files_processed,
        stats.files_skipped,
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Generate page footer HTML
fn page_footer(generated_at: &NaiveDateTime) -> String {
    format!(
        r#"    <footer>
        Generated on {}
    </footer>
</body>
</html>
"#,
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// One date heading plus its image grid
fn group_section_html(group: &DateGroup) -> String {
    let mut html = format!(
        "    <section>\n        <h2>{} <span class=\"count\">({} images)</span></h2>\n        <div class=\"gallery\">\n",
        html_escape(&group.key.display_name()),
        group.count()
    );
    for record in &group.images {
        let link = html_escape(&record.image_reference);
        html.push_str(&format!(
            "            <a href=\"{link}\" target=\"_blank\"><img src=\"{link}\" alt=\"Image\" loading=\"lazy\" decoding=\"async\"></a>\n"
        ));
    }
    html.push_str("        </div>\n    </section>\n");
    html
}

/// Render the whole gallery as one self-contained document
pub fn render_gallery(gallery: &Gallery, generated_at: &NaiveDateTime) -> String {
    let mut html = page_header(&gallery.stats, generated_at);

    if gallery.groups.is_empty() {
        html.push_str("    <div class=\"no-images\">No images found.</div>\n");
    } else {
        for group in &gallery.groups {
            html.push_str(&group_section_html(group));
        }
    }

    html.push_str(&page_footer(generated_at));
    html
}
