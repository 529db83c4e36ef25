//! File and folder names for crawl output.

use chrono::NaiveDate;

/// Reviewer name reduced to `[A-Za-z0-9_]`, spaces becoming underscores.
pub fn safe_reviewer(name: &str) -> String {
    name.replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// `{reviewer}_review{index}_{position}.jpg`
pub fn review_image_name(safe_reviewer: &str, review_index: usize, position: usize) -> String {
    format!("{}_review{}_{}.jpg", safe_reviewer, review_index, position)
}

/// `{reviewer}_review{index}_modal_{position}.jpg`
pub fn modal_image_name(safe_reviewer: &str, review_index: usize, position: usize) -> String {
    format!("{}_review{}_modal_{}.jpg", safe_reviewer, review_index, position)
}

pub fn product_image_name() -> &'static str {
    "product.jpg"
}

/// `{label}_{YYYY-MM-DD}` with the label reduced like a reviewer name.
pub fn crawl_folder_name(label: &str, date: NaiveDate) -> String {
    let label = safe_reviewer(label.trim());
    let label = if label.is_empty() { "product" } else { label.as_str() };
    format!("{}_{}", label, date.format("%Y-%m-%d"))
}
