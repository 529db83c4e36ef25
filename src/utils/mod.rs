//! Shared utility functions.
//!
//! - `filename`: deterministic names for downloaded images and crawl folders
//! - `mime`: content-type checks and magic-byte sniffing for images

mod filename;
mod mime;

pub use filename::{
    crawl_folder_name, modal_image_name, product_image_name, review_image_name, safe_reviewer,
};
pub use mime::{is_image_content_type, sniff_image};
