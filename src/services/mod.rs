//! Service layer for packscope.
//!
//! Services sit between the crawler and the outside world; they can be used
//! by the CLI or by any other caller of the library.

pub mod download;

pub use download::{ImageDownloader, ImageFetch, ImageSettings, VariantRule};
