//! Authenticated review crawling.
//!
//! [`ReviewCrawler`] drives a [`browser::Driver`] through sign-in, the initial
//! unfiltered harvest and the keyword re-queries. The remaining modules are
//! the pieces it is built from.

pub mod browser;
pub mod config;
mod crawler;
pub mod error;
pub mod pagination;
pub mod product;
pub mod reviews;
pub mod search;
pub mod session;
pub mod site;
mod user_agent;

pub use browser::{BrowserEngineConfig, ChromeDriver, Driver};
pub use config::{CrawlSettings, CrawlTimings};
pub use crawler::ReviewCrawler;
pub use error::{AuthError, CrawlError, CrawlWarning, DriverError, TargetError};
pub use session::Credentials;
pub use site::{ReviewTarget, SiteProfile};
pub use user_agent::resolve_user_agent;
