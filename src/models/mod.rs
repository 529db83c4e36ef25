//! Data models for packscope.

mod corpus;
mod review;

pub use corpus::{fingerprint, Admission, Corpus};
pub use review::{ProductInfo, ReviewRecord, Sentiment, SignalBreakdown};
