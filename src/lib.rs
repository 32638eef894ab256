//! unitodo - TODO annotation parsing, status classification and ordering
//!
//! Todo lines carry an optional head (`<priority><id><done>`) in front of
//! their text. This crate parses those heads, encodes the compact
//! 5-character timestamps they use, classifies status markers against
//! configurable state sets, and orders scanner output for display.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{
    parse, sort_records, Codec, FilterMode, ParsedAnnotation, Rank, StatusConfig, TodoRecord,
};
