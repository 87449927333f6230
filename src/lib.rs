pub mod browser;
pub mod collections;
pub mod config;
pub mod images;
pub mod output;
pub mod query;
pub mod records;
pub mod review;
pub mod scoring;
pub mod source;
pub mod stats;
