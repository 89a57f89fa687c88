pub mod config;
pub mod error;
pub mod extractor;
pub mod loaders;
pub mod models;
pub mod readers;
pub mod storage;
