//! RegimeLab Core: price data layer and the yearly-return partitioning pipeline.
//!
//! This crate contains:
//! - Domain types (price points, trading days, yearly and partitioned returns, party terms)
//! - Price providers (Yahoo Finance, CSV import), ingest validation, Parquet cache
//! - Presidency reference table loading
//! - The pipeline: daily returns → year tags → yearly rollup → presidency partitions

pub mod data;
pub mod domain;
pub mod error;
pub mod pipeline;

pub use error::AnalysisError;
