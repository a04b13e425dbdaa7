//! Common utilities for the tagscan tokenizer.
//!
//! This crate provides shared infrastructure used by the tokenizer and its tools:
//! - **Warning System** - colored, deduplicated terminal output for recoverable issues

pub mod warning;
