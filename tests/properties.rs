//! Property tests for buildwatch.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/filter.rs"]
mod filter;
