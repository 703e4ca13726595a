// ApiLog - core/mod.rs
//
// Core business logic layer: classification, display cleanup, filtering,
// summaries, and export serialisation.
// Must NOT depend on: ui, platform, app, or touch the filesystem directly.

pub mod classifier;
pub mod display;
pub mod export;
pub mod filter;
pub mod model;
pub mod summary;
pub mod timestamp;
