// ApiLog - ui/panels/mod.rs

pub mod detail;
pub mod entries;
pub mod help;
pub mod summary;
