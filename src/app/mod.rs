// ApiLog - app/mod.rs
//
// Application layer: record store, prompt command parsing, and the
// interactive shell.
// Dependencies: core, platform (file access), ui (rendering).

pub mod commands;
pub mod shell;
pub mod store;
