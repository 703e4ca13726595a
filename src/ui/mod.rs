// ApiLog - ui/mod.rs
//
// UI layer: terminal presentation only. Every panel renders to a String;
// the shell decides where it goes.
// Dependencies: core (read-only models), comfy-table, colored.
// Must NOT depend on: app, platform, direct I/O.

pub mod panels;
pub mod theme;
