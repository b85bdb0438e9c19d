//! CLI subcommands.

pub mod bounds;
pub mod classify;
pub mod common;
pub mod polygon;
pub mod render;
