//! CLI commands

pub mod delete;
pub mod list;
pub mod render;
pub mod show;
