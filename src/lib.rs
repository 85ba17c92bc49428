//! Shared pieces of the `classmap` and `class-usage` binaries

pub mod commands;
pub mod logging;
