//! Library side of the `nemt837` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
