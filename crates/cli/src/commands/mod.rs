//! CLI subcommands.

pub mod storage;
