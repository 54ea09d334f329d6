//! Subcommands

pub mod abi;
