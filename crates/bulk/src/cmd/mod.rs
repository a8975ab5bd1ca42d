//! Command implementations for the bulk CLI

pub mod run;
