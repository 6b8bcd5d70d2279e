//! End-to-end runs through `CliContext`

mod data_contracts;
mod output_contracts;
mod run_contracts;
mod support;
