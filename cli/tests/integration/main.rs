//! Integration tests for the aws-install CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior that
//! needs no AWS account: argument parsing, config loading, and the local
//! `parameters` command.

mod parameters_command;
