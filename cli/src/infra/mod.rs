//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the AWS clients, filesystem
//! access, archiving, and project config loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod aws;
pub mod cloudformation;
pub mod config;
pub mod fs;
pub mod s3;
