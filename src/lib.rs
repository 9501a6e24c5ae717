//! The HackerSchool CLI client library.
//!
//! This crate provides the core functionality of `hs-cli`: a command pipeline
//! that talks to the HackerSchool API on behalf of a user, keeps the login
//! session between runs and maps every outcome to an exit code.
//!
//! # Modules
//!
//! - `client`: API client, status translation and login
//! - `command`: the command abstraction and its middleware (login retry, stdin payload)
//! - `commands`: CLI command definitions
//! - `configuration`: configuration file and override resolution
//! - `endpoints`: member and project operations
//! - `error`: command error taxonomy
//! - `exit_codes`: process exit codes
//! - `runner`: executes a command and reports its outcome
//! - `session`: persistent cookie store
//! - `transport`: HTTP transport and its decorators (user agent, logging)

pub mod client;
pub mod command;
pub mod commands;
pub mod configuration;
pub mod endpoints;
pub mod error;
pub mod exit_codes;
pub mod runner;
pub mod session;
pub mod transport;
