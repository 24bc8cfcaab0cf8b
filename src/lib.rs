//! Cutter - a small URL shortener
//!
//! Users sign in with GitHub, create short links (explicit or generated
//! names, deduplicated by destination), and manage the links they own.
//! Administrators can block links and users.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Administrative subcommands
//!
//! # Architecture
//! - `storage`: SeaORM persistence for users, roles and links
//! - `services`: Link registry, user directory, name generator, identity provider
//! - `api`: HTTP handlers, session middleware and authorization policies
//! - `interfaces`: Command-line administration
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
