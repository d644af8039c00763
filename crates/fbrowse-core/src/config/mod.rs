//! Configuration management.
//!
//! Resolver, listing and subtitle preferences ([`settings::Config`]) are
//! stored as a TOML file and loaded at startup.

pub mod settings;
