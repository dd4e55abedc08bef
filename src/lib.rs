//! db-gateway - A minimal HTTP-to-SQL gateway for SQLite.
//!
//! Accepts JSON-encoded SQL over HTTP (`POST /query`, `POST /batch`), runs it
//! against a SQLite database and returns rows as JSON.
//!
//! The gateway passes SQL through verbatim. It performs no authentication,
//! no statement validation and no limits on statement count or size, so it
//! must only be exposed to trusted callers.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod server;
