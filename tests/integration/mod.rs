//! Integration tests for the gateway.

pub mod common;
pub mod sqlite_test;
