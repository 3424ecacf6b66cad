//! Shared test helpers for `einvoice-core` integration tests.
//!
//! In-memory fakes for the staging store and the gateway, plus row builders,
//! so the service tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod fakes;
pub mod rows;
