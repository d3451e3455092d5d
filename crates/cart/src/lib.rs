//! ATLVS cart service library.
//!
//! Exposes the cart orchestration as a library - session, snapshot
//! store, upstream client, and routes - so it can be tested without a
//! running binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod upstream;
