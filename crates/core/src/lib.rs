//! OmniOrder Core - Shared types library.
//!
//! This crate provides common types used across all OmniOrder components:
//! - `client` - Session, password recovery and order flows over the REST backend
//! - `cli` - Command-line front end for the client flows
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no token
//! storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, one-time codes and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
