//! Core types for OmniOrder.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod otp;
pub mod price;
pub mod status;

pub use address::{Address, DEFAULT_COUNTRY};
pub use email::{Email, EmailError};
pub use id::*;
pub use otp::Otp;
pub use price::{Price, PriceError};
pub use status::*;
