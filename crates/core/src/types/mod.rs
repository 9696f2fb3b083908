//! Core types for GreenBasket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
