//! Toastem core: the form validation engine and the domain rules built on it.
//!
//! Everything here is pure logic with no I/O, so the HTTP layer and tests can
//! share it without any runtime setup.

pub mod error;
pub mod farm;
pub mod types;
pub mod validation;
