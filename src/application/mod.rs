//! Application layer.
//!
//! This module defines the `PaymentClient`, which maps each merchant-side
//! business operation onto one gateway round trip through the injected ports.

pub mod client;
