//! Domain types and the ports the application layer depends on.

pub mod order;
pub mod payment;
pub mod ports;
pub mod webhook;
