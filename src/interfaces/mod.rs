//! Inbound surfaces: the webhook HTTP endpoint.

pub mod webhook;
