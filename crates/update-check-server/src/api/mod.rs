//! HTTP handlers.

pub mod check;
pub mod health;
