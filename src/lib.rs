//! Client for a card payment gateway's authorise / confirm / reject exchange.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
