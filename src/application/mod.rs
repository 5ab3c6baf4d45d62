//! Application layer orchestrating the gateway exchange.
//!
//! This module defines the `Gateway` which acts as the primary entry point
//! for authorising, confirming and rejecting card transactions, and the
//! `checkout` flow that strings those calls together for a single sale.

pub mod checkout;
pub mod gateway;
