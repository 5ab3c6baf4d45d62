//! Gateway protocol types: what is sent, what comes back and how it is read.

pub mod codes;
pub mod masking;
pub mod payment;
pub mod ports;
pub mod request;
pub mod response;
