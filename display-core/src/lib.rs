//! Display Core - transport-independent logic for the LED display console
//!
//! This crate contains the console client's business logic that can be
//! tested on the host without a device on the network: payload encoding,
//! progress math, the REST wire model and the upload lifecycle.

pub mod api;
pub mod hex;
pub mod notify;
pub mod progress;
pub mod reboot;
pub mod upload;
