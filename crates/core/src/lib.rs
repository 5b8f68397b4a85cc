//! Read-transform-write pipeline for exporting an SMS inbox.
//!
//! The core owns the domain model, the ports that adapters implement, and the
//! application services that drive a read followed by an export.

pub mod application;
pub mod domain;
pub mod error;
pub mod memory;
pub mod ports;
pub mod utils;
