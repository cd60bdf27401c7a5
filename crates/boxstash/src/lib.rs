//! `boxstash` - QR-code inventory for physical storage boxes
//!
//! A single-user web application tracking the contents of physical storage
//! boxes. Each box is a markdown file, each box's photos are files in a
//! per-box directory, and every box page carries a QR code that scans
//! straight back to it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod qr;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use store::{BoxStore, PhotoStore};
