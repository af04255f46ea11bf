//! Firmware provisioning for Zynq boards.
//!
//! A run resolves `BOOT.BIN`, `image.ub` and `SD_p2.tar.gz` (in that order),
//! writes the two images under `<dir>/firmware/` and expands the archive onto
//! `<dir>`. See [`pipeline`] for the stages.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod ui;

pub use config::{FlashConfig, Ownership};
pub use error::{Error, Result};
pub use pipeline::{FirmwarePaths, Payloads, Pipeline, Summary};
