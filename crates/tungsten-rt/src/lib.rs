//! Host capabilities available to Tungsten programs.
//!
//! The language core exports three native functions: `shell`, `print` and
//! `input`. They are modelled here as the [`Host`] trait so an embedder can
//! inject its own implementation; [`SystemHost`] talks to the real process
//! environment and [`BufferedHost`] keeps everything in memory.

pub mod error;
pub mod host;

pub use error::HostError;
pub use host::{BufferedHost, Host, SystemHost};
