//! Register definitions for the nRF905
//! Layout follows the nRF905 product specification v1.5

mod config;
mod status;

pub use config::*;
pub use status::*;
