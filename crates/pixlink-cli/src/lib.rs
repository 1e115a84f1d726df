//! pixlink command-line application
//!
//! One binary, two roles: `pixlink central` scans for the advertised panel
//! and drives the central side of the exchange; `pixlink peripheral`
//! advertises and serves the other side. Role supervision policy lives in
//! [`app`]: the central treats discovery timeout as terminal and
//! rediscovers after anything else, the peripheral re-advertises forever.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
