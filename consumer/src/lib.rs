#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Consumes the live AIS position feed and publishes coalesced vessel snapshots at a fixed
//! cadence.

pub mod consumer;
pub mod error;
pub mod feed;
pub mod models;
pub mod settings;
pub mod startup;
pub mod telemetry;
