#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Domain types and the synchronous state core for live AIS positions: the latest-known
//! state per vessel, the set of vessels ever seen, interval coalescing and the GeoJSON
//! projection handed to map clients.

mod coalescer;
mod domain;
mod error;
mod identity_tracker;
mod projection;
mod state_table;

pub use coalescer::*;
pub use domain::*;
pub use error::*;
pub use identity_tracker::*;
pub use projection::*;
pub use state_table::*;
