mod mmsi;
mod navigation_status;
mod vessel;

pub use mmsi::*;
pub use navigation_status::*;
pub use vessel::*;
