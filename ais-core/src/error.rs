use snafu::{Location, Snafu};

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum CoordinateError {
    #[snafu(display("Latitude '{latitude}' is not a finite value within [-90, 90]"))]
    Latitude {
        #[snafu(implicit)]
        location: Location,
        latitude: f64,
    },
    #[snafu(display("Longitude '{longitude}' is not a finite value within [-180, 180]"))]
    Longitude {
        #[snafu(implicit)]
        location: Location,
        longitude: f64,
    },
}

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum MmsiError {
    #[snafu(display("Mmsi was empty"))]
    Empty {
        #[snafu(implicit)]
        location: Location,
    },
}
