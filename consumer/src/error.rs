use ais_core::{CoordinateError, Mmsi};
use reqwest::{StatusCode, Url};
use snafu::{Location, Snafu};
use tokio_util::codec::LinesCodecError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Ais feed url '{url}' is invalid, error '{error_stringified}'"))]
    InvalidFeedUrl {
        #[snafu(implicit)]
        location: Location,
        url: String,
        error_stringified: String,
    },
    #[snafu(display("Emit interval must be greater than zero"))]
    InvalidEmitInterval {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Ais feed transport failed"))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        source: TransportError,
    },
    #[snafu(display("Snapshot subscriber has gone away"))]
    InternalChannelClosed {
        #[snafu(implicit)]
        location: Location,
    },
}

/// Connection level failures, the connection they occur on is always closed afterwards.
#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum TransportError {
    #[snafu(display("Failed to send request to '{url}'"))]
    Request {
        #[snafu(implicit)]
        location: Location,
        url: Url,
        #[snafu(source)]
        error: reqwest::Error,
    },
    #[snafu(display(
        "Non-ok response received from '{url}', status_code: '{status}', body: '{body}'"
    ))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: Url,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("Failed to read an event stream line"))]
    Framing {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: LinesCodecError,
    },
    #[snafu(display("Ais stream closed unexpectedly"))]
    StreamClosed {
        #[snafu(implicit)]
        location: Location,
    },
}

/// A single malformed message, it is dropped without touching any vessel state.
#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum DecodeError {
    #[snafu(display("Payload is not a position message"))]
    InvalidPayload {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Position message did not contain a mmsi"))]
    MissingIdentity {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Position message for '{mmsi}' has invalid coordinates"))]
    InvalidCoordinates {
        #[snafu(implicit)]
        location: Location,
        mmsi: Mmsi,
        source: CoordinateError,
    },
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}
