use std::path::PathBuf;

use thiserror::Error;

use crate::spot::SpotId;

/// Convenient result alias for the WiFi spot library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for dataset cache")]
    ProjectDirsUnavailable,

    /// Raised when the caller's position could not be determined or is not a
    /// valid coordinate.
    #[error("unable to retrieve your location: {message}")]
    LocationUnavailable { message: String },

    /// Raised when a requested spot identifier is not part of the loaded catalog.
    #[error("unknown spot id: {id}")]
    UnknownSpot { id: SpotId },

    /// Raised when a sixth spot is added to a full route selection.
    #[error("maximum {max} spots allowed in a route")]
    RouteSelectionFull { max: usize },

    /// Raised when a route is requested with fewer than two waypoints.
    #[error("a route needs at least 2 spots, got {count}")]
    NotEnoughWaypoints { count: usize },

    /// Raised when the external routing service rejects a request.
    #[error("routing service failed: {message}")]
    RoutingFailed { message: String },

    /// Raised when the geocoding service returns a malformed candidate.
    #[error("invalid geocoding candidate: {message}")]
    InvalidGeocodeCandidate { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
