use thiserror::Error;

/// Failure talking to the GaiGi API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status; `message` is the `{ error }` body when present
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Geocoding provider returned {0}")]
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),

    #[error("Location request timed out")]
    Timeout,
}

/// Why a submission attempt did not produce a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    /// Something the user must fill in; no network call was made
    #[error("{0}")]
    Validation(String),

    #[error("Could not find a location for \"{0}\"")]
    AddressNotFound(String),

    /// Upload or record creation failed; the form can be submitted again
    #[error("{0}")]
    Collaborator(String),

    #[error("This report was already submitted")]
    AlreadySubmitted,
}
