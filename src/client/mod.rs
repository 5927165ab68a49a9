//! Reporter-side library: photo intake, location and address resolution,
//! the submission state machine and the read views

pub mod address;
pub mod api;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod photo;
pub mod views;
pub mod workflow;

pub use address::{AddressResolver, GeocodingProvider, GoogleGeocoder};
pub use api::{ApiClient, ReportBackend};
pub use config::ClientConfig;
pub use error::{ClientError, GeocodeError, LocationError, SubmissionError};
pub use geolocation::{
    Coordinates, DeviceLocator, FixedDeviceLocation, GeolocationResolver, NoDeviceLocation,
};
pub use photo::Photo;
pub use views::{DetailView, ListView, MapView};
pub use workflow::{Resolution, ResolutionOutcome, SubmissionWorkflow, WorkflowState};
