//! GaiGi: anonymous sighting reports of suspicious things.
//!
//! The server side (`features`, `modules`) exposes upload, image analysis and
//! record endpoints; `client` holds the reporting workflow and read-side
//! views that drive those endpoints.

pub mod app;
pub mod client;
pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
