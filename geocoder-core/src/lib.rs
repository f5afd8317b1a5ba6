//! Core library for the `geocoder` CLI.
//!
//! This crate defines:
//! - A blocking client for the geocoding web service
//! - Request / response models and provider status codes
//! - Configuration & credentials handling
//!
//! It is used by `geocoder-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;

pub use client::{API_URL, GeocodingClient};
pub use config::Config;
pub use error::GeocodeError;
pub use model::{GeocodeRequest, GeocodeResponse, GeocodeResult, LatLng, OutputFormat, Status};
pub use transport::{HttpTransport, Transport};
