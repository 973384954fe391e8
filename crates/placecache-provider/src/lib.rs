pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::MapsClient;
pub use error::ProviderError;
pub use provider::MapsProvider;
pub use types::{GeocodedAddress, NearbyPlace, NearbySearch};
