pub mod geocoding;
pub mod openmeteo;
pub mod prices;

pub use geocoding::GeocodingClient;
pub use openmeteo::OpenMeteoClient;
pub use prices::PriceClient;
