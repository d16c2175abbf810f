pub mod dashboard;
pub mod fields;
pub mod prices;
pub mod weather;

pub use dashboard::DashboardScreen;
pub use fields::FieldsScreen;
pub use prices::PricesScreen;
pub use weather::WeatherScreen;
