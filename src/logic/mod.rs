pub mod data_sync;
pub mod spray_window;

pub use data_sync::DataSyncService;
pub use spray_window::compute_spray_state;
