pub mod field;
pub mod forecast;
pub mod price;
pub mod reminder;
pub mod spray;

pub use field::*;
pub use forecast::*;
pub use price::*;
pub use reminder::*;
pub use spray::*;
