pub mod error;
pub mod events;
pub mod health;
pub mod token;

pub use error::AppError;
