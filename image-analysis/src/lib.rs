mod error;
mod limits;
pub mod models;

pub use error::*;
pub use limits::*;
pub use models::ImageRecord;
