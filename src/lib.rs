mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;

pub use domain::{entities, schema};
pub use interfaces::repositories;
pub use infrastructure::db;
