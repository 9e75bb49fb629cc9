pub mod db;
pub mod error;
pub mod server;
pub mod settings;
pub mod telemetry;
pub mod trivia;

pub use error::{Error, Result};
