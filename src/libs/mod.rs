pub mod address;
pub mod config;
pub mod error;
pub mod resolver;
pub mod source;
pub mod transport;
