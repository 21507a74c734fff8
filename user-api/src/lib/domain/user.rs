pub mod errors;
pub mod models;
pub mod passwords;
pub mod ports;
pub mod service;
