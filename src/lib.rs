pub mod app;
pub mod catalog;
pub mod constants;
pub mod errors;
pub mod managers;
pub mod services;
pub mod utils;
