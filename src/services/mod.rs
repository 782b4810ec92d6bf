pub mod auth;
pub mod batch;
pub mod client;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod logger;
pub mod normalizer;
pub mod pagination;
pub mod retry;
#[cfg(test)]
pub(crate) mod testing;
pub mod token;
pub mod transport;
