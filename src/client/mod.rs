//! Client for the smart-home backend API

pub mod http_client;

pub use http_client::BackendHttpClient;
