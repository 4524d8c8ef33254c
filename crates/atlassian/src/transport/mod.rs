//! Transport layer for the Atlassian adapters.

pub mod http;

pub use http::HttpTransport;
