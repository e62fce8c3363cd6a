//! HTTP transport used for archive downloads.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError};
