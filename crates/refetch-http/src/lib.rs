//! refetch-http - Authenticated request pipeline over reqwest.

mod client;
mod request;
mod wire;

pub use client::AuthClient;
pub use request::{Body, Part, RequestOptions};

pub use reqwest::{Method, Response, StatusCode, header};
