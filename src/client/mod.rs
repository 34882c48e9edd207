//! HTTP transport for the DevPayr API.

pub mod http;
