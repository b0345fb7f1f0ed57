//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with connection pooling and rustls TLS
//!
//! The streaming engine itself is not implemented here: hosts wrap their
//! native engine (e.g. an embedded streaming library) behind
//! `bridge_traits::StreamingEngine` and hand it to the controller.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//!
//! let http_client = ReqwestHttpClient::new();
//! // inject into PlayerConfig via .http_client(Arc::new(http_client))
//! ```

mod http;

pub use http::ReqwestHttpClient;
