//! # elasticemail - Elastic Email API client for Rust
//!
//! A blocking client for the Elastic Email form/JSON HTTP API. Every endpoint
//! goes through one pipeline: parameters are flattened to string pairs, the
//! API key is added, the request is sent as a query string (GET) or a
//! form body (POST), and the `{success, error, data}` envelope is parsed.
//!
//! ## Features
//!
//! - Declarative parameter tables with "always send" and "omit when empty" fields
//! - API key precedence: explicit parameter, then per-call override, then client default
//! - Per-call header overrides that never touch the shared client
//! - Cancellation with optional deadline
//! - Pluggable [`Transport`] for testing without a network
//!
//! ## Basic Usage
//!
//! ```no_run
//! use elasticemail::{Client, Config, Email};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(Config::new("your-api-key"))?;
//!
//!     let email = Email {
//!         from: "me@example.com".to_string(),
//!         to: "you@example.com".to_string(),
//!         subject: "Hello".to_string(),
//!         body_text: "Hi there".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let response = client.send(&email);
//!     match response.error() {
//!         None => println!("sent: {:?}", response.data()),
//!         Some(err) => eprintln!("send failed: {}", err),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Per-call options
//!
//! ```no_run
//! use elasticemail::{CallOptions, CancelToken, Client, Config};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), elasticemail::Error> {
//! let client = Client::new(Config::new("default-key"))?;
//!
//! let opts = CallOptions::new()
//!     .with_api_key("subaccount-key")
//!     .with_cancel(CancelToken::with_timeout(Duration::from_secs(5)));
//!
//! let status = client.status_with("message-id", &opts).into_result()?;
//! println!("{}", status);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod client;
pub mod email;
pub mod error;
pub mod options;
pub mod params;
pub mod response;
pub mod rest;
pub mod transport;

// Re-export main types for convenience
pub use account::{SendingPermission, SubAccountRef, Subaccount};
pub use client::Config;
pub use email::{EncodingType, Email};
pub use error::{Error, Result};
pub use options::{CallOptions, CancelToken};
pub use params::{ParamMap, ToParams};
pub use response::Response;
pub use rest::Client;
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport};

// Re-export reqwest's HTTP types used in the public API
pub use reqwest::header;
pub use reqwest::{Method, StatusCode};
