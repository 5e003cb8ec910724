//! Fluent HTTP client helper.
//!
//! A [`ClientBuilder`] collects timeouts, headers, cookies, a proxy resolver
//! and an optional transport, then builds an immutable [`Client`]. Each call
//! takes a [`Payload`]: for GET and DELETE it is merged into the query string,
//! for other methods it is encoded as the request body. Calls return a
//! [`Response`] whose body is read once and cached.
//!
//! ```no_run
//! use courier_http::{Client, HttpError};
//! use serde_json::json;
//!
//! async fn example() -> Result<(), HttpError> {
//!     let client = Client::builder()
//!         .header("Content-Type", "application/json")
//!         .build()?;
//!
//!     let mut response = client
//!         .post("https://api.example.com/items", json!({"name": "widget"}))
//!         .await?;
//!     let created = response.json_map().await?;
//!     println!("{} {:?}", response.status_code(), created.get("id"));
//!     Ok(())
//! }
//! ```

pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod query;
pub mod request;
pub mod response;

pub use body::{encode_body, RequestBody};
pub use client::{build_client, Client, ClientBuilder};
pub use config::HttpConfig;
pub use cookie::Cookie;
pub use error::{HttpError, Result};
pub use payload::{Integer, Payload};
pub use query::merge_query;
pub use request::{headers, RequestContext};
pub use response::Response;
