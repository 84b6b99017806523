//! Blocking JSON REST client.
//!
//! # Overview
//! A `Client` binds a base URL, a transport and an authorization strategy.
//! Its verb methods (`get`, `post`, `put`, `patch`, `delete`, `custom`) turn a
//! path, an optional JSON body and optional query pairs into one outgoing
//! request, send it, and decode the JSON response into a caller-owned target.
//!
//! ```no_run
//! use jsonrest::{query, Client, RestClient};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let client = Client::with_bearer("https://api.example.com", "abc123");
//! let mut users: Vec<User> = Vec::new();
//! let response = client.get("/users", &mut users, &[query("name", "john")])?;
//! println!("{} -> {} users", response.status, users.len());
//! # Ok::<(), jsonrest::Error>(())
//! ```
//!
//! # Design
//! - `()` stands for "no body" and "don't decode", `&T` / `&mut T` for the
//!   real thing, see [`RequestBody`] and [`ResponseTarget`].
//! - Failures are split into marshal, transport and unmarshal errors; see
//!   [`Error`]. Nothing is retried and nothing is logged as an error.
//! - Requests carrying a body get `Content-Type: application/json`.

pub mod auth;
pub mod body;
pub mod client;
pub mod error;
pub mod http;
pub mod pair;
pub mod transport;

pub use auth::Authorization;
pub use body::{RequestBody, ResponseTarget};
pub use client::{Client, ClientBuilder, RestClient};
pub use error::{Error, TransportError};
pub use http::{HttpRequest, HttpResponse, Method};
pub use pair::{header, query, Pair};
pub use transport::{Transport, UreqTransport};
