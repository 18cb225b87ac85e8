//! Runtime for calling a JSON-over-HTTP RPC service.
//!
//! # Overview
//! Every remote method is a POST to `{base_url}/{method}` carrying a JSON
//! object with snake_case keys. This crate turns a local value (camelCase
//! keys, real timestamps) into that wire body, sends it through an injected
//! [`Transport`], and turns the reply back into a local value or a classified
//! [`RpcError`].
//!
//! # Design
//! - [`case`] and [`codec`] are pure and total; [`timestamp`] isolates the
//!   wire timestamp pattern.
//! - [`RpcClient`] is immutable after construction and safe to share.
//! - The request/response halves stay available as plain data
//!   (`build_request` / `parse_response`) for hosts that do their own I/O.
//! - [`todo`] is the generated client for the bundled to-do schema.

pub mod case;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod timestamp;
pub mod todo;
pub mod transport;
pub mod value;

pub use client::RpcClient;
pub use config::Endpoint;
pub use error::{Error, Result, RpcError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use todo::TodoClient;
pub use transport::{Transport, UreqTransport};
pub use value::{LocalMap, LocalValue, WireValue};
