//! The per-method call pipeline shared by every generated operation.
//!
//! # Design
//! `RpcClient` holds an immutable [`Endpoint`] and an injected [`Transport`];
//! nothing about it changes after construction, so one client can serve any
//! number of concurrent callers.
//!
//! Each call runs encode → send → (decode | classify). The two halves are also
//! exposed on their own as [`RpcClient::build_request`] and
//! [`RpcClient::parse_response`], so a host with its own HTTP stack can do the
//! round trip itself.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::codec;
use crate::config::Endpoint;
use crate::error::{Error, Result, RpcError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::value::LocalValue;

/// Path of the server's health probe.
pub const HEALTH_PATH: &str = "_health";

/// Client for a JSON-over-HTTP RPC service.
#[derive(Debug, Clone)]
pub struct RpcClient<T = UreqTransport> {
    endpoint: Endpoint,
    transport: T,
}

impl RpcClient<UreqTransport> {
    /// Client using the default `ureq` transport.
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_transport(endpoint, UreqTransport::new())
    }
}

impl<T: Transport> RpcClient<T> {
    pub fn with_transport(endpoint: Endpoint, transport: T) -> Self {
        Self { endpoint, transport }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Build the POST request for `method`. Absent params produce no body at
    /// all.
    pub fn build_request(&self, method: &str, params: Option<&LocalValue>) -> Result<HttpRequest> {
        let body = params.map(codec::encode_to_string).transpose()?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint.method_url(method),
            headers: self.endpoint.headers(),
            body,
        })
    }

    /// Turn a response into the decoded result or a classified error.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Option<LocalValue>> {
        check_status(&response)?;
        codec::decode(&response.body)
    }

    /// Like [`parse_response`](Self::parse_response) for operations without
    /// a result: the body of a successful response is never parsed.
    pub fn parse_void_response(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)
    }

    /// Call `method` and return its decoded result, if the server sent one.
    pub fn call(&self, method: &str, params: Option<&LocalValue>) -> Result<Option<LocalValue>> {
        let response = self.dispatch(method, params)?;
        self.parse_response(response)
    }

    /// Call a `method` that returns nothing.
    pub fn call_void(&self, method: &str, params: Option<&LocalValue>) -> Result<()> {
        let response = self.dispatch(method, params)?;
        self.parse_void_response(response)
    }

    /// Typed call: `params` is serialized with serde and goes through the
    /// codec. The result only has its keys renamed before it is deserialized
    /// into `R`; its fields decide for themselves what is a timestamp.
    pub fn invoke<P, R>(&self, method: &str, params: Option<&P>) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = params.map(to_local).transpose()?;
        let response = self.dispatch(method, params.as_ref())?;
        check_status(&response)?;
        let result = codec::decode_keys(&response.body)?
            .ok_or_else(|| Error::Decode(format!("{method}: empty response body")))?;
        serde_json::from_value(result).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Typed call for a `method` that returns nothing.
    pub fn invoke_void<P>(&self, method: &str, params: Option<&P>) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        let params = params.map(to_local).transpose()?;
        self.call_void(method, params.as_ref())
    }

    /// Probe `GET {base_url}/_health`.
    pub fn health(&self) -> Result<()> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint.method_url(HEALTH_PATH),
            headers: self.endpoint.headers(),
            body: None,
        };
        let response = self.transport.send(&request)?;
        check_status(&response)
    }

    fn dispatch(&self, method: &str, params: Option<&LocalValue>) -> Result<HttpResponse> {
        let request = self.build_request(method, params)?;
        debug!(method, url = %request.url, has_body = request.body.is_some(), "dispatching rpc call");
        let response = self.transport.send(&request)?;
        debug!(method, status = response.status, "rpc call completed");
        Ok(response)
    }
}

fn to_local<P: Serialize + ?Sized>(params: &P) -> Result<LocalValue> {
    serde_json::to_value(params)
        .map(LocalValue::from)
        .map_err(|e| Error::Encode(e.to_string()))
}

/// Statuses of 300 and above become a classified `RpcError`.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let err = RpcError::classify(response.status, &response.status_text, &response.body);
    warn!(status = err.status(), kind = err.kind(), "rpc call failed: {err}");
    Err(err.into())
}
