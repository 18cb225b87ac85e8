use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub text: String,
    #[serde(with = "millis")]
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct AddItemInput {
    pub item: String,
}

#[derive(Serialize, Deserialize)]
pub struct GetItemsOutput {
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemInput {
    pub id: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct RemoveItemOutput {
    pub item: Item,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    items: Vec<Item>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone, Default)]
pub struct AppState {
    db: Db,
    auth_token: Option<Arc<str>>,
}

/// An error written as `{"type": ..., "message": ...}` with its status.
#[derive(Debug)]
pub struct ServerError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ServerError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", "Missing or invalid bearer token")
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    message: &'a str,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            kind: self.kind,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    router(AppState::default())
}

/// Like [`app`], but every RPC call must carry `Authorization: Bearer <token>`.
pub fn app_with_token(token: &str) -> Router {
    router(AppState {
        auth_token: Some(Arc::from(token)),
        ..AppState::default()
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/_health", get(health))
        .fallback(dispatch)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

async fn health() -> &'static str {
    "OK\n"
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = route(&state, &method, uri.path(), &headers, &body).await;
    match result {
        Ok(response) => {
            debug!(path = uri.path(), status = %response.status(), "rpc handled");
            response
        }
        Err(err) => {
            warn!(path = uri.path(), status = %err.status, kind = err.kind, "rpc failed: {}", err.message);
            err.into_response()
        }
    }
}

async fn route(
    state: &AppState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, ServerError> {
    if *method != Method::POST {
        return Err(ServerError::bad_request("Invalid method"));
    }
    authorize(state, headers)?;
    match path {
        "/add_item" => {
            let input = read_request(headers, body)?;
            add_item(state, input).await
        }
        "/get_items" => get_items(state).await,
        "/remove_item" => {
            let input = read_request(headers, body)?;
            remove_item(state, input).await
        }
        _ => Err(ServerError::bad_request("Invalid method")),
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ServerError> {
    let Some(expected) = &state.auth_token else {
        return Ok(());
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == expected.as_ref() => Ok(()),
        _ => Err(ServerError::unauthorized()),
    }
}

/// Parse an `application/json` request body.
fn read_request<T: DeserializeOwned>(headers: &HeaderMap, body: &[u8]) -> Result<T, ServerError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim);
    if content_type != Some("application/json") {
        return Err(ServerError::bad_request(
            "Unsupported request Content-Type, must be application/json",
        ));
    }
    serde_json::from_slice(body).map_err(|_| {
        ServerError::bad_request("Failed to parse malformed request body, must be a valid JSON object")
    })
}

async fn add_item(state: &AppState, input: AddItemInput) -> Result<Response, ServerError> {
    if input.item.trim().is_empty() {
        return Err(ServerError::invalid("item is required"));
    }
    let mut store = state.db.write().await;
    store.next_id += 1;
    let item = Item {
        id: store.next_id,
        text: input.item,
        created_at: Utc::now().trunc_subsecs(3),
    };
    store.items.push(item);
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn get_items(state: &AppState) -> Result<Response, ServerError> {
    let store = state.db.read().await;
    let output = GetItemsOutput {
        items: store.items.clone(),
    };
    Ok(Json(output).into_response())
}

async fn remove_item(state: &AppState, input: RemoveItemInput) -> Result<Response, ServerError> {
    let id = input.id.ok_or_else(|| ServerError::invalid("id is required"))?;
    let mut store = state.db.write().await;
    let index = store
        .items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| ServerError::not_found(format!("item {id} does not exist")))?;
    let item = store.items.remove(index);
    Ok(Json(RemoveItemOutput { item }).into_response())
}

/// Timestamps on the wire carry millisecond precision and a `Z` suffix.
mod millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item() -> Item {
        Item {
            id: 1,
            text: "milk".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn item_serializes_snake_case_with_millis() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["text"], "milk");
        assert_eq!(json["created_at"], "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn item_roundtrips_through_json() {
        let json = serde_json::to_string(&item()).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item());
    }

    #[test]
    fn error_body_has_type_and_message() {
        let body = serde_json::to_value(ErrorBody {
            kind: "invalid",
            message: "item is required",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"type": "invalid", "message": "item is required"}));
    }

    #[test]
    fn read_request_requires_json_content_type() {
        let headers = HeaderMap::new();
        let err = read_request::<RemoveItemInput>(&headers, b"{}").unwrap_err();
        assert_eq!(err.kind, "bad_request");
    }

    #[test]
    fn read_request_accepts_charset_suffix() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json; charset=utf-8".parse().unwrap());
        let input: RemoveItemInput = read_request(&headers, br#"{"id":3}"#).unwrap();
        assert_eq!(input.id, Some(3));
    }

    #[test]
    fn add_item_input_rejects_missing_item() {
        let result: Result<AddItemInput, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
    }
}
