//! Generated client for the to-do list schema.
//!
//! Every method is a thin wrapper over [`RpcClient::invoke`] /
//! [`RpcClient::invoke_void`] naming the wire method and the input/output
//! types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::RpcClient;
use crate::config::Endpoint;
use crate::error::Result;
use crate::timestamp;
use crate::transport::{Transport, UreqTransport};

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Read-only, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for `add_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    pub item: String,
}

/// Output of `get_items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemsOutput {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Input for `remove_item`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// Output of `remove_item`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemOutput {
    #[serde(default)]
    pub item: Option<Item>,
}

/// To-do list API client.
#[derive(Debug, Clone)]
pub struct TodoClient<T = UreqTransport> {
    rpc: RpcClient<T>,
}

impl TodoClient<UreqTransport> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            rpc: RpcClient::new(endpoint),
        }
    }
}

impl<T: Transport> TodoClient<T> {
    pub fn with_transport(endpoint: Endpoint, transport: T) -> Self {
        Self {
            rpc: RpcClient::with_transport(endpoint, transport),
        }
    }

    pub fn rpc(&self) -> &RpcClient<T> {
        &self.rpc
    }

    /// Adds an item to the list.
    pub fn add_item(&self, input: &AddItemInput) -> Result<()> {
        self.rpc.invoke_void("add_item", Some(input))
    }

    /// Returns all items in the list.
    pub fn get_items(&self) -> Result<GetItemsOutput> {
        self.rpc.invoke::<(), _>("get_items", None)
    }

    /// Removes an item from the list.
    pub fn remove_item(&self, input: &RemoveItemInput) -> Result<RemoveItemOutput> {
        self.rpc.invoke("remove_item", Some(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};
    use crate::http::{HttpRequest, HttpResponse};
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct Replay {
        response: HttpResponse,
        seen: Mutex<Option<HttpRequest>>,
    }

    impl Replay {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse::new(status, body),
                seen: Mutex::new(None),
            }
        }
    }

    impl Transport for Replay {
        fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(self.response.clone())
        }
    }

    fn client(replay: &Replay) -> TodoClient<&Replay> {
        TodoClient::with_transport(Endpoint::new("https://api.example.com").with_auth_token("abc"), replay)
    }

    #[test]
    fn add_item_posts_input() {
        let replay = Replay::new(200, "{}");
        client(&replay)
            .add_item(&AddItemInput { item: "milk".to_string() })
            .unwrap();
        let req = replay.seen.lock().unwrap().clone().unwrap();
        assert_eq!(req.url, "https://api.example.com/add_item");
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.body.as_deref(), Some(r#"{"item":"milk"}"#));
    }

    #[test]
    fn get_items_decodes_created_at() {
        let replay = Replay::new(
            200,
            r#"{"items":[{"id":1,"text":"milk","created_at":"2024-01-02T03:04:05.000Z"}]}"#,
        );
        let out = client(&replay).get_items().unwrap();
        assert_eq!(
            out.items,
            vec![Item {
                id: Some(1),
                text: "milk".to_string(),
                created_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            }]
        );
        assert_eq!(replay.seen.lock().unwrap().clone().unwrap().body, None);
    }

    #[test]
    fn get_items_keeps_timestamp_shaped_text() {
        let replay = Replay::new(200, r#"{"items":[{"id":1,"text":"2024-01-02T03:04:05"}]}"#);
        let out = client(&replay).get_items().unwrap();
        assert_eq!(out.items[0].text, "2024-01-02T03:04:05");
        assert_eq!(out.items[0].created_at, None);
    }

    #[test]
    fn get_items_keeps_sub_millisecond_created_at() {
        let replay = Replay::new(
            200,
            r#"{"items":[{"id":1,"text":"milk","created_at":"2024-01-02T03:04:05.123456Z"}]}"#,
        );
        let out = client(&replay).get_items().unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap() + chrono::Duration::microseconds(123_456);
        assert_eq!(out.items[0].created_at, Some(expected));
    }

    #[test]
    fn get_items_tolerates_missing_list() {
        let replay = Replay::new(200, "{}");
        assert!(client(&replay).get_items().unwrap().items.is_empty());
    }

    #[test]
    fn remove_item_returns_removed() {
        let replay = Replay::new(200, r#"{"item":{"id":4,"text":"eggs"}}"#);
        let out = client(&replay).remove_item(&RemoveItemInput { id: Some(4) }).unwrap();
        assert_eq!(out.item.unwrap().text, "eggs");
        let body = replay.seen.lock().unwrap().clone().unwrap().body;
        assert_eq!(body.as_deref(), Some(r#"{"id":4}"#));
    }

    #[test]
    fn remove_item_not_found() {
        let replay = Replay::new(404, r#"{"type":"not_found","message":"item 9 does not exist"}"#);
        let err = client(&replay).remove_item(&RemoveItemInput { id: Some(9) }).unwrap_err();
        assert!(matches!(err, Error::Rpc(_)));
        assert_eq!(err.rpc_kind(), Some("not_found"));
    }

    #[test]
    fn item_serializes_created_at_with_millis() {
        let item = Item {
            id: None,
            text: "t".to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["createdAt"], "2024-01-02T03:04:05.000Z");
        assert!(json.get("id").is_none());
    }
}
