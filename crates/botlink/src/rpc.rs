//! Request/response shapes and method dispatch.
//!
//! One frame in, one frame out: every request is a JSON object
//! `{id, method, params}` answered by `{id, result}`. The `result` is
//! always an object with an `ok` flag; coordinator errors, unknown methods,
//! and malformed parameters all come back as `{ok: false, error}` — the
//! connection never drops because one call went wrong.

use std::fmt::Display;
use std::time::Duration;

use botlink_client::{ClientConfig, ClientFactory};
use botlink_runtime::BotCoordinator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::config::BotCredentials;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// An incoming remote procedure call.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// Caller-chosen correlation value, echoed back verbatim.
    #[serde(default)]
    pub id: Value,
    /// Method name; see [`dispatch`] for the full set.
    pub method: String,
    /// Method parameters; absent means "all defaults".
    #[serde(default)]
    pub params: Value,
}

/// The answer to one [`RpcRequest`].
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub id: Value,
    pub result: Value,
}

// ---------------------------------------------------------------------------
// Parameter shapes
// ---------------------------------------------------------------------------

fn default_timeout_secs() -> f64 {
    10.0
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Default, Deserialize)]
struct StartParams {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    appearance: String,
    #[serde(default)]
    server_url: String,
    #[serde(default)]
    origin: String,
}

#[derive(Debug, Deserialize)]
struct ChatParams {
    message: String,
}

#[derive(Debug, Deserialize)]
struct LimitParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    filters: Value,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: f64,
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    settings: Value,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: f64,
}

#[derive(Debug, Deserialize)]
struct JoinParams {
    name: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: f64,
}

#[derive(Debug, Deserialize)]
struct LeaveParams {
    #[serde(default = "default_timeout_secs")]
    timeout_secs: f64,
}

impl Default for LeaveParams {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    query: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: f64,
}

#[derive(Debug, Deserialize)]
struct MemberParams {
    member_number: u64,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Routes one request to the coordinator and composes the response.
///
/// Never fails: every fault is folded into the `result` payload so the
/// caller always gets an answer correlated to their `id`.
pub async fn dispatch<F: ClientFactory>(
    coordinator: &BotCoordinator<F>,
    request: RpcRequest,
) -> RpcResponse {
    let result = run_method(coordinator, &request.method, request.params).await;
    RpcResponse {
        id: request.id,
        result,
    }
}

async fn run_method<F: ClientFactory>(
    coordinator: &BotCoordinator<F>,
    method: &str,
    params: Value,
) -> Value {
    match method {
        "start_bot" => {
            let params: StartParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            let outcome = coordinator.start(resolve_credentials(params)).await;
            to_result(&outcome)
        }

        "stop_bot" => to_result(&coordinator.stop().await),

        "get_bot_status" => to_result(&coordinator.status()),

        "send_chat_message" => {
            let params: ChatParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator.send_chat(&params.message).await {
                Ok(()) => json!({ "ok": true, "message": "sent" }),
                Err(e) => error_result(e),
            }
        }

        "get_recent_events" => {
            let params: LimitParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator.recent_events(params.limit) {
                Ok(events) => json!({ "ok": true, "events": events }),
                Err(e) => error_result(e),
            }
        }

        "get_chat_history" => {
            let params: LimitParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator.chat_history(params.limit) {
                Ok(messages) => json!({ "ok": true, "messages": messages }),
                Err(e) => error_result(e),
            }
        }

        "search_rooms" => {
            let params: SearchParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator
                .search_rooms(params.filters, timeout(params.timeout_secs))
                .await
            {
                Ok(outcome) => to_result(&outcome),
                Err(e) => error_result(e),
            }
        }

        "create_room" => {
            let params: CreateParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator
                .create_room(params.settings, timeout(params.timeout_secs))
                .await
            {
                Ok(outcome) => to_result(&outcome),
                Err(e) => error_result(e),
            }
        }

        "join_room" => {
            let params: JoinParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator
                .join_room(&params.name, timeout(params.timeout_secs))
                .await
            {
                Ok(outcome) => to_result(&outcome),
                Err(e) => error_result(e),
            }
        }

        "leave_room" => {
            let params: LeaveParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator.leave_room(timeout(params.timeout_secs)).await {
                Ok(outcome) => to_result(&outcome),
                Err(e) => error_result(e),
            }
        }

        "account_query" => {
            let params: QueryParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator
                .account_query(&params.query, timeout(params.timeout_secs))
                .await
            {
                Ok(outcome) => to_result(&outcome),
                Err(e) => error_result(e),
            }
        }

        "get_character_data" => {
            let params: MemberParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator.character_data(params.member_number) {
                Ok(record) => json!({ "ok": true, "character": record }),
                Err(e) => error_result(e),
            }
        }

        "get_room_member_detail" => {
            let params: MemberParams = match parse(params) {
                Ok(p) => p,
                Err(e) => return e,
            };
            match coordinator.room_member_detail(params.member_number) {
                Ok(record) => json!({ "ok": true, "member": record }),
                Err(e) => error_result(e),
            }
        }

        "get_current_room" => match coordinator.current_room() {
            Ok(room) => json!({ "ok": true, "room": room }),
            Err(e) => error_result(e),
        },

        other => json!({ "ok": false, "error": format!("unknown method: {other}") }),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Deserializes the params payload, treating an absent payload as an empty
/// object so all-default parameter structs apply.
fn parse<T: for<'de> Deserialize<'de>>(params: Value) -> Result<T, Value> {
    let params = match params {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(params)
        .map_err(|e| json!({ "ok": false, "error": format!("invalid params: {e}") }))
}

/// Blank request fields fall back to environment-configured credentials.
fn resolve_credentials(params: StartParams) -> ClientConfig {
    let fallback = BotCredentials::from_env();
    ClientConfig {
        username: non_blank(params.username, fallback.username),
        password: non_blank(params.password, fallback.password),
        appearance: non_blank(params.appearance, fallback.appearance),
        server_url: non_blank(params.server_url, fallback.server_url),
        origin: non_blank(params.origin, fallback.origin),
    }
}

fn non_blank(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn timeout(secs: f64) -> Duration {
    Duration::from_secs_f64(secs.max(0.0))
}

fn to_result<T: Serialize>(value: &T) -> Value {
    // Outcome types are plain field structs; serializing them cannot fail.
    serde_json::to_value(value).unwrap_or_else(|e| {
        json!({ "ok": false, "error": format!("encode error: {e}") })
    })
}

fn error_result(error: impl Display) -> Value {
    json!({ "ok": false, "error": error.to_string() })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_with_defaults() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"method": "get_bot_status"}"#).unwrap();
        assert_eq!(request.method, "get_bot_status");
        assert_eq!(request.id, Value::Null);
        assert_eq!(request.params, Value::Null);
    }

    #[test]
    fn test_parse_treats_null_params_as_empty_object() {
        let params: LimitParams = parse(Value::Null).unwrap();
        assert_eq!(params.limit, 20);
    }

    #[test]
    fn test_parse_rejects_wrong_shape_with_structured_error() {
        let err = parse::<ChatParams>(json!({ "message": 42 })).unwrap_err();
        assert_eq!(err["ok"], json!(false));
        assert!(err["error"].as_str().unwrap().starts_with("invalid params"));
    }

    #[test]
    fn test_timeout_clamps_negative_to_zero() {
        assert_eq!(timeout(-1.0), Duration::ZERO);
        assert_eq!(timeout(2.5), Duration::from_millis(2500));
    }

    #[test]
    fn test_non_blank_prefers_the_request_value() {
        assert_eq!(non_blank("echo".into(), "env".into()), "echo");
        assert_eq!(non_blank("".into(), "env".into()), "env");
        assert_eq!(non_blank("   ".into(), "env".into()), "env");
    }
}
