//! Mapping from transport outcomes to [`ApiError`].
//!
//! Classification is total: every outcome yields exactly one [`ErrorKind`],
//! with [`ErrorKind::Unknown`] as the fallback. It is also deterministic, so
//! the same outcome always yields the same kind.
//!
//! A response body is considered structured when it is a JSON object
//! carrying a machine-readable code, in either of these shapes:
//!
//! ```json
//! {"error": {"code": "RATE_LIMIT_EXCEEDED", "message": "...", "details": {}}}
//! {"error": "RATE_LIMIT_EXCEEDED", "message": "...", "details": {}}
//! ```
//!
//! Codes are looked up case-insensitively in a fixed table. A structured body
//! with a code missing from the table is [`ErrorKind::Unknown`]. A response
//! without a code falls back to a coarser table keyed on the status alone.

use std::time::Duration;

use http::HeaderMap;
use serde_json::{Map, Value};

use super::{ApiError, ErrorKind, FieldError};
use crate::http::{Response, TransportError};

/// Delay assumed when a rate-limited response has no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

const MAX_TEXT_MESSAGE_CHARS: usize = 200;

/// What came back from a single HTTP attempt that did not succeed.
#[derive(Debug, Clone, Copy)]
pub enum TransportOutcome<'a> {
    /// An HTTP response was received.
    Response(&'a Response),
    /// The request failed before any response arrived.
    Failure(&'a TransportError),
}

/// Classify a failed attempt into an [`ApiError`].
pub fn classify(outcome: &TransportOutcome<'_>) -> ApiError {
    match outcome {
        TransportOutcome::Failure(err) => ApiError::new(
            ErrorKind::Network {
                failure: err.failure(),
            },
            err.message(),
        ),
        TransportOutcome::Response(response) => classify_response(
            response.status().as_u16(),
            response.headers(),
            response.body(),
        ),
    }
}

/// Classify an HTTP response by status, headers, and raw body.
pub fn classify_response(status: u16, headers: &HeaderMap, body: &[u8]) -> ApiError {
    let parsed = ErrorBody::parse(body);

    let kind = match parsed.as_ref().and_then(|b| b.code.as_deref()) {
        Some(code) => match CodeClass::lookup(code) {
            Some(class) => class.into_kind(parsed.as_ref(), headers),
            None => ErrorKind::Unknown {
                raw_code: Some(code.to_string()),
            },
        },
        None => kind_for_status(status, headers),
    };

    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .or_else(|| text_message(body))
        .unwrap_or_else(|| kind.default_message().to_string());

    let hint = parsed
        .as_ref()
        .and_then(|b| b.hint.clone())
        .or_else(|| kind.default_hint().map(String::from));

    ApiError {
        hint,
        docs_url: parsed.and_then(|b| b.docs_url),
        status: Some(status),
        request_id: header_str(headers, "x-request-id").map(String::from),
        message,
        kind,
    }
}

fn kind_for_status(status: u16, headers: &HeaderMap) -> ErrorKind {
    match status {
        401 => ErrorKind::Authentication,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimited {
            retry_after: retry_after(headers),
        },
        500 | 502 | 503 | 504 => ErrorKind::ServerError,
        _ => ErrorKind::Unknown { raw_code: None },
    }
}

/// Families of codes the platform returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeClass {
    Authentication,
    Validation,
    Quota,
    RateLimited,
    NotFound,
    Server,
}

impl CodeClass {
    fn lookup(code: &str) -> Option<Self> {
        let normalized: String = code
            .trim()
            .chars()
            .map(|c| match c {
                '-' | '.' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        let class = match normalized.as_str() {
            "UNAUTHORIZED"
            | "UNAUTHENTICATED"
            | "AUTHENTICATION_ERROR"
            | "AUTHENTICATION_FAILED"
            | "INVALID_API_KEY"
            | "MISSING_API_KEY"
            | "API_KEY_REVOKED"
            | "API_KEY_EXPIRED"
            | "FORBIDDEN"
            | "INSUFFICIENT_SCOPE"
            | "SCOPE_DENIED"
            | "PERMISSION_DENIED" => CodeClass::Authentication,

            "VALIDATION_ERROR"
            | "VALIDATION_FAILED"
            | "INVALID_REQUEST"
            | "INVALID_INPUT"
            | "INVALID_PARAMETER"
            | "MISSING_PARAMETER"
            | "BAD_REQUEST" => CodeClass::Validation,

            "QUOTA_EXCEEDED"
            | "EMAIL_QUOTA_EXCEEDED"
            | "PLAN_LIMIT_EXCEEDED"
            | "USAGE_LIMIT_EXCEEDED" => CodeClass::Quota,

            "RATE_LIMIT_EXCEEDED" | "RATE_LIMITED" | "TOO_MANY_REQUESTS" => {
                CodeClass::RateLimited
            }

            "NOT_FOUND"
            | "RESOURCE_NOT_FOUND"
            | "TEMPLATE_NOT_FOUND"
            | "DOMAIN_NOT_FOUND"
            | "MESSAGE_NOT_FOUND"
            | "EVENT_NOT_FOUND"
            | "WEBHOOK_NOT_FOUND"
            | "CONTACT_NOT_FOUND"
            | "CAMPAIGN_NOT_FOUND" => CodeClass::NotFound,

            "INTERNAL_ERROR"
            | "INTERNAL_SERVER_ERROR"
            | "SERVER_ERROR"
            | "SERVICE_UNAVAILABLE"
            | "BAD_GATEWAY"
            | "GATEWAY_TIMEOUT"
            | "UPSTREAM_ERROR"
            | "DATABASE_ERROR" => CodeClass::Server,

            _ => return None,
        };

        Some(class)
    }

    fn into_kind(self, body: Option<&ErrorBody>, headers: &HeaderMap) -> ErrorKind {
        match self {
            CodeClass::Authentication => ErrorKind::Authentication,
            CodeClass::Validation => ErrorKind::Validation {
                fields: body.map(ErrorBody::field_errors).unwrap_or_default(),
            },
            CodeClass::Quota => {
                let details = body.and_then(|b| b.details.as_ref());
                let used = details.and_then(|d| u64_field(d, &["used", "quotaUsed", "quota_used"]));
                let limit =
                    details.and_then(|d| u64_field(d, &["limit", "quotaLimit", "quota_limit"]));
                let remaining = details
                    .and_then(|d| u64_field(d, &["remaining", "quotaRemaining", "quota_remaining"]))
                    .or_else(|| Some(limit?.saturating_sub(used?)));
                ErrorKind::QuotaExceeded {
                    used,
                    limit,
                    remaining,
                }
            }
            CodeClass::RateLimited => ErrorKind::RateLimited {
                retry_after: retry_after(headers),
            },
            CodeClass::NotFound => ErrorKind::NotFound,
            CodeClass::Server => ErrorKind::ServerError,
        }
    }
}

/// Fields pulled out of an error body, whichever shape it used.
#[derive(Debug, Default)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    hint: Option<String>,
    docs_url: Option<String>,
    details: Option<Map<String, Value>>,
    errors: Option<Value>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Option<Self> {
        let Ok(Value::Object(root)) = serde_json::from_slice::<Value>(body) else {
            return None;
        };

        let mut parsed = ErrorBody::default();
        let mut flat_text = None;

        match root.get("error") {
            Some(Value::Object(inner)) => {
                parsed.code = str_field(inner, &["code", "type"]).filter(|c| is_code_token(c));
                parsed.message = str_field(inner, &["message"]);
                parsed.hint = str_field(inner, &["hint"]);
                parsed.docs_url = str_field(inner, &["docs", "docsUrl", "docs_url"]);
                parsed.details = object_field(inner, "details");
                parsed.errors = inner.get("errors").cloned();
            }
            Some(Value::String(flat)) if is_code_token(flat) => {
                parsed.code = Some(flat.clone());
            }
            Some(Value::String(flat)) => flat_text = Some(flat.clone()),
            _ => {}
        }

        parsed.code = parsed
            .code
            .or_else(|| str_field(&root, &["code"]).filter(|c| is_code_token(c)));
        parsed.message = parsed
            .message
            .or_else(|| str_field(&root, &["message"]))
            .or(flat_text);
        parsed.hint = parsed.hint.or_else(|| str_field(&root, &["hint"]));
        parsed.docs_url = parsed
            .docs_url
            .or_else(|| str_field(&root, &["docs", "docsUrl", "docs_url"]));
        parsed.details = parsed.details.or_else(|| object_field(&root, "details"));
        parsed.errors = parsed.errors.or_else(|| root.get("errors").cloned());

        Some(parsed)
    }

    fn field_errors(&self) -> Vec<FieldError> {
        let from_details = self
            .details
            .as_ref()
            .and_then(|d| d.get("fields").or_else(|| d.get("errors")));

        from_details
            .or(self.errors.as_ref())
            .map(parse_field_errors)
            .unwrap_or_default()
    }
}

/// Accepts `[{"field", "message", "code"}]`, `["message"]`, or
/// `{"field": "message" | ["message", ...]}`.
fn parse_field_errors(value: &Value) -> Vec<FieldError> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => Some(FieldError {
                    field: field_path(obj).unwrap_or_default(),
                    message: str_field(obj, &["message", "msg", "error"]).unwrap_or_default(),
                    code: str_field(obj, &["code"]),
                }),
                Value::String(message) => Some(FieldError {
                    field: String::new(),
                    message: message.clone(),
                    code: None,
                }),
                _ => None,
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .flat_map(|(field, messages)| {
                let messages: Vec<String> = match messages {
                    Value::String(m) => vec![m.clone()],
                    Value::Array(ms) => ms
                        .iter()
                        .filter_map(|m| m.as_str().map(String::from))
                        .collect(),
                    _ => Vec::new(),
                };
                messages.into_iter().map(move |message| FieldError {
                    field: field.clone(),
                    message,
                    code: None,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn field_path(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("path") {
        Some(Value::Array(segments)) => Some(
            segments
                .iter()
                .map(|s| match s {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("."),
        ),
        _ => str_field(obj, &["field", "path", "param", "name"]),
    }
}

/// Codes are single tokens such as `NOT_FOUND` or `rate-limit-exceeded`.
/// Anything with whitespace is prose and is treated as a message.
fn is_code_token(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn str_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(String::from)
}

fn object_field(obj: &Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match obj.get(key) {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    }
}

fn u64_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn retry_after(headers: &HeaderMap) -> Duration {
    header_str(headers, "retry-after")
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

fn text_message(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() || text.starts_with('{') {
        return None;
    }
    Some(text.chars().take(MAX_TEXT_MESSAGE_CHARS).collect())
}
