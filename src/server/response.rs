//! HTTP response helpers.

use anyhow::{Result, anyhow};
use serde::Serialize;
use tiny_http::{Header, Request, Response, StatusCode};

pub const JSON: &str = "application/json";
pub const XML: &str = "application/xml; charset=utf-8";

/// A response computed by a route, not yet written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'a str>,
}

impl Reply {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: JSON,
                body,
            },
            Err(e) => Self::error(500, &format!("failed to encode response: {e}")),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::json(
            status,
            &ErrorBody {
                error: message,
                rule: None,
            },
        )
    }

    /// Validation failure naming the rule that was violated.
    pub fn rule_violation(message: &str, rule: &str) -> Self {
        Self::json(
            422,
            &ErrorBody {
                error: message,
                rule: Some(rule),
            },
        )
    }

    pub fn xml(body: String) -> Self {
        Self {
            status: 200,
            content_type: XML,
            body: body.into_bytes(),
        }
    }

    pub fn not_found() -> Self {
        Self::error(404, "not found")
    }

    pub fn method_not_allowed() -> Self {
        Self::error(405, "method not allowed")
    }

    pub fn unavailable() -> Self {
        Self::error(503, "shutting down")
    }

    #[cfg(test)]
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Write a reply to the client.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    let response = Response::from_data(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(make_header("Content-Type", reply.content_type)?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}
