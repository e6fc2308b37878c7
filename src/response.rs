use crate::error::{Error, Result};
use crate::transport::RawResponse;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Outcome of one API call.
///
/// Either the call succeeded and [`data`](Response::data) holds the payload,
/// or it failed and [`error`](Response::error) says why. Failures from any
/// stage of the pipeline (building, sending, reading, decoding) and errors
/// reported by the API end up here the same way.
#[derive(Debug)]
pub struct Response {
    outcome: Result<Value>,
    status: Option<StatusCode>,
    body: Option<Vec<u8>>,
}

/// Wire shape of the envelope. The API sends `error` as a string; any
/// other shape is stringified.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl Envelope {
    fn into_outcome(self) -> Result<Value> {
        match error_message(self.error) {
            Some(message) => Err(Error::Api { message }),
            None if self.success => Ok(self.data.unwrap_or(Value::Null)),
            None => Err(Error::Api {
                message: "unknown error".to_string(),
            }),
        }
    }
}

fn error_message(error: Option<Value>) -> Option<String> {
    match error? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Media type without parameters, lowercased (`application/json; charset=utf-8` -> `application/json`)
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Value> {
    if body.is_empty() {
        return Err(Error::EmptyBody);
    }

    let media_type = media_type(content_type.unwrap_or_default());
    if media_type != JSON_MEDIA_TYPE {
        return Err(Error::ContentType { media_type });
    }

    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|source| Error::Decode { source })?;
    envelope.into_outcome()
}

impl Response {
    /// Parse what the transport returned.
    ///
    /// A transport failure is carried through without touching the body.
    /// Otherwise the body is read exactly once and kept on the response.
    pub fn parse(raw: Result<RawResponse>) -> Response {
        let mut raw = match raw {
            Ok(raw) => raw,
            Err(err) => return Response::failed(err),
        };

        let mut body = Vec::new();
        if let Err(e) = raw.body.read_to_end(&mut body) {
            return Response {
                outcome: Err(Error::transport(e)),
                status: Some(raw.status),
                body: None,
            };
        }

        Response {
            outcome: decode(raw.content_type(), &body),
            status: Some(raw.status),
            body: Some(body),
        }
    }

    /// A response that failed before anything was received
    pub fn failed(err: Error) -> Response {
        Response {
            outcome: Err(err),
            status: None,
            body: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Payload of a successful call. `Null` when the API sent none.
    pub fn data(&self) -> Option<&Value> {
        self.outcome.as_ref().ok()
    }

    /// Payload as a string, for calls that return a single value (e.g. a key)
    pub fn data_str(&self) -> Option<&str> {
        self.data().and_then(Value::as_str)
    }

    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }

    /// Raw body bytes, if the body was read
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// HTTP status, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn into_result(self) -> Result<Value> {
        self.outcome
    }

    /// Deserialize the payload into `T`
    pub fn apply<T>(&self) -> std::result::Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        T::deserialize(self.data().unwrap_or(&Value::Null))
    }

    /// Get a value from the payload by a slash-separated path.
    /// For example, "recipients/0/status" walks into an object, then an array.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = self.data()?;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a string value from the payload by a slash-separated path
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(|s| s.to_string()))
    }
}
