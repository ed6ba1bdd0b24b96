// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The Message envelope.
//!
//! A Message wraps one Command or Response with its routing metadata. Its
//! wire form follows the OpenC2 JSON transfer layout:
//!
//! ```text
//! {
//!   "headers": {"request_id": "...", "created": 1700000000000, "from": "...", "to": ["..."]},
//!   "body": {"openc2": {"request": { <command> }}}
//! }
//! ```
//!
//! `content_type`, `version` and `encoding` describe the envelope itself and
//! travel in the transport framing, not in the body.

use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::engine_core::constants::message as wire;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::impl_record;
use crate::language::command::Command;
use crate::language::response::{Response, StatusCode};
use crate::registry::Registry;
use crate::types::traits::expect_object;
use crate::types::{ArrayOf, DateTime, Decode, FieldReader, FieldWriter, Openc2Type, Record, Version};

/// Direction of a Message, derived from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Request,
    Response,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Request => wire::KEY_REQUEST,
            MessageType::Response => wire::KEY_RESPONSE,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Command(Command),
    Response(Response),
}

impl Content {
    pub fn msg_type(&self) -> MessageType {
        match self {
            Content::Command(_) => MessageType::Request,
            Content::Response(_) => MessageType::Response,
        }
    }

    fn encode(&self) -> Result<Value> {
        match self {
            Content::Command(cmd) => cmd.encode(),
            Content::Response(resp) => resp.encode(),
        }
    }
}

impl From<Command> for Content {
    fn from(cmd: Command) -> Self {
        Content::Command(cmd)
    }
}

impl From<Response> for Content {
    fn from(resp: Response) -> Self {
        Content::Response(resp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub content: Content,
    pub content_type: String,
    pub msg_type: MessageType,
    pub status: Option<StatusCode>,
    pub request_id: String,
    pub created: DateTime,
    pub from: Option<String>,
    pub to: Vec<String>,
    pub version: Version,
    pub encoding: String,
}

impl Message {
    /// Wrap `content`, stamping a fresh request id and creation time.
    pub fn new(content: impl Into<Content>) -> Self {
        let content = content.into();
        let status = match &content {
            Content::Response(resp) => Some(resp.status.clone()),
            Content::Command(_) => None,
        };
        Self {
            msg_type: content.msg_type(),
            content,
            content_type: wire::CONTENT_TYPE.to_string(),
            status,
            request_id: Uuid::new_v4().to_string(),
            created: DateTime::now(),
            from: None,
            to: Vec::new(),
            version: Version::new(wire::VERSION_MAJOR, wire::VERSION_MINOR),
            encoding: wire::ENCODING_JSON.to_string(),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to(mut self, to: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.to = to.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Reply to this message: same request id, addressed back to the sender.
    pub fn response_to(&self, response: Response) -> Message {
        let mut reply = Message::new(response).with_request_id(self.request_id.clone());
        reply.to = self.from.iter().cloned().collect();
        reply.encoding = self.encoding.clone();
        reply
    }

    pub fn command(&self) -> Option<&Command> {
        match &self.content {
            Content::Command(cmd) => Some(cmd),
            Content::Response(_) => None,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        match &self.content {
            Content::Response(resp) => Some(resp),
            Content::Command(_) => None,
        }
    }

    fn headers(&self) -> Headers {
        Headers {
            request_id: Some(self.request_id.clone()),
            created: Some(self.created),
            from: self.from.clone(),
            to: (!self.to.is_empty()).then(|| Recipients(self.to.clone())),
            status: self.status.clone(),
        }
    }
}

impl Openc2Type for Message {
    fn encode(&self) -> Result<Value> {
        let mut openc2 = Map::with_capacity(1);
        openc2.insert(self.msg_type.as_str().to_string(), self.content.encode()?);
        let mut body = Map::with_capacity(1);
        body.insert(wire::KEY_OPENC2.to_string(), Value::Object(openc2));

        let mut out = Map::with_capacity(2);
        out.insert(wire::KEY_HEADERS.to_string(), self.headers().encode()?);
        out.insert(wire::KEY_BODY.to_string(), Value::Object(body));
        Ok(Value::Object(out))
    }
}

impl Decode for Message {
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        let obj = expect_object(value, "Message")?;
        if let Some(unknown) = obj
            .keys()
            .find(|k| *k != wire::KEY_HEADERS && *k != wire::KEY_BODY)
        {
            return Err(Openc2Error::schema(format!("Message has no field '{}'", unknown)));
        }
        let headers = match obj.get(wire::KEY_HEADERS) {
            Some(h) => Headers::decode(h, registry)?,
            None => Headers::default(),
        };
        let body = obj
            .get(wire::KEY_BODY)
            .ok_or_else(|| Openc2Error::schema("Message is missing 'body'"))?;
        let content = decode_body(body, registry)?;

        let mut msg = Message::new(content);
        if let Some(id) = headers.request_id {
            msg.request_id = id;
        }
        if let Some(created) = headers.created {
            msg.created = created;
        }
        msg.from = headers.from;
        msg.to = headers.to.map(|r| r.0).unwrap_or_default();
        // The body Response is authoritative; a header copy must agree with it.
        if let Some(status) = headers.status {
            if msg.status.as_ref() != Some(&status) {
                return Err(Openc2Error::value(format!(
                    "header status {} does not match the body",
                    status.value()
                )));
            }
        }
        Ok(msg)
    }
}

fn decode_body(body: &Value, registry: &Registry) -> Result<Content> {
    let body = expect_object(body, "body")?;
    let openc2 = single_entry(body, "body")?;
    if openc2.0 != wire::KEY_OPENC2 {
        return Err(Openc2Error::schema(format!("unsupported body '{}'", openc2.0)));
    }
    let (kind, inner) = single_entry(expect_object(openc2.1, wire::KEY_OPENC2)?, wire::KEY_OPENC2)?;
    match kind.as_str() {
        wire::KEY_REQUEST => Command::decode(inner, registry).map(Content::Command),
        wire::KEY_RESPONSE => Response::decode(inner, registry).map(Content::Response),
        other => Err(Openc2Error::schema(format!("unknown message type '{}'", other))),
    }
}

fn single_entry<'a>(obj: &'a Map<String, Value>, what: &str) -> Result<(&'a String, &'a Value)> {
    let mut entries = obj.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(Openc2Error::value(format!(
            "{} must have exactly one key, got {}",
            what,
            obj.len()
        ))),
    }
}

/// `to` is an array on the wire; a lone string is accepted on input.
#[derive(Debug, Clone, PartialEq)]
struct Recipients(Vec<String>);

impl Openc2Type for Recipients {
    fn encode(&self) -> Result<Value> {
        Ok(Value::from(self.0.clone()))
    }
}

impl Decode for Recipients {
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self(vec![s.clone()])),
            other => ArrayOf::<String>::decode(other, registry).map(|a| Self(a.into_vec())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Headers {
    request_id: Option<String>,
    created: Option<DateTime>,
    from: Option<String>,
    to: Option<Recipients>,
    status: Option<StatusCode>,
}

impl Record for Headers {
    const TYPE_NAME: &'static str = "headers";
    const FIELDS: &'static [&'static str] = &["request_id", "created", "from", "to", "status"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("request_id", &self.request_id)?;
        out.field("created", &self.created)?;
        out.field("from", &self.from)?;
        out.field("to", &self.to)?;
        out.field("status", &self.status)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            request_id: fields.optional("request_id")?,
            created: fields.optional("created")?,
            from: fields.optional("from")?,
            to: fields.optional("to")?,
            status: fields.optional("status")?,
        })
    }
}

impl_record!(Headers);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::actions::Action;
    use crate::language::features::{Feature, Features};
    use serde_json::json;

    fn query(registry: &Registry) -> Command {
        let features = Features::new(vec![Feature::VERSIONS]).unwrap();
        Command::new(Action::QUERY, features, registry).unwrap()
    }

    #[test]
    fn test_stamping() {
        let registry = Registry::new();
        let a = Message::new(query(&registry));
        let b = Message::new(query(&registry));
        assert_ne!(a.request_id, b.request_id);
        assert!(Uuid::parse_str(&a.request_id).is_ok());
        assert!(a.created.as_millis() > 0);
        assert_eq!(a.msg_type, MessageType::Request);
        assert_eq!(a.content_type, "application/openc2");
        assert_eq!(a.version.to_string(), "1.0");
    }

    #[test]
    fn test_wire_layout() {
        let registry = Registry::new();
        let msg = Message::new(query(&registry))
            .with_request_id("r-1")
            .with_from("producer")
            .with_to(["fw1"]);
        let mut msg = msg;
        msg.created = DateTime::from_millis(1_700_000_000_000);
        assert_eq!(
            msg.encode().unwrap(),
            json!({
                "headers": {
                    "request_id": "r-1",
                    "created": 1_700_000_000_000u64,
                    "from": "producer",
                    "to": ["fw1"]
                },
                "body": {"openc2": {"request": {
                    "action": "query",
                    "target": {"features": ["versions"]}
                }}}
            })
        );
        assert_eq!(Message::decode(&msg.encode().unwrap(), &registry).unwrap(), msg);
    }

    #[test]
    fn test_response_to() {
        let registry = Registry::new();
        let request = Message::new(query(&registry)).with_from("producer");
        let reply = request.response_to(Response::ok());
        assert_eq!(reply.request_id, request.request_id);
        assert_eq!(reply.to, vec!["producer".to_string()]);
        assert_eq!(reply.msg_type, MessageType::Response);
        assert_eq!(reply.status, Some(StatusCode::OK));
        let wire = reply.encode().unwrap();
        assert_eq!(wire["headers"]["status"], json!(200));
        assert_eq!(wire["body"]["openc2"]["response"]["status"], json!(200));
    }

    #[test]
    fn test_missing_headers_are_stamped() {
        let registry = Registry::new();
        let wire = json!({"body": {"openc2": {"request": {
            "action": "query", "target": {"features": []}
        }}}});
        let msg = Message::decode(&wire, &registry).unwrap();
        assert!(!msg.request_id.is_empty());
        assert!(msg.to.is_empty());
    }

    #[test]
    fn test_malformed_bodies() {
        let registry = Registry::new();
        let two = json!({"body": {"openc2": {"request": {}, "response": {}}}});
        assert!(matches!(Message::decode(&two, &registry), Err(Openc2Error::Value(_))));
        let other = json!({"body": {"openc2": {"notify": {}}}});
        assert!(matches!(Message::decode(&other, &registry), Err(Openc2Error::Schema(_))));
        let extra = json!({"body": {}, "trailer": 1});
        assert!(matches!(Message::decode(&extra, &registry), Err(Openc2Error::Schema(_))));
    }

    #[test]
    fn test_header_status_must_match_body() {
        let registry = Registry::new();
        let agreeing = json!({
            "headers": {"status": 404},
            "body": {"openc2": {"response": {"status": 404}}}
        });
        let msg = Message::decode(&agreeing, &registry).unwrap();
        assert_eq!(msg.status, Some(StatusCode::NOT_FOUND));

        let contradicting = json!({
            "headers": {"status": 200},
            "body": {"openc2": {"response": {"status": 500}}}
        });
        assert!(matches!(
            Message::decode(&contradicting, &registry),
            Err(Openc2Error::Value(_))
        ));

        let on_request = json!({
            "headers": {"status": 200},
            "body": {"openc2": {"request": {"action": "query", "target": {"features": []}}}}
        });
        assert!(matches!(
            Message::decode(&on_request, &registry),
            Err(Openc2Error::Value(_))
        ));
    }

    #[test]
    fn test_to_accepts_single_string() {
        let registry = Registry::new();
        let wire = json!({
            "headers": {"to": "fw1"},
            "body": {"openc2": {"response": {"status": 200}}}
        });
        let msg = Message::decode(&wire, &registry).unwrap();
        assert_eq!(msg.to, vec!["fw1".to_string()]);
        assert_eq!(msg.response().map(|r| r.status.value()), Some(200));
    }
}
