//! JSON envelopes exchanged with the console server.

use serde::{Deserialize, Deserializer, Serialize};

/// Envelope sent by the server, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Greeting sent right after the connection opens.
    Welcome {
        #[serde(default, deserialize_with = "null_as_empty")]
        html: String,
        #[serde(default)]
        cwd: Option<String>,
    },
    /// Result of a command.
    Output {
        #[serde(default, deserialize_with = "null_as_empty")]
        html: String,
        #[serde(default)]
        cwd: Option<String>,
    },
    /// Discard everything rendered so far.
    Clear,
    /// Farewell; the server is about to drop the session.
    Exit {
        #[serde(default, deserialize_with = "null_as_empty")]
        html: String,
    },
    /// Any other `type` value.
    #[serde(other)]
    Unknown,
}

/// `"html": null` renders like an empty body.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ServerMessage {
    /// Decode a text frame.
    pub fn parse(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Envelope sent to the server for each submitted command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientMessage {
    pub command: String,
}

impl ClientMessage {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_welcome_with_cwd() {
        let msg = ServerMessage::parse(
            r#"{"type":"welcome","html":"<div class=\"welcome\">hi</div>","cwd":"/Users/ana"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ServerMessage::Welcome {
                html: "<div class=\"welcome\">hi</div>".to_string(),
                cwd: Some("/Users/ana".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_output_without_cwd() {
        let msg = ServerMessage::parse(r#"{"type":"output","html":"<div>ok</div>"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Output {
                html: "<div>ok</div>".to_string(),
                cwd: None,
            }
        );
    }

    #[test]
    fn test_null_html_keeps_cwd() {
        let msg = ServerMessage::parse(r#"{"type":"output","html":null,"cwd":"/x"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Output {
                html: String::new(),
                cwd: Some("/x".to_string()),
            }
        );
        let msg = ServerMessage::parse(r#"{"type":"exit","html":null}"#).unwrap();
        assert_eq!(msg, ServerMessage::Exit { html: String::new() });
    }

    #[test]
    fn test_parse_clear_ignores_extra_fields() {
        assert_eq!(
            ServerMessage::parse(r#"{"type":"clear"}"#).unwrap(),
            ServerMessage::Clear
        );
        assert_eq!(
            ServerMessage::parse(r#"{"type":"clear","html":""}"#).unwrap(),
            ServerMessage::Clear
        );
    }

    #[test]
    fn test_parse_exit() {
        let msg = ServerMessage::parse(r#"{"type":"exit","html":"bye"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Exit {
                html: "bye".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let msg = ServerMessage::parse(r#"{"type":"progress","percent":40}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ServerMessage::parse("not json").is_err());
        assert!(ServerMessage::parse(r#"{"html":"no type"}"#).is_err());
    }

    #[test]
    fn test_client_message_json() {
        let json = ClientMessage::new("cat \"disc\"").to_json().unwrap();
        assert_eq!(json, r#"{"command":"cat \"disc\""}"#);
    }
}
