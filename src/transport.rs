//! Game server boundary.
//!
//! [`Transport`] is the only way the session talks to the server. Replies are
//! classified here, once: a guess either comes back as a parsed
//! [`GuessReply`] carrying an explicit [`ServerSignal`], as a body that is not
//! JSON, or as a network failure. The session never inspects raw HTTP.

use crate::word::Word;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SERVER: &str = "https://wordle.we4shakthi.in/game";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered HTTP {0}")]
    Status(u16),
    #[error("server returned no player id")]
    MissingPlayerId,
}

/// Identity handed out by the server at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Result<Self, TransportError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TransportError::MissingPlayerId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Control signal carried by the server's free-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerSignal {
    Normal,
    /// The game ran out of allowed attempts
    LimitExceeded,
    /// The server has no game in progress for this player
    NoActiveGame,
}

impl ServerSignal {
    pub fn classify(message: Option<&str>) -> Self {
        let Some(message) = message else {
            return ServerSignal::Normal;
        };
        let lower = message.to_lowercase();
        if lower.contains("exceeded") {
            ServerSignal::LimitExceeded
        } else if lower.contains("no game") {
            ServerSignal::NoActiveGame
        } else {
            ServerSignal::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReply {
    /// Raw tag string, validated by the session
    pub feedback: Option<String>,
    pub message: Option<String>,
    pub signal: ServerSignal,
}

impl GuessReply {
    pub fn new(feedback: Option<String>, message: Option<String>) -> Self {
        let signal = ServerSignal::classify(message.as_deref());
        Self {
            feedback,
            message,
            signal,
        }
    }

    /// Parse a `/guess` response body.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        let raw: GuessResponse = serde_json::from_str(body)?;
        let feedback = raw.feedback.and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str())
                .collect::<Option<Vec<_>>>()
                .map(|tags| tags.concat()),
            _ => None,
        });
        Ok(Self::new(feedback, raw.message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Reply(GuessReply),
    /// The server answered with something that is not a JSON object
    Malformed { body: String },
    NetworkFailure { reason: String },
}

pub trait Transport {
    fn register(&mut self, mode: &str, name: &str) -> Result<PlayerId, TransportError>;

    /// Ask for a fresh game, replacing any game in progress.
    fn create_game(&mut self, player: &PlayerId) -> Result<(), TransportError>;

    fn submit_guess(&mut self, player: &PlayerId, guess: &Word) -> GuessOutcome;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn register(&mut self, mode: &str, name: &str) -> Result<PlayerId, TransportError> {
        (**self).register(mode, name)
    }

    fn create_game(&mut self, player: &PlayerId) -> Result<(), TransportError> {
        (**self).create_game(player)
    }

    fn submit_guess(&mut self, player: &PlayerId, guess: &Word) -> GuessOutcome {
        (**self).submit_guess(player, guess)
    }
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    mode: &'a str,
    name: &'a str,
}

#[derive(Deserialize)]
struct RegisterResponse {
    id: Option<Value>,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    id: &'a str,
    overwrite: bool,
}

#[derive(Serialize)]
struct GuessRequest<'a> {
    guess: &'a Word,
    id: &'a str,
}

#[derive(Deserialize)]
struct GuessResponse {
    feedback: Option<Value>,
    message: Option<String>,
}

/// Blocking HTTP client for the game server.
///
/// The client keeps a cookie store so the server can tie requests to one
/// browser-like session.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

impl Transport for HttpTransport {
    fn register(&mut self, mode: &str, name: &str) -> Result<PlayerId, TransportError> {
        let response: RegisterResponse = self
            .client
            .post(self.url("register"))
            .json(&RegisterRequest { mode, name })
            .send()?
            .error_for_status()?
            .json()?;
        match response.id {
            Some(Value::String(id)) => PlayerId::new(id),
            Some(Value::Number(n)) => PlayerId::new(n.to_string()),
            _ => Err(TransportError::MissingPlayerId),
        }
    }

    fn create_game(&mut self, player: &PlayerId) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.url("create"))
            .json(&CreateRequest {
                id: player.as_str(),
                overwrite: true,
            })
            .send()?;
        match response.status().as_u16() {
            200 | 201 => Ok(()),
            code => Err(TransportError::Status(code)),
        }
    }

    fn submit_guess(&mut self, player: &PlayerId, guess: &Word) -> GuessOutcome {
        let sent = self
            .client
            .post(self.url("guess"))
            .json(&GuessRequest {
                guess,
                id: player.as_str(),
            })
            .send();
        let body = match sent.and_then(|response| response.text()) {
            Ok(body) => body,
            Err(e) => {
                return GuessOutcome::NetworkFailure {
                    reason: e.to_string(),
                };
            }
        };
        match GuessReply::from_body(&body) {
            Ok(reply) => GuessOutcome::Reply(reply),
            Err(_) => GuessOutcome::Malformed { body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_signals() {
        assert_eq!(ServerSignal::classify(None), ServerSignal::Normal);
        assert_eq!(
            ServerSignal::classify(Some("Guess limit EXCEEDED")),
            ServerSignal::LimitExceeded
        );
        assert_eq!(
            ServerSignal::classify(Some("No game in progress")),
            ServerSignal::NoActiveGame
        );
        assert_eq!(
            ServerSignal::classify(Some("Keep guessing")),
            ServerSignal::Normal
        );
    }

    #[test]
    fn test_reply_from_body() {
        let reply = GuessReply::from_body(r#"{"feedback":"RYGRR","message":"ok"}"#).unwrap();
        assert_eq!(reply.feedback.as_deref(), Some("RYGRR"));
        assert_eq!(reply.message.as_deref(), Some("ok"));
        assert_eq!(reply.signal, ServerSignal::Normal);
    }

    #[test]
    fn test_reply_missing_fields() {
        let reply = GuessReply::from_body(r#"{"message":"No game found"}"#).unwrap();
        assert_eq!(reply.feedback, None);
        assert_eq!(reply.signal, ServerSignal::NoActiveGame);

        let reply = GuessReply::from_body("{}").unwrap();
        assert_eq!(reply, GuessReply::new(None, None));
    }

    #[test]
    fn test_reply_feedback_as_array() {
        let reply = GuessReply::from_body(r#"{"feedback":["g","y","r","r","g"]}"#).unwrap();
        assert_eq!(reply.feedback.as_deref(), Some("gyrrg"));

        let reply = GuessReply::from_body(r#"{"feedback":42}"#).unwrap();
        assert_eq!(reply.feedback, None);
    }

    #[test]
    fn test_reply_rejects_non_json() {
        assert!(GuessReply::from_body("<html>502 Bad Gateway</html>").is_err());
        assert!(GuessReply::from_body("").is_err());
    }

    #[test]
    fn test_player_id_must_not_be_empty() {
        assert!(matches!(
            PlayerId::new("   "),
            Err(TransportError::MissingPlayerId)
        ));
        assert_eq!(PlayerId::new("abc-123").unwrap().as_str(), "abc-123");
    }

    #[test]
    fn test_http_transport_url() {
        let transport = HttpTransport::new("http://localhost:9/game/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.url("guess"), "http://localhost:9/game/guess");
    }
}
