//! JSON messages exchanged between the game server and its clients.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use request::*;
pub use response::*;

/// Re-exported so clients only need this crate to speak the protocol.
pub use sweeper_core::{CellValue, Difficulty, GameState};

mod request;
mod response;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

pub fn encode<T: Serialize>(message: &T) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_click_payload() {
        let request: ClickRequest =
            decode(r#"{"game_id": "00000000000000ff", "row": 3, "col": 4, "action": "reveal"}"#).unwrap();

        assert_eq!(
            request,
            ClickRequest {
                game_id: "00000000000000ff".into(),
                row: 3,
                col: 4,
                action: Action::Reveal,
            }
        );
    }

    #[test]
    fn rejects_unknown_action() {
        let result: Result<ClickRequest> =
            decode(r#"{"game_id": "1", "row": 0, "col": 0, "action": "chord"}"#);

        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn new_game_defaults_to_easy() {
        let request: NewGameRequest = decode("{}").unwrap();
        assert_eq!(request.difficulty, Difficulty::Easy);

        let request: NewGameRequest = decode(r#"{"difficulty": "Hard"}"#).unwrap();
        assert_eq!(request.difficulty, Difficulty::Hard);
    }

    #[test]
    fn reset_keeps_difficulty_optional() {
        let request: ResetRequest = decode(r#"{"game_id": "abc"}"#).unwrap();
        assert_eq!(request.difficulty, None);
    }

    #[test]
    fn status_response_is_plain_ok() {
        assert_eq!(encode(&StatusResponse::ok()).unwrap(), r#"{"status":"ok"}"#);
    }

    #[test]
    fn error_response_uses_snake_case_kinds() {
        let body = encode(&ErrorResponse::new(ErrorKind::OutOfBounds, "nope")).unwrap();
        assert_eq!(body, r#"{"error":"out_of_bounds","message":"nope"}"#);
    }
}
