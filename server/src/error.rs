use sweeper_core::GameError;
use sweeper_protocol::{ErrorKind, ErrorResponse, ProtocolError};
use thiserror::Error;

use crate::InvalidId;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown or expired session")]
    SessionNotFound,
    #[error("Unknown game {0}")]
    GameNotFound(String),
    #[error("Session already holds {0} games")]
    TooManyGames(usize),
    #[error("Unknown route {0}")]
    RouteNotFound(String),
    #[error("Method not allowed on {0}")]
    MethodNotAllowed(String),
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Invalid server configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        use ServiceError::*;
        match self {
            SessionNotFound | GameNotFound(_) | RouteNotFound(_) => ErrorKind::NotFound,
            TooManyGames(_) => ErrorKind::TooManyGames,
            MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            ServiceError::InvalidId(_) | Protocol(_) => ErrorKind::BadRequest,
            Game(GameError::OutOfBounds { .. }) => ErrorKind::OutOfBounds,
            Game(GameError::Config(_)) | Config(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::BadRequest | ErrorKind::OutOfBounds => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::TooManyGames => 429,
            ErrorKind::Internal => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.kind(), self.to_string())
    }
}

pub type Result<T> = core::result::Result<T, ServiceError>;
