//! Generation errors
//!
//! Transient errors abort a single attempt and are retried by the
//! orchestrator. `AttemptsExhausted` is the only error a caller of
//! [`crate::dungeon::generate`] ever sees.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(
        "room of at least {min_room_dimension} tiles with {min_room_padding} padding does not fit in a {width}x{height} section"
    )]
    RoomDoesNotFit {
        width: usize,
        height: usize,
        min_room_dimension: usize,
        min_room_padding: usize,
    },

    #[error("invalid generation parameters: {0}")]
    InvalidParameters(String),

    #[error("could not join rooms: {connected} connected, {unconnected} unreachable")]
    ConnectionFailed { connected: usize, unconnected: usize },

    #[error(
        "cannot generate a {width}x{height} map with these parameters after {attempts} attempts"
    )]
    AttemptsExhausted {
        attempts: usize,
        width: usize,
        height: usize,
    },
}

impl GenerationError {
    /// Whether the orchestrator should retry after this error
    pub fn is_transient(&self) -> bool {
        !matches!(self, GenerationError::AttemptsExhausted { .. })
    }
}
