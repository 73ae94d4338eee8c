use thiserror::Error;

use crate::models::layer::LayerId;
use crate::models::position::{Direction, Position};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("workspace already has a root layer")]
    DuplicateRoot,
    #[error("unknown source layer: {0}")]
    UnknownSource(LayerId),
    #[error("layer {id} already has a neighbour {direction}")]
    EdgeOccupied { id: LayerId, direction: Direction },
    #[error("position {0} is already occupied")]
    PositionOccupied(Position),
    #[error("position {0} is outside the workspace bounds")]
    OutOfBounds(Position),
    #[error("unknown layer: {0}")]
    UnknownId(LayerId),
    #[error("layer id already in use: {0}")]
    DuplicateId(LayerId),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    /// True for errors caused by wiring the workspace incorrectly, as opposed
    /// to I/O or parse failures.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::DuplicateRoot
                | Error::UnknownSource(_)
                | Error::EdgeOccupied { .. }
                | Error::PositionOccupied(_)
                | Error::OutOfBounds(_)
                | Error::UnknownId(_)
                | Error::DuplicateId(_)
        )
    }
}
