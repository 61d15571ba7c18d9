use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Event {event} cannot be handled while {state}")]
    InvalidPointerState { event: String, state: String },

    #[error("Collaborator failed: {0}")]
    CollaboratorFailure(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Invalid detection result: {0}")]
    InvalidDetection(String),

    #[error("Invalid viewer config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
