//! Error surfaced by the orchestration functions the controller calls.

use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionError;
use crate::sweep::ValidationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaygroundError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl PlaygroundError {
    /// Whether the page must stop rendering and ask the user to sign in.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}
