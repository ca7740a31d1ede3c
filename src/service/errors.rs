use crate::models::{Point, RequestValidationError};

/// Errors that reject an optimization run before it starts.
///
/// Once a run passes validation nothing in the evolution loop can fail.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("InvalidRequest: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    #[error("InvalidUser: user {index} has demand={demand}, demand must be positive and finite")]
    InvalidUser { index: usize, demand: f64 },
    #[error("UserOutOfArea: user {index} at ({}, {}) lies outside [0, {area_size})²", .position.x, .position.y)]
    UserOutOfArea {
        index: usize,
        position: Point,
        area_size: i32,
    },
}
