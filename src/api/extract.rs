//! Extractors that report malformed input as [`AppError`] bodies

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body; a rejection becomes a `BadValue` error response
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string; a rejection becomes a `BadValue` error response
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
