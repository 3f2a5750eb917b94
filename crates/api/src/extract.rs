//! `Json` and `Path` extractors whose rejections go through [`AppError`], so
//! a malformed body or id gets the same `{"error": ...}` response as any
//! other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::middleware::error_handling::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
