use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

// Extractors whose rejections go through `AppError`, so malformed requests
// get the same `{"error": ...}` body as every other failure.

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
