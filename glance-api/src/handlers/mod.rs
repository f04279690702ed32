//! HTTP handlers
//!
//! Each handler pulls path/query/body inputs, calls one resource operation
//! and wraps the result in the [`ApiResponse`] envelope.

use axum::{
    http::{Method, StatusCode, Uri},
    Json,
};
use glance_common::ApiResponse;

use crate::error::{self, ApiError};

pub mod configmaps;
pub mod deployments;
pub mod health;
pub mod ingresses;
pub mod namespaces;
pub mod pods;
pub mod secrets;
pub mod services;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
pub type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

fn created<T>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

/// Fallback for requests no route matches
pub async fn fallback(method: Method, uri: Uri) -> ApiError {
    error::not_found(format!("No route for {} {}", method, uri.path()))
}
