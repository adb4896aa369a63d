//! Owner identification middleware
//!
//! Credentials are checked by the upstream gateway, which forwards the
//! learner's identity in the `X-Owner-Id` header. Requests without it are
//! rejected before reaching any handler.

use axum::{body::Body, extract::Request, http::HeaderName, middleware::Next, response::Response};

use crate::error::{ApiError, Result};

/// Header carrying the opaque learner identifier
pub static OWNER_HEADER: HeaderName = HeaderName::from_static("x-owner-id");

/// Authenticated owner stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedOwner {
    pub owner: String,
}

/// Owner middleware - extracts the owner id from the gateway header
pub async fn owner_middleware(mut request: Request<Body>, next: Next) -> Result<Response> {
    // Skip for health check
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let owner = extract_owner(&request)?;
    request.extensions_mut().insert(AuthenticatedOwner { owner });

    Ok(next.run(request).await)
}

fn extract_owner(request: &Request<Body>) -> Result<String> {
    let value = request
        .headers()
        .get(&OWNER_HEADER)
        .ok_or_else(|| ApiError::Unauthorized("Missing X-Owner-Id header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid X-Owner-Id header".to_string()))?
        .trim();

    if value.is_empty() {
        return Err(ApiError::Unauthorized("Empty X-Owner-Id header".to_string()));
    }

    Ok(value.to_string())
}
