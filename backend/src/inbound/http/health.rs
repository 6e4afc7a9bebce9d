//! Readiness probe for orchestration and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header::{CACHE_CONTROL, ContentType};
use actix_web::{HttpResponse, get, web};

/// Shared readiness flag, flipped once the store is open and the server bound.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Create a state that reports not ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether the service accepts traffic.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Readiness probe. Returns `200 OK` with a plain-text body once ready and
/// `503` before.
#[utoipa::path(
    get,
    path = "/api/healthz",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready", body = String, content_type = "text/plain"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/healthz")]
pub async fn healthz(state: web::Data<HealthState>) -> HttpResponse {
    let ready = state.is_ready();
    let mut response = if ready {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((CACHE_CONTROL, "no-store"))
        .content_type(ContentType::plaintext())
        .body(if ready { "OK" } else { "Not ready" })
}
