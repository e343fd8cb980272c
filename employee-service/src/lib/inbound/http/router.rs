use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::list_employees::list_employees;
use super::handlers::login::login;
use super::handlers::register_employee::register_employee;
use crate::domain::employee::ports::AuthenticationServicePort;
use crate::domain::employee::ports::DirectoryQueryServicePort;
use crate::domain::employee::ports::RegistrationServicePort;

#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<dyn RegistrationServicePort>,
    pub authentication_service: Arc<dyn AuthenticationServicePort>,
    pub directory_service: Arc<dyn DirectoryQueryServicePort>,
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/api/auth/register", post(register_employee))
        .route("/api/auth/login", post(login))
        .route("/api/employees", get(list_employees));

    // Headers are left out of the span: login bodies and bearer tokens stay out of logs.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    routes
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
