use std::sync::Arc;
use std::time::Duration;

use auth::AuthGate;
use auth::Authenticator;
use auth::ContextGate;
use auth::HeaderGate;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_chat::create_chat;
use super::handlers::create_user::create_user;
use super::handlers::create_user_chat::create_user_chat;
use super::handlers::delete_chat::delete_chat;
use super::handlers::delete_user::delete_user;
use super::handlers::delete_user_chat::delete_user_chat;
use super::handlers::get_chat::get_chat;
use super::handlers::get_user::get_user;
use super::handlers::get_user_chat::get_user_chat;
use super::handlers::list_chats::list_chats;
use super::handlers::list_chats::list_my_chats;
use super::handlers::list_user_chats::list_user_chats;
use super::handlers::list_users::list_users;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::handlers::update_chat::update_chat;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use super::middleware::verify_token;
use crate::config::AuthMode;
use crate::domain::chat::ports::ChatServicePort;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user_chat::ports::UserChatServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub chat_service: Arc<dyn ChatServicePort>,
    pub user_chat_service: Arc<dyn UserChatServicePort>,
    pub authenticator: Arc<Authenticator>,
}

/// Build the HTTP application.
///
/// `auth_mode` picks how protected routes resolve the caller: `Header` runs
/// the header gate alone, `Context` puts a token-verifying layer in front of
/// the context gate.
pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    chat_service: Arc<dyn ChatServicePort>,
    user_chat_service: Arc<dyn UserChatServicePort>,
    authenticator: Arc<Authenticator>,
    auth_mode: AuthMode,
) -> Router {
    let gate: Arc<dyn AuthGate> = match auth_mode {
        AuthMode::Header => Arc::new(HeaderGate::new(authenticator.codec())),
        AuthMode::Context => Arc::new(ContextGate),
    };
    let codec = authenticator.codec();

    let state = AppState {
        user_service,
        chat_service,
        user_chat_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in));

    let mut protected_routes = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/chats", get(list_chats).post(create_chat))
        .route("/api/chats/mine", get(list_my_chats))
        .route(
            "/api/chats/:chat_id",
            get(get_chat).put(update_chat).delete(delete_chat),
        )
        .route(
            "/api/user-chats",
            get(list_user_chats).post(create_user_chat),
        )
        .route(
            "/api/user-chats/:user_id/:chat_id",
            get(get_user_chat).delete(delete_user_chat),
        )
        .route_layer(middleware::from_fn_with_state(gate, authenticate));

    if auth_mode == AuthMode::Context {
        protected_routes =
            protected_routes.route_layer(middleware::from_fn_with_state(codec, verify_token));
    }

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

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
