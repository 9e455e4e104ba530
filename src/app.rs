use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenKeys;
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{guarded, Guard};
use crate::state::AppState;

const OPTIONAL: &[Guard] = &[Guard::OptionalAuthenticate];
const AUTHENTICATED: &[Guard] = &[Guard::RequireAuthenticated];
const SELF_OR_ADMIN: &[Guard] = &[Guard::RequireAuthenticated, Guard::RequireSelfOrAdmin { param: "id" }];
const ADMIN: &[Guard] = &[Guard::RequireAuthenticated, Guard::RequireAdmin];

/// Full application router with every route, its guards and the global layers.
pub fn app(state: AppState) -> Router {
    let keys = state.keys.clone();

    let router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(auth_routes())
        .merge(user_routes(&keys))
        .merge(event_routes(&keys))
        .merge(feedback_routes(&keys))
        .merge(q_and_a_routes(&keys))
        .merge(admin_routes(&keys))
        .fallback(route_not_found)
        // Global middleware
        .layer(cors_layer(&state.config.security));

    let router = if state.config.server.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
        .route("/auth/logout", post(auth::logout_post))
}

fn user_routes(keys: &Arc<TokenKeys>) -> Router<AppState> {
    use protected::users;

    Router::new()
        .route(
            "/users/:id",
            guarded(get(users::get_user).patch(users::update_user), keys, SELF_OR_ADMIN),
        )
        .route(
            "/users/:id/registrations",
            guarded(get(users::user_registrations), keys, SELF_OR_ADMIN),
        )
}

fn event_routes(keys: &Arc<TokenKeys>) -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(public::events::list_events).merge(guarded(post(elevated::events::create_event), keys, ADMIN)),
        )
        .route(
            "/events/:id",
            guarded(get(public::events::get_event), keys, OPTIONAL).merge(guarded(
                patch(elevated::events::update_event).delete(elevated::events::delete_event),
                keys,
                ADMIN,
            )),
        )
        // Registrations
        .route(
            "/events/:id/register",
            guarded(
                post(protected::registrations::register_for_event)
                    .delete(protected::registrations::unregister_from_event),
                keys,
                AUTHENTICATED,
            ),
        )
        .route("/events/:id/registrations", get(public::events::event_registrations))
}

fn feedback_routes(keys: &Arc<TokenKeys>) -> Router<AppState> {
    use protected::feedback;

    Router::new()
        .route(
            "/events/:id/feedback",
            get(public::events::event_feedback).merge(guarded(post(feedback::create_feedback), keys, AUTHENTICATED)),
        )
        .route(
            "/events/:id/feedback/:feedback_id",
            guarded(
                patch(feedback::update_feedback).delete(feedback::delete_feedback),
                keys,
                AUTHENTICATED,
            ),
        )
}

fn q_and_a_routes(keys: &Arc<TokenKeys>) -> Router<AppState> {
    Router::new()
        .route(
            "/q_and_a",
            get(public::q_and_a::list_questions)
                .merge(guarded(post(protected::q_and_a::ask_question), keys, AUTHENTICATED)),
        )
        .route(
            "/q_and_a/:id",
            get(public::q_and_a::get_question)
                .merge(guarded(delete(protected::q_and_a::delete_question), keys, AUTHENTICATED)),
        )
        .route(
            "/q_and_a/:id/answer",
            guarded(patch(protected::q_and_a::answer_question), keys, AUTHENTICATED),
        )
}

fn admin_routes(keys: &Arc<TokenKeys>) -> Router<AppState> {
    use elevated::{admin, events};

    Router::new()
        .route("/admin/users", guarded(get(admin::list_users), keys, ADMIN))
        .route("/admin/users/search", guarded(get(admin::search_users), keys, ADMIN))
        .route("/admin/users/:id", guarded(delete(admin::delete_user), keys, ADMIN))
        .route("/admin/users/:id/role", guarded(patch(admin::update_user_role), keys, ADMIN))
        .route("/admin/events", guarded(get(admin::list_events), keys, ADMIN))
        .route("/admin/events/:id", guarded(delete(events::delete_event), keys, ADMIN))
        .route(
            "/admin/feedback/:id",
            guarded(get(admin::event_feedback).delete(admin::delete_feedback), keys, ADMIN),
        )
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
