use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::MethodRouter,
};
use thiserror::Error;

use crate::auth::{Identity, TokenKeys};
use crate::error::ApiError;

/// Why a guard refused a request. All of these surface as 401.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please log in")]
    MissingCredential,

    #[error("Please log in")]
    InvalidCredential,

    #[error("Access denied")]
    AccessDenied,

    #[error("Admin privileges required")]
    AdminRequired,
}

/// One authorization check in a route's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Attach an identity when a valid credential is present; never rejects.
    OptionalAuthenticate,
    /// Reject unless a valid bearer credential is present.
    RequireAuthenticated,
    /// Reject unless the identity matches the `param` path segment or is an admin.
    RequireSelfOrAdmin { param: &'static str },
    /// Reject unless the identity is an admin.
    RequireAdmin,
}

/// Request facts the guards are allowed to look at.
#[derive(Debug, Clone, Copy)]
pub struct GuardInput<'a> {
    pub headers: &'a HeaderMap,
    pub params: &'a HashMap<String, String>,
}

impl Guard {
    /// Evaluate against the identity attached by earlier guards, returning the
    /// identity to carry forward.
    pub fn check(
        &self,
        input: &GuardInput<'_>,
        keys: &TokenKeys,
        current: Option<Identity>,
    ) -> Result<Option<Identity>, AuthError> {
        match self {
            Guard::OptionalAuthenticate => Ok(authenticate(input.headers, keys).ok().or(current)),
            Guard::RequireAuthenticated => authenticate(input.headers, keys).map(Some),
            Guard::RequireSelfOrAdmin { param } => {
                let identity = current.ok_or(AuthError::AccessDenied)?;
                let target = input.params.get(*param).and_then(|v| v.parse::<i32>().ok());
                match target {
                    Some(target) if identity.owns_or_admin(target) => Ok(Some(identity)),
                    _ if identity.is_admin() => Ok(Some(identity)),
                    _ => Err(AuthError::AccessDenied),
                }
            }
            Guard::RequireAdmin => match current {
                Some(identity) if identity.is_admin() => Ok(Some(identity)),
                _ => Err(AuthError::AdminRequired),
            },
        }
    }
}

/// Run guards in declared order; the first rejection wins.
pub fn run_chain(
    guards: &[Guard],
    input: &GuardInput<'_>,
    keys: &TokenKeys,
) -> Result<Option<Identity>, AuthError> {
    guards
        .iter()
        .try_fold(None, |current, guard| guard.check(input, keys, current))
}

/// Extract the bearer token from an `Authorization: Bearer <token>` header.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Verify the bearer credential and turn its claims into an identity.
pub fn authenticate(headers: &HeaderMap, keys: &TokenKeys) -> Result<Identity, AuthError> {
    let token = extract_token(headers).ok_or(AuthError::MissingCredential)?;
    keys.verify(token).map(Identity::from).map_err(|e| {
        tracing::debug!("Credential rejected: {}", e);
        AuthError::InvalidCredential
    })
}

#[derive(Clone)]
pub struct GuardState {
    guard: Guard,
    keys: Arc<TokenKeys>,
}

/// Middleware wrapper for a single guard. The verified identity travels in the
/// request extensions.
pub async fn guard_middleware(
    State(state): State<GuardState>,
    params: Option<Path<HashMap<String, String>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let params = params.map(|Path(p)| p).unwrap_or_default();
    let current = request.extensions().get::<Identity>().cloned();

    let outcome = {
        let input = GuardInput {
            headers: request.headers(),
            params: &params,
        };
        state.guard.check(&input, &state.keys, current)
    };

    match outcome {
        Ok(Some(identity)) => {
            tracing::debug!("{:?} passed for user {} ({})", state.guard, identity.id, identity.role.as_str());
            request.extensions_mut().insert(identity);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!("{:?} rejected {} {}: {}", state.guard, request.method(), request.uri().path(), err);
            return Err(err.into());
        }
    }

    Ok(next.run(request).await)
}

/// Wrap `route` so `guards` run in the order given before the handler.
pub fn guarded<S>(route: MethodRouter<S>, keys: &Arc<TokenKeys>, guards: &[Guard]) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Later layers wrap earlier ones, so apply in reverse.
    guards.iter().rev().fold(route, |route, guard| {
        route.route_layer(from_fn_with_state(
            GuardState {
                guard: *guard,
                keys: keys.clone(),
            },
            guard_middleware,
        ))
    })
}
