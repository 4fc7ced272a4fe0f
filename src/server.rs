//! HTTP transport and per-request context building.
//!
//! The router exposes `POST /graphql` (execution), `GET /graphql` (GraphiQL
//! playground), `GET /ws` (WebSocket subscriptions) and `GET /health`. Before
//! executing a request the handler resolves the bearer token, if any, to a
//! full user document and attaches it as [`CurrentUser`] request data.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQLSubscription;
use axum::{
    http::{header, HeaderMap},
    response::Html,
    routing::get,
    Json, Router,
};

use crate::auth::AuthService;
use crate::graphql::{build_schema_with_subscriptions, CurrentUser, EventSender};
use crate::schema::User;
use crate::store::{SledStore, Store};

const BEARER_PREFIX: &str = "bearer ";

/// Resolve the request's bearer credential to the full current user.
///
/// The user document is freshly read from the store so fields like the
/// friends list are never taken from stale token claims. Returns `None` for
/// a missing or invalid token, or when the claimed user no longer exists.
pub fn resolve_current_user(
    headers: &HeaderMap,
    auth: &AuthService,
    store: &SledStore,
) -> Option<User> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    if value.len() <= BEARER_PREFIX.len() {
        return None;
    }
    let (prefix, token) = value.split_at(BEARER_PREFIX.len());
    if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let identity = auth.resolve_identity(token)?;
    store.get_user(identity.user_id).ok().flatten()
}

/// Build the axum application around the schema, with the notification bus
/// injected by the caller.
pub fn app(store: Arc<SledStore>, auth: AuthService, event_sender: EventSender) -> Router {
    let schema = build_schema_with_subscriptions(store.clone(), auth.clone(), event_sender);

    let schema_post = schema.clone();
    let graphql_handler = move |headers: HeaderMap, Json(request): Json<async_graphql::Request>| {
        let schema = schema_post.clone();
        let auth = auth.clone();
        let store = store.clone();
        async move {
            let current = resolve_current_user(&headers, &auth, &store);
            let request = request.data(CurrentUser(current));
            Json(schema.execute(request).await)
        }
    };

    let graphiql_handler = || async {
        Html(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/ws")
                .finish(),
        )
    };

    let health_handler = || async { "OK" };

    Router::new()
        .route(
            "/graphql",
            axum::routing::post(graphql_handler).get(graphiql_handler),
        )
        .route_service("/ws", GraphQLSubscription::new(schema))
        .route("/health", get(health_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::User as DomainUser;

    fn fixture() -> (AuthService, SledStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("db")).unwrap();
        let auth = AuthService::new("test-signing-key", "secret");
        (auth, store, dir)
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn bearer_token_resolves_to_fresh_user() {
        let (auth, store, _dir) = fixture();
        let mut alice = store.insert_user(DomainUser::new("alice", None)).unwrap();
        let token = auth.login(&store, "alice", "secret").unwrap();

        // Mutate the stored document after the token was issued; the
        // context builder must observe the update.
        alice.favorite_genre = Some("scifi".into());
        store.save_user(&alice).unwrap();

        let headers = headers_with_auth(&format!("Bearer {token}"));
        let current = resolve_current_user(&headers, &auth, &store).unwrap();
        assert_eq!(current.favorite_genre.as_deref(), Some("scifi"));
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let (auth, store, _dir) = fixture();
        store.insert_user(DomainUser::new("alice", None)).unwrap();
        let token = auth.login(&store, "alice", "secret").unwrap();

        let headers = headers_with_auth(&format!("bearer {token}"));
        assert!(resolve_current_user(&headers, &auth, &store).is_some());
    }

    #[test]
    fn missing_or_mangled_header_yields_no_identity() {
        let (auth, store, _dir) = fixture();
        assert!(resolve_current_user(&HeaderMap::new(), &auth, &store).is_none());
        let headers = headers_with_auth("Basic abc123");
        assert!(resolve_current_user(&headers, &auth, &store).is_none());
        let headers = headers_with_auth("Bearer not-a-token");
        assert!(resolve_current_user(&headers, &auth, &store).is_none());
    }
}
