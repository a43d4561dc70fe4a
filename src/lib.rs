use async_graphql::{EmptySubscription, Schema, http::GraphiQLSource};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, HeaderName},
    response::{Html, IntoResponse},
    routing::get,
};

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;

// Module for the GraphQL resolver surface (users, podcasts).
pub mod resolvers;
use resolvers::{MutationRoot, QueryRoot};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point and tests.
pub use auth::TokenService;
pub use config::AppConfig;
pub use repository::{MemoryRepository, RepositoryState};

/// The executable GraphQL schema: merged query and mutation roots, no subscriptions.
pub type PodcastSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// build_schema
///
/// Assembles the schema and attaches the process-wide services (repository,
/// token service) as schema data. Per-request data — the resolved identity —
/// is injected later, in `graphql_handler`.
pub fn build_schema(repo: RepositoryState, tokens: TokenService) -> PodcastSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(repo)
    .data(tokens)
    .finish()
}

/// AppState
///
/// Implements the **Unified State Pattern**: the single, thread-safe, immutable
/// container holding all essential application services and configuration,
/// shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// The executable GraphQL schema (itself reference-counted internally).
    pub schema: PodcastSchema,
    /// Repository Layer: the backing store behind a trait object.
    pub repo: RepositoryState,
    /// Token Service: stateless issue/verify of session tokens.
    pub tokens: TokenService,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Wires the schema, token service, and repository together from a backing
    /// store and a configuration. Tests construct their state through here as
    /// well, with a fresh `MemoryRepository` and `AppConfig::default()`.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        let tokens = TokenService::new(config.jwt_secret.clone());
        let schema = build_schema(repo.clone(), tokens.clone());
        Self {
            schema,
            repo,
            tokens,
            config,
        }
    }
}

/// graphql_handler
///
/// The single entry point for every query and mutation. Identity resolution
/// runs here, once per request and before the schema dispatches to any
/// resolver: the optional `X-JWT` header is verified and, when it maps to a
/// live account, an `AuthUser` is attached to the request. Fields annotated
/// with `AuthGuard` reject the request when that attachment is missing.
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(user) = auth::resolve_identity(&headers, &state.tokens, &state.repo).await {
        request = request.data(user);
    }
    state.schema.execute(request).await.into()
}

/// graphiql
///
/// Serves the GraphiQL IDE for interactive exploration during development.
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// create_router
///
/// Assembles the application's routing structure, applies the global
/// middleware stack, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // The entire API surface lives behind a single GraphQL endpoint;
        // GET serves the IDE, POST executes operations.
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a tracing span
                // that carries the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: return the x-request-id header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI, so every log
/// line for a single request is correlated by a unique id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
