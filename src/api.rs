use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, FromRef, Path, Query, State},
    http::{HeaderValue, Method},
    response::{IntoResponse, Response, Result as HttpResult},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    context::{RequestContext, TrustProxy},
    error::ApiError,
    fields::FieldSelector,
    paginated::build_paginated_response,
    pagination::{PageRequest, PaginationParams},
    rate_limit,
    store::{StoreError, StoreKind, Trait as StoreTrait},
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Product catalog
    pub store: Arc<StoreKind>,
    /// Build navigation links from forwarded headers
    pub trust_proxy: TrustProxy,
}

impl FromRef<AppState> for TrustProxy {
    fn from_ref(state: &AppState) -> Self {
        state.trust_proxy
    }
}

/// Return type of every handler
pub type HttpResponse = HttpResult<Response, ApiError>;

/// Run a store query on the blocking pool
async fn query<T, F>(state: &AppState, what: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&StoreKind) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(anyhow::Error::from)?
        .map_err(|e| ApiError::store(what, e))
}

/// Handler to return a paginated list of products
pub async fn products_index(
    query_pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
    ctx: RequestContext,
    State(state): State<AppState>,
) -> HttpResponse {
    let Query(pairs) = query_pairs?;
    let req = PageRequest::try_from(&PaginationParams::from_pairs(pairs))?;
    tracing::debug!(limit = req.limit, page = req.page, fields = ?req.fields, "listing products");

    let (limit, offset, fields) = (req.limit, req.offset(), req.fields);
    let (total, products) = query(&state, "products", move |store| {
        store.count_and_page(limit, offset, &fields)
    })
    .await?;

    Ok(build_paginated_response(products, total, req.limit, req.page, &ctx).into_response())
}

/// Handler to retrieve a product by id
pub async fn product_get(
    Path(id): Path<String>,
    query_pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
    State(state): State<AppState>,
) -> HttpResponse {
    let Query(pairs) = query_pairs?;
    let params = PaginationParams::from_pairs(pairs);
    let fields = FieldSelector::parse(params.fields.as_deref());

    let product = query(&state, "the product", move |store| store.find_by_id(&id, &fields))
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    Ok(Json(product).into_response())
}

/// Product routes, to be nested under `/api`
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products_index))
        .route("/products/:id", get(product_get))
}

/// Cross origin policy, any origin when none is configured
#[must_use]
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| {
            o.parse::<HeaderValue>()
                .inspect_err(|e| tracing::warn!(origin = %o, error = %e, "ignoring CORS origin"))
                .ok()
        })
        .collect();
    let allow_origin =
        if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };

    CorsLayer::new().allow_origin(allow_origin).allow_methods([Method::GET, Method::HEAD])
}

/// Compose the application router with its middleware stack
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new().nest("/api", product_routes());

    if config.rate_limit_max > 0 {
        router = rate_limit::layer(router, config.rate_limit_max, config.rate_limit_window);
    }

    router.layer(cors_layer(config)).layer(TraceLayer::new_for_http()).with_state(state)
}
