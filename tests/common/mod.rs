use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use catalogapi::{
    api::{self, AppState},
    context::TrustProxy,
    store::{MemoryStore, StoreKind},
    Product, ServerConfig,
};

/// Host every test request is addressed to
pub const HOST: &str = "catalog.test";

/// Peer address attached to requests that do not set one
pub const PEER: ([u8; 4], u16) = ([127, 0, 0, 1], 40000);

/// `n` products with ids `p001..`, even numbers in `shoes`, odd ones in `hats`
pub fn products(n: u32) -> Vec<Product> {
    (1..=n)
        .map(|i| Product {
            id: format!("p{i:03}"),
            name: format!("Product {i}"),
            description: format!("Description {i}"),
            price: f64::from(i) * 2.5,
            category: if i % 2 == 0 { "shoes".into() } else { "hats".into() },
            stock: i,
            created_at: "2024-01-01T00:00:00Z".into(),
        })
        .collect()
}

/// Build the application router over `store` with `config`.
pub fn build_app_with(store: StoreKind, config: &ServerConfig) -> Router {
    let state = AppState { store: Arc::new(store), trust_proxy: TrustProxy(config.trust_proxy) };
    api::app(state, config)
}

/// Build the application router over an in-memory catalog of `n` products.
pub fn build_app(n: u32) -> Router {
    build_app_with(MemoryStore::new(products(n)).into(), &ServerConfig::default())
}

/// Send a GET request for `uri` addressed to [`HOST`].
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).header("host", HOST).body(Body::empty()).unwrap()).await
}

/// Send `request` through `app`, as if it came from [`PEER`] unless it names a peer.
pub async fn send(app: Router, mut request: Request<Body>) -> Response<Body> {
    if request.extensions().get::<ConnectInfo<SocketAddr>>().is_none() {
        let _ = request.extensions_mut().insert(ConnectInfo(SocketAddr::from(PEER)));
    }
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Query pairs of an absolute url.
pub fn query_of(url: &str) -> Vec<(String, String)> {
    url::Url::parse(url).unwrap().query_pairs().into_owned().collect()
}
