//! Integration tests for the product listing and lookup endpoints.

mod common;

use axum::http::StatusCode;
use catalogapi::{store::FileStore, ServerConfig};
use common::{body_json, build_app, build_app_with, get, query_of, HOST};

fn param(url: &str, key: &str) -> Option<String> {
    query_of(url).into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_defaults_to_first_ten() {
    let response = get(build_app(25), "/api/products").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 10);
    assert_eq!(json["data"][0]["id"], "p001");

    let p = &json["pagination"];
    assert_eq!(p["totalItems"], 25);
    assert_eq!(p["currentPage"], 1);
    assert_eq!(p["totalPages"], 3);
    assert_eq!(p["itemsPerPage"], 10);
    assert_eq!(p["hasPreviousPage"], false);
    assert_eq!(p["hasNextPage"], true);
    assert!(p["firstPageUrl"].is_null());
    assert!(p["previousPageUrl"].is_null());
    assert_eq!(p["nextPageUrl"], format!("http://{HOST}/api/products?limit=10&page=2"));
    assert_eq!(p["lastPageUrl"], format!("http://{HOST}/api/products?limit=10&page=3"));
}

#[tokio::test]
async fn last_page_has_no_forward_links() {
    let json = body_json(get(build_app(25), "/api/products?limit=10&page=3").await).await;

    assert_eq!(json["data"].as_array().unwrap().len(), 5);
    let p = &json["pagination"];
    assert_eq!(p["hasNextPage"], false);
    assert!(p["nextPageUrl"].is_null());
    assert!(p["lastPageUrl"].is_null());
    assert_eq!(param(p["previousPageUrl"].as_str().unwrap(), "page").as_deref(), Some("2"));
    assert_eq!(param(p["firstPageUrl"].as_str().unwrap(), "page").as_deref(), Some("1"));
}

#[tokio::test]
async fn empty_catalog() {
    let json = body_json(get(build_app(0), "/api/products").await).await;

    assert_eq!(json["data"], serde_json::json!([]));
    let p = &json["pagination"];
    assert_eq!(p["totalPages"], 0);
    assert_eq!(p["hasNextPage"], false);
    assert_eq!(p["hasPreviousPage"], false);
    for link in ["firstPageUrl", "previousPageUrl", "nextPageUrl", "lastPageUrl"] {
        assert!(p[link].is_null(), "{link} should be null");
    }
}

#[tokio::test]
async fn page_past_the_end_returns_empty_data() {
    let json = body_json(get(build_app(25), "/api/products?page=9").await).await;

    assert_eq!(json["data"], serde_json::json!([]));
    assert_eq!(json["pagination"]["currentPage"], 9);
    assert_eq!(json["pagination"]["totalPages"], 3);
    assert_eq!(json["pagination"]["hasPreviousPage"], true);
    assert!(json["pagination"]["lastPageUrl"].is_null());
}

#[tokio::test]
async fn links_preserve_filters() {
    let uri = "/api/products?category=shoes&limit=5&page=2&q=red%20boots";
    let json = body_json(get(build_app(25), uri).await).await;
    let p = &json["pagination"];

    for (link, page) in
        [("firstPageUrl", "1"), ("previousPageUrl", "1"), ("nextPageUrl", "3"), ("lastPageUrl", "5")]
    {
        let url = p[link].as_str().unwrap();
        assert!(url.starts_with(&format!("http://{HOST}/api/products?")), "{url}");
        assert_eq!(query_of(url).len(), 4, "{url}");
        assert_eq!(param(url, "category").as_deref(), Some("shoes"));
        assert_eq!(param(url, "q").as_deref(), Some("red boots"));
        assert_eq!(param(url, "limit").as_deref(), Some("5"));
        assert_eq!(param(url, "page").as_deref(), Some(page));
    }
}

#[tokio::test]
async fn field_selection_on_listing() {
    let json = body_json(get(build_app(3), "/api/products?fields=id,%20name").await).await;

    for item in json["data"].as_array().unwrap() {
        let keys: Vec<_> = item.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "name"]);
    }
}

#[tokio::test]
async fn invalid_pagination_is_rejected() {
    for uri in ["/api/products?limit=abc", "/api/products?page=0", "/api/products?limit=-5"] {
        let response = get(build_app(5), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn repeated_keys_use_last_value() {
    let uri = "/api/products?page=2&limit=4&page=3&fields=name&fields=id";
    let response = get(build_app(25), uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let p = &json["pagination"];
    assert_eq!(p["currentPage"], 3);
    assert_eq!(p["itemsPerPage"], 4);
    assert_eq!(json["data"][0]["id"], "p009");
    let keys: Vec<_> = json["data"][0].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["id"]);

    let next = p["nextPageUrl"].as_str().unwrap();
    assert_eq!(query_of(next).len(), 3, "{next}");
    assert_eq!(param(next, "page").as_deref(), Some("4"));
    assert_eq!(param(next, "fields").as_deref(), Some("id"));
}

#[tokio::test]
async fn repeated_invalid_values_are_rejected() {
    for uri in ["/api/products?limit=abc&limit=abc", "/api/products?page=2&page=0"] {
        let response = get(build_app(5), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn repeated_fields_on_single_product() {
    let json = body_json(get(build_app(3), "/api/products/p001?fields=name&fields=price").await).await;
    let keys: Vec<_> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["price"]);
}

#[tokio::test]
async fn unknown_field_is_rejected() {
    let response = get(build_app(5), "/api/products?fields=id,colour").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "unknown field `colour`");
}

#[tokio::test]
async fn storage_failure_is_a_generic_500() {
    let store = FileStore::new("/nonexistent/catalogapi/products.json").into();
    let response = get(build_app_with(store, &ServerConfig::default()), "/api/products").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "An error occurred while fetching products.");
}

// ---------------------------------------------------------------------------
// Single product
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_product_by_id() {
    let response = get(build_app(3), "/api/products/p002").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], "p002");
    assert_eq!(json["category"], "shoes");
    assert_eq!(json["price"], 5.0);
    assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn get_product_with_fields() {
    let json = body_json(get(build_app(3), "/api/products/p001?fields=price,name").await).await;
    let keys: Vec<_> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["price", "name"]);
}

#[tokio::test]
async fn missing_product_is_404() {
    let response = get(build_app(3), "/api/products/p999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Product not found.");
}
