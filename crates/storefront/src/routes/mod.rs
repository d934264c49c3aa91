//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Storefront page (grid, cart, confirmation)
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (catalog loaded)
//!
//! # Products (HTMX fragments)
//! GET  /products                  - Product grid (polled while loading)
//! POST /products/{id}/quantity    - Step a card's pending quantity
//!
//! # Cart (HTMX fragments)
//! GET  /cart                      - Cart panel
//! POST /cart/add                  - Add pending quantity (triggers cart-updated)
//! POST /cart/increment            - Add one unit
//! POST /cart/decrement            - Remove one unit
//! POST /cart/remove               - Remove an entry
//!
//! # Order
//! POST /order/confirm             - Confirm and show the receipt
//! POST /order/new                 - Dismiss the receipt and empty the cart
//! ```
//!
//! Every handler except `GET /`, `GET /products` and the health checks needs
//! the catalog to be loaded. While loading they answer 503 with a loading
//! placeholder; after a failed load, 503 with the error message.

pub mod cart;
pub mod home;
pub mod order;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::app::{Phase, Shop};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::products))
        .route("/{id}/quantity", post(products::quantity))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/confirm", post(order::confirm))
        .route("/new", post(order::start_new))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/order", order_routes())
}

/// Build the full application router: pages, health checks and static files.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has loaded, and for good
/// if the load failed.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.phase().await.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// The shop, or the error matching the current phase.
fn ready(phase: &Phase) -> Result<&Shop> {
    match phase {
        Phase::Ready(shop) => Ok(shop.as_ref()),
        Phase::Loading => Err(AppError::Loading),
        Phase::Failed => Err(AppError::CatalogUnavailable),
    }
}

/// Mutable access to the shop, or the error matching the current phase.
fn ready_mut(phase: &mut Phase) -> Result<&mut Shop> {
    match phase {
        Phase::Ready(shop) => Ok(shop.as_mut()),
        Phase::Loading => Err(AppError::Loading),
        Phase::Failed => Err(AppError::CatalogUnavailable),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use dessert_cart_core::{Catalog, Price, Product, ProductId};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{StorageBackend, StorefrontConfig};
    use crate::storage::{CartStorage, MemoryStore};

    fn config() -> StorefrontConfig {
        let mut config = StorefrontConfig::from_lookup(|_| None).unwrap();
        config.storage = StorageBackend::Memory;
        config
    }

    fn ready_state() -> AppState {
        let catalog: Catalog = [("Waffle with Berries", 650), ("Classic Tiramisu", 550)]
            .into_iter()
            .enumerate()
            .map(|(i, (title, cents))| Product {
                id: ProductId::from_position(i),
                title: title.to_string(),
                price: Price::new(Decimal::new(cents, 2)).unwrap(),
                category: "Dessert".to_string(),
                image: format!("/static/images/{i}.jpg"),
            })
            .collect();
        let shop = Shop::open(catalog, CartStorage::new(Box::new(MemoryStore::new())));
        AppState::with_phase(config(), Phase::Ready(Box::new(shop)))
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(AppState::new(config()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_follows_phase() {
        let loading = app(AppState::new(config()))
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(loading.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = app(ready_state())
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_while_loading() {
        let response = app(AppState::new(config()))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Loading products..."));
        assert!(html.contains("Your added items will appear here"));
    }

    #[tokio::test]
    async fn test_index_when_failed() {
        let state = AppState::with_phase(config(), Phase::Failed);
        let html = body_text(
            app(state)
                .oneshot(Request::get("/").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Failed to load products. Please try again later."));
        assert!(!html.contains("product-card"));
        assert!(html.contains(r#"<aside id="cart">"#));
        assert!(!html.contains("Your Cart"));
        assert!(!html.contains("Your added items will appear here"));
    }

    #[tokio::test]
    async fn test_products_fragment_clears_cart_when_failed() {
        let state = AppState::with_phase(config(), Phase::Failed);
        let html = body_text(
            app(state)
                .oneshot(Request::get("/products").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains(r#"<aside id="cart" hx-swap-oob="true">"#));
        assert!(!html.contains("Your Cart"));
    }

    #[tokio::test]
    async fn test_cart_routes_unavailable_while_loading() {
        let response = app(AppState::new(config()))
            .oneshot(post("/cart/add", "product_id=1&quantity=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_text(response).await.contains("Loading products..."));
    }

    #[tokio::test]
    async fn test_add_to_cart_renders_panel() {
        let state = ready_state();
        let response = app(state.clone())
            .oneshot(post("/cart/add", "product_id=1&quantity=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Trigger"], "cart-updated");

        let html = body_text(response).await;
        assert!(html.contains("Waffle with Berries"));
        assert!(html.contains("$13.00"));
        assert!(html.contains("hx-swap-oob"));

        let phase = state.phase().await;
        assert_eq!(phase.shop().unwrap().store().total_item_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_product_is_noop() {
        let response = app(ready_state())
            .oneshot(post("/cart/add", "product_id=42&quantity=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("HX-Trigger").is_none());
        assert!(body_text(response).await.contains("Your added items will appear here"));
    }

    #[tokio::test]
    async fn test_quantity_stepper_clamps_at_one() {
        let response = app(ready_state())
            .oneshot(post("/products/2/quantity", "quantity=1&step=-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"value="1""#));
        assert!(html.contains("disabled"));

        let response = app(ready_state())
            .oneshot(post("/products/2/quantity", "quantity=3&step=1"))
            .await
            .unwrap();
        assert!(body_text(response).await.contains(r#"value="4""#));
    }

    #[tokio::test]
    async fn test_quantity_stepper_rejects_bad_input() {
        let unknown = app(ready_state())
            .oneshot(post("/products/9/quantity", "quantity=1&step=1"))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let bad_step = app(ready_state())
            .oneshot(post("/products/1/quantity", "quantity=1&step=5"))
            .await
            .unwrap();
        assert_eq!(bad_step.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_confirm_and_start_new_order() {
        let state = ready_state();
        let router = app(state.clone());

        let empty = router
            .clone()
            .oneshot(post("/order/confirm", ""))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::NO_CONTENT);

        router
            .clone()
            .oneshot(post("/cart/add", "product_id=2&quantity=3"))
            .await
            .unwrap();

        let confirmed = router
            .clone()
            .oneshot(post("/order/confirm", ""))
            .await
            .unwrap();
        assert_eq!(confirmed.status(), StatusCode::OK);
        let html = body_text(confirmed).await;
        assert!(html.contains("Order Confirmed"));
        assert!(html.contains("$16.50"));

        let fresh = router.oneshot(post("/order/new", "")).await.unwrap();
        assert_eq!(fresh.headers()["HX-Trigger"], "cart-updated");
        assert!(body_text(fresh).await.contains("Your added items will appear here"));

        let phase = state.phase().await;
        let shop = phase.shop().unwrap();
        assert!(shop.store().cart().is_empty());
        assert!(!shop.order().is_confirmed());
    }

    #[tokio::test]
    async fn test_products_fragment_refreshes_cart_when_ready() {
        let html = body_text(
            app(ready_state())
                .oneshot(Request::get("/products").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Classic Tiramisu"));
        assert!(html.contains(r#"id="cart""#));

        let loading = body_text(
            app(AppState::new(config()))
                .oneshot(Request::get("/products").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(loading.contains("hx-trigger=\"load delay:500ms\""));
        assert!(!loading.contains(r#"id="cart""#));
    }
}
