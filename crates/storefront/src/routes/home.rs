//! Storefront page and product grid handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::app::Phase;
use crate::routes::order::ConfirmationView;
use crate::state::AppState;
use crate::views::{CartPanelView, ProductGridView};

/// Full storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub grid: ProductGridView,
    pub cart: CartPanelView,
    pub confirmation: ConfirmationView,
}

/// Product grid fragment template (for HTMX).
///
/// Once the catalog resolves the cart region is swapped out-of-band: with the
/// restored cart when ready, emptied when the load failed.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub grid: ProductGridView,
    pub cart: CartPanelView,
    pub refresh_cart: bool,
}

/// Display the storefront page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> IndexTemplate {
    let phase = state.phase().await;
    let (cart, confirmation) = phase.shop().map_or_else(
        || (CartPanelView::empty(), ConfirmationView::hidden()),
        |shop| {
            (
                shop.panel().clone(),
                ConfirmationView::from_receipt(shop.order().receipt()),
            )
        },
    );

    IndexTemplate {
        grid: phase.grid(),
        cart,
        confirmation,
    }
}

/// Product grid fragment for the current phase.
#[instrument(skip(state))]
pub async fn products(State(state): State<AppState>) -> ProductsTemplate {
    let phase = state.phase().await;
    let cart = phase
        .shop()
        .map_or_else(CartPanelView::empty, |shop| shop.panel().clone());

    ProductsTemplate {
        grid: phase.grid(),
        cart,
        refresh_cart: !matches!(*phase, Phase::Loading),
    }
}
