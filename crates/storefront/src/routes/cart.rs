//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every handler answers with the re-rendered cart panel. When the cart
//! actually changed, the response also carries an `HX-Trigger: cart-updated`
//! header so other parts of the page can react.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use dessert_cart_core::{PendingQuantity, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::app::{Outcome, Shop, UserIntent};
use crate::error::Result;
use crate::routes::{ready, ready_mut};
use crate::state::AppState;
use crate::views::{CartPanelView, ProductCardView};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Form data naming a single cart entry.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: ProductId,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartPanelView,
}

/// Cart panel plus an out-of-band reset of the card's quantity control.
#[derive(Template, WebTemplate)]
#[template(path = "cart_add.html")]
pub struct CartAddTemplate {
    pub cart: CartPanelView,
    pub card: ProductCardView,
}

/// Render the cart panel, flagging the change for HTMX listeners.
pub(crate) fn panel_response(shop: &Shop, outcome: Outcome) -> Response {
    let body = CartPanelTemplate {
        cart: shop.panel().clone(),
    };
    if outcome.cart_changed {
        (AppendHeaders([("HX-Trigger", "cart-updated")]), body).into_response()
    } else {
        body.into_response()
    }
}

/// Display the cart panel.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Response> {
    let phase = state.phase().await;
    let shop = ready(&phase)?;
    Ok(panel_response(shop, Outcome::default()))
}

/// Add the card's pending quantity to the cart (HTMX).
///
/// On success the card's pending quantity goes back to 1.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let mut phase = state.phase().await;
    let shop = ready_mut(&mut phase)?;

    let quantity = form.quantity.unwrap_or(PendingQuantity::INITIAL.get());
    let outcome = shop.dispatch(UserIntent::AddToCart {
        product_id: form.product_id,
        quantity,
    });

    let product = shop.catalog().get(form.product_id);
    match product {
        Some(product) if outcome.cart_changed => {
            let body = CartAddTemplate {
                cart: shop.panel().clone(),
                card: ProductCardView::project(product),
            };
            Ok((AppendHeaders([("HX-Trigger", "cart-updated")]), body).into_response())
        }
        _ => Ok(panel_response(shop, outcome)),
    }
}

/// Add one unit of an entry (HTMX).
#[instrument(skip(state))]
pub async fn increment(
    State(state): State<AppState>,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    dispatch(&state, UserIntent::Increment(form.product_id)).await
}

/// Remove one unit of an entry, dropping it at zero (HTMX).
#[instrument(skip(state))]
pub async fn decrement(
    State(state): State<AppState>,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    dispatch(&state, UserIntent::Decrement(form.product_id)).await
}

/// Remove an entry entirely (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    dispatch(&state, UserIntent::Remove(form.product_id)).await
}

async fn dispatch(state: &AppState, intent: UserIntent) -> Result<Response> {
    let mut phase = state.phase().await;
    let shop = ready_mut(&mut phase)?;
    let outcome = shop.dispatch(intent);
    Ok(panel_response(shop, outcome))
}
