//! Product card handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
};
use dessert_cart_core::{PendingQuantity, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::ready;
use crate::state::AppState;
use crate::views::{ProductCardView, QuantityControlView};

/// Quantity stepper form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    /// The pending quantity currently shown on the card.
    pub quantity: Option<u32>,
    /// `1` to increase, `-1` to decrease, `0` to re-render.
    #[serde(default)]
    pub step: i32,
}

/// Quantity control fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/quantity_control.html")]
pub struct QuantityControlTemplate {
    pub card: ProductCardView,
}

/// Step a card's pending quantity (HTMX).
///
/// The pending quantity lives in the page; the server only applies the step
/// and the lower bound of 1. The cart is not touched.
#[instrument(skip(state))]
pub async fn quantity(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Form(form): Form<QuantityForm>,
) -> Result<QuantityControlTemplate> {
    if !(-1..=1).contains(&form.step) {
        return Err(AppError::BadRequest(format!(
            "step must be -1, 0 or 1, got {}",
            form.step
        )));
    }

    let phase = state.phase().await;
    let shop = ready(&phase)?;
    let product = shop
        .catalog()
        .get(product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let pending = form
        .quantity
        .map_or(PendingQuantity::INITIAL, PendingQuantity::new)
        .stepped(form.step);
    let mut card = ProductCardView::project(product);
    card.quantity = QuantityControlView::new(product, pending);

    Ok(QuantityControlTemplate { card })
}
