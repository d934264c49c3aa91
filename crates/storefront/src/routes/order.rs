//! Order confirmation handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use tracing::instrument;

use crate::app::UserIntent;
use crate::error::Result;
use crate::order::Receipt;
use crate::routes::cart::panel_response;
use crate::routes::ready_mut;
use crate::state::AppState;
use crate::views::{CartItemView, CartPanelView};

/// Confirmation overlay display data for templates.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationView {
    pub visible: bool,
    pub reference: String,
    pub confirmed_at: String,
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub total: String,
}

impl ConfirmationView {
    /// Nothing to show.
    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Show a receipt, or nothing.
    #[must_use]
    pub fn from_receipt(receipt: Option<&Receipt>) -> Self {
        receipt.map_or_else(Self::hidden, |receipt| Self {
            visible: true,
            reference: receipt.reference(),
            confirmed_at: receipt.confirmed_at_display(),
            items: receipt.items.clone(),
            item_count: receipt.item_count,
            total: receipt.total.clone(),
        })
    }
}

/// Confirmation overlay fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/confirmation.html")]
pub struct ConfirmationTemplate {
    pub confirmation: ConfirmationView,
}

/// Fresh cart panel plus an out-of-band removal of the confirmation overlay.
#[derive(Template, WebTemplate)]
#[template(path = "order_new.html")]
pub struct NewOrderTemplate {
    pub cart: CartPanelView,
}

/// Confirm the order and show the receipt (HTMX).
///
/// Answers 204 No Content when there is nothing to confirm: the cart is
/// empty or an order is already confirmed.
#[instrument(skip(state))]
pub async fn confirm(State(state): State<AppState>) -> Result<Response> {
    let mut phase = state.phase().await;
    let shop = ready_mut(&mut phase)?;

    let outcome = shop.dispatch(UserIntent::ConfirmOrder);
    if !outcome.order_changed {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let html = ConfirmationTemplate {
        confirmation: ConfirmationView::from_receipt(shop.order().receipt()),
    }
    .render()?;
    Ok((AppendHeaders([("HX-Trigger", "order-confirmed")]), Html(html)).into_response())
}

/// Dismiss the receipt and start over with an empty cart (HTMX).
#[instrument(skip(state))]
pub async fn start_new(State(state): State<AppState>) -> Result<Response> {
    let mut phase = state.phase().await;
    let shop = ready_mut(&mut phase)?;

    let outcome = shop.dispatch(UserIntent::StartNewOrder);
    if !outcome.order_changed {
        return Ok(panel_response(shop, outcome));
    }

    let body = NewOrderTemplate {
        cart: shop.panel().clone(),
    };
    Ok((AppendHeaders([("HX-Trigger", "cart-updated")]), body).into_response())
}
