//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use savanna_core::{Category, ProductId};

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::checkout;
use crate::state::AppState;

/// Product display data: the catalog row plus its discounted price.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub discounted_price: Decimal,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let discounted_price = product.discounted_price();
        Self {
            product,
            discounted_price,
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Restrict to one category (`men`, `women`, `unisex`).
    pub category: Option<String>,
    /// Search query; matched against name, description, and subcategory.
    pub q: Option<String>,
    /// Restrict to featured products (the homepage rail).
    #[serde(default)]
    pub featured: bool,
    /// Cap on the number of returned products.
    pub limit: Option<u32>,
}

/// Order link query parameters.
#[derive(Debug, Deserialize)]
pub struct OrderLinkQuery {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A prebuilt WhatsApp deep link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,
}

/// List in-stock products, optionally filtered by category and search query.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all")
        .map(|c| {
            c.parse::<Category>()
                .map_err(|e| AppError::BadRequest(e.to_string()))
        })
        .transpose()?;

    let mut products = match (&params.q, category) {
        (Some(q), _) if !q.trim().is_empty() => {
            let mut hits = state.catalog().search(q).await?;
            if let Some(category) = category {
                hits.retain(|p| p.category == category);
            }
            hits
        }
        _ if params.featured => {
            let mut hits = state.catalog().featured(params.limit).await?;
            if let Some(category) = category {
                hits.retain(|p| p.category == category);
            }
            hits
        }
        (_, Some(category)) => state.catalog().by_category(category, params.limit).await?,
        (_, None) => state.catalog().in_stock().await?,
    };

    if let Some(limit) = params.limit {
        products.truncate(limit as usize);
    }

    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(ProductView::from(product)))
}

/// WhatsApp order link for a single product.
#[instrument(skip(state))]
pub async fn order_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<OrderLinkQuery>,
) -> Result<Json<LinkResponse>> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let url = checkout::product_order_link(
        &state.config().whatsapp_phone,
        &product,
        params.size.as_deref().unwrap_or(""),
        params.color.as_deref().unwrap_or(""),
    );
    Ok(Json(LinkResponse { url }))
}
