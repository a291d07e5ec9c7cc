/// Product endpoints
///
/// # Endpoints
///
/// - `GET   /api/products/` - List product summaries (anyone)
/// - `POST  /api/products/` - Create a product (sellers)
/// - `GET   /api/products/:id/` - Product detail (anyone)
/// - `PATCH /api/products/:id/`, `PUT /api/products/:id/` - Update (owning seller)
///
/// The collection route renders summaries for `GET` and details for `POST`,
/// chosen through [`product_collection_serializers`].

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{JsonObject, UuidPath},
    routes::{absolute_url, PageQuery},
};
use axum::{
    extract::{OriginalUri, Query, State},
    http::{HeaderMap, Method, StatusCode},
    Extension, Json,
};
use bazaar_shared::{
    auth::{
        context::Requester,
        permissions::{is_seller_or_read_only, is_seller_owner_or_read_only, require},
    },
    models::{Account, Product},
    pagination::{Page, PageWindow},
    serializers::product::{product_collection_serializers, ProductRepresentation, ProductSerializer},
};
use serde_json::{Map, Value};
use uuid::Uuid;

/// List products
///
/// # Endpoint
///
/// ```text
/// GET /api/products/?page=1
/// ```
///
/// # Response
///
/// ```json
/// {
///   "count": 1,
///   "next": null,
///   "previous": null,
///   "results": [
///     {"description": "Smartband XYZ 3.0", "price": "100.99", "quantity": 15, "is_active": true, "seller_id": "uuid"}
///   ]
/// }
/// ```
pub async fn list_products(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    query: Option<Query<PageQuery>>,
) -> ApiResult<Json<Page<ProductRepresentation>>> {
    let serializer = product_collection_serializers().select(&method);
    let page = query.and_then(|Query(q)| q.page);

    let total = state.products.count().await?;
    let window = PageWindow::resolve(page.as_deref(), total, state.page_size())?;
    let products = state.products.list(window.offset, window.limit).await?;

    let mut results = Vec::with_capacity(products.len());
    for product in &products {
        let seller = if serializer.embeds_seller() {
            Some(load_seller(&state, product).await?)
        } else {
            None
        };
        results.push(render(serializer, product, seller.as_ref())?);
    }

    Ok(Json(Page::new(results, &window, &absolute_url(&headers, &uri))))
}

/// Create a product owned by the requester
///
/// # Endpoint
///
/// ```text
/// POST /api/products/
/// Authorization: Token bzr_...
///
/// {
///   "description": "Smartband XYZ 3.0",
///   "price": 100.99,
///   "quantity": 15
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{id, description, price, quantity, is_active, seller}`.
///
/// # Errors
///
/// - `401 Unauthorized`: Anonymous requester
/// - `403 Forbidden`: Requester is not a seller
/// - `400 Bad Request`: Missing or invalid fields, negative quantity
pub async fn create_product(
    State(state): State<AppState>,
    method: Method,
    Extension(requester): Extension<Requester>,
    JsonObject(data): JsonObject,
) -> ApiResult<(StatusCode, Json<ProductRepresentation>)> {
    require(is_seller_or_read_only(&requester, &method), &requester)?;

    let seller = requester
        .account()
        .ok_or_else(|| ApiError::InternalError("Seller check passed without an account".to_string()))?;

    let serializer = product_collection_serializers().select(&method);
    let payload = serializer.validate(&data, false)?;

    let new_product = payload
        .into_new_product(seller.id)
        .ok_or_else(|| ApiError::InternalError("Validated product is incomplete".to_string()))?;

    let product = state.products.create(Product::new(new_product)).await?;

    tracing::info!(
        product_id = %product.id,
        seller_id = %seller.id,
        quantity = product.quantity,
        "Created product"
    );

    Ok((StatusCode::CREATED, Json(render(serializer, &product, Some(seller))?)))
}

/// Product detail
///
/// # Errors
///
/// - `404 Not Found`: No such product
pub async fn get_product(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ProductRepresentation>> {
    let product = find_product(&state, id).await?;
    let seller = load_seller(&state, &product).await?;

    Ok(Json(render(ProductSerializer::Detail, &product, Some(&seller))?))
}

/// Full update (`PUT`)
pub async fn update_product(
    State(state): State<AppState>,
    method: Method,
    Extension(requester): Extension<Requester>,
    UuidPath(id): UuidPath,
    JsonObject(data): JsonObject,
) -> ApiResult<Json<ProductRepresentation>> {
    modify_product(&state, &requester, &method, id, &data, false).await
}

/// Partial update (`PATCH`)
pub async fn partial_update_product(
    State(state): State<AppState>,
    method: Method,
    Extension(requester): Extension<Requester>,
    UuidPath(id): UuidPath,
    JsonObject(data): JsonObject,
) -> ApiResult<Json<ProductRepresentation>> {
    modify_product(&state, &requester, &method, id, &data, true).await
}

/// Seller-owner update; the seller itself never changes
///
/// # Errors
///
/// - `404 Not Found`: No such product
/// - `401 Unauthorized` / `403 Forbidden`: Requester is not the owning seller
/// - `400 Bad Request`: Invalid fields
async fn modify_product(
    state: &AppState,
    requester: &Requester,
    method: &Method,
    id: Uuid,
    data: &Map<String, Value>,
    partial: bool,
) -> ApiResult<Json<ProductRepresentation>> {
    let mut product = find_product(state, id).await?;

    require(
        is_seller_owner_or_read_only(requester, method, &product),
        requester,
    )?;

    let payload = ProductSerializer::Detail.validate(data, partial)?;
    product.apply(payload.into_changes());

    let product = state.products.update(&product).await?;
    let seller = load_seller(state, &product).await?;

    tracing::info!(product_id = %product.id, seller_id = %product.seller_id, "Updated product");

    Ok(Json(render(ProductSerializer::Detail, &product, Some(&seller))?))
}

async fn find_product(state: &AppState, id: Uuid) -> ApiResult<Product> {
    state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::not_found)
}

/// Seller of `product`; cascading deletes make a missing seller a broken invariant
async fn load_seller(state: &AppState, product: &Product) -> ApiResult<Account> {
    state
        .accounts
        .find_by_id(product.seller_id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!(
                "Product {} references missing seller {}",
                product.id, product.seller_id
            ))
        })
}

fn render(
    serializer: ProductSerializer,
    product: &Product,
    seller: Option<&Account>,
) -> ApiResult<ProductRepresentation> {
    serializer.render(product, seller).ok_or_else(|| {
        ApiError::InternalError(format!("Product {} rendered without its seller", product.id))
    })
}
