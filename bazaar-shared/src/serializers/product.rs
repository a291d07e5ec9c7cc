/// Product representations and payload validation
///
/// Products have two representations:
///
/// - **Summary** (collection listing): `description, price, quantity, is_active, seller_id`
/// - **Detail** (creation and single-product routes): `id, description, price,
///   quantity, is_active, seller` with the seller account embedded
///
/// The collection endpoint picks one per HTTP method through
/// [`product_collection_serializers`].

use axum::http::Method;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use super::account::AccountResponse;
use super::errors::FieldErrors;
use super::fields::FieldReader;
use super::SerializerMap;
use crate::models::{Account, NewProduct, Product, ProductChanges};

pub const NEGATIVE_QUANTITY: &str = "the quantity of the product cannot be negative";

/// `NUMERIC(10, 2)`
const PRICE_MAX_DIGITS: u32 = 10;
const PRICE_DECIMAL_PLACES: u32 = 2;

/// Product serializer variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSerializer {
    Summary,
    Detail,
}

/// `GET → Summary`, `POST → Detail`, anything else `Detail`
pub fn product_collection_serializers() -> SerializerMap<ProductSerializer> {
    SerializerMap::new(ProductSerializer::Detail)
        .route(Method::GET, ProductSerializer::Summary)
        .route(Method::POST, ProductSerializer::Detail)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub is_active: bool,
    pub seller_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    pub id: Uuid,
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub is_active: bool,
    pub seller: AccountResponse,
}

/// Rendered product, shape chosen by the serializer variant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProductRepresentation {
    Summary(ProductSummary),
    Detail(ProductDetail),
}

/// Decoded product fields; `None` means absent from the request
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductPayload {
    pub description: Option<String>,

    /// Rescaled to two decimal places
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "the quantity of the product cannot be negative"))]
    pub quantity: Option<i32>,

    pub is_active: Option<bool>,
}

impl ProductPayload {
    /// Builds a new product for `seller_id`
    ///
    /// Returns `None` unless description, price and quantity are all present,
    /// which a non-partial validation guarantees.
    pub fn into_new_product(self, seller_id: Uuid) -> Option<NewProduct> {
        Some(NewProduct {
            description: self.description?,
            price: self.price?,
            quantity: self.quantity?,
            is_active: self.is_active.unwrap_or(true),
            seller_id,
        })
    }

    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            is_active: self.is_active,
        }
    }
}

impl ProductSerializer {
    /// Whether rendering needs the seller account
    pub fn embeds_seller(self) -> bool {
        matches!(self, ProductSerializer::Detail)
    }

    /// Decodes a product payload
    ///
    /// `seller`, `seller_id` and `id` in the body are ignored. Without
    /// `partial`, description, price and quantity are required.
    pub fn validate(
        self,
        data: &Map<String, Value>,
        partial: bool,
    ) -> Result<ProductPayload, FieldErrors> {
        let mut reader = FieldReader::new(data, partial);

        let description = reader.string("description", true);

        let price = reader.decimal("price", true).and_then(|price| {
            match check_precision(price) {
                Ok(()) => Some(quantize(price)),
                Err(message) => {
                    reader.reject("price", message);
                    None
                }
            }
        });

        let quantity = reader.integer("quantity", true).and_then(|quantity| {
            if quantity > i32::MAX as i64 {
                reader.reject("quantity", format!("Ensure this value is less than or equal to {}.", i32::MAX));
                None
            } else if quantity < i32::MIN as i64 {
                reader.reject("quantity", NEGATIVE_QUANTITY);
                None
            } else {
                Some(quantity as i32)
            }
        });

        let payload = ProductPayload {
            description,
            price,
            quantity,
            is_active: reader.boolean("is_active", false),
        };

        reader.finish(payload)
    }

    /// Renders `product`
    ///
    /// Returns `None` for [`ProductSerializer::Detail`] when `seller` is not
    /// supplied.
    pub fn render(self, product: &Product, seller: Option<&Account>) -> Option<ProductRepresentation> {
        match self {
            ProductSerializer::Summary => Some(ProductRepresentation::Summary(ProductSummary {
                description: product.description.clone(),
                price: product.price,
                quantity: product.quantity,
                is_active: product.is_active,
                seller_id: product.seller_id,
            })),
            ProductSerializer::Detail => {
                let seller = seller.filter(|s| s.id == product.seller_id)?;
                Some(ProductRepresentation::Detail(ProductDetail {
                    id: product.id,
                    description: product.description.clone(),
                    price: product.price,
                    quantity: product.quantity,
                    is_active: product.is_active,
                    seller: AccountResponse::from(seller),
                }))
            }
        }
    }
}

/// Digit limits of `NUMERIC(10, 2)`, checked on the value as sent
fn check_precision(price: Decimal) -> Result<(), String> {
    let scale = price.scale();
    let digits = digit_count(price.mantissa().unsigned_abs());

    let (total, decimal_places) = if digits > scale {
        (digits, scale)
    } else {
        (scale, scale)
    };
    let whole = total - decimal_places;

    if total > PRICE_MAX_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            PRICE_MAX_DIGITS
        ));
    }
    if decimal_places > PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            PRICE_DECIMAL_PLACES
        ));
    }
    if whole > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
        ));
    }
    Ok(())
}

fn digit_count(mut value: u128) -> u32 {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

fn quantize(price: Decimal) -> Decimal {
    let mut price = price;
    price.rescale(PRICE_DECIMAL_PLACES);
    price
}
