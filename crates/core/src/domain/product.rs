use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_name, validate_record_id, Resource};
use crate::errors::DomainError;

/// Prices are kept with cent precision.
pub const PRICE_SCALE: u32 = 2;

/// Largest price representable as DECIMAL(10,2): 99999999.99.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        validate_record_id(raw, Resource::Product)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "idProduto")]
    pub id: ProductId,
    #[serde(rename = "nomeProduto")]
    pub name: String,
    #[serde(rename = "precoProduto", with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Rounds half away from zero to cents and rejects negative or out-of-range prices.
pub fn normalize_price(price: Decimal) -> Result<Decimal, DomainError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::InvalidPrice);
    }
    let rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded > MAX_PRICE {
        return Err(DomainError::InvalidPrice);
    }
    Ok(rounded)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
}

impl NewProduct {
    pub fn new(name: Option<String>, price: Option<Decimal>) -> Result<Self, DomainError> {
        let (Some(name), Some(price)) = (name, price) else {
            return Err(DomainError::MissingRequiredFields);
        };
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredFields);
        }

        Ok(Self { name, price: normalize_price(price)? })
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product { id, name: self.name, price: self.price }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl ProductPatch {
    pub fn new(name: Option<String>, price: Option<Decimal>) -> Result<Self, DomainError> {
        if let Some(name) = &name {
            validate_name(name, Resource::Product)?;
        }
        let price = price.map(normalize_price).transpose()?;
        Ok(Self { name, price })
    }

    pub fn apply_to(self, current: Product) -> Product {
        Product {
            id: current.id,
            name: self.name.unwrap_or(current.name),
            price: self.price.unwrap_or(current.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{normalize_price, NewProduct, Product, ProductId, ProductPatch, MAX_PRICE};
    use crate::domain::Resource;
    use crate::errors::DomainError;

    fn caneta() -> Product {
        Product {
            id: ProductId("9a7e3c52-0c1d-4f0b-8a51-6b2d9e4f7c10".to_string()),
            name: "Caneta".to_string(),
            price: Decimal::new(350, 2),
        }
    }

    #[test]
    fn prices_are_rounded_to_cents() {
        assert_eq!(normalize_price(Decimal::new(19_999, 3)), Ok(Decimal::new(2000, 2)));
        assert_eq!(normalize_price(Decimal::ZERO), Ok(Decimal::ZERO));
    }

    #[test]
    fn half_cent_prices_round_away_from_zero() {
        assert_eq!(normalize_price(Decimal::new(125, 3)), Ok(Decimal::new(13, 2)));
        assert_eq!(normalize_price(Decimal::new(135, 3)), Ok(Decimal::new(14, 2)));
        assert_eq!(normalize_price(Decimal::new(2_005, 3)), Ok(Decimal::new(201, 2)));
    }

    #[test]
    fn negative_and_oversized_prices_are_rejected() {
        assert_eq!(normalize_price(Decimal::new(-1, 2)), Err(DomainError::InvalidPrice));
        assert_eq!(normalize_price(MAX_PRICE + Decimal::ONE), Err(DomainError::InvalidPrice));
        assert_eq!(normalize_price(MAX_PRICE), Ok(MAX_PRICE));
    }

    #[test]
    fn new_product_requires_name_and_price() {
        assert_eq!(
            NewProduct::new(Some("Caneta".to_string()), None),
            Err(DomainError::MissingRequiredFields)
        );
        assert_eq!(
            NewProduct::new(Some(" ".to_string()), Some(Decimal::ONE)),
            Err(DomainError::MissingRequiredFields)
        );

        let product = NewProduct::new(Some("Caneta".to_string()), Some(Decimal::new(350, 2)))
            .expect("valid product")
            .into_product(ProductId::generate());
        assert_eq!(product.name, "Caneta");
        assert_eq!(product.price, Decimal::new(350, 2));
    }

    #[test]
    fn price_only_patch_keeps_name() {
        let patch = ProductPatch::new(None, Some(Decimal::new(199, 1))).expect("valid patch");
        let updated = patch.apply_to(caneta());

        assert_eq!(updated.name, "Caneta");
        assert_eq!(updated.price, Decimal::new(199, 1));
    }

    #[test]
    fn patch_rejects_blank_name() {
        assert_eq!(
            ProductPatch::new(Some(String::new()), None),
            Err(DomainError::BlankName(Resource::Product))
        );
    }

    #[test]
    fn product_price_serializes_as_json_number() {
        let json = serde_json::to_value(caneta()).expect("serialize product");

        assert_eq!(json["nomeProduto"], "Caneta");
        assert_eq!(json["precoProduto"], serde_json::json!(3.5));
        assert_eq!(json["idProduto"], "9a7e3c52-0c1d-4f0b-8a51-6b2d9e4f7c10");
    }
}
