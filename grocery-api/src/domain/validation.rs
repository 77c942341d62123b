//! Request payload schemas.
//!
//! Each `parse_*` function takes an untrusted JSON value, coerces the
//! loosely typed fields (numeric strings, blank SKUs) and then applies the
//! `validator` rules declared on the typed result. Failures are returned as
//! [`FieldErrors`], never as panics.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

/// 字段级错误，作为 `VALIDATION_ERROR` 的 details 返回
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            form_errors: vec![message.into()],
            ..Default::default()
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add_field(field, message);
        errors
    }

    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.field_errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    fn extend_from(&mut self, errors: &ValidationErrors) {
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                self.add_field(&field.to_string(), message);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProduct {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, max = 1000000.0, message = "Price must be positive and at most 1000000"))]
    pub price: f64,
    #[validate(length(min = 2, max = 32, message = "SKU must be between 2 and 32 characters"))]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 1000000.0, message = "Price must be positive and at most 1000000"))]
    pub price: Option<f64>,
    #[validate(length(min = 2, max = 32, message = "SKU must be between 2 and 32 characters"))]
    pub sku: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.sku.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewCartItem {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub product_id: String,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be an integer between 1 and 10000"))]
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CartItemUpdate {
    #[validate(range(min = 1, max = 10000, message = "Quantity must be an integer between 1 and 10000"))]
    pub quantity: i64,
}

/// Scan payload; `quantity` defaults to 1 when absent.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct Detection {
    #[validate(length(min = 1, message = "Label is required"))]
    pub label: String,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be an integer between 1 and 10000"))]
    pub quantity: Option<i64>,
}

impl Detection {
    pub fn quantity_or_default(&self) -> i64 {
        self.quantity.unwrap_or(1)
    }
}

pub fn parse_product_create(payload: &Value) -> Result<NewProduct, FieldErrors> {
    let mut fields = Fields::of(payload)?;
    let name = fields.string("name");
    let price = fields.price("price");
    let sku = fields.sku("sku");
    let name = fields.require("name", name);
    let price = fields.require("price", price);
    fields.finish()?;

    match (name, price) {
        (Some(name), Some(price)) => checked(NewProduct { name, price, sku }),
        _ => Err(FieldErrors::form("Invalid product")),
    }
}

pub fn parse_product_update(payload: &Value) -> Result<ProductPatch, FieldErrors> {
    let mut fields = Fields::of(payload)?;
    let patch = ProductPatch {
        name: fields.string("name"),
        price: fields.price("price"),
        sku: fields.sku("sku"),
    };
    fields.finish()?;

    if patch.is_empty() {
        return Err(FieldErrors::form("No field to update"));
    }
    checked(patch)
}

pub fn parse_cart_item_add(payload: &Value) -> Result<NewCartItem, FieldErrors> {
    let mut fields = Fields::of(payload)?;
    let product_id = fields.string("productId");
    let quantity = fields.integer("quantity");
    let product_id = fields.require("productId", product_id);
    let quantity = fields.require("quantity", quantity);
    fields.finish()?;

    let result = match (product_id, quantity) {
        (Some(product_id), Some(quantity)) => checked(NewCartItem { product_id, quantity }),
        _ => Err(FieldErrors::form("Invalid cart item")),
    };
    result.map_err(|errors| rename_field(errors, "product_id", "productId"))
}

pub fn parse_cart_item_update(payload: &Value) -> Result<CartItemUpdate, FieldErrors> {
    let mut fields = Fields::of(payload)?;
    let quantity = fields.integer("quantity");
    let quantity = fields.require("quantity", quantity);
    fields.finish()?;

    match quantity {
        Some(quantity) => checked(CartItemUpdate { quantity }),
        None => Err(FieldErrors::form("Invalid cart item")),
    }
}

pub fn parse_detection(payload: &Value) -> Result<Detection, FieldErrors> {
    let mut fields = Fields::of(payload)?;
    let label = fields.string("label").map(|label| label.trim().to_string());
    let quantity = fields.integer("quantity");
    let label = fields.require("label", label);
    fields.finish()?;

    match label {
        Some(label) => checked(Detection { label, quantity }),
        None => Err(FieldErrors::form("Invalid payload")),
    }
}

fn checked<T: Validate>(value: T) -> Result<T, FieldErrors> {
    match value.validate() {
        Ok(()) => Ok(value),
        Err(errors) => {
            let mut out = FieldErrors::default();
            out.extend_from(&errors);
            Err(out)
        }
    }
}

// validator 使用结构体字段名，对外暴露 JSON 字段名
fn rename_field(mut errors: FieldErrors, from: &str, to: &str) -> FieldErrors {
    if let Some(messages) = errors.field_errors.remove(from) {
        errors.field_errors.entry(to.to_string()).or_default().extend(messages);
    }
    errors
}

/// Reads fields out of a JSON object, collecting coercion failures.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> Fields<'a> {
    fn of(payload: &'a Value) -> Result<Self, FieldErrors> {
        match payload {
            Value::Object(map) => Ok(Self {
                map,
                errors: FieldErrors::default(),
            }),
            _ => Err(FieldErrors::form("Expected a JSON object")),
        }
    }

    /// `null` 与缺失等价
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    fn string(&mut self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors.add_field(key, "Expected a string");
                None
            }
        }
    }

    /// Blank strings count as "no SKU".
    fn sku(&mut self, key: &str) -> Option<String> {
        self.string(key).filter(|sku| !sku.trim().is_empty())
    }

    fn price(&mut self, key: &str) -> Option<f64> {
        let parsed = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed.filter(|price| price.is_finite()) {
            Some(price) => Some(price),
            None => {
                self.errors.add_field(key, "Expected a number");
                None
            }
        }
    }

    fn integer(&mut self, key: &str) -> Option<i64> {
        let parsed = match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add_field(key, "Expected an integer");
        }
        parsed
    }

    fn require<T>(&mut self, key: &str, value: Option<T>) -> Option<T> {
        if value.is_none() && !self.errors.has_field(key) {
            self.errors.add_field(key, "Required");
        }
        value
    }

    fn finish(&mut self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MAX_LINE_QUANTITY;
    use serde_json::json;

    #[test]
    fn product_with_negative_price_is_rejected() {
        let errors = parse_product_create(&json!({ "name": "Test", "price": -1, "sku": "SKU1" })).unwrap_err();
        assert_eq!(errors.field_errors["price"], vec!["Price must be positive and at most 1000000"]);
    }

    #[test]
    fn valid_product_is_normalized() {
        let product = parse_product_create(&json!({ "name": "Valid", "price": 2.5, "sku": "SKU2" })).unwrap();
        assert_eq!(
            product,
            NewProduct {
                name: "Valid".into(),
                price: 2.5,
                sku: Some("SKU2".into()),
            }
        );
    }

    #[test]
    fn price_string_is_coerced() {
        let product = parse_product_create(&json!({ "name": "Milk", "price": "2.50" })).unwrap();
        assert_eq!(product.price, 2.5);
        assert_eq!(product.sku, None);
    }

    #[test]
    fn non_numeric_price_string_fails() {
        let errors = parse_product_create(&json!({ "name": "Milk", "price": "cheap" })).unwrap_err();
        assert_eq!(errors.field_errors["price"], vec!["Expected a number"]);

        assert!(parse_product_create(&json!({ "name": "Milk", "price": "NaN" })).is_err());
    }

    #[test]
    fn blank_sku_is_absent() {
        let product = parse_product_create(&json!({ "name": "Eggs", "price": 3.49, "sku": "   " })).unwrap();
        assert_eq!(product.sku, None);
    }

    #[test]
    fn sku_length_is_bounded() {
        assert!(parse_product_create(&json!({ "name": "Eggs", "price": 1, "sku": "X" })).is_err());
        let long = "S".repeat(33);
        assert!(parse_product_create(&json!({ "name": "Eggs", "price": 1, "sku": long })).is_err());
        let max = "S".repeat(32);
        assert!(parse_product_create(&json!({ "name": "Eggs", "price": 1, "sku": max })).is_ok());
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let errors = parse_product_create(&json!({})).unwrap_err();
        assert_eq!(errors.field_errors["name"], vec!["Required"]);
        assert_eq!(errors.field_errors["price"], vec!["Required"]);
    }

    #[test]
    fn short_name_is_rejected() {
        let errors = parse_product_create(&json!({ "name": "A", "price": 1 })).unwrap_err();
        assert!(errors.has_field("name"));
    }

    #[test]
    fn non_object_payload_is_a_form_error() {
        let errors = parse_product_create(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.form_errors, vec!["Expected a JSON object"]);
    }

    #[test]
    fn empty_update_is_rejected() {
        let errors = parse_product_update(&json!({})).unwrap_err();
        assert_eq!(errors.form_errors, vec!["No field to update"]);
    }

    #[test]
    fn update_with_only_unknown_fields_is_rejected() {
        assert!(parse_product_update(&json!({ "colour": "red" })).is_err());
    }

    #[test]
    fn update_with_price_only_succeeds() {
        let patch = parse_product_update(&json!({ "price": 5 })).unwrap();
        assert_eq!(
            patch,
            ProductPatch {
                price: Some(5.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn update_still_validates_present_fields() {
        assert!(parse_product_update(&json!({ "price": 0 })).is_err());
        assert!(parse_product_update(&json!({ "name": "X" })).is_err());
    }

    #[test]
    fn cart_item_quantity_is_coerced() {
        let item = parse_cart_item_add(&json!({ "productId": "p1", "quantity": "3" })).unwrap();
        assert_eq!(item.quantity, 3);

        let item = parse_cart_item_add(&json!({ "productId": "p1", "quantity": 2.0 })).unwrap();
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn cart_item_rejects_bad_quantities() {
        for quantity in [json!(0), json!(-2), json!(1.5), json!("two"), json!(true)] {
            let result = parse_cart_item_add(&json!({ "productId": "p1", "quantity": quantity.clone() }));
            assert!(result.is_err(), "quantity {quantity} should fail");
        }
    }

    #[test]
    fn cart_item_requires_product_id() {
        let errors = parse_cart_item_add(&json!({ "productId": "", "quantity": 1 })).unwrap_err();
        assert_eq!(errors.field_errors["productId"], vec!["Product id is required"]);
    }

    #[test]
    fn cart_item_update_requires_quantity() {
        assert!(parse_cart_item_update(&json!({})).is_err());
        assert_eq!(parse_cart_item_update(&json!({ "quantity": 9 })).unwrap().quantity, 9);
    }

    #[test]
    fn detection_defaults_quantity_and_trims_label() {
        let detection = parse_detection(&json!({ "label": "  Milk (1 L) " })).unwrap();
        assert_eq!(detection.label, "Milk (1 L)");
        assert_eq!(detection.quantity_or_default(), 1);
    }

    #[test]
    fn detection_rejects_blank_label() {
        let errors = parse_detection(&json!({ "label": "   " })).unwrap_err();
        assert!(errors.has_field("label"));
        assert!(parse_detection(&json!({ "label": "Milk", "quantity": 0 })).is_err());
    }

    #[test]
    fn price_has_an_upper_bound() {
        let max = parse_product_create(&json!({ "name": "Caviar", "price": 1_000_000 })).unwrap();
        assert_eq!(max.price, 1_000_000.0);

        let errors = parse_product_create(&json!({ "name": "Caviar", "price": 1e308 })).unwrap_err();
        assert_eq!(errors.field_errors["price"], vec!["Price must be positive and at most 1000000"]);
        assert!(parse_product_update(&json!({ "price": 2_000_000.5 })).is_err());
    }

    #[test]
    fn quantity_has_an_upper_bound() {
        let item = parse_cart_item_add(&json!({ "productId": "p1", "quantity": MAX_LINE_QUANTITY })).unwrap();
        assert_eq!(item.quantity, MAX_LINE_QUANTITY);

        let errors =
            parse_cart_item_add(&json!({ "productId": "p1", "quantity": "9223372036854775807" })).unwrap_err();
        assert_eq!(errors.field_errors["quantity"], vec!["Quantity must be an integer between 1 and 10000"]);
        assert!(parse_cart_item_update(&json!({ "quantity": MAX_LINE_QUANTITY + 1 })).is_err());
        assert!(parse_detection(&json!({ "label": "Milk", "quantity": MAX_LINE_QUANTITY + 1 })).is_err());
    }
}
