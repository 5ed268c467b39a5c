use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product categories in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProductType {
    Electronics,
    Grocery,
    Clothing,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [
        ProductType::Electronics,
        ProductType::Grocery,
        ProductType::Clothing,
    ];

    /// Discriminator tag used in records and by type search
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Electronics => "Electronics",
            ProductType::Grocery => "Grocery",
            ProductType::Clothing => "Clothing",
        }
    }

    /// Exact match against the record tags, as written by `to_record`
    pub fn from_tag(tag: &str) -> ProductResult<Self> {
        Self::ALL
            .into_iter()
            .find(|product_type| product_type.as_str() == tag)
            .ok_or_else(|| ProductError::UnsupportedType(tag.to_string()))
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = ProductError;

    /// Case-insensitive match against the discriminator tags.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|product_type| product_type.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ProductError::UnsupportedType(tag.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ClothingSize {
    S,
    M,
    L,
    XL,
}

impl ClothingSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingSize::S => "S",
            ClothingSize::M => "M",
            ClothingSize::L => "L",
            ClothingSize::XL => "XL",
        }
    }
}

impl fmt::Display for ClothingSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClothingSize {
    type Err = ProductError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(ClothingSize::S),
            "M" => Ok(ClothingSize::M),
            "L" => Ok(ClothingSize::L),
            "XL" => Ok(ClothingSize::XL),
            _ => Err(ProductError::InvalidArgument(format!(
                "Size must be one of S, M, L, XL (got {raw})"
            ))),
        }
    }
}

/// Category-specific attributes
#[derive(Debug, Clone, PartialEq)]
pub enum ProductDetails {
    Electronics { brand: String, warranty_years: f64 },
    Grocery { expiry_date: NaiveDate },
    Clothing { size: ClothingSize, material: String },
}

impl ProductDetails {
    pub fn product_type(&self) -> ProductType {
        match self {
            ProductDetails::Electronics { .. } => ProductType::Electronics,
            ProductDetails::Grocery { .. } => ProductType::Grocery,
            ProductDetails::Clothing { .. } => ProductType::Clothing,
        }
    }
}

/// Product-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProductError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Only {available} units available (requested {requested})")]
    InsufficientStock { requested: i64, available: u32 },

    #[error("Unsupported product type: {0}")]
    UnsupportedType(String),

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },
}

pub type ProductResult<T> = Result<T, ProductError>;

/// A sellable item. Identity and category are fixed at construction; stock
/// and price change only through the checked mutators below.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    product_id: String,
    name: String,
    price: f64,
    quantity_in_stock: u32,
    details: ProductDetails,
}

impl Product {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        details: ProductDetails,
    ) -> ProductResult<Self> {
        let product_id = product_id.into();
        if product_id.trim().is_empty() {
            return Err(ProductError::InvalidArgument(
                "Product ID cannot be empty".to_string(),
            ));
        }
        validate_price(price)?;
        if let ProductDetails::Electronics { warranty_years, .. } = &details {
            if !warranty_years.is_finite() || *warranty_years < 0.0 {
                return Err(ProductError::InvalidArgument(
                    "Warranty must be non-negative".to_string(),
                ));
            }
        }

        Ok(Self {
            product_id,
            name: name.into(),
            price,
            quantity_in_stock,
            details,
        })
    }

    pub fn electronics(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        brand: impl Into<String>,
        warranty_years: f64,
    ) -> ProductResult<Self> {
        let details = ProductDetails::Electronics {
            brand: brand.into(),
            warranty_years,
        };
        Self::new(product_id, name, price, quantity_in_stock, details)
    }

    pub fn grocery(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        expiry_date: NaiveDate,
    ) -> ProductResult<Self> {
        let details = ProductDetails::Grocery { expiry_date };
        Self::new(product_id, name, price, quantity_in_stock, details)
    }

    pub fn clothing(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        size: ClothingSize,
        material: impl Into<String>,
    ) -> ProductResult<Self> {
        let details = ProductDetails::Clothing {
            size,
            material: material.into(),
        };
        Self::new(product_id, name, price, quantity_in_stock, details)
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity_in_stock(&self) -> u32 {
        self.quantity_in_stock
    }

    pub fn details(&self) -> &ProductDetails {
        &self.details
    }

    pub fn product_type(&self) -> ProductType {
        self.details.product_type()
    }

    pub fn brand(&self) -> Option<&str> {
        match &self.details {
            ProductDetails::Electronics { brand, .. } => Some(brand),
            _ => None,
        }
    }

    pub fn warranty_years(&self) -> Option<f64> {
        match &self.details {
            ProductDetails::Electronics { warranty_years, .. } => Some(*warranty_years),
            _ => None,
        }
    }

    pub fn expiry_date(&self) -> Option<NaiveDate> {
        match &self.details {
            ProductDetails::Grocery { expiry_date } => Some(*expiry_date),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<ClothingSize> {
        match &self.details {
            ProductDetails::Clothing { size, .. } => Some(*size),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<&str> {
        match &self.details {
            ProductDetails::Clothing { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Remove `quantity` units from stock, returning what remains
    pub fn sell(&mut self, quantity: i64) -> ProductResult<u32> {
        if quantity <= 0 {
            return Err(ProductError::InvalidArgument(
                "Quantity must be positive".to_string(),
            ));
        }
        if quantity > i64::from(self.quantity_in_stock) {
            return Err(ProductError::InsufficientStock {
                requested: quantity,
                available: self.quantity_in_stock,
            });
        }

        // Bounded by the stock check above.
        self.quantity_in_stock -= quantity as u32;
        Ok(self.quantity_in_stock)
    }

    /// Add `quantity` units to stock, returning the new total
    pub fn restock(&mut self, quantity: i64) -> ProductResult<u32> {
        if quantity <= 0 {
            return Err(ProductError::InvalidArgument(
                "Amount must be positive".to_string(),
            ));
        }

        let total = u32::try_from(quantity)
            .ok()
            .and_then(|amount| self.quantity_in_stock.checked_add(amount))
            .ok_or_else(|| {
                ProductError::InvalidArgument(format!(
                    "Restocking {quantity} units would exceed the stock limit"
                ))
            })?;

        self.quantity_in_stock = total;
        Ok(total)
    }

    pub fn set_price(&mut self, new_price: f64) -> ProductResult<()> {
        validate_price(new_price)?;
        self.price = new_price;
        Ok(())
    }

    /// Stock value at the current price
    pub fn total_value(&self) -> f64 {
        self.price * f64::from(self.quantity_in_stock)
    }

    /// A grocery expires from midnight at the start of its expiry date, so any
    /// reference strictly after `expiry_date 00:00:00` counts as expired.
    /// Non-perishable categories never expire.
    pub fn is_expired(&self, reference: NaiveDateTime) -> bool {
        match &self.details {
            ProductDetails::Grocery { expiry_date } => expiry_date
                .and_hms_opt(0, 0, 0)
                .is_some_and(|start_of_day| reference > start_of_day),
            _ => false,
        }
    }

    /// One-line human readable summary
    pub fn display_string(&self) -> String {
        let common = format!(
            "Product ID: {}, Name: {}, Price: ${:.2}, Available stock: {}",
            self.product_id, self.name, self.price, self.quantity_in_stock
        );

        match &self.details {
            ProductDetails::Electronics {
                brand,
                warranty_years,
            } => format!("{common}, Brand: {brand}, Warranty years: {warranty_years:.1}"),
            ProductDetails::Grocery { expiry_date } => {
                format!("{common}, Expiry date: {}", expiry_date.format("%d-%m-%Y"))
            }
            ProductDetails::Clothing { size, material } => {
                format!("{common}, Size: {size}, Material: {material}")
            }
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

fn validate_price(price: f64) -> ProductResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ProductError::InvalidArgument(
            "Price must be positive".to_string(),
        ));
    }
    Ok(())
}
