use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::product::{ClothingSize, Product, ProductDetails, ProductError, ProductResult, ProductType};

/// Flat key-value form of a product, as stored in the catalog file.
///
/// Common fields are required for every record. Variant fields are optional at
/// the serde level and checked against the `type` tag in [`Product::from_record`],
/// so a record missing e.g. `brand` reports which field is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "type")]
    pub product_type: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity_in_stock: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_years: Option<f64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_expiry_date"
    )]
    pub expiry_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ClothingSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

impl Product {
    pub fn to_record(&self) -> ProductRecord {
        let mut record = ProductRecord {
            product_type: self.product_type().as_str().to_string(),
            product_id: self.product_id().to_string(),
            name: self.name().to_string(),
            price: self.price(),
            quantity_in_stock: self.quantity_in_stock(),
            brand: None,
            warranty_years: None,
            expiry_date: None,
            size: None,
            material: None,
        };

        match self.details() {
            ProductDetails::Electronics {
                brand,
                warranty_years,
            } => {
                record.brand = Some(brand.clone());
                record.warranty_years = Some(*warranty_years);
            }
            ProductDetails::Grocery { expiry_date } => {
                record.expiry_date = Some(*expiry_date);
            }
            ProductDetails::Clothing { size, material } => {
                record.size = Some(*size);
                record.material = Some(material.clone());
            }
        }

        record
    }

    /// The `type` tag selects the variant and must match exactly; anything
    /// else is `UnsupportedType`. Fields belonging to other variants are ignored.
    pub fn from_record(record: ProductRecord) -> ProductResult<Self> {
        let product_type = ProductType::from_tag(&record.product_type)?;

        let details = match product_type {
            ProductType::Electronics => ProductDetails::Electronics {
                brand: required(record.brand, "brand")?,
                warranty_years: required(record.warranty_years, "warranty_years")?,
            },
            ProductType::Grocery => ProductDetails::Grocery {
                expiry_date: required(record.expiry_date, "expiry_date")?,
            },
            ProductType::Clothing => ProductDetails::Clothing {
                size: required(record.size, "size")?,
                material: required(record.material, "material")?,
            },
        };

        Product::new(
            record.product_id,
            record.name,
            record.price,
            record.quantity_in_stock,
            details,
        )
    }
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        product.to_record()
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ProductError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Product::from_record(record)
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> ProductResult<T> {
    value.ok_or(ProductError::MissingField { field })
}

/// Accepts `YYYY-MM-DD`, or an ISO-8601 date-time whose date part is kept.
pub fn parse_expiry_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let raw = raw.trim();
    raw.parse::<NaiveDate>()
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|instant| instant.date()))
}

fn deserialize_expiry_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| {
        parse_expiry_date(&value).map_err(|err| {
            <D::Error as serde::de::Error>::custom(format!("invalid expiry_date `{value}`: {err}"))
        })
    })
    .transpose()
}
