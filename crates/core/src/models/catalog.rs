//! Catalog records: categories and products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::{Collection, Record};
use crate::error::{ValidationError, require_text};
use crate::types::{CategoryId, Price, ProductId};

/// A product category, e.g. "Hearing aids" or "Batteries".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl Record for Category {
    type Id = CategoryId;
    const COLLECTION: Collection = Collection::Categories;

    fn id(&self) -> &CategoryId {
        &self.id
    }

    fn set_id(&mut self, id: CategoryId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")
    }
}

/// Admin form for creating or editing a category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl CategoryInput {
    /// Validate and build a category with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if the name is blank.
    pub fn into_category(self, id: CategoryId) -> Result<Category, ValidationError> {
        let category = Category {
            id,
            name: self.name.trim().to_string(),
            icon: self.icon.trim().to_string(),
        };
        category.validate()?;
        Ok(category)
    }
}

/// A sellable catalog item.
///
/// `category_id` is `None` for uncategorized products, which is also where
/// products land when their category is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specs: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl Product {
    /// Whether this product is filed under `category`.
    #[must_use]
    pub fn is_in(&self, category: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category)
    }
}

impl Record for Product {
    type Id = ProductId;
    const COLLECTION: Collection = Collection::Products;

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn set_id(&mut self, id: ProductId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")
    }
}

/// Admin form for creating or editing a product.
///
/// Price arrives as a raw decimal so a negative value is reported as a
/// field error rather than a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specs: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl ProductInput {
    /// Validate and build a product with the given id.
    ///
    /// A blank `category_id` is read as uncategorized. Whether a non-blank
    /// category exists is checked by the store, not here.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for a blank name or
    /// [`ValidationError::NegativePrice`] for a negative price, or
    /// [`ValidationError::PriceTooHigh`] above the price cap.
    pub fn into_product(self, id: ProductId) -> Result<Product, ValidationError> {
        require_text(&self.name, "name")?;
        let price = Price::new(self.price)?;
        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            price,
            description: self.description,
            specs: self.specs,
            category_id: self.category_id.filter(|c| !c.as_str().trim().is_empty()),
        })
    }
}

/// Category filter for product listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductFilter {
    /// Every product.
    #[default]
    All,
    /// Products with no category.
    Uncategorized,
    /// Products filed under exactly this category.
    Category(CategoryId),
}

impl ProductFilter {
    /// Reserved query value for the unfiltered list.
    pub const ALL: &'static str = "all";
    /// Reserved query value for products without a category.
    pub const UNCATEGORIZED: &'static str = "uncategorized";

    /// Parse a `?category=` query value. Absent or blank means all.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | Self::ALL) => Self::All,
            Some(Self::UNCATEGORIZED) => Self::Uncategorized,
            Some(id) => Self::Category(CategoryId::new(id)),
        }
    }

    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Uncategorized => product.category_id.is_none(),
            Self::Category(id) => product.is_in(id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(name: &str, price: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            image_url: String::new(),
            price: Decimal::new(price, 0),
            description: String::new(),
            specs: String::new(),
            category_id: Some(CategoryId::new("1")),
        }
    }

    #[test]
    fn test_product_input_validation() {
        assert_eq!(
            input("", 100).into_product(ProductId::new("p1")),
            Err(ValidationError::EmptyField { field: "name" })
        );
        assert_eq!(
            input("Signia X", -1).into_product(ProductId::new("p1")),
            Err(ValidationError::NegativePrice)
        );
        let product = input("Signia X", 25_000)
            .into_product(ProductId::new("p1"))
            .unwrap();
        assert_eq!(product.price, Price::from_whole(25_000));
    }

    #[test]
    fn test_blank_category_is_uncategorized() {
        let mut form = input("Battery", 500);
        form.category_id = Some(CategoryId::new(" "));
        let product = form.into_product(ProductId::new("b1")).unwrap();
        assert_eq!(product.category_id, None);
    }

    #[test]
    fn test_category_input_trims() {
        let category = CategoryInput {
            name: "  Hearing Aids ".to_string(),
            icon: String::new(),
        }
        .into_category(CategoryId::new("1"))
        .unwrap();
        assert_eq!(category.name, "Hearing Aids");
        assert!(CategoryInput::default().into_category(CategoryId::new("2")).is_err());
    }

    #[test]
    fn test_filter_exact_match() {
        let product = input("Signia X", 1).into_product(ProductId::new("p1")).unwrap();
        assert!(ProductFilter::from_query(None).matches(&product));
        assert!(ProductFilter::from_query(Some("all")).matches(&product));
        assert!(ProductFilter::from_query(Some("1")).matches(&product));
        assert!(!ProductFilter::from_query(Some("10")).matches(&product));
        assert!(!ProductFilter::from_query(Some("uncategorized")).matches(&product));
    }

    #[test]
    fn test_legacy_product_json() {
        let json = r#"{"id":"1700000000000","name":"Phonak","imageUrl":"","price":32000,"description":"","specs":""}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Price::from_whole(32_000));
        assert_eq!(product.category_id, None);
    }
}
