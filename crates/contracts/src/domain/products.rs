use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of catalogue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electronics")]
    Electronics,
    #[serde(rename = "Clothing")]
    Clothing,
    #[serde(rename = "Home & Kitchen")]
    HomeAndKitchen,
    #[serde(rename = "Sports")]
    Sports,
    #[serde(rename = "Books")]
    Books,
    #[serde(rename = "Toys")]
    Toys,
    #[serde(rename = "Beauty")]
    Beauty,
    #[serde(rename = "Automotive")]
    Automotive,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::HomeAndKitchen => "Home & Kitchen",
            Category::Sports => "Sports",
            Category::Books => "Books",
            Category::Toys => "Toys",
            Category::Beauty => "Beauty",
            Category::Automotive => "Automotive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Electronics" => Some(Category::Electronics),
            "Clothing" => Some(Category::Clothing),
            "Home & Kitchen" => Some(Category::HomeAndKitchen),
            "Sports" => Some(Category::Sports),
            "Books" => Some(Category::Books),
            "Toys" => Some(Category::Toys),
            "Beauty" => Some(Category::Beauty),
            "Automotive" => Some(Category::Automotive),
            _ => None,
        }
    }
}

/// A catalogue product.
///
/// `stock` and `sales` move together: order creation decrements stock and
/// increments sales by the ordered quantity, order deletion (of a
/// non-cancelled order) applies the inverse with sales floored at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category: Category,
    pub brand: Option<String>,
    pub price: f64,
    pub cost_price: f64,
    pub stock: i64,
    pub min_stock_level: i64,
    pub sales: i64,
    pub rating: f64,
    pub review_count: i64,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category: Category,
    pub brand: Option<String>,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub stock: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category: Option<Category>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub cost_price: Option<f64>,
    pub stock: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Filters accepted by GET /api/products.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub category: Option<Category>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub is_active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: i64,
    pub low_stock: i64,
    pub total_revenue: f64,
    pub top_selling: i64,
}
