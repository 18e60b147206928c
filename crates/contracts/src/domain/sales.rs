use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::orders::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleChannel {
    #[serde(rename = "Website")]
    Website,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "Marketplace")]
    Marketplace,
    #[serde(rename = "Social Media")]
    SocialMedia,
    #[serde(rename = "Direct")]
    Direct,
    #[serde(rename = "Email")]
    Email,
}

impl SaleChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleChannel::Website => "Website",
            SaleChannel::MobileApp => "Mobile App",
            SaleChannel::Marketplace => "Marketplace",
            SaleChannel::SocialMedia => "Social Media",
            SaleChannel::Direct => "Direct",
            SaleChannel::Email => "Email",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Website" => Some(SaleChannel::Website),
            "Mobile App" => Some(SaleChannel::MobileApp),
            "Marketplace" => Some(SaleChannel::Marketplace),
            "Social Media" => Some(SaleChannel::SocialMedia),
            "Direct" => Some(SaleChannel::Direct),
            "Email" => Some(SaleChannel::Email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    Completed,
    Refunded,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Completed => "Completed",
            SaleStatus::Refunded => "Refunded",
            SaleStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Completed" => Some(SaleStatus::Completed),
            "Refunded" => Some(SaleStatus::Refunded),
            "Cancelled" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }
}

/// An immutable analytics projection fanned out from one order line item at
/// order creation. Customer, product and category names are denormalized so
/// rollups never need joins back to the source collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub sale_id: String,
    pub order: String,
    pub customer: String,
    pub customer_name: String,
    pub product: String,
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub sale_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub channel: SaleChannel,
    pub status: SaleStatus,
}

/// Filters accepted by GET /api/sales.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub channel: Option<SaleChannel>,
    pub status: Option<SaleStatus>,
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesGroupTotal {
    pub name: String,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_sales: i64,
    pub total_revenue: f64,
    pub sales_by_category: Vec<SalesGroupTotal>,
    pub sales_by_channel: Vec<SalesGroupTotal>,
    pub recent_sales: i64,
}
