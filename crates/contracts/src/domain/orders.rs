use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order lifecycle. Pending → Processing → Shipped → Delivered, with
/// cancellation possible from the two early states. Cancelled and
/// Delivered are terminal; Refunded exists only as a payment status and is
/// not a reachable order status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OrderStatus::Pending),
            "Processing" => Some(OrderStatus::Processing),
            "Shipped" => Some(OrderStatus::Shipped),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            "Refunded" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }

    /// Whether `self → next` is a legal lifecycle step.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Cryptocurrency")]
    Cryptocurrency,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Cryptocurrency => "Cryptocurrency",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Credit Card" => Some(PaymentMethod::CreditCard),
            "PayPal" => Some(PaymentMethod::PayPal),
            "Bank Transfer" => Some(PaymentMethod::BankTransfer),
            "Cash on Delivery" => Some(PaymentMethod::CashOnDelivery),
            "Debit Card" => Some(PaymentMethod::DebitCard),
            "Cryptocurrency" => Some(PaymentMethod::Cryptocurrency),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Refunded => "Refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(PaymentStatus::Pending),
            "Paid" => Some(PaymentStatus::Paid),
            "Failed" => Some(PaymentStatus::Failed),
            "Refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// One product + quantity entry within an order. `price` is the per-unit
/// price snapshotted at order time, not the product's current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

/// An order. `total` is computed once at creation as
/// Σ(item price × quantity) + tax + shipping − discount and never
/// recomputed, since line items are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_id: String,
    pub customer: String,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub shipping_cost: f64,
    pub tax: f64,
    pub discount: f64,
    pub date: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItem>,
    pub payment_method: Option<PaymentMethod>,
    pub shipping_cost: Option<f64>,
    pub tax: Option<f64>,
    pub discount: Option<f64>,
    pub notes: Option<String>,
}

/// Partial merge for PUT /api/orders/:id. Line items and total are not
/// updatable; a status change must be a legal lifecycle step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
}

/// Filters accepted by GET /api/orders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<OrderStatus>,
    pub customer: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub total_revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));

        assert!(!Processing.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Pending.can_transition_to(Delivered));
    }

    #[test]
    fn cancellation_is_only_possible_early() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_and_refunded_have_no_exits_or_entries() {
        for next in [Pending, Processing, Shipped, Delivered, Refunded] {
            assert!(!Cancelled.can_transition_to(next));
            assert!(!Delivered.can_transition_to(next));
            assert!(!Refunded.can_transition_to(next));
        }
        for from in [Pending, Processing, Shipped, Delivered, Cancelled] {
            assert!(!from.can_transition_to(Refunded));
        }
    }
}
