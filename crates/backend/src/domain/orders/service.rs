use contracts::domain::orders::{
    CreateOrderRequest, Order, OrderListParams, OrderStats, OrderStatus, PaymentMethod,
    PaymentStatus, UpdateOrderRequest,
};
use contracts::domain::sales::{SaleChannel, SaleStatus};
use uuid::Uuid;

use super::repository::{self, Model, NewItem};
use crate::domain::{products, sales, users};
use crate::shared::data::dates;
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::query::AccessScope;

pub async fn list(params: &OrderListParams, scope: &AccessScope) -> ApiResult<(Vec<Order>, u64)> {
    Ok(repository::list(params, scope).await?)
}

pub async fn get(id: &str, scope: &AccessScope) -> ApiResult<Order> {
    repository::get_by_id(id, scope)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))
}

struct ValidatedItem {
    product: products::repository::Model,
    quantity: i64,
}

/// Create an order for the calling customer.
///
/// Stock is taken with an atomic conditional decrement per item; if item k
/// cannot be taken, items 1..k-1 are given back before the conflict is
/// reported, so a failed order never leaves stock durably decremented.
pub async fn create(req: CreateOrderRequest, customer_id: &str) -> ApiResult<Order> {
    if req.items.is_empty() {
        return Err(ApiError::validation("Order must contain at least one item"));
    }

    let customer = users::repository::get_by_id(customer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    // Validate everything before touching any stock.
    let mut validated = Vec::with_capacity(req.items.len());
    for item in &req.items {
        if item.quantity <= 0 {
            return Err(ApiError::validation("Item quantity must be positive"));
        }
        let product = products::repository::get_model_by_id(&item.product)
            .await?
            .ok_or_else(|| {
                ApiError::validation(format!("Product {} does not exist", item.product))
            })?;
        if product.stock < item.quantity {
            return Err(ApiError::conflict(format!(
                "Insufficient stock for {}: requested {}, available {}",
                product.name, item.quantity, product.stock
            )));
        }
        validated.push(ValidatedItem {
            product,
            quantity: item.quantity,
        });
    }

    // Take stock item by item, compensating on the first failure. The
    // pre-check above can go stale under concurrent orders; the conditional
    // decrement is what actually guarantees stock never goes negative.
    let mut taken: Vec<(String, i64)> = Vec::new();
    for item in &validated {
        let ok = products::repository::try_take_stock(&item.product.id, item.quantity).await?;
        if !ok {
            for (product_id, quantity) in &taken {
                if let Err(e) = products::repository::give_back_stock(product_id, *quantity).await {
                    tracing::error!(
                        "Failed to give back {} units of product {}: {e:#}",
                        quantity,
                        product_id
                    );
                }
            }
            return Err(ApiError::conflict(format!(
                "Insufficient stock for {}",
                item.product.name
            )));
        }
        taken.push((item.product.id.clone(), item.quantity));
    }

    let subtotal: f64 = validated
        .iter()
        .map(|i| i.product.price * i.quantity as f64)
        .sum();
    let shipping_cost = req.shipping_cost.unwrap_or(0.0);
    let tax = req.tax.unwrap_or(0.0);
    let discount = req.discount.unwrap_or(0.0);
    let total = subtotal + tax + shipping_cost - discount;

    let order_number = repository::count_all().await? + 1;
    let id = Uuid::new_v4().to_string();
    let now = dates::now();
    let model = Model {
        id: id.clone(),
        order_id: format!("ORD{order_number:06}"),
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        status: OrderStatus::Pending.as_str().to_string(),
        payment_method: req
            .payment_method
            .unwrap_or(PaymentMethod::CreditCard)
            .as_str()
            .to_string(),
        payment_status: PaymentStatus::Pending.as_str().to_string(),
        total,
        shipping_cost,
        tax,
        discount,
        date: now.clone(),
        processed_at: None,
        shipped_at: None,
        delivered_at: None,
        cancelled_at: None,
        cancellation_reason: None,
        notes: req.notes,
        created_at: now.clone(),
        updated_at: now,
    };
    let line_items: Vec<NewItem> = validated
        .iter()
        .map(|i| NewItem {
            product_id: i.product.id.clone(),
            product_name: Some(i.product.name.clone()),
            quantity: i.quantity,
            price: i.product.price,
        })
        .collect();

    if let Err(e) = repository::insert(model.clone(), line_items).await {
        for (product_id, quantity) in &taken {
            let _ = products::repository::give_back_stock(product_id, *quantity).await;
        }
        return Err(e.into());
    }

    let order = repository::get_by_id(&id, &AccessScope::All)
        .await?
        .ok_or_else(|| {
            ApiError::Infrastructure(anyhow::anyhow!("Order {id} was not found after insert"))
        })?;

    // Analytics fan-out and customer aggregates are best effort; the order
    // itself is already durable.
    if let Err(e) = record_sales(&model, &validated).await {
        tracing::warn!("Failed to record sales for order {}: {e:#}", model.order_id);
    }
    if let Err(e) = users::repository::apply_order_totals(&customer.id, 1, total).await {
        tracing::warn!(
            "Failed to update aggregates for customer {}: {e:#}",
            customer.id
        );
    }

    Ok(order)
}

async fn record_sales(order: &Model, items: &[ValidatedItem]) -> anyhow::Result<()> {
    let mut sale_number = sales::repository::count_all().await? + 1;
    for item in items {
        let sale = sales::repository::Model {
            id: Uuid::new_v4().to_string(),
            sale_id: format!("SALE{sale_number:06}"),
            order_id: order.id.clone(),
            customer_id: order.customer_id.clone(),
            customer_name: order.customer_name.clone(),
            product_id: item.product.id.clone(),
            product_name: item.product.name.clone(),
            category: item.product.category.clone(),
            quantity: item.quantity,
            unit_price: item.product.price,
            total_amount: item.product.price * item.quantity as f64,
            sale_date: order.date.clone(),
            payment_method: order.payment_method.clone(),
            channel: SaleChannel::Website.as_str().to_string(),
            status: SaleStatus::Completed.as_str().to_string(),
        };
        sales::repository::insert(sale).await?;
        sale_number += 1;
    }
    Ok(())
}

/// Partial update. A status change must be a legal lifecycle step; Refunded
/// has no supported entry transition and is rejected like any other illegal
/// step. Cancelling through here does not restore stock, only deletion of a
/// non-cancelled order does.
pub async fn update(id: &str, req: UpdateOrderRequest) -> ApiResult<Order> {
    let mut model = repository::get_model_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    if let Some(next) = req.status {
        let current = OrderStatus::parse(&model.status).unwrap_or(OrderStatus::Pending);
        if next != current {
            if !current.can_transition_to(next) {
                return Err(ApiError::conflict(format!(
                    "Cannot change order status from {} to {}",
                    current.as_str(),
                    next.as_str()
                )));
            }
            let now = dates::now();
            match next {
                OrderStatus::Processing => model.processed_at = Some(now),
                OrderStatus::Shipped => model.shipped_at = Some(now),
                OrderStatus::Delivered => model.delivered_at = Some(now),
                OrderStatus::Cancelled => {
                    model.cancelled_at = Some(now);
                    model.cancellation_reason = req.cancellation_reason.clone();
                }
                OrderStatus::Pending | OrderStatus::Refunded => {}
            }
            model.status = next.as_str().to_string();
        }
    }
    if let Some(payment_status) = req.payment_status {
        model.payment_status = payment_status.as_str().to_string();
    }
    if let Some(notes) = req.notes {
        model.notes = Some(notes);
    }
    model.updated_at = dates::now();
    repository::update(model).await?;

    get(id, &AccessScope::All).await
}

/// Delete an order. If it was not already cancelled, line-item stock is
/// restored, product sales counters are decremented (floored at zero), and
/// the customer's aggregates are rolled back.
pub async fn delete(id: &str) -> ApiResult<()> {
    let model = repository::get_model_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    let items = repository::get_items(id).await?;

    if !repository::delete(id).await? {
        return Err(ApiError::not_found("Order not found"));
    }

    if model.status != OrderStatus::Cancelled.as_str() {
        for item in &items {
            if let Err(e) =
                products::repository::give_back_stock(&item.product_id, item.quantity).await
            {
                tracing::error!(
                    "Failed to restore stock for product {}: {e:#}",
                    item.product_id
                );
            }
        }
        if let Err(e) =
            users::repository::apply_order_totals(&model.customer_id, -1, -model.total).await
        {
            tracing::warn!(
                "Failed to roll back aggregates for customer {}: {e:#}",
                model.customer_id
            );
        }
    }

    Ok(())
}

pub async fn stats(scope: &AccessScope) -> ApiResult<OrderStats> {
    Ok(repository::stats(scope).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::orders::CreateOrderItem;
    use contracts::domain::products::{Category, CreateProductRequest};
    use contracts::domain::users::{CreateUserRequest, RegistrationSource, Role, UserStatus};

    use crate::dashboards::analytics;
    use crate::shared::data::db::initialize_database;

    fn customer_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.into(),
            email: email.into(),
            password: "secret123".into(),
            phone: None,
            role: Some(Role::Customer),
            status: Some(UserStatus::Active),
            registration_source: None,
            notes: None,
        }
    }

    fn order_request(product_id: &str, quantity: i64) -> CreateOrderRequest {
        CreateOrderRequest {
            items: vec![CreateOrderItem {
                product: product_id.into(),
                quantity,
            }],
            payment_method: None,
            shipping_cost: None,
            tax: None,
            discount: None,
            notes: None,
        }
    }

    // The database connection is process-global, so everything touching a
    // live database runs in this one test against a throwaway file.
    #[tokio::test]
    async fn order_lifecycle_moves_stock_and_feeds_rollups() {
        let db_path = std::env::temp_dir().join(format!("dashboard-test-{}.db", Uuid::new_v4()));
        initialize_database(Some(db_path.to_str().unwrap()))
            .await
            .unwrap();

        let customer = users::service::create(
            customer_request("Ada Buyer", "ada@example.com"),
            RegistrationSource::AdminPanel,
        )
        .await
        .unwrap();
        let bystander = users::service::create(
            customer_request("Bo Browser", "bo@example.com"),
            RegistrationSource::AdminPanel,
        )
        .await
        .unwrap();

        let product = products::service::create(CreateProductRequest {
            name: "Desk Lamp".into(),
            sku: None,
            barcode: None,
            category: Category::Electronics,
            brand: None,
            price: 25.0,
            cost_price: None,
            stock: Some(10),
            min_stock_level: None,
            rating: None,
            description: None,
            is_active: None,
            is_featured: None,
        })
        .await
        .unwrap();

        // Asking for more than is on hand is a conflict and leaves the
        // counters untouched.
        let err = create(order_request(&product.id, 11), &customer.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        let p = products::service::get(&product.id).await.unwrap();
        assert_eq!(p.stock, 10);
        assert_eq!(p.sales, 0);

        // A successful order takes stock and credits the sales counter.
        let first = create(order_request(&product.id, 3), &customer.id)
            .await
            .unwrap();
        assert_eq!(first.total, 75.0);
        let p = products::service::get(&product.id).await.unwrap();
        assert_eq!(p.stock, 7);
        assert_eq!(p.sales, 3);

        let second = create(order_request(&product.id, 2), &customer.id)
            .await
            .unwrap();
        update(
            &second.id,
            UpdateOrderRequest {
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Overview counts and revenue skip the cancelled order.
        let overview = analytics::repository::overview().await.unwrap();
        assert_eq!(overview.total_orders, 1);
        assert_eq!(overview.total_revenue, 75.0);

        // Stats are ownership-scoped; a stranger's scope sees nothing.
        let all = stats(&AccessScope::All).await.unwrap();
        assert_eq!(all.total_orders, 2);
        assert_eq!(all.pending_orders, 1);
        assert_eq!(all.total_revenue, 75.0);
        let theirs = stats(&AccessScope::Owner(customer.id.clone()))
            .await
            .unwrap();
        assert_eq!(theirs.total_orders, 2);
        let none = stats(&AccessScope::Owner(bystander.id.clone()))
            .await
            .unwrap();
        assert_eq!(none.total_orders, 0);

        // Deleting a pending order gives its stock back and rolls the sales
        // counter down.
        delete(&first.id).await.unwrap();
        let p = products::service::get(&product.id).await.unwrap();
        assert_eq!(p.stock, 8);
        assert_eq!(p.sales, 2);

        // Deleting an already-cancelled order restores nothing; its stock
        // was never released back.
        delete(&second.id).await.unwrap();
        let p = products::service::get(&product.id).await.unwrap();
        assert_eq!(p.stock, 8);
        assert_eq!(p.sales, 2);

        let _ = std::fs::remove_file(&db_path);
    }
}
