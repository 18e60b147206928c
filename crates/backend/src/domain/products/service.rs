use contracts::domain::products::{
    CreateProductRequest, Product, ProductListParams, ProductStats, UpdateProductRequest,
};
use uuid::Uuid;

use super::repository::{self, Model};
use crate::shared::data::dates;
use crate::shared::error::{ApiError, ApiResult, FieldError};

fn validate_new_product(req: &CreateProductRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name".into(),
            message: "Name is required".into(),
        });
    }
    if req.price < 0.0 {
        errors.push(FieldError {
            field: "price".into(),
            message: "Price cannot be negative".into(),
        });
    }
    if req.cost_price.is_some_and(|c| c < 0.0) {
        errors.push(FieldError {
            field: "costPrice".into(),
            message: "Cost price cannot be negative".into(),
        });
    }
    if req.stock.is_some_and(|s| s < 0) {
        errors.push(FieldError {
            field: "stock".into(),
            message: "Stock cannot be negative".into(),
        });
    }
    if req.rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
        errors.push(FieldError {
            field: "rating".into(),
            message: "Rating must be between 0 and 5".into(),
        });
    }
    errors
}

pub async fn list(params: &ProductListParams) -> ApiResult<(Vec<Product>, u64)> {
    Ok(repository::list(params).await?)
}

pub async fn get(id: &str) -> ApiResult<Product> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

pub async fn create(req: CreateProductRequest) -> ApiResult<Product> {
    let errors = validate_new_product(&req);
    if !errors.is_empty() {
        return Err(ApiError::FieldValidation(errors));
    }
    // SKUs are stored uppercased so lookups are case-insensitive.
    let sku = req
        .sku
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase);
    if let Some(sku) = sku.as_deref() {
        if repository::sku_taken(sku, None).await? {
            return Err(ApiError::conflict("SKU is already in use"));
        }
    }

    let id = Uuid::new_v4().to_string();
    let now = dates::now();
    let model = Model {
        id: id.clone(),
        name: req.name.trim().to_string(),
        sku,
        barcode: req.barcode,
        category: req.category.as_str().to_string(),
        brand: req.brand,
        price: req.price,
        cost_price: req.cost_price.unwrap_or(0.0),
        stock: req.stock.unwrap_or(0),
        min_stock_level: req.min_stock_level.unwrap_or(10),
        sales: 0,
        rating: req.rating.unwrap_or(0.0),
        review_count: 0,
        description: req.description,
        is_active: req.is_active.unwrap_or(true),
        is_featured: req.is_featured.unwrap_or(false),
        created_at: now.clone(),
        updated_at: now,
    };
    repository::insert(model).await?;

    repository::get_by_id(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Product {id} was not found after insert").into())
}

pub async fn update(id: &str, req: UpdateProductRequest) -> ApiResult<Product> {
    let mut model = repository::get_model_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Name cannot be empty"));
        }
        model.name = name.trim().to_string();
    }
    if let Some(sku) = req.sku {
        let sku = sku.trim().to_uppercase();
        if !sku.is_empty() && repository::sku_taken(&sku, Some(id)).await? {
            return Err(ApiError::conflict("SKU is already in use"));
        }
        model.sku = Some(sku).filter(|s| !s.is_empty());
    }
    if let Some(barcode) = req.barcode {
        model.barcode = Some(barcode);
    }
    if let Some(category) = req.category {
        model.category = category.as_str().to_string();
    }
    if let Some(brand) = req.brand {
        model.brand = Some(brand);
    }
    if let Some(price) = req.price {
        if price < 0.0 {
            return Err(ApiError::validation("Price cannot be negative"));
        }
        model.price = price;
    }
    if let Some(cost_price) = req.cost_price {
        if cost_price < 0.0 {
            return Err(ApiError::validation("Cost price cannot be negative"));
        }
        model.cost_price = cost_price;
    }
    if let Some(stock) = req.stock {
        if stock < 0 {
            return Err(ApiError::validation("Stock cannot be negative"));
        }
        model.stock = stock;
    }
    if let Some(min_stock_level) = req.min_stock_level {
        model.min_stock_level = min_stock_level;
    }
    if let Some(rating) = req.rating {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ApiError::validation("Rating must be between 0 and 5"));
        }
        model.rating = rating;
    }
    if let Some(description) = req.description {
        model.description = Some(description);
    }
    if let Some(is_active) = req.is_active {
        model.is_active = is_active;
    }
    if let Some(is_featured) = req.is_featured {
        model.is_featured = is_featured;
    }
    model.updated_at = dates::now();
    repository::update(model).await?;

    get(id).await
}

pub async fn delete(id: &str) -> ApiResult<()> {
    if !repository::delete(id).await? {
        return Err(ApiError::not_found("Product not found"));
    }
    Ok(())
}

pub async fn stats() -> ApiResult<ProductStats> {
    Ok(repository::stats().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::products::Category;

    fn base_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Wireless Mouse".into(),
            sku: None,
            barcode: None,
            category: Category::Electronics,
            brand: None,
            price: 29.99,
            cost_price: None,
            stock: Some(50),
            min_stock_level: None,
            rating: None,
            description: None,
            is_active: None,
            is_featured: None,
        }
    }

    #[test]
    fn valid_request_passes_validation() {
        assert!(validate_new_product(&base_request()).is_empty());
    }

    #[test]
    fn negative_price_and_stock_are_flagged() {
        let mut req = base_request();
        req.price = -1.0;
        req.stock = Some(-5);
        let fields: Vec<String> = validate_new_product(&req)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["price", "stock"]);
    }

    #[test]
    fn rating_outside_scale_is_flagged() {
        let mut req = base_request();
        req.rating = Some(5.5);
        assert_eq!(validate_new_product(&req)[0].field, "rating");
    }
}
