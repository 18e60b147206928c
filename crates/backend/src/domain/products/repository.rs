use contracts::domain::products::{Category, Product, ProductListParams, ProductStats};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Set, Statement};
use serde::{Deserialize, Serialize};

use crate::shared::data::dates;
use crate::shared::data::db::get_connection;
use crate::shared::query::{CountRow, ListQuery};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category: String,
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
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            id: m.id,
            name: m.name,
            sku: m.sku,
            barcode: m.barcode,
            category: Category::parse(&m.category).unwrap_or(Category::Electronics),
            brand: m.brand,
            price: m.price,
            cost_price: m.cost_price,
            stock: m.stock,
            min_stock_level: m.min_stock_level,
            sales: m.sales,
            rating: m.rating,
            review_count: m.review_count,
            description: m.description,
            is_active: m.is_active,
            is_featured: m.is_featured,
            created_at: dates::parse_or_now(&m.created_at),
            updated_at: dates::parse_or_now(&m.updated_at),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

const SORTABLE: &[&str] = &[
    "name",
    "price",
    "stock",
    "sales",
    "rating",
    "category",
    "created_at",
];

fn build_query(params: &ProductListParams) -> ListQuery {
    let mut q = ListQuery::new();
    if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
        q.contains_any(&["name", "sku", "brand"], search.trim());
    }
    if let Some(category) = params.category {
        q.eq("category", category.as_str());
    }
    if let Some(min) = params.min_price {
        q.gte("price", min);
    }
    if let Some(max) = params.max_price {
        q.lte("price", max);
    }
    if let Some(active) = params.is_active {
        q.eq("is_active", active);
    }
    q.order_by(
        params.sort_by.as_deref(),
        params.sort_desc.unwrap_or(true),
        SORTABLE,
        "created_at DESC",
    );
    q.paginate(params.page, params.limit);
    q
}

pub async fn list(params: &ProductListParams) -> anyhow::Result<(Vec<Product>, u64)> {
    let q = build_query(params);

    let (sql, values) = q.page_sql("SELECT * FROM products");
    let rows = Entity::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .all(conn())
        .await?;

    let (count_sql, count_values) = q.count_sql("products");
    let total = CountRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &count_sql,
        count_values,
    ))
    .one(conn())
    .await?
    .map(|r| r.total as u64)
    .unwrap_or(0);

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Product>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_model_by_id(id: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find_by_id(id).one(conn()).await?)
}

pub async fn sku_taken(sku: &str, exclude_id: Option<&str>) -> anyhow::Result<bool> {
    let mut query = Entity::find().filter(Column::Sku.eq(sku));
    if let Some(id) = exclude_id {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.one(conn()).await?.is_some())
}

pub async fn insert(model: Model) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        sku: Set(model.sku),
        barcode: Set(model.barcode),
        category: Set(model.category),
        brand: Set(model.brand),
        price: Set(model.price),
        cost_price: Set(model.cost_price),
        stock: Set(model.stock),
        min_stock_level: Set(model.min_stock_level),
        sales: Set(model.sales),
        rating: Set(model.rating),
        review_count: Set(model.review_count),
        description: Set(model.description),
        is_active: Set(model.is_active),
        is_featured: Set(model.is_featured),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    };
    active.insert(conn()).await?;
    Ok(())
}

pub async fn update(model: Model) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        sku: Set(model.sku),
        barcode: Set(model.barcode),
        category: Set(model.category),
        brand: Set(model.brand),
        price: Set(model.price),
        cost_price: Set(model.cost_price),
        stock: Set(model.stock),
        min_stock_level: Set(model.min_stock_level),
        sales: Set(model.sales),
        rating: Set(model.rating),
        review_count: Set(model.review_count),
        description: Set(model.description),
        is_active: Set(model.is_active),
        is_featured: Set(model.is_featured),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

/// Atomically take `quantity` units of stock and credit sales. The
/// condition keeps stock from ever going negative under concurrent orders;
/// zero rows affected means there was not enough stock at commit time.
pub async fn try_take_stock(product_id: &str, quantity: i64) -> anyhow::Result<bool> {
    let result = conn()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE products SET
                stock = stock - ?,
                sales = sales + ?,
                updated_at = ?
             WHERE id = ? AND stock >= ?",
            [
                quantity.into(),
                quantity.into(),
                dates::now().into(),
                product_id.to_string().into(),
                quantity.into(),
            ],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Inverse of [`try_take_stock`], used for compensation and order deletion.
/// Sales are floored at zero.
pub async fn give_back_stock(product_id: &str, quantity: i64) -> anyhow::Result<()> {
    conn()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE products SET
                stock = stock + ?,
                sales = MAX(sales - ?, 0),
                updated_at = ?
             WHERE id = ?",
            [
                quantity.into(),
                quantity.into(),
                dates::now().into(),
                product_id.to_string().into(),
            ],
        ))
        .await?;
    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct ProductStatsRow {
    total_products: i64,
    low_stock: i64,
    total_revenue: f64,
    top_selling: i64,
}

pub async fn stats() -> anyhow::Result<ProductStats> {
    let row = ProductStatsRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT
            COUNT(*) AS total_products,
            COALESCE(SUM(CASE WHEN stock <= min_stock_level THEN 1 ELSE 0 END), 0) AS low_stock,
            COALESCE(SUM(price * sales), 0) AS total_revenue,
            COALESCE(SUM(CASE WHEN sales > 100 THEN 1 ELSE 0 END), 0) AS top_selling
         FROM products"
            .to_string(),
    ))
    .one(conn())
    .await?
    .unwrap_or(ProductStatsRow {
        total_products: 0,
        low_stock: 0,
        total_revenue: 0.0,
        top_selling: 0,
    });

    Ok(ProductStats {
        total_products: row.total_products,
        low_stock: row.low_stock,
        total_revenue: row.total_revenue,
        top_selling: row.top_selling,
    })
}
