use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Table bootstrap pairs: name in sqlite_master, CREATE TABLE DDL.
/// Dates are stored as RFC3339 TEXT, booleans as INTEGER 0/1.
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE users (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT NOT NULL,
            phone TEXT,
            role TEXT NOT NULL DEFAULT 'Customer',
            status TEXT NOT NULL DEFAULT 'Active',
            registration_source TEXT NOT NULL DEFAULT 'Website',
            registered_at TEXT NOT NULL,
            last_login TEXT,
            orders_count INTEGER NOT NULL DEFAULT 0,
            total_spent REAL NOT NULL DEFAULT 0,
            average_order_value REAL NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE products (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            sku TEXT UNIQUE,
            barcode TEXT UNIQUE,
            category TEXT NOT NULL,
            brand TEXT,
            price REAL NOT NULL,
            cost_price REAL NOT NULL DEFAULT 0,
            stock INTEGER NOT NULL DEFAULT 0,
            min_stock_level INTEGER NOT NULL DEFAULT 10,
            sales INTEGER NOT NULL DEFAULT 0,
            rating REAL NOT NULL DEFAULT 0,
            review_count INTEGER NOT NULL DEFAULT 0,
            description TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_featured INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE orders (
            id TEXT PRIMARY KEY NOT NULL,
            order_id TEXT NOT NULL UNIQUE,
            customer_id TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Pending',
            payment_method TEXT NOT NULL DEFAULT 'Credit Card',
            payment_status TEXT NOT NULL DEFAULT 'Pending',
            total REAL NOT NULL,
            shipping_cost REAL NOT NULL DEFAULT 0,
            tax REAL NOT NULL DEFAULT 0,
            discount REAL NOT NULL DEFAULT 0,
            date TEXT NOT NULL,
            processed_at TEXT,
            shipped_at TEXT,
            delivered_at TEXT,
            cancelled_at TEXT,
            cancellation_reason TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    ),
    (
        "order_items",
        r#"
        CREATE TABLE order_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id TEXT NOT NULL,
            product_id TEXT NOT NULL,
            product_name TEXT,
            quantity INTEGER NOT NULL,
            price REAL NOT NULL
        );
    "#,
    ),
    (
        "sales",
        r#"
        CREATE TABLE sales (
            id TEXT PRIMARY KEY NOT NULL,
            sale_id TEXT NOT NULL UNIQUE,
            order_id TEXT NOT NULL,
            customer_id TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            product_id TEXT NOT NULL,
            product_name TEXT NOT NULL,
            category TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            unit_price REAL NOT NULL,
            total_amount REAL NOT NULL,
            sale_date TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            channel TEXT NOT NULL DEFAULT 'Website',
            status TEXT NOT NULL DEFAULT 'Completed'
        );
    "#,
    ),
    (
        "login_logs",
        r#"
        CREATE TABLE login_logs (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT,
            email TEXT NOT NULL,
            ip_address TEXT,
            user_agent TEXT,
            status TEXT NOT NULL,
            failure_reason TEXT,
            login_at TEXT NOT NULL
        );
    "#,
    ),
    (
        "registration_logs",
        r#"
        CREATE TABLE registration_logs (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'Customer',
            registration_source TEXT NOT NULL DEFAULT 'Website',
            ip_address TEXT,
            user_agent TEXT,
            status TEXT NOT NULL,
            failure_reason TEXT,
            registered_at TEXT NOT NULL
        );
    "#,
    ),
    (
        "sys_settings",
        r#"
        CREATE TABLE sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders (customer_id);",
    "CREATE INDEX IF NOT EXISTS idx_orders_date ON orders (date);",
    "CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items (order_id);",
    "CREATE INDEX IF NOT EXISTS idx_sales_date ON sales (sale_date);",
    "CREATE INDEX IF NOT EXISTS idx_sales_customer ON sales (customer_id);",
    "CREATE INDEX IF NOT EXISTS idx_login_logs_email ON login_logs (email);",
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/dashboard.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    for (name, ddl) in TABLES {
        let exists = conn
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?",
                [(*name).into()],
            ))
            .await?;
        if exists.is_none() {
            tracing::info!("Creating {} table", name);
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                ddl.to_string(),
            ))
            .await?;
        }
    }

    for idx in INDEXES {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            idx.to_string(),
        ))
        .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
