use sea_orm::Value;

/// Visibility restriction resolved once by the auth layer and ANDed into
/// every scoped query before execution. Callers cannot override it through
/// filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Privileged caller, sees everything.
    All,
    /// Restricted to rows owned by this user id.
    Owner(String),
}

impl AccessScope {
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            AccessScope::All => None,
            AccessScope::Owner(id) => Some(id.as_str()),
        }
    }
}

/// Row shape produced by [`ListQuery::count_sql`].
#[derive(Debug, sea_orm::FromQueryResult)]
pub struct CountRow {
    pub total: i64,
}

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// Normalize raw pagination parameters to the effective (page, limit) pair.
/// Handlers use the same resolution when building the response envelope.
pub fn resolve_pagination(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    (
        page.unwrap_or(DEFAULT_PAGE).max(1),
        limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
    )
}

/// Accumulates AND-combined filter conditions with bound parameters plus a
/// sort directive and skip/limit pagination, then emits both the page query
/// and the bare count query so `total` ignores pagination.
///
/// One builder serves every list endpoint; the entity-specific part is just
/// which columns get filtered and which are legal sort targets.
pub struct ListQuery {
    conditions: Vec<String>,
    params: Vec<Value>,
    order_by: String,
    page: u64,
    limit: u64,
}

impl ListQuery {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: String::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Exact-equality condition for enumerated parameters.
    pub fn eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.conditions.push(format!("{column} = ?"));
        self.params.push(value.into());
        self
    }

    /// Case-insensitive substring match ORed across the designated columns.
    pub fn contains_any(&mut self, columns: &[&str], needle: &str) -> &mut Self {
        if columns.is_empty() {
            return self;
        }
        let pattern = format!("%{}%", needle.to_lowercase());
        let clause = columns
            .iter()
            .map(|c| format!("LOWER({c}) LIKE ?"))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.conditions.push(format!("({clause})"));
        for _ in columns {
            self.params.push(pattern.clone().into());
        }
        self
    }

    /// Inclusive lower bound.
    pub fn gte(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.conditions.push(format!("{column} >= ?"));
        self.params.push(value.into());
        self
    }

    /// Inclusive upper bound.
    pub fn lte(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.conditions.push(format!("{column} <= ?"));
        self.params.push(value.into());
        self
    }

    /// AND in the ownership restriction. A no-op for privileged callers.
    pub fn scope(&mut self, column: &str, scope: &AccessScope) -> &mut Self {
        if let AccessScope::Owner(id) = scope {
            self.eq(column, id.clone());
        }
        self
    }

    /// Sort by `requested` if it names a whitelisted column, otherwise by
    /// `default` (which carries its own direction, e.g. "created_at DESC").
    pub fn order_by(
        &mut self,
        requested: Option<&str>,
        descending: bool,
        whitelist: &[&str],
        default: &str,
    ) -> &mut Self {
        self.order_by = match requested {
            Some(col) if whitelist.contains(&col) => {
                let dir = if descending { "DESC" } else { "ASC" };
                format!("{col} {dir}")
            }
            _ => default.to_string(),
        };
        self
    }

    /// Fixed sort order with no caller override.
    pub fn order_by_fixed(&mut self, order: &str) -> &mut Self {
        self.order_by = order.to_string();
        self
    }

    /// Page defaults to 1 (floored at 1), limit defaults to 20 and is
    /// clamped to 1..=100.
    pub fn paginate(&mut self, page: Option<u64>, limit: Option<u64>) -> &mut Self {
        let (page, limit) = resolve_pagination(page, limit);
        self.page = page;
        self.limit = limit;
        self
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Full page query: `select` + WHERE + ORDER BY + LIMIT/OFFSET.
    pub fn page_sql(&self, select: &str) -> (String, Vec<Value>) {
        let mut sql = format!("{select}{}", self.where_clause());
        if !self.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order_by));
        }
        let offset = (self.page - 1) * self.limit;
        sql.push_str(&format!(" LIMIT {} OFFSET {}", self.limit, offset));
        (sql, self.params.clone())
    }

    /// Count query over the same filter, ignoring sort and pagination.
    pub fn count_sql(&self, table: &str) -> (String, Vec<Value>) {
        (
            format!(
                "SELECT COUNT(*) AS total FROM {table}{}",
                self.where_clause()
            ),
            self.params.clone(),
        )
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_where_clause() {
        let mut q = ListQuery::new();
        q.order_by_fixed("created_at DESC");
        let (sql, params) = q.page_sql("SELECT * FROM products");
        assert_eq!(
            sql,
            "SELECT * FROM products ORDER BY created_at DESC LIMIT 20 OFFSET 0"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn conditions_combine_with_and() {
        let mut q = ListQuery::new();
        q.eq("status", "Pending")
            .gte("price", 10.0)
            .lte("price", 99.5);
        let (sql, params) = q.count_sql("products");
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS total FROM products WHERE status = ? AND price >= ? AND price <= ?"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn text_search_ors_across_columns_case_insensitively() {
        let mut q = ListQuery::new();
        q.contains_any(&["name", "email"], "Ana");
        let (sql, params) = q.count_sql("users");
        assert!(sql.contains("(LOWER(name) LIKE ? OR LOWER(email) LIKE ?)"));
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], Value::from("%ana%".to_string()));
    }

    #[test]
    fn pagination_computes_skip_from_page() {
        let mut q = ListQuery::new();
        q.paginate(Some(3), Some(25)).order_by_fixed("date DESC");
        let (sql, _) = q.page_sql("SELECT * FROM orders");
        assert!(sql.ends_with("LIMIT 25 OFFSET 50"));
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let mut q = ListQuery::new();
        q.paginate(None, None);
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 20);

        let mut q = ListQuery::new();
        q.paginate(Some(0), Some(10_000));
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), MAX_LIMIT);
    }

    #[test]
    fn sort_override_requires_whitelisted_column() {
        let whitelist = &["name", "price", "created_at"];

        let mut q = ListQuery::new();
        q.order_by(Some("price"), true, whitelist, "created_at DESC");
        let (sql, _) = q.page_sql("SELECT * FROM products");
        assert!(sql.contains("ORDER BY price DESC"));

        // An unlisted column falls back to the default, so callers cannot
        // inject arbitrary SQL through sortBy.
        let mut q = ListQuery::new();
        q.order_by(Some("price; DROP TABLE"), false, whitelist, "created_at DESC");
        let (sql, _) = q.page_sql("SELECT * FROM products");
        assert!(sql.contains("ORDER BY created_at DESC"));
    }

    #[test]
    fn owner_scope_is_anded_in() {
        let scope = AccessScope::Owner("user-1".to_string());
        let mut q = ListQuery::new();
        q.eq("status", "Completed").scope("customer_id", &scope);
        let (sql, params) = q.count_sql("sales");
        assert!(sql.contains("status = ? AND customer_id = ?"));
        assert_eq!(params.len(), 2);

        let mut q = ListQuery::new();
        q.scope("customer_id", &AccessScope::All);
        let (sql, _) = q.count_sql("sales");
        assert!(!sql.contains("WHERE"));
    }
}
