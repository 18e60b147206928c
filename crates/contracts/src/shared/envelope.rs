use serde::{Deserialize, Serialize};

/// Uniform wrapper for single-object and message-only responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Uniform wrapper for paginated list responses. `total` counts every
/// record matching the filter, not the page; `total_pages` is
/// ceil(total / limit).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ListEnvelope<T> {
    pub fn new(data: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            success: true,
            data,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let env = ListEnvelope::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(env.total_pages, 3);

        let env = ListEnvelope::new(vec![1], 40, 2, 20);
        assert_eq!(env.total_pages, 2);

        let env: ListEnvelope<i32> = ListEnvelope::new(vec![], 0, 1, 20);
        assert_eq!(env.total_pages, 0);
    }

    #[test]
    fn envelope_wire_shape_is_camel_case() {
        let env = ListEnvelope::new(vec![1], 1, 1, 20);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["success"], true);
    }
}
