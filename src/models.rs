use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One `(field, operation, value)` condition of a filter request.
///
/// Values always travel as strings and are coerced to the field's declared
/// type during compilation. The operation is a free-form token; unknown
/// tokens compile as `EQ`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct FilterClause {
    /// Logical field name, resolved against the entity schema
    #[schema(example = "createdAt")]
    pub field: String,
    /// Raw value
    #[schema(example = "2002-04-20T12:30:52Z")]
    pub value: String,
    /// Operator token: EQ, NE, GT, GET, LT, LET, LIKE, STARTSWITH or ENDSWITH
    #[serde(rename = "operation")]
    #[schema(example = "NE")]
    pub operator: String,
}

impl FilterClause {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: operator.into(),
        }
    }
}

/// Page, sort and filter description sent by the client.
///
/// Every field is optional and may be out of range; `normalize` repairs it
/// before execution.
///
/// ```json
/// {
///   "page": 0,
///   "size": 20,
///   "direction": "desc",
///   "sort": ["createdAt", "name"],
///   "filters": [{"field": "age", "value": "30", "operation": "GET"}]
/// }
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageRequest {
    /// Zero-based page index
    #[serde(rename = "page")]
    #[schema(example = 0)]
    pub page_index: Option<i64>,
    /// Number of elements per page
    #[serde(rename = "size")]
    #[schema(example = 20)]
    pub page_size: Option<i64>,
    /// ASC or DESC, case-insensitive
    #[serde(rename = "direction")]
    #[schema(example = "ASC")]
    pub sort_direction: Option<String>,
    /// Fields to order by, most significant first
    #[serde(rename = "sort")]
    pub sort_fields: Option<Vec<String>>,
    /// Conditions combined with AND
    pub filters: Option<Vec<FilterClause>>,
}

/// Summary of an executed page, echoing the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub total_pages: u64,
    #[serde(rename = "totalElements")]
    pub total_element_count: u64,
    #[serde(rename = "dataRequest")]
    pub echoed_request: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_request_wire_shape() {
        let request: PageRequest = serde_json::from_value(json!({
            "page": 2,
            "size": 10,
            "direction": "dESc",
            "sort": ["name"],
            "filters": [{"field": "age", "value": "30", "operation": "GT"}]
        }))
        .unwrap();

        assert_eq!(request.page_index, Some(2));
        assert_eq!(request.page_size, Some(10));
        assert_eq!(request.sort_direction.as_deref(), Some("dESc"));
        assert_eq!(request.sort_fields, Some(vec!["name".to_string()]));
        assert_eq!(
            request.filters,
            Some(vec![FilterClause::new("age", "GT", "30")])
        );
    }

    #[test]
    fn test_page_request_missing_fields() {
        let request: PageRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({}));
    }

    #[test]
    fn test_filter_clause_equality_is_structural() {
        assert_eq!(
            FilterClause::new("age", "GT", "30"),
            FilterClause::new("age", "GT", "30")
        );
        assert_ne!(
            FilterClause::new("age", "GT", "30"),
            FilterClause::new("age", "gt", "30")
        );
    }

    #[test]
    fn test_page_result_wire_shape() {
        let result = PageResult {
            total_pages: 3,
            total_element_count: 25,
            echoed_request: PageRequest {
                page_index: Some(0),
                page_size: Some(10),
                ..PageRequest::default()
            },
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "totalPages": 3,
                "totalElements": 25,
                "dataRequest": {"page": 0, "size": 10}
            })
        );
    }
}
