use serde::{Deserialize, Serialize};

use crate::constants::RECIPE_COUNT_PER_PAGE;
use crate::schema::SortDirection;

/// Paged response envelope; `total` is the full row count, independent of
/// the requested page.
#[derive(Serialize, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Raw query-string parameters of the list endpoint. Values are kept as
/// strings so an unparsable number falls back to its default instead of
/// failing the request.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    /// Page defaults to 1 and is clamped below at 1; a limit under 1 falls
    /// back to the default page size rather than clamping.
    pub fn params(&self) -> PageParams {
        let page = self
            .page
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = match self.limit.as_deref().and_then(|v| v.parse::<i64>().ok()) {
            Some(limit) if limit >= 1 => limit,
            _ => RECIPE_COUNT_PER_PAGE,
        };

        PageParams {
            limit,
            // Saturate: a huge page number must clamp to the last
            // representable offset, not overflow.
            offset: (page - 1).saturating_mul(limit),
        }
    }

    pub fn direction(&self) -> SortDirection {
        SortDirection::parse(self.sort.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_parameters_use_defaults() {
        let query = ListQuery::default();
        assert_eq!(
            query.params(),
            PageParams {
                limit: RECIPE_COUNT_PER_PAGE,
                offset: 0
            }
        );
        assert_eq!(query.direction(), SortDirection::Desc);
    }

    #[test]
    fn page_is_clamped_to_one() {
        let query = ListQuery {
            page: Some(String::from("0")),
            limit: Some(String::from("5")),
            sort: None,
        };
        assert_eq!(query.params().offset, 0);

        let query = ListQuery {
            page: Some(String::from("-3")),
            limit: Some(String::from("5")),
            sort: None,
        };
        assert_eq!(query.params().offset, 0);
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let query = ListQuery {
            page: Some(String::from("first")),
            limit: Some(String::from("lots")),
            sort: None,
        };
        assert_eq!(
            query.params(),
            PageParams {
                limit: RECIPE_COUNT_PER_PAGE,
                offset: 0
            }
        );
    }

    #[test]
    fn invalid_limit_falls_back_to_default() {
        let query = ListQuery {
            page: Some(String::from("1")),
            limit: Some(String::from("0")),
            sort: None,
        };
        assert_eq!(query.params().limit, RECIPE_COUNT_PER_PAGE);
    }

    #[test]
    fn huge_page_numbers_saturate_instead_of_overflowing() {
        let query = ListQuery {
            page: Some(i64::MAX.to_string()),
            limit: Some(String::from("12")),
            sort: None,
        };
        assert_eq!(query.params().offset, i64::MAX);

        let query = ListQuery {
            page: Some(i64::MAX.to_string()),
            limit: None,
            sort: None,
        };
        assert_eq!(query.params().offset, i64::MAX);
    }

    #[test]
    fn offset_advances_by_whole_pages() {
        let query = ListQuery {
            page: Some(String::from("3")),
            limit: Some(String::from("2")),
            sort: None,
        };
        assert_eq!(query.params(), PageParams { limit: 2, offset: 4 });
    }

    #[test]
    fn page_envelope_shape() {
        let page = Page {
            items: vec![1, 2],
            total: 40,
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value, serde_json::json!({"items": [1, 2], "total": 40}));
    }
}
