use crate::{AwardId, CategoryId, MediaChannelId, Role, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PER_PAGE: u32 = 10;

/// Query parameters owned by [`ListParams`] itself. Filters may not use them.
pub const RESERVED_QUERY_KEYS: &[&str] = &["search", "page", "perPage"];

/// Pagination, search and filter state driving a list query.
///
/// Owned by the page that renders the list. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: String,
    pub page: u32,
    pub per_page: u32,
    /// Resource-specific filters, sent as extra query parameters.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            filters: BTreeMap::new(),
        }
    }
}

impl ListParams {
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Apply a partial update. Page and page size never drop below 1.
    pub fn merge(&mut self, update: PaginationUpdate) {
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(page) = update.page {
            self.page = page.max(1);
        }
        if let Some(per_page) = update.per_page {
            self.per_page = per_page.max(1);
        }
        if let Some(filters) = update.filters {
            self.filters = filters;
        }
    }

    /// Query string pairs in the order the API documents them.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("search".to_string(), self.search.clone()),
            ("page".to_string(), self.page.to_string()),
            ("perPage".to_string(), self.per_page.to_string()),
        ];
        for (key, value) in &self.filters {
            if RESERVED_QUERY_KEYS.contains(&key.as_str()) {
                tracing::warn!(%key, "ignoring filter named like a list parameter");
                continue;
            }
            query.push((key.clone(), value.clone()));
        }
        query
    }

    /// Number of rows skipped before the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// 1-based index of the first row shown, or 0 when nothing is shown.
    pub fn low_bound(&self, total: u64) -> u64 {
        if total == 0 || self.offset() >= total {
            0
        } else {
            self.offset() + 1
        }
    }

    /// 1-based index of the last row shown, or 0 when nothing is shown.
    pub fn high_bound(&self, total: u64) -> u64 {
        if self.low_bound(total) == 0 {
            return 0;
        }
        (self.offset() + u64::from(self.per_page)).min(total)
    }

    pub fn page_count(&self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.per_page.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Update moving back to the last page when the current one lies past
    /// the end of `total` rows, e.g. after its only row was deleted.
    pub fn past_end(&self, total: u64) -> Option<PaginationUpdate> {
        let last_page = self.page_count(total);
        (total > 0 && self.page > last_page)
            .then(|| PaginationUpdate::page(last_page))
    }
}

/// Partial update to [`ListParams`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationUpdate {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub filters: Option<BTreeMap<String, String>>,
}

impl PaginationUpdate {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    /// A new search term always starts again from the first page.
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            page: Some(1),
            ..Default::default()
        }
    }

    pub fn per_page(per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            page: Some(1),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Update payloads carry their identifier; the client moves it into the URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategory {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAward {
    pub name: String,
    pub year: i32,
    pub is_open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAward {
    pub id: AwardId,
    pub name: String,
    pub year: i32,
    pub is_open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCriterion {
    pub category_id: CategoryId,
    pub name: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMediaChannel {
    pub name: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMediaChannel {
    pub id: MediaChannelId,
    pub name: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_present_fields() {
        let mut params = ListParams::default().with_filter("year", "2025");
        params.merge(PaginationUpdate::page(3));

        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);
        assert_eq!(params.search, "");
        assert_eq!(params.filters.get("year").map(String::as_str), Some("2025"));
    }

    #[test]
    fn merge_clamps_page_and_page_size() {
        let mut params = ListParams::default();
        params.merge(PaginationUpdate {
            page: Some(0),
            per_page: Some(0),
            ..Default::default()
        });

        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 1);
    }

    #[test]
    fn search_resets_to_first_page() {
        let mut params = ListParams::default();
        params.merge(PaginationUpdate::page(4));
        params.merge(PaginationUpdate::search("radio"));

        assert_eq!(params.page, 1);
        assert_eq!(params.search, "radio");
    }

    #[test]
    fn query_uses_api_parameter_names() {
        let params = ListParams::default()
            .with_per_page(25)
            .with_filter("categoryId", "abc");

        assert_eq!(
            params.to_query(),
            vec![
                ("search".to_string(), String::new()),
                ("page".to_string(), "1".to_string()),
                ("perPage".to_string(), "25".to_string()),
                ("categoryId".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn window_on_short_first_page() {
        let params = ListParams::default();

        assert_eq!(params.low_bound(8), 1);
        assert_eq!(params.high_bound(8), 8);
        assert_eq!(params.page_count(8), 1);
    }

    #[test]
    fn window_on_later_pages() {
        let mut params = ListParams::default();
        params.merge(PaginationUpdate::page(3));

        assert_eq!(params.low_bound(25), 21);
        assert_eq!(params.high_bound(25), 25);
        assert_eq!(params.page_count(25), 3);
        assert_eq!(params.low_bound(0), 0);
        assert_eq!(params.high_bound(0), 0);
        assert_eq!(params.past_end(25), None);
    }

    #[test]
    fn window_past_the_last_page_is_empty() {
        let mut params = ListParams::default();
        params.merge(PaginationUpdate::page(2));

        assert_eq!(params.low_bound(10), 0);
        assert_eq!(params.high_bound(10), 0);
        assert_eq!(params.past_end(10), Some(PaginationUpdate::page(1)));
        assert_eq!(params.past_end(0), None);
    }

    #[test]
    fn filters_cannot_shadow_list_parameters() {
        let params = ListParams::default()
            .with_filter("page", "7")
            .with_filter("perPage", "500")
            .with_filter("role", "judge");

        let query = params.to_query();

        let pages: Vec<_> = query.iter().filter(|(key, _)| key == "page").collect();
        assert_eq!(pages, vec![&("page".to_string(), "1".to_string())]);
        assert_eq!(query.iter().filter(|(key, _)| key == "perPage").count(), 1);
        assert!(query.contains(&("role".to_string(), "judge".to_string())));
    }
}
