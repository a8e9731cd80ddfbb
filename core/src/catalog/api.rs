//! Typed catalog operations over the resilient client

use super::models::{Category, Vod, VodPage};
use crate::fetch::{FetchError, RequestParams, ResilientClient};

#[derive(Clone)]
pub struct CatalogApi {
    client: ResilientClient,
}

impl CatalogApi {
    pub fn new(client: ResilientClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResilientClient {
        &self.client
    }

    /// Categories ride along with any list page; nameless ones are skipped
    pub async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        let page = self.list(1, None).await?;
        Ok(page
            .class
            .into_iter()
            .filter(|cat| {
                let named = cat.type_name.as_deref().map_or(false, |n| !n.is_empty());
                if !named {
                    tracing::warn!("Category ID {} has null name.", cat.type_id);
                }
                named
            })
            .collect())
    }

    pub async fn list(&self, page: u32, category: Option<&str>) -> Result<VodPage, FetchError> {
        let params = list_params(page, category, None);
        self.client.fetch_as(&params, false).await
    }

    pub async fn search(&self, term: &str, page: u32) -> Result<VodPage, FetchError> {
        let params = list_params(page, None, Some(term));
        self.client.fetch_as(&params, false).await
    }

    /// Look up several videos in one request. No ids, no request.
    pub async fn details<S: AsRef<str>>(&self, ids: &[S], silent: bool) -> Result<Vec<Vod>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let params = detail_params(ids);
        let page: VodPage = self.client.fetch_as(&params, silent).await?;
        Ok(page.list)
    }

    pub async fn detail(&self, id: &str) -> Result<Option<Vod>, FetchError> {
        Ok(self.details(&[id], false).await?.into_iter().next())
    }
}

/// `ac=list` parameters. Empty category or term are left out.
///
/// The search term is percent-encoded before it goes into the form-encoded
/// query, so the upstream sees it encoded twice, which is what it expects.
pub fn list_params(page: u32, category: Option<&str>, term: Option<&str>) -> RequestParams {
    let mut params = RequestParams::new().with("ac", "list").with("pg", page.max(1));
    if let Some(category) = category.filter(|c| !c.is_empty()) {
        params.insert("t", category);
    }
    if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
        params.insert("wd", urlencoding::encode(term).into_owned());
    }
    params
}

pub fn detail_params<S: AsRef<str>>(ids: &[S]) -> RequestParams {
    let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    RequestParams::new().with("ac", "detail").with("ids", ids.join(","))
}

/// Infinite-scroll paging state for one listing (category or search)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current_page: u32,
    total_pages: u32,
    has_more: bool,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    pub fn new() -> Self {
        Self {
            current_page: 0,
            total_pages: 1,
            has_more: true,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_more.then_some(self.current_page + 1)
    }

    /// Fold a fetched page into the state
    pub fn record(&mut self, page_number: u32, page: &VodPage) {
        self.current_page = page_number;
        self.total_pages = page.pagecount.max(1);
        if page.list.is_empty() || self.current_page >= self.total_pages {
            self.has_more = false;
        }
    }

    /// A failed fetch ends the listing
    pub fn record_failure(&mut self) {
        self.has_more = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(len: usize, pagecount: u32) -> VodPage {
        VodPage {
            pagecount,
            list: (0..len)
                .map(|i| Vod { vod_id: i.to_string(), ..Default::default() })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_list_params() {
        assert_eq!(list_params(1, None, None).query_string(), "ac=list&pg=1");
        assert_eq!(list_params(3, Some("16"), None).query_string(), "ac=list&pg=3&t=16");
        assert_eq!(list_params(0, Some(""), Some("  ")).query_string(), "ac=list&pg=1");
    }

    #[test]
    fn test_search_term_is_encoded_before_form_encoding() {
        let params = list_params(1, None, Some("a b"));
        assert_eq!(params.query_string(), "ac=list&pg=1&wd=a%2520b");
    }

    #[test]
    fn test_detail_params_join_ids() {
        assert_eq!(
            detail_params(&["12", "34"]).query_string(),
            "ac=detail&ids=12%2C34"
        );
    }

    #[test]
    fn test_pager_walks_until_last_page() {
        let mut pager = Pager::new();
        assert_eq!(pager.next_page(), Some(1));

        pager.record(1, &page_of(20, 2));
        assert_eq!(pager.next_page(), Some(2));

        pager.record(2, &page_of(5, 2));
        assert!(!pager.has_more());
        assert_eq!(pager.next_page(), None);
    }

    #[test]
    fn test_pager_stops_on_empty_page() {
        let mut pager = Pager::new();
        pager.record(1, &page_of(0, 10));
        assert_eq!(pager.next_page(), None);
    }

    #[test]
    fn test_pager_defaults_missing_pagecount_to_one() {
        let mut pager = Pager::new();
        pager.record(1, &page_of(20, 0));
        assert_eq!(pager.total_pages(), 1);
        assert!(!pager.has_more());
    }

    #[test]
    fn test_pager_stops_on_failure() {
        let mut pager = Pager::new();
        pager.record_failure();
        assert_eq!(pager.next_page(), None);
    }
}
