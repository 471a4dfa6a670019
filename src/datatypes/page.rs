//! Length-aware page envelope returned by the list endpoint.
//!
//! The JSON shape mirrors the classic `current_page` / `data` / `links`
//! paginator layout so existing clients can navigate without changes.

use serde::Serialize;
use url::form_urlencoded;

/// Rows per page on the list endpoint.
pub const PER_PAGE: u64 = 3;

/// Pages shown on each side of the current page once the window collapses.
const ON_EACH_SIDE: u64 = 3;

const PREVIOUS_LABEL: &str = "&laquo; Previous";
const NEXT_LABEL: &str = "Next &raquo;";
const GAP_LABEL: &str = "...";

/// Number of rows to skip to reach `page` (1-indexed).
pub fn offset(page: u64, per_page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

/// Builds the navigation URLs of a listing: `path?search=..&page=N`.
#[derive(Debug, Clone)]
pub struct PageUrls {
    path: String,
    search: Option<String>,
}

impl PageUrls {
    pub fn new(path: impl Into<String>, search: Option<&str>) -> Self {
        Self {
            path: path.into(),
            search: search.map(str::to_owned),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn url(&self, page: u64) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(search) = &self.search {
            query.append_pair("search", search);
        }
        query.append_pair("page", &page.to_string());
        format!("{}?{}", self.path, query.finish())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub current_page: u64,
    pub data: Vec<T>,
    pub first_page_url: String,
    pub from: Option<u64>,
    pub last_page: u64,
    pub last_page_url: String,
    pub links: Vec<PageLink>,
    pub next_page_url: Option<String>,
    pub path: String,
    pub per_page: u64,
    pub prev_page_url: Option<String>,
    pub to: Option<u64>,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, current_page: u64, per_page: u64, urls: &PageUrls) -> Self {
        let last_page = last_page(total, per_page);
        let skipped = offset(current_page, per_page);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            (Some(skipped + 1), Some(skipped + data.len() as u64))
        };

        let prev_page_url = (current_page > 1).then(|| urls.url(current_page - 1));
        let next_page_url = (current_page < last_page).then(|| urls.url(current_page + 1));

        let mut links = Vec::new();
        links.push(PageLink {
            url: prev_page_url.clone(),
            label: PREVIOUS_LABEL.to_string(),
            active: false,
        });
        for slot in link_window(current_page, last_page) {
            links.push(match slot {
                Some(page) => PageLink {
                    url: Some(urls.url(page)),
                    label: page.to_string(),
                    active: page == current_page,
                },
                None => PageLink {
                    url: None,
                    label: GAP_LABEL.to_string(),
                    active: false,
                },
            });
        }
        links.push(PageLink {
            url: next_page_url.clone(),
            label: NEXT_LABEL.to_string(),
            active: false,
        });

        Self {
            current_page,
            data,
            first_page_url: urls.url(1),
            from,
            last_page,
            last_page_url: urls.url(last_page),
            links,
            next_page_url,
            path: urls.path().to_string(),
            per_page,
            prev_page_url,
            to,
            total,
        }
    }
}

/// An empty result set still has one (empty) page.
pub fn last_page(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Page numbers to render between the previous/next links. `None` marks a gap.
pub fn link_window(current: u64, last: u64) -> Vec<Option<u64>> {
    if last < ON_EACH_SIDE * 2 + 8 {
        return (1..=last).map(Some).collect();
    }

    let window = ON_EACH_SIDE + 4;
    let start = 1..=2;
    let finish = last - 1..=last;

    let groups: Vec<std::ops::RangeInclusive<u64>> = if current <= window {
        vec![1..=window + ON_EACH_SIDE, finish]
    } else if current > last - window {
        vec![start, last - (window + ON_EACH_SIDE - 1)..=last]
    } else {
        vec![start, current - ON_EACH_SIDE..=current + ON_EACH_SIDE, finish]
    };

    let mut slots = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        if i > 0 {
            slots.push(None);
        }
        slots.extend(group.map(Some));
    }
    slots
}
