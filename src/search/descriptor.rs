//! The canonical query behind the politicians grid and its URL form.

use std::fmt;

use crate::api::types::{Gender, ListParams};

pub const POLITICIANS_PATH: &str = "/politicians";
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Page sizes offered by the grid's size selector.
pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

/// What the grid shows: one page of an optionally filtered listing.
///
/// `page` and `per_page` are always at least 1. An empty name is stored as
/// `None` so that "no search" has a single representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    pub page: u32,
    pub per_page: u32,
    pub name: Option<String>,
    pub gender: Option<Gender>,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::with_per_page(DEFAULT_PER_PAGE)
    }
}

impl QueryDescriptor {
    pub fn with_per_page(per_page: u32) -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: per_page.max(1),
            name: None,
            gender: None,
        }
    }

    /// Parse the query part of a URL. Unknown keys are ignored; missing,
    /// malformed or out-of-range values fall back to defaults.
    pub fn from_query(query: &str, default_per_page: u32) -> Self {
        let mut descriptor = Self::with_per_page(default_per_page);
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    if let Some(page) = parse_positive(&value) {
                        descriptor.page = page;
                    }
                }
                "perPage" => {
                    if let Some(per_page) = parse_positive(&value) {
                        descriptor.per_page = per_page;
                    }
                }
                "name" => descriptor.name = normalize_name(&value),
                "gender" => descriptor.gender = value.parse().ok(),
                _ => {}
            }
        }
        descriptor
    }

    /// Parse a relative (`/politicians?page=2`) or absolute URL.
    pub fn from_url(url: &str, default_per_page: u32) -> Self {
        let without_fragment = url.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((_, query)) => Self::from_query(query, default_per_page),
            None => Self::with_per_page(default_per_page),
        }
    }

    /// Canonical query string. `page` and `perPage` are always present,
    /// `name` and `gender` only when set.
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("page", &self.page.to_string());
        serializer.append_pair("perPage", &self.per_page.to_string());
        if let Some(name) = &self.name {
            serializer.append_pair("name", name);
        }
        if let Some(gender) = self.gender {
            serializer.append_pair("gender", gender.as_str());
        }
        serializer.finish()
    }

    pub fn to_url(&self) -> String {
        format!("{}?{}", POLITICIANS_PATH, self.to_query())
    }

    pub fn to_list_params(&self) -> ListParams {
        ListParams {
            page: Some(self.page),
            per_page: Some(self.per_page),
            name: self.name.clone(),
            party: None,
            gender: self.gender,
        }
    }

    pub fn pagination(&self) -> PaginationState {
        PaginationState {
            page_index: self.page.saturating_sub(1),
            page_size: self.per_page,
        }
    }

    /// The descriptor after a committed name search: first page, same
    /// page size and gender.
    pub fn searched(&self, term: &str) -> Self {
        Self {
            page: DEFAULT_PAGE,
            name: normalize_name(term),
            ..self.clone()
        }
    }

    pub fn filtered(&self, gender: Gender) -> Self {
        Self {
            page: DEFAULT_PAGE,
            gender: Some(gender),
            ..self.clone()
        }
    }

    /// The descriptor reflecting a grid pagination state.
    pub fn paginated(&self, state: PaginationState) -> Self {
        Self {
            page: state.page_index.saturating_add(1),
            per_page: state.page_size.max(1),
            ..self.clone()
        }
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// The grid's zero-based view of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaginationState {
    pub page_index: u32,
    pub page_size: u32,
}

impl PaginationState {
    pub fn next(self) -> Self {
        Self {
            page_index: self.page_index.saturating_add(1),
            ..self
        }
    }

    pub fn previous(self) -> Self {
        Self {
            page_index: self.page_index.saturating_sub(1),
            ..self
        }
    }

    /// Same position in a new page size; returns to the first page.
    pub fn resized(self, page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

fn normalize_name(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Next entry of [`PAGE_SIZES`] after `current`, wrapping around.
pub fn next_page_size(current: u32) -> u32 {
    PAGE_SIZES
        .iter()
        .copied()
        .find(|size| *size > current)
        .unwrap_or(PAGE_SIZES[0])
}
