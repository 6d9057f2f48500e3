//! Navigation chrome: the two top-level routes.

use crate::search::descriptor::POLITICIANS_PATH;

pub const STATISTICS_PATH: &str = "/statistics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Politicians,
    Statistics,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Politicians, Route::Statistics];

    pub fn title(self) -> &'static str {
        match self {
            Route::Politicians => "Politicians",
            Route::Statistics => "Statistics",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Politicians => POLITICIANS_PATH,
            Route::Statistics => STATISTICS_PATH,
        }
    }

    /// Route of a URL by its path; anything unknown lands on the grid.
    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        // absolute URLs: keep only the path
        let path = match path.find("://") {
            Some(scheme_end) => {
                let rest = &path[scheme_end + 3..];
                rest.find('/').map(|i| &rest[i..]).unwrap_or("")
            }
            None => path,
        };
        if path == STATISTICS_PATH {
            Route::Statistics
        } else {
            Route::Politicians
        }
    }

    pub fn index(self) -> usize {
        match self {
            Route::Politicians => 0,
            Route::Statistics => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Route::Politicians => Route::Statistics,
            Route::Statistics => Route::Politicians,
        }
    }
}
