//! Presentation models.
//!
//! Plain state derived from fetch outcomes; the terminal UI and the CLI both
//! render from these.

pub mod currency;
pub mod dialog;
pub mod grid;
pub mod nav;

use crate::api::types::{PageResult, Statistics, TopSalary};
use crate::api::ApiResult;
use currency::format_eur;

pub const EMPTY_MESSAGE: &str = "No politicians data";
pub const ERROR_HEADING: &str = "Error:";

/// What the grid area shows for a list fetch outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Rows(PageResult),
    /// Zero records: the empty state with the import button.
    Empty { total_pages: u32 },
    Error(String),
}

impl ListView {
    pub fn from_result(result: ApiResult<PageResult>) -> Self {
        match result {
            Ok(page) if page.is_empty() => ListView::Empty {
                total_pages: page.total_pages,
            },
            Ok(page) => ListView::Rows(page),
            Err(e) => ListView::Error(e.user_message()),
        }
    }

    pub fn total_pages(&self) -> u32 {
        match self {
            ListView::Rows(page) => page.total_pages,
            ListView::Empty { total_pages } => *total_pages,
            _ => 0,
        }
    }

    pub fn rows(&self) -> &[crate::api::types::Politician] {
        match self {
            ListView::Rows(page) => &page.records,
            _ => &[],
        }
    }
}

pub const MEAN_LABEL: &str = "Salario medio";
pub const MEDIAN_LABEL: &str = "Mediana de salarios";
pub const TOP_HEADING: &str = "Top 10 salarios Estado Español";

/// One line of the top salaries ranking, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSalary {
    pub rank: usize,
    pub name: String,
    pub role: String,
    pub annual_pay: String,
}

/// The statistics card.
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticsView {
    Loading,
    Summary {
        mean: String,
        median: String,
        top: Vec<RankedSalary>,
    },
    /// No data or a failed fetch; shows the empty placeholder.
    Empty,
}

impl StatisticsView {
    /// A failed fetch renders the placeholder rather than an error box.
    pub fn from_result(result: ApiResult<Statistics>) -> Self {
        match result {
            Ok(stats) if !stats.is_empty() => Self::summary(&stats),
            Ok(_) => StatisticsView::Empty,
            Err(e) => {
                tracing::warn!("statistics unavailable: {}", e);
                StatisticsView::Empty
            }
        }
    }

    fn summary(stats: &Statistics) -> Self {
        StatisticsView::Summary {
            mean: format_eur(stats.mean_salary),
            median: format_eur(stats.median_salary),
            top: rank(&stats.top_salaries),
        }
    }
}

fn rank(top: &[TopSalary]) -> Vec<RankedSalary> {
    top.iter()
        .take(Statistics::TOP_LIMIT)
        .enumerate()
        .map(|(i, t)| RankedSalary {
            rank: i + 1,
            name: t.name.clone(),
            role: t.role.clone(),
            annual_pay: format_eur(t.annual_pay),
        })
        .collect()
}
