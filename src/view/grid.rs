//! Columns, rows and the pagination footer of the politicians grid.

use super::currency::format_eur;
use crate::api::types::Politician;
use crate::search::PaginationState;

pub const SEARCH_PLACEHOLDER: &str = "Search politicians...";
pub const GENDER_PICKER_LABEL: &str = "Filtrar genero";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub align: Align,
    /// Relative width used when laying out the table.
    pub weight: u16,
}

const fn col(header: &'static str, align: Align, weight: u16) -> Column {
    Column {
        header,
        align,
        weight,
    }
}

pub const COLUMNS: [Column; 8] = [
    col("Nombre", Align::Left, 20),
    col("Género", Align::Left, 7),
    col("Partido", Align::Left, 12),
    col("Cargo", Align::Left, 16),
    col("CCAA", Align::Left, 10),
    col("Retribución Mensual", Align::Right, 12),
    col("Retribución Anual", Align::Right, 12),
    col("Observaciones", Align::Left, 11),
];

/// Display text of each column for one record.
pub fn row_cells(p: &Politician) -> [String; 8] {
    [
        p.name.clone(),
        p.gender.clone(),
        p.party.clone(),
        p.role.clone(),
        p.region.clone(),
        format_eur(p.monthly_pay),
        format_eur(p.annual_pay),
        p.remarks.clone().unwrap_or_default(),
    ]
}

/// State of the grid's pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationFooter {
    /// 1-based page being shown.
    pub page: u32,
    /// Pages reported by the server, at least 1 for display.
    pub total_pages: u32,
    pub page_size: u32,
    pub can_previous: bool,
    pub can_next: bool,
}

impl PaginationFooter {
    /// `total_pages` of 0 displays as 1. Next is available only while the
    /// current page is before the last; a page past the end can still go
    /// back.
    pub fn new(state: PaginationState, total_pages: u32) -> Self {
        let page = state.page_index.saturating_add(1);
        Self {
            page,
            total_pages: total_pages.max(1),
            page_size: state.page_size,
            can_previous: page > 1,
            can_next: page < total_pages,
        }
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}
