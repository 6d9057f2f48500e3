//! Unit tests for the presentation models
//!
//! Tests cover:
//! - Euro formatting in the Spanish locale
//! - Pagination footer edge cases
//! - Dialog lifecycles around a mutation outcome

use politicos::search::PaginationState;
use politicos::service::MutationOutcome;
use politicos::view::currency::format_eur;
use politicos::view::dialog::{DeleteDialog, EditDialog, EditField, ImportDialog, Submit};
use politicos::view::grid::{row_cells, PaginationFooter};
use politicos::view::nav::Route;
use politicos::Politician;

fn politician() -> Politician {
    serde_json::from_value(serde_json::json!({
        "_id": "p1",
        "nombre": "Jane Doe",
        "genero": "Mujer",
        "partido": "PA",
        "cargo": "Alcaldesa",
        "ccaa": "Aragón",
        "retribucionmensual": 1234.5,
        "retribucionanual": 1234567.891,
        "observaciones": "Dedicación exclusiva"
    }))
    .unwrap()
}

mod currency_tests {
    use super::*;

    #[test]
    fn test_grouping_and_decimals() {
        assert_eq!(format_eur(1234567.891), "1.234.567,89 €");
        assert_eq!(format_eur(50000.0), "50.000,00 €");
        assert_eq!(format_eur(0.0), "0,00 €");
    }

    #[test]
    fn test_four_digit_amounts_are_not_grouped() {
        assert_eq!(format_eur(1234.5), "1234,50 €");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_eur(-1500.25), "-1500,25 €");
        assert_eq!(format_eur(-0.0), "0,00 €");
    }

    #[test]
    fn test_row_cells_use_currency() {
        let cells = row_cells(&politician());
        assert_eq!(cells[0], "Jane Doe");
        assert_eq!(cells[5], "1234,50 €");
        assert_eq!(cells[6], "1.234.567,89 €");
        assert_eq!(cells[7], "Dedicación exclusiva");
    }
}

mod footer_tests {
    use super::*;

    fn footer(page_index: u32, total_pages: u32) -> PaginationFooter {
        PaginationFooter::new(
            PaginationState {
                page_index,
                page_size: 10,
            },
            total_pages,
        )
    }

    #[test]
    fn test_zero_pages_shows_one() {
        let f = footer(0, 0);
        assert_eq!(f.label(), "Page 1 of 1");
        assert!(!f.can_previous);
        assert!(!f.can_next);
    }

    #[test]
    fn test_middle_page() {
        let f = footer(1, 3);
        assert!(f.can_previous);
        assert!(f.can_next);
    }

    #[test]
    fn test_past_the_end_can_go_back_only() {
        let f = footer(6, 3);
        assert_eq!(f.label(), "Page 7 of 3");
        assert!(f.can_previous);
        assert!(!f.can_next);
    }
}

mod dialog_tests {
    use super::*;

    #[test]
    fn test_edit_failure_then_retry() {
        let mut dialog = EditDialog::new(politician());
        dialog.set_value(EditField::Region, "Madrid");
        assert!(matches!(dialog.submit(), Submit::Send(_)));

        let close = dialog
            .state
            .settle(&MutationOutcome::Failed("Failed to update politician".to_string()));
        assert!(!close);
        assert_eq!(dialog.confirm_label(), "Confirm");
        assert_eq!(dialog.value(EditField::Region), "Madrid");

        match dialog.submit() {
            Submit::Send((id, update)) => {
                assert_eq!(id, "p1");
                assert_eq!(update.region.as_deref(), Some("Madrid"));
            }
            other => panic!("unexpected submit {:?}", other),
        }
    }

    #[test]
    fn test_delete_labels_follow_pending() {
        let mut dialog = DeleteDialog::new(&politician());
        assert_eq!(dialog.confirm_label(), "Delete");
        dialog.submit();
        assert_eq!(dialog.confirm_label(), "Deleting...");
        assert!(dialog.state.settle(&MutationOutcome::Done("ok".to_string())));
    }

    #[test]
    fn test_import_button_label() {
        let mut dialog = ImportDialog::new();
        assert_eq!(dialog.button_label(), "Import CSV");
        "a.csv".chars().for_each(|c| dialog.push_char(c));
        dialog.submit();
        assert_eq!(dialog.button_label(), "...");
    }
}

mod nav_tests {
    use super::*;

    #[test]
    fn test_routes() {
        assert_eq!(Route::default(), Route::Politicians);
        assert_eq!(Route::from_url("/statistics"), Route::Statistics);
        assert_eq!(Route::from_url("/politicians?page=9"), Route::Politicians);
        assert_eq!(Route::ALL.map(|r| r.title()), ["Politicians", "Statistics"]);
    }
}
