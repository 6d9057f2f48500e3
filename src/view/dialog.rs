//! Row-action and import dialogs.
//!
//! A dialog owns its mutation's pending flag: a second submit while one is
//! in flight is refused, success closes the dialog, failure keeps it open
//! with the message shown.

use std::path::PathBuf;

use crate::api::types::{Politician, PoliticianUpdate};
use crate::service::MutationOutcome;

/// Pending flag and last error of a dialog's mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    pending: bool,
    error: Option<String>,
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a mutation as started. False if one is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        self.error = None;
        true
    }

    /// Record the outcome. Returns true when the dialog should close.
    pub fn settle(&mut self, outcome: &MutationOutcome) -> bool {
        self.pending = false;
        match outcome {
            MutationOutcome::Done(_) => true,
            MutationOutcome::Failed(message) => {
                self.error = Some(message.clone());
                false
            }
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.pending = false;
        self.error = Some(message.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Party,
    Role,
    Region,
    MonthlyPay,
    AnnualPay,
    Remarks,
}

impl EditField {
    pub const ALL: [EditField; 6] = [
        EditField::Party,
        EditField::Role,
        EditField::Region,
        EditField::MonthlyPay,
        EditField::AnnualPay,
        EditField::Remarks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::Party => "Partido",
            EditField::Role => "Cargo",
            EditField::Region => "CCAA",
            EditField::MonthlyPay => "Retribución mensual",
            EditField::AnnualPay => "Remuneración anual",
            EditField::Remarks => "Observaciones",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            EditField::Party => "Añade un partido",
            EditField::Role => "Añade un cargo",
            EditField::Region => "Añade una comunidad autonoma",
            EditField::MonthlyPay => "Añade una retribución mensual",
            EditField::AnnualPay => "Añade una retribución anual",
            EditField::Remarks => "Añade una observacion",
        }
    }

    fn is_amount(self) -> bool {
        matches!(self, EditField::MonthlyPay | EditField::AnnualPay)
    }

    fn initial(self, p: &Politician) -> String {
        match self {
            EditField::Party => p.party.clone(),
            EditField::Role => p.role.clone(),
            EditField::Region => p.region.clone(),
            EditField::MonthlyPay => format_amount(p.monthly_pay),
            EditField::AnnualPay => format_amount(p.annual_pay),
            EditField::Remarks => p.remarks.clone().unwrap_or_default(),
        }
    }
}

/// What a submit should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submit<T> {
    /// Send the request.
    Send(T),
    /// A mutation is already in flight.
    Refused,
    /// Input rejected before any request; the dialog shows why.
    Invalid(String),
    /// Nothing changed; the dialog can close without a request.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct EditDialog {
    pub politician: Politician,
    values: Vec<String>,
    focus: usize,
    pub state: MutationState,
}

impl EditDialog {
    pub fn new(politician: Politician) -> Self {
        let values = EditField::ALL
            .iter()
            .map(|f| f.initial(&politician))
            .collect();
        Self {
            politician,
            values,
            focus: 0,
            state: MutationState::default(),
        }
    }

    pub fn title(&self) -> String {
        format!("Edit {} data", self.politician.name)
    }

    pub fn confirm_label(&self) -> &'static str {
        if self.state.is_pending() {
            "Updating..."
        } else {
            "Confirm"
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (EditField, &str)> {
        EditField::ALL
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn focused(&self) -> EditField {
        EditField::ALL[self.focus]
    }

    pub fn value(&self, field: EditField) -> &str {
        &self.values[field_index(field)]
    }

    pub fn set_value(&mut self, field: EditField, value: impl Into<String>) {
        self.values[field_index(field)] = value.into();
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % EditField::ALL.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + EditField::ALL.len() - 1) % EditField::ALL.len();
    }

    pub fn push_char(&mut self, c: char) {
        self.values[self.focus].push(c);
    }

    pub fn pop_char(&mut self) {
        self.values[self.focus].pop();
    }

    /// The partial update made of the fields that differ from the record.
    pub fn build_update(&self) -> Result<PoliticianUpdate, String> {
        let mut update = PoliticianUpdate::default();
        for (field, value) in self.fields() {
            if value == field.initial(&self.politician) {
                continue;
            }
            if field.is_amount() {
                let amount = parse_amount(value)
                    .ok_or_else(|| format!("{}: '{}' is not a valid amount", field.label(), value))?;
                match field {
                    EditField::MonthlyPay => update.monthly_pay = Some(amount),
                    _ => update.annual_pay = Some(amount),
                }
                continue;
            }
            let text = value.to_string();
            match field {
                EditField::Party => update.party = Some(text),
                EditField::Role => update.role = Some(text),
                EditField::Region => update.region = Some(text),
                _ => update.remarks = Some(text),
            }
        }
        Ok(update)
    }

    pub fn submit(&mut self) -> Submit<(String, PoliticianUpdate)> {
        if self.state.is_pending() {
            return Submit::Refused;
        }
        let update = match self.build_update() {
            Ok(u) => u,
            Err(message) => {
                self.state.fail(message.clone());
                return Submit::Invalid(message);
            }
        };
        if update.is_empty() {
            return Submit::Unchanged;
        }
        self.state.begin();
        Submit::Send((self.politician.id.clone(), update))
    }
}

fn field_index(field: EditField) -> usize {
    EditField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default()
}

/// Plain decimal rendering for editing, e.g. `3500.5`.
fn format_amount(value: f64) -> String {
    value.to_string()
}

/// Accept `3500.50`, `3500,50` and `3.500,50`.
///
/// Without a comma `.` is the decimal point, except that `3.500` is refused:
/// it reads as three thousand five hundred in Spanish grouping.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim().trim_end_matches('€').trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        let ambiguous = trimmed.rsplit_once('.').is_some_and(|(_, fraction)| {
            fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit())
        });
        if ambiguous {
            return None;
        }
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub const DELETE_TITLE: &str = "Are you absolutely sure?";
pub const DELETE_DESCRIPTION: &str =
    "This action cannot be undone. This will permanently delete this politician entry";

#[derive(Debug, Clone)]
pub struct DeleteDialog {
    pub id: String,
    pub name: String,
    pub state: MutationState,
}

impl DeleteDialog {
    pub fn new(politician: &Politician) -> Self {
        Self {
            id: politician.id.clone(),
            name: politician.name.clone(),
            state: MutationState::default(),
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        if self.state.is_pending() {
            "Deleting..."
        } else {
            "Delete"
        }
    }

    pub fn submit(&mut self) -> Submit<String> {
        if !self.state.begin() {
            return Submit::Refused;
        }
        Submit::Send(self.id.clone())
    }
}

/// Bulk CSV import, offered from the empty state and the toolbar.
#[derive(Debug, Clone, Default)]
pub struct ImportDialog {
    pub path: String,
    pub state: MutationState,
}

impl ImportDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button_label(&self) -> &'static str {
        if self.state.is_pending() {
            "..."
        } else {
            "Import CSV"
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.path.push(c);
    }

    pub fn pop_char(&mut self) {
        self.path.pop();
    }

    pub fn submit(&mut self) -> Submit<PathBuf> {
        if self.state.is_pending() {
            return Submit::Refused;
        }
        let path = self.path.trim();
        if path.is_empty() {
            let message = "Choose a CSV file to import".to_string();
            self.state.fail(message.clone());
            return Submit::Invalid(message);
        }
        let path = PathBuf::from(path);
        self.state.begin();
        Submit::Send(path)
    }
}
