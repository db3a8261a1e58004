//! View state for the case screens.
//!
//! Views own their rows and are driven through `&mut self`, so one view never
//! has two requests in flight; a later response cannot overwrite a newer
//! selection.

/// Confirmation prompts for destructive actions.
pub mod confirm;
/// Single-case detail view.
pub mod detail;
/// Resource bindings for the scoped list.
pub mod resources;
/// Scoped list state machine.
pub mod scoped;
/// Case picker.
pub mod selector;

pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use detail::{CaseDetail, DetailOutcome};
pub use resources::{
    career_regime_breakdown, payment_total, payment_type_breakdown, recent_payments,
};
pub use scoped::{ScopedList, ScopedResource, ViewState};
pub use selector::{case_label, matches_filter, CaseSelector};
