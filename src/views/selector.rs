//! Case picker with client-side filtering.
//!
//! The full case list is loaded once and filtered locally; there is no
//! server-side search or pagination.

use crate::api::services::CaseService;
use crate::types::{Case, CaseId, Result};
use tracing::error;

/// Case-insensitive substring match over the social-insurance number and the
/// beneficiary's last and first names. An empty filter matches everything.
pub fn matches_filter(case: &Case, filter: &str) -> bool {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    if case.social_security_number.to_lowercase().contains(&needle) {
        return true;
    }

    case.beneficiary.as_ref().is_some_and(|b| {
        b.last_name.to_lowercase().contains(&needle)
            || b.first_name.to_lowercase().contains(&needle)
    })
}

/// `SSN - Last First`
pub fn case_label(case: &Case) -> String {
    format!("{} - {}", case.social_security_number, case.beneficiary_name())
        .trim_end_matches(&[' ', '-'][..])
        .to_string()
}

pub struct CaseSelector {
    cases: CaseService,
    all: Vec<Case>,
    filter: String,
    selected: Option<CaseId>,
    loading: bool,
}

impl CaseSelector {
    pub fn new(cases: CaseService) -> Self {
        Self {
            cases,
            all: Vec::new(),
            filter: String::new(),
            selected: None,
            loading: false,
        }
    }

    /// Fetch the full case list. On failure the list is left empty.
    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.cases.list().await;
        self.loading = false;

        match result {
            Ok(cases) => {
                self.all = cases;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load cases for selection: {}", e);
                self.all.clear();
                Err(e)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Cases matching the current filter, in backend order.
    pub fn options(&self) -> Vec<&Case> {
        self.all
            .iter()
            .filter(|case| matches_filter(case, &self.filter))
            .collect()
    }

    /// Select a case (or clear with `None`) and yield the id to the caller.
    pub fn select(&mut self, id: Option<CaseId>) -> Option<CaseId> {
        self.selected = id.filter(|id| self.all.iter().any(|c| c.id == Some(*id)));
        self.selected
    }

    pub fn selected(&self) -> Option<CaseId> {
        self.selected
    }

    pub fn selected_case(&self) -> Option<&Case> {
        let id = self.selected?;
        self.all.iter().find(|c| c.id == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Beneficiary, CaseStatus};
    use rstest::rstest;

    fn case(ssn: &str, last: &str, first: &str) -> Case {
        let mut case = Case::draft(
            ssn,
            Beneficiary {
                last_name: last.to_string(),
                first_name: first.to_string(),
                ..Default::default()
            },
        );
        case.status = CaseStatus::InProgress;
        case
    }

    #[rstest]
    #[case("", true)]
    #[case("123", true)]
    #[case("DUPONT", true)]
    #[case("jean", true)]
    #[case("martin", false)]
    #[case("999", false)]
    fn test_matches_filter(#[case] filter: &str, #[case] expected: bool) {
        let c = case("1850712345678", "Dupont", "Jean");
        assert_eq!(matches_filter(&c, filter), expected);
    }

    #[test]
    fn test_filter_without_beneficiary() {
        let mut c = case("2A123", "x", "y");
        c.beneficiary = None;
        assert!(matches_filter(&c, "2a1"));
        assert!(!matches_filter(&c, "x"));
    }

    #[test]
    fn test_case_label() {
        assert_eq!(
            case_label(&case("1850712345678", "Dupont", "Jean")),
            "1850712345678 - Dupont Jean"
        );
        let mut bare = case("42", "", "");
        bare.beneficiary = None;
        assert_eq!(case_label(&bare), "42");
    }
}
