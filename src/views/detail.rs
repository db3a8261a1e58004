//! Single-case detail view.

use crate::api::services::{CareerService, CaseService};
use crate::pension::{estimate_locally, PensionEstimate, PensionEstimator};
use crate::types::{AppError, Career, Case, CaseId, CasePatch, CaseStatus, Result};
use tracing::{error, warn};

/// Where the view ends up after loading.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Show(Box<Case>),
    /// The case could not be loaded; go back to the case list.
    BackToList,
}

pub struct CaseDetail {
    cases: CaseService,
    careers: CareerService,
    case: Option<Case>,
}

impl CaseDetail {
    pub fn new(cases: CaseService, careers: CareerService) -> Self {
        Self {
            cases,
            careers,
            case: None,
        }
    }

    pub fn case(&self) -> Option<&Case> {
        self.case.as_ref()
    }

    pub async fn load(&mut self, id: CaseId) -> DetailOutcome {
        match self.cases.get(id).await {
            Ok(case) => {
                self.case = Some(case.clone());
                DetailOutcome::Show(Box::new(case))
            }
            Err(e) => {
                error!(case_id = id, "Failed to load case: {}", e);
                self.case = None;
                DetailOutcome::BackToList
            }
        }
    }

    fn loaded(&self) -> Result<(&Case, CaseId)> {
        self.case
            .as_ref()
            .and_then(|c| c.id.map(|id| (c, id)))
            .ok_or_else(|| AppError::Validation("no case loaded".to_string()))
    }

    pub async fn update_status(&mut self, status: CaseStatus) -> Result<&Case> {
        let (_, id) = self.loaded()?;
        let updated = self.cases.update_status(id, status).await?;
        Ok(self.case.insert(updated))
    }

    pub async fn update(&mut self, patch: &CasePatch) -> Result<&Case> {
        let (_, id) = self.loaded()?;
        let updated = self.cases.update(id, patch).await?;
        Ok(self.case.insert(updated))
    }

    /// Careers used by the local estimate: the ones embedded in the case,
    /// or fetched when the backend did not embed any.
    async fn careers_for_estimate(&self, case: &Case, id: CaseId) -> Vec<Career> {
        if !case.careers.is_empty() {
            return case.careers.clone();
        }
        match self.careers.by_case(id).await {
            Ok(careers) => careers,
            Err(e) => {
                warn!(case_id = id, "Could not load careers for estimate: {}", e);
                Vec::new()
            }
        }
    }

    /// Server calculation, falling back to the local rule on failure.
    pub async fn estimate(&self, estimator: &PensionEstimator) -> Result<PensionEstimate> {
        let (case, id) = self.loaded()?;
        Ok(estimator
            .estimate(id, || self.careers_for_estimate(case, id))
            .await)
    }

    /// Local rule only, no server call.
    pub async fn estimate_local(&self) -> Result<PensionEstimate> {
        let (case, id) = self.loaded()?;
        let careers = self.careers_for_estimate(case, id).await;
        Ok(estimate_locally(&careers))
    }
}
