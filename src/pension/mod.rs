//! Monthly pension estimation.
//!
//! The backend calculation is authoritative. When it cannot be reached the
//! estimator computes a simplified local figure from the case's careers and
//! labels it [`EstimateSource::LocalFallback`]. The local rule mirrors the
//! backend's and is not reconciled with it, so the two can drift apart.
//!
//! Local rule:
//!
//! ```text
//! average salary = mean of career average salaries (unweighted)
//! quarters       = sum of validated quarters (absent = 0)
//! rate (%)       = min(50, quarters / 172 * 50)
//! amount         = round(average salary * rate / 100)
//! ```

use crate::api::services::CaseService;
use crate::types::{Career, CaseId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tracing::warn;

/// Quarters needed for the full rate.
pub const FULL_RATE_QUARTERS: u32 = 172;

/// Full pension rate, in percent.
pub const FULL_RATE_PERCENT: f64 = 50.0;

/// Backend response of the pension calculation endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PensionCalculation {
    #[serde(rename = "montant", default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PensionDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PensionDetails {
    #[serde(rename = "salaireMoyenAnnuel", default)]
    pub average_salary: f64,
    #[serde(rename = "trimestresValides", default)]
    pub validated_quarters: u32,
    /// Percentage, two decimals.
    #[serde(rename = "tauxPension", default)]
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    Server,
    /// Simplified client-side approximation of the server rule.
    LocalFallback,
}

impl fmt::Display for EstimateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateSource::Server => f.write_str("server calculation"),
            EstimateSource::LocalFallback => {
                f.write_str("local fallback estimate (approximation)")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PensionEstimate {
    /// Monthly amount, whole currency units.
    pub amount: f64,
    pub details: PensionDetails,
    pub source: EstimateSource,
}

impl PensionEstimate {
    pub fn is_fallback(&self) -> bool {
        self.source == EstimateSource::LocalFallback
    }
}

impl From<PensionCalculation> for PensionEstimate {
    fn from(calc: PensionCalculation) -> Self {
        Self {
            amount: calc.amount,
            details: calc.details.unwrap_or_default(),
            source: EstimateSource::Server,
        }
    }
}

/// Pension rate in percent for a quarter count, capped at the full rate.
pub fn pension_rate(quarters: u32) -> f64 {
    let rate = f64::from(quarters) / f64::from(FULL_RATE_QUARTERS) * FULL_RATE_PERCENT;
    rate.min(FULL_RATE_PERCENT)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Client-side estimate from career records.
pub fn estimate_locally(careers: &[Career]) -> PensionEstimate {
    if careers.is_empty() {
        return PensionEstimate {
            amount: 0.0,
            details: PensionDetails::default(),
            source: EstimateSource::LocalFallback,
        };
    }

    let total_salary: f64 = careers.iter().map(|c| c.average_salary).sum();
    let average_salary = total_salary / careers.len() as f64;
    let quarters: u32 = careers
        .iter()
        .map(|c| c.validated_quarters.unwrap_or(0))
        .sum();
    let rate = pension_rate(quarters);

    PensionEstimate {
        amount: (average_salary * rate / 100.0).round(),
        details: PensionDetails {
            average_salary: average_salary.round(),
            validated_quarters: quarters,
            rate: round_to_cents(rate),
        },
        source: EstimateSource::LocalFallback,
    }
}

/// Server-preferred estimator.
#[derive(Clone)]
pub struct PensionEstimator {
    cases: CaseService,
}

impl PensionEstimator {
    pub fn new(cases: CaseService) -> Self {
        Self { cases }
    }

    /// Ask the backend first; on any failure fall back to the local rule over
    /// the careers `load_careers` yields. Careers are only loaded for the
    /// fallback.
    pub async fn estimate<F, Fut>(&self, case_id: CaseId, load_careers: F) -> PensionEstimate
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Career>>,
    {
        match self.cases.calculate_pension(case_id).await {
            Ok(calc) => calc.into(),
            Err(e) => {
                warn!(case_id, "Server pension calculation failed, using local estimate: {}", e);
                estimate_locally(&load_careers().await)
            }
        }
    }
}
