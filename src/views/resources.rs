//! Resource bindings for [`ScopedList`](super::scoped::ScopedList).

use super::scoped::ScopedResource;
use crate::api::services::{CareerService, CaseService, DocumentService, PaymentService};
use crate::types::{
    Career, CareerPatch, Case, CaseFilter, CaseId, CasePatch, Document, DocumentPatch,
    DocumentUpload, Payment, PaymentPatch, PaymentType, PensionRegime, Result,
};
use async_trait::async_trait;
use std::collections::BTreeMap;

#[async_trait]
impl ScopedResource for CaseService {
    type Scope = CaseFilter;
    type Row = Case;
    type Draft = Case;
    type Patch = CasePatch;

    const NAME: &'static str = "case";

    fn row_id(row: &Case) -> Option<i64> {
        row.id
    }

    async fn fetch(&self, filter: CaseFilter) -> Result<Vec<Case>> {
        match filter.status {
            Some(status) => self.list_by_status(status).await,
            None => self.list().await,
        }
    }

    async fn create(&self, _filter: CaseFilter, draft: &Case) -> Result<Case> {
        CaseService::create(self, draft).await
    }

    async fn update(&self, id: i64, patch: &CasePatch) -> Result<Case> {
        CaseService::update(self, id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        CaseService::delete(self, id).await
    }
}

#[async_trait]
impl ScopedResource for CareerService {
    type Scope = CaseId;
    type Row = Career;
    type Draft = Career;
    type Patch = CareerPatch;

    const NAME: &'static str = "career";

    fn row_id(row: &Career) -> Option<i64> {
        row.id
    }

    async fn fetch(&self, case_id: CaseId) -> Result<Vec<Career>> {
        self.by_case(case_id).await
    }

    async fn create(&self, case_id: CaseId, draft: &Career) -> Result<Career> {
        CareerService::create(self, case_id, draft).await
    }

    async fn update(&self, id: i64, patch: &CareerPatch) -> Result<Career> {
        CareerService::update(self, id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        CareerService::delete(self, id).await
    }
}

#[async_trait]
impl ScopedResource for PaymentService {
    type Scope = CaseId;
    type Row = Payment;
    type Draft = Payment;
    type Patch = PaymentPatch;

    const NAME: &'static str = "payment";

    fn row_id(row: &Payment) -> Option<i64> {
        row.id
    }

    async fn fetch(&self, case_id: CaseId) -> Result<Vec<Payment>> {
        self.by_case(case_id).await
    }

    async fn create(&self, case_id: CaseId, draft: &Payment) -> Result<Payment> {
        PaymentService::create(self, case_id, draft).await
    }

    async fn update(&self, id: i64, patch: &PaymentPatch) -> Result<Payment> {
        PaymentService::update(self, id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        PaymentService::delete(self, id).await
    }
}

#[async_trait]
impl ScopedResource for DocumentService {
    type Scope = CaseId;
    type Row = Document;
    type Draft = DocumentUpload;
    type Patch = DocumentPatch;

    const NAME: &'static str = "document";

    fn row_id(row: &Document) -> Option<i64> {
        row.id
    }

    async fn fetch(&self, case_id: CaseId) -> Result<Vec<Document>> {
        self.by_case(case_id).await
    }

    async fn create(&self, case_id: CaseId, draft: &DocumentUpload) -> Result<Document> {
        self.upload(case_id, draft).await
    }

    async fn update(&self, id: i64, patch: &DocumentPatch) -> Result<Document> {
        DocumentService::update(self, id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        DocumentService::delete(self, id).await
    }
}

/// Number of payments per payment type.
pub fn payment_type_breakdown(payments: &[Payment]) -> BTreeMap<PaymentType, usize> {
    let mut counts = BTreeMap::new();
    for payment in payments {
        *counts.entry(payment.payment_type).or_insert(0) += 1;
    }
    counts
}

/// Sum of payment amounts.
pub fn payment_total(payments: &[Payment]) -> f64 {
    payments.iter().map(|p| p.amount).sum()
}

/// The `count` latest payments by disbursement date, newest first.
pub fn recent_payments(mut payments: Vec<Payment>, count: usize) -> Vec<Payment> {
    payments.sort_by(|a, b| b.disbursement_date.cmp(&a.disbursement_date));
    payments.truncate(count);
    payments
}

/// Number of careers per pension regime.
pub fn career_regime_breakdown(careers: &[Career]) -> BTreeMap<PensionRegime, usize> {
    let mut counts = BTreeMap::new();
    for career in careers {
        *counts.entry(career.regime).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentStatus;
    use chrono::NaiveDate;

    fn payment(amount: f64, payment_type: PaymentType) -> Payment {
        Payment {
            id: None,
            amount,
            disbursement_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            execution_date: None,
            payment_type,
            reference: None,
            status: PaymentStatus::Pending,
            case_id: Some(1),
        }
    }

    #[test]
    fn test_payment_type_breakdown() {
        let payments = vec![
            payment(100.0, PaymentType::Pension),
            payment(50.0, PaymentType::Supplement),
            payment(100.0, PaymentType::Pension),
        ];

        let breakdown = payment_type_breakdown(&payments);
        assert_eq!(breakdown.get(&PaymentType::Pension), Some(&2));
        assert_eq!(breakdown.get(&PaymentType::Supplement), Some(&1));
        assert_eq!(breakdown.get(&PaymentType::Allocation), None);
        assert_eq!(payment_total(&payments), 250.0);
    }

    #[test]
    fn test_recent_payments_newest_first() {
        let mut payments = Vec::new();
        for (day, amount) in [(3, 30.0), (28, 280.0), (1, 10.0), (15, 150.0)] {
            let mut p = payment(amount, PaymentType::Pension);
            p.disbursement_date = NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
            payments.push(p);
        }

        let recent: Vec<f64> = recent_payments(payments, 3).iter().map(|p| p.amount).collect();
        assert_eq!(recent, vec![280.0, 150.0, 30.0]);
        assert!(recent_payments(Vec::new(), 3).is_empty());
    }
}
