//! Domain services, one per backend resource.
//!
//! Each service maps its functions 1:1 to REST endpoints. No caching and no
//! retries: every call goes to the network. Form-shaped inputs are validated
//! before dispatch so an invalid entity never produces a request.

/// Current-user probe and backend logout.
pub mod auth;
/// Career records, scoped to a case.
pub mod careers;
/// Retirement cases, status transitions and server-side pension calculation.
pub mod cases;
/// Document metadata, uploads and downloads.
pub mod documents;
/// Payments, scoped to a case.
pub mod payments;
/// Aggregate dashboard figures.
pub mod reporting;

pub use auth::AuthService;
pub use careers::CareerService;
pub use cases::CaseService;
pub use documents::DocumentService;
pub use payments::PaymentService;
pub use reporting::ReportingService;

use super::client::ApiClient;
use std::sync::Arc;

/// All domain services sharing one gateway client.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub cases: CaseService,
    pub careers: CareerService,
    pub payments: PaymentService,
    pub documents: DocumentService,
    pub reporting: ReportingService,
}

impl Services {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            cases: CaseService::new(client.clone()),
            careers: CareerService::new(client.clone()),
            payments: PaymentService::new(client.clone()),
            documents: DocumentService::new(client.clone()),
            reporting: ReportingService::new(client),
        }
    }
}
