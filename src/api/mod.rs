//! REST API Client and Domain Services
//!
//! This module is the only place that talks to the case-management backend.
//!
//! # Module Structure
//!
//! - [`api::client`](crate::api::client) - Gateway client: bearer token, status mapping, 401 redirect
//! - [`api::services`](crate::api::services) - One typed service per backend resource
//!
//! # Backend Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `GET /api/auth/me` - Current user probe
//! - `POST /api/auth/logout` - Terminate the backend session
//!
//! ## Cases (`/api/dossiers`)
//! - `GET /api/dossiers` - List cases
//! - `GET /api/dossiers/statut/{status}` - List cases in one status
//! - `POST /api/dossiers` - Create a case
//! - `GET|PUT|DELETE /api/dossiers/{id}` - Read, update, delete a case
//! - `PUT /api/dossiers/{id}/statut` - Change case status
//! - `POST /api/dossiers/{id}/calculate-pension` - Server pension calculation
//!
//! ## Careers (`/api/carrieres`)
//! - `GET /api/carrieres` - List careers
//! - `GET|POST /api/carrieres/dossier/{caseId}` - Careers of a case
//! - `GET|PUT|DELETE /api/carrieres/{id}` - Read, update, delete a career
//!
//! ## Payments (`/api/paiements`)
//! - `GET|POST /api/paiements` - List or create payments
//! - `GET /api/paiements/dossier/{caseId}` - Payments of a case
//! - `PUT|DELETE /api/paiements/{id}` - Update or delete a payment
//!
//! ## Documents (`/api/documents`)
//! - `POST /api/documents/upload/{caseId}` - Multipart upload
//! - `GET /api/documents/dossier/{caseId}` - Documents of a case
//! - `GET /api/documents/{id}/download` - Binary content
//! - `GET|PUT|DELETE /api/documents/{id}` - Read, update, delete metadata
//!
//! ## Reporting (`/api/reporting`)
//! - `GET /api/reporting/dashboard-stats` - Aggregate figures
//! - `GET /api/reporting/monthly-stats` - Cases created per month
//!
//! # Authentication
//!
//! When a token is stored it is sent on every request:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Gateway client shared by every service.
pub mod client;
/// Typed services per backend resource.
pub mod services;

pub use client::ApiClient;
pub use services::Services;
