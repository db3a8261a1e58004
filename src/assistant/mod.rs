//! Keyword-driven assistant.
//!
//! Messages are matched against an ordered intent table; canned intents reply
//! immediately, live intents fetch from the backend and reply with structured
//! data. The transcript is append-only and carries no state between turns.

/// Ordered keyword intents.
pub mod intents;
/// Structured replies and their text rendering.
pub mod reply;

pub use intents::{classify, Intent};
pub use reply::{CareerSummary, CaseReport, PaymentSummary, Reply};

use crate::api::services::Services;
use crate::types::{AppError, CaseId};
use crate::views::resources::{career_regime_breakdown, recent_payments};
use crate::views::selector::matches_filter;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub body: Reply,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            body: Reply::Text(text.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(body: Reply) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Assistant,
            body,
            timestamp: Utc::now(),
        }
    }
}

pub struct Assistant {
    services: Services,
    transcript: Vec<ChatMessage>,
}

impl Assistant {
    /// A new conversation, opened with a greeting.
    pub fn new(services: Services) -> Self {
        Self {
            services,
            transcript: vec![ChatMessage::assistant(Reply::Text(
                reply::GREETING_TEXT.to_string(),
            ))],
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Append the user's message and the reply, returning the reply.
    pub async fn send(&mut self, message: &str) -> &ChatMessage {
        self.transcript.push(ChatMessage::user(message));
        let body = self.respond(message).await;
        self.transcript.push(ChatMessage::assistant(body));
        &self.transcript[self.transcript.len() - 1]
    }

    /// Reply to one message without touching the transcript.
    pub async fn respond(&self, message: &str) -> Reply {
        let intent = classify(message);
        debug!(?intent, "Assistant intent");

        match intent {
            Some(Intent::Report) => match intents::case_number(message) {
                Some(id) => self.case_report(id).await,
                None => self.live_stats(Reply::GlobalReport).await,
            },
            Some(Intent::Statistics) => self.live_stats(Reply::Statistics).await,
            Some(Intent::CaseSearch) => match intents::search_term(message) {
                Some(term) => self.search_cases(term).await,
                None => Reply::Text(reply::HELP_TEXT.to_string()),
            },
            Some(Intent::Help) => Reply::Text(reply::HELP_TEXT.to_string()),
            Some(Intent::PaymentInfo) => self.payment_summary().await,
            Some(Intent::CareerInfo) => self.career_summary().await,
            Some(Intent::Greeting) => Reply::Text(reply::GREETING_TEXT.to_string()),
            Some(Intent::Thanks) => Reply::Text(reply::THANKS_TEXT.to_string()),
            Some(Intent::PensionInfo) => Reply::Text(reply::PENSION_TEXT.to_string()),
            Some(Intent::QuarterInfo) => Reply::Text(reply::QUARTER_TEXT.to_string()),
            Some(Intent::DocumentInfo) => Reply::Text(reply::DOCUMENT_TEXT.to_string()),
            None => Reply::Text(reply::fallback_text(message)),
        }
    }

    async fn live_stats(&self, wrap: fn(crate::types::DashboardStats) -> Reply) -> Reply {
        match self.services.reporting.dashboard_stats().await {
            Ok(stats) => wrap(stats),
            Err(e) => {
                warn!("Assistant could not load dashboard stats: {}", e);
                Reply::Unavailable
            }
        }
    }

    async fn payment_summary(&self) -> Reply {
        let (stats, payments) = futures::join!(
            self.services.reporting.dashboard_stats(),
            self.services.payments.list(),
        );
        match stats {
            Ok(stats) => Reply::Payments(Box::new(PaymentSummary {
                stats,
                recent: recent_payments(or_empty_all("payments", payments), RECENT_PAYMENTS),
            })),
            Err(e) => {
                warn!("Assistant could not load dashboard stats: {}", e);
                Reply::Unavailable
            }
        }
    }

    async fn career_summary(&self) -> Reply {
        let (stats, careers) = futures::join!(
            self.services.reporting.dashboard_stats(),
            self.services.careers.list(),
        );
        match stats {
            Ok(stats) => Reply::Careers(Box::new(CareerSummary {
                stats,
                by_regime: career_regime_breakdown(&or_empty_all("careers", careers)),
            })),
            Err(e) => {
                warn!("Assistant could not load dashboard stats: {}", e);
                Reply::Unavailable
            }
        }
    }

    async fn search_cases(&self, term: String) -> Reply {
        match self.services.cases.list().await {
            Ok(cases) => Reply::Cases {
                cases: cases
                    .into_iter()
                    .filter(|case| {
                        matches_filter(case, &term)
                            || case.id.is_some_and(|id| id.to_string() == term)
                    })
                    .collect(),
                query: term,
            },
            Err(e) => {
                warn!("Assistant could not load cases: {}", e);
                Reply::Unavailable
            }
        }
    }

    async fn case_report(&self, id: CaseId) -> Reply {
        let case = match self.services.cases.get(id).await {
            Ok(case) => case,
            Err(AppError::NotFound(_)) => return Reply::CaseNotFound(id),
            Err(e) => {
                warn!(case_id = id, "Assistant could not load case: {}", e);
                return Reply::Unavailable;
            }
        };

        let (careers, payments, documents) = futures::join!(
            self.services.careers.by_case(id),
            self.services.payments.by_case(id),
            self.services.documents.by_case(id),
        );

        Reply::CaseReport(Box::new(CaseReport {
            case,
            careers: or_empty(id, "careers", careers),
            payments: or_empty(id, "payments", payments),
            documents: or_empty(id, "documents", documents),
        }))
    }
}

const RECENT_PAYMENTS: usize = 3;

fn or_empty_all<T>(label: &str, result: crate::types::Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Assistant could not load {}: {}", label, e);
        Vec::new()
    })
}

// A missing child list degrades the case report instead of failing it.
fn or_empty<T>(case_id: CaseId, label: &str, result: crate::types::Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(case_id, "Assistant could not load {}: {}", label, e);
            Vec::new()
        }
    }
}
