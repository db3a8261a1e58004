use crate::types::{Career, Case, CaseId, DashboardStats, Document, Payment, PensionRegime};
use std::collections::BTreeMap;
use std::fmt;

/// Everything gathered for a single-case report.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    pub case: Case,
    pub careers: Vec<Career>,
    pub payments: Vec<Payment>,
    pub documents: Vec<Document>,
}

/// Payment figures with the latest payments, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSummary {
    pub stats: DashboardStats,
    pub recent: Vec<Payment>,
}

/// Career figures with the count per pension regime.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerSummary {
    pub stats: DashboardStats,
    pub by_regime: BTreeMap<PensionRegime, usize>,
}

/// A structured assistant reply. [`fmt::Display`] renders it as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Statistics(DashboardStats),
    GlobalReport(DashboardStats),
    CaseReport(Box<CaseReport>),
    CaseNotFound(CaseId),
    Payments(Box<PaymentSummary>),
    Careers(Box<CareerSummary>),
    Cases { query: String, cases: Vec<Case> },
    /// A live fetch failed.
    Unavailable,
}

pub const HELP_TEXT: &str = "\
Available commands:
  report                 full report over all cases
  report case #123       report for one case
  stats                  quick statistics
  case <name or number>  search cases by beneficiary or social-insurance number
  payments               payment totals and the latest payments
  careers                career totals by pension regime
You can also ask about pensions, validated quarters or documents.";

pub const GREETING_TEXT: &str =
    "Hello! I can report on cases, payments, careers and documents. Type \"help\" to see what I can do.";

pub const THANKS_TEXT: &str = "You're welcome! Anything else I can look up for you?";

pub const PENSION_TEXT: &str = "The pension is computed from the careers of a case: the average \
salary across careers, the total validated quarters and the resulting rate. Use \
`cases estimate <id>` for an estimate.";

pub const QUARTER_TEXT: &str =
    "172 validated quarters are needed for the full rate of 50%. Below that the rate decreases linearly.";

pub const DOCUMENT_TEXT: &str =
    "Supporting documents are uploaded per case in the documents section. PDF, Word and image files are accepted.";

pub fn fallback_text(message: &str) -> String {
    format!(
        "I understand your question about \"{}\".\n\
         Type \"report\" for a full report, \"help\" for all commands, \
         or \"report case #ID\" for a specific case.",
        message.trim()
    )
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

fn display_or_na<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |d| d.to_string())
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Text(text) => f.write_str(text),
            Reply::Statistics(stats) => {
                writeln!(f, "QUICK STATISTICS")?;
                writeln!(f, "  {} cases in total", stats.total_cases)?;
                writeln!(f, "  {} validated cases", stats.cases_validated)?;
                writeln!(f, "  {} payments", stats.total_payments)?;
                writeln!(f, "  {:.2} EUR paid in total", stats.total_payment_amount)?;
                writeln!(f, "  {} careers recorded", stats.total_careers)?;
                write!(f, "  {} documents archived", stats.total_documents)
            }
            Reply::GlobalReport(stats) => {
                writeln!(f, "GENERAL REPORT")?;
                writeln!(f)?;
                writeln!(f, "Cases")?;
                writeln!(f, "  total:       {}", stats.total_cases)?;
                writeln!(f, "  validated:   {}", stats.cases_validated)?;
                writeln!(f, "  in progress: {}", stats.cases_in_progress)?;
                writeln!(f, "  rejected:    {}", stats.cases_rejected)?;
                writeln!(f, "Payments")?;
                writeln!(f, "  total:   {}", stats.total_payments)?;
                writeln!(f, "  amount:  {:.2} EUR", stats.total_payment_amount)?;
                writeln!(f, "  average: {:.2} EUR", stats.average_payment())?;
                writeln!(f, "Careers")?;
                writeln!(f, "  total:    {}", stats.total_careers)?;
                writeln!(f, "  per case: {:.1}", stats.careers_per_case())?;
                writeln!(f, "  average salary: {:.2} EUR", stats.average_salary)?;
                writeln!(f, "Documents")?;
                writeln!(f, "  total:    {}", stats.total_documents)?;
                writeln!(f, "  per case: {:.1}", stats.documents_per_case())?;
                writeln!(f, "Outcome")?;
                writeln!(f, "  validation rate: {:.1}%", stats.validation_rate())?;
                write!(f, "  rejection rate:  {:.1}%", stats.rejection_rate())
            }
            Reply::CaseReport(report) => {
                let case = &report.case;
                let beneficiary = case.beneficiary.as_ref();
                writeln!(f, "CASE REPORT #{}", display_or_na(case.id))?;
                writeln!(f)?;
                writeln!(f, "Beneficiary")?;
                writeln!(f, "  name:  {}", or_na(Some(case.beneficiary_name().as_str())))?;
                writeln!(f, "  email: {}", or_na(beneficiary.map(|b| b.email.as_str())))?;
                writeln!(
                    f,
                    "  phone: {}",
                    or_na(beneficiary.and_then(|b| b.phone.as_deref()))
                )?;
                writeln!(f, "  social-insurance number: {}", or_na(Some(case.social_security_number.as_str())))?;
                writeln!(f, "Status")?;
                writeln!(f, "  current: {}", case.status)?;
                writeln!(f, "  created: {}", display_or_na(case.created_on))?;

                writeln!(f, "Careers ({})", report.careers.len())?;
                for (i, c) in report.careers.iter().enumerate() {
                    writeln!(f, "  {}. {} - {}", i + 1, or_na(Some(c.employer.as_str())), or_na(Some(c.role.as_str())))?;
                    writeln!(
                        f,
                        "     {} to {}, average salary {:.2} EUR",
                        c.start_date,
                        c.end_date.map_or_else(|| "ongoing".to_string(), |d| d.to_string()),
                        c.average_salary
                    )?;
                }

                writeln!(f, "Payments ({})", report.payments.len())?;
                for (i, p) in report.payments.iter().enumerate() {
                    writeln!(
                        f,
                        "  {}. {:.2} EUR on {} ({}, {})",
                        i + 1,
                        p.amount,
                        p.disbursement_date,
                        p.payment_type,
                        p.status
                    )?;
                }

                write!(f, "Documents ({})", report.documents.len())?;
                for (i, d) in report.documents.iter().enumerate() {
                    write!(
                        f,
                        "\n  {}. {} ({}, {} bytes)",
                        i + 1,
                        or_na(d.name.as_deref()),
                        or_na(d.mime_type.as_deref()),
                        display_or_na(d.size)
                    )?;
                }
                Ok(())
            }
            Reply::CaseNotFound(id) => write!(f, "No case found with id {}.", id),
            Reply::Payments(summary) => {
                let stats = &summary.stats;
                writeln!(f, "PAYMENTS")?;
                writeln!(f, "  total:   {}", stats.total_payments)?;
                writeln!(f, "  amount:  {:.2} EUR", stats.total_payment_amount)?;
                write!(f, "  average: {:.2} EUR", stats.average_payment())?;
                if !summary.recent.is_empty() {
                    write!(f, "\nLatest payments")?;
                    for p in &summary.recent {
                        write!(f, "\n  {:.2} EUR on {}", p.amount, p.disbursement_date)?;
                    }
                }
                Ok(())
            }
            Reply::Careers(summary) => {
                let stats = &summary.stats;
                writeln!(f, "CAREERS")?;
                writeln!(f, "  total:    {}", stats.total_careers)?;
                write!(f, "  per case: {:.1}", stats.careers_per_case())?;
                if !summary.by_regime.is_empty() {
                    write!(f, "\nBy pension regime")?;
                    for (regime, count) in &summary.by_regime {
                        write!(f, "\n  {}: {}", regime, count)?;
                    }
                }
                Ok(())
            }
            Reply::Cases { query, cases } if cases.is_empty() => {
                write!(f, "No case found for \"{}\".", query)
            }
            Reply::Cases { cases, .. } => {
                write!(f, "CASES FOUND ({})", cases.len())?;
                for case in cases {
                    write!(
                        f,
                        "\n  Case #{} - {}\n     status: {} - SSN: {}",
                        display_or_na(case.id),
                        or_na(Some(case.beneficiary_name().as_str())),
                        case.status,
                        case.social_security_number
                    )?;
                }
                Ok(())
            }
            Reply::Unavailable => f.write_str(
                "Sorry, I could not load the data from the system. Please try again.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Beneficiary, CaseStatus};

    #[test]
    fn test_global_report_rates() {
        let stats = DashboardStats {
            total_cases: 10,
            cases_validated: 4,
            cases_rejected: 1,
            total_payments: 4,
            total_payment_amount: 1000.0,
            ..Default::default()
        };
        let text = Reply::GlobalReport(stats).to_string();

        assert!(text.contains("validation rate: 40.0%"));
        assert!(text.contains("rejection rate:  10.0%"));
        assert!(text.contains("average: 250.00 EUR"));
    }

    #[test]
    fn test_payment_summary_rendering() {
        let stats = DashboardStats {
            total_payments: 3,
            total_payment_amount: 900.0,
            ..Default::default()
        };
        let text = Reply::Payments(Box::new(PaymentSummary {
            stats,
            recent: vec![],
        }))
        .to_string();

        assert!(text.contains("average: 300.00 EUR"));
        assert!(!text.contains("Latest payments"));
    }

    #[test]
    fn test_case_list_rendering() {
        let mut case = Case::draft(
            "1850712345678",
            Beneficiary {
                last_name: "Dupont".to_string(),
                first_name: "Jean".to_string(),
                ..Default::default()
            },
        );
        case.id = Some(4);
        case.status = CaseStatus::Validated;

        let text = Reply::Cases {
            query: "dupont".to_string(),
            cases: vec![case],
        }
        .to_string();
        assert!(text.starts_with("CASES FOUND (1)"));
        assert!(text.contains("Case #4 - Dupont Jean"));
        assert!(text.contains("status: validated"));

        let empty = Reply::Cases {
            query: "nobody".to_string(),
            cases: vec![],
        };
        assert_eq!(empty.to_string(), "No case found for \"nobody\".");
    }
}
