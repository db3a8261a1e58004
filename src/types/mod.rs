use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a retirement case on the backend.
pub type CaseId = i64;

// ============= Case Types =============

/// Lifecycle status of a retirement case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "BROUILLON")]
    Draft,
    #[serde(rename = "EN_COURS")]
    InProgress,
    #[serde(rename = "VALIDE")]
    Validated,
    #[serde(rename = "REJETE")]
    Rejected,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Draft,
        CaseStatus::InProgress,
        CaseStatus::Validated,
        CaseStatus::Rejected,
    ];

    /// Backend constant, used in paths such as `/dossiers/statut/{status}`.
    pub fn as_wire(&self) -> &'static str {
        match self {
            CaseStatus::Draft => "BROUILLON",
            CaseStatus::InProgress => "EN_COURS",
            CaseStatus::Validated => "VALIDE",
            CaseStatus::Rejected => "REJETE",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CaseStatus::Draft => "draft",
            CaseStatus::InProgress => "in progress",
            CaseStatus::Validated => "validated",
            CaseStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// The individual a case pertains to. Owned by exactly one case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Beneficiary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nom", default)]
    pub last_name: String,
    #[serde(rename = "prenom", default)]
    pub first_name: String,
    #[serde(
        rename = "dateNaissance",
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "telephone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "adresse", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Beneficiary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
            .trim()
            .to_string()
    }
}

/// A retirement claim record for one beneficiary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CaseId>,
    #[serde(rename = "numeroSecuriteSociale", default)]
    pub social_security_number: String,
    #[serde(rename = "statut")]
    pub status: CaseStatus,
    #[serde(
        rename = "dateCreation",
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<NaiveDate>,
    #[serde(rename = "beneficiaire", default, skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Beneficiary>,
    #[serde(rename = "carrieres", default, skip_serializing_if = "Vec::is_empty")]
    pub careers: Vec<Career>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
    #[serde(rename = "paiements", default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<Payment>,
}

impl Case {
    /// A new case in draft status for the given beneficiary.
    pub fn draft(social_security_number: impl Into<String>, beneficiary: Beneficiary) -> Self {
        Self {
            id: None,
            social_security_number: social_security_number.into(),
            status: CaseStatus::Draft,
            created_on: None,
            beneficiary: Some(beneficiary),
            careers: Vec::new(),
            documents: Vec::new(),
            payments: Vec::new(),
        }
    }

    pub fn beneficiary_name(&self) -> String {
        self.beneficiary
            .as_ref()
            .map(Beneficiary::full_name)
            .unwrap_or_default()
    }

    /// Checks the fields the case form requires before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.social_security_number.trim().is_empty() {
            return Err(AppError::Validation(
                "social-insurance number is required".to_string(),
            ));
        }
        let beneficiary = self
            .beneficiary
            .as_ref()
            .ok_or_else(|| AppError::Validation("beneficiary is required".to_string()))?;
        if beneficiary.last_name.trim().is_empty() || beneficiary.first_name.trim().is_empty() {
            return Err(AppError::Validation(
                "beneficiary last and first name are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update of a case. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CasePatch {
    #[serde(rename = "numeroSecuriteSociale", skip_serializing_if = "Option::is_none")]
    pub social_security_number: Option<String>,
    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(rename = "beneficiaire", skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Beneficiary>,
}

/// Server-side filter applied when listing cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
}

// ============= Career Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PensionRegime {
    #[serde(rename = "GENERAL")]
    General,
    #[serde(rename = "FONCTION_PUBLIQUE")]
    PublicService,
    #[serde(rename = "AGRICOLE")]
    Agricultural,
    #[serde(rename = "LIBERAL")]
    SelfEmployed,
    #[serde(rename = "COMPLEMENTAIRE")]
    Supplementary,
}

impl PensionRegime {
    pub fn as_wire(&self) -> &'static str {
        match self {
            PensionRegime::General => "GENERAL",
            PensionRegime::PublicService => "FONCTION_PUBLIQUE",
            PensionRegime::Agricultural => "AGRICOLE",
            PensionRegime::SelfEmployed => "LIBERAL",
            PensionRegime::Supplementary => "COMPLEMENTAIRE",
        }
    }
}

impl fmt::Display for PensionRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PensionRegime::General => "general",
            PensionRegime::PublicService => "public service",
            PensionRegime::Agricultural => "agricultural",
            PensionRegime::SelfEmployed => "self-employed",
            PensionRegime::Supplementary => "supplementary",
        };
        f.write_str(label)
    }
}

/// One employment period contributing to the pension calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "entreprise", default)]
    pub employer: String,
    #[serde(rename = "poste", default)]
    pub role: String,
    #[serde(rename = "dateDebut", deserialize_with = "strict_date")]
    pub start_date: NaiveDate,
    /// Absent while the career is ongoing.
    #[serde(
        rename = "dateFin",
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "salaireMoyen", default)]
    pub average_salary: f64,
    #[serde(rename = "regimeRetraite")]
    pub regime: PensionRegime,
    #[serde(rename = "trimestresValides", default, skip_serializing_if = "Option::is_none")]
    pub validated_quarters: Option<u32>,
    #[serde(rename = "dossierId", default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<CaseId>,
}

impl Career {
    pub fn validate(&self) -> Result<()> {
        if self.employer.trim().is_empty() || self.role.trim().is_empty() {
            return Err(AppError::Validation(
                "employer and role are required".to_string(),
            ));
        }
        if !self.average_salary.is_finite() || self.average_salary < 0.0 {
            return Err(AppError::Validation(
                "average salary must be a non-negative amount".to_string(),
            ));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(AppError::Validation(
                    "end date cannot precede start date".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CareerPatch {
    #[serde(rename = "entreprise", skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(rename = "poste", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "dateDebut", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "dateFin", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "salaireMoyen", skip_serializing_if = "Option::is_none")]
    pub average_salary: Option<f64>,
    #[serde(rename = "regimeRetraite", skip_serializing_if = "Option::is_none")]
    pub regime: Option<PensionRegime>,
    #[serde(rename = "trimestresValides", skip_serializing_if = "Option::is_none")]
    pub validated_quarters: Option<u32>,
}

impl CareerPatch {
    /// Checks the fields being changed. Dates are compared only when the
    /// patch carries both ends.
    pub fn validate(&self) -> Result<()> {
        if let Some(salary) = self.average_salary {
            if !salary.is_finite() || salary < 0.0 {
                return Err(AppError::Validation(
                    "average salary must be a non-negative amount".to_string(),
                ));
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(AppError::Validation(
                    "end date cannot precede start date".to_string(),
                ));
            }
        }
        for (label, value) in [("employer", &self.employer), ("role", &self.role)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(AppError::Validation(format!("{} cannot be blank", label)));
            }
        }
        Ok(())
    }
}

// ============= Payment Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "PENSION")]
    Pension,
    #[serde(rename = "ALLOCATION")]
    Allocation,
    #[serde(rename = "SUPPLEMENT")]
    Supplement,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentType::Pension => "pension",
            PaymentType::Allocation => "allocation",
            PaymentType::Supplement => "supplement",
        };
        f.write_str(label)
    }
}

/// Payment status as sent by the backend. Values this client does not know
/// decode to `Unknown` instead of failing the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "EN_ATTENTE")]
    Pending,
    #[serde(rename = "EFFECTUE")]
    Completed,
    #[serde(rename = "ERREUR")]
    Failed,
    #[serde(rename = "VALIDE")]
    Validated,
    #[serde(rename = "REJETE")]
    Rejected,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn is_unknown(&self) -> bool {
        matches!(self, PaymentStatus::Unknown)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Validated => "validated",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One disbursement or scheduled amount tied to a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "montant")]
    pub amount: f64,
    #[serde(rename = "dateVersement", deserialize_with = "strict_date")]
    pub disbursement_date: NaiveDate,
    #[serde(
        rename = "dateExecution",
        alias = "datePaiement",
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_date: Option<NaiveDate>,
    #[serde(rename = "typePaiement")]
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(
        rename = "statut",
        default,
        deserialize_with = "nullable_status",
        skip_serializing_if = "PaymentStatus::is_unknown"
    )]
    pub status: PaymentStatus,
    #[serde(rename = "dossierId", default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<CaseId>,
}

impl Payment {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AppError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentPatch {
    #[serde(rename = "montant", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "dateVersement", skip_serializing_if = "Option::is_none")]
    pub disbursement_date: Option<NaiveDate>,
    #[serde(rename = "dateExecution", skip_serializing_if = "Option::is_none")]
    pub execution_date: Option<NaiveDate>,
    #[serde(rename = "typePaiement", skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
}

impl PaymentPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(AppError::Validation(
                    "amount must be greater than zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============= Document Types =============

/// Document metadata. The binary content stays on the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(
        rename = "dateUpload",
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "tailleFichier", alias = "taille", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "dossierId", default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<CaseId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentPatch {
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A file held in memory for the duration of one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Upload form: the file plus an optional description.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file: UploadFile,
    pub description: Option<String>,
}

impl DocumentUpload {
    pub fn validate(&self) -> Result<()> {
        if self.file.file_name.trim().is_empty() {
            return Err(AppError::Validation("a file is required".to_string()));
        }
        Ok(())
    }
}

// ============= Reporting Types =============

/// Aggregate figures served by `/reporting/dashboard-stats`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalDossiers", default)]
    pub total_cases: u64,
    #[serde(rename = "dossiersEnCours", default)]
    pub cases_in_progress: u64,
    #[serde(rename = "dossiersValides", default)]
    pub cases_validated: u64,
    #[serde(rename = "dossiersRejetes", default)]
    pub cases_rejected: u64,
    #[serde(rename = "totalCarrieres", default)]
    pub total_careers: u64,
    #[serde(rename = "salaireMoyen", default)]
    pub average_salary: f64,
    #[serde(rename = "totalPaiements", default)]
    pub total_payments: u64,
    #[serde(rename = "montantTotalPaiements", default)]
    pub total_payment_amount: f64,
    #[serde(rename = "totalDocuments", default)]
    pub total_documents: u64,
}

impl DashboardStats {
    fn ratio(part: f64, whole: u64) -> f64 {
        if whole == 0 {
            0.0
        } else {
            part / whole as f64
        }
    }

    /// Percentage of cases validated.
    pub fn validation_rate(&self) -> f64 {
        Self::ratio(self.cases_validated as f64, self.total_cases) * 100.0
    }

    /// Percentage of cases rejected.
    pub fn rejection_rate(&self) -> f64 {
        Self::ratio(self.cases_rejected as f64, self.total_cases) * 100.0
    }

    pub fn average_payment(&self) -> f64 {
        Self::ratio(self.total_payment_amount, self.total_payments)
    }

    pub fn careers_per_case(&self) -> f64 {
        Self::ratio(self.total_careers as f64, self.total_cases)
    }

    pub fn documents_per_case(&self) -> f64 {
        Self::ratio(self.total_documents as f64, self.total_cases)
    }
}

/// Cases created per month (`yyyy-MM` keys) over the last year.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MonthlyStats {
    #[serde(rename = "dossiersByMonth", default)]
    pub cases_by_month: std::collections::BTreeMap<String, u64>,
}

// ============= Wire Helpers =============

// The backend serializes `LocalDate` and `LocalDateTime` depending on the
// entity, so dates keep only their first ten characters.
fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date_prefix))
}

fn nullable_status<'de, D>(deserializer: D) -> std::result::Result<PaymentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PaymentStatus>::deserialize(deserializer)?.unwrap_or_default())
}

fn strict_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_prefix(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}

fn lenient_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| parse_date_prefix(&value).and_then(|d| d.and_hms_opt(0, 0, 0)))
    }))
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response payload: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Text for a view's error banner. Validation messages are shown as-is,
    /// everything else collapses to a generic line.
    pub fn banner(&self, action: &str) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::Unauthorized => "Your session has expired, please sign in again".to_string(),
            AppError::Forbidden(_) => format!("You are not allowed to {}", action),
            _ => format!("Error while trying to {}", action),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
