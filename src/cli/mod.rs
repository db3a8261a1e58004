//! CLI module for pension-desk
//!
//! Command-line parsing for the `pension-desk` binary. Uses clap for argument
//! parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod init;
pub mod navigator;
pub mod output;

use crate::types::{CaseId, CaseStatus, PaymentStatus, PaymentType, PensionRegime};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pension-desk - retirement case management from the terminal
///
/// Browse and edit retirement cases, their careers, payments and documents,
/// and estimate pensions against a case-management backend.
#[derive(Parser, Debug)]
#[command(
    name = "pension-desk",
    version,
    about = "pension-desk - retirement case management from the terminal",
    long_about = "Browse and edit retirement cases (dossiers), their careers, payments and\n\
                  documents, and estimate pensions against a case-management backend.\n\n\
                  Authentication happens at the identity provider; store the access token\n\
                  with 'login --token' before using the other commands.",
    after_help = "EXAMPLES:\n    \
                  pension-desk init                          # Write pension-desk.toml\n    \
                  pension-desk login --token <token>         # Store an access token\n    \
                  pension-desk cases list --status EN_COURS  # Cases in progress\n    \
                  pension-desk payments list --search dupont # Payments of one case\n    \
                  pension-desk chat report case 12           # Ask the assistant"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "pension-desk.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a commented pension-desk.toml and .env.example
    Init {
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Backend API base URL
        #[arg(long, default_value = "http://localhost:8088/api")]
        api_url: String,

        /// Identity-provider base URL
        #[arg(long, default_value = "http://localhost:8088")]
        identity_url: String,
    },

    /// Show configuration information
    Config {
        /// Only validate the configuration
        #[arg(long)]
        validate: bool,
    },

    /// Store an access token, or print the identity-provider login URL
    Login {
        /// Access token issued by the identity provider
        #[arg(long)]
        token: Option<String>,
    },

    /// Sign out at the backend and the identity provider
    Logout,

    /// Show the signed-in user and roles
    Whoami,

    /// Manage retirement cases
    #[command(subcommand)]
    Cases(CaseCommands),

    /// Manage careers of a case
    #[command(subcommand)]
    Careers(CareerCommands),

    /// Manage payments of a case
    #[command(subcommand)]
    Payments(PaymentCommands),

    /// Manage documents of a case
    #[command(subcommand)]
    Documents(DocumentCommands),

    /// List cases matching a filter, as the case picker would
    Select {
        /// Matched against social-insurance number and beneficiary names
        filter: String,
    },

    /// Dashboard figures from the reporting endpoints
    Stats {
        /// Also show cases created per month
        #[arg(long)]
        monthly: bool,
    },

    /// Talk to the assistant; without a message, read lines from stdin
    Chat {
        /// Message to send
        message: Vec<String>,
    },
}

/// How a scoped command picks its case.
#[derive(Args, Debug, Clone, Default)]
pub struct CaseScope {
    /// Case id
    #[arg(long = "case", conflicts_with = "search")]
    pub case_id: Option<CaseId>,

    /// Pick the single case matching this filter
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CaseCommands {
    /// List cases
    List {
        /// Only cases with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Client-side filter over social-insurance number and names
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show one case
    Show { id: CaseId },

    /// Create a draft case
    Create {
        /// Social-insurance number
        #[arg(long)]
        ssn: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Update the social-insurance number of a case
    Update {
        id: CaseId,
        #[arg(long)]
        ssn: String,
    },

    /// Change the status of a case
    Status {
        id: CaseId,
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Delete a case
    Delete {
        id: CaseId,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Estimate the monthly pension of a case
    Estimate {
        id: CaseId,
        /// Skip the server calculation
        #[arg(long)]
        local: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CareerCommands {
    /// List careers of a case
    List {
        #[command(flatten)]
        scope: CaseScope,
    },

    /// Add a career to a case
    Add {
        #[command(flatten)]
        scope: CaseScope,
        #[arg(long)]
        employer: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, default_value_t = 0.0)]
        salary: f64,
        #[arg(long, value_enum, default_value = "general")]
        regime: RegimeArg,
        #[arg(long)]
        quarters: Option<u32>,
    },

    /// Update a career
    Update {
        #[command(flatten)]
        scope: CaseScope,
        id: i64,
        #[arg(long)]
        employer: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        salary: Option<f64>,
        #[arg(long)]
        quarters: Option<u32>,
    },

    /// Delete a career
    Delete {
        #[command(flatten)]
        scope: CaseScope,
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommands {
    /// List payments of a case with a breakdown by type
    List {
        #[command(flatten)]
        scope: CaseScope,
    },

    /// Add a payment to a case
    Add {
        #[command(flatten)]
        scope: CaseScope,
        #[arg(long)]
        amount: f64,
        /// Disbursement date
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_enum, default_value = "pension")]
        kind: PaymentTypeArg,
        #[arg(long)]
        reference: Option<String>,
    },

    /// Update a payment
    Update {
        #[command(flatten)]
        scope: CaseScope,
        id: i64,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        executed: Option<NaiveDate>,
        #[arg(long, value_enum)]
        status: Option<PaymentStatusArg>,
    },

    /// Delete a payment
    Delete {
        #[command(flatten)]
        scope: CaseScope,
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// List documents of a case
    List {
        #[command(flatten)]
        scope: CaseScope,
    },

    /// Upload a file to a case
    Upload {
        #[command(flatten)]
        scope: CaseScope,
        file: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },

    /// Download a document's content
    Download {
        id: i64,
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Update document metadata
    Update {
        #[command(flatten)]
        scope: CaseScope,
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a document
    Delete {
        #[command(flatten)]
        scope: CaseScope,
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    #[value(name = "BROUILLON", alias = "draft")]
    Draft,
    #[value(name = "EN_COURS", alias = "in-progress")]
    InProgress,
    #[value(name = "VALIDE", alias = "validated")]
    Validated,
    #[value(name = "REJETE", alias = "rejected")]
    Rejected,
}

impl From<StatusArg> for CaseStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => CaseStatus::Draft,
            StatusArg::InProgress => CaseStatus::InProgress,
            StatusArg::Validated => CaseStatus::Validated,
            StatusArg::Rejected => CaseStatus::Rejected,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimeArg {
    General,
    PublicService,
    Agricultural,
    SelfEmployed,
    Supplementary,
}

impl From<RegimeArg> for PensionRegime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::General => PensionRegime::General,
            RegimeArg::PublicService => PensionRegime::PublicService,
            RegimeArg::Agricultural => PensionRegime::Agricultural,
            RegimeArg::SelfEmployed => PensionRegime::SelfEmployed,
            RegimeArg::Supplementary => PensionRegime::Supplementary,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTypeArg {
    Pension,
    Allocation,
    Supplement,
}

impl From<PaymentTypeArg> for PaymentType {
    fn from(arg: PaymentTypeArg) -> Self {
        match arg {
            PaymentTypeArg::Pension => PaymentType::Pension,
            PaymentTypeArg::Allocation => PaymentType::Allocation,
            PaymentTypeArg::Supplement => PaymentType::Supplement,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatusArg {
    Pending,
    Completed,
    Failed,
    Validated,
    Rejected,
}

impl From<PaymentStatusArg> for PaymentStatus {
    fn from(arg: PaymentStatusArg) -> Self {
        match arg {
            PaymentStatusArg::Pending => PaymentStatus::Pending,
            PaymentStatusArg::Completed => PaymentStatus::Completed,
            PaymentStatusArg::Failed => PaymentStatus::Failed,
            PaymentStatusArg::Validated => PaymentStatus::Validated,
            PaymentStatusArg::Rejected => PaymentStatus::Rejected,
        }
    }
}

impl Commands {
    /// Commands that run before, or without, a signed-in session. Logout is
    /// one of them so an expired token can still be discarded.
    pub fn skips_session_gate(&self) -> bool {
        matches!(
            self,
            Commands::Init { .. }
                | Commands::Config { .. }
                | Commands::Login { .. }
                | Commands::Logout
        )
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_case_list_with_status() {
        let cli = Cli::try_parse_from(["pension-desk", "cases", "list", "--status", "EN_COURS"])
            .expect("should parse");
        match cli.command {
            Commands::Cases(CaseCommands::List { status, filter }) => {
                assert_eq!(status, Some(StatusArg::InProgress));
                assert!(filter.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from("pension-desk.toml"));
    }

    #[test]
    fn test_case_and_search_conflict() {
        let result = Cli::try_parse_from([
            "pension-desk",
            "payments",
            "list",
            "--case",
            "3",
            "--search",
            "dupont",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_gate() {
        let login = Cli::try_parse_from(["pension-desk", "login"]).expect("should parse");
        assert!(login.command.skips_session_gate());

        let logout = Cli::try_parse_from(["pension-desk", "logout"]).expect("should parse");
        assert!(logout.command.skips_session_gate());

        let whoami = Cli::try_parse_from(["pension-desk", "whoami"]).expect("should parse");
        assert!(!whoami.command.skips_session_gate());
    }
}
