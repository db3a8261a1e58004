//! Ordered intent table. The first matching entry wins.

use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Global report, or a single-case report when a case number is given.
    Report,
    Statistics,
    /// Search cases by beneficiary name or social-insurance number.
    CaseSearch,
    Help,
    /// Payment totals and the latest payments.
    PaymentInfo,
    /// Career totals and the regime breakdown.
    CareerInfo,
    Greeting,
    Thanks,
    PensionInfo,
    QuarterInfo,
    DocumentInfo,
}

struct Rule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

static CASE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:dossiers?|cases?)\b").expect("case keyword pattern is valid")
});

static CASE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:dossier|case)\s*#?\s*(\d+)\b").expect("case number pattern is valid")
});

static SEARCH_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:dossiers?|cases?)\b[\s:#]*(?:(?:for|of|de|du|pour)\s+)?([\w-]+)")
        .expect("search term pattern is valid")
});

fn any(input: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| input.contains(k))
}

static RULES: &[Rule] = &[
    Rule {
        intent: Intent::Report,
        matches: |s| any(s, &["rapport", "report"]),
    },
    Rule {
        intent: Intent::Statistics,
        matches: |s| any(s, &["statistique", "statistic", "stats"]),
    },
    Rule {
        intent: Intent::CaseSearch,
        matches: |s| CASE_WORD.is_match(s),
    },
    Rule {
        intent: Intent::Help,
        matches: |s| any(s, &["aide", "help"]),
    },
    Rule {
        intent: Intent::PaymentInfo,
        matches: |s| any(s, &["paiement", "payment"]),
    },
    Rule {
        intent: Intent::CareerInfo,
        matches: |s| any(s, &["carrière", "carriere", "career"]),
    },
    Rule {
        intent: Intent::Greeting,
        matches: |s| {
            s.split(|c: char| !c.is_alphanumeric())
                .any(|w| matches!(w, "bonjour" | "salut" | "hello" | "hi" | "hey"))
        },
    },
    Rule {
        intent: Intent::Thanks,
        matches: |s| any(s, &["merci", "thanks", "thank you"]),
    },
    Rule {
        intent: Intent::PensionInfo,
        matches: |s| any(s, &["pension", "retraite", "retirement"]),
    },
    Rule {
        intent: Intent::QuarterInfo,
        matches: |s| any(s, &["trimestre", "quarter"]),
    },
    Rule {
        intent: Intent::DocumentInfo,
        matches: |s| any(s, &["document"]),
    },
];

/// Classify a message, case-insensitively. `None` means no intent matched.
pub fn classify(message: &str) -> Option<Intent> {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lowered))
        .map(|rule| rule.intent)
}

/// Case number in phrases such as `case #12` or `dossier 12`.
pub fn case_number(message: &str) -> Option<i64> {
    CASE_NUMBER
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The word following the case keyword, e.g. `Dupont` in `case Dupont`.
pub fn search_term(message: &str) -> Option<String> {
    SEARCH_TERM
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_start_matches('#').to_string())
        .filter(|term| !term.is_empty())
}
