//! # Rule Tables
//!
//! Static configuration consumed by the business rules. Lookups are
//! case-insensitive where the rule says so; patterns are compiled once.

use std::sync::LazyLock;

use regex::Regex;

/// Disposable-mail providers. Contacts using these domains are rejected.
pub const BLOCKED_EMAIL_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "tempmail.com",
    "temp-mail.org",
    "throwaway.email",
    "trashmail.com",
    "yopmail.com",
];

/// Consumer mail providers. A contact with one of these and a company is
/// logged, not rejected.
pub const PERSONAL_EMAIL_DOMAINS: &[&str] = &[
    "aol.com",
    "gmail.com",
    "hotmail.com",
    "icloud.com",
    "outlook.com",
    "protonmail.com",
    "yahoo.com",
];

/// ISO 3166-1 alpha-2 codes contacts may be registered in.
pub const ALLOWED_COUNTRIES: &[&str] = &[
    "AU", "BR", "CA", "CH", "DE", "ES", "FR", "GB", "IE", "IN", "IT", "JP", "MX", "NL", "NZ",
    "SE", "SG", "US",
];

/// Per-country phone patterns, matched after stripping spaces, dots,
/// dashes and parentheses.
pub const PHONE_PATTERNS: &[(&str, &str)] = &[
    ("US", r"^(\+1)?[2-9]\d{2}[2-9]\d{6}$"),
    ("CA", r"^(\+1)?[2-9]\d{2}[2-9]\d{6}$"),
    ("GB", r"^(\+44|0)\d{9,10}$"),
    ("DE", r"^(\+49|0)\d{6,13}$"),
    ("FR", r"^(\+33|0)[1-9]\d{8}$"),
    ("AU", r"^(\+61|0)[2-478]\d{8}$"),
    ("JP", r"^(\+81|0)\d{9,10}$"),
    ("IN", r"^(\+91)?[6-9]\d{9}$"),
    ("BR", r"^(\+55)?\d{10,11}$"),
    ("MX", r"^(\+52)?\d{10}$"),
];

/// Tags accepted regardless of length.
pub const TAG_VOCABULARY: &[&str] = &[
    "customer",
    "enterprise",
    "internal",
    "lead",
    "newsletter",
    "partner",
    "prospect",
    "smb",
    "vendor",
    "vip",
];

/// Free-form tags outside [`TAG_VOCABULARY`] may be at most this long.
pub const MAX_FREEFORM_TAG_LEN: usize = 20;

/// Patterns that must not appear in contact notes, with a display name.
pub const SENSITIVE_PATTERNS: &[(&str, &str)] = &[
    ("SSN-formatted number", r"\b\d{3}-\d{2}-\d{4}\b"),
    ("card-like 16-digit number", r"\b\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{4}\b"),
    ("password reference", r"(?i)\bpassword\b"),
    ("SSN reference", r"(?i)\bssn\b"),
    ("social security reference", r"(?i)\bsocial\s+security\b"),
];

static PHONE_REGEXES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    PHONE_PATTERNS
        .iter()
        .map(|(country, pattern)| (*country, Regex::new(pattern).unwrap()))
        .collect()
});

static SENSITIVE_REGEXES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SENSITIVE_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).unwrap()))
        .collect()
});

fn contains_ignore_case(table: &[&str], value: &str) -> bool {
    table.iter().any(|entry| entry.eq_ignore_ascii_case(value))
}

pub fn is_blocked_domain(domain: &str) -> bool {
    contains_ignore_case(BLOCKED_EMAIL_DOMAINS, domain)
}

pub fn is_personal_domain(domain: &str) -> bool {
    contains_ignore_case(PERSONAL_EMAIL_DOMAINS, domain)
}

/// Country codes are compared exactly; the allow-list is upper case.
pub fn is_allowed_country(code: &str) -> bool {
    ALLOWED_COUNTRIES.contains(&code)
}

pub fn is_known_tag(tag: &str) -> bool {
    contains_ignore_case(TAG_VOCABULARY, tag)
}

/// Phone pattern for `country`, or `None` if the country has no pattern.
pub fn phone_pattern(country: &str) -> Option<&'static Regex> {
    PHONE_REGEXES
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, re)| re)
}

/// Compiled sensitive-data patterns, in table order.
pub fn sensitive_patterns() -> &'static [(&'static str, Regex)] {
    &SENSITIVE_REGEXES
}
