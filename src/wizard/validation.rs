//! Input rules shared by the wizards.

use regex::Regex;
use std::sync::LazyLock;

static PROJECT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$").expect("valid project id pattern"));

static ANDROID_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").expect("valid package pattern")
});

static IOS_BUNDLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").expect("valid bundle id pattern"));

static DATABASE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]{2,61}[a-z0-9]$").expect("valid database id pattern"));

static TOPIC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_.~%]{1,900}$").expect("valid topic name pattern"));

/// The id Firestore gives the database a project starts with.
pub const DEFAULT_DATABASE_ID: &str = "(default)";

pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// 6 to 30 characters, starts with a lowercase letter, no trailing hyphen.
pub fn is_valid_project_id(value: &str) -> bool {
    PROJECT_ID.is_match(value)
}

pub fn is_valid_android_package(value: &str) -> bool {
    ANDROID_PACKAGE.is_match(value)
}

pub fn is_valid_ios_bundle_id(value: &str) -> bool {
    IOS_BUNDLE_ID.is_match(value)
}

pub fn is_valid_database_id(value: &str) -> bool {
    value == DEFAULT_DATABASE_ID || DATABASE_ID.is_match(value)
}

/// Cloud Messaging topic name, given without the `/topics/` prefix.
pub fn is_valid_topic_name(value: &str) -> bool {
    TOPIC_NAME.is_match(value)
}

/// SHA-1 (40) or SHA-256 (64) hex digits, optionally colon separated. Surrounding
/// whitespace is ignored.
pub fn is_valid_sha_certificate(value: &str) -> bool {
    let digits: String = value.trim().chars().filter(|c| *c != ':').collect();
    matches!(digits.len(), 40 | 64) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Derives a project id candidate from a display name, as the console pre-fills it.
pub fn suggest_project_id(display_name: &str) -> String {
    let mut id = String::new();
    for c in display_name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c.to_ascii_lowercase());
        } else if !id.is_empty() && !id.ends_with('-') {
            id.push('-');
        }
    }
    let mut id = id
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '-')
        .to_string();
    id.truncate(30);
    id.trim_end_matches('-').to_string()
}
