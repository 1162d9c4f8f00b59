//! Static synonym table: canonical skill token → accepted aliases.
//!
//! Built once on first use and shared read-only across threads.

use std::collections::HashMap;

use once_cell::sync::Lazy;

const TABLE: &[(&str, &[&str])] = &[
    ("react", &["reactjs", "react.js", "react native"]),
    ("js", &["javascript", "es6", "ecmascript"]),
    ("python", &["py", "python3", "django", "flask"]),
    ("java", &["j2ee", "spring boot", "jvm"]),
    (
        "ml",
        &["machine learning", "ai", "artificial intelligence", "deep learning"],
    ),
    ("aws", &["amazon web services", "ec2", "s3", "lambda"]),
    (
        "communication",
        &["communicated", "communicating", "verbal skills"],
    ),
    ("node", &["node.js", "nodejs", "express"]),
    ("sql", &["mysql", "postgresql", "database", "query"]),
];

static SYNONYMS: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| TABLE.iter().copied().collect());

/// Aliases for a normalized skill token, if it has an entry.
pub fn aliases_for(skill: &str) -> Option<&'static [&'static str]> {
    SYNONYMS.get(skill).copied()
}
