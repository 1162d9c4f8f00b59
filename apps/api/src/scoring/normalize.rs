//! Text Normalizer — turns raw resume documents and transcripts into matchable text.
//!
//! Normalized text is lowercase, single-spaced, and keeps only alphanumerics plus the
//! symbols that carry meaning in skill names (`.` `+` `-` `#`), so "C++", "C#" and
//! "Node.js" survive intact.
//!
//! Extraction failures never propagate: they are logged and replaced by an empty
//! string, which callers treat as "no signal".

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::scoring::ExtractionError;

/// Placeholder returned when no line of the resume looks like a name.
pub const NEW_CANDIDATE: &str = "New Candidate";

/// Lines containing any of these are resume boilerplate, not a name.
const NAME_STOP_WORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum",
    "vitae",
    "profile",
    "bio",
    "template",
    ".pdf",
];

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 50;

/// Symbols kept by normalization in addition to alphanumerics and whitespace.
const KEPT_SYMBOLS: &[char] = &['.', '+', '-', '#'];

/// Lowercases, strips everything except alphanumerics and `. + - #`, and collapses
/// all whitespace (newlines included) to single spaces.
pub fn normalize_text(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() {
                ' '
            } else {
                c
            }
        })
        .filter(|c| c.is_alphanumeric() || *c == ' ' || KEPT_SYMBOLS.contains(c))
        .collect();

    collapse_whitespace(&cleaned)
}

/// Collapses runs of whitespace (including newlines) to one space and trims the ends.
/// Casing and symbols are left untouched.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matchable text and best-guess candidate name from one resume document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub text: String,
    pub candidate_name: String,
}

/// Extracts and normalizes a resume document. An unreadable document yields
/// empty text and the [`NEW_CANDIDATE`] placeholder.
pub fn normalize_document(raw: &[u8]) -> NormalizedDocument {
    match extract_document_text(raw) {
        Ok(text) => NormalizedDocument {
            text: normalize_text(&text),
            candidate_name: extract_candidate_name(&text),
        },
        Err(e) => {
            warn!("Resume text extraction failed, continuing without it: {e}");
            NormalizedDocument {
                text: String::new(),
                candidate_name: NEW_CANDIDATE.to_string(),
            }
        }
    }
}

/// Normalizes a speech-to-text transcript. Empty input stays empty.
pub fn normalize_transcript_text(transcript: &str) -> String {
    normalize_text(transcript)
}

/// Pulls the raw text (line breaks preserved) out of a document.
///
/// PDFs go through `pdf-extract`. Anything else is accepted if it is valid UTF-8,
/// so plain-text resumes work too.
pub fn extract_document_text(raw: &[u8]) -> Result<String, ExtractionError> {
    if raw.is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    let text = if is_pdf(raw) {
        extract_pdf_text(raw)?
    } else {
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|_| ExtractionError::UnsupportedDocument)?
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }

    debug!("Extracted {} chars of document text", text.len());
    Ok(text)
}

fn is_pdf(raw: &[u8]) -> bool {
    // The header may be preceded by a few junk bytes in the wild.
    raw.windows(5).take(1024).any(|w| w == b"%PDF-")
}

fn extract_pdf_text(raw: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed files; contain it here.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(raw)));
    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(_) => Err(ExtractionError::Pdf("PDF parser panicked".to_string())),
    }
}

/// Best-effort guess at the candidate's name from raw resume text.
///
/// Returns the first line that is 3–50 chars after normalization, contains no
/// boilerplate keyword, and does not start with a digit, title-cased.
/// Falls back to [`NEW_CANDIDATE`].
pub fn extract_candidate_name(raw_text: &str) -> String {
    raw_text
        .lines()
        .map(normalize_text)
        .find(|line| is_name_candidate(line))
        .map(|line| title_case(&line))
        .unwrap_or_else(|| NEW_CANDIDATE.to_string())
}

fn is_name_candidate(line: &str) -> bool {
    let len = line.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return false;
    }
    if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    !NAME_STOP_WORDS.iter().any(|w| line.contains(w))
}

/// Name to store on an application: what the applicant typed, unless it is
/// missing, blank, the placeholder, or the literal "null" sent by some clients.
pub fn resolve_display_name(submitted: Option<&str>, extracted: &str) -> String {
    match submitted.map(str::trim) {
        Some(name) if !name.is_empty() && name != NEW_CANDIDATE && name != "null" => {
            name.to_string()
        }
        _ => extracted.to_string(),
    }
}

/// Title-cases a string: a letter is uppercased when it does not follow another
/// letter, every other letter is lowercased. "node.js" → "Node.Js", "c++" → "C++".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_skill_symbols() {
        let text = normalize_text("Expert in C++, C#, and Node.js!\nAlso: front-end (React).");
        assert_eq!(text, "expert in c++ c# and node.js also front-end react.");
    }

    #[test]
    fn test_normalize_collapses_whitespace_and_newlines() {
        assert_eq!(normalize_text("  Rust \n\n\t Go   "), "rust go");
    }

    #[test]
    fn test_normalize_empty_is_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n "), "");
    }

    #[test]
    fn test_collapse_whitespace_keeps_casing() {
        assert_eq!(
            collapse_whitespace("Senior\nDeveloper\r\n  Job"),
            "Senior Developer Job"
        );
    }

    #[test]
    fn test_plain_text_document_is_accepted() {
        let doc = normalize_document(b"Jane Roe\nPython developer");
        assert_eq!(doc.text, "jane roe python developer");
        assert_eq!(doc.candidate_name, "Jane Roe");
    }

    #[test]
    fn test_unreadable_document_yields_empty_text() {
        let doc = normalize_document(&[0xff, 0xfe, 0x00, 0x81]);
        assert_eq!(doc.text, "");
        assert_eq!(doc.candidate_name, NEW_CANDIDATE);
        assert_eq!(normalize_document(b"").text, "");
    }

    #[test]
    fn test_corrupt_pdf_yields_empty_text() {
        assert_eq!(normalize_document(b"%PDF-1.4\nthis is not a real pdf").text, "");
    }

    #[test]
    fn test_extract_document_text_reports_blank_document() {
        assert!(matches!(
            extract_document_text(b"   \n  "),
            Err(ExtractionError::NoText)
        ));
    }

    #[test]
    fn test_transcript_normalization() {
        assert_eq!(
            normalize_transcript_text("I LOVE working with Python3!"),
            "i love working with python3"
        );
    }

    #[test]
    fn test_name_extraction_skips_boilerplate() {
        let text = "Resume of John Doe\nJohn Doe\nSoftware Engineer";
        assert_eq!(extract_candidate_name(text), "John Doe");
    }

    #[test]
    fn test_name_extraction_skips_short_numeric_and_long_lines() {
        let text = format!(
            "\nAB\n2024 portfolio\n{}\njane smith",
            "x".repeat(NAME_MAX_CHARS + 1)
        );
        assert_eq!(extract_candidate_name(&text), "Jane Smith");
    }

    #[test]
    fn test_name_extraction_skips_cv_and_file_names() {
        let text = "My CV\njohn_doe_resume.pdf\nCurriculum Vitae\nMARIA GARCIA";
        assert_eq!(extract_candidate_name(text), "Maria Garcia");
    }

    #[test]
    fn test_name_extraction_falls_back_to_placeholder() {
        assert_eq!(extract_candidate_name(""), NEW_CANDIDATE);
        assert_eq!(extract_candidate_name("Resume\n12 Main St"), NEW_CANDIDATE);
    }

    #[test]
    fn test_display_name_prefers_submitted() {
        assert_eq!(resolve_display_name(Some("Ada Lovelace"), "Ada L"), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_extracted() {
        for submitted in [None, Some(""), Some("  "), Some("null"), Some(NEW_CANDIDATE)] {
            assert_eq!(resolve_display_name(submitted, "John Doe"), "John Doe");
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("sql"), "Sql");
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("c++"), "C++");
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("JOHN o'neil"), "John O'Neil");
    }
}
