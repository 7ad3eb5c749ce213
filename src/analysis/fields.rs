// src/analysis/fields.rs
//! Heuristic field extraction from raw CV text.
//!
//! Best-effort by design: a missing field is `None`/empty, never an error.
//! The extractor is a pure function of its input text, so re-running on
//! identical text always yields identical output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when the field extractor is handed input it cannot treat as
/// text (empty or whitespace-only content).
#[derive(Debug, Error)]
#[error("field extraction requires non-empty text input")]
pub struct InputError;

/// Structured fields extracted from a CV.
///
/// All fields are optional; list-valued fields preserve document order of
/// appearance. Skills and languages are deduplicated keeping the first
/// occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Education,
    Experience,
    Skills,
    Languages,
    /// Recognized header we do not collect (summary, projects, ...)
    Other,
}

/// Stateless heuristic field extraction service
#[derive(Debug)]
pub struct FieldExtractor {
    email_re: Regex,
    phone_re: Regex,
    street_re: Regex,
    year_range_re: Regex,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            email_re: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("invalid email regex"),
            phone_re: Regex::new(r"\+?\(?\d[\d\s().\-/]{6,}\d").expect("invalid phone regex"),
            street_re: Regex::new(
                r"(?i)\d+\s+\S+.*\b(street|st\.|avenue|ave\.?|road|rd\.?|lane|ln\.?|drive|dr\.?|boulevard|blvd\.?)\b",
            )
            .expect("invalid street regex"),
            year_range_re: Regex::new(r"^\d{4}\s*[-–—]\s*(\d{4}|present)$")
                .expect("invalid year range regex"),
        }
    }

    /// Analyze raw CV text into a structured record.
    pub fn analyze(&self, text: &str) -> Result<CandidateRecord, InputError> {
        if text.trim().is_empty() {
            return Err(InputError);
        }

        let (education, experience, skills, languages) = self.extract_sections(text);

        Ok(CandidateRecord {
            name: self.extract_name(text),
            email: self.extract_email(text),
            phone: self.extract_phone(text),
            address: self.extract_address(text),
            education,
            experience,
            skills,
            languages,
        })
    }

    fn extract_email(&self, text: &str) -> Option<String> {
        self.email_re.find(text).map(|m| m.as_str().to_string())
    }

    /// Phone candidates need 9-15 digits (8 with an explicit '+' prefix) so
    /// that year ranges and other numeric runs are not guessed as phones.
    fn extract_phone(&self, text: &str) -> Option<String> {
        for m in self.phone_re.find_iter(text) {
            let candidate = m.as_str().trim();
            if self.year_range_re.is_match(&candidate.to_lowercase()) {
                continue;
            }
            let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
            let min_digits = if candidate.starts_with('+') { 8 } else { 9 };
            if (min_digits..=15).contains(&digits) {
                return Some(candidate.to_string());
            }
        }
        None
    }

    fn extract_address(&self, text: &str) -> Option<String> {
        for line in text.lines() {
            let line = line.trim();
            if let Some(rest) = strip_label(line, "address") {
                if !rest.is_empty() {
                    return Some(rest.to_string());
                }
            }
            if self.street_re.is_match(line) {
                return Some(line.to_string());
            }
        }
        None
    }

    /// Take the first plausible name from the leading lines: short, mostly
    /// alphabetic, capitalized words, not a header and not contact info.
    fn extract_name(&self, text: &str) -> Option<String> {
        for line in text.lines().take(10) {
            let line = line.trim();
            if line.is_empty() || line.contains('@') {
                continue;
            }
            if line.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            if section_for(line).is_some() {
                continue;
            }
            let lowered = line.to_lowercase();
            if lowered.contains("curriculum") || lowered.contains("resume") || lowered == "cv" {
                continue;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            if !(2..=4).contains(&words.len()) || line.len() > 60 {
                continue;
            }
            let capitalized = words
                .iter()
                .all(|w| w.chars().next().is_some_and(|c| c.is_uppercase()));
            if capitalized {
                return Some(line.to_string());
            }
        }
        None
    }

    /// Line-based section sweep: a recognized header switches the current
    /// section; every following non-empty line belongs to it until the next
    /// header. Entry order follows document order.
    fn extract_sections(&self, text: &str) -> (Vec<String>, Vec<String>, Vec<String>, Vec<String>) {
        let mut education = Vec::new();
        let mut experience = Vec::new();
        let mut skill_lines = Vec::new();
        let mut language_lines = Vec::new();

        let mut current: Option<Section> = None;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(section) = section_for(line) {
                current = Some(section);
                continue;
            }
            match current {
                Some(Section::Education) => education.push(line.to_string()),
                Some(Section::Experience) => experience.push(line.to_string()),
                Some(Section::Skills) => skill_lines.push(line),
                Some(Section::Languages) => language_lines.push(line),
                Some(Section::Other) | None => {}
            }
        }

        (
            education,
            experience,
            split_list_entries(&skill_lines),
            split_list_entries(&language_lines),
        )
    }
}

/// Map a line to the CV section it opens, if it reads as a header.
fn section_for(line: &str) -> Option<Section> {
    let header = line.trim().trim_end_matches(':').trim().to_lowercase();
    if header.is_empty() || header.len() > 40 {
        return None;
    }
    match header.as_str() {
        "education" | "academic background" | "academics" | "qualifications" => {
            Some(Section::Education)
        }
        "experience" | "work experience" | "employment history" | "professional experience"
        | "work history" => Some(Section::Experience),
        "skills" | "technical skills" | "core competencies" | "key skills" => {
            Some(Section::Skills)
        }
        "languages" | "language" => Some(Section::Languages),
        "summary" | "about" | "about me" | "objective" | "profile" | "projects"
        | "certifications" | "interests" | "hobbies" | "references" => Some(Section::Other),
        _ => None,
    }
}

/// Strip a leading "label:" prefix (case-insensitive), returning the rest.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let (head, rest) = line.split_once(':')?;
    if head.trim().eq_ignore_ascii_case(label) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Split collected section lines into individual entries on common list
/// separators, deduplicating while preserving first-occurrence order.
fn split_list_entries(lines: &[&str]) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in lines {
        for part in line.split(|c| matches!(c, ',' | ';' | '•' | '·' | '|' | '\t')) {
            let part = part.trim().trim_start_matches('-').trim();
            if part.is_empty() {
                continue;
            }
            if !entries.iter().any(|e| e.eq_ignore_ascii_case(part)) {
                entries.push(part.to_string());
            }
        }
    }
    entries
}
