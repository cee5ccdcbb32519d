//! Section normalization: reconcile free-form agent prose with a required,
//! ordered list of headings.
//!
//! The output is structurally conformant for any input string. It does not
//! try to recover what a section *should* have said when the agent ignored
//! the instructed format.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Body used for a required section the agent did not provide.
pub const PLACEHOLDER: &str = "—";

/// Between a heading and its body.
const HEADING_SEPARATOR: &str = "\n\n";
/// Between two rendered sections.
const SECTION_SEPARATOR: &str = "\n\n\n";

const FENCE: &str = "```";

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank run regex"));

/// One `{heading, body}` pair of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Section {
    fn placeholder(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            body: PLACEHOLDER.to_string(),
        }
    }
}

/// Result of normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedDocument {
    /// Required headings in their specified order.
    Structured(Vec<Section>),
    /// Cleaned text returned as-is: skip-empty mode found no heading at all.
    Passthrough(String),
}

impl NormalizedDocument {
    pub fn sections(&self) -> &[Section] {
        match self {
            Self::Structured(sections) => sections,
            Self::Passthrough(_) => &[],
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NormalizedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough(text) => f.write_str(text),
            Self::Structured(sections) => {
                let rendered = sections
                    .iter()
                    .map(|s| format!("{}{HEADING_SEPARATOR}{}", s.heading, s.body))
                    .collect::<Vec<_>>()
                    .join(SECTION_SEPARATOR);
                f.write_str(rendered.trim())
            }
        }
    }
}

/// Drop code fence delimiters, keeping the fenced content.
///
/// A line starting with three backticks opens or closes a fence; its info
/// string goes with it. A one-line fence keeps only its inner text, and a
/// closing fence glued to the end of a content line is cut off. No line of
/// the result starts with a fence, so stripping twice changes nothing.
pub fn strip_code_fences(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut open = false;

    for line in text.split('\n') {
        if let Some(rest) = line.trim_start().strip_prefix(FENCE) {
            if let Some(end) = rest.find(FENCE) {
                kept.push(rest[..end].trim());
            } else {
                open = !open;
            }
            continue;
        }
        if open {
            if let Some(content) = line.trim_end().strip_suffix(FENCE) {
                kept.push(content);
                open = false;
                continue;
            }
        }
        kept.push(line);
    }
    kept.join("\n")
}

/// Normalize line endings, unwrap code fences, collapse blank-line runs.
pub fn clean_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let unfenced = strip_code_fences(&unified);
    BLANK_RUN_RE
        .replace_all(&unfenced, "\n\n")
        .trim()
        .to_string()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Seeking,
    InBody(usize),
}

/// Single pass over the lines, capturing the body of each heading's first
/// occurrence. A line repeating the heading being captured stays in its
/// body. Any other required heading line ends the body; if that heading was
/// already captured, the scanner seeks and its content is discarded.
fn capture_bodies<'a>(cleaned: &'a str, headings: &[&str]) -> Vec<Option<Vec<&'a str>>> {
    let mut bodies: Vec<Option<Vec<&str>>> = vec![None; headings.len()];
    let mut state = ScanState::Seeking;

    for line in cleaned.lines() {
        let trimmed = line.trim();
        match headings.iter().position(|heading| *heading == trimmed) {
            Some(index) if bodies[index].is_none() => {
                bodies[index] = Some(Vec::new());
                state = ScanState::InBody(index);
            }
            Some(index) if state == ScanState::InBody(index) => {
                if let Some(lines) = bodies[index].as_mut() {
                    lines.push(line);
                }
            }
            Some(_) => state = ScanState::Seeking,
            None => {
                if let ScanState::InBody(index) = state {
                    if let Some(lines) = bodies[index].as_mut() {
                        lines.push(line);
                    }
                }
            }
        }
    }
    bodies
}

/// Build the normalized document for `text` against the ordered `headings`.
pub fn normalize_document<H>(text: &str, headings: &[H], skip_empty: bool) -> NormalizedDocument
where
    H: AsRef<str>,
{
    let cleaned = clean_text(text);
    let headings: Vec<&str> = headings
        .iter()
        .map(|h| h.as_ref().trim())
        .filter(|h| !h.is_empty())
        .collect();

    if headings.is_empty() {
        return NormalizedDocument::Passthrough(cleaned);
    }

    let lower = cleaned.to_lowercase();
    let any_present = headings
        .iter()
        .any(|heading| lower.contains(&heading.to_lowercase()));

    if !any_present {
        if skip_empty {
            return NormalizedDocument::Passthrough(cleaned);
        }
        let first_body = if cleaned.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            cleaned
        };
        let mut sections = vec![Section {
            heading: headings[0].to_string(),
            body: first_body,
        }];
        sections.extend(headings[1..].iter().map(|h| Section::placeholder(h)));
        return NormalizedDocument::Structured(sections);
    }

    let bodies = capture_bodies(&cleaned, &headings);
    let sections = headings
        .iter()
        .zip(bodies)
        .filter_map(|(heading, lines)| {
            let body = lines.map(|l| l.join("\n").trim().to_string());
            match body {
                Some(body) if !body.is_empty() => Some(Section {
                    heading: heading.to_string(),
                    body,
                }),
                _ if skip_empty => None,
                _ => Some(Section::placeholder(heading)),
            }
        })
        .collect();
    NormalizedDocument::Structured(sections)
}

/// Normalize agent output into a document with exactly the required
/// headings, in order. In skip-empty mode missing sections are omitted
/// instead of filled with [`PLACEHOLDER`].
pub fn normalize_sections<H>(text: &str, headings: &[H], skip_empty: bool) -> String
where
    H: AsRef<str>,
{
    normalize_document(text, headings, skip_empty).render()
}
