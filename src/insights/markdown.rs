//! Markdown post-processing for AI-generated insight text.
//!
//! The upstream model returns one markdown document with `##`/`###`
//! section headers. The dashboard renders plain text panels, so the API
//! splits the document into sections, unwraps header lines and renumbers
//! selected sections before responding.

/// One `##`/`###` section of an insights document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Split markdown into sections introduced by `##` or `###` headers.
///
/// Text before the first header is dropped. Headers of four or more
/// hashes stay part of the surrounding section body.
pub fn parse_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(title) = header_title(line) {
            if let Some((title, body)) = current.take() {
                sections.push(Section {
                    title,
                    content: body.join("\n").trim().to_string(),
                });
            }
            current = Some((title.to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((title, body)) = current {
        sections.push(Section {
            title,
            content: body.join("\n").trim().to_string(),
        });
    }
    sections
}

/// Unwrap `##`/`###` header prefixes (with optional list numbering) and
/// collapse runs of blank lines into single empty lines.
pub fn clean_markdown(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev_blank = false;

    for line in text.lines() {
        let line = strip_header_prefix(line);
        if line.trim().is_empty() {
            if !prev_blank {
                lines.push("");
            }
            prev_blank = true;
        } else {
            lines.push(line);
            prev_blank = false;
        }
    }
    lines.join("\n").trim().to_string()
}

/// Join sections into one document, renumbering titles from 1.
///
/// Existing `N.` prefixes on titles are replaced; section bodies are kept
/// verbatim apart from trimming.
pub fn renumber_sections<'a>(sections: impl IntoIterator<Item = &'a Section>) -> String {
    sections
        .into_iter()
        .enumerate()
        .map(|(i, section)| {
            let title = strip_number_prefix(&section.title).trim();
            format!("{}. {}\n{}", i + 1, title, section.content.trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse a `##`/`###` header line and return its title.
fn header_title(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let hashes = line.len() - rest.len();
    if !(2..=3).contains(&hashes) {
        return None;
    }
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let title = rest.trim_start();
    (!title.is_empty()).then_some(title)
}

/// Strip a leading `##`/`###` marker plus optional `N.` numbering from a
/// line, keeping the title text. Non-header lines pass through.
fn strip_header_prefix(line: &str) -> &str {
    let rest = line.trim_start_matches('#');
    let hashes = line.len() - rest.len();
    if !(2..=3).contains(&hashes) {
        return line;
    }
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        // No whitespace after the hashes, not a header.
        return line;
    }
    let after_digits = after_ws.trim_start_matches(|c: char| c.is_ascii_digit());
    let after_dot = after_digits.strip_prefix('.').unwrap_or(after_digits);
    after_dot.trim_start()
}

/// Strip a `N.` numbering prefix from a section title, if present.
fn strip_number_prefix(title: &str) -> &str {
    let rest = title.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == title.len() {
        return title;
    }
    match rest.strip_prefix('.') {
        Some(stripped) => stripped.trim_start(),
        None => title,
    }
}
