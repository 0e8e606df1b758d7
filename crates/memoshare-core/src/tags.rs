//! Hashtag extraction from memo markdown.
//!
//! The text is walked block by block: blockquote and list markers are
//! peeled off, fenced and indented code blocks are skipped, inline code spans
//! and link/URL targets are masked out per paragraph, and only the remaining
//! prose is searched for `#label` tokens.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '}', '*', '_', '~', '"', '\'', '。', '，', '！', '？',
    '、', '；', '：',
];

/// Extract `#tags` from markdown text.
///
/// A tag starts at the beginning of a line, after whitespace, or right after
/// an emphasis/bracket opener, and runs until whitespace or another `#`.
/// Trailing punctuation is dropped. Results are deduplicated, case preserved,
/// in first-seen order.
///
/// # Examples
///
/// ```
/// use memoshare_core::tags::extract_tags;
///
/// let tags = extract_tags("Reading #rust today, see `#not-a-tag` and #books.");
/// assert_eq!(tags, vec!["rust", "books"]);
/// ```
#[must_use]
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for block in prose_blocks(text) {
        for capture in tag_regex().captures_iter(&block) {
            let label = capture[1].trim_end_matches(TRAILING_PUNCTUATION);
            if label.is_empty() {
                continue;
            }
            if seen.insert(label.to_string()) {
                tags.push(label.to_string());
            }
        }
    }

    tags
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?:^|[\s*_~(\[>])#([^\s#]+)").expect("Invalid regex"))
}

/// Link destinations, autolinks, and bare URLs.
fn target_regex() -> &'static Regex {
    static TARGET: OnceLock<Regex> = OnceLock::new();
    TARGET.get_or_init(|| {
        Regex::new(
            r"\]\([^)]*\)|<[a-zA-Z][a-zA-Z0-9+.-]*:[^\s<>]*>|[a-zA-Z][a-zA-Z0-9+.-]*://\S+|www\.\S+",
        )
        .expect("Invalid regex")
    })
}

/// Link reference definitions: `[label]: destination`.
fn reference_definition_regex() -> &'static Regex {
    static DEFINITION: OnceLock<Regex> = OnceLock::new();
    DEFINITION
        .get_or_init(|| Regex::new(r"^ {0,3}\[[^\]]+\]:\s*\S+").expect("Invalid regex"))
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^ {0,3}#{1,6}(?:\s|$)").expect("Invalid regex"))
}

fn list_marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^(?:[-+*]|[0-9]{1,9}[.)])(?:[ \t]|$)").expect("Invalid regex")
    })
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
    /// Blockquote nesting the fence was opened in.
    depth: usize,
}

impl Fence {
    fn open(content: &str, depth: usize) -> Option<Self> {
        let body = strip_block_indent(content)?;
        let marker = body.chars().next()?;
        if marker != '`' && marker != '~' {
            return None;
        }
        let len = body.len() - body.trim_start_matches(marker).len();
        if len < 3 {
            return None;
        }
        // A backtick fence's info string may not contain backticks.
        if marker == '`' && body[len..].contains('`') {
            return None;
        }
        Some(Self { marker, len, depth })
    }

    fn is_closed_by(self, content: &str) -> bool {
        let Some(body) = strip_block_indent(content) else {
            return false;
        };
        let len = body.len() - body.trim_start_matches(self.marker).len();
        len >= self.len && body[len..].trim().is_empty()
    }
}

/// Strip up to three leading spaces; `None` when the line is indented further.
fn strip_block_indent(line: &str) -> Option<&str> {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    if spaces > 3 || line[spaces..].starts_with('\t') {
        None
    } else {
        Some(&line[spaces..])
    }
}

/// Strip blockquote and list-item markers from the start of a line.
///
/// Returns the remaining content and the number of `>` markers removed.
fn strip_containers(line: &str) -> (&str, usize) {
    let mut rest = line;
    let mut depth = 0;
    loop {
        let Some(body) = strip_block_indent(rest) else {
            return (rest, depth);
        };
        if let Some(after) = body.strip_prefix('>') {
            rest = after.strip_prefix(' ').unwrap_or(after);
            depth += 1;
        } else if let Some(marker) = list_marker_regex().find(body) {
            rest = &body[marker.end()..];
        } else {
            return (rest, depth);
        }
    }
}

fn is_indented_code(line: &str) -> bool {
    line.starts_with('\t') || line.starts_with("    ")
}

/// Prose blocks (paragraphs and headings) with code and link targets masked
/// out.
///
/// Paragraph lines are joined before masking so a code span may wrap.
fn prose_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut fence: Option<Fence> = None;

    for line in text.lines() {
        let (content, depth) = strip_containers(line);

        if let Some(open) = fence {
            if depth >= open.depth {
                if open.is_closed_by(content) {
                    fence = None;
                }
                continue;
            }
            // Leaving the blockquote also ends a fence opened inside it.
            fence = None;
        }
        if let Some(opened) = Fence::open(content, depth) {
            flush_paragraph(&mut paragraph, &mut blocks);
            fence = Some(opened);
            continue;
        }
        if content.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }
        if paragraph.is_empty() && is_indented_code(content) {
            continue;
        }
        if reference_definition_regex().is_match(content) {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }
        if heading_regex().is_match(content) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(mask_prose(content));
            continue;
        }
        paragraph.push(content);
    }
    flush_paragraph(&mut paragraph, &mut blocks);

    blocks
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if !paragraph.is_empty() {
        blocks.push(mask_prose(&paragraph.join("\n")));
        paragraph.clear();
    }
}

fn mask_prose(text: &str) -> String {
    let without_code = mask_code_spans(text);
    target_regex().replace_all(&without_code, " ").into_owned()
}

/// Replace every complete code span with a single space.
///
/// An opening backtick run is closed only by a run of the same length;
/// unmatched runs are kept as literal text.
fn mask_code_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('`') {
        out.push_str(&rest[..start]);
        let opener = &rest[start..];
        let run = backtick_run_len(opener);
        let body = &opener[run..];
        if let Some(end) = find_backtick_run(body, run) {
            out.push(' ');
            rest = &body[end + run..];
        } else {
            out.push_str(&opener[..run]);
            rest = body;
        }
    }

    out.push_str(rest);
    out
}

fn backtick_run_len(text: &str) -> usize {
    text.len() - text.trim_start_matches('`').len()
}

fn find_backtick_run(text: &str, len: usize) -> Option<usize> {
    let mut offset = 0;
    while let Some(position) = text[offset..].find('`') {
        let start = offset + position;
        let run = backtick_run_len(&text[start..]);
        if run == len {
            return Some(start);
        }
        offset = start + run;
    }
    None
}
