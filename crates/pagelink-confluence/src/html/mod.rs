//! Plain-text rendering of Confluence page markup.
//!
//! Works on both storage format (XHTML with `ac:`/`ri:` elements) and the
//! rendered view format. Block elements become line breaks, headings get a
//! `#` prefix, list items a bullet, and link targets are appended in
//! parentheses. Markup the XML reader rejects falls back to tag stripping.

mod entities;

use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;
use tracing::warn;

use entities::{convert_html_entities, decode_entity};

/// Error while walking markup.
#[derive(Debug, thiserror::Error)]
enum HtmlError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("invalid tag regex"));

/// Convert page markup to plain text.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    match render(html) {
        Ok(text) => text,
        Err(err) => {
            warn!("Falling back to tag stripping: {err}");
            strip_tags(html)
        }
    }
}

fn render(html: &str) -> Result<String, HtmlError> {
    let html = escape_stray_lt(&convert_html_entities(html));
    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;

    let mut writer = TextWriter::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = tag_name(e.name().as_ref());
                let href = (tag == "a").then(|| attribute(&e, "href")).flatten();
                writer.open(tag, href);
            }
            Event::Empty(e) => writer.empty(&tag_name(e.name().as_ref())),
            Event::End(e) => writer.close(&tag_name(e.name().as_ref())),
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                writer.text(&text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                writer.text(&decode_entity(&entity));
            }
            Event::CData(e) => writer.text(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    Ok(writer.finish())
}

fn tag_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

fn attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(name.as_bytes()))
        .map(|attr| {
            attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            )
        })
}

/// Escape `<` that cannot start markup, such as `a < b` in prose.
///
/// CDATA sections are copied verbatim.
fn escape_stray_lt(html: &str) -> String {
    const CDATA_START: &str = "<![CDATA[";
    const CDATA_END: &str = "]]>";

    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        if rest.starts_with(CDATA_START) {
            let end = rest
                .find(CDATA_END)
                .map_or(rest.len(), |end| end + CDATA_END.len());
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }
        let starts_markup = rest[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        out.push_str(if starts_markup { "<" } else { "&lt;" });
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

/// Regex fallback for markup the XML reader cannot handle.
fn strip_tags(html: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(html, " ");
    let decoded = convert_html_entities(&stripped)
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Elements whose content never reaches the output.
fn is_skipped(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "head" | "title" | "noscript" | "ac:parameter"
    )
}

/// Elements without content; a start tag is never followed by an end tag.
fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "br" | "hr"
            | "img"
            | "meta"
            | "link"
            | "input"
            | "col"
            | "area"
            | "base"
            | "wbr"
            | "source"
    )
}

/// Elements whose text keeps its whitespace.
fn is_preformatted(tag: &str) -> bool {
    matches!(tag, "pre" | "ac:plain-text-body")
}

/// Number of line breaks separating a block element from its neighbours.
fn block_breaks(tag: &str) -> Option<usize> {
    match tag {
        "p" | "pre" | "blockquote" | "table" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        | "ac:plain-text-body" => Some(2),
        "div" | "li" | "tr" | "ul" | "ol" | "dl" | "dt" | "dd" | "section" | "article"
        | "header" | "footer" | "ac:layout-section" | "ac:layout-cell" | "ac:rich-text-body"
        | "ac:task" => Some(1),
        _ => None,
    }
}

fn heading_level(tag: &str) -> Option<usize> {
    let level = tag.strip_prefix('h')?.parse::<usize>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// An open element.
struct Frame {
    tag: String,
    /// Link target and output offset where the link text starts.
    ///
    /// The offset is taken on the first text inside the link, after any
    /// pending breaks and list or heading prefix have been written.
    link: Option<(String, Option<usize>)>,
}

enum ListKind {
    Bullet,
    Ordered(usize),
}

#[derive(Default)]
struct TextWriter {
    out: String,
    stack: Vec<Frame>,
    lists: Vec<ListKind>,
    row_cells: Vec<usize>,
    cell_depth: usize,
    pending_breaks: usize,
    pending_prefix: String,
    pending_space: bool,
    skip_depth: usize,
    pre_depth: usize,
}

impl TextWriter {
    fn open(&mut self, tag: String, href: Option<String>) {
        if is_void(&tag) {
            self.empty(&tag);
            return;
        }
        if is_skipped(&tag) {
            self.skip_depth += 1;
        }
        if self.skip_depth == 0 {
            self.enter(&tag);
        }
        let link = href.map(|href| (href, None));
        self.stack.push(Frame { tag, link });
    }

    fn enter(&mut self, tag: &str) {
        if is_preformatted(tag) {
            self.pre_depth += 1;
        }
        if let Some(breaks) = block_breaks(tag) {
            self.request_break(breaks);
        }
        if let Some(level) = heading_level(tag) {
            self.pending_prefix = format!("{} ", "#".repeat(level));
        }
        match tag {
            "ul" | "ol" => {
                if self.lists.is_empty() {
                    self.request_break(2);
                }
                self.lists.push(if tag == "ol" {
                    ListKind::Ordered(0)
                } else {
                    ListKind::Bullet
                });
            }
            "li" => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        *n += 1;
                        format!("{n}. ")
                    }
                    Some(ListKind::Bullet) | None => "* ".to_owned(),
                };
                self.pending_prefix = format!("{indent}{marker}");
            }
            "tr" => self.row_cells.push(0),
            "td" | "th" => {
                if let Some(count) = self.row_cells.last_mut() {
                    if *count > 0 {
                        self.pending_prefix.push_str(" | ");
                    }
                    *count += 1;
                }
                self.cell_depth += 1;
            }
            _ => {}
        }
    }

    fn empty(&mut self, tag: &str) {
        if self.skip_depth > 0 {
            return;
        }
        match tag {
            "br" => {
                self.flush();
                self.out.push('\n');
                self.pending_space = false;
            }
            "hr" => self.request_break(2),
            _ => {}
        }
    }

    fn close(&mut self, tag: &str) {
        if !self.stack.iter().any(|frame| frame.tag == tag) {
            return;
        }
        while let Some(frame) = self.stack.pop() {
            let matched = frame.tag == tag;
            self.leave(frame);
            if matched {
                break;
            }
        }
    }

    fn leave(&mut self, frame: Frame) {
        if self.skip_depth > 0 {
            if is_skipped(&frame.tag) {
                self.skip_depth -= 1;
            }
            return;
        }
        if is_preformatted(&frame.tag) {
            self.pre_depth = self.pre_depth.saturating_sub(1);
        }
        match frame.tag.as_str() {
            "ul" | "ol" => {
                self.lists.pop();
            }
            "tr" => {
                self.row_cells.pop();
            }
            "td" | "th" => {
                self.cell_depth = self.cell_depth.saturating_sub(1);
                self.pending_space = true;
            }
            _ => {}
        }
        if let Some((href, start)) = frame.link {
            self.finish_link(&href, start);
        }
        if let Some(breaks) = block_breaks(&frame.tag) {
            self.request_break(breaks);
        }
    }

    fn finish_link(&mut self, href: &str, start: Option<usize>) {
        if href.is_empty() || href.starts_with('#') {
            return;
        }
        let label = start
            .and_then(|start| self.out.get(start..))
            .unwrap_or_default()
            .trim();
        if label.is_empty() {
            self.text(href);
        } else if label != href {
            self.out.push_str(&format!(" ({href})"));
        }
    }

    fn text(&mut self, raw: &str) {
        if self.skip_depth > 0 || raw.is_empty() {
            return;
        }
        if self.pre_depth > 0 {
            self.flush();
            self.mark_link_starts();
            self.out.push_str(raw);
            return;
        }

        let words: Vec<&str> = raw.split(char::is_whitespace).filter(|w| !w.is_empty()).collect();
        if raw.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }
        if words.is_empty() {
            return;
        }
        self.flush();
        self.mark_link_starts();
        self.out.push_str(&words.join(" "));
        self.pending_space = raw.ends_with(char::is_whitespace);
    }

    /// Open links that have not seen text yet start at the current offset.
    fn mark_link_starts(&mut self) {
        let offset = self.out.len();
        for frame in &mut self.stack {
            if let Some((_, start @ None)) = &mut frame.link {
                *start = Some(offset);
            }
        }
    }

    /// Ask for line breaks before the next text. Cells keep their content on one line.
    fn request_break(&mut self, breaks: usize) {
        if self.cell_depth > 0 {
            self.pending_space = true;
            return;
        }
        self.pending_breaks = self.pending_breaks.max(breaks);
    }

    /// Emit pending line breaks, prefix and separating space before new text.
    fn flush(&mut self) {
        if self.pending_breaks > 0 {
            if !self.out.is_empty() {
                let existing = self.out.chars().rev().take_while(|c| *c == '\n').count();
                for _ in existing..self.pending_breaks {
                    self.out.push('\n');
                }
            }
            self.pending_breaks = 0;
            self.pending_space = false;
        }
        if !self.pending_prefix.is_empty() {
            let prefix = std::mem::take(&mut self.pending_prefix);
            self.out.push_str(&prefix);
            self.pending_space = false;
        }
        if self.pending_space {
            if !self.out.is_empty() && !self.out.ends_with(['\n', ' ']) {
                self.out.push(' ');
            }
            self.pending_space = false;
        }
    }

    fn finish(mut self) -> String {
        while let Some(frame) = self.stack.pop() {
            self.leave(frame);
        }
        self.out
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_owned()
    }
}
