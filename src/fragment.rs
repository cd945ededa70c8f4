//! Conversion of server HTML fragments into styled text lines.
//!
//! The console server emits a small, flat subset of HTML: `div` and
//! `span` elements carrying CSS classes, with command output already
//! escaped. Parsing is total; malformed markup degrades to text.

use unicode_width::UnicodeWidthStr;

/// A run of text sharing the same set of CSS classes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FragmentSpan {
    pub text: String,
    /// Classes from the outermost to the innermost enclosing element.
    pub classes: Vec<String>,
}

impl FragmentSpan {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FragmentLine {
    pub spans: Vec<FragmentSpan>,
}

impl FragmentLine {
    /// Plain text of the line, without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Display width of the line in terminal columns.
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.width()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

/// A parsed HTML body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub lines: Vec<FragmentLine>,
}

const BLOCK_TAGS: &[&str] = &[
    "div", "p", "pre", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "table", "tr",
];

struct Element {
    name: String,
    classes: Vec<String>,
}

#[derive(Default)]
struct Builder {
    lines: Vec<FragmentLine>,
    current: FragmentLine,
    stack: Vec<Element>,
    /// Whitespace-only text holding a newline, kept until the next token
    /// shows whether it is markup indentation or a line break in content.
    pending_gap: Option<String>,
}

impl Builder {
    fn classes(&self) -> Vec<String> {
        self.stack
            .iter()
            .flat_map(|e| e.classes.iter().cloned())
            .collect()
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let classes = self.classes();
        match self.current.spans.last_mut() {
            Some(last) if last.classes == classes => last.text.push_str(text),
            _ => self.current.spans.push(FragmentSpan {
                text: text.to_string(),
                classes,
            }),
        }
    }

    fn break_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        self.lines.push(line);
    }

    /// Break only if something is pending on the current line.
    fn soft_break(&mut self) {
        if !self.current.is_empty() {
            self.break_line();
        }
    }

    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        if raw.contains('\n') && raw.trim().is_empty() {
            self.pending_gap = Some(raw.to_string());
            return;
        }
        self.flush_gap();
        self.emit(raw);
    }

    /// Emit a held gap as content.
    fn flush_gap(&mut self) {
        if let Some(gap) = self.pending_gap.take() {
            self.emit(&gap);
        }
    }

    fn emit(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        let mut parts = decoded.split('\n');
        if let Some(first) = parts.next() {
            self.push_text(first.trim_end_matches('\r'));
        }
        for part in parts {
            self.break_line();
            self.push_text(part.trim_end_matches('\r'));
        }
    }

    fn open(&mut self, name: String, classes: Vec<String>, self_closing: bool) {
        if name == "br" {
            self.pending_gap = None;
            self.break_line();
            return;
        }
        if BLOCK_TAGS.contains(&name.as_str()) {
            // Indentation before a block element.
            self.pending_gap = None;
            self.soft_break();
        } else {
            self.flush_gap();
        }
        if !self_closing {
            self.stack.push(Element { name, classes });
        }
    }

    fn close(&mut self, name: &str) {
        if BLOCK_TAGS.contains(&name) {
            self.pending_gap = None;
        } else {
            self.flush_gap();
        }
        if let Some(pos) = self.stack.iter().rposition(|e| e.name == name) {
            self.stack.truncate(pos);
        }
        if BLOCK_TAGS.contains(&name) {
            self.soft_break();
        }
    }

    fn finish(mut self) -> Fragment {
        self.pending_gap = None;
        self.soft_break();
        Fragment { lines: self.lines }
    }
}

impl Fragment {
    /// Parse an HTML fragment.
    pub fn parse(html: &str) -> Self {
        let mut builder = Builder::default();
        let mut rest = html;

        while let Some(start) = rest.find('<') {
            builder.text(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('>') else {
                builder.text(&rest[start..]);
                rest = "";
                break;
            };
            handle_tag(&mut builder, &after[..end]);
            rest = &after[end + 1..];
        }
        builder.text(rest);

        builder.finish()
    }

    /// A single line of plain text with the given classes.
    pub fn text_line(text: &str, classes: &[&str]) -> Self {
        Fragment {
            lines: vec![FragmentLine {
                spans: vec![FragmentSpan {
                    text: text.to_string(),
                    classes: classes.iter().map(|c| c.to_string()).collect(),
                }],
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn handle_tag(builder: &mut Builder, tag: &str) {
    let tag = tag.trim();
    if tag.starts_with('!') || tag.starts_with('?') {
        return;
    }
    if let Some(name) = tag.strip_prefix('/') {
        builder.close(&name.trim().to_ascii_lowercase());
        return;
    }

    let self_closing = tag.ends_with('/');
    let tag = tag.trim_end_matches('/');
    let name_end = tag.find(char::is_whitespace).unwrap_or(tag.len());
    let name = tag[..name_end].to_ascii_lowercase();
    if name.is_empty() {
        builder.text(&format!("<{}>", tag));
        return;
    }
    let classes = attribute(&tag[name_end..], "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    builder.open(name, classes, self_closing);
}

/// Extract a quoted attribute value.
fn attribute<'a>(attrs: &'a str, wanted: &str) -> Option<&'a str> {
    let mut rest = attrs;
    while let Some(eq) = rest.find('=') {
        let key = rest[..eq].split_whitespace().last().unwrap_or_default();
        let value_part = rest[eq + 1..].trim_start();
        let (value, remainder) = match value_part.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &value_part[1..];
                let close = inner.find(quote).unwrap_or(inner.len());
                (&inner[..close], inner.get(close + 1..).unwrap_or_default())
            }
            _ => {
                let close = value_part
                    .find(char::is_whitespace)
                    .unwrap_or(value_part.len());
                (&value_part[..close], &value_part[close..])
            }
        };
        if key.eq_ignore_ascii_case(wanted) {
            return Some(value);
        }
        rest = remainder;
    }
    None
}

/// Decode the character references the server produces.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&candidate[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
