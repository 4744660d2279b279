//! Minimal markdown to HTML rendering for package readmes.
//!
//! Supports ATX headings, paragraphs, fenced code, lists, block quotes,
//! horizontal rules, and inline code, emphasis and links. Raw HTML in the
//! source is escaped. Rendered blocks are separated by a single newline.
//!
//! Quotes and link brackets nested deeper than [`MAX_NESTING`] are rendered
//! as literal text.

/// Deepest block quote or bracket nesting that is still interpreted.
pub const MAX_NESTING: usize = 32;

/// Renders markdown source as an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    render_blocks(&lines, 0).join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

fn render_blocks(lines: &[&str], depth: usize) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_start();

        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        if let Some(fence) = fence_marker(trimmed) {
            let info = trimmed[fence.len()..].trim();
            let mut body = String::new();
            i += 1;
            while i < lines.len() && !lines[i].trim_start().starts_with(fence) {
                escape_into(&mut body, lines[i]);
                body.push('\n');
                i += 1;
            }
            // Skip the closing fence, if there is one.
            i += 1;
            let class = match info.split_whitespace().next() {
                Some(lang) => format!(" class=\"language-{}\"", escape(lang)),
                None => String::new(),
            };
            blocks.push(format!("<pre><code{}>{}</code></pre>", class, body));
            continue;
        }

        if let Some((level, text)) = heading(trimmed) {
            blocks.push(format!("<h{0}>{1}</h{0}>", level, render_inline(text)));
            i += 1;
            continue;
        }

        if is_rule(trimmed) {
            blocks.push("<hr />".to_string());
            i += 1;
            continue;
        }

        if depth < MAX_NESTING && trimmed.starts_with('>') {
            let mut quoted = Vec::new();
            while i < lines.len() {
                let Some(rest) = lines[i].trim_start().strip_prefix('>') else {
                    break;
                };
                quoted.push(rest.strip_prefix(' ').unwrap_or(rest));
                i += 1;
            }
            blocks.push(format!(
                "<blockquote>\n{}\n</blockquote>",
                render_blocks(&quoted, depth + 1).join("\n")
            ));
            continue;
        }

        if let Some((kind, _)) = list_item(trimmed) {
            let mut items: Vec<String> = Vec::new();
            while i < lines.len() {
                let current = lines[i].trim_start();
                if current.is_empty() {
                    break;
                }
                match list_item(current) {
                    Some((next_kind, text)) if next_kind == kind => items.push(text.to_string()),
                    Some(_) => break,
                    None => match items.last_mut() {
                        Some(last) => {
                            last.push('\n');
                            last.push_str(current);
                        }
                        None => break,
                    },
                }
                i += 1;
            }
            let mut html = format!("<{}>\n", kind.tag());
            for item in items {
                html.push_str(&format!("<li>{}</li>\n", render_inline(&item)));
            }
            html.push_str(&format!("</{}>", kind.tag()));
            blocks.push(html);
            continue;
        }

        let mut paragraph: Vec<&str> = Vec::new();
        while i < lines.len() {
            let current = lines[i].trim();
            if current.is_empty() || (!paragraph.is_empty() && starts_block(current, depth)) {
                break;
            }
            paragraph.push(current);
            i += 1;
        }
        blocks.push(format!("<p>{}</p>", render_inline(&paragraph.join("\n"))));
    }

    blocks
}

fn starts_block(line: &str, depth: usize) -> bool {
    fence_marker(line).is_some()
        || heading(line).is_some()
        || is_rule(line)
        || (depth < MAX_NESTING && line.starts_with('>'))
        || list_item(line).is_some()
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((level, rest.trim().trim_end_matches('#').trim_end()))
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|&marker| compact.chars().all(|c| c == marker))
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(text) = line.strip_prefix(marker) {
            return Some((ListKind::Unordered, text.trim()));
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(text) = line[digits..].strip_prefix(". ") {
            return Some((ListKind::Ordered, text.trim()));
        }
    }
    None
}

fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        match c {
            '\\' => {
                if let Some(next) = rest[1..].chars().next().filter(|n| n.is_ascii_punctuation()) {
                    escape_char(&mut out, next);
                    rest = &rest[1 + next.len_utf8()..];
                    prev = Some(next);
                    continue;
                }
            }
            '`' => {
                if let Some(end) = rest[1..].find('`') {
                    out.push_str("<code>");
                    escape_into(&mut out, &rest[1..1 + end]);
                    out.push_str("</code>");
                    rest = &rest[end + 2..];
                    prev = Some('`');
                    continue;
                }
            }
            '*' | '_' if !(c == '_' && prev.is_some_and(char::is_alphanumeric)) => {
                if let Some((html, consumed)) = emphasis(rest, c) {
                    out.push_str(&html);
                    rest = &rest[consumed..];
                    prev = Some(c);
                    continue;
                }
            }
            '[' => {
                if let Some((label, url, consumed)) = link(rest) {
                    out.push_str(&format!(
                        "<a href=\"{}\">{}</a>",
                        escape(url),
                        render_inline(label)
                    ));
                    rest = &rest[consumed..];
                    prev = Some(')');
                    continue;
                }
            }
            _ => {}
        }
        escape_char(&mut out, c);
        rest = &rest[c.len_utf8()..];
        prev = Some(c);
    }
    out
}

/// Renders `**strong**` or `*em*` (or the underscore forms) at the start of `text`.
fn emphasis(text: &str, marker: char) -> Option<(String, usize)> {
    let double: String = [marker, marker].iter().collect();
    if let Some(inner) = text.strip_prefix(double.as_str()) {
        let end = inner.find(double.as_str())?;
        if end == 0 {
            return None;
        }
        let html = format!("<strong>{}</strong>", render_inline(&inner[..end]));
        return Some((html, end + 4));
    }

    let inner = &text[1..];
    if inner.starts_with(char::is_whitespace) {
        return None;
    }
    let end = inner.find(marker)?;
    if end == 0 {
        return None;
    }
    Some((format!("<em>{}</em>", render_inline(&inner[..end])), end + 2))
}

/// Parses `[label](url)` at the start of `text`.
///
/// The label ends at the bracket matching the opening one; escaped brackets
/// do not count. Labels nested deeper than [`MAX_NESTING`] are not links.
fn link(text: &str) -> Option<(&str, &str, usize)> {
    let mut open = 0usize;
    let mut escaped = false;
    let mut label_end = None;
    for (idx, c) in text.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => {
                open += 1;
                if open > MAX_NESTING {
                    return None;
                }
            }
            ']' if open == 0 => {
                label_end = Some(idx);
                break;
            }
            ']' => open -= 1,
            _ => {}
        }
    }

    let label_end = label_end?;
    let target = text[label_end + 1..].strip_prefix('(')?;
    let url_len = target.find(')')?;
    let url = target[..url_len].trim();
    Some((&text[1..label_end], url, label_end + 2 + url_len + 1))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        escape_char(out, c);
    }
}

fn escape_char(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(c),
    }
}
