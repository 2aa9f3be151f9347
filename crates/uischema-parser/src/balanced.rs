use std::sync::OnceLock;

use regex::Regex;
use uischema_core::{ParsedComponent, ParsedProp};

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\binterface\s+(\w+)Props\b[^{;]*\{").expect("header regex must compile")
    })
}

fn member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^(?:readonly\s+)?([A-Za-z_$][\w$]*)(\?)?\s*:\s*(.+)$")
            .expect("member regex must compile")
    })
}

pub(crate) fn parse(text: &str) -> Vec<ParsedComponent> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(caps) = header_re().captures_at(text, pos) {
        let Some(header) = caps.get(0) else { break };
        let open = header.end() - 1;
        let (body, end) = match closing_brace(text.as_bytes(), open) {
            Some(close) => (&text[open + 1..close], close + 1),
            None => (&text[open + 1..], text.len()),
        };
        let props = split_members(body)
            .into_iter()
            .filter_map(member_to_prop)
            .collect();
        out.push(ParsedComponent {
            name: caps[1].to_string(),
            props,
            raw_definition_text: text[header.start()..end].to_string(),
        });
        pos = end;
    }
    out
}

/// If `pos` starts a string literal or a comment, the offset just past it.
/// Line comments stop before their newline. Unterminated trivia runs to the end.
fn skip_trivia(src: &[u8], pos: usize) -> Option<usize> {
    match src[pos] {
        q @ (b'"' | b'\'' | b'`') => {
            let mut i = pos + 1;
            while i < src.len() {
                match src[i] {
                    b'\\' => i += 2,
                    c if c == q => return Some(i + 1),
                    _ => i += 1,
                }
            }
            Some(src.len())
        }
        b'/' if src.get(pos + 1) == Some(&b'/') => Some(
            src[pos..]
                .iter()
                .position(|&c| c == b'\n')
                .map_or(src.len(), |n| pos + n),
        ),
        b'/' if src.get(pos + 1) == Some(&b'*') => Some(
            src[pos + 2..]
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(src.len(), |n| pos + 2 + n + 2),
        ),
        _ => None,
    }
}

/// Offset of the `}` closing the brace at `open`.
fn closing_brace(src: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < src.len() {
        if let Some(next) = skip_trivia(src, i) {
            i = next;
            continue;
        }
        match src[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

struct Member {
    text: String,
    description: Option<String>,
}

fn split_members(body: &str) -> Vec<Member> {
    let src = body.as_bytes();
    let mut members = Vec::new();
    let mut current = String::new();
    let mut doc: Option<String> = None;
    let mut depth: i32 = 0;
    let mut seg = 0;
    let mut i = 0;

    let mut flush = |current: &mut String, doc: &mut Option<String>| {
        let text = current.trim();
        if !text.is_empty() {
            members.push(Member {
                text: text.to_string(),
                description: doc.take(),
            });
        }
        current.clear();
    };

    while i < src.len() {
        let c = src[i];
        if c == b'/' && matches!(src.get(i + 1), Some(b'/' | b'*')) {
            let end = skip_trivia(src, i).unwrap_or(src.len());
            current.push_str(&body[seg..i]);
            if depth <= 0 && current.trim().is_empty() && starts_line(src, i) {
                let text = comment_text(&body[i..end]);
                if !text.is_empty() {
                    doc = Some(match doc.take() {
                        Some(prev) => format!("{prev} {text}"),
                        None => text,
                    });
                }
            }
            i = end;
            seg = i;
            continue;
        }
        if let (b'"' | b'\'' | b'`', Some(end)) = (c, skip_trivia(src, i)) {
            i = end;
            continue;
        }
        match c {
            b'{' | b'[' | b'(' | b'<' => depth += 1,
            b'}' | b']' | b')' => depth -= 1,
            b'>' if i == 0 || src[i - 1] != b'=' => depth -= 1,
            b';' | b',' if depth <= 0 => {
                current.push_str(&body[seg..i]);
                flush(&mut current, &mut doc);
                i += 1;
                seg = i;
                continue;
            }
            b'\n' if depth <= 0 => {
                current.push_str(&body[seg..i]);
                seg = i;
                if member_is_complete(&current) && !continues_on_next_line(&src[i..]) {
                    flush(&mut current, &mut doc);
                }
            }
            _ => {}
        }
        i += 1;
    }
    current.push_str(&body[seg..]);
    flush(&mut current, &mut doc);
    members
}

/// Only whitespace between the previous newline (or start) and `pos`.
fn starts_line(src: &[u8], pos: usize) -> bool {
    src[..pos]
        .iter()
        .rev()
        .take_while(|&&c| c != b'\n')
        .all(|c| c.is_ascii_whitespace())
}

fn member_is_complete(text: &str) -> bool {
    let t = text.trim();
    !t.is_empty()
        && t.contains(':')
        && !(t.ends_with(':') || t.ends_with('|') || t.ends_with('&') || t.ends_with("=>"))
}

fn continues_on_next_line(rest: &[u8]) -> bool {
    matches!(
        rest.iter().find(|c| !c.is_ascii_whitespace()),
        Some(b'|' | b'&' | b'=')
    )
}

fn comment_text(raw: &str) -> String {
    let inner = if let Some(line) = raw.strip_prefix("//") {
        line.to_string()
    } else {
        let s = raw.trim_start_matches("/*").trim_start_matches('*');
        let s = s.strip_suffix("*/").unwrap_or(s);
        s.lines()
            .map(|l| l.trim().trim_start_matches('*').trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };
    inner.trim().to_string()
}

fn member_to_prop(member: Member) -> Option<ParsedProp> {
    let caps = member_re().captures(&member.text)?;
    let name = &caps[1];
    if name == "interface" {
        return None;
    }
    let raw_type = caps[3].trim();
    let type_text = if raw_type.contains('\n') {
        collapse_lines(raw_type)
    } else {
        raw_type.to_string()
    };
    let prop = ParsedProp::new(name, type_text, caps.get(2).is_some());
    Some(match member.description {
        Some(d) => prop.with_description(d),
        None => prop,
    })
}

/// Joins a multi-line type onto one line.
///
/// Inside an object literal a line break that ends a member becomes `; `,
/// so `{ x: number\n y: string }` keeps its two members.
fn collapse_lines(raw: &str) -> String {
    let mut out = String::new();
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !out.is_empty() {
            let open_ended = out.ends_with(['{', ';', ',', '|', '&', '(', '[', '<', ':', '='])
                || out.ends_with("=>");
            let continues = line.starts_with(['}', ')', ']', '>', '|', '&', '='])
                || line.starts_with("=>");
            if !open_ended && !continues && innermost_open(&out) == Some(b'{') {
                out.push(';');
            }
            out.push(' ');
        }
        out.push_str(line);
    }
    out
}

/// The innermost unclosed bracket, skipping string literals.
fn innermost_open(text: &str) -> Option<u8> {
    let mut stack = Vec::new();
    let mut quote = None;
    let mut escaped = false;
    for &c in text.as_bytes() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            b'"' | b'\'' | b'`' => quote = Some(c),
            b'{' | b'(' | b'[' => stack.push(c),
            b'}' | b')' | b']' => {
                stack.pop();
            }
            _ => {}
        }
    }
    stack.last().copied()
}
