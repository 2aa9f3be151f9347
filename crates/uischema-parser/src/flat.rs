use std::sync::OnceLock;

use regex::Regex;
use uischema_core::{ParsedComponent, ParsedProp};

use crate::is_reserved_member;

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\binterface\s+(\w+)Props\s*\{([^}]*)\}").expect("block regex must compile")
    })
}

fn described_member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"//[ \t]*(.*?)[ \t]*\r?\n\s*(\w+)(\?)?\s*:\s*([^;]+);")
            .expect("described member regex must compile")
    })
}

fn member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\w+)(\?)?\s*:\s*([^;]+);").expect("member regex must compile")
    })
}

pub(crate) fn parse(text: &str) -> Vec<ParsedComponent> {
    block_re()
        .captures_iter(text)
        .map(|caps| {
            let body = caps.get(2).map_or("", |m| m.as_str());
            ParsedComponent {
                name: caps[1].to_string(),
                props: parse_body(body),
                raw_definition_text: caps[0].to_string(),
            }
        })
        .collect()
}

fn parse_body(body: &str) -> Vec<ParsedProp> {
    let described: Vec<ParsedProp> = described_member_re()
        .captures_iter(body)
        .map(|caps| {
            let prop = ParsedProp::new(&caps[2], caps[4].trim(), caps.get(3).is_some());
            match caps[1].trim() {
                "" => prop,
                desc => prop.with_description(desc),
            }
        })
        .collect();
    if !described.is_empty() {
        return described;
    }

    member_re()
        .captures_iter(body)
        .filter(|caps| !is_reserved_member(&caps[1]))
        .map(|caps| ParsedProp::new(&caps[1], caps[3].trim(), caps.get(2).is_some()))
        .collect()
}
