//! Interface scanner.
//!
//! This is not a TypeScript parser. It recognises `interface <Name>Props { ... }`
//! blocks and the `name?: type;` members inside them, and never fails: text it
//! cannot make sense of simply contributes no components or no props.

mod balanced;
mod flat;

use serde::{Deserialize, Serialize};
use uischema_core::ParsedComponent;

/// How interface bodies are delimited.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Body ends at the first `}`; props come from the two-pass line patterns.
    /// A prop whose type contains `{ ... }` truncates the body.
    Flat,
    /// Body ends at the `}` that closes the opening brace; members are split at
    /// depth zero, so nested object types stay intact.
    #[default]
    Balanced,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InterfaceParser {
    mode: ScanMode,
}

impl InterfaceParser {
    pub fn new(mode: ScanMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// One component per matched block, in source order.
    pub fn parse(&self, text: &str) -> Vec<ParsedComponent> {
        match self.mode {
            ScanMode::Flat => flat::parse(text),
            ScanMode::Balanced => balanced::parse(text),
        }
    }
}

/// Parses with the default (balanced) scanner.
pub fn parse_components(text: &str) -> Vec<ParsedComponent> {
    InterfaceParser::default().parse(text)
}

/// Identifiers the line patterns can pick up from embedded type aliases.
pub(crate) fn is_reserved_member(name: &str) -> bool {
    name == "type" || name == "interface"
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
interface ChartProps {
  title: string;
  style: { color: string; width: number };
  series?: number[];
}
"#;

    #[test]
    fn flat_mode_truncates_at_first_closing_brace() {
        let comps = InterfaceParser::new(ScanMode::Flat).parse(NESTED);
        assert_eq!(comps.len(), 1);
        // The body stops inside `style`: its type is cut at the first `;` and
        // `series` is never seen.
        let c = &comps[0];
        assert_eq!(c.prop_names().collect::<Vec<_>>(), vec!["title", "style"]);
        assert_eq!(c.props[1].type_text, "{ color: string");
    }

    #[test]
    fn balanced_mode_keeps_nested_object_types() {
        let comps = InterfaceParser::new(ScanMode::Balanced).parse(NESTED);
        assert_eq!(comps.len(), 1);
        let c = &comps[0];
        assert_eq!(c.prop_names().collect::<Vec<_>>(), vec!["title", "style", "series"]);
        assert_eq!(c.props[1].type_text, "{ color: string; width: number }");
        assert!(c.props[2].optional);
    }

    #[test]
    fn both_modes_agree_on_simple_interfaces() {
        let text = "interface AProps { id: string; label?: string; }\ninterface BProps {\n  count: number;\n}\n";
        let flat = InterfaceParser::new(ScanMode::Flat).parse(text);
        let balanced = InterfaceParser::new(ScanMode::Balanced).parse(text);
        assert_eq!(flat.len(), 2);
        assert_eq!(balanced.len(), 2);
        for (f, b) in flat.iter().zip(&balanced) {
            assert_eq!(f.name, b.name);
            assert_eq!(f.props, b.props);
        }
    }

    #[test]
    fn parsing_is_idempotent() {
        for mode in [ScanMode::Flat, ScanMode::Balanced] {
            let p = InterfaceParser::new(mode);
            assert_eq!(p.parse(NESTED), p.parse(NESTED));
        }
    }
}
