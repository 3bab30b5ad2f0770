//! Help text generation for binding registries.

use crate::registry::Registry;
use std::collections::BTreeMap;

/// Fixed trailing lines explaining the tag conventions.
const SYNTAX_LINES: &str = "Prefix a boolean key with '+' to set it true, or '-' to set it false.\n\
                            Other keys are assigned with '--key' followed by a value token.\n";

/// One renderable help line: a key, its description, and whether the
/// slot is driven by the `+`/`-` boolean convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub key: String,
    pub description: String,
    pub boolean: bool,
}

/// Anything that can contribute visible entries to rendered help.
///
/// Implemented by every [`Registry`], whatever its target type, so
/// registries over different structs can merge into one rendering.
pub trait HelpSource {
    fn help_entries(&self) -> Vec<HelpEntry>;
}

impl<C> HelpSource for Registry<C> {
    fn help_entries(&self) -> Vec<HelpEntry> {
        self.visible()
            .into_iter()
            .map(|b| HelpEntry {
                key: b.key().to_string(),
                description: b.description().to_string(),
                boolean: b.slot_type().is_boolean(),
            })
            .collect()
    }
}

/// Render help text for one or more registries.
///
/// Visible entries from all sources merge into a single key-sorted view;
/// when sources share a key, the later source's entry wins. Each line
/// carries a marker (`+/-` for boolean slots, `--` otherwise), the key
/// padded to the longest merged key, and the description. A non-empty
/// program description is prepended, and `show_syntax` appends two fixed
/// lines describing the tag conventions.
pub fn render_help(description: &str, show_syntax: bool, sources: &[&dyn HelpSource]) -> String {
    let mut merged: BTreeMap<String, HelpEntry> = BTreeMap::new();
    for source in sources {
        for entry in source.help_entries() {
            merged.insert(entry.key.clone(), entry);
        }
    }

    let width = merged.keys().map(|k| k.len()).max().unwrap_or(0);

    let mut out = String::new();
    if !description.is_empty() {
        out.push_str(description);
        out.push('\n');
    }
    for entry in merged.values() {
        let marker = if entry.boolean { "+/-" } else { "-- " };
        let line = format!("{} {:<width$}  {}", marker, entry.key, entry.description);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    if show_syntax {
        out.push_str(SYNTAX_LINES);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Binding;

    #[derive(Debug, Default)]
    struct Net {
        ip: String,
        port: i32,
        debug: bool,
    }

    #[derive(Debug, Default)]
    struct Disk {
        path: String,
        fsync: bool,
    }

    fn net_registry() -> Registry<Net> {
        Registry::from_bindings([
            Binding::string("ip", |c: &Net| c.ip.clone(), |c, v| c.ip = v)
                .describe("The ip of the server."),
            Binding::int32("port", |c: &Net| c.port, |c, v| c.port = v)
                .describe("The port of the server."),
            Binding::boolean("debug", |c: &Net| c.debug, |c, v| c.debug = v).hide(),
        ])
    }

    fn disk_registry() -> Registry<Disk> {
        Registry::from_bindings([
            Binding::string("path", |c: &Disk| c.path.clone(), |c, v| c.path = v)
                .describe("Where data files live."),
            Binding::boolean("fsync", |c: &Disk| c.fsync, |c, v| c.fsync = v)
                .describe("Flush after every write."),
        ])
    }

    fn entry_lines(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|l| l.starts_with("+/-") || l.starts_with("-- "))
            .collect()
    }

    #[test]
    fn test_visible_entries_only() {
        let registry = net_registry();
        let help = render_help("", false, &[&registry]);

        assert_eq!(entry_lines(&help).len(), 2);
        assert!(!help.contains("debug"), "hidden entry leaked: {}", help);
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let registry = net_registry();
        let help = render_help("", false, &[&registry]);

        let lines = entry_lines(&help);
        assert!(lines[0].contains("ip"));
        assert!(lines[1].contains("port"));
    }

    #[test]
    fn test_markers_by_slot_type() {
        let registry = disk_registry();
        let help = render_help("", false, &[&registry]);

        let lines = entry_lines(&help);
        assert!(lines[0].starts_with("+/- fsync"), "got: {}", lines[0]);
        assert!(lines[1].starts_with("-- "), "got: {}", lines[1]);
        assert!(lines[1].contains("path"));
    }

    #[test]
    fn test_keys_aligned_to_longest() {
        let registry = disk_registry();
        let help = render_help("", false, &[&registry]);

        // "fsync" is the longest key, so both descriptions start at the
        // same column.
        let lines = entry_lines(&help);
        let col_a = lines[0].find("Flush").unwrap();
        let col_b = lines[1].find("Where").unwrap();
        assert_eq!(col_a, col_b);
    }

    #[test]
    fn test_description_prepended_when_present() {
        let registry = net_registry();

        let help = render_help("A sample server.", false, &[&registry]);
        assert!(help.starts_with("A sample server.\n"));

        let help = render_help("", false, &[&registry]);
        assert!(help.starts_with("-- "));
    }

    #[test]
    fn test_syntax_footer() {
        let registry = net_registry();

        let help = render_help("", true, &[&registry]);
        assert!(help.contains("'+' to set it true"));
        assert!(help.ends_with("followed by a value token.\n"));

        let help = render_help("", false, &[&registry]);
        assert!(!help.contains("'+' to set it true"));
    }

    #[test]
    fn test_merged_registries() {
        let net = net_registry();
        let disk = disk_registry();

        let help = render_help("", false, &[&net, &disk]);
        let lines = entry_lines(&help);
        assert_eq!(lines.len(), 4);
        // Key-sorted across both sources.
        assert!(lines[0].contains("fsync"));
        assert!(lines[1].contains("ip"));
        assert!(lines[2].contains("path"));
        assert!(lines[3].contains("port"));
    }

    #[test]
    fn test_merge_later_source_wins() {
        let net = net_registry();
        let mut other: Registry<Disk> = Registry::new();
        other.bind(
            Binding::string("ip", |c: &Disk| c.path.clone(), |c, v| c.path = v)
                .describe("Address of the replica."),
        );

        let help = render_help("", false, &[&net, &other]);
        assert!(help.contains("Address of the replica."));
        assert!(!help.contains("The ip of the server."));
    }

    #[test]
    fn test_empty_sources() {
        let help = render_help("", false, &[]);
        assert!(help.is_empty());

        let help = render_help("Only a description.", true, &[]);
        assert!(help.starts_with("Only a description.\n"));
        assert!(help.contains("'--key'"));
    }

    #[test]
    fn test_no_trailing_padding_on_empty_description() {
        let mut registry: Registry<Net> = Registry::new();
        registry.bind(Binding::int32("p", |c: &Net| c.port, |c, v| c.port = v));
        registry.bind(
            Binding::string("longer", |c: &Net| c.ip.clone(), |c, v| c.ip = v)
                .describe("Described."),
        );

        let help = render_help("", false, &[&registry]);
        let line = help
            .lines()
            .find(|l| l.contains(" p") && !l.contains("longer"))
            .unwrap();
        assert_eq!(line, line.trim_end());
    }
}
