//! INI-backed [`SettingsStore`] implementation.
//!
//! Format conventions:
//!
//! - `key = value` pairs, one per line; whitespace around both is trimmed.
//! - `[section]` headers open a section; keys before the first header land
//!   in the reserved `general` section, so `timeout` and `general/timeout`
//!   name the same entry.
//! - Key paths nest with `/`: the segment before the first slash is the
//!   section, the remainder is the key inside it (`net/pool/size` is key
//!   `pool/size` in `[net]`).
//! - A value wrapped in one pair of double quotes is unwrapped.
//! - Lists are comma-separated; entries are trimmed.
//! - Lines starting with `;` or `#` are comments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::backend::SettingsStore;
use crate::error::ConfigError;
use crate::GENERAL_GROUP;

type Sections = HashMap<String, HashMap<String, String>>;

/// One parsed INI file with a group stack for scoped reads.
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    sections: Sections,
    groups: Vec<String>,
}

impl IniStore {
    /// Reads and parses `path`. I/O and syntax problems both surface as
    /// [`ConfigError::FileNotLoadable`] with the cause in `reason`.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::FileNotLoadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let sections = Self::parse(&text).map_err(|reason| ConfigError::FileNotLoadable {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            sections,
            groups: Vec::new(),
        })
    }

    fn parse(text: &str) -> Result<Sections, String> {
        let mut sections = Sections::new();
        let mut current = GENERAL_GROUP.to_string();

        for (number, raw) in text.lines().enumerate() {
            let number = number + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err(format!("line {number}: unterminated section header"));
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(format!("line {number}: empty section name"));
                }
                current = name.to_string();
                sections.entry(current.clone()).or_default();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(format!("line {number}: expected `key = value`"));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("line {number}: empty key"));
            }
            // Later occurrences of a key overwrite earlier ones.
            sections
                .entry(current.clone())
                .or_default()
                .insert(key.to_string(), unquote(value.trim()));
        }

        Ok(sections)
    }

    /// Prefixes `key` with the entered groups.
    fn full_path(&self, key: &str) -> String {
        if self.groups.is_empty() {
            return key.to_string();
        }
        let mut path = self.groups.join("/");
        path.push('/');
        path.push_str(key);
        path
    }

    /// Splits a full key path into `(section, key)`. Paths without a slash
    /// resolve inside the reserved `general` section.
    fn resolve(path: String) -> (String, String) {
        if let Some((section, rest)) = path.split_once('/') {
            if !rest.is_empty() {
                return (section.to_string(), rest.to_string());
            }
        }
        (GENERAL_GROUP.to_string(), path)
    }

    fn lookup(&self, key: &str) -> Option<&String> {
        let (section, key) = Self::resolve(self.full_path(key));
        self.sections.get(&section).and_then(|s| s.get(&key))
    }
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

impl SettingsStore for IniStore {
    fn begin_group(&mut self, group: &str) -> bool {
        if group.is_empty() {
            return false;
        }
        self.groups.push(group.to_string());
        true
    }

    fn end_group(&mut self, group: &str) -> bool {
        if self.groups.last().is_some_and(|top| top == group) {
            self.groups.pop();
            true
        } else {
            false
        }
    }

    fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn read_string(&self, key: &str) -> String {
        self.lookup(key).cloned().unwrap_or_default()
    }

    fn read_string_list(&self, key: &str) -> Vec<String> {
        let raw = self.read_string(key);
        if raw.is_empty() {
            return Vec::new();
        }
        raw.split(',').map(|item| item.trim().to_string()).collect()
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_from(content: &str) -> IniStore {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.ini");
        std::fs::write(&path, content).unwrap();
        IniStore::open(&path).unwrap()
    }

    fn parse_error(content: &str) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ini");
        std::fs::write(&path, content).unwrap();
        match IniStore::open(&path) {
            Err(ConfigError::FileNotLoadable { reason, .. }) => reason,
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn bare_keys_land_in_general() {
        let store = store_from("timeout = 30\n");
        assert_eq!(store.read_string("timeout"), "30");
        assert_eq!(store.read_string("general/timeout"), "30");
    }

    #[test]
    fn sections_scope_keys() {
        let mut store = store_from("[net]\nport = 8080\n");
        assert_eq!(store.read_string("net/port"), "8080");
        assert!(!store.has_key("port"));

        assert!(store.begin_group("net"));
        assert_eq!(store.read_string("port"), "8080");
        assert!(store.end_group("net"));
        assert!(!store.has_key("port"));
    }

    #[test]
    fn key_paths_nest_below_the_section() {
        let store = store_from("[srv]\npool/size = 4\n");
        assert_eq!(store.read_string("srv/pool/size"), "4");
    }

    #[test]
    fn stacked_groups_join_into_the_path() {
        let mut store = store_from("[a]\nb/k = deep\n");
        assert!(store.begin_group("a"));
        assert!(store.begin_group("b"));
        assert_eq!(store.read_string("k"), "deep");
        assert!(store.end_group("b"));
        assert!(store.end_group("a"));
    }

    #[test]
    fn values_are_trimmed_and_unquoted() {
        let store = store_from("greeting =   \" hello world \"  \npadded =   plain   \n");
        assert_eq!(store.read_string("greeting"), " hello world ");
        assert_eq!(store.read_string("padded"), "plain");
    }

    #[test]
    fn lone_quote_is_kept_verbatim() {
        let store = store_from("q = \"\n");
        assert_eq!(store.read_string("q"), "\"");
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let store = store_from("; semicolon comment\n# hash comment\n\nkey = value\n");
        assert_eq!(store.read_string("key"), "value");
    }

    #[test]
    fn duplicate_key_last_wins() {
        let store = store_from("key = first\nkey = second\n");
        assert_eq!(store.read_string("key"), "second");
    }

    #[test]
    fn lists_split_on_commas_and_trim() {
        let store = store_from("hosts = alpha, beta ,gamma\nsingle = only\n");
        assert_eq!(store.read_string_list("hosts"), ["alpha", "beta", "gamma"]);
        assert_eq!(store.read_string_list("single"), ["only"]);
        assert!(store.read_string_list("absent").is_empty());
    }

    #[test]
    fn missing_keys_read_as_empty() {
        let store = store_from("present = 1\n");
        assert!(!store.has_key("absent"));
        assert_eq!(store.read_string("absent"), "");
    }

    #[test]
    fn unterminated_section_header_is_an_error() {
        let reason = parse_error("[net\nport = 1\n");
        assert!(reason.contains("line 1"), "got: {reason}");
        assert!(reason.contains("unterminated"), "got: {reason}");
    }

    #[test]
    fn empty_section_name_is_an_error() {
        let reason = parse_error("[  ]\n");
        assert!(reason.contains("line 1"), "got: {reason}");
    }

    #[test]
    fn line_without_separator_is_an_error() {
        let reason = parse_error("fine = 1\nnot a pair\n");
        assert!(reason.contains("line 2"), "got: {reason}");
    }

    #[test]
    fn missing_file_reports_not_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ini");
        match IniStore::open(&path) {
            Err(ConfigError::FileNotLoadable { path: reported, .. }) => {
                assert_eq!(reported, path);
            }
            other => panic!("expected load failure, got {other:?}"),
        }
    }

    #[test]
    fn location_reports_the_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loc.ini");
        std::fs::write(&path, "k = v\n").unwrap();
        let store = IniStore::open(&path).unwrap();
        assert_eq!(store.location(), path.as_path());
    }

    #[test]
    fn empty_group_name_is_rejected() {
        let mut store = store_from("k = v\n");
        assert!(!store.begin_group(""));
        assert_eq!(store.read_string("k"), "v");
    }

    #[test]
    fn end_group_requires_the_innermost_name() {
        let mut store = store_from("[a]\nk = v\n");
        assert!(store.begin_group("a"));
        assert!(!store.end_group("b"));
        // Stack is untouched; scoped reads still work.
        assert_eq!(store.read_string("k"), "v");
        assert!(store.end_group("a"));
    }
}
