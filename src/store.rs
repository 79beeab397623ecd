//! The layered option store.
//!
//! [`OptionStore`] merges up to three configuration files into one
//! key/value view. Discovery probes the system, user, and local tiers in
//! that order; resolution reads each descriptor from every loaded tier,
//! later tiers overwriting earlier ones; the last loaded tier becomes the
//! save target unless [`set_current_config`](OptionStore::set_current_config)
//! points somewhere else.
//!
//! Operations report problems through a [`DiagnosticsSink`] and keep
//! going, returning `false` instead of aborting. The store is
//! single-threaded by design; wrap it externally when sharing.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::backend::{self, SettingsStore};
use crate::diag::DiagnosticsSink;
use crate::error::ConfigError;
use crate::identity;
use crate::locate::{LocationClass, PathLocator, StandardPaths};
use crate::options::{OptionDef, OptionDefs};
use crate::{CONFIG_FORMAT, GENERAL_GROUP, VERSION_KEY};

/// The three configuration tiers, in probe order.
///
/// Resolution reads the tiers in this order, so a value in a later tier
/// overrides the same key from an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Machine-wide file from the platform application-data directories.
    System,
    /// Per-user file from the home directory.
    User,
    /// Per-directory file next to where the process runs.
    Local,
}

impl Tier {
    /// All tiers in probe order: system, then user, then local.
    pub const ALL: [Tier; 3] = [Tier::System, Tier::User, Tier::Local];

    /// The keyword naming this tier as a save target.
    pub fn keyword(self) -> &'static str {
        match self {
            Tier::System => "system",
            Tier::User => "user",
            Tier::Local => "local",
        }
    }

    /// Parses a save-target keyword. Matching is exact and case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|tier| tier.keyword() == keyword)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Save target of the store.
///
/// `Alias` names one of the tier slots instead of holding a second handle
/// to it, so a file is never owned twice.
enum Current {
    None,
    Alias(Tier),
    Owned(Box<dyn SettingsStore>),
}

/// Merged view over up to three tiers of configuration files.
///
/// The store owns one optional [`SettingsStore`] handle per tier plus a
/// save-target marker, and keeps resolved values in a private mapping of
/// full option name to ordered string list. The mapping never contains an
/// empty key; writes with an empty key are ignored.
///
/// A store starts empty. [`discover`](Self::discover) fills the tier
/// slots, [`read_options`](Self::read_options) fills the mapping, and the
/// typed readers ([`value_bool`](Self::value_bool) and friends) give
/// ergonomic access with caller-supplied defaults.
pub struct OptionStore {
    values: BTreeMap<String, Vec<String>>,
    system: Option<Box<dyn SettingsStore>>,
    user: Option<Box<dyn SettingsStore>>,
    local: Option<Box<dyn SettingsStore>>,
    current: Current,
}

impl fmt::Debug for OptionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionStore")
            .field("values", &self.values)
            .field("system", &self.tier_location(Tier::System))
            .field("user", &self.tier_location(Tier::User))
            .field("local", &self.tier_location(Tier::Local))
            .field("current", &self.current_location())
            .finish()
    }
}

impl Default for OptionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionStore {
    /// Creates an empty store: no files loaded, no values, no save target.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            system: None,
            user: None,
            local: None,
            current: Current::None,
        }
    }

    /// Discovers and loads the three tiers from the platform's standard
    /// directories and the process working directory.
    ///
    /// `app_name` overrides the process-wide
    /// [application name](crate::identity::application_name); pass `None`
    /// or an empty hint to use it. Returns `false` when any discovered
    /// file failed to load; discovery still tries the remaining tiers.
    pub fn discover(&mut self, app_name: Option<&str>, diag: &mut dyn DiagnosticsSink) -> bool {
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.discover_with(&StandardPaths::new(), &work_dir, app_name, diag)
    }

    /// [`discover`](Self::discover) against an explicit locator and
    /// working directory.
    ///
    /// The system tier comes from the locator's application-data class,
    /// the user tier from its home class, and the local tier from
    /// `work_dir`. A tier resolving to the same path as an earlier one is
    /// skipped rather than loaded twice. After loading, the save target
    /// becomes the last loaded tier (local over user over system); when
    /// nothing loaded, the sink is told that changes will not be saved.
    pub fn discover_with(
        &mut self,
        locator: &dyn PathLocator,
        work_dir: &Path,
        app_name: Option<&str>,
        diag: &mut dyn DiagnosticsSink,
    ) -> bool {
        let hint = app_name.unwrap_or("");
        let name = if hint.is_empty() {
            identity::application_name()
        } else {
            hint.to_string()
        };
        let file_name = identity::config_file_name(&name);
        tracing::debug!("discovering configuration files named {}", file_name);

        let mut all_loaded = true;

        let system_path = locator.locate(LocationClass::AppData, &file_name);
        if let Some(path) = system_path.as_deref() {
            match self.load_file(path, diag) {
                Some(store) => self.system = Some(store),
                None => all_loaded = false,
            }
        }

        let mut user_path = locator.locate(LocationClass::Home, &file_name);
        if user_path.is_some() && user_path == system_path {
            if let Some(path) = user_path.take() {
                tracing::debug!(
                    "user tier resolves to the system path {}; skipping",
                    path.display()
                );
            }
        }
        if let Some(path) = user_path.as_deref() {
            match self.load_file(path, diag) {
                Some(store) => self.user = Some(store),
                None => all_loaded = false,
            }
        }

        let local_path = work_dir.join(&file_name);
        if local_path.is_file() {
            let duplicate = Some(local_path.as_path()) == system_path.as_deref()
                || Some(local_path.as_path()) == user_path.as_deref();
            if duplicate {
                tracing::debug!(
                    "local tier resolves to an already probed path {}; skipping",
                    local_path.display()
                );
            } else {
                match self.load_file(&local_path, diag) {
                    Some(store) => self.local = Some(store),
                    None => all_loaded = false,
                }
            }
        }

        let chosen = Tier::ALL
            .into_iter()
            .rev()
            .find(|&tier| self.tier_slot(tier).is_some());
        match chosen {
            Some(tier) => {
                self.current = Current::Alias(tier);
                if let Some(location) = self.tier_location(tier) {
                    diag.add_debug(format!(
                        "changes will be saved to the {} configuration file at {}",
                        tier,
                        location.display()
                    ));
                }
            }
            None => {
                self.current = Current::None;
                diag.add_debug(
                    "no configuration file was found; changes will not be saved".to_string(),
                );
            }
        }

        all_loaded
    }

    /// Opens `path`, checks the version marker inside the reserved
    /// top-level group, and hands back the opened handle.
    ///
    /// A present version string is inserted into the mapping under
    /// [`VERSION_KEY`] whatever the file's role; a mismatch against this
    /// build's version is reported but not fatal. Failing to open the file
    /// or to enter or leave the reserved group discards the handle and
    /// returns `None`.
    fn load_file(
        &mut self,
        path: &Path,
        diag: &mut dyn DiagnosticsSink,
    ) -> Option<Box<dyn SettingsStore>> {
        tracing::debug!("loading configuration file {}", path.display());
        let mut store = match backend::open(CONFIG_FORMAT, path) {
            Ok(store) => store,
            Err(error) => {
                diag.add_error(error);
                return None;
            }
        };

        if !store.begin_group(GENERAL_GROUP) {
            diag.add_error(ConfigError::FileNotLoadable {
                path: path.to_path_buf(),
                reason: format!("cannot enter the `{GENERAL_GROUP}` group"),
            });
            return None;
        }

        let version = store.read_string(VERSION_KEY);
        if !version.is_empty() {
            insert_value(
                &mut self.values,
                VERSION_KEY.to_string(),
                vec![version.clone()],
            );
            let expected = env!("CARGO_PKG_VERSION");
            if version != expected {
                diag.add_error(ConfigError::VersionMismatch {
                    path: path.to_path_buf(),
                    found: version,
                    expected: expected.to_string(),
                });
            }
        }

        if !store.end_group(GENERAL_GROUP) {
            diag.add_error(ConfigError::FileNotLoadable {
                path: path.to_path_buf(),
                reason: format!("cannot leave the `{GENERAL_GROUP}` group"),
            });
            return None;
        }

        Some(store)
    }

    /// Resolves one descriptor against every loaded tier.
    ///
    /// Tiers are probed in [`Tier::ALL`] order and each hit re-inserts
    /// under the descriptor's full name, so the last tier containing the
    /// key wins. When no tier has it: a required descriptor reports
    /// [`ConfigError::RequiredOptionMissing`] and leaves the mapping
    /// untouched, an optional one inserts its default. Returns whether the
    /// option ended up resolved.
    pub fn read_option(&mut self, def: &OptionDef, diag: &mut dyn DiagnosticsSink) -> bool {
        let Self {
            values,
            system,
            user,
            local,
            ..
        } = self;

        let mut found = false;
        for source in [system, user, local] {
            if let Some(source) = source.as_deref_mut() {
                if read_from_source(values, source, def, diag) {
                    found = true;
                }
            }
        }

        if found {
            return true;
        }
        if def.required {
            diag.add_error(ConfigError::RequiredOptionMissing {
                option: def.full_name(),
            });
            return false;
        }
        insert_value(values, def.full_name(), def.default.clone());
        true
    }

    /// Resolves every descriptor in order and returns the logical AND of
    /// the outcomes. A failing descriptor does not stop the rest, so the
    /// mapping holds the partial result even when this returns `false`.
    pub fn read_options(&mut self, defs: &OptionDefs, diag: &mut dyn DiagnosticsSink) -> bool {
        let mut all_resolved = true;
        for def in defs {
            if !self.read_option(def, diag) {
                all_resolved = false;
            }
        }
        all_resolved
    }

    /// Points the save target at a tier keyword (`system`, `user`,
    /// `local`), a loaded tier's path, or an arbitrary existing file.
    ///
    /// A keyword requires its tier to be loaded and installs an alias. A
    /// path equal to a loaded tier's location behaves like that keyword. A
    /// path matching no tier must exist and load cleanly; the store then
    /// owns the new handle independently. The empty string always fails.
    /// On failure the previous save target is kept unchanged.
    pub fn set_current_config(&mut self, target: &str, diag: &mut dyn DiagnosticsSink) -> bool {
        if target.is_empty() {
            diag.add_error(ConfigError::NoTargetSpecified);
            return false;
        }

        if let Some(tier) = Tier::from_keyword(target) {
            if self.tier_slot(tier).is_none() {
                diag.add_error(ConfigError::TierNotLoaded { tier });
                return false;
            }
            self.current = Current::Alias(tier);
            return true;
        }

        let path = Path::new(target);
        if let Some(tier) = Tier::ALL
            .into_iter()
            .find(|&tier| self.tier_location(tier) == Some(path))
        {
            self.current = Current::Alias(tier);
            return true;
        }

        if !path.exists() {
            diag.add_error(ConfigError::TargetNotFound {
                path: path.to_path_buf(),
            });
            return false;
        }

        match self.load_file(path, diag) {
            Some(store) => {
                self.current = Current::Owned(store);
                true
            }
            None => {
                diag.add_error(ConfigError::TargetNotLoadable {
                    path: path.to_path_buf(),
                });
                false
            }
        }
    }

    fn tier_slot(&self, tier: Tier) -> Option<&dyn SettingsStore> {
        match tier {
            Tier::System => self.system.as_deref(),
            Tier::User => self.user.as_deref(),
            Tier::Local => self.local.as_deref(),
        }
    }

    /// Path of the file loaded at `tier`, when one is.
    pub fn tier_location(&self, tier: Tier) -> Option<&Path> {
        self.tier_slot(tier).map(SettingsStore::location)
    }

    /// Path of the save target, when one is selected.
    pub fn current_location(&self) -> Option<&Path> {
        match &self.current {
            Current::None => None,
            Current::Alias(tier) => self.tier_location(*tier),
            Current::Owned(store) => Some(store.location()),
        }
    }

    /// The tier the save target aliases. `None` both when no target is
    /// selected and when the target is an independently owned file.
    pub fn current_tier(&self) -> Option<Tier> {
        match &self.current {
            Current::Alias(tier) => Some(*tier),
            _ => None,
        }
    }

    /// Replaces `key` with a single value.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        insert_value(&mut self.values, key.to_string(), vec![value.into()]);
    }

    /// Replaces `key` with a full value list.
    pub fn set_values<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        insert_value(&mut self.values, key.to_string(), values);
    }

    /// Appends one value to `key`. An absent key is created, so this
    /// equals [`set_value`](Self::set_value) in that case.
    pub fn append_value(&mut self, key: &str, value: impl Into<String>) {
        if key.is_empty() {
            return;
        }
        self.values
            .entry(key.to_string())
            .or_default()
            .push(value.into());
    }

    /// Appends several values to `key`, creating the entry when absent.
    pub fn append_values<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if key.is_empty() {
            return;
        }
        self.values
            .entry(key.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// The resolved values for `key`, when present.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of keys in the unified mapping.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys of the unified mapping, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Key/value pairs of the unified mapping, in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Removes `key`, returning its values when it was present.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.values.remove(key)
    }

    fn first_token(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Reads `key` as a boolean.
    ///
    /// The tokens `FALSE`, `false`, and `0` read as false; any other
    /// stored token reads as true. A missing key or an empty value list
    /// yields `default`.
    pub fn value_bool(&self, key: &str, default: bool) -> bool {
        match self.first_token(key) {
            Some(token) => !matches!(token, "FALSE" | "false" | "0"),
            None => default,
        }
    }

    /// Reads the first token of `key` as an integer. A missing key, an
    /// empty value list, or an unparsable token yields `default`.
    pub fn value_int(&self, key: &str, default: i64) -> i64 {
        self.first_token(key)
            .and_then(|token| token.parse().ok())
            .unwrap_or(default)
    }

    /// Reads the first token of `key` as a floating-point number, with
    /// the same fallback policy as [`value_int`](Self::value_int).
    pub fn value_double(&self, key: &str, default: f64) -> f64 {
        self.first_token(key)
            .and_then(|token| token.parse().ok())
            .unwrap_or(default)
    }

    /// Reads the first token of `key` as a string.
    pub fn value_string(&self, key: &str, default: &str) -> String {
        match self.first_token(key) {
            Some(token) => token.to_string(),
            None => default.to_string(),
        }
    }

    /// Reads the whole value list of `key`. A missing key or an empty
    /// list yields `default`.
    pub fn value_string_list(&self, key: &str, default: &[String]) -> Vec<String> {
        match self.values.get(key) {
            Some(values) if !values.is_empty() => values.clone(),
            _ => default.to_vec(),
        }
    }
}

/// Reads one descriptor from one source, scoping into its group when the
/// group name is non-empty. Group entry and exit stay symmetric; a source
/// refusing the group simply reports the key as not found.
fn read_from_source(
    values: &mut BTreeMap<String, Vec<String>>,
    source: &mut dyn SettingsStore,
    def: &OptionDef,
    diag: &mut dyn DiagnosticsSink,
) -> bool {
    let scoped = !def.group.is_empty();
    if scoped && !source.begin_group(&def.group) {
        return false;
    }

    let mut found = false;
    if source.has_key(&def.name) {
        let value = source.read_string_list(&def.name);
        let full_name = def.full_name();
        diag.add_debug(format!(
            "option `{}` loaded from {}",
            full_name,
            source.location().display()
        ));
        insert_value(values, full_name, value);
        found = true;
    }

    if scoped {
        source.end_group(&def.group);
    }
    found
}

/// Guards the mapping invariant: an empty key is never inserted.
fn insert_value(values: &mut BTreeMap<String, Vec<String>>, key: String, value: Vec<String>) {
    if key.is_empty() {
        return;
    }
    values.insert(key, value);
}
