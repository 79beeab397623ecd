//! Option descriptors: what an application expects its files to provide.
//!
//! An [`OptionDef`] names one option, the group it lives under in a file,
//! and what happens when no file provides it (fall back on a default, or
//! fail when [`require`](OptionDef::require)d). [`OptionDefs`] batches
//! descriptors for [`OptionStore::read_options`](crate::OptionStore::read_options).

/// Describes a single option an application understands.
///
/// Two descriptors compare equal when their names match, whatever their
/// groups, defaults, or flags; the name alone is a descriptor's identity.
#[derive(Debug, Clone, Default)]
pub struct OptionDef {
    /// Key the option is stored under, without the group prefix.
    pub name: String,
    /// Group the option lives in. Empty means ungrouped.
    pub group: String,
    /// Human-readable description.
    pub description: String,
    /// Values used when no configuration file provides the option.
    pub default: Vec<String>,
    /// When set, resolution reports an error instead of falling back on
    /// the default.
    pub required: bool,
}

impl OptionDef {
    /// Creates a descriptor for `name`: ungrouped, no default, optional.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Places the option inside `group`.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Attaches a human-readable description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the values used when no file provides the option.
    pub fn default_value<I, S>(mut self, default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = default.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the option as required: resolution fails when no file has it.
    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    /// Full lookup key: `group/name`, or just `name` when ungrouped.
    pub fn full_name(&self) -> String {
        if self.group.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.group, self.name)
        }
    }
}

impl PartialEq for OptionDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for OptionDef {}

/// An ordered batch of option descriptors.
#[derive(Debug, Clone, Default)]
pub struct OptionDefs(Vec<OptionDef>);

impl OptionDefs {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor built from the common four fields.
    ///
    /// Covers the usual case in one call; push a hand-built [`OptionDef`]
    /// when the option is required.
    pub fn add<I, S>(&mut self, name: &str, group: &str, description: &str, default: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.push(
            OptionDef::new(name)
                .in_group(group)
                .describe(description)
                .default_value(default),
        );
        self
    }

    /// Appends a prepared descriptor.
    pub fn push(&mut self, def: OptionDef) -> &mut Self {
        self.0.push(def);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the descriptors in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, OptionDef> {
        self.0.iter()
    }
}

impl From<Vec<OptionDef>> for OptionDefs {
    fn from(defs: Vec<OptionDef>) -> Self {
        Self(defs)
    }
}

impl FromIterator<OptionDef> for OptionDefs {
    fn from_iter<T: IntoIterator<Item = OptionDef>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for OptionDefs {
    type Item = OptionDef;
    type IntoIter = std::vec::IntoIter<OptionDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OptionDefs {
    type Item = &'a OptionDef;
    type IntoIter = std::slice::Iter<'a, OptionDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
