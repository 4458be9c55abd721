//! Registry of recognized query parameters.
//!
//! A [`ParamRegistry`] is the complete vocabulary accepted by one listing
//! resource. It is an ordinary value built once at startup and shared
//! read-only, so different resources can carry different vocabularies.

use std::collections::HashMap;

use super::error::RegistryError;

/// Reserved name for the page size parameter.
pub const LIMIT_PARAM: &str = "limit";

/// Reserved name for the page offset parameter.
pub const OFFSET_PARAM: &str = "offset";

/// Semantic kind of a recognized parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Case-insensitive substring match on a text column.
    TextMatch,
    /// Date comparison using the `DD.MM.YYYY` grammar.
    Date,
    /// Page size.
    Limit,
    /// Number of rows to skip.
    Offset,
}

/// A single registered parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamEntry {
    name: String,
    column: String,
    kind: ParamKind,
}

impl ParamEntry {
    /// The query-string name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The store column the parameter filters on.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The parameter kind.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }
}

/// Immutable mapping from parameter names to kinds and columns.
#[derive(Debug, Clone)]
pub struct ParamRegistry {
    entries: HashMap<String, ParamEntry>,
    order_by: String,
}

impl ParamRegistry {
    /// Starts a registry whose results are ordered ascending by `order_by`.
    pub fn builder(order_by: impl Into<String>) -> ParamRegistryBuilder {
        ParamRegistryBuilder {
            order_by: order_by.into(),
            entries: Vec::new(),
        }
    }

    /// Vocabulary of the song library listing.
    ///
    /// | Parameter | Kind | Column |
    /// |-----------|------|--------|
    /// | `title` | text | `title` |
    /// | `group` | text | `band` |
    /// | `text` | text | `lyrics` |
    /// | `link` | text | `link` |
    /// | `releaseDate` | date | `release_date` |
    pub fn song_library() -> Self {
        Self::from_static(
            "title",
            &[
                ("title", "title", ParamKind::TextMatch),
                ("group", "band", ParamKind::TextMatch),
                ("text", "lyrics", ParamKind::TextMatch),
                ("link", "link", ParamKind::TextMatch),
                ("releaseDate", "release_date", ParamKind::Date),
            ],
        )
    }

    /// Vocabulary that accepts only `limit` and `offset`.
    pub fn pagination_only() -> Self {
        Self::from_static("id", &[])
    }

    fn from_static(order_by: &str, entries: &[(&str, &str, ParamKind)]) -> Self {
        let entries = entries
            .iter()
            .map(|(name, column, kind)| {
                (
                    name.to_string(),
                    ParamEntry {
                        name: name.to_string(),
                        column: column.to_string(),
                        kind: *kind,
                    },
                )
            })
            .collect();
        Self {
            entries,
            order_by: order_by.to_string(),
        }
    }

    /// Looks up a registered (non-reserved) parameter.
    pub fn get(&self, name: &str) -> Option<&ParamEntry> {
        self.entries.get(name)
    }

    /// Resolves the kind of `name`, checking the reserved names first.
    pub fn kind_of(&self, name: &str) -> Option<ParamKind> {
        match name {
            LIMIT_PARAM => Some(ParamKind::Limit),
            OFFSET_PARAM => Some(ParamKind::Offset),
            _ => self.entries.get(name).map(ParamEntry::kind),
        }
    }

    /// Column used for the ascending ordering clause.
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    /// Number of registered parameters, not counting the reserved ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if only the reserved parameters are accepted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the registered parameter names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builder for [`ParamRegistry`].
#[derive(Debug, Clone)]
pub struct ParamRegistryBuilder {
    order_by: String,
    entries: Vec<(String, String, ParamKind)>,
}

impl ParamRegistryBuilder {
    /// Registers a text-match parameter.
    pub fn text(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.entry(name, column, ParamKind::TextMatch)
    }

    /// Registers a date parameter.
    pub fn date(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.entry(name, column, ParamKind::Date)
    }

    /// Registers an additional name for the page size.
    pub fn limit_alias(self, name: impl Into<String>) -> Self {
        self.entry(name, String::new(), ParamKind::Limit)
    }

    /// Registers an additional name for the page offset.
    pub fn offset_alias(self, name: impl Into<String>) -> Self {
        self.entry(name, String::new(), ParamKind::Offset)
    }

    /// Registers a parameter of any kind.
    pub fn entry(
        mut self,
        name: impl Into<String>,
        column: impl Into<String>,
        kind: ParamKind,
    ) -> Self {
        self.entries.push((name.into(), column.into(), kind));
        self
    }

    /// Validates the entries and builds the registry.
    pub fn build(self) -> Result<ParamRegistry, RegistryError> {
        if !is_identifier(&self.order_by) {
            return Err(RegistryError::InvalidColumn {
                name: "order_by".to_string(),
                column: self.order_by,
            });
        }

        let mut entries = HashMap::with_capacity(self.entries.len());
        for (name, column, kind) in self.entries {
            if name == LIMIT_PARAM || name == OFFSET_PARAM {
                return Err(RegistryError::ReservedName { name });
            }

            let needs_column = matches!(kind, ParamKind::TextMatch | ParamKind::Date);
            if needs_column && !is_identifier(&column) {
                return Err(RegistryError::InvalidColumn { name, column });
            }

            if entries.contains_key(&name) {
                return Err(RegistryError::Duplicate { name });
            }

            entries.insert(name.clone(), ParamEntry { name, column, kind });
        }

        Ok(ParamRegistry {
            entries,
            order_by: self.order_by,
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
