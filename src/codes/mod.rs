//! Static code translation.
//!
//! A [`CodeMap`] is an immutable lookup table from raw source labels to
//! normalized codes, with an explicit default for misses and nulls. Tables are
//! passed explicitly to [`map_column`]; nothing here mutates shared state.

pub mod labels;
pub mod tables;

use arrow::array::StringArray;
use rustc_hash::FxHashMap;

/// How raw values are normalized before lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNormalization {
    /// Exact, case-sensitive match
    Exact,
    /// Lowercase the raw value before matching
    Lowercase,
}

/// Immutable translation table from raw labels to codes
#[derive(Debug, Clone)]
pub struct CodeMap<T> {
    name: &'static str,
    entries: FxHashMap<&'static str, T>,
    default: Option<T>,
    normalization: KeyNormalization,
}

impl<T: Copy> CodeMap<T> {
    /// Build an exact-match table whose misses map to null
    #[must_use]
    pub fn new(name: &'static str, entries: &[(&'static str, T)]) -> Self {
        Self {
            name,
            entries: entries.iter().copied().collect(),
            default: None,
            normalization: KeyNormalization::Exact,
        }
    }

    /// Misses and nulls map to `default` instead of null
    #[must_use]
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    /// Lowercase raw values before lookup
    #[must_use]
    pub fn lowercase_keys(mut self) -> Self {
        self.normalization = KeyNormalization::Lowercase;
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn normalization(&self) -> KeyNormalization {
        self.normalization
    }

    /// Translate one raw value
    ///
    /// Total over every input: a value absent from the table, or a null, yields
    /// the table default.
    #[must_use]
    pub fn lookup(&self, raw: Option<&str>) -> Option<T> {
        raw.and_then(|raw| self.entry(raw)).or(self.default)
    }

    /// Translate one raw value, trying `parse` on values absent from the table
    ///
    /// For columns that mix labels with the numeric codes they stand for.
    #[must_use]
    pub fn lookup_or_parse(&self, raw: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        raw.and_then(|raw| self.entry(raw).or_else(|| parse(raw)))
            .or(self.default)
    }

    fn entry(&self, raw: &str) -> Option<T> {
        match self.normalization {
            KeyNormalization::Exact => self.entries.get(raw).copied(),
            KeyNormalization::Lowercase => self.entries.get(raw.to_lowercase().as_str()).copied(),
        }
    }
}

/// Translate a whole string column, producing a new array
///
/// The output array type follows the table's code type, e.g. `Int32Array` for
/// `CodeMap<i32>` and `BooleanArray` for `CodeMap<bool>`.
pub fn map_column<T, A>(values: &StringArray, map: &CodeMap<T>) -> A
where
    T: Copy,
    A: FromIterator<Option<T>>,
{
    values.iter().map(|value| map.lookup(value)).collect()
}

/// Count the non-null values that the table failed to translate
#[must_use]
pub fn count_unmapped<T: Copy>(values: &StringArray, map: &CodeMap<T>) -> usize {
    values
        .iter()
        .flatten()
        .filter(|value| map.entry(value).is_none())
        .count()
}
