use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Identifier of a group, conventionally the stem of its workbook file name.
pub type GroupId = String;

/// Floats that convert to `i64` without saturating. `i64::MAX as f64` rounds
/// up to 2^63, hence the exclusive end.
const I64_FLOAT_RANGE: std::ops::Range<f64> = i64::MIN as f64..i64::MAX as f64;

/// Raw value of a single cell in a source table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Cell without a value.
    Empty,
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// Boolean literal.
    Bool(bool),
    /// Free text.
    Text(String),
    /// Anything else the container can hold (errors, dates, ...), kept as
    /// its display form.
    Other(String),
}

impl CellValue {
    /// Interprets the cell as an integer count. Empty cells count as zero.
    /// Returns `None` when the value cannot be read as an integer.
    pub fn as_count(&self) -> Option<i64> {
        match self {
            CellValue::Empty => Some(0),
            CellValue::Int(value) => Some(*value),
            CellValue::Float(value) => {
                let value = value.trunc();
                (I64_FLOAT_RANGE.contains(&value)).then_some(value as i64)
            }
            CellValue::Bool(value) => Some(i64::from(*value)),
            CellValue::Text(value) => value.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Returns true when the cell holds exactly the given text.
    pub fn matches_label(&self, label: &str) -> bool {
        matches!(self, CellValue::Text(value) if value == label)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value}"),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::Text(value) | CellValue::Other(value) => f.write_str(value),
        }
    }
}

/// Contiguous rows `[start, end)` belonging to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct RowInterval {
    start: u32,
    end: u32,
}

impl RowInterval {
    /// Creates a half-open interval. `start == end` denotes an empty interval.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start >= 1 && start <= end).then_some(Self { start, end })
    }

    /// Compile-time constructor for interval tables; panics on reversed bounds.
    pub const fn half_open(start: u32, end: u32) -> Self {
        assert!(start >= 1 && start <= end, "invalid row interval");
        Self { start, end }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl TryFrom<(u32, u32)> for RowInterval {
    type Error = String;

    fn try_from((start, end): (u32, u32)) -> std::result::Result<Self, Self::Error> {
        RowInterval::new(start, end).ok_or_else(|| format!("invalid row interval [{start}, {end})"))
    }
}

impl From<RowInterval> for (u32, u32) {
    fn from(interval: RowInterval) -> Self {
        (interval.start, interval.end)
    }
}

/// A named reporting bucket summing one or more row intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub name: String,
    pub rows: Vec<RowInterval>,
}

/// Ordered set of categories for one report granularity.
///
/// Declaration order is preserved so that every report built from the same
/// taxonomy lists its categories in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a category, replacing the row list of an existing category
    /// with the same name.
    pub fn with_category(mut self, name: &str, rows: &[(u32, u32)]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|&(start, end)| {
                RowInterval::new(start, end).ok_or_else(|| ToolError::InvalidInterval {
                    category: name.to_string(),
                    start,
                    end,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.insert(name, rows);
        Ok(self)
    }

    /// Appends a category or replaces the rows of an existing one.
    pub fn insert(&mut self, name: &str, rows: Vec<RowInterval>) {
        match self.categories.iter_mut().find(|category| category.name == name) {
            Some(existing) => existing.rows = rows,
            None => self.categories.push(Category {
                name: name.to_string(),
                rows,
            }),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl TryFrom<Vec<Category>> for Taxonomy {
    type Error = ToolError;

    fn try_from(categories: Vec<Category>) -> Result<Self> {
        for (index, category) in categories.iter().enumerate() {
            if categories[..index].iter().any(|earlier| earlier.name == category.name) {
                return Err(ToolError::DuplicateCategory(category.name.clone()));
            }
        }
        Ok(Self { categories })
    }
}

impl From<Taxonomy> for Vec<Category> {
    fn from(taxonomy: Taxonomy) -> Self {
        taxonomy.categories
    }
}

/// Running totals per category name, kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryAccumulator {
    totals: Vec<(String, i64)>,
}

impl CategoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the total of `category`, creating it at zero first.
    pub fn add(&mut self, category: &str, amount: i64) -> Result<()> {
        match self.totals.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => {
                *total = total
                    .checked_add(amount)
                    .ok_or_else(|| ToolError::TotalOverflow(category.to_string()))?;
            }
            None => self.totals.push((category.to_string(), amount)),
        }
        Ok(())
    }

    /// Adds every `(category, amount)` pair. Either all pairs are applied or,
    /// on overflow, none are.
    pub fn add_all<'a, I>(&mut self, amounts: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut next = self.clone();
        for (category, amount) in amounts {
            next.add(category, amount)?;
        }
        *self = next;
        Ok(())
    }

    /// Adds every total of `other` into this accumulator.
    pub fn merge(&mut self, other: &CategoryAccumulator) -> Result<()> {
        self.add_all(other.iter())
    }

    pub fn get(&self, category: &str) -> Option<i64> {
        self.totals
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.totals.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.totals.iter().map(|(name, total)| (name.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Builds an accumulator from initial totals. A repeated name keeps its first
/// position and takes the later total.
impl<S: Into<String>> FromIterator<(S, i64)> for CategoryAccumulator {
    fn from_iter<T: IntoIterator<Item = (S, i64)>>(iter: T) -> Self {
        let mut accumulator = Self::new();
        for (name, total) in iter {
            let name = name.into();
            match accumulator.totals.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, slot)) => *slot = total,
                None => accumulator.totals.push((name, total)),
            }
        }
        accumulator
    }
}

/// Ordered mapping from a top-level key (a period or a group) to its
/// accumulator.
///
/// Replacing an existing key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    entries: Vec<(String, CategoryAccumulator)>,
}

/// Results keyed by period label, merged across all sources of a batch.
pub type PeriodResultSet = ResultSet;
/// Results keyed by group identifier, one accumulator per source.
pub type GroupResultSet = ResultSet;

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `accumulator` under `key`, returning the accumulator it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        accumulator: CategoryAccumulator,
    ) -> Option<CategoryAccumulator> {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, accumulator)),
            None => {
                self.entries.push((key, accumulator));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&CategoryAccumulator> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, accumulator)| accumulator)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CategoryAccumulator> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, accumulator)| accumulator)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryAccumulator)> {
        self.entries
            .iter()
            .map(|(key, accumulator)| (key.as_str(), accumulator))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
