//! The tabular data model: [`Headers`], [`Row`], [`RowBuilder`], and
//! row-shape warnings.
//!
//! `Headers` and `Row` are immutable once built and freely shareable;
//! `RowBuilder` is the mutable accumulator that enforces row shape before
//! freezing values into a `Row`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CsvError, CsvResult};

/// Ordered column names with bidirectional name/index lookup.
///
/// Names are trimmed on construction; uniqueness and lookup are
/// case-insensitive on the trimmed name. Blank-after-trim names and
/// case-folded duplicates are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    names: Vec<String>,
    // Lowercased names, parallel to `names`, for case-insensitive lookup.
    folded: Vec<String>,
}

impl Headers {
    /// Build headers from raw column names.
    pub fn new<I, S>(names: I) -> CsvResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trimmed = Vec::new();
        let mut folded: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_string();
            if name.is_empty() {
                return Err(CsvError::header("column name is blank after trimming"));
            }
            let fold = name.to_lowercase();
            if folded.contains(&fold) {
                return Err(CsvError::header(format!(
                    "duplicate column name '{name}' (case-insensitive)"
                )));
            }
            trimmed.push(name);
            folded.push(fold);
        }
        Ok(Self {
            names: trimmed,
            folded,
        })
    }

    /// Synthesize `col0..col{n-1}` for headerless input.
    pub fn synthesized(n: usize) -> Self {
        let names: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
        let folded = names.clone();
        Self { names, folded }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when there are no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of `name` (case-insensitive, trimmed), if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let fold = name.trim().to_lowercase();
        self.folded.iter().position(|f| *f == fold)
    }

    /// Column name at `idx`, if in range.
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(|s| s.as_str())
    }

    /// Iterate column names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }
}

/// Which way a record's field count mismatched the header width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// The record had fewer fields than the header; it was padded.
    TooFewFields,
    /// The record had more fields than the header; it was truncated.
    TooManyFields,
}

/// A non-fatal row-shape mismatch, tagged with the 1-based source line of the
/// record it was produced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvWarning {
    /// 1-based line number of the start of the offending record.
    pub line: u64,
    /// Mismatch direction.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
}

/// An immutable value row bound to exactly one [`Headers`] instance.
///
/// Invariant: `values.len() == headers.len()`. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    headers: Arc<Headers>,
    values: Vec<Option<String>>,
}

impl Row {
    /// The headers this row is bound to.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Number of cells (always equal to the header width).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the row has no cells (only possible with empty headers).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cell at `idx`, if in range; `None` within the `Option` is a null cell.
    pub fn get(&self, idx: usize) -> Option<Option<&str>> {
        self.values.get(idx).map(|v| v.as_deref())
    }

    /// Cell under the column `name` (case-insensitive), if the column exists.
    pub fn get_by_name(&self, name: &str) -> Option<Option<&str>> {
        let idx = self.headers.index_of(name)?;
        self.get(idx)
    }

    /// All cells in header order.
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Consume the row, yielding its cells in header order.
    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }
}

/// Mutable, headers-scoped accumulator for building a [`Row`].
///
/// Values may be appended in order, set by index, or set by name;
/// [`RowBuilder::build`] fails unless every slot was filled. Reusable via
/// [`RowBuilder::clear`].
#[derive(Debug, Clone)]
pub struct RowBuilder {
    headers: Arc<Headers>,
    slots: Vec<Option<Option<String>>>,
    next: usize,
}

impl RowBuilder {
    /// Create a builder scoped to `headers`.
    pub fn new(headers: Arc<Headers>) -> Self {
        let slots = vec![None; headers.len()];
        Self {
            headers,
            slots,
            next: 0,
        }
    }

    /// Append a value into the next unfilled positional slot.
    pub fn push(&mut self, value: Option<String>) -> CsvResult<&mut Self> {
        if self.next >= self.slots.len() {
            return Err(CsvError::header(format!(
                "row already has {} values",
                self.slots.len()
            )));
        }
        self.slots[self.next] = Some(value);
        self.next += 1;
        Ok(self)
    }

    /// Set the value at column index `idx`.
    pub fn set(&mut self, idx: usize, value: Option<String>) -> CsvResult<&mut Self> {
        if idx >= self.slots.len() {
            return Err(CsvError::header(format!(
                "column index {idx} out of range for {} columns",
                self.slots.len()
            )));
        }
        self.slots[idx] = Some(value);
        self.next = self.next.max(idx + 1);
        Ok(self)
    }

    /// Set the value under column `name` (case-insensitive).
    pub fn set_by_name(&mut self, name: &str, value: Option<String>) -> CsvResult<&mut Self> {
        match self.headers.index_of(name) {
            Some(idx) => self.set(idx, value),
            None => Err(CsvError::header(format!("no column named '{name}'"))),
        }
    }

    /// Reset all slots so the builder can accumulate another row.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.next = 0;
    }

    /// Freeze the accumulated values into a [`Row`].
    ///
    /// Fails with [`CsvError::Header`] when any slot is still unfilled.
    pub fn build(&mut self) -> CsvResult<Row> {
        let mut values = Vec::with_capacity(self.slots.len());
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            match slot.take() {
                Some(v) => values.push(v),
                None => {
                    let row_so_far = values.len();
                    self.clear();
                    return Err(CsvError::header(format!(
                        "row incomplete: column {idx} ('{}') has no value ({row_so_far} of {} filled)",
                        self.headers.name(idx).unwrap_or("?"),
                        self.slots.len()
                    )));
                }
            }
        }
        self.next = 0;
        Ok(Row {
            headers: Arc::clone(&self.headers),
            values,
        })
    }
}

pub(crate) fn row_from_values(headers: Arc<Headers>, values: Vec<Option<String>>) -> Row {
    debug_assert_eq!(values.len(), headers.len());
    Row { headers, values }
}
