// crates/checksuite-core/src/core/data.rs
// ============================================================================
// Module: Input Data
// Description: Tabular datasets, column mapping, and the paired run input.
// Purpose: Give metrics and tests read-only access to reference/current data.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A run consumes one [`InputData`]: an optional reference dataset, a current
//! dataset, and a [`ColumnMapping`] naming the semantic columns. Datasets are
//! shared behind `Arc` and never mutated once a run starts. Nodes declare the
//! columns they need as [`ColumnRole`]s so missing mappings and missing
//! columns are rejected before any computation runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Cell Values
// ============================================================================

/// Single cell of a tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl CellValue {
    /// Returns true for [`CellValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a float when it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "Integer cells are read as approximate floats.")]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as text when it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as a boolean when it is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ============================================================================
// SECTION: Dataset Interface
// ============================================================================

/// Read-only tabular data addressed by column name.
pub trait Dataset: Send + Sync {
    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns column names in dataset order.
    fn column_names(&self) -> Vec<&str>;

    /// Returns all values of a column, or `None` when it does not exist.
    fn column(&self, name: &str) -> Option<&[CellValue]>;

    /// Returns true when the column exists.
    fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Returns a single cell.
    fn value(&self, column: &str, row: usize) -> Option<&CellValue> {
        self.column(column).and_then(|values| values.get(row))
    }
}

impl dyn Dataset + '_ {
    /// Iterates rows in order.
    #[must_use]
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            data: self,
            next: 0,
        }
    }
}

/// Borrowed view of one dataset row.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    /// Dataset the row belongs to.
    data: &'a dyn Dataset,
    /// Zero-based row index.
    index: usize,
}

impl<'a> Row<'a> {
    /// Returns the zero-based row index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the cell in the named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.data.value(column, self.index)
    }
}

/// Iterator over dataset rows.
pub struct Rows<'a> {
    /// Dataset being iterated.
    data: &'a dyn Dataset,
    /// Index of the next row.
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.data.row_count() {
            return None;
        }
        let row = Row {
            data: self.data,
            index: self.next,
        };
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.row_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

// ============================================================================
// SECTION: Data Frame
// ============================================================================

/// Errors raised while building a [`DataFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Column name already present.
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    /// Column length differs from the frame's row count.
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column.
        column: String,
        /// Row count of the frame.
        expected: usize,
        /// Row count of the column.
        actual: usize,
    },
}

/// Named column of a [`DataFrame`].
#[derive(Debug, Clone, PartialEq)]
struct FrameColumn {
    /// Column name.
    name: String,
    /// Column values, one per row.
    values: Vec<CellValue>,
}

/// In-memory columnar dataset.
///
/// # Invariants
/// - Column names are unique.
/// - Every column holds exactly `row_count` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    /// Columns in insertion order.
    columns: Vec<FrameColumn>,
    /// Shared row count.
    row_count: usize,
}

impl DataFrame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column and returns the frame.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] when the name is taken or the length differs.
    pub fn with_column<V>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, DataError>
    where
        V: Into<CellValue>,
    {
        self.push_column(name, values.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    /// Appends a column in place.
    ///
    /// The first column fixes the frame's row count.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] when the name is taken or the length differs.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<CellValue>,
    ) -> Result<(), DataError> {
        let name = name.into();
        if self.columns.iter().any(|column| column.name == name) {
            return Err(DataError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.row_count {
            return Err(DataError::LengthMismatch {
                column: name,
                expected: self.row_count,
                actual: values.len(),
            });
        }
        self.row_count = values.len();
        self.columns.push(FrameColumn {
            name,
            values,
        });
        Ok(())
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterates rows in order.
    #[must_use]
    pub fn rows(&self) -> Rows<'_> {
        let data: &dyn Dataset = self;
        data.rows()
    }
}

impl Dataset for DataFrame {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.iter().find(|column| column.name == name).map(|column| column.values.as_slice())
    }
}

// ============================================================================
// SECTION: Column Mapping
// ============================================================================

/// Columns holding model predictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum PredictionColumns {
    /// Single column of predicted labels.
    Labels(String),
    /// One probability column per class.
    Probabilities(Vec<String>),
}

impl PredictionColumns {
    /// Returns every column name involved.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Labels(column) => vec![column.as_str()],
            Self::Probabilities(columns) => columns.iter().map(String::as_str).collect(),
        }
    }
}

/// Semantic column a node requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// The mapped target column.
    Target,
    /// The mapped prediction column(s).
    Prediction,
    /// A column referenced by name.
    Column(String),
}

impl ColumnRole {
    /// Builds a role for a named column.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => f.write_str("target"),
            Self::Prediction => f.write_str("prediction"),
            Self::Column(name) => write!(f, "column `{name}`"),
        }
    }
}

/// Assignment of semantic roles to dataset columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Ground-truth column.
    pub target: Option<String>,
    /// Prediction column(s).
    pub prediction: Option<PredictionColumns>,
    /// Row identifier column.
    pub id: Option<String>,
    /// Timestamp column.
    pub datetime: Option<String>,
    /// Numerical feature columns.
    pub numerical_features: Vec<String>,
    /// Categorical feature columns.
    pub categorical_features: Vec<String>,
    /// Label treated as positive in binary classification.
    pub pos_label: Option<String>,
}

impl ColumnMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target column.
    #[must_use]
    pub fn with_target(mut self, column: impl Into<String>) -> Self {
        self.target = Some(column.into());
        self
    }

    /// Sets a single predicted-label column.
    #[must_use]
    pub fn with_prediction_labels(mut self, column: impl Into<String>) -> Self {
        self.prediction = Some(PredictionColumns::Labels(column.into()));
        self
    }

    /// Sets per-class probability columns.
    #[must_use]
    pub fn with_prediction_probabilities<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prediction =
            Some(PredictionColumns::Probabilities(columns.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets the row identifier column.
    #[must_use]
    pub fn with_id(mut self, column: impl Into<String>) -> Self {
        self.id = Some(column.into());
        self
    }

    /// Sets the timestamp column.
    #[must_use]
    pub fn with_datetime(mut self, column: impl Into<String>) -> Self {
        self.datetime = Some(column.into());
        self
    }

    /// Sets the numerical feature columns.
    #[must_use]
    pub fn with_numerical_features<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numerical_features = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the categorical feature columns.
    #[must_use]
    pub fn with_categorical_features<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_features = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the positive label.
    #[must_use]
    pub fn with_pos_label(mut self, label: impl Into<String>) -> Self {
        self.pos_label = Some(label.into());
        self
    }

    /// Resolves a role to concrete column names.
    ///
    /// Returns `None` when the role has no mapping entry. An empty list of
    /// probability columns counts as no entry.
    #[must_use]
    pub fn resolve(&self, role: &ColumnRole) -> Option<Vec<String>> {
        match role {
            ColumnRole::Target => self.target.clone().map(|column| vec![column]),
            ColumnRole::Prediction => self
                .prediction
                .as_ref()
                .map(|prediction| {
                    prediction.columns().into_iter().map(str::to_string).collect::<Vec<_>>()
                })
                .filter(|columns| !columns.is_empty()),
            ColumnRole::Column(name) => Some(vec![name.clone()]),
        }
    }
}

// ============================================================================
// SECTION: Run Input
// ============================================================================

/// Which side of the paired input a dataset is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSide {
    /// Baseline dataset.
    Reference,
    /// Newly observed dataset.
    Current,
}

impl fmt::Display for DatasetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Current => f.write_str("current"),
        }
    }
}

/// Immutable input shared by every node of a run.
#[derive(Clone)]
pub struct InputData {
    /// Optional baseline dataset.
    reference: Option<Arc<dyn Dataset>>,
    /// Dataset under test.
    current: Arc<dyn Dataset>,
    /// Semantic column assignment.
    column_mapping: ColumnMapping,
}

impl InputData {
    /// Creates run input from shared datasets.
    #[must_use]
    pub fn new(
        reference: Option<Arc<dyn Dataset>>,
        current: Arc<dyn Dataset>,
        column_mapping: ColumnMapping,
    ) -> Self {
        Self {
            reference,
            current,
            column_mapping,
        }
    }

    /// Creates run input from owned data frames.
    #[must_use]
    pub fn from_frames(
        reference: Option<DataFrame>,
        current: DataFrame,
        column_mapping: ColumnMapping,
    ) -> Self {
        let reference = reference.map(|frame| Arc::new(frame) as Arc<dyn Dataset>);
        Self::new(reference, Arc::new(current), column_mapping)
    }

    /// Returns the reference dataset when present.
    #[must_use]
    pub fn reference(&self) -> Option<&dyn Dataset> {
        self.reference.as_deref()
    }

    /// Returns the current dataset.
    #[must_use]
    pub fn current(&self) -> &dyn Dataset {
        self.current.as_ref()
    }

    /// Returns the dataset on one side of the input.
    #[must_use]
    pub fn dataset(&self, side: DatasetSide) -> Option<&dyn Dataset> {
        match side {
            DatasetSide::Reference => self.reference(),
            DatasetSide::Current => Some(self.current()),
        }
    }

    /// Returns the column mapping.
    #[must_use]
    pub const fn column_mapping(&self) -> &ColumnMapping {
        &self.column_mapping
    }

    /// Returns the column of the mapped target in the given dataset.
    #[must_use]
    pub fn target(&self, side: DatasetSide) -> Option<&[CellValue]> {
        let column = self.column_mapping.target.as_deref()?;
        self.dataset(side)?.column(column)
    }
}

impl fmt::Debug for InputData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputData")
            .field("reference_rows", &self.reference.as_ref().map(|data| data.row_count()))
            .field("current_rows", &self.current.row_count())
            .field("column_mapping", &self.column_mapping)
            .finish()
    }
}
