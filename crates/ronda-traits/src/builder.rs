//! Row-wise assembly of a [`TimeSeriesTable`].

use crate::types::Date;
use crate::{Result, RondaError, TimeSeriesTable};

/// Builds a [`TimeSeriesTable`] one row at a time.
///
/// The builder owns every value pushed so far, so a table only exists once
/// [`TableBuilder::build`] has validated the complete set of rows. Readers
/// never observe a partially written row.
///
/// # Example
///
/// ```
/// use ronda_traits::{Date, TableBuilder};
///
/// let mut builder = TableBuilder::new(["SPY", "SPY_SMA"]);
/// builder
///     .push_row(Date::from_ymd_opt(2024, 1, 31).unwrap(), &[Some(470.0), Some(465.0)])
///     .unwrap();
/// let table = builder.build().unwrap();
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder {
    names: Vec<String>,
    times: Vec<Date>,
    columns: Vec<Vec<Option<f64>>>,
}

impl TableBuilder {
    /// Create a builder for the given column names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_capacity(names, 0)
    }

    /// Create a builder that reserves space for `rows` rows.
    pub fn with_capacity<I, S>(names: I, rows: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let columns = names.iter().map(|_| Vec::with_capacity(rows)).collect();
        Self {
            names,
            times: Vec::with_capacity(rows),
            columns,
        }
    }

    /// Column names in order.
    pub const fn names(&self) -> &[String] {
        self.names.as_slice()
    }

    /// Number of rows pushed so far.
    pub const fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no row has been pushed yet.
    pub const fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidData`] if `values` does not match the
    /// column count or `time` precedes the previous row. The builder is left
    /// unchanged on error.
    pub fn push_row(&mut self, time: Date, values: &[Option<f64>]) -> Result<()> {
        if values.len() != self.names.len() {
            return Err(RondaError::InvalidData(format!(
                "row has {} values, expected {}",
                values.len(),
                self.names.len()
            )));
        }
        if let Some(last) = self.times.last()
            && time < *last
        {
            return Err(RondaError::InvalidData(format!(
                "row at {time} precedes previous row at {last}"
            )));
        }

        self.times.push(time);
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(*value);
        }
        Ok(())
    }

    /// Validate and publish the table.
    pub fn build(self) -> Result<TimeSeriesTable> {
        TimeSeriesTable::from_nullable_columns(self.times, self.names.into_iter().zip(self.columns))
    }
}
