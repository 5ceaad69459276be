//! Date-indexed columnar table.
//!
//! [`TimeSeriesTable`] pairs an ordered time index with a polars `DataFrame`
//! whose columns are all `Float64`. Row `i` of every column refers to the
//! instant `times()[i]`. Tables are immutable once constructed: every
//! operation returns a new table, except [`TimeSeriesTable::retain`].

use std::collections::HashSet;

use polars::prelude::*;

use crate::types::{DATE_COLUMN, Date, UNIX_EPOCH_DAYS_FROM_CE, is_missing};
use crate::{Result, RondaError};

/// An ordered, date-aligned table of numeric observations.
///
/// # Example
///
/// ```
/// use ronda_traits::{Date, TimeSeriesTable};
///
/// let times = vec![
///     Date::from_ymd_opt(2024, 1, 31).unwrap(),
///     Date::from_ymd_opt(2024, 2, 29).unwrap(),
/// ];
/// let table = TimeSeriesTable::from_columns(times, vec![("SPY", vec![470.0, 505.0])]).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.values("SPY").unwrap(), vec![Some(470.0), Some(505.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    times: Vec<Date>,
    data: DataFrame,
}

impl TimeSeriesTable {
    /// Creates a table from a time index and a frame of value columns.
    ///
    /// Numeric columns are coerced to `Float64`.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidData`] if the times are not
    /// non-decreasing, the row counts differ, a column is not numeric, a
    /// column name repeats, or a column uses the reserved name `date`.
    pub fn new(times: Vec<Date>, data: DataFrame) -> Result<Self> {
        if let Some(pos) = times.windows(2).position(|w| w[0] > w[1]) {
            return Err(RondaError::InvalidData(format!(
                "times must be non-decreasing: {} follows {}",
                times[pos + 1],
                times[pos]
            )));
        }

        if data.width() > 0 && data.height() != times.len() {
            return Err(RondaError::InvalidData(format!(
                "expected {} rows, found {}",
                times.len(),
                data.height()
            )));
        }

        let mut seen = HashSet::with_capacity(data.width());
        let mut columns = Vec::with_capacity(data.width());
        for column in data.get_columns() {
            let name = column.name().as_str();
            if name == DATE_COLUMN {
                return Err(RondaError::InvalidData(format!(
                    "'{DATE_COLUMN}' is reserved for the time index"
                )));
            }
            if !seen.insert(name) {
                return Err(RondaError::InvalidData(format!("duplicate column '{name}'")));
            }
            columns.push(to_float_column(column)?);
        }

        let data = if columns.is_empty() {
            DataFrame::default()
        } else {
            DataFrame::new(columns)?
        };

        Ok(Self { times, data })
    }

    /// Creates a table from plain `f64` columns. NaN marks a missing value.
    pub fn from_columns<S, I>(times: Vec<Date>, columns: I) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Vec<f64>)>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, values)| Series::new(name.as_ref().into(), values).into_column())
            .collect::<Vec<_>>();
        Self::from_column_vec(times, columns)
    }

    /// Creates a table from nullable columns. `None` marks a missing value.
    pub fn from_nullable_columns<S, I>(times: Vec<Date>, columns: I) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Vec<Option<f64>>)>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, values)| Series::new(name.as_ref().into(), values).into_column())
            .collect::<Vec<_>>();
        Self::from_column_vec(times, columns)
    }

    fn from_column_vec(times: Vec<Date>, columns: Vec<Column>) -> Result<Self> {
        if let Some(column) = columns.iter().find(|c| c.len() != times.len()) {
            return Err(RondaError::InvalidData(format!(
                "column '{}' has {} values, expected {}",
                column.name(),
                column.len(),
                times.len()
            )));
        }
        let data = if columns.is_empty() {
            DataFrame::default()
        } else {
            DataFrame::new(columns)?
        };
        Self::new(times, data)
    }

    /// Creates a table from a flat frame holding a `Date` column plus one
    /// numeric column per asset, as delivered by a price-history provider.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::ColumnNotFound`] if `date_column` is absent and
    /// [`RondaError::InvalidData`] if it contains nulls or cannot be read as dates.
    pub fn from_dataframe(df: &DataFrame, date_column: &str) -> Result<Self> {
        let dates = df
            .column(date_column)
            .map_err(|_| RondaError::ColumnNotFound(date_column.to_string()))?
            .as_materialized_series();

        let dates = if dates.dtype() == &DataType::Date {
            dates.clone()
        } else {
            dates.strict_cast(&DataType::Date).map_err(|e| {
                RondaError::InvalidData(format!("column '{date_column}' is not a date: {e}"))
            })?
        };

        let times = dates
            .date()?
            .physical()
            .into_iter()
            .map(|d: Option<i32>| {
                d.and_then(|d| Date::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                RondaError::InvalidData(format!("column '{date_column}' contains missing dates"))
            })?;

        let data = df.drop(date_column)?;
        Self::new(times, data)
    }

    /// Flattens the table into a frame whose first column is `date`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.width() + 1);
        columns.push(Series::new(DATE_COLUMN.into(), self.times.as_slice()).into_column());
        columns.extend(self.data.get_columns().iter().cloned());
        Ok(DataFrame::new(columns)?)
    }

    /// Returns the time index.
    pub const fn times(&self) -> &[Date] {
        self.times.as_slice()
    }

    /// Returns the underlying frame of value columns.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Returns the number of rows.
    pub const fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns whether the table has no rows.
    pub const fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the number of value columns.
    pub fn width(&self) -> usize {
        self.data.width()
    }

    /// Returns the value column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Checks if a value column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Gets a value column by name.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::ColumnNotFound`] if the column is absent.
    pub fn column(&self, name: &str) -> Result<&Float64Chunked> {
        let column = self
            .data
            .column(name)
            .map_err(|_| RondaError::ColumnNotFound(name.to_string()))?;
        Ok(column.as_materialized_series().f64()?)
    }

    /// Collects a value column into a vector.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        Ok(self.column(name)?.into_iter().collect())
    }

    /// Iterates rows in index order.
    pub fn rows(&self) -> Result<Rows<'_>> {
        let mut names = Vec::with_capacity(self.width());
        let mut columns = Vec::with_capacity(self.width());
        for column in self.data.get_columns() {
            names.push(column.name().as_str());
            columns.push(column.as_materialized_series().f64()?);
        }
        Ok(Rows {
            times: &self.times,
            names,
            columns,
            index: 0,
        })
    }

    /// Returns a new table with an extra column appended.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidData`] if the length differs from the
    /// row count or the name is already taken.
    pub fn with_column(&self, name: &str, values: Vec<Option<f64>>) -> Result<Self> {
        if values.len() != self.len() {
            return Err(RondaError::InvalidData(format!(
                "column '{name}' has {} values, expected {}",
                values.len(),
                self.len()
            )));
        }
        if self.has_column(name) {
            return Err(RondaError::InvalidData(format!("duplicate column '{name}'")));
        }

        let mut columns = self.data.get_columns().to_vec();
        columns.push(Series::new(name.into(), values).into_column());
        Self::new(self.times.clone(), DataFrame::new(columns)?)
    }

    /// Returns a new table with the rows of `other` appended.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidData`] if the column sets differ or
    /// `other` starts before this table ends.
    pub fn append(&self, other: &Self) -> Result<Self> {
        if self.column_names() != other.column_names() {
            return Err(RondaError::InvalidData(format!(
                "cannot append columns {:?} to {:?}",
                other.column_names(),
                self.column_names()
            )));
        }

        let mut times = Vec::with_capacity(self.len() + other.len());
        times.extend_from_slice(&self.times);
        times.extend_from_slice(&other.times);

        let data = if self.width() == 0 {
            DataFrame::default()
        } else {
            self.data.vstack(&other.data)?
        };
        Self::new(times, data)
    }

    /// Returns a new table restricted to the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        if let Some(missing) = names.iter().find(|n| !self.has_column(n)) {
            return Err(RondaError::ColumnNotFound((*missing).to_string()));
        }
        let data = if names.is_empty() {
            DataFrame::default()
        } else {
            self.data.select(names.iter().copied())?
        };
        Self::new(self.times.clone(), data)
    }

    /// Returns `len` rows starting at `offset`, clamped to the table bounds.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        let start = offset.min(self.len());
        let end = offset.saturating_add(len).min(self.len());
        let data = if self.width() == 0 {
            DataFrame::default()
        } else {
            self.data.slice(start as i64, end - start)
        };
        Self {
            times: self.times[start..end].to_vec(),
            data,
        }
    }

    /// Returns a new table holding the rows where `mask` is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidData`] if the mask length differs from the
    /// row count.
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(RondaError::InvalidData(format!(
                "mask has {} entries, expected {}",
                mask.len(),
                self.len()
            )));
        }

        let times = self
            .times
            .iter()
            .zip(mask)
            .filter_map(|(t, keep)| keep.then_some(*t))
            .collect();

        let data = if self.width() == 0 {
            DataFrame::default()
        } else {
            let mask: BooleanChunked = mask.iter().copied().collect();
            self.data.filter(&mask)?
        };

        Ok(Self { times, data })
    }

    /// Keeps only the rows where `mask` is `true`, in place.
    ///
    /// Returns the number of removed rows. On error the table is unchanged.
    pub fn retain(&mut self, mask: &[bool]) -> Result<usize> {
        let filtered = self.filter(mask)?;
        let removed = self.len() - filtered.len();
        *self = filtered;
        Ok(removed)
    }
}

/// Coerces a numeric column to `Float64`.
fn to_float_column(column: &Column) -> Result<Column> {
    let series = column.as_materialized_series();
    match series.dtype() {
        DataType::Float64 => Ok(column.clone()),
        DataType::String | DataType::Boolean => Err(RondaError::InvalidData(format!(
            "column '{}' has non-numeric type {}",
            column.name(),
            series.dtype()
        ))),
        _ => series
            .strict_cast(&DataType::Float64)
            .map(|s| s.into_column())
            .map_err(|e| {
                RondaError::InvalidData(format!(
                    "column '{}' cannot be read as Float64: {e}",
                    column.name()
                ))
            }),
    }
}

/// One row of a [`TimeSeriesTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    /// Timestamp of the row.
    pub time: Date,
    /// Column name and value pairs, in column order.
    pub values: Vec<(&'a str, Option<f64>)>,
}

impl Row<'_> {
    /// Returns the value of a column, `None` if absent or missing.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| *v)
    }

    /// Returns `true` if every value in the row is defined.
    pub fn is_dense(&self) -> bool {
        !self.values.iter().any(|(_, v)| is_missing(*v))
    }
}

/// Iterator over the rows of a [`TimeSeriesTable`], in index order.
#[derive(Debug)]
pub struct Rows<'a> {
    times: &'a [Date],
    names: Vec<&'a str>,
    columns: Vec<&'a Float64Chunked>,
    index: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let time = *self.times.get(self.index)?;
        let values = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, column)| (*name, column.get(self.index)))
            .collect();
        self.index += 1;
        Some(Row { time, values })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.times.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl AsRef<DataFrame> for TimeSeriesTable {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<Date> {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn sample() -> TimeSeriesTable {
        TimeSeriesTable::from_columns(
            dates(3),
            vec![("SPY", vec![1.0, 2.0, 3.0]), ("QQQ", vec![10.0, 20.0, 30.0])],
        )
        .unwrap()
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.len(), 3);
        assert_eq!(table.width(), 2);
        assert_eq!(table.column_names(), vec!["SPY", "QQQ"]);
        assert_eq!(table.values("QQQ").unwrap(), vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_column_not_found() {
        let table = sample();
        let err = table.column("IWM").unwrap_err();
        assert!(matches!(err, RondaError::ColumnNotFound(name) if name == "IWM"));
    }

    #[test]
    fn test_rows_in_index_order() {
        let table = sample();
        let rows: Vec<_> = table.rows().unwrap().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].time, dates(3)[1]);
        assert_eq!(rows[1].values, vec![("SPY", Some(2.0)), ("QQQ", Some(20.0))]);
        assert_eq!(rows[2].get("QQQ"), Some(30.0));
        assert!(rows[0].is_dense());
    }

    #[test]
    fn test_rows_exact_size() {
        let table = sample();
        let mut rows = table.rows().unwrap();
        assert_eq!(rows.len(), 3);
        rows.next();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_rejects_unordered_times() {
        let mut times = dates(3);
        times.swap(0, 2);
        let result = TimeSeriesTable::from_columns(times, vec![("SPY", vec![1.0, 2.0, 3.0])]);
        assert!(matches!(result, Err(RondaError::InvalidData(_))));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let result = TimeSeriesTable::from_columns(dates(3), vec![("SPY", vec![1.0, 2.0])]);
        assert!(matches!(result, Err(RondaError::InvalidData(_))));
    }

    #[test]
    fn test_rejects_reserved_name() {
        let result = TimeSeriesTable::from_columns(dates(1), vec![("date", vec![1.0])]);
        assert!(matches!(result, Err(RondaError::InvalidData(_))));
    }

    #[test]
    fn test_integer_columns_coerced() {
        let df = df! { "SPY" => &[1i64, 2, 3] }.unwrap();
        let table = TimeSeriesTable::new(dates(3), df).unwrap();
        assert_eq!(table.values("SPY").unwrap(), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_string_column_rejected() {
        let df = df! { "SPY" => &["a", "b"] }.unwrap();
        let result = TimeSeriesTable::new(dates(2), df);
        assert!(matches!(result, Err(RondaError::InvalidData(_))));
    }

    #[test]
    fn test_with_column() {
        let table = sample();
        let extended = table
            .with_column("IWM", vec![Some(5.0), None, Some(7.0)])
            .unwrap();
        assert_eq!(extended.width(), 3);
        assert_eq!(extended.len(), 3);
        assert_eq!(extended.values("IWM").unwrap()[1], None);
        // source untouched
        assert_eq!(table.width(), 2);

        assert!(table.with_column("SPY", vec![None; 3]).is_err());
        assert!(table.with_column("IWM", vec![None; 2]).is_err());
    }

    #[test]
    fn test_append_rows() {
        let all = dates(5);
        let head = TimeSeriesTable::from_columns(all[..3].to_vec(), vec![("SPY", vec![1.0, 2.0, 3.0])])
            .unwrap();
        let tail =
            TimeSeriesTable::from_columns(all[3..].to_vec(), vec![("SPY", vec![4.0, 5.0])]).unwrap();
        let joined = head.append(&tail).unwrap();
        assert_eq!(joined.len(), 5);
        assert_eq!(joined.times(), all.as_slice());

        // out of order seam
        assert!(tail.append(&head).is_err());
    }

    #[test]
    fn test_filter_and_retain() {
        let mut table = sample();
        let filtered = table.filter(&[true, false, true]).unwrap();
        assert_eq!(filtered.values("SPY").unwrap(), vec![Some(1.0), Some(3.0)]);
        assert_eq!(filtered.times(), &[dates(3)[0], dates(3)[2]]);

        let removed = table.retain(&[false, true, true]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(table.len(), 2);
        assert!(table.retain(&[true]).is_err());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_select_and_slice() {
        let table = sample();
        let only_qqq = table.select(&["QQQ"]).unwrap();
        assert_eq!(only_qqq.column_names(), vec!["QQQ"]);
        assert!(matches!(
            table.select(&["IWM"]),
            Err(RondaError::ColumnNotFound(_))
        ));

        let tail = table.slice(1, 10);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.values("SPY").unwrap(), vec![Some(2.0), Some(3.0)]);
        assert!(table.slice(5, 1).is_empty());
    }

    #[test]
    fn test_dataframe_round_trip() {
        let table = sample();
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.width(), 3);
        assert_eq!(df.get_column_names()[0].as_str(), DATE_COLUMN);

        let back = TimeSeriesTable::from_dataframe(&df, DATE_COLUMN).unwrap();
        assert_eq!(back.times(), table.times());
        assert_eq!(back.values("SPY").unwrap(), table.values("SPY").unwrap());
    }

    #[test]
    fn test_from_dataframe_unparseable_dates() {
        let df = df! { "date" => &["soon", "later"], "SPY" => &[1.0, 2.0] }.unwrap();
        let result = TimeSeriesTable::from_dataframe(&df, "date");
        assert!(matches!(result, Err(RondaError::InvalidData(_))));
    }

    #[test]
    fn test_from_dataframe_null_dates() {
        let df = df! {
            "date" => &[Some(dates(1)[0]), None],
            "SPY" => &[1.0, 2.0],
        }
        .unwrap();
        let err = TimeSeriesTable::from_dataframe(&df, "date").unwrap_err();
        assert!(matches!(err, RondaError::InvalidData(msg) if msg.contains("missing dates")));
    }

    #[test]
    fn test_from_dataframe_datetime_truncated_to_date() {
        let stamps: Vec<chrono::NaiveDateTime> = dates(2)
            .into_iter()
            .map(|d| d.and_hms_opt(15, 30, 0).unwrap())
            .collect();
        let df = df! { "date" => stamps, "SPY" => &[1.0, 2.0] }.unwrap();
        assert!(matches!(df.column("date").unwrap().dtype(), DataType::Datetime(_, _)));

        let table = TimeSeriesTable::from_dataframe(&df, "date").unwrap();
        assert_eq!(table.times(), dates(2).as_slice());
        assert_eq!(table.values("SPY").unwrap(), vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_from_dataframe_missing_date_column() {
        let df = df! { "SPY" => &[1.0, 2.0] }.unwrap();
        let result = TimeSeriesTable::from_dataframe(&df, "date");
        assert!(matches!(result, Err(RondaError::ColumnNotFound(_))));
    }
}
