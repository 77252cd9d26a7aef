//! In-memory tables: named columns, rows of [`Value`]s and an optional date index.

use crate::{JoinKey, Result, TsPrepError, Value};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-row dates that order a table. The index is not one of its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DateIndex {
    name: String,
    dates: Vec<NaiveDate>,
}

impl DateIndex {
    /// Name of the column the index was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index dates, one per row.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }
}

/// An ordered table of rows with heterogeneous cells.
///
/// Every operation that reshapes a table consumes it and returns a new one,
/// so callers never observe a half-applied transformation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    index: Option<DateIndex>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::from_rows(columns, Vec::new())
    }

    /// Creates a table from column names and rows.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        check_unique(&columns)?;
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(TsPrepError::schema(format!(
                "row {i} has {} values but the table has {} columns",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            rows,
            index: None,
        })
    }

    /// Builds a table from a JSON array of objects. Columns appear in
    /// first-seen key order; keys absent from a record become `Null`.
    pub fn from_json_records(records: &[serde_json::Value]) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut objects = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                TsPrepError::schema(format!("record {i} is not a JSON object"))
            })?;
            for key in object.keys() {
                if !positions.contains_key(key) {
                    positions.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
            objects.push(object);
        }

        let rows = objects
            .into_iter()
            .map(|object| {
                let mut row = vec![Value::Null; columns.len()];
                for (key, value) in object {
                    row[positions[key]] = Value::from_json(value);
                }
                row
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            index: None,
        })
    }

    /// Column names, excluding the index.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// The date index, if one has been set.
    pub const fn index(&self) -> Option<&DateIndex> {
        self.index.as_ref()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_position(name)
            .ok_or_else(|| TsPrepError::missing_column(name))
    }

    /// The cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let pos = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[pos]).collect())
    }

    /// A single cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let pos = self.column_position(column)?;
        self.rows.get(row).map(|r| &r[pos])
    }

    /// Appends a row to an unindexed table.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if self.index.is_some() {
            return Err(TsPrepError::schema("cannot push rows onto an indexed table"));
        }
        if row.len() != self.columns.len() {
            return Err(TsPrepError::schema(format!(
                "row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Concatenates `other` below `self`. Columns are the union of both, in
    /// first-seen order; cells absent on one side are `Null`.
    pub fn append(&mut self, other: Self) -> Result<()> {
        if self.index.is_some() || other.index.is_some() {
            return Err(TsPrepError::schema("cannot append indexed tables"));
        }

        let mut mapping = Vec::with_capacity(other.columns.len());
        for column in &other.columns {
            let pos = match self.column_position(column) {
                Some(pos) => pos,
                None => {
                    self.columns.push(column.clone());
                    for row in &mut self.rows {
                        row.push(Value::Null);
                    }
                    self.columns.len() - 1
                }
            };
            mapping.push(pos);
        }

        let width = self.columns.len();
        for row in other.rows {
            let mut aligned = vec![Value::Null; width];
            for (value, &pos) in row.into_iter().zip(&mapping) {
                aligned[pos] = value;
            }
            self.rows.push(aligned);
        }
        Ok(())
    }

    /// Adds `name`, or replaces it in place when it already exists.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        if values.len() != self.rows.len() {
            return Err(TsPrepError::schema(format!(
                "column '{name}' has {} values but the table has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        match self.column_position(&name) {
            Some(pos) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[pos] = value;
                }
            }
            None => {
                self.columns.push(name);
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(self)
    }

    /// Removes a column.
    pub fn drop_column(mut self, name: &str) -> Result<Self> {
        let pos = self.require_column(name)?;
        self.columns.remove(pos);
        for row in &mut self.rows {
            row.remove(pos);
        }
        Ok(self)
    }

    /// Renames every column through `rename`. Fails if two names collide.
    pub fn rename_columns(mut self, rename: impl Fn(&str) -> String) -> Result<Self> {
        let renamed: Vec<String> = self.columns.iter().map(|c| rename(c)).collect();
        check_unique(&renamed)?;
        self.columns = renamed;
        Ok(self)
    }

    /// Replaces every `Null` cell. `fill` is called once per column with the
    /// column name and its cells, and returns that column's fill value.
    pub fn fill_nulls(mut self, mut fill: impl FnMut(&str, &[&Value]) -> Value) -> Self {
        for (pos, name) in self.columns.iter().enumerate() {
            let cells: Vec<&Value> = self.rows.iter().map(|row| &row[pos]).collect();
            if !cells.iter().any(|v| v.is_null()) {
                continue;
            }
            let replacement = fill(name, &cells);
            for row in &mut self.rows {
                if row[pos].is_null() {
                    row[pos] = replacement.clone();
                }
            }
        }
        self
    }

    /// Moves column `name` into the date index and sorts rows ascending by
    /// date. Ties keep their prior order.
    ///
    /// A table already indexed by `name` is only re-sorted, which makes the
    /// operation safe to repeat. Any other existing index is discarded.
    pub fn set_date_index(
        mut self,
        name: &str,
        parse: impl Fn(&Value) -> Result<NaiveDate>,
    ) -> Result<Self> {
        let Some(pos) = self.column_position(name) else {
            if self.index.as_ref().is_some_and(|ix| ix.name == name) {
                return Ok(self.sort_by_index());
            }
            return Err(TsPrepError::missing_column(name));
        };

        let dates = self
            .rows
            .iter()
            .map(|row| parse(&row[pos]))
            .collect::<Result<Vec<_>>>()?;

        self.columns.remove(pos);
        for row in &mut self.rows {
            row.remove(pos);
        }
        self.index = Some(DateIndex {
            name: name.to_string(),
            dates,
        });
        Ok(self.sort_by_index())
    }

    fn sort_by_index(mut self) -> Self {
        let Some(index) = self.index.take() else {
            return self;
        };
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by_key(|&i| index.dates[i]);

        let mut rows: Vec<Option<Vec<Value>>> = self.rows.into_iter().map(Some).collect();
        self.rows = order.iter().filter_map(|&i| rows[i].take()).collect();
        self.index = Some(DateIndex {
            dates: order.iter().map(|&i| index.dates[i]).collect(),
            name: index.name,
        });
        self
    }

    /// Inner equality join of `self.left_on` against `right.right_on`.
    ///
    /// Output rows follow the left table's order; a left row with several
    /// matches emits them in the right table's order. Rows without a match
    /// are dropped. Both key columns are kept unless they share a name.
    /// Other shared column names get `_x` / `_y` suffixes. The result has
    /// no date index.
    pub fn inner_join(&self, right: &Self, left_on: &str, right_on: &str) -> Result<Self> {
        let left_key = self.require_column(left_on)?;
        let right_key = right.require_column(right_on)?;
        let same_key = left_on == right_on;

        let right_kept: Vec<usize> = (0..right.columns.len())
            .filter(|&i| !(same_key && i == right_key))
            .collect();

        let mut columns = Vec::with_capacity(self.columns.len() + right_kept.len());
        for (i, name) in self.columns.iter().enumerate() {
            let collides = !(same_key && i == left_key)
                && right_kept.iter().any(|&j| &right.columns[j] == name);
            columns.push(if collides { format!("{name}_x") } else { name.clone() });
        }
        for &j in &right_kept {
            let name = &right.columns[j];
            let collides = self
                .columns
                .iter()
                .enumerate()
                .any(|(i, c)| c == name && !(same_key && i == left_key));
            columns.push(if collides { format!("{name}_y") } else { name.clone() });
        }

        let mut lookup: HashMap<JoinKey, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            if let Some(key) = row[right_key].join_key() {
                lookup.entry(key).or_default().push(i);
            }
        }

        let mut rows = Vec::new();
        for row in &self.rows {
            let Some(matches) = row[left_key].join_key().and_then(|k| lookup.get(&k)) else {
                continue;
            };
            for &j in matches {
                let mut joined = row.clone();
                joined.extend(right_kept.iter().map(|&c| right.rows[j][c].clone()));
                rows.push(joined);
            }
        }

        Self::from_rows(columns, rows)
    }
}

fn check_unique(columns: &[String]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(TsPrepError::schema(format!("duplicate column '{column}'")));
        }
    }
    Ok(())
}
