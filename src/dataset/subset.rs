//! Row subsets and field projections
//!
//! Every sub-dataset shares its parent's byte source but gets a fresh schema:
//! the selected values are scanned again so that the new aggregate type only
//! covers what was selected.

use super::store::RowStore;
use super::types::{Dataset, Loaded};
use crate::decode::Data;
use crate::error::{Error, Result};
use crate::schema::{Kind, NameId, Schema, TypeId};
use crate::types::RowNumber;
use std::sync::Arc;

impl Dataset {
    /// Select rows by 1-based index, in the given order
    ///
    /// Every index must lie in `1..=nrow`; otherwise nothing is built and
    /// `IndexOutOfRange` is returned. An empty selection is a valid 0-row
    /// dataset.
    pub fn rows(&self, indices: &[usize]) -> Result<Dataset> {
        let loaded = self.loaded()?;
        let nrow = loaded.rows.len();
        if let Some(&bad) = indices.iter().find(|&&i| i == 0 || i > nrow) {
            return Err(Error::index_out_of_range(bad, nrow));
        }

        let row_numbers: Arc<[RowNumber]> =
            indices.iter().map(|&i| self.row_number(i - 1)).collect();
        let picks = indices
            .iter()
            .zip(row_numbers.iter())
            .map(|(&i, &row)| (Some(&loaded.rows[i - 1]), row));
        let rescanned = self.rescan(picks)?;

        Ok(Dataset::from_loaded(
            self.source().clone(),
            self.provenance().with_rows(row_numbers),
            self.config().clone(),
            rescanned,
        ))
    }

    /// Project every row onto one field
    ///
    /// Returns `None` when no value of this dataset has a field of that name.
    /// Rows that lack the field, or are not records, contribute `null`.
    pub fn field(&self, name: &str) -> Result<Option<Dataset>> {
        let loaded = self.loaded()?;
        match loaded.schema.name_id(name) {
            Some(name_id) => self.project(name_id, name).map(Some),
            None => Ok(None),
        }
    }

    fn project(&self, name_id: NameId, name: &str) -> Result<Dataset> {
        let loaded = self.loaded()?;
        let picks = loaded
            .rows
            .iter()
            .enumerate()
            .map(|(i, data)| (data.field(name_id), self.row_number(i)));
        let rescanned = self.rescan(picks)?;

        Ok(Dataset::from_loaded(
            self.source().clone(),
            self.provenance().with_field(name),
            self.config().clone(),
            rescanned,
        ))
    }

    /// Rows first, then field; with neither, the same dataset
    pub fn subset(&self, indices: Option<&[usize]>, name: Option<&str>) -> Result<Option<Dataset>> {
        let selected = match indices {
            Some(indices) => self.rows(indices)?,
            None => self.clone(),
        };
        match name {
            Some(name) => selected.field(name),
            None => Ok(Some(selected)),
        }
    }

    /// Subscript by a single 1-based position
    ///
    /// For record datasets the position names a field; otherwise it selects
    /// one row.
    pub fn subscript(&self, index: usize) -> Result<Dataset> {
        let loaded = self.loaded()?;
        let Some(record) = loaded.schema.record(loaded.type_id) else {
            return self.rows(&[index]);
        };

        let field = index
            .checked_sub(1)
            .and_then(|pos| record.get(pos))
            .ok_or_else(|| Error::index_out_of_range(index, record.len()))?;
        let name = loaded.schema.name(field.name_id).unwrap_or_default();
        self.project(field.name_id, name)
    }

    /// Split a record dataset into one projected dataset per field
    ///
    /// Non-record datasets have no columns.
    pub fn columns(&self) -> Result<Vec<(String, Dataset)>> {
        let loaded = self.loaded()?;
        let Some(record) = loaded.schema.record(loaded.type_id) else {
            return Ok(Vec::new());
        };

        let mut columns = Vec::with_capacity(record.len());
        for field in record.fields() {
            let name = loaded.schema.name(field.name_id).unwrap_or_default();
            columns.push((name.to_string(), self.project(field.name_id, name)?));
        }
        Ok(columns)
    }

    /// One dataset per row holding that row's array items
    ///
    /// Items keep the row number of the row they came from. Rows that are
    /// not arrays give an empty dataset.
    pub fn elements(&self) -> Result<Vec<Dataset>> {
        let loaded = self.loaded()?;
        let mut nested = Vec::new();
        nested
            .try_reserve_exact(loaded.rows.len())
            .map_err(|_| Error::OutOfMemory)?;

        for (i, data) in loaded.rows.iter().enumerate() {
            let row = self.row_number(i);
            let items = data.items();
            let rescanned = self.rescan(items.iter().map(|item| (Some(item), row)))?;
            let row_numbers: Arc<[RowNumber]> = std::iter::repeat(row).take(items.len()).collect();
            nested.push(Dataset::from_loaded(
                self.source().clone(),
                self.provenance().with_rows(row_numbers),
                self.config().clone(),
                rescanned,
            ));
        }
        Ok(nested)
    }

    /// Scan selected values into a fresh schema and fold their union
    ///
    /// `None` picks and absent values become `null` without touching the
    /// source. `row` numbers are only used to report scan failures. The
    /// configured row limit applies as it does to a full load.
    fn rescan<'a>(
        &self,
        picks: impl Iterator<Item = (Option<&'a Data>, RowNumber)>,
    ) -> Result<Loaded> {
        let scanner = self.scanner();
        let bytes = self.source().as_bytes();
        let mut schema = Schema::new();
        let mut rows = RowStore::with_limit(self.config().limits.max_rows);
        let mut aggregate = TypeId::NULL;

        for (data, row) in picks {
            let data = match data {
                Some(data) if !data.is_absent() => scanner
                    .scan(&mut schema, bytes, data.span)
                    .map_err(|e| e.into_error(row))?,
                _ => Data::null(),
            };
            aggregate = schema.union(aggregate, data.type_id)?;
            rows.push(data)?;
        }

        Ok(Loaded::new(schema, rows.finish(), aggregate))
    }

    /// Check if this is a record dataset
    pub fn is_record(&self) -> Result<bool> {
        Ok(self.kind()? == Kind::Record)
    }
}
