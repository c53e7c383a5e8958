//! Dataset handle and realized state

use super::loader;
use crate::config::DatasetConfig;
use crate::decode::{Data, Scanner};
use crate::error::Result;
use crate::schema::{Kind, Schema, TypeId};
use crate::source::ByteSource;
use crate::types::RowNumber;
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Where a dataset's rows came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Field names projected so far, outermost first
    pub fields: Vec<String>,
    /// Ancestor row number of each row; `None` means row `i` is source row `i + 1`
    pub rows: Option<Arc<[RowNumber]>>,
}

impl Provenance {
    /// Provenance of a dataset loaded directly from its source
    pub fn root() -> Self {
        Self::default()
    }

    /// Dotted field path (`a.b`), or `None` when no field was projected
    pub fn field_path(&self) -> Option<String> {
        if self.fields.is_empty() {
            None
        } else {
            Some(self.fields.join("."))
        }
    }

    /// Ancestor row number of the 0-based row `index`
    pub fn row_number(&self, index: usize) -> RowNumber {
        match &self.rows {
            Some(rows) => rows.get(index).copied().unwrap_or(index as RowNumber + 1),
            None => index as RowNumber + 1,
        }
    }

    /// Same rows, one more projected field
    pub(crate) fn with_field(&self, name: &str) -> Self {
        let mut fields = self.fields.clone();
        fields.push(name.to_string());
        Self {
            fields,
            rows: self.rows.clone(),
        }
    }

    /// Same field path, new row mapping
    pub(crate) fn with_rows(&self, rows: Arc<[RowNumber]>) -> Self {
        Self {
            fields: self.fields.clone(),
            rows: Some(rows),
        }
    }
}

/// Realized contents of a dataset
#[derive(Debug)]
pub(crate) struct Loaded {
    pub(crate) schema: Schema,
    pub(crate) rows: Box<[Data]>,
    pub(crate) type_id: TypeId,
    pub(crate) kind: Kind,
}

impl Loaded {
    pub(crate) fn new(schema: Schema, rows: Box<[Data]>, type_id: TypeId) -> Self {
        let kind = schema.kind(type_id);
        Self {
            schema,
            rows,
            type_id,
            kind,
        }
    }
}

struct DatasetInner {
    source: ByteSource,
    provenance: Provenance,
    config: DatasetConfig,
    state: OnceCell<Loaded>,
}

/// A lazily-typed dataset of JSON values
///
/// Each row refers to the bytes of its [`ByteSource`] and carries the type it
/// was scanned as; the dataset's aggregate type is the union of all row
/// types. Loading happens on first access and at most once. Cloning a
/// `Dataset` clones a handle, not the rows.
#[derive(Clone)]
pub struct Dataset {
    inner: Arc<DatasetInner>,
}

impl Dataset {
    /// Create an unloaded dataset over a byte source with default settings
    pub fn new(source: impl Into<ByteSource>) -> Self {
        Self::with_config(source, DatasetConfig::default())
    }

    /// Create an unloaded dataset over a byte source
    pub fn with_config(source: impl Into<ByteSource>, config: DatasetConfig) -> Self {
        Self {
            inner: Arc::new(DatasetInner {
                source: source.into(),
                provenance: Provenance::root(),
                config,
                state: OnceCell::new(),
            }),
        }
    }

    /// Open a JSON-lines file with default settings (memory-mapped)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, DatasetConfig::default())
    }

    /// Open a JSON-lines file, mapping or reading it as configured
    pub fn open_with_config(path: impl AsRef<Path>, config: DatasetConfig) -> Result<Self> {
        config.validate()?;
        let source = if config.source.mmap {
            ByteSource::open(path)?
        } else {
            ByteSource::read(path)?
        };
        Ok(Self::with_config(source, config))
    }

    /// Create an already realized dataset
    pub(crate) fn from_loaded(
        source: ByteSource,
        provenance: Provenance,
        config: DatasetConfig,
        loaded: Loaded,
    ) -> Self {
        Self {
            inner: Arc::new(DatasetInner {
                source,
                provenance,
                config,
                state: OnceCell::with_value(loaded),
            }),
        }
    }

    // ========================================================================
    // Realization
    // ========================================================================

    /// Load every record of the source, if not done already
    ///
    /// Concurrent callers block until the single load finishes. A failed load
    /// leaves the dataset unloaded, so a later call tries again.
    pub fn realize(&self) -> Result<()> {
        self.loaded().map(|_| ())
    }

    /// Check if the dataset has been loaded
    pub fn is_realized(&self) -> bool {
        self.inner.state.get().is_some()
    }

    pub(crate) fn loaded(&self) -> Result<&Loaded> {
        self.inner
            .state
            .get_or_try_init(|| loader::load(&self.inner.source, &self.inner.config))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The shared byte source
    pub fn source(&self) -> &ByteSource {
        &self.inner.source
    }

    /// Where the rows came from
    pub fn provenance(&self) -> &Provenance {
        &self.inner.provenance
    }

    /// Settings used to load and rescan
    pub fn config(&self) -> &DatasetConfig {
        &self.inner.config
    }

    /// Dotted path of projected fields, if any
    pub fn field_path(&self) -> Option<String> {
        self.inner.provenance.field_path()
    }

    /// Check if two handles refer to the same dataset
    pub fn ptr_eq(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The dataset's own schema
    pub fn schema(&self) -> Result<&Schema> {
        Ok(&self.loaded()?.schema)
    }

    /// Scanned rows
    pub fn values(&self) -> Result<&[Data]> {
        Ok(&self.loaded()?.rows)
    }

    /// Number of rows
    pub fn nrow(&self) -> Result<usize> {
        Ok(self.loaded()?.rows.len())
    }

    /// Aggregate type id
    pub fn type_id(&self) -> Result<TypeId> {
        Ok(self.loaded()?.type_id)
    }

    /// Aggregate kind
    pub fn kind(&self) -> Result<Kind> {
        Ok(self.loaded()?.kind)
    }

    /// Number of fields for record datasets, number of rows otherwise
    pub fn len(&self) -> Result<usize> {
        let loaded = self.loaded()?;
        match loaded.schema.record(loaded.type_id) {
            Some(record) => Ok(record.len()),
            None => Ok(loaded.rows.len()),
        }
    }

    /// Check if `len()` is zero
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// `(rows, fields)` for record datasets
    pub fn dims(&self) -> Result<Option<(usize, usize)>> {
        let loaded = self.loaded()?;
        Ok(loaded
            .schema
            .record(loaded.type_id)
            .map(|record| (loaded.rows.len(), record.len())))
    }

    /// Field names in record order, for record datasets
    pub fn names(&self) -> Result<Option<Vec<String>>> {
        let loaded = self.loaded()?;
        Ok(loaded.schema.record(loaded.type_id).map(|record| {
            record
                .fields()
                .iter()
                .map(|f| loaded.schema.name(f.name_id).unwrap_or_default().to_string())
                .collect()
        }))
    }

    /// One-line description of the aggregate type
    pub fn datatype(&self) -> Result<String> {
        let loaded = self.loaded()?;
        Ok(loaded.schema.display(loaded.type_id).to_string())
    }

    /// One-line description of each field's type, for record datasets
    pub fn datatypes(&self) -> Result<Option<Vec<(String, String)>>> {
        let loaded = self.loaded()?;
        let schema = &loaded.schema;
        Ok(schema.record(loaded.type_id).map(|record| {
            record
                .fields()
                .iter()
                .map(|f| {
                    let name = schema.name(f.name_id).unwrap_or_default().to_string();
                    let mut datatype = schema.display(f.type_id).to_string();
                    if f.optional {
                        datatype.push('?');
                    }
                    (name, datatype)
                })
                .collect()
        }))
    }

    /// Ancestor row number of the 0-based row `index`
    pub fn row_number(&self, index: usize) -> RowNumber {
        self.inner.provenance.row_number(index)
    }

    /// Ancestor row numbers of every row
    pub fn row_numbers(&self) -> Result<Vec<RowNumber>> {
        let n = self.nrow()?;
        Ok((0..n).map(|i| self.row_number(i)).collect())
    }

    /// JSON text of a row (empty for absent values)
    pub fn row_text(&self, index: usize) -> Result<Option<&str>> {
        let loaded = self.loaded()?;
        Ok(loaded
            .rows
            .get(index)
            .and_then(|data| std::str::from_utf8(self.inner.source.slice(data.span)).ok()))
    }

    pub(crate) fn scanner(&self) -> Scanner {
        Scanner::new().with_max_depth(self.inner.config.limits.max_depth)
    }
}

impl PartialEq for Dataset {
    /// Handle identity: two handles are equal when they share one dataset
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Dataset");
        s.field("source", &self.inner.source)
            .field("provenance", &self.inner.provenance)
            .field("realized", &self.is_realized());
        if let Some(loaded) = self.inner.state.get() {
            s.field("nrow", &loaded.rows.len())
                .field("kind", &loaded.kind);
        }
        s.finish()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded = match self.loaded() {
            Ok(loaded) => loaded,
            Err(e) => return write!(f, "JSON dataset (not loaded: {e})"),
        };
        let datatype = loaded.schema.display(loaded.type_id);
        if loaded.kind == Kind::Record {
            write!(
                f,
                "JSON dataset with {} rows of the following type:\n{datatype:#}",
                loaded.rows.len()
            )
        } else {
            write!(
                f,
                "JSON dataset with {} rows of type {datatype}",
                loaded.rows.len()
            )
        }
    }
}
