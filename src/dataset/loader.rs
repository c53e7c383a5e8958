//! Single-pass realization of a dataset from its byte source

use super::store::RowStore;
use super::types::Loaded;
use crate::config::DatasetConfig;
use crate::decode::Scanner;
use crate::error::Result;
use crate::schema::{Schema, TypeId};
use crate::source::ByteSource;
use tracing::debug;

/// Scan every record of `source` into a fresh schema
///
/// Fails with the first malformed record (1-based row number) or resource
/// error; nothing is kept from a failed pass.
pub(crate) fn load(source: &ByteSource, config: &DatasetConfig) -> Result<Loaded> {
    debug!(
        path = ?source.path(),
        bytes = source.len(),
        mapped = source.is_mapped(),
        "loading JSON dataset"
    );

    let scanner = Scanner::new().with_max_depth(config.limits.max_depth);
    let mut schema = Schema::new();
    let mut store = RowStore::with_limit(config.limits.max_rows);
    let mut aggregate = TypeId::NULL;

    let bytes = source.as_bytes();
    for (index, span) in source.records(config.source.skip_blank_lines).enumerate() {
        let row = index as u64 + 1;
        let data = scanner
            .scan(&mut schema, bytes, span)
            .map_err(|e| e.into_error(row))?;
        aggregate = schema.union(aggregate, data.type_id)?;
        store.push(data)?;
    }

    let rows = store.finish();
    debug!(
        rows = rows.len(),
        types = schema.discovered(),
        datatype = %schema.display(aggregate),
        "loaded JSON dataset"
    );
    Ok(Loaded::new(schema, rows, aggregate))
}
