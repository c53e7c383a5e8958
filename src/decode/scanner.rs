//! JSON value scanner
//!
//! Builds [`Data`] trees from borrowed `serde_json` raw values.

use super::types::{Children, Data};
use crate::error::Error;
use crate::schema::{FieldType, Schema, TypeId};
use crate::source::Span;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::value::RawValue;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error as ThisError;

/// Why a value could not be scanned
#[derive(ThisError, Debug)]
pub enum ScanError {
    #[error("invalid UTF-8 after {0} bytes")]
    InvalidUtf8(usize),

    #[error("{0}")]
    Syntax(#[from] serde_json::Error),

    #[error("duplicate field \"{0}\"")]
    DuplicateField(String),

    #[error("value nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("span {0:?} is outside the source")]
    OutOfBounds(Span),

    #[error(transparent)]
    Registry(#[from] Error),
}

impl ScanError {
    /// Convert into a crate error for the given 1-based row number
    ///
    /// Registry failures keep their own error; everything else means the
    /// row's text was rejected.
    pub fn into_error(self, row: u64) -> Error {
        match self {
            ScanError::Registry(err) => err,
            other => Error::malformed(row, other.to_string()),
        }
    }
}

/// Scanner classifying JSON text into typed [`Data`] values
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    max_depth: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Create a scanner with the default nesting limit (128)
    pub fn new() -> Self {
        Self { max_depth: 128 }
    }

    /// Set the maximum nesting depth of arrays and records
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Maximum nesting depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Scan the JSON value at `span` of `bytes`, registering its types in `schema`
    ///
    /// Spans in the result are relative to the start of `bytes`.
    pub fn scan(&self, schema: &mut Schema, bytes: &[u8], span: Span) -> Result<Data, ScanError> {
        let slice = bytes
            .get(span.range())
            .ok_or(ScanError::OutOfBounds(span))?;
        let text =
            std::str::from_utf8(slice).map_err(|e| ScanError::InvalidUtf8(e.valid_up_to()))?;
        let raw: &RawValue = serde_json::from_str(text)?;

        let base = bytes.as_ptr() as usize;
        self.scan_raw(schema, base, raw, 0)
    }

    fn scan_raw(
        &self,
        schema: &mut Schema,
        base: usize,
        raw: &RawValue,
        depth: usize,
    ) -> Result<Data, ScanError> {
        let text = raw.get();
        // Raw values borrow from the buffer starting at `base`
        let span = Span::new(text.as_ptr() as usize - base, text.len());

        match text.as_bytes().first() {
            Some(b'n') => Ok(Data::leaf(span, TypeId::NULL)),
            Some(b't' | b'f') => Ok(Data::leaf(span, TypeId::BOOLEAN)),
            Some(b'"') => Ok(Data::leaf(span, TypeId::TEXT)),
            Some(b'[') => self.scan_array(schema, base, span, text, depth),
            Some(b'{') => self.scan_record(schema, base, span, text, depth),
            Some(_) if is_integer_literal(text) => Ok(Data::leaf(span, TypeId::INTEGER)),
            Some(_) => Ok(Data::leaf(span, TypeId::REAL)),
            None => Ok(Data::null()),
        }
    }

    fn scan_array(
        &self,
        schema: &mut Schema,
        base: usize,
        span: Span,
        text: &str,
        depth: usize,
    ) -> Result<Data, ScanError> {
        if depth >= self.max_depth {
            return Err(ScanError::TooDeep(self.max_depth));
        }
        let raws: Vec<&RawValue> = serde_json::from_str(text)?;

        let mut items = Vec::new();
        items
            .try_reserve_exact(raws.len())
            .map_err(|_| Error::OutOfMemory)?;

        let mut element = TypeId::NULL;
        for raw in raws {
            let item = self.scan_raw(schema, base, raw, depth + 1)?;
            element = schema.union(element, item.type_id)?;
            items.push(item);
        }

        Ok(Data {
            span,
            type_id: schema.array_of(element)?,
            children: Children::Items(items.into_boxed_slice()),
        })
    }

    fn scan_record(
        &self,
        schema: &mut Schema,
        base: usize,
        span: Span,
        text: &str,
        depth: usize,
    ) -> Result<Data, ScanError> {
        if depth >= self.max_depth {
            return Err(ScanError::TooDeep(self.max_depth));
        }
        let RawFields(entries) = serde_json::from_str(text)?;

        let mut seen = HashSet::with_capacity(entries.len());
        let mut fields = Vec::new();
        fields
            .try_reserve_exact(entries.len())
            .map_err(|_| Error::OutOfMemory)?;
        let mut field_types = Vec::with_capacity(entries.len());

        for (name, raw) in entries {
            let name_id = schema.intern(&name)?;
            if !seen.insert(name_id) {
                return Err(ScanError::DuplicateField(name));
            }
            let value = self.scan_raw(schema, base, raw, depth + 1)?;
            field_types.push(FieldType::new(name_id, value.type_id));
            fields.push((name_id, value));
        }

        Ok(Data {
            span,
            type_id: schema.record_of(field_types)?,
            children: Children::Fields(fields.into_boxed_slice()),
        })
    }
}

/// JSON numbers without fraction or exponent are integers, whatever their size
fn is_integer_literal(text: &str) -> bool {
    !text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
}

/// Object members in source order, duplicates included
struct RawFields<'a>(Vec<(String, &'a RawValue)>);

impl<'de> Deserialize<'de> for RawFields<'de> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = RawFields<'de>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, &'de RawValue>()? {
                    entries.push(entry);
                }
                Ok(RawFields(entries))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
