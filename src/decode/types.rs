//! Scanned value types

use crate::schema::{Kind, NameId, Schema, TypeId};
use crate::source::Span;

/// Nested values of a scanned record or array
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Children {
    /// Scalar value (or absent)
    #[default]
    None,
    /// Array items in order
    Items(Box<[Data]>),
    /// Record fields in source order, first occurrence only
    Fields(Box<[(NameId, Data)]>),
}

/// One scanned JSON value
///
/// Holds no bytes of its own: `span` points into the byte source the value
/// was scanned from, and `type_id` into the schema it was scanned against.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    /// Location of the value's JSON text
    pub span: Span,
    /// Type assigned when the value was scanned
    pub type_id: TypeId,
    /// Nested values for records and arrays
    pub children: Children,
}

impl Data {
    /// A scalar value
    pub fn leaf(span: Span, type_id: TypeId) -> Self {
        Self {
            span,
            type_id,
            children: Children::None,
        }
    }

    /// An absent value: null type, no bytes
    pub fn null() -> Self {
        Self::leaf(Span::empty(), TypeId::NULL)
    }

    /// Kind of this value in the schema it was scanned against
    pub fn kind(&self, schema: &Schema) -> Kind {
        schema.kind(self.type_id)
    }

    /// Check if the value is `null` or absent
    pub fn is_null(&self) -> bool {
        self.type_id == TypeId::NULL
    }

    /// Check if the value has no JSON text (absent field)
    pub fn is_absent(&self) -> bool {
        self.span.is_empty()
    }

    /// Array items (empty for non-arrays)
    pub fn items(&self) -> &[Data] {
        match &self.children {
            Children::Items(items) => items,
            _ => &[],
        }
    }

    /// Record fields (empty for non-records)
    pub fn fields(&self) -> &[(NameId, Data)] {
        match &self.children {
            Children::Fields(fields) => fields,
            _ => &[],
        }
    }

    /// Value bound to a field name, if this is a record that has it
    pub fn field(&self, name_id: NameId) -> Option<&Data> {
        self.fields()
            .iter()
            .find(|(id, _)| *id == name_id)
            .map(|(_, data)| data)
    }
}

impl Default for Data {
    fn default() -> Self {
        Self::null()
    }
}
