//! Schema types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a type in a [`super::Schema`]
///
/// The primitive kinds are registered in every schema at fixed positions,
/// so the associated constants are valid ids in any schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub const NULL: TypeId = TypeId(0);
    pub const BOOLEAN: TypeId = TypeId(1);
    pub const INTEGER: TypeId = TypeId(2);
    pub const REAL: TypeId = TypeId(3);
    pub const TEXT: TypeId = TypeId(4);
    pub const ANY: TypeId = TypeId(5);

    /// Number of pre-registered primitive types
    pub(crate) const PRIMITIVES: usize = 6;

    /// Position in the schema's type table
    pub fn index(self) -> usize {
        self.0
    }

    /// Check if this is one of the pre-registered primitive types
    pub fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVES
    }
}

/// Index of an interned field name in a [`super::Schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(pub(crate) usize);

impl NameId {
    /// Position in the schema's name table
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind tag of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Real,
    Text,
    Array,
    Record,
    Any,
}

impl Kind {
    /// Check if values of this kind are JSON numbers
    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Integer | Kind::Real)
    }

    /// Check if values of this kind hold nested values
    pub fn is_composite(self) -> bool {
        matches!(self, Kind::Array | Kind::Record)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Null => write!(f, "null"),
            Kind::Boolean => write!(f, "boolean"),
            Kind::Integer => write!(f, "integer"),
            Kind::Real => write!(f, "real"),
            Kind::Text => write!(f, "text"),
            Kind::Array => write!(f, "array"),
            Kind::Record => write!(f, "record"),
            Kind::Any => write!(f, "any"),
        }
    }
}

/// One field of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldType {
    /// Interned field name
    pub name_id: NameId,
    /// Type of the field's values
    pub type_id: TypeId,
    /// Whether some values of the record lack this field
    pub optional: bool,
}

impl FieldType {
    /// Create a required field
    pub fn new(name_id: NameId, type_id: TypeId) -> Self {
        Self {
            name_id,
            type_id,
            optional: false,
        }
    }

    /// Create an optional field
    pub fn optional(name_id: NameId, type_id: TypeId) -> Self {
        Self {
            name_id,
            type_id,
            optional: true,
        }
    }
}

/// Field list of a record type, in order of first occurrence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RecordType {
    pub(crate) fields: Vec<FieldType>,
}

impl RecordType {
    /// Fields in display order
    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name
    pub fn field(&self, name_id: NameId) -> Option<&FieldType> {
        self.fields.iter().find(|f| f.name_id == name_id)
    }

    /// Field at a 0-based position
    pub fn get(&self, position: usize) -> Option<&FieldType> {
        self.fields.get(position)
    }
}

/// A type registered in a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Null,
    Boolean,
    Integer,
    Real,
    Text,
    Any,
    /// Array with the union of its element types
    Array(TypeId),
    /// Record with named fields
    Record(RecordType),
}

impl DataType {
    /// Kind tag of this type
    pub fn kind(&self) -> Kind {
        match self {
            DataType::Null => Kind::Null,
            DataType::Boolean => Kind::Boolean,
            DataType::Integer => Kind::Integer,
            DataType::Real => Kind::Real,
            DataType::Text => Kind::Text,
            DataType::Any => Kind::Any,
            DataType::Array(_) => Kind::Array,
            DataType::Record(_) => Kind::Record,
        }
    }

    /// Record metadata, if this is a record type
    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            DataType::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Element type, if this is an array type
    pub fn element(&self) -> Option<TypeId> {
        match self {
            DataType::Array(element) => Some(*element),
            _ => None,
        }
    }
}

/// Interning key: records compare as field sets, independent of order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeKey {
    Array(TypeId),
    Record(Vec<FieldType>),
}

impl TypeKey {
    pub(crate) fn record(fields: &[FieldType]) -> Self {
        let mut sorted = fields.to_vec();
        sorted.sort_unstable();
        TypeKey::Record(sorted)
    }
}
