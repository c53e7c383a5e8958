//! Type registry and union

use super::render::TypeDisplay;
use super::types::{DataType, FieldType, Kind, NameId, RecordType, TypeId, TypeKey};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Append-only table of types and interned field names
///
/// Types are never mutated once registered. Structurally equal array and
/// record types share one id, so comparing ids compares types.
#[derive(Debug, Clone)]
pub struct Schema {
    types: Vec<DataType>,
    index: HashMap<TypeKey, TypeId>,
    names: Vec<String>,
    name_index: HashMap<String, NameId>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Create a schema holding only the primitive types
    pub fn new() -> Self {
        Self {
            types: vec![
                DataType::Null,
                DataType::Boolean,
                DataType::Integer,
                DataType::Real,
                DataType::Text,
                DataType::Any,
            ],
            index: HashMap::new(),
            names: Vec::new(),
            name_index: HashMap::new(),
        }
    }

    /// Total number of registered types, primitives included
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no array or record type has been discovered yet
    pub fn is_empty(&self) -> bool {
        self.discovered() == 0
    }

    /// Number of array and record types discovered so far
    pub fn discovered(&self) -> usize {
        self.types.len() - TypeId::PRIMITIVES
    }

    /// Look up a type
    pub fn get(&self, id: TypeId) -> Option<&DataType> {
        self.types.get(id.0)
    }

    /// Kind of a type; ids foreign to this schema report `Any`
    pub fn kind(&self, id: TypeId) -> Kind {
        self.get(id).map_or(Kind::Any, DataType::kind)
    }

    /// Record metadata of a type, if it is a record
    pub fn record(&self, id: TypeId) -> Option<&RecordType> {
        self.get(id).and_then(DataType::as_record)
    }

    /// Element type of an array type
    pub fn element(&self, id: TypeId) -> Option<TypeId> {
        self.get(id).and_then(DataType::element)
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Intern a field name, returning its id
    pub fn intern(&mut self, name: &str) -> Result<NameId> {
        if let Some(id) = self.name_index.get(name) {
            return Ok(*id);
        }
        self.names.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        self.name_index
            .try_reserve(1)
            .map_err(|_| Error::OutOfMemory)?;

        let id = NameId(self.names.len());
        self.names.push(name.to_string());
        self.name_index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look up an interned name
    pub fn name_id(&self, name: &str) -> Option<NameId> {
        self.name_index.get(name).copied()
    }

    /// Text of an interned name
    pub fn name(&self, id: NameId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// All interned names, in order of first occurrence
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register (or find) the array type with the given element type
    pub fn array_of(&mut self, element: TypeId) -> Result<TypeId> {
        self.register(TypeKey::Array(element), DataType::Array(element))
    }

    /// Register (or find) a record type
    ///
    /// The caller guarantees names are distinct. When a structurally equal
    /// record already exists its id is returned and its field order is kept.
    pub fn record_of(&mut self, fields: Vec<FieldType>) -> Result<TypeId> {
        debug_assert!(
            fields.iter().map(|f| f.name_id).collect::<HashSet<_>>().len() == fields.len(),
            "duplicate field names in record type"
        );
        let key = TypeKey::record(&fields);
        self.register(key, DataType::Record(RecordType { fields }))
    }

    fn register(&mut self, key: TypeKey, datatype: DataType) -> Result<TypeId> {
        if let Some(id) = self.index.get(&key) {
            return Ok(*id);
        }
        self.types.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        self.index.try_reserve(1).map_err(|_| Error::OutOfMemory)?;

        let id = TypeId(self.types.len());
        self.types.push(datatype);
        self.index.insert(key, id);
        Ok(id)
    }

    // ========================================================================
    // Union
    // ========================================================================

    /// Least type that both `a` and `b` satisfy
    ///
    /// Commutative and associative; `null` is the identity and `any`
    /// absorbs everything. Fails only when the registry cannot grow.
    pub fn union(&mut self, a: TypeId, b: TypeId) -> Result<TypeId> {
        if a == b {
            return Ok(a);
        }
        if a == TypeId::NULL {
            return Ok(b);
        }
        if b == TypeId::NULL {
            return Ok(a);
        }
        if a == TypeId::ANY || b == TypeId::ANY {
            return Ok(TypeId::ANY);
        }

        match (self.kind(a), self.kind(b)) {
            (Kind::Integer, Kind::Real) | (Kind::Real, Kind::Integer) => Ok(TypeId::REAL),
            (Kind::Array, Kind::Array) => {
                let (Some(ea), Some(eb)) = (self.element(a), self.element(b)) else {
                    return Ok(TypeId::ANY);
                };
                let element = self.union(ea, eb)?;
                self.array_of(element)
            }
            (Kind::Record, Kind::Record) => self.union_records(a, b),
            _ => Ok(TypeId::ANY),
        }
    }

    fn union_records(&mut self, a: TypeId, b: TypeId) -> Result<TypeId> {
        let (Some(ra), Some(rb)) = (self.record(a), self.record(b)) else {
            return Ok(TypeId::ANY);
        };
        let fields_a = ra.fields.clone();
        let fields_b = rb.fields.clone();

        let by_name_b: HashMap<NameId, &FieldType> =
            fields_b.iter().map(|f| (f.name_id, f)).collect();
        let names_a: HashSet<NameId> = fields_a.iter().map(|f| f.name_id).collect();

        let mut fields = Vec::with_capacity(fields_a.len() + fields_b.len());
        for fa in &fields_a {
            match by_name_b.get(&fa.name_id) {
                Some(fb) => {
                    let type_id = self.union(fa.type_id, fb.type_id)?;
                    fields.push(FieldType {
                        name_id: fa.name_id,
                        type_id,
                        optional: fa.optional || fb.optional,
                    });
                }
                None => fields.push(FieldType::optional(fa.name_id, fa.type_id)),
            }
        }
        for fb in fields_b.iter().filter(|f| !names_a.contains(&f.name_id)) {
            fields.push(FieldType::optional(fb.name_id, fb.type_id));
        }

        self.record_of(fields)
    }

    /// Fold `union` over a sequence of types, starting from `null`
    pub fn union_all(&mut self, ids: impl IntoIterator<Item = TypeId>) -> Result<TypeId> {
        ids.into_iter()
            .try_fold(TypeId::NULL, |acc, id| self.union(acc, id))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Displayable description of a type (`{:#}` renders over several lines)
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay::new(self, id)
    }
}
