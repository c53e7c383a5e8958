//! Human-readable type descriptions

use super::registry::Schema;
use super::types::{DataType, TypeId};
use std::fmt;

const INDENT: &str = "    ";

/// Display adapter for a type in a schema
///
/// `{}` renders on one line (`{"a": real, "b": text?}`); `{:#}` puts each
/// record field on its own indented line. A trailing `?` marks an optional
/// field.
#[derive(Debug, Clone, Copy)]
pub struct TypeDisplay<'a> {
    schema: &'a Schema,
    id: TypeId,
}

impl<'a> TypeDisplay<'a> {
    pub(crate) fn new(schema: &'a Schema, id: TypeId) -> Self {
        Self { schema, id }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let multiline = f.alternate();
        write_type(f, self.schema, self.id, multiline, 0)
    }
}

fn write_type(
    f: &mut fmt::Formatter<'_>,
    schema: &Schema,
    id: TypeId,
    multiline: bool,
    depth: usize,
) -> fmt::Result {
    let Some(datatype) = schema.get(id) else {
        return write!(f, "any");
    };

    match datatype {
        DataType::Null => write!(f, "null"),
        DataType::Boolean => write!(f, "boolean"),
        DataType::Integer => write!(f, "integer"),
        DataType::Real => write!(f, "real"),
        DataType::Text => write!(f, "text"),
        DataType::Any => write!(f, "any"),
        DataType::Array(element) => {
            write!(f, "[")?;
            write_type(f, schema, *element, multiline, depth)?;
            write!(f, "]")
        }
        DataType::Record(record) if record.is_empty() => write!(f, "{{}}"),
        DataType::Record(record) => {
            write!(f, "{{")?;
            for (i, field) in record.fields().iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                    if !multiline {
                        write!(f, " ")?;
                    }
                }
                if multiline {
                    writeln!(f)?;
                    write!(f, "{}", INDENT.repeat(depth + 1))?;
                }

                let name = schema.name(field.name_id).unwrap_or_default();
                let quoted = serde_json::to_string(name).map_err(|_| fmt::Error)?;
                write!(f, "{quoted}: ")?;
                write_type(f, schema, field.type_id, multiline, depth + 1)?;
                if field.optional {
                    write!(f, "?")?;
                }
            }
            if multiline {
                writeln!(f)?;
                write!(f, "{}", INDENT.repeat(depth))?;
            }
            write!(f, "}}")
        }
    }
}
