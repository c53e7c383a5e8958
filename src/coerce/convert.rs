//! Row-wise conversion of datasets to scalar values

use super::types::{CoercionIssue, Coerced, Simplified};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::Kind;
use std::num::IntErrorKind;
use tracing::warn;

type Outcome<T> = std::result::Result<Option<T>, CoercionIssue>;

impl Dataset {
    /// Convert each row to a boolean
    ///
    /// `true`/`false` convert; `null` and absent rows are missing; anything
    /// else is missing and counted invalid.
    pub fn to_boolean(&self) -> Result<Coerced<bool>> {
        self.coerce(|kind, text| match kind {
            Kind::Null => Ok(None),
            Kind::Boolean => Ok(Some(text == "true")),
            _ => Err(CoercionIssue::Invalid),
        })
    }

    /// Convert each row to a 32-bit integer
    ///
    /// Integers outside the `i32` range are missing and reported as overflow,
    /// followed by a warning. Reals are not truncated: they are invalid.
    pub fn to_integer(&self) -> Result<Coerced<i32>> {
        let coerced = self.coerce(integer_value)?;
        warn_overflow(&coerced, "integer");
        Ok(coerced)
    }

    /// Convert each row to a double
    ///
    /// Numbers beyond the double range are missing and reported as overflow,
    /// followed by a warning.
    pub fn to_real(&self) -> Result<Coerced<f64>> {
        let coerced = self.coerce(real_value)?;
        warn_overflow(&coerced, "double");
        Ok(coerced)
    }

    /// Convert each row to a string
    ///
    /// Only JSON strings convert, with escapes decoded. Text never overflows.
    pub fn to_text(&self) -> Result<Coerced<String>> {
        self.coerce(|kind, text| match kind {
            Kind::Null => Ok(None),
            Kind::Text => serde_json::from_str::<String>(text)
                .map(Some)
                .map_err(|_| CoercionIssue::Invalid),
            _ => Err(CoercionIssue::Invalid),
        })
    }

    /// Raw JSON text of each row, `None` for absent values
    pub fn to_json_text(&self) -> Result<Vec<Option<String>>> {
        let loaded = self.values()?;
        let source = self.source();
        Ok(loaded
            .iter()
            .map(|data| {
                if data.is_absent() {
                    None
                } else {
                    std::str::from_utf8(source.slice(data.span))
                        .ok()
                        .map(str::to_string)
                }
            })
            .collect())
    }

    /// Reduce the dataset to the most specific form its aggregate kind allows
    ///
    /// Integer datasets widen to reals when any row overflows `i32`.
    pub fn simplify(&self) -> Result<Simplified> {
        Ok(match self.kind()? {
            Kind::Null | Kind::Boolean => Simplified::Boolean(self.to_boolean()?.into_values()),
            Kind::Integer => {
                let coerced = self.coerce(integer_value)?;
                if coerced.overflowed() {
                    Simplified::Real(self.to_real()?.into_values())
                } else {
                    Simplified::Integer(coerced.into_values())
                }
            }
            Kind::Real => Simplified::Real(self.to_real()?.into_values()),
            Kind::Text => Simplified::Text(self.to_text()?.into_values()),
            Kind::Array => Simplified::List(self.elements()?),
            Kind::Record | Kind::Any => Simplified::Dataset(self.clone()),
        })
    }

    /// Split a record dataset into simplified columns
    ///
    /// Empty for datasets that are not records.
    pub fn simplify_columns(&self) -> Result<Vec<(String, Simplified)>> {
        self.columns()?
            .into_iter()
            .map(|(name, column)| Ok((name, column.simplify()?)))
            .collect()
    }

    fn coerce<T>(&self, convert: impl Fn(Kind, &str) -> Outcome<T>) -> Result<Coerced<T>> {
        let schema = self.schema()?;
        let rows = self.values()?;
        let source = self.source();
        let mut coerced = Coerced::with_capacity(rows.len());

        for (i, data) in rows.iter().enumerate() {
            let outcome = if data.is_absent() {
                Ok(None)
            } else {
                match std::str::from_utf8(source.slice(data.span)) {
                    Ok(text) => convert(data.kind(schema), text),
                    Err(_) => Err(CoercionIssue::Invalid),
                }
            };
            coerced.record(self.row_number(i), outcome);
        }
        Ok(coerced)
    }
}

fn integer_value(kind: Kind, text: &str) -> Outcome<i32> {
    match kind {
        Kind::Null => Ok(None),
        Kind::Integer => match text.parse::<i32>() {
            Ok(value) => Ok(Some(value)),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Err(CoercionIssue::Overflow)
            }
            Err(_) => Err(CoercionIssue::Invalid),
        },
        _ => Err(CoercionIssue::Invalid),
    }
}

fn real_value(kind: Kind, text: &str) -> Outcome<f64> {
    match kind {
        Kind::Null => Ok(None),
        Kind::Integer | Kind::Real => match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            Ok(_) => Err(CoercionIssue::Overflow),
            Err(_) => Err(CoercionIssue::Invalid),
        },
        _ => Err(CoercionIssue::Invalid),
    }
}

fn warn_overflow<T>(coerced: &Coerced<T>, target: &str) {
    if coerced.overflowed() {
        warn!(
            rows = ?coerced.overflow_rows,
            "missing values introduced by coercion to {target} range"
        );
    }
}
