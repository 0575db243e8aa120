//! Per-column typing of CSV cells.
//!
//! A column is numeric only when every non-empty cell converts without losing
//! its text: `"007"` keeps its leading zeros as a string, and integers past
//! `i64` are never widened to floats. Empty cells become `null`.

use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn infer<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut kind = None;
        for cell in cells.into_iter().filter(|c| !c.is_empty()) {
            let cell_kind = if is_integer_literal(cell) {
                ColumnKind::Integer
            } else if is_float_literal(cell) {
                ColumnKind::Float
            } else {
                return ColumnKind::Text;
            };
            kind = match (kind, cell_kind) {
                (Some(ColumnKind::Float), _) | (_, ColumnKind::Float) => Some(ColumnKind::Float),
                _ => Some(ColumnKind::Integer),
            };
        }
        kind.unwrap_or(ColumnKind::Text)
    }

    pub fn to_value(self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnKind::Integer => cell
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(cell.to_string())),
            ColumnKind::Float => cell
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(cell.to_string())),
            ColumnKind::Text => Value::String(cell.to_string()),
        }
    }
}

fn is_integer_literal(cell: &str) -> bool {
    cell.parse::<i64>()
        .map(|n| n.to_string() == cell)
        .unwrap_or(false)
}

fn is_float_literal(cell: &str) -> bool {
    let unsigned = cell.strip_prefix('-').unwrap_or(cell);
    let mantissa = unsigned
        .split(|c: char| c == 'e' || c == 'E')
        .next()
        .unwrap_or(unsigned);

    let has_fraction_or_exponent = unsigned.contains(['.', 'e', 'E']);
    let well_formed = unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'));
    let padded = mantissa.len() > 1 && mantissa.starts_with('0') && !mantissa.starts_with("0.");
    // `.5` counts; a bare `.` or `.e5` does not
    let has_digits = mantissa.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && mantissa.contains(|c: char| c.is_ascii_digit());

    has_fraction_or_exponent
        && well_formed
        && has_digits
        && !padded
        && cell.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
