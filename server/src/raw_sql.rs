//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! Nothing here takes user input. Anything added later must pass user input
//! through `.bind()`, never string interpolation.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::BigInt;

/// `COUNT(*) OVER()`: the number of matching rows before LIMIT/OFFSET,
/// repeated on every returned row.
///
/// Diesel doesn't support window functions natively.
pub fn count_over() -> SqlLiteral<BigInt> {
    sql::<BigInt>("COUNT(*) OVER()")
}

/// Escape `LIKE` metacharacters so user text matches literally.
pub fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
