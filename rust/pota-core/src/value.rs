//! Stack values.
//!
//! A value is either an integer or a piece of text. Instructions coerce
//! explicitly: arithmetic goes through [`Value::to_int`], comparisons and
//! concatenation through [`Value::to_text`]. Integers are unbounded.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Serialize, Serializer};

use crate::fault::Fault;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(BigInt),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn int(n: impl Into<BigInt>) -> Self {
        Value::Int(n.into())
    }

    pub fn from_char(ch: char) -> Self {
        Value::Text(ch.to_string())
    }

    /// Integer coercion. Text is parsed as a signed decimal, ignoring
    /// surrounding whitespace.
    pub fn to_int(&self) -> Result<BigInt, Fault> {
        match self {
            Value::Int(n) => Ok(n.clone()),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(Fault::NotAnInteger(s.clone()));
                }
                BigInt::from_str(trimmed).map_err(|_| Fault::NotAnInteger(s.clone()))
            }
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Text(s) => s,
        }
    }

    /// The sole character of the value's text form.
    pub fn to_char(&self) -> Result<char, Fault> {
        let text = self.to_text();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(Fault::NotSingleChar(text)),
        }
    }

    /// Truthiness for conditional skips: anything whose text is not `"0"`.
    pub fn is_nonzero_text(&self) -> bool {
        match self {
            Value::Int(n) => !n.is_zero(),
            Value::Text(s) => s != "0",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(n) => match n.to_i64() {
                Some(small) => serializer.serialize_i64(small),
                None => serializer.collect_str(n),
            },
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Narrow an integer to a grid coordinate.
pub fn to_coordinate(n: &BigInt) -> Result<i64, Fault> {
    n.to_i64().ok_or_else(|| Fault::NotAnInteger(n.to_string()))
}

/// Narrow an integer to an element count; negative counts mean zero.
pub fn to_count(n: &BigInt) -> usize {
    if n.is_negative() {
        0
    } else {
        n.to_usize().unwrap_or(usize::MAX)
    }
}

/// The character with code point `n`.
pub fn to_code_point(n: &BigInt) -> Result<char, Fault> {
    n.to_u32()
        .and_then(char::from_u32)
        .ok_or_else(|| Fault::NotAnInteger(n.to_string()))
}

/// Floor division and modulo; the remainder takes the divisor's sign.
pub fn floor_div_mod(y: &BigInt, x: &BigInt) -> Result<(BigInt, BigInt), Fault> {
    if x.is_zero() {
        return Err(Fault::DivisionByZero);
    }
    let mut quotient = y / x;
    let mut remainder = y % x;
    if !remainder.is_zero() && remainder.is_negative() != x.is_negative() {
        quotient -= 1;
        remainder += x;
    }
    Ok((quotient, remainder))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_text_to_int() {
        assert_eq!(Value::text("42").to_int(), Ok(big(42)));
        assert_eq!(Value::text(" -7 ").to_int(), Ok(big(-7)));
        assert_eq!(
            Value::text("4a").to_int(),
            Err(Fault::NotAnInteger("4a".into()))
        );
        assert!(Value::text("").to_int().is_err());
    }

    #[test]
    fn test_big_integers_survive_text_round_trip() {
        let huge = Value::text("123456789012345678901234567890");
        let n = huge.to_int().unwrap();
        assert_eq!(Value::Int(n).to_text(), "123456789012345678901234567890");
    }

    #[test]
    fn test_to_char() {
        assert_eq!(Value::text("a").to_char(), Ok('a'));
        assert_eq!(Value::int(7).to_char(), Ok('7'));
        assert_eq!(
            Value::text("ab").to_char(),
            Err(Fault::NotSingleChar("ab".into()))
        );
        assert!(Value::text("").to_char().is_err());
    }

    #[test]
    fn test_floor_div_mod_follows_divisor_sign() {
        assert_eq!(floor_div_mod(&big(7), &big(2)), Ok((big(3), big(1))));
        assert_eq!(floor_div_mod(&big(-7), &big(2)), Ok((big(-4), big(1))));
        assert_eq!(floor_div_mod(&big(7), &big(-2)), Ok((big(-4), big(-1))));
        assert_eq!(floor_div_mod(&big(6), &big(3)), Ok((big(2), big(0))));
        assert_eq!(floor_div_mod(&big(1), &big(0)), Err(Fault::DivisionByZero));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(to_count(&big(-3)), 0);
        assert_eq!(to_count(&big(3)), 3);
        assert_eq!(to_code_point(&big(65)), Ok('A'));
        assert!(to_code_point(&big(-1)).is_err());
        assert!(to_code_point(&big(0xD800)).is_err());
        assert_eq!(to_coordinate(&big(-5)), Ok(-5));
    }

    #[test]
    fn test_nonzero_text() {
        assert!(!Value::text("0").is_nonzero_text());
        assert!(Value::text("00").is_nonzero_text());
        assert!(Value::text("").is_nonzero_text());
        assert!(!Value::int(0).is_nonzero_text());
    }
}
