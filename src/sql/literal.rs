//! Literal values.
//!
//! Literals keep enough of their source form to be reproduced exactly:
//! decimals keep their scale, intervals keep their sign apart from the
//! magnitude text and carry a full qualifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal exponent below which exact decimals switch to scientific notation.
const SCIENTIFIC_THRESHOLD: i64 = -6;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    String(String),
    /// `YYYY-MM-DD`
    Date(String),
    /// `HH:MM:SS[.fff]`
    Time(String),
    /// `YYYY-MM-DD HH:MM:SS[.fff]`
    Timestamp(String),
    Interval(IntervalLiteral),
}

impl Literal {
    /// Whether this is a numeric literal whose text starts with a minus sign.
    pub fn is_negative_number(&self) -> bool {
        match self {
            Literal::Integer(n) => *n < 0,
            Literal::Decimal(d) => d.unscaled < 0,
            Literal::Double(f) => f.is_sign_negative() && *f != 0.0,
            _ => false,
        }
    }

    /// Integer value of an exact numeric literal with no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Literal::Integer(n) => Some(*n),
            Literal::Decimal(d) if d.scale == 0 => i64::try_from(d.unscaled).ok(),
            _ => None,
        }
    }
}

// ============================================================================
// Exact decimals
// ============================================================================

/// Exact decimal: `unscaled * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    pub unscaled: i128,
    pub scale: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal literal: {0:?}")]
pub struct ParseDecimalError(String);

impl Decimal {
    pub fn new(unscaled: i128, scale: u32) -> Self {
        Decimal { unscaled, scale }
    }

    /// SQL text for this decimal.
    ///
    /// Values whose decimal exponent is below -6 use scientific notation
    /// (`-1.23E-8`); everything else is positional (`12.50`).
    pub fn to_sql(&self) -> String {
        let digits = self.unscaled.unsigned_abs().to_string();
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let exponent = digits.len() as i64 - 1 - i64::from(self.scale);

        if self.unscaled != 0 && exponent < SCIENTIFIC_THRESHOLD {
            let significant = digits.trim_end_matches('0');
            let (head, tail) = significant.split_at(1);
            return if tail.is_empty() {
                format!("{sign}{head}E{exponent}")
            } else {
                format!("{sign}{head}.{tail}E{exponent}")
            };
        }

        let scale = self.scale as usize;
        if scale == 0 {
            return format!("{sign}{digits}");
        }
        if digits.len() <= scale {
            let zeros = "0".repeat(scale - digits.len());
            format!("{sign}0.{zeros}{digits}")
        } else {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            format!("{sign}{int_part}.{frac_part}")
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parse `[-+]digits[.digits][E[-+]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecimalError(s.to_string());
        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(idx) => {
                let exp: i64 = s[idx + 1..].parse().map_err(|_| err())?;
                (&s[..idx], exp)
            }
            None => (s, 0),
        };

        let (negative, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        let mut unscaled: i128 = format!("{int_part}{frac_part}").parse().map_err(|_| err())?;
        let mut scale = frac_part.len() as i64 - exponent;
        while scale < 0 {
            unscaled = unscaled.checked_mul(10).ok_or_else(err)?;
            scale += 1;
        }
        let scale = u32::try_from(scale).map_err(|_| err())?;
        if negative {
            unscaled = -unscaled;
        }
        Ok(Decimal { unscaled, scale })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// SQL text for an approximate numeric, or `None` for NaN and infinities.
pub fn format_double(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let mut buffer = ryu::Buffer::new();
    Some(buffer.format_finite(value).replace('e', "E"))
}

// ============================================================================
// Symbols: time units and TRIM flags
// ============================================================================

/// Time unit used by EXTRACT, FLOOR/CEIL ... TO and interval qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Year => "YEAR",
            TimeUnit::Quarter => "QUARTER",
            TimeUnit::Month => "MONTH",
            TimeUnit::Week => "WEEK",
            TimeUnit::Day => "DAY",
            TimeUnit::Hour => "HOUR",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Second => "SECOND",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side(s) TRIM strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrimFlag {
    Both,
    Leading,
    Trailing,
}

impl TrimFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimFlag::Both => "BOTH",
            TrimFlag::Leading => "LEADING",
            TrimFlag::Trailing => "TRAILING",
        }
    }
}

/// A keyword-valued operand (`YEAR` in `EXTRACT(YEAR FROM x)`, `LEADING` in TRIM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    TimeUnit(TimeUnit),
    Trim(TrimFlag),
}

impl Symbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::TimeUnit(unit) => unit.as_str(),
            Symbol::Trim(flag) => flag.as_str(),
        }
    }
}

// ============================================================================
// Intervals
// ============================================================================

/// `YEAR`, `DAY(3)`, `YEAR TO MONTH`, `DAY TO SECOND(3)` ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalQualifier {
    pub start: TimeUnit,
    #[serde(default)]
    pub end: Option<TimeUnit>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub fractional_precision: Option<u32>,
}

impl IntervalQualifier {
    pub fn single(unit: TimeUnit) -> Self {
        IntervalQualifier {
            start: unit,
            end: None,
            precision: None,
            fractional_precision: None,
        }
    }

    pub fn range(start: TimeUnit, end: TimeUnit) -> Self {
        IntervalQualifier {
            end: Some(end),
            ..Self::single(start)
        }
    }

    /// Standard SQL spelling.
    pub fn to_sql(&self) -> String {
        let mut out = self.start.as_str().to_string();
        if let Some(p) = self.precision {
            out.push_str(&format!("({p})"));
        }
        if let Some(end) = self.end {
            out.push_str(" TO ");
            out.push_str(end.as_str());
        }
        if let Some(fp) = self.fractional_precision {
            out.push_str(&format!("({fp})"));
        }
        out
    }
}

/// Interval literal. The sign is kept apart from the magnitude text, so
/// `INTERVAL -'1' DAY` and the negation of `INTERVAL '1' DAY` are the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalLiteral {
    #[serde(default)]
    pub negative: bool,
    /// Magnitude text without sign, e.g. `1-2` for `YEAR TO MONTH`.
    pub value: String,
    pub qualifier: IntervalQualifier,
}

impl IntervalLiteral {
    pub fn new(value: impl Into<String>, qualifier: IntervalQualifier) -> Self {
        let value = value.into();
        match value.strip_prefix('-') {
            Some(magnitude) => IntervalLiteral {
                negative: true,
                value: magnitude.to_string(),
                qualifier,
            },
            None => IntervalLiteral {
                negative: false,
                value,
                qualifier,
            },
        }
    }

    pub fn negated(&self) -> Self {
        IntervalLiteral {
            negative: !self.negative,
            ..self.clone()
        }
    }

    /// Signed integer amount of a single-unit interval (`'5' DAY` → 5).
    pub fn signed_integer(&self) -> Option<i64> {
        if self.qualifier.end.is_some() {
            return None;
        }
        let magnitude: i64 = self.value.trim().parse().ok()?;
        Some(if self.negative { -magnitude } else { magnitude })
    }
}
