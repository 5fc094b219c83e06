//! Serde helpers for consistent JSON input and output

/// (De)serialize a `Rational` duration
///
/// Accepts a JSON number (`0.5`), an integer (`2`) or fraction text
/// (`"3/2"`). Always serializes as fraction text so the value round-trips
/// exactly.
pub mod rational {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use crate::models::Rational;

    pub fn serialize<S>(value: &Rational, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Rational, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RationalVisitor)
    }

    struct RationalVisitor;

    impl<'de> Visitor<'de> for RationalVisitor {
        type Value = Rational;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a fraction such as \"3/2\"")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rational, E> {
            i32::try_from(v)
                .map(Rational::from_integer)
                .map_err(|_| E::custom(format!("duration {} out of range", v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rational, E> {
            i32::try_from(v)
                .map(Rational::from_integer)
                .map_err(|_| E::custom(format!("duration {} out of range", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Rational, E> {
            Rational::approximate_float(v)
                .ok_or_else(|| E::custom(format!("duration {} is not representable", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Rational, E> {
            parse_fraction(v).ok_or_else(|| E::custom(format!("invalid duration {:?}", v)))
        }
    }

    /// Parse "n", "n/d" or a decimal string
    pub fn parse_fraction(text: &str) -> Option<Rational> {
        let text = text.trim();
        if let Some((numer, denom)) = text.split_once('/') {
            let numer: i32 = numer.trim().parse().ok()?;
            let denom: i32 = denom.trim().parse().ok()?;
            // Reducing i32::MIN against a negative denominator overflows
            if denom == 0 || numer == i32::MIN || denom == i32::MIN {
                return None;
            }
            return Some(Rational::new(numer, denom));
        }
        if let Ok(whole) = text.parse::<i32>() {
            return Some(Rational::from_integer(whole));
        }
        text.parse::<f64>().ok().and_then(Rational::approximate_float)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_fraction() {
            assert_eq!(parse_fraction("3/2"), Some(Rational::new(3, 2)));
            assert_eq!(parse_fraction("2"), Some(Rational::from_integer(2)));
            assert_eq!(parse_fraction("0.25"), Some(Rational::new(1, 4)));
            assert_eq!(parse_fraction("1/0"), None);
            assert_eq!(parse_fraction("-2147483648/-1"), None);
            assert_eq!(parse_fraction("1/2147483647"), Some(Rational::new(1, i32::MAX)));
            assert_eq!(parse_fraction("abc"), None);
        }
    }
}
