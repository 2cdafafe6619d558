//! Request parameter extraction with lenient typed parsing.
//!
//! Every typed getter returns the caller's default when the parameter is
//! missing or does not parse. Callers that need strict validation check the
//! raw string themselves (see `parse_interested`).

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// Date layout accepted by `get_date` (HTML `<input type="date">`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Form or query-string parameters of one request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(HashMap<String, String>);

impl RequestParams {
    /// Raw parameter value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of `name`, or `default` if it is missing or empty
    pub fn get_string(&self, name: &str, default: &str) -> String {
        match self.get(name) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.to_string(),
        }
    }

    /// Parsed integer, or `default` on any failure
    pub fn get_int(&self, name: &str, default: i32) -> i32 {
        self.parse_or(name, default, |raw| raw)
    }

    /// Parsed float, or `default` on any failure. Surrounding whitespace is ignored.
    pub fn get_float(&self, name: &str, default: f32) -> f32 {
        self.parse_or(name, default, str::trim)
    }

    /// Parsed `YYYY-MM-DD` date, or `default` on any failure
    pub fn get_date(&self, name: &str, default: NaiveDate) -> NaiveDate {
        let Some(raw) = self.get(name) else {
            return default;
        };

        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).unwrap_or_else(|e| {
            debug!(param = name, value = raw, error = %e, "falling back to default date");
            default
        })
    }

    fn parse_or<T>(&self, name: &str, default: T, prepare: fn(&str) -> &str) -> T
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.get(name) else {
            return default;
        };

        prepare(raw).parse().unwrap_or_else(|e: T::Err| {
            debug!(param = name, value = raw, error = %e, "falling back to default value");
            default
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn string_falls_back_when_missing_or_empty() {
        let p = params(&[("title", "Barista"), ("empty", "")]);

        assert_eq!(p.get_string("title", "x"), "Barista");
        assert_eq!(p.get_string("empty", "x"), "x");
        assert_eq!(p.get_string("missing", "x"), "x");
    }

    #[test]
    fn int_parse_failure_returns_default() {
        let p = params(&[("ok", "42"), ("bad", "4x2"), ("spaced", " 7"), ("big", "3000000000")]);

        assert_eq!(p.get_int("ok", -1), 42);
        assert_eq!(p.get_int("bad", -1), -1);
        assert_eq!(p.get_int("spaced", -1), -1);
        assert_eq!(p.get_int("big", -1), -1);
        assert_eq!(p.get_int("missing", -1), -1);
    }

    #[test]
    fn float_trims_and_falls_back() {
        let p = params(&[("ok", " 1.5 "), ("bad", "one")]);

        assert_eq!(p.get_float("ok", 0.0), 1.5);
        assert_eq!(p.get_float("bad", 9.0), 9.0);
    }

    #[test]
    fn date_parses_iso_days() {
        let default = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let p = params(&[("expiry", "2020-07-15"), ("bad", "15/07/2020")]);

        assert_eq!(
            p.get_date("expiry", default),
            NaiveDate::from_ymd_opt(2020, 7, 15).unwrap()
        );
        assert_eq!(p.get_date("bad", default), default);
        assert_eq!(p.get_date("missing", default), default);
    }
}
