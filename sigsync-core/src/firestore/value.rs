//! Firestore REST value encoding.
//!
//! Firestore sends every field as a single-key object naming its type, e.g.
//! `{"stringValue": "Nid de poule"}` or `{"integerValue": "12"}`. These are
//! decoded into [`FieldValue`], a loosely-typed value the normalizer can
//! inspect without assuming any schema.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;

/// A decoded Firestore field value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "LenientValue")]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    /// Store-native timestamp, the only value convertible to a calendar date.
    Timestamp(DateTime<Utc>),
    String(String),
    Bytes(String),
    Reference(String),
    GeoPoint { latitude: f64, longitude: f64 },
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of integer and double values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<f64> for FieldValue {
    fn from(d: f64) -> Self {
        FieldValue::Double(d)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(ts)
    }
}

/// Any value in a REST response.
///
/// A value that matches none of the known shapes decodes to
/// [`FieldValue::Null`] so one odd field cannot fail a whole page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LenientValue {
    Known(WireValue),
    Unknown(IgnoredAny),
}

/// Wire shape of a value as it appears in REST responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireValue {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(WireInteger),
    DoubleValue(WireDouble),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(WireLatLng),
    ArrayValue(WireArray),
    MapValue(WireMap),
}

/// int64 is a decimal string in proto3 JSON, but tolerate bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireInteger {
    Text(String),
    Number(i64),
}

/// Non-finite doubles are sent as "NaN", "Infinity" or "-Infinity".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireDouble {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct WireLatLng {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct WireArray {
    #[serde(default)]
    values: Vec<FieldValue>,
}

#[derive(Debug, Deserialize)]
struct WireMap {
    #[serde(default)]
    fields: BTreeMap<String, FieldValue>,
}

fn parse_double(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        other => other.parse().ok(),
    }
}

impl From<LenientValue> for FieldValue {
    fn from(value: LenientValue) -> Self {
        match value {
            LenientValue::Known(wire) => FieldValue::from(wire),
            LenientValue::Unknown(_) => FieldValue::Null,
        }
    }
}

impl From<WireValue> for FieldValue {
    fn from(wire: WireValue) -> Self {
        match wire {
            WireValue::NullValue(()) => FieldValue::Null,
            WireValue::BooleanValue(b) => FieldValue::Boolean(b),
            WireValue::IntegerValue(WireInteger::Number(i)) => FieldValue::Integer(i),
            WireValue::IntegerValue(WireInteger::Text(text)) => match text.parse::<i64>() {
                Ok(i) => FieldValue::Integer(i),
                Err(_) => FieldValue::String(text),
            },
            WireValue::DoubleValue(WireDouble::Number(d)) => FieldValue::Double(d),
            WireValue::DoubleValue(WireDouble::Text(text)) => match parse_double(&text) {
                Some(d) => FieldValue::Double(d),
                None => FieldValue::String(text),
            },
            WireValue::TimestampValue(text) => match DateTime::parse_from_rfc3339(&text) {
                Ok(ts) => FieldValue::Timestamp(ts.with_timezone(&Utc)),
                Err(_) => FieldValue::String(text),
            },
            WireValue::StringValue(s) => FieldValue::String(s),
            WireValue::BytesValue(b) => FieldValue::Bytes(b),
            WireValue::ReferenceValue(r) => FieldValue::Reference(r),
            WireValue::GeoPointValue(p) => FieldValue::GeoPoint {
                latitude: p.latitude,
                longitude: p.longitude,
            },
            WireValue::ArrayValue(a) => FieldValue::Array(a.values),
            WireValue::MapValue(m) => FieldValue::Map(m.fields),
        }
    }
}
