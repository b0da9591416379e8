//! Conversion of loosely-typed Firestore documents into fixed shapes.
//!
//! Nothing here fails: every target field has a default used when the source
//! field is missing, null, empty or of the wrong type.
//!
//! Two timestamp policies coexist on purpose. The import path needs a date
//! for every record and falls back to "now" ([`timestamp_or_now`]); the
//! preview path must be able to show "unknown" and keeps it absent
//! ([`timestamp_or_absent`]).

use chrono::{DateTime, SecondsFormat, Utc};

use crate::firestore::{FieldValue, SourceDocument};
use crate::models::{FirebaseUserView, SignalementRequest, SignalementView, Statut};

pub const DEFAULT_TITRE: &str = "Sans titre";
pub const DEFAULT_USER_ID: i64 = 1;
pub const DEFAULT_CATEGORY: &str = "NIDS_DE_POULE";
pub const DEFAULT_USERNAME: &str = "Utilisateur";
pub const DEFAULT_SYNC_STATE: &str = "SYNCED";

/// A source document prepared for `POST /signalements`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    /// Firestore document id, kept for error attribution
    pub source_id: String,
    /// `dateSignalement` under the import policy (never absent)
    pub reported_at: String,
    pub request: SignalementRequest,
}

/// Builds the creation payload for one source document.
pub fn normalize_for_import(doc: &SourceDocument, now: DateTime<Utc>) -> ImportRecord {
    let request = SignalementRequest {
        titre: text_or(doc.get("titre"), DEFAULT_TITRE),
        description: text_or(doc.get("description"), ""),
        latitude: number_or_zero(doc.get("latitude")),
        longitude: number_or_zero(doc.get("longitude")),
        statut: text_or(doc.get("statut"), Statut::EnAttente.code()),
        surface_m2: number_or_zero(doc.get("surfaceM2")),
        budget: number_or_zero(doc.get("budget")),
        id_utilisateur: reference_id(doc.get("userId"))
            .filter(|id| *id != 0)
            .unwrap_or(DEFAULT_USER_ID),
        id_entreprise: reference_id(doc.get("entrepriseId")),
    };

    ImportRecord {
        source_id: doc.id.clone(),
        reported_at: timestamp_or_now(doc.get("dateSignalement"), now),
        request,
    }
}

/// Builds the preview projection of a `signalements` document.
pub fn signalement_view(doc: &SourceDocument) -> SignalementView {
    SignalementView {
        id_signalement: parse_int_prefix(&doc.id).unwrap_or(0),
        titre: text_or(doc.get("titre"), ""),
        description: text_or(doc.get("description"), ""),
        category: text_or(doc.get("category"), DEFAULT_CATEGORY),
        latitude: number_or_zero(doc.get("latitude")),
        longitude: number_or_zero(doc.get("longitude")),
        date_signalement: timestamp_or_absent(doc.get("dateSignalement")),
        statut: text_or(doc.get("statut"), Statut::EnAttente.code()),
        surface_m2: doc.get("surfaceM2").and_then(FieldValue::as_f64),
        budget: doc.get("budget").and_then(FieldValue::as_f64),
        user_id: reference_text(doc.get("userId")),
        id_utilisateur: reference_id(doc.get("userId")).unwrap_or(0),
        username: text_or(doc.get("username"), DEFAULT_USERNAME),
        entreprise_id: reference_text(doc.get("entrepriseId")),
        id_entreprise: reference_id(doc.get("entrepriseId")),
        nom_entreprise: optional_text(doc.get("nomEntreprise")),
        sync_state: text_or(doc.get("syncState"), DEFAULT_SYNC_STATE),
        derniere_maj: timestamp_or_absent(doc.get("derniereMaj")),
        photo_url: optional_text(doc.get("photoURL")),
        document_id: doc.id.clone(),
    }
}

/// Builds the preview projection of a `users` document.
pub fn user_view(doc: &SourceDocument) -> FirebaseUserView {
    FirebaseUserView {
        id: doc.id.clone(),
        email: text_or(doc.get("email"), ""),
        username: text_or(doc.get("username"), ""),
        first_name: optional_text(doc.get("firstName")),
        last_name: optional_text(doc.get("lastName")),
        role: text_or(doc.get("role"), ""),
        enabled: doc
            .get("enabled")
            .and_then(FieldValue::as_bool)
            .unwrap_or(false),
        locked: doc
            .get("locked")
            .and_then(FieldValue::as_bool)
            .unwrap_or(false),
        failed_login_attempts: doc
            .get("failedLoginAttempts")
            .and_then(FieldValue::as_f64)
            .map(|n| n as i64)
            .unwrap_or(0),
        created_at: timestamp_or_absent(doc.get("createdAt")),
        updated_at: timestamp_or_absent(doc.get("updatedAt")),
    }
}

/// Import policy: a store timestamp as ISO-8601, otherwise `now`.
pub fn timestamp_or_now(value: Option<&FieldValue>, now: DateTime<Utc>) -> String {
    timestamp_or_absent(value).unwrap_or_else(|| iso8601(&now))
}

/// Preview policy: a store timestamp as ISO-8601, otherwise nothing.
pub fn timestamp_or_absent(value: Option<&FieldValue>) -> Option<String> {
    value.and_then(FieldValue::as_timestamp).map(iso8601)
}

fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Non-empty string value, or `default`.
fn text_or(value: Option<&FieldValue>, default: &str) -> String {
    optional_text(value).unwrap_or_else(|| default.to_string())
}

fn optional_text(value: Option<&FieldValue>) -> Option<String> {
    value
        .and_then(FieldValue::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Finite number, or 0.
fn number_or_zero(value: Option<&FieldValue>) -> f64 {
    value
        .and_then(FieldValue::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Interprets a reference field (`userId`, `entrepriseId`) as a numeric id.
///
/// Strings use integer-prefix parsing; numbers are accepted directly, with
/// doubles truncated. Empty or non-numeric strings and numeric zero count as
/// absent; the string `"0"` parses to `Some(0)`.
fn reference_id(value: Option<&FieldValue>) -> Option<i64> {
    match value? {
        FieldValue::String(s) => parse_int_prefix(s),
        FieldValue::Integer(i) => Some(*i).filter(|i| *i != 0),
        FieldValue::Double(d) if d.is_finite() && d.trunc() != 0.0 => Some(d.trunc() as i64),
        _ => None,
    }
}

fn reference_text(value: Option<&FieldValue>) -> Option<String> {
    match value? {
        FieldValue::String(s) if !s.is_empty() => Some(s.clone()),
        FieldValue::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

/// Parses the leading integer of `s`: optional whitespace, an optional sign,
/// then digits. Trailing garbage is ignored (`"12abc"` is 12); no digits at
/// all yields `None`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
