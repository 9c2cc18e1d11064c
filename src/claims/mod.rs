mod numeric_date;
mod policy;

pub use numeric_date::NumericDate;
pub use policy::{Clock, FixedClock, SystemClock, ValidationPolicy};

use crate::error::{Error, Result};
use numeric_date::json_type;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Registered claim names with a typed interpretation (RFC 7519 Section 4.1)
pub const RESERVED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// JWT claims set
///
/// An ordered JSON object: members keep insertion order, so encoding the
/// same `Claims` always produces the same bytes. The registered claims
/// (`iss`, `sub`, `aud`, `exp`, `nbf`, `iat`, `jti`) are type-checked on every
/// insert and when decoding; every other member is kept verbatim.
///
/// A registered claim whose value is JSON `null` is treated as absent.
///
/// # Examples
///
/// ```
/// use jwtforge::{Claims, NumericDate};
///
/// let claims = Claims::new()
///     .with_issuer("https://auth.example.com")
///     .with_subject("user-42")
///     .with_audiences(["api", "admin"])
///     .with_expiration(NumericDate::from_seconds(2_000_000_000))
///     .with_claim("role", "editor")?;
///
/// assert_eq!(claims.issuer(), Some("https://auth.example.com"));
/// assert!(claims.audience().unwrap().contains("admin"));
/// assert_eq!(claims.get("role").and_then(|v| v.as_str()), Some("editor"));
/// # Ok::<(), jwtforge::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    members: Map<String, Value>,
}

/// The `aud` claim: a single string or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Audience::Single(aud) => std::slice::from_ref(aud),
            Audience::Many(auds) => auds,
        };
        values.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build claims from a JSON object, type-checking the registered claims
    pub fn from_map(members: Map<String, Value>) -> Result<Self> {
        for (name, value) in &members {
            check_registered(name, value)?;
        }
        Ok(Self { members })
    }

    /// Parse a JSON object
    ///
    /// Invalid JSON or a non-object fails with `MalformedToken`; a registered
    /// claim of the wrong type fails with `MalformedClaim`.
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let members: Map<String, Value> = serde_json::from_slice(json)
            .map_err(|e| Error::MalformedToken(format!("invalid claims JSON: {e}")))?;
        Self::from_map(members)
    }

    /// Compact JSON, members in insertion order
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.members)
            .map_err(|e| Error::SigningError(format!("failed to serialize claims: {e}")))
    }

    // ============================================================================
    // Builders
    // ============================================================================

    pub fn with_issuer(self, issuer: impl Into<String>) -> Self {
        self.with_value("iss", Value::String(issuer.into()))
    }

    pub fn with_subject(self, subject: impl Into<String>) -> Self {
        self.with_value("sub", Value::String(subject.into()))
    }

    /// Single audience, serialized as a JSON string
    pub fn with_audience(self, audience: impl Into<String>) -> Self {
        self.with_value("aud", Value::String(audience.into()))
    }

    /// Audience list, serialized as a JSON array even with one element
    pub fn with_audiences<I, S>(self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = audiences
            .into_iter()
            .map(|aud| Value::String(aud.into()))
            .collect();
        self.with_value("aud", Value::Array(list))
    }

    pub fn with_expiration(self, exp: impl Into<NumericDate>) -> Self {
        self.with_value("exp", Value::from(exp.into().as_seconds()))
    }

    pub fn with_not_before(self, nbf: impl Into<NumericDate>) -> Self {
        self.with_value("nbf", Value::from(nbf.into().as_seconds()))
    }

    pub fn with_issued_at(self, iat: impl Into<NumericDate>) -> Self {
        self.with_value("iat", Value::from(iat.into().as_seconds()))
    }

    pub fn with_jwt_id(self, jti: impl Into<String>) -> Self {
        self.with_value("jti", Value::String(jti.into()))
    }

    /// Add any claim; registered names are type-checked
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Insert or replace a claim, returning the previous value
    ///
    /// Replacing keeps the member's original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Serialize) -> Result<Option<Value>> {
        let name = name.into();
        let value = serde_json::to_value(value)
            .map_err(|e| Error::malformed_claim(&name, format!("not representable as JSON: {e}")))?;
        check_registered(&name, &value)?;
        Ok(self.members.insert(name, value))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.members.shift_remove(name)
    }

    fn with_value(mut self, name: &str, value: Value) -> Self {
        self.members.insert(name.to_string(), value);
        self
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn issuer(&self) -> Option<&str> {
        self.string("iss")
    }

    pub fn subject(&self) -> Option<&str> {
        self.string("sub")
    }

    pub fn jwt_id(&self) -> Option<&str> {
        self.string("jti")
    }

    pub fn audience(&self) -> Option<Audience> {
        match self.members.get("aud")? {
            Value::String(aud) => Some(Audience::Single(aud.clone())),
            Value::Array(items) => Some(Audience::Many(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn expiration(&self) -> Option<NumericDate> {
        self.date("exp")
    }

    pub fn not_before(&self) -> Option<NumericDate> {
        self.date("nbf")
    }

    pub fn issued_at(&self) -> Option<NumericDate> {
        self.date("iat")
    }

    /// Raw value of any claim
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Members that are not registered claims, in order
    pub fn custom_claims(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members
            .iter()
            .filter(|(name, _)| !RESERVED_CLAIMS.contains(&name.as_str()))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// All members, in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `exp` is present and `now` is at or past it (no skew)
    pub fn is_expired_at(&self, now: NumericDate) -> bool {
        self.expiration().is_some_and(|exp| now >= exp)
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.members.get(name).and_then(Value::as_str)
    }

    fn date(&self, name: &str) -> Option<NumericDate> {
        match self.members.get(name)? {
            Value::Null => None,
            value => NumericDate::from_claim(name, value).ok(),
        }
    }
}

/// Type-check a registered claim; custom claims pass through
fn check_registered(name: &str, value: &Value) -> Result<()> {
    match (name, value) {
        (_, Value::Null) => Ok(()),
        ("iss" | "sub" | "jti", Value::String(_)) => Ok(()),
        ("iss" | "sub" | "jti", other) => Err(Error::malformed_claim(
            name,
            format!("expected a string, found {}", json_type(other)),
        )),
        ("aud", Value::String(_)) => Ok(()),
        ("aud", Value::Array(items)) => match items.iter().find(|item| !item.is_string()) {
            None => Ok(()),
            Some(item) => Err(Error::malformed_claim(
                name,
                format!("expected an array of strings, found {} element", json_type(item)),
            )),
        },
        ("aud", other) => Err(Error::malformed_claim(
            name,
            format!("expected a string or an array of strings, found {}", json_type(other)),
        )),
        ("exp" | "nbf" | "iat", value) => NumericDate::from_claim(name, value).map(|_| ()),
        _ => Ok(()),
    }
}

impl Serialize for Claims {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.members.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Claims {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let members = Map::deserialize(deserializer)?;
        Claims::from_map(members).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Value> for Claims {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(members) => Claims::from_map(members),
            other => Err(Error::MalformedToken(format!(
                "claims must be a JSON object, found {}",
                json_type(&other)
            ))),
        }
    }
}
