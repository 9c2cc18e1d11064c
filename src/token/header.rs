use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// JOSE header
///
/// Serialized as `alg`, `typ`, `kid` (each only when set, `alg` always),
/// followed by any extra members in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    algorithm: Algorithm,
    token_type: Option<String>,
    key_id: Option<String>,
    extra: Map<String, Value>,
}

impl Header {
    /// Header for `algorithm` with `typ: "JWT"`
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            token_type: Some("JWT".to_string()),
            key_id: None,
            extra: Map::new(),
        }
    }

    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.key_id = Some(kid.into());
        self
    }

    pub fn with_type(mut self, typ: impl Into<String>) -> Self {
        self.token_type = Some(typ.into());
        self
    }

    /// Drop the `typ` member
    pub fn without_type(mut self) -> Self {
        self.token_type = None;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Members other than `alg`, `typ` and `kid`
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Set a header member
    ///
    /// `alg`, `typ` and `kid` update the typed fields and must be strings.
    pub fn set(&mut self, name: impl Into<String>, value: impl Serialize) -> Result<()> {
        let name = name.into();
        let value = serde_json::to_value(value)
            .map_err(|e| Error::MalformedToken(format!("header member '{name}': {e}")))?;
        self.apply(name, value)
    }

    /// Get a header member, typed fields included
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "alg" => Some(Value::String(self.algorithm.as_str().to_string())),
            "typ" => self.token_type.clone().map(Value::String),
            "kid" => self.key_id.clone().map(Value::String),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Compact JSON
    pub fn to_json(&self) -> Result<String> {
        let mut members = Map::new();
        members.insert(
            "alg".to_string(),
            Value::String(self.algorithm.as_str().to_string()),
        );
        if let Some(typ) = &self.token_type {
            members.insert("typ".to_string(), Value::String(typ.clone()));
        }
        if let Some(kid) = &self.key_id {
            members.insert("kid".to_string(), Value::String(kid.clone()));
        }
        for (name, value) in &self.extra {
            members.insert(name.clone(), value.clone());
        }
        serde_json::to_string(&members)
            .map_err(|e| Error::SigningError(format!("failed to serialize header: {e}")))
    }

    /// Parse header JSON
    ///
    /// In strict mode any member besides `alg`, `typ` and `kid` is rejected.
    pub fn from_json(json: &[u8], strict: bool) -> Result<Self> {
        let members: Map<String, Value> = serde_json::from_slice(json)
            .map_err(|e| Error::MalformedToken(format!("invalid header JSON: {e}")))?;

        let algorithm = match members.get("alg") {
            Some(Value::String(alg)) => alg.parse::<Algorithm>()?,
            Some(_) => {
                return Err(Error::MalformedToken(
                    "header 'alg' must be a string".to_string(),
                ))
            }
            None => return Err(Error::MalformedToken("header is missing 'alg'".to_string())),
        };

        let mut header = Header {
            algorithm,
            token_type: None,
            key_id: None,
            extra: Map::new(),
        };
        for (name, value) in members {
            if name == "alg" {
                continue;
            }
            if strict && !matches!(name.as_str(), "typ" | "kid") {
                return Err(Error::MalformedToken(format!(
                    "unexpected header member '{name}'"
                )));
            }
            header.apply(name, value)?;
        }
        Ok(header)
    }

    fn apply(&mut self, name: String, value: Value) -> Result<()> {
        match name.as_str() {
            "alg" => {
                let alg = value.as_str().ok_or_else(|| {
                    Error::MalformedToken("header 'alg' must be a string".to_string())
                })?;
                self.algorithm = alg.parse()?;
            }
            "typ" => self.token_type = Some(string_member("typ", value)?),
            "kid" => self.key_id = Some(string_member("kid", value)?),
            _ => {
                self.extra.insert(name, value);
            }
        }
        Ok(())
    }
}

fn string_member(name: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(Error::MalformedToken(format!(
            "header '{name}' must be a string"
        ))),
    }
}
