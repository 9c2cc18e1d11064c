use super::{Claims, NumericDate};
use crate::algorithm::AlgorithmPolicy;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Source of the current time for temporal claim checks
pub trait Clock: Send + Sync {
    fn now(&self) -> NumericDate;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NumericDate {
        NumericDate::now()
    }
}

/// A clock stopped at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NumericDate);

impl Clock for FixedClock {
    fn now(&self) -> NumericDate {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> NumericDate + Send + Sync,
{
    fn now(&self) -> NumericDate {
        self()
    }
}

/// Rules applied when decoding a token
///
/// Defaults: every HMAC and RSA algorithm allowed (never `none`), no issuer
/// or audience requirement, zero clock skew, `exp`/`nbf`/`iat` checked
/// against the system clock, no maximum age, lenient header parsing.
#[derive(Clone)]
pub struct ValidationPolicy {
    algorithms: AlgorithmPolicy,
    issuer: Option<String>,
    audience: Option<String>,
    clock_skew: u64,
    max_age: Option<u64>,
    clock: Arc<dyn Clock>,
    strict_header: bool,
    validate_exp: bool,
    validate_nbf: bool,
    validate_iat: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            algorithms: AlgorithmPolicy::default(),
            issuer: None,
            audience: None,
            clock_skew: 0,
            max_age: None,
            clock: Arc::new(SystemClock),
            strict_header: false,
            validate_exp: true,
            validate_nbf: true,
            validate_iat: true,
        }
    }
}

impl fmt::Debug for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationPolicy")
            .field("algorithms", &self.algorithms)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("clock_skew", &self.clock_skew)
            .field("max_age", &self.max_age)
            .field("strict_header", &self.strict_header)
            .field("validate_exp", &self.validate_exp)
            .field("validate_nbf", &self.validate_nbf)
            .field("validate_iat", &self.validate_iat)
            .finish_non_exhaustive()
    }
}

impl ValidationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the accepted `alg` values
    pub fn algorithms(mut self, algorithms: AlgorithmPolicy) -> Self {
        self.algorithms = algorithms;
        self
    }

    /// Require `iss` to equal `issuer`
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Require `aud` to be or contain `audience`
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set clock skew tolerance
    pub fn clock_skew(mut self, seconds: u64) -> Self {
        self.clock_skew = seconds;
        self
    }

    /// Reject tokens whose `iat` is more than `seconds` in the past
    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Validate as if the current time were `now`
    pub fn at(self, now: NumericDate) -> Self {
        self.clock(FixedClock(now))
    }

    /// Reject headers with members other than `alg`, `typ` and `kid`
    pub fn strict_header(mut self) -> Self {
        self.strict_header = true;
        self
    }

    /// Disable expiration validation
    pub fn no_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }

    /// Disable not-before validation
    pub fn no_nbf_validation(mut self) -> Self {
        self.validate_nbf = false;
        self
    }

    /// Disable issued-at validation (also disables `max_age`)
    pub fn no_iat_validation(mut self) -> Self {
        self.validate_iat = false;
        self
    }

    pub fn allowed_algorithms(&self) -> &AlgorithmPolicy {
        &self.algorithms
    }

    pub fn is_strict_header(&self) -> bool {
        self.strict_header
    }

    pub fn now(&self) -> NumericDate {
        self.clock.now()
    }

    /// Check temporal, issuer and audience claims; first failure wins
    pub fn validate_claims(&self, claims: &Claims) -> Result<()> {
        let now = self.now();
        let skew = self.clock_skew;

        if self.validate_exp && self.validate_nbf {
            if let (Some(exp), Some(nbf)) = (claims.expiration(), claims.not_before()) {
                if exp <= nbf {
                    return Err(Error::malformed_claim(
                        "exp",
                        format!("expiration {exp} is not after not-before {nbf}"),
                    ));
                }
            }
        }

        // exp: reject when now >= exp + skew
        if self.validate_exp {
            if let Some(exp) = claims.expiration() {
                let deadline = exp.checked_add(skew).ok_or_else(|| overflow("exp"))?;
                if now >= deadline {
                    return Err(Error::Expired {
                        claim: "exp",
                        timestamp: exp.as_seconds(),
                        now: now.as_seconds(),
                        skew,
                    });
                }
            }
        }

        // nbf: reject when now + skew < nbf
        if self.validate_nbf {
            if let Some(nbf) = claims.not_before() {
                let latest_now = now.checked_add(skew).ok_or_else(|| overflow("nbf"))?;
                if latest_now < nbf {
                    return Err(Error::NotYetValid {
                        not_before: nbf.as_seconds(),
                        now: now.as_seconds(),
                        skew,
                    });
                }
            }
        }

        if self.validate_iat {
            if let Some(iat) = claims.issued_at() {
                // Issued in the future
                let latest_now = now.checked_add(skew).ok_or_else(|| overflow("iat"))?;
                if iat > latest_now {
                    return Err(Error::Expired {
                        claim: "iat",
                        timestamp: iat.as_seconds(),
                        now: now.as_seconds(),
                        skew,
                    });
                }

                if let Some(max_age) = self.max_age {
                    let oldest = iat
                        .checked_add(max_age)
                        .and_then(|t| t.checked_add(skew))
                        .ok_or_else(|| overflow("iat"))?;
                    if now > oldest {
                        return Err(Error::Expired {
                            claim: "iat",
                            timestamp: iat.as_seconds(),
                            now: now.as_seconds(),
                            skew,
                        });
                    }
                }
            }
        }

        if let Some(expected) = &self.issuer {
            if claims.issuer() != Some(expected.as_str()) {
                return Err(Error::IssuerMismatch {
                    expected: expected.clone(),
                    found: claims.issuer().map(str::to_string),
                });
            }
        }

        if let Some(expected) = &self.audience {
            let audience = claims.audience();
            if !audience.as_ref().is_some_and(|aud| aud.contains(expected)) {
                return Err(Error::AudienceMismatch {
                    expected: expected.clone(),
                    found: audience.map(|aud| aud.to_vec()).unwrap_or_default(),
                });
            }
        }

        Ok(())
    }
}

fn overflow(claim: &str) -> Error {
    Error::malformed_claim(claim, "timestamp arithmetic overflows")
}
