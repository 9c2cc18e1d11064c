use crate::algorithm::{Algorithm, Verifier};
use crate::claims::{Claims, ValidationPolicy};
use crate::error::{Error, Result};
use crate::token::{Header, Jwt, MAX_TOKEN_LENGTH};
use crate::utils::base64url;

use std::collections::HashMap;
use tracing::{debug, trace};

/// Verifies and validates compact JWS tokens
///
/// Validation order, first failure wins:
///
/// 1. Length bound and segmentation (three segments; two only for `none`)
/// 2. Header decoding; `alg` must be a registered algorithm
/// 3. `alg` must be allowed by the policy
/// 4. `alg` must equal the verifier's algorithm
/// 5. Signature decoding and verification over `header.claims`
/// 6. Claims decoding
/// 7. Temporal, issuer and audience checks
///
/// # Examples
///
/// ```
/// use jwtforge::{AlgorithmPolicy, Claims, Decoder, Encoder, HmacSigner, HmacVerifier, ValidationPolicy};
///
/// let token = Encoder::new(&HmacSigner::sha256("secret")?)
///     .encode(&Claims::new().with_issuer("https://auth.example.com"))?;
///
/// let decoder = Decoder::new(
///     ValidationPolicy::new()
///         .algorithms(AlgorithmPolicy::hs256_only())
///         .issuer("https://auth.example.com"),
/// );
/// let claims = decoder.decode(&token, &HmacVerifier::sha256("secret")?)?;
/// assert_eq!(claims.issuer(), Some("https://auth.example.com"));
/// # Ok::<(), jwtforge::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    policy: ValidationPolicy,
}

/// Borrowed segments of a compact token
struct Segments<'a> {
    header: &'a str,
    claims: &'a str,
    signature: Option<&'a str>,
    signing_input: &'a str,
}

impl Decoder {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Verify and validate `token`, returning its claims
    pub fn decode(&self, token: &str, verifier: &dyn Verifier) -> Result<Claims> {
        self.decode_token(token, verifier).map(Jwt::into_claims)
    }

    /// Verify and validate `token`, returning header, claims and signature
    pub fn decode_token(&self, token: &str, verifier: &dyn Verifier) -> Result<Jwt> {
        logged(self.decode_with(token, |_| Ok(verifier)))
    }

    /// Use the first verifier whose algorithm matches the header's `alg`
    ///
    /// Fails with `AlgorithmMismatch` when none does.
    pub fn decode_any(&self, token: &str, verifiers: &[&dyn Verifier]) -> Result<Jwt> {
        logged(self.decode_with(token, |header| {
            let algorithm = header.algorithm();
            verifiers
                .iter()
                .copied()
                .find(|v| v.algorithm() == algorithm)
                .ok_or_else(|| Error::AlgorithmMismatch {
                    expected: verifiers
                        .iter()
                        .map(|v| v.algorithm().as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    found: algorithm.to_string(),
                })
        }))
    }

    /// Select the verifier by the header's `kid`
    ///
    /// A missing or unknown `kid` fails with `MissingVerifier`. The selected
    /// verifier's algorithm must still match the header's `alg`.
    pub fn decode_by_kid(
        &self,
        token: &str,
        verifiers: &HashMap<String, Box<dyn Verifier>>,
    ) -> Result<Jwt> {
        logged(self.decode_with(token, |header| {
            let kid = header
                .key_id()
                .ok_or_else(|| Error::MissingVerifier("token header has no 'kid'".to_string()))?;
            verifiers
                .get(kid)
                .map(|v| v.as_ref())
                .ok_or_else(|| Error::MissingVerifier(format!("no verifier for kid '{kid}'")))
        }))
    }

    /// Decode the header without verifying anything
    ///
    /// The result is attacker-controlled; use it only to pick a verifier.
    pub fn decode_header(&self, token: &str) -> Result<Header> {
        let segments = split(token)?;
        self.parse_header(&segments)
    }

    fn decode_with<'v, F>(&self, token: &str, select: F) -> Result<Jwt>
    where
        F: FnOnce(&Header) -> Result<&'v dyn Verifier>,
    {
        let segments = split(token)?;
        let header = self.parse_header(&segments)?;
        let algorithm = header.algorithm();

        self.policy.allowed_algorithms().validate(algorithm)?;

        let verifier = select(&header)?;
        if verifier.algorithm() != algorithm {
            return Err(Error::AlgorithmMismatch {
                expected: verifier.algorithm().to_string(),
                found: algorithm.to_string(),
            });
        }

        let signature = match segments.signature {
            Some(encoded) => base64url::decode_bytes(encoded)?,
            None if algorithm == Algorithm::None => Vec::new(),
            None => {
                return Err(Error::MalformedToken(
                    "missing signature segment".to_string(),
                ))
            }
        };
        verifier.verify(segments.signing_input.as_bytes(), &signature)?;
        trace!(%algorithm, "signature verified");

        let claims = Claims::from_json(&base64url::decode_bytes(segments.claims)?)?;
        self.policy.validate_claims(&claims)?;
        trace!(%algorithm, "claims validated");

        Ok(Jwt::new(header, claims, signature))
    }

    fn parse_header(&self, segments: &Segments<'_>) -> Result<Header> {
        let json = base64url::decode_bytes(segments.header)?;
        Header::from_json(&json, self.policy.is_strict_header())
    }
}

fn split(token: &str) -> Result<Segments<'_>> {
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(Error::MalformedToken(format!(
            "token is {} bytes, limit is {MAX_TOKEN_LENGTH}",
            token.len()
        )));
    }

    let parts: Vec<&str> = token.split('.').collect();
    let (header, claims, signature) = match parts.as_slice() {
        [header, claims, signature] => (*header, *claims, Some(*signature)),
        [header, claims] => (*header, *claims, None),
        _ => {
            return Err(Error::MalformedToken(format!(
                "expected 3 segments, found {}",
                parts.len()
            )))
        }
    };

    Ok(Segments {
        header,
        claims,
        signature,
        signing_input: &token[..header.len() + 1 + claims.len()],
    })
}

fn logged<T>(result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        debug!(kind = ?e.kind(), error = %e, "token rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::hmac::{HmacSigner, HmacVerifier};
    use crate::algorithm::none::{NoneSigner, NoneVerifier};
    use crate::algorithm::AlgorithmPolicy;
    use crate::claims::NumericDate;
    use crate::token::Encoder;

    fn decoder() -> Decoder {
        Decoder::new(ValidationPolicy::default().at(NumericDate::from_seconds(1_600_000_000)))
    }

    fn hs256_token(claims: &Claims) -> String {
        let signer = HmacSigner::sha256("secret").unwrap();
        Encoder::new(&signer).encode(claims).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let claims = Claims::new()
            .with_subject("1234567890")
            .with_claim("name", "John Doe")
            .unwrap();
        let token = hs256_token(&claims);
        let verifier = HmacVerifier::sha256("secret").unwrap();

        let jwt = decoder().decode_token(&token, &verifier).unwrap();
        assert_eq!(jwt.claims(), &claims);
        assert_eq!(jwt.algorithm(), Algorithm::HS256);
        assert_eq!(jwt.header().token_type(), Some("JWT"));
        assert_eq!(jwt.signature().len(), 32);
    }

    #[test]
    fn test_segment_count() {
        let verifier = HmacVerifier::sha256("secret").unwrap();
        for token in ["", "abc", "a.b.c.d", "...."] {
            assert!(matches!(
                decoder().decode(token, &verifier),
                Err(Error::MalformedToken(_))
            ));
        }
    }

    #[test]
    fn test_two_segments_only_for_none() {
        let token = hs256_token(&Claims::new());
        let two = token.rsplit_once('.').unwrap().0;
        let verifier = HmacVerifier::sha256("secret").unwrap();
        assert!(matches!(
            decoder().decode(two, &verifier),
            Err(Error::MalformedToken(_))
        ));

        let none_token = Encoder::new(&NoneSigner).encode(&Claims::new()).unwrap();
        let none_two = none_token.trim_end_matches('.');
        let decoder = Decoder::new(
            ValidationPolicy::default().algorithms(AlgorithmPolicy::allow_all().allow_none()),
        );
        assert!(decoder.decode(none_two, &NoneVerifier).is_ok());
        assert!(decoder.decode(&none_token, &NoneVerifier).is_ok());
    }

    #[test]
    fn test_too_long() {
        let token = "a".repeat(MAX_TOKEN_LENGTH + 1);
        let verifier = HmacVerifier::sha256("secret").unwrap();
        assert!(matches!(
            decoder().decode(&token, &verifier),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn test_none_disallowed_by_default() {
        // {"alg":"none"}.{}.
        let token = "eyJhbGciOiJub25lIn0.e30.";
        assert!(matches!(
            decoder().decode(token, &NoneVerifier),
            Err(Error::DisallowedAlgorithm { .. })
        ));
    }

    #[test]
    fn test_disallowed_before_mismatch() {
        let token = hs256_token(&Claims::new());
        let decoder = Decoder::new(ValidationPolicy::default().algorithms(AlgorithmPolicy::rsa_any()));
        let verifier = HmacVerifier::sha256("secret").unwrap();
        assert!(matches!(
            decoder.decode(&token, &verifier),
            Err(Error::DisallowedAlgorithm { .. })
        ));
    }

    #[test]
    fn test_algorithm_mismatch() {
        let token = hs256_token(&Claims::new());
        let verifier = HmacVerifier::sha512("secret").unwrap();
        assert_eq!(
            decoder().decode(&token, &verifier),
            Err(Error::AlgorithmMismatch {
                expected: "HS512".into(),
                found: "HS256".into()
            })
        );
    }

    #[test]
    fn test_signature_checked_before_claims() {
        // claims segment is not JSON, but the signature is wrong first
        let token = "eyJhbGciOiJIUzI1NiJ9.bm90IGpzb24.AAAA";
        let verifier = HmacVerifier::sha256("secret").unwrap();
        assert_eq!(
            decoder().decode(token, &verifier),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn test_claims_validation_applies() {
        let token = hs256_token(&Claims::new().with_expiration(NumericDate::from_seconds(1_000_000_000)));
        let verifier = HmacVerifier::sha256("secret").unwrap();
        assert!(matches!(
            decoder().decode(&token, &verifier),
            Err(Error::Expired { claim: "exp", .. })
        ));
    }

    #[test]
    fn test_strict_header() {
        let signer = HmacSigner::sha256("secret").unwrap();
        let mut header = Header::new(Algorithm::HS256);
        header.set("jku", "https://attacker.example/jwks.json").unwrap();
        let token = Encoder::new(&signer)
            .encode_with_header(&header, &Claims::new())
            .unwrap();
        let verifier = signer.verifier();

        assert!(decoder().decode(&token, &verifier).is_ok());
        let strict = Decoder::new(ValidationPolicy::default().strict_header());
        assert!(matches!(
            strict.decode(&token, &verifier),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn test_decode_header() {
        let signer = HmacSigner::sha384("secret").unwrap();
        let token = Encoder::new(&signer)
            .encode_with_header(
                &Header::new(Algorithm::HS384).with_key_id("k-1"),
                &Claims::new(),
            )
            .unwrap();
        let header = decoder().decode_header(&token).unwrap();
        assert_eq!(header.algorithm(), Algorithm::HS384);
        assert_eq!(header.key_id(), Some("k-1"));
    }

    #[test]
    fn test_decode_any() {
        let token = hs256_token(&Claims::new().with_subject("s"));
        let hs512 = HmacVerifier::sha512("secret").unwrap();
        let hs256 = HmacVerifier::sha256("secret").unwrap();

        let jwt = decoder().decode_any(&token, &[&hs512, &hs256]).unwrap();
        assert_eq!(jwt.claims().subject(), Some("s"));

        assert!(matches!(
            decoder().decode_any(&token, &[&hs512]),
            Err(Error::AlgorithmMismatch { .. })
        ));
        assert!(matches!(
            decoder().decode_any(&token, &[]),
            Err(Error::AlgorithmMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_by_kid() {
        let signer_a = HmacSigner::sha256("secret-a").unwrap();
        let signer_b = HmacSigner::sha256("secret-b").unwrap();
        let mut verifiers: HashMap<String, Box<dyn Verifier>> = HashMap::new();
        verifiers.insert("a".into(), Box::new(signer_a.verifier()));
        verifiers.insert("b".into(), Box::new(signer_b.verifier()));

        let token = Encoder::new(&signer_b)
            .encode_with_header(&Header::new(Algorithm::HS256).with_key_id("b"), &Claims::new())
            .unwrap();
        assert!(decoder().decode_by_kid(&token, &verifiers).is_ok());

        // kid points at the wrong key
        let token = Encoder::new(&signer_b)
            .encode_with_header(&Header::new(Algorithm::HS256).with_key_id("a"), &Claims::new())
            .unwrap();
        assert_eq!(
            decoder().decode_by_kid(&token, &verifiers),
            Err(Error::InvalidSignature)
        );

        let token = Encoder::new(&signer_a)
            .encode_with_header(&Header::new(Algorithm::HS256).with_key_id("c"), &Claims::new())
            .unwrap();
        assert!(matches!(
            decoder().decode_by_kid(&token, &verifiers),
            Err(Error::MissingVerifier(_))
        ));

        let token = hs256_token(&Claims::new());
        assert!(matches!(
            decoder().decode_by_kid(&token, &verifiers),
            Err(Error::MissingVerifier(_))
        ));
    }
}
