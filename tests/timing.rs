//! Timing behaviour of HMAC signature verification
//!
//! Statistical and environment-sensitive, so ignored by default:
//! `cargo test --release --test timing -- --ignored`

use jwtforge::utils::base64url;
use jwtforge::*;
use std::time::{Duration, Instant};

const ROUNDS: usize = 20_000;

fn median(mut samples: Vec<Duration>) -> Duration {
    samples.sort();
    samples[samples.len() / 2]
}

fn measure(verifier: &HmacVerifier, message: &[u8], signature: &[u8]) -> Duration {
    let samples = (0..ROUNDS)
        .map(|_| {
            let start = Instant::now();
            let _ = std::hint::black_box(verifier.verify(message, signature));
            start.elapsed()
        })
        .collect();
    median(samples)
}

#[test]
#[ignore = "timing measurement; run explicitly in release mode"]
fn test_mismatch_position_does_not_leak() {
    let signer = HmacSigner::sha256("timing-secret").unwrap();
    let verifier = signer.verifier();
    let token = Encoder::new(&signer)
        .encode(&Claims::new().with_subject("user"))
        .unwrap();
    let (message, signature) = token.rsplit_once('.').unwrap();
    let valid = base64url::decode_bytes(signature).unwrap();

    let mut first_byte_wrong = valid.clone();
    first_byte_wrong[0] ^= 0xff;
    let mut last_byte_wrong = valid.clone();
    last_byte_wrong[31] ^= 0xff;

    let early = measure(&verifier, message.as_bytes(), &first_byte_wrong);
    let late = measure(&verifier, message.as_bytes(), &last_byte_wrong);

    let (fast, slow) = if early < late { (early, late) } else { (late, early) };
    let ratio = slow.as_nanos() as f64 / fast.as_nanos().max(1) as f64;
    assert!(
        ratio < 1.5,
        "median verification time differs by {ratio:.2}x ({early:?} vs {late:?})"
    );
}

#[test]
fn test_constant_time_comparison_used() {
    // Functional half of the timing guarantee: every mismatch position fails the same way
    let signer = HmacSigner::sha384("timing-secret").unwrap();
    let verifier = signer.verifier();
    let signature = signer.sign(b"message").unwrap();

    for position in [0, 23, 47] {
        let mut wrong = signature.clone();
        wrong[position] ^= 0x80;
        assert_eq!(
            verifier.verify(b"message", &wrong),
            Err(Error::InvalidSignature)
        );
    }
    assert!(verifier.verify(b"message", &signature).is_ok());
}
