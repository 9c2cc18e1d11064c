//! RSA benchmarks (RS256, RS384, RS512)
//!
//! Key loading, signing and verification with a 2048-bit key, plus
//! RS256 verification across key sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jwtforge::*;

const PRIVATE_2048: &str = include_str!("../tests/fixtures/rsa_private_key_2048.pem");
const PUBLIC_2048: &str = include_str!("../tests/fixtures/rsa_public_key_2048.pem");
const PRIVATE_3072: &str = include_str!("../tests/fixtures/rsa_private_key_3072.pem");
const PRIVATE_4096: &str = include_str!("../tests/fixtures/rsa_private_key_4096.pem");

const ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

fn claims() -> Claims {
    Claims::new()
        .with_subject("user123")
        .with_issuer("https://example.com")
        .with_expiration(NumericDate::now().checked_add(3600).unwrap())
}

fn bench_key_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsa_key_loading");

    group.bench_function("private_pkcs1_2048", |b| {
        b.iter(|| RsaSigner::sha256(black_box(PRIVATE_2048)).unwrap());
    });
    group.bench_function("public_spki_2048", |b| {
        b.iter(|| RsaVerifier::sha256(black_box(PUBLIC_2048)).unwrap());
    });

    group.finish();
}

fn bench_rsa_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsa_signing");
    let claims = claims();

    for alg in ALGORITHMS {
        let signer = RsaSigner::new(alg, PRIVATE_2048).unwrap();
        let encoder = Encoder::new(&signer);
        group.bench_function(alg.as_str(), |b| {
            b.iter(|| encoder.encode(black_box(&claims)).unwrap());
        });
    }

    group.finish();
}

fn bench_rsa_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsa_verification");
    let claims = claims();

    for alg in ALGORITHMS {
        let token = Encoder::new(&RsaSigner::new(alg, PRIVATE_2048).unwrap())
            .encode(&claims)
            .unwrap();
        let verifier = RsaVerifier::new(alg, PUBLIC_2048).unwrap();
        let decoder = Decoder::new(ValidationPolicy::new().algorithms(AlgorithmPolicy::rsa_any()));

        group.bench_function(alg.as_str(), |b| {
            b.iter(|| decoder.decode(black_box(&token), &verifier).unwrap());
        });
    }

    group.finish();
}

fn bench_key_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsa_key_sizes");
    let claims = claims();

    for (bits, pem) in [(2048, PRIVATE_2048), (3072, PRIVATE_3072), (4096, PRIVATE_4096)] {
        let signer = RsaSigner::sha256(pem).unwrap();
        let verifier = signer.verifier();
        let token = Encoder::new(&signer).encode(&claims).unwrap();
        let decoder = Decoder::default();

        group.bench_with_input(BenchmarkId::new("RS256_verify", bits), &token, |b, token| {
            b.iter(|| decoder.decode(black_box(token), &verifier).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_loading,
    bench_rsa_signing,
    bench_rsa_verification,
    bench_key_sizes
);
criterion_main!(benches);
