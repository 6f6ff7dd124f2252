#[macro_use]
extern crate criterion;
use criterion::Criterion;
use sskg::prf::{Blake2bPrf, HkdfSha256Prf, HmacSha256Prf, Tls12Prf};
use sskg::{Prf, SequenceState};

const MAX_KEYS: u64 = 1 << 32;

fn bench_next<P: Prf>(name: &str, prf: P, c: &mut Criterion) {
    let mut seq = SequenceState::new(&[0u8; 32], MAX_KEYS, prf).unwrap();
    c.bench_function(format!("Next with {}", name).as_str(), |b| {
        b.iter(|| seq.next().unwrap())
    });
}

fn bench_seek<P: Prf + Clone>(name: &str, prf: P, n: u64, c: &mut Criterion) {
    c.bench_function(format!("Seek {} with {}", n, name).as_str(), |b| {
        b.iter(|| {
            let mut seq = SequenceState::new(&[0u8; 32], MAX_KEYS, prf.clone()).unwrap();
            seq.seek(n).unwrap();
        })
    });
}

fn next_blake2b(c: &mut Criterion) {
    bench_next("blake2b", Blake2bPrf::default(), c)
}
fn next_hmac(c: &mut Criterion) {
    bench_next("hmac-sha256", HmacSha256Prf, c)
}
fn next_hkdf(c: &mut Criterion) {
    bench_next("hkdf-sha256", HkdfSha256Prf::new(32).unwrap(), c)
}
fn next_tls12(c: &mut Criterion) {
    bench_next("tls12-sha256", Tls12Prf::new(32).unwrap(), c)
}

fn seek_short(c: &mut Criterion) {
    bench_seek("blake2b", Blake2bPrf::default(), 10_000, c)
}
fn seek_far(c: &mut Criterion) {
    bench_seek("blake2b", Blake2bPrf::default(), (1 << 32) - 1, c)
}

fn key_blake2b(c: &mut Criterion) {
    let mut seq = SequenceState::new(&[0u8; 32], MAX_KEYS, Blake2bPrf::default()).unwrap();
    seq.seek(12345).unwrap();
    c.bench_function("Key with blake2b", |b| b.iter(|| seq.key().unwrap()));
}

criterion_group!(next_benches, next_blake2b, next_hmac, next_hkdf, next_tls12);

criterion_group!(seek_benches, seek_short, seek_far, key_blake2b);

criterion_main!(next_benches, seek_benches);
