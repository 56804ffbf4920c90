use criterion::{criterion_group, criterion_main, Criterion};
use powchain_core::{Block, PowConfig, ProofOfWork};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_pow(c: &mut Criterion) {
    c.bench_function("mine_block_difficulty_16", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let pow = ProofOfWork::new(PowConfig::with_difficulty(16)).unwrap();
        let parent: [u8; 32] = rng.gen();
        let payload: Vec<u8> = (0..64).map(|_| rng.gen()).collect();

        b.iter(|| {
            let _mined = Block::mine_at(payload.clone(), &parent, 1_600_000_000, &pow).unwrap();
        });
    });

    c.bench_function("digest_single_attempt", |b| {
        let pow = ProofOfWork::new(PowConfig::default()).unwrap();
        let genesis_input = powchain_core::PowInput {
            previous_hash: &[],
            payload: b"hello block chain",
            timestamp: 1_600_000_000,
        };
        let mut nonce = 0u64;
        b.iter(|| {
            nonce += 1;
            pow.digest(&genesis_input, nonce).unwrap()
        });
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
