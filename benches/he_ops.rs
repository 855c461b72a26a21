//! Throughput of the main homomorphic operations at a realistic ring size.

use bfv_core::params::suggest_coeff_modulus;
use bfv_core::{
    BfvContext, Decryptor, EncryptionParameters, Encryptor, Evaluator, IntegerEncoder,
    KeyGenerator,
};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::thread_rng;

fn bench_he_ops(c: &mut Criterion) {
    let chain = suggest_coeff_modulus(4096, &[50, 50]).expect("chain");
    let params = EncryptionParameters::new(4096, chain, 65537).expect("params");
    let ctx = BfvContext::new(params).expect("context");

    let mut rng = thread_rng();
    let (sk, pk) = KeyGenerator::new(ctx.clone()).generate(&mut rng);
    let encoder = IntegerEncoder::new(ctx.clone());
    let encryptor = Encryptor::new(ctx.clone(), pk).expect("encryptor");
    let decryptor = Decryptor::new(ctx.clone(), sk).expect("decryptor");
    let evaluator = Evaluator::new(ctx);

    let pt = encoder.encode(12345).expect("encode");
    let ct_a = encryptor.encrypt(&pt, &mut rng).expect("encrypt");
    let ct_b = encryptor.encrypt(&pt, &mut rng).expect("encrypt");

    c.bench_function("encrypt/n=4096", |b| {
        b.iter(|| encryptor.encrypt(&pt, &mut rng).expect("encrypt"));
    });
    c.bench_function("add/n=4096", |b| {
        b.iter(|| {
            evaluator
                .add_ciphertexts(&[ct_a.clone(), ct_b.clone()])
                .expect("add")
        });
    });
    c.bench_function("decrypt/n=4096", |b| {
        b.iter(|| decryptor.decrypt(&ct_a).expect("decrypt"));
    });
}

criterion_group!(benches, bench_he_ops);
criterion_main!(benches);
