use std::sync::Arc;

use artifacts::FeatureSchema;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use features::{FeatureEncoder, RawRequest};

fn build_schema() -> Arc<FeatureSchema> {
    let mut columns = vec![
        "year".to_string(),
        "motor_volume".to_string(),
        "running_km".to_string(),
        "is_luxury".to_string(),
    ];
    for field in ["model", "motor_type", "wheel", "color", "type", "status"] {
        for i in 0..40 {
            columns.push(format!("{}_value{}", field, i));
        }
    }
    columns.push("model_bmw".to_string());
    Arc::new(FeatureSchema::new(columns).expect("valid schema"))
}

fn sample_request(i: usize) -> RawRequest {
    RawRequest {
        year: 2000 + (i % 25) as i64,
        motor_volume: 2.0,
        running_km: 10_000.0 * i as f64,
        model: if i % 2 == 0 { "bmw".into() } else { format!("value{}", i % 40) },
        motor_type: format!("value{}", i % 40),
        wheel: "left".into(),
        color: format!("Value{}", i % 50),
        car_type: "sedan".into(),
        status: "used".into(),
    }
}

fn bench_encode(c: &mut Criterion) {
    let encoder = FeatureEncoder::new(build_schema());
    let single = sample_request(1);
    let batch: Vec<RawRequest> = (0..1_000).map(sample_request).collect();

    c.bench_function("encode_single", |b| {
        b.iter(|| encoder.encode(black_box(&single)))
    });

    c.bench_function("encode_batch_1000", |b| {
        b.iter(|| encoder.encode_batch(black_box(&batch)))
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
