use cc_response::api::{BufferedResponse, ResponseFormat, ResponseWriter};
use cc_response::schema::schema_header_value;
use cc_response::{CorsConfig, ServiceIdentity};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::StatusCode;
use serde_json::json;

/// Cluster-load style document with `brokers` entries
fn load_document(brokers: usize) -> String {
    let entries: Vec<_> = (0..brokers)
        .map(|id| {
            json!({
                "Broker": id,
                "Host": format!("kafka-{}.example.com", id),
                "Rack": format!("rack-{}", id % 3),
                "CpuPct": 41.5,
                "Leaders": 120,
                "Replicas": 360,
                "DiskMB": {"used": 10240.0, "capacity": 512000.0},
                "BrokerState": "ALIVE"
            })
        })
        .collect();
    json!({"version": 1, "hosts": [], "brokers": entries}).to_string()
}

fn bench_schema_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_inference");

    for brokers in [10usize, 100, 1000] {
        let body = load_document(brokers);
        group.bench_with_input(BenchmarkId::new("cluster_load", brokers), &body, |b, body| {
            b.iter(|| schema_header_value(black_box(body)).unwrap())
        });
    }

    group.finish();
}

fn bench_write_response(c: &mut Criterion) {
    let cors = CorsConfig::allow("https://ui.example.com", "User-Task-ID");
    let identity = ServiceIdentity::new("2.5.142", "8c1e0f4");
    let writer = ResponseWriter::new(&cors, &identity);
    let body = load_document(100);

    let mut group = c.benchmark_group("write_response");
    for (name, format) in
        [("json", ResponseFormat::json()), ("json_with_schema", ResponseFormat::json().with_schema())]
    {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut sink = BufferedResponse::new();
                writer.write(&mut sink, StatusCode::OK, format, black_box(&body)).unwrap();
                sink
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_schema_inference, bench_write_response);
criterion_main!(benches);
