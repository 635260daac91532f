use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scoring::api::*;
use scoring::response::serialize_json_response;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn signed_body(auth: &AuthVerifier, method: &str, arguments: serde_json::Value) -> Vec<u8> {
    let body = json!({
        "account": "horns&hoofs",
        "login": "h&f",
        "method": method,
        "token": auth.user_digest("horns&hoofs", "h&f"),
        "arguments": arguments,
    });
    serde_json::to_vec(&body).unwrap()
}

fn benchmark_schema_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_validation");
    group.measurement_time(Duration::from_secs(10));

    let full = json!({
        "phone": "79175002040",
        "email": "stupnikov@otus.ru",
        "first_name": "Ivan",
        "last_name": "Petrov",
        "birthday": "01.01.1990",
        "gender": 1
    });
    group.bench_function("online_score_full", |b| {
        b.iter(|| {
            let result = OnlineScoreRequest::from_value(black_box(&full));
            black_box(result)
        });
    });

    let invalid = json!({"phone": "8917", "email": "nope", "gender": 7, "birthday": "XXX"});
    group.bench_function("online_score_invalid", |b| {
        b.iter(|| {
            let result = OnlineScoreRequest::from_value(black_box(&invalid));
            black_box(result)
        });
    });

    for size in [1, 10, 100, 1000].iter() {
        let ids: Vec<i64> = (0..*size).collect();
        let arguments = json!({"client_ids": ids, "date": "19.07.2017"});
        group.bench_with_input(
            BenchmarkId::new("clients_interests", size),
            &arguments,
            |b, arguments| {
                b.iter(|| {
                    let result = ClientsInterestsRequest::from_value(black_box(arguments));
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

fn benchmark_auth(c: &mut Criterion) {
    let mut group = c.benchmark_group("auth");
    let auth = AuthVerifier::default();

    group.bench_function("user_digest", |b| {
        b.iter(|| {
            let digest = auth.user_digest(black_box("horns&hoofs"), black_box("h&f"));
            black_box(digest)
        });
    });

    group.bench_function("admin_digest", |b| {
        b.iter(|| black_box(auth.admin_digest()));
    });

    group.finish();
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    let store = MemoryStore::with_entries((0..100).map(|id| (format!("i:{}", id), r#"["cars","pets"]"#)));
    let dispatcher = Dispatcher::new(Arc::new(store)).unwrap();
    let auth = AuthVerifier::default();

    let score = HttpRequest::new(
        HttpMethod::POST,
        "/method",
        signed_body(
            &auth,
            ONLINE_SCORE,
            json!({"phone": "79175002040", "email": "stupnikov@otus.ru"}),
        ),
    );
    group.bench_function("online_score_cached", |b| {
        b.iter(|| {
            let mut ctx = RequestContext::new("bench");
            let response = dispatcher.handle(black_box(&score), &mut ctx);
            black_box(response)
        });
    });

    let ids: Vec<i64> = (0..100).collect();
    let interests = HttpRequest::new(
        HttpMethod::POST,
        "/method",
        signed_body(&auth, CLIENTS_INTERESTS, json!({"client_ids": ids})),
    );
    group.bench_function("clients_interests_100", |b| {
        b.iter(|| {
            let mut ctx = RequestContext::new("bench");
            let response = dispatcher.handle(black_box(&interests), &mut ctx);
            black_box(response)
        });
    });

    let forbidden = HttpRequest::new(HttpMethod::POST, "/method", br#"{"login":"x","token":"","method":"online_score","arguments":{}}"#.to_vec());
    group.bench_function("forbidden", |b| {
        b.iter(|| {
            let mut ctx = RequestContext::new("bench");
            let response = dispatcher.handle(black_box(&forbidden), &mut ctx);
            black_box(response)
        });
    });

    group.finish();
}

fn benchmark_response_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_serialization");

    let small = envelope(200, json!({"score": 3.0}));
    group.bench_function("serialize_score", |b| {
        b.iter(|| black_box(serialize_json_response(black_box(&small))));
    });

    let mut interests = serde_json::Map::new();
    for id in 0..1000 {
        interests.insert(id.to_string(), json!(["cars", "pets", "travel"]));
    }
    let large = envelope(200, serde_json::Value::Object(interests));
    group.bench_function("serialize_interests_1000", |b| {
        b.iter(|| black_box(serialize_json_response(black_box(&large))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_schema_validation,
    benchmark_auth,
    benchmark_dispatch,
    benchmark_response_serialization
);
criterion_main!(benches);
