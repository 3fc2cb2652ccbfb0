// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::path::Path;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use makefy::{generate, parse_services};

fn benchmark_parse_services(c: &mut Criterion) {
    let yaml = r"
services:
  web:
    build: .
    ports:
      - '8080:80'
    depends_on:
      - db
  db:
    image: postgres:16
    volumes:
      - data:/var/lib/postgresql/data
  cache:
    image: redis:7
volumes:
  data: {}
";

    c.bench_function("parse_services_small", |b| {
        b.iter(|| parse_services(black_box(yaml)).expect("parse failed"))
    });
}

fn benchmark_large_compose_parse(c: &mut Criterion) {
    let mut yaml = String::from("services:\n");
    for i in 0..100 {
        yaml.push_str(&format!("  service{i}:\n    image: example/service{i}:latest\n"));
    }

    c.bench_function("parse_100_services", |b| {
        b.iter(|| {
            let services = parse_services(black_box(&yaml)).expect("parse failed");
            black_box(services.len())
        })
    });
}

fn benchmark_generate(c: &mut Criterion) {
    let mut yaml = String::from("services:\n");
    for i in 0..100 {
        yaml.push_str(&format!("  service{i}: {{}}\n"));
    }
    let services = parse_services(&yaml).expect("parse failed");

    c.bench_function("generate_100_services", |b| {
        b.iter(|| generate(black_box(Path::new("docker-compose.yml")), black_box(&services)))
    });
}

criterion_group!(
    benches,
    benchmark_parse_services,
    benchmark_large_compose_parse,
    benchmark_generate
);
criterion_main!(benches);
