// Criterion benchmarks for Vendor Select

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;
use std::sync::Arc;
use vendor_select::core::{
    distance::{distance_between, haversine_distance},
    filters::{is_eligible, SERVICE_RADIUS_KM},
    scoring::rank_candidates,
    SelectionPipeline, StaticOracle,
};
use vendor_select::models::{
    Candidate, Coordinate, Priority, ScoringWeights, ServiceCategory, ServiceRequest, Vendor,
    VendorStatus,
};

fn create_vendor(id: usize, lat: f64, lon: f64) -> Vendor {
    Vendor {
        vendor_id: format!("vendor-{}", id),
        name: format!("Vendor {}", id),
        email: String::new(),
        phone: String::new(),
        services: if id % 4 == 0 {
            vec![ServiceCategory::Plumbing]
        } else {
            vec![ServiceCategory::AcRepair, ServiceCategory::Electrical]
        },
        location: Coordinate::new(lat, lon),
        status: if id % 9 == 0 { VendorStatus::Busy } else { VendorStatus::Active },
        total_orders: (id % 200) as u32,
        completed_orders: (id % 200) as u32 * 9 / 10,
        cancelled_orders: 0,
        average_rating: 3.0 + (id % 20) as f64 / 10.0,
        completion_rate: 0.9,
        response_time_minutes: 15.0 + (id % 90) as f64,
        current_orders: (id % 3) as u32,
        max_concurrent_orders: 3,
        is_online: id % 2 == 0,
        last_seen: Utc::now(),
        working_hours: HashMap::new(),
    }
}

fn create_vendors(count: usize) -> Vec<Vendor> {
    (0..count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.001) % 0.3;
            let lon_offset = (i as f64 * 0.0007) % 0.3;
            create_vendor(i, 40.7128 + lat_offset, -74.0060 + lon_offset)
        })
        .collect()
}

fn create_request() -> ServiceRequest {
    ServiceRequest {
        request_id: "bench".to_string(),
        user_id: "user".to_string(),
        customer_name: "Bench".to_string(),
        customer_location: Coordinate::new(40.7128, -74.0060),
        service_type: ServiceCategory::AcRepair,
        description: String::new(),
        priority: Priority::Medium,
        estimated_value: 150.0,
        preferred_time: None,
        special_requirements: Vec::new(),
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(40.7128),
                black_box(-74.0060),
                black_box(40.72),
                black_box(-74.01),
            )
        });
    });
}

fn bench_scoring(c: &mut Criterion) {
    let request = create_request();
    let weights = ScoringWeights::default();

    let mut group = c.benchmark_group("scoring");

    for vendor_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<Candidate> = create_vendors(*vendor_count)
            .into_iter()
            .map(|vendor| Candidate {
                distance_km: distance_between(&request.customer_location, &vendor.location),
                vendor,
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("rank_candidates", vendor_count),
            vendor_count,
            |b, _| {
                b.iter(|| rank_candidates(black_box(&candidates), black_box(&request), &weights));
            },
        );
    }

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let request = create_request();
    let vendors = create_vendors(100);

    c.bench_function("filtering_100_vendors", |b| {
        b.iter(|| {
            let filtered: Vec<_> = vendors
                .iter()
                .filter(|v| is_eligible(v, &request))
                .filter(|v| {
                    distance_between(&request.customer_location, &v.location) <= SERVICE_RADIUS_KM
                })
                .collect();

            black_box(filtered)
        });
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let request = create_request();
    let vendors = create_vendors(500);
    let pipeline = SelectionPipeline::with_default_settings(Arc::new(StaticOracle::selecting(
        &["vendor-1", "vendor-2"],
        0.8,
    )));

    c.bench_function("select_500_vendors", |b| {
        b.iter(|| runtime.block_on(pipeline.select(black_box(&request), black_box(&vendors))));
    });
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_scoring,
    bench_filtering,
    bench_pipeline
);

criterion_main!(benches);
