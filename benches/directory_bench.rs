//! Directory Benchmarks - Public View Rebuild
//!
//! Every refresh rebuilds the public view from the whole listings
//! collection, so the filter and the JSON decode scale with it.
//!
//! Run with: cargo bench --bench directory_bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use albury_directory::domain::listing::{self, Listing, ListingDraft, ListingStatus, TierFilter};
use albury_directory::domain::tier::Tier;

fn collection(size: usize) -> Vec<Listing> {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..size)
        .map(|i| {
            let tier = Tier::ALL[i % Tier::ALL.len()];
            let draft = ListingDraft {
                name: format!("Business {i}"),
                logo: format!("https://picsum.photos/seed/{i}/200"),
                description: "Locally owned and operated".to_string(),
                email: format!("owner{i}@example.com"),
                address: "Albury NSW 2640".to_string(),
                tier,
                ..ListingDraft::default()
            };
            let created = start + Duration::hours(i64::try_from(i).unwrap_or(0));
            let mut l = Listing::from_draft(draft, format!("id-{i}"), created);
            l.status = if i % 3 == 0 {
                ListingStatus::Pending
            } else {
                ListingStatus::Approved
            };
            l.is_private = i % 7 == 0;
            l
        })
        .collect()
}

/// Benchmark the public view filter over 5k listings.
fn bench_approved_view(c: &mut Criterion) {
    let listings = collection(5_000);
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();

    c.bench_function("approved_view_5k", |b| {
        b.iter(|| listing::approved_view(black_box(&listings), black_box(now), false));
    });
}

/// Benchmark decoding a stored collection, as every store read does.
fn bench_decode_collection(c: &mut Criterion) {
    let json = serde_json::to_string(&collection(5_000)).unwrap_or_default();

    c.bench_function("decode_collection_5k", |b| {
        b.iter(|| serde_json::from_str::<Vec<Listing>>(black_box(&json)).map(|v| v.len()));
    });
}

/// Benchmark browsing one tier of the public view.
fn bench_tier_filter(c: &mut Criterion) {
    let listings = collection(5_000);

    c.bench_function("tier_filter_massive_5k", |b| {
        b.iter(|| TierFilter::Only(Tier::Massive).apply(black_box(&listings)).len());
    });
}

criterion_group!(
    benches,
    bench_approved_view,
    bench_decode_collection,
    bench_tier_filter,
);
criterion_main!(benches);
