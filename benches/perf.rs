use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use prosens_terminal::catalog_fetch::parse_catalog_json;
use prosens_terminal::demo_feed::generate_catalog;
use prosens_terminal::pagination::{BROWSE_PAGE_SIZE, PaginationState};
use prosens_terminal::render::{ListView, RenderEngine, RenderMode};
use prosens_terminal::search::filter_players;
use prosens_terminal::similar::{SIMILAR_LIMIT, find_similar};
use prosens_terminal::state::Player;
use prosens_terminal::stats::summarize;

fn large_catalog() -> Vec<Player> {
    let mut rng = StdRng::seed_from_u64(42);
    generate_catalog(&mut rng, 2_000)
}

fn bench_catalog_parse(c: &mut Criterion) {
    c.bench_function("catalog_parse", |b| {
        b.iter(|| {
            let players = parse_catalog_json(black_box(PLAYERS_JSON)).unwrap();
            black_box(players.len());
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let catalog = large_catalog();
    c.bench_function("filter_players", |b| {
        b.iter(|| {
            let hits = filter_players(black_box(&catalog), black_box("fnat"));
            black_box(hits.len());
        })
    });
}

fn bench_render_page(c: &mut Criterion) {
    let catalog = large_catalog();
    let mut engine = RenderEngine::default();
    let pagination = PaginationState::new(BROWSE_PAGE_SIZE);
    c.bench_function("render_first_page_warm", |b| {
        b.iter(|| {
            let mut view = ListView::new();
            let outcome = engine.render_page(
                black_box(&catalog),
                &mut view,
                &pagination,
                false,
                RenderMode::Replace,
            );
            black_box(outcome.rendered);
        })
    });
}

fn bench_find_similar(c: &mut Criterion) {
    let catalog = large_catalog();
    c.bench_function("find_similar", |b| {
        b.iter(|| {
            let closest = find_similar(black_box(&catalog), black_box(320.0), SIMILAR_LIMIT);
            black_box(closest.len());
        })
    });
}

fn bench_summarize(c: &mut Criterion) {
    let catalog = large_catalog();
    c.bench_function("catalog_summary", |b| {
        b.iter(|| {
            let summary = summarize(black_box(&catalog)).unwrap();
            black_box(summary.teams.len());
        })
    });
}

criterion_group!(
    perf,
    bench_catalog_parse,
    bench_filter,
    bench_render_page,
    bench_find_similar,
    bench_summarize
);
criterion_main!(perf);

static PLAYERS_JSON: &str = include_str!("../tests/fixtures/players.json");
