//! # World Benchmark
//!
//! Measures the three costs a tick pays:
//! - creating entities and settling their membership
//! - the per-tick system pass over enabled entities
//! - draining a queue of component refreshes
//!
//! Run with: `cargo bench --package tessera_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_core::{
    Component, ComponentFilter, EntityId, FilterBuilder, System, SystemContext, World,
};

struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

struct Velocity {
    x: f32,
    y: f32,
}
impl Component for Velocity {}

struct Frozen;
impl Component for Frozen {}

struct Movement;

impl System for Movement {
    fn configure(&mut self, filter: &mut FilterBuilder<'_>) {
        filter.require::<Position>().require::<Velocity>().exclude::<Frozen>();
    }

    fn on_update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {
        ctx.for_each(|world, entity| {
            let Ok(velocity) = world.component::<Velocity>(entity) else {
                return;
            };
            let (vx, vy) = (velocity.x, velocity.y);
            if let Ok(position) = world.component_mut::<Position>(entity) {
                position.x += vx * dt;
                position.y += vy * dt;
            }
        });
    }
}

fn populated_world(count: usize) -> World {
    let mut world = World::new();
    world.add_system(0, Movement).expect("movement system");

    for i in 0..count {
        let entity = world.create_entity();
        let f = i as f32;
        world
            .add_component(entity, Position { x: f, y: f })
            .expect("position");
        world
            .add_component(entity, Velocity { x: 1.0, y: 0.5 })
            .expect("velocity");
    }

    world.update(0.0);
    world
}

/// Benchmark: spawn entities and settle them into their systems.
fn bench_spawn_and_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_and_settle");

    for count in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(populated_world(count).entity_count()));
        });
    }

    group.finish();
}

/// Benchmark: one update with no pending actions.
fn bench_steady_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("steady_tick");

    for count in [1_000, 10_000, 100_000] {
        let mut world = populated_world(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| world.update(black_box(0.016)));
        });
    }

    group.finish();
}

/// Benchmark: re-evaluate membership of every entity.
fn bench_refresh_drain(c: &mut Criterion) {
    let count = 10_000;
    let mut world = populated_world(count);
    let entities: Vec<_> = (0..count)
        .filter_map(|i| world.get_entity(EntityId::new(u32::try_from(i).ok()?)))
        .collect();

    c.bench_function("refresh_drain_10k", |b| {
        b.iter(|| {
            for &entity in &entities {
                world.add_component(entity, Frozen).expect("frozen");
            }
            black_box(world.apply_actions());
            for &entity in &entities {
                world.remove_component::<Frozen>(entity).expect("frozen");
            }
            black_box(world.apply_actions())
        });
    });
}

/// Benchmark: raw filter check (theoretical minimum for membership).
fn bench_filter_check(c: &mut Criterion) {
    let world = populated_world(1);
    let entity = world.get_entity(EntityId::new(0)).expect("entity");
    let mask = world.component_mask(entity).expect("mask");

    let mut filter = ComponentFilter::new();
    filter.require(0);
    filter.require(1);
    filter.exclude(2);

    c.bench_function("filter_check", |b| {
        b.iter(|| black_box(filter.check(black_box(mask))));
    });
}

criterion_group!(
    benches,
    bench_spawn_and_settle,
    bench_steady_tick,
    bench_refresh_drain,
    bench_filter_check,
);
criterion_main!(benches);
