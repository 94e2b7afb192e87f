use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rts_command::CommandQueue;
use rts_core::{Deadline, PlayerId};
use rts_mcts::{CycleContext, HeuristicWeights, Mcts, Planner, PlannerConfig, SearchConfig};
use rts_sandbox::{generate, MapConfig};

fn bench_search(c: &mut Criterion) {
    let engine = generate(&MapConfig::default(), 7);
    let player = PlayerId(0);
    let queues = CommandQueue::new();

    let mut group = c.benchmark_group("rts-mcts/map16");
    group.sample_size(20);

    for iterations in [16u32, 64] {
        let config = SearchConfig::default()
            .with_max_iterations(iterations)
            .with_rollout_depth(10);
        let mcts = Mcts::new(config, HeuristicWeights::default());
        group.bench_function(format!("search_{iterations}"), |b| {
            b.iter(|| {
                let mut ctx = CycleContext::new();
                let deadline = Deadline::after(Duration::from_secs(10));
                let result = mcts.search(engine.clone(), player, &queues, &mut ctx, deadline, 1);
                black_box(result.stats.nodes);
            })
        });
    }

    let config = PlannerConfig::default()
        .with_search(SearchConfig::default().with_max_iterations(32).with_rollout_depth(10));
    group.bench_function("plan_cycle", |b| {
        b.iter(|| {
            let mut planner = Planner::new(config.clone());
            let mut live_queues = CommandQueue::new();
            let deadline = Deadline::after(Duration::from_secs(10));
            black_box(planner.plan(&engine, player, &mut live_queues, deadline));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
