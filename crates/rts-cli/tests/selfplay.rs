use rts_cli::{run_batch, run_selfplay, GameOutcome, SelfPlayConfig};
use rts_mcts::{PlannerConfig, SearchConfig};
use rts_sandbox::MapConfig;

fn quick() -> SelfPlayConfig {
    SelfPlayConfig {
        map: MapConfig {
            width: 10,
            height: 10,
            neutral_cities: 3,
            ..MapConfig::default()
        },
        cycles: 4,
        budget_ms: 10_000,
        seed: 5,
        planner: PlannerConfig::default().with_search(
            SearchConfig::default()
                .with_max_iterations(4)
                .with_rollout_depth(3),
        ),
    }
}

#[test]
fn every_player_decides_once_per_cycle() {
    let result = run_selfplay(&quick());

    assert!(result.cycles_played <= 4);
    assert_eq!(result.players.len(), 2);
    for stats in &result.players {
        let decided: u32 = stats.decisions.values().sum();
        assert_eq!(decided, result.cycles_played);
    }
    if !matches!(result.outcome, GameOutcome::Aborted { .. }) {
        assert_eq!(result.game_time_ms, u64::from(result.cycles_played) * 1000);
    }
}

#[test]
fn same_seed_replays_identically() {
    let a = run_selfplay(&quick());
    let b = run_selfplay(&quick());
    assert_eq!(a.cycles_played, b.cycles_played);
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.players, b.players);
}

#[test]
fn batch_counts_every_game() {
    let mut config = quick();
    config.cycles = 2;
    let batch = run_batch(&config, 3);

    assert_eq!(batch.results.len(), 3);
    let seeds: Vec<u64> = batch.results.iter().map(|r| r.seed).collect();
    assert_eq!(seeds, vec![5, 6, 7]);
    let victories: u32 = batch.wins.iter().sum();
    assert_eq!(victories + batch.unfinished + batch.aborted, 3);
}

#[test]
fn result_serializes_to_json() {
    let mut config = quick();
    config.cycles = 1;
    let result = run_selfplay(&config);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["seed"], 5);
    assert!(json["players"].is_array());
    assert!(json["outcome"]["kind"].is_string());
}

#[test]
fn yaml_config_round_trips_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selfplay.yaml");
    std::fs::write(&path, "cycles: 9\nbudget_ms: 25\nmap:\n  width: 12\n").unwrap();
    let config = SelfPlayConfig::load(&path).unwrap();

    assert_eq!(config.cycles, 9);
    assert_eq!(config.budget_ms, 25);
    assert_eq!(config.map.width, 12);
    assert_eq!(config.map.height, 16);
    assert_eq!(config.planner, PlannerConfig::default());
}
