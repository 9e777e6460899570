//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Random rollouts from different game phases
//! - Full MCTS search with varying simulation counts
//! - Tree operations (expansion, selection, backpropagation)
//! - Full bot decisions including the tactical pre-filter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use games_connect4::{Board, Player};
use mcts::{
    rollout, run_mcts, MctsConfig, MctsTree, PositionCache, RolloutEvaluator, StrongBot,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Helper to create a position after playing a sequence of columns, Red first.
fn play_moves(moves: &[u8]) -> (Board, Player) {
    let mut board = Board::new();
    let mut player = Player::Red;
    for &column in moves {
        board.apply_move(column, player).unwrap();
        player = player.opponent();
    }
    (board, player)
}

// =============================================================================
// Rollout Benchmarks
// =============================================================================

fn bench_rollouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout");

    let phases: [(&str, &[u8]); 3] = [
        ("opening", &[]),
        ("midgame", &[3, 3, 2, 4, 4, 2, 5, 1]),
        ("late", &[3, 3, 3, 3, 2, 2, 4, 4, 2, 4, 1, 5, 5, 5, 0, 6, 6, 6]),
    ];

    for (name, moves) in phases {
        let (board, to_move) = play_moves(moves);
        group.bench_function(name, |b| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| black_box(rollout(&board, to_move, &mut rng).unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_simulations");

    for sims in [50u32, 200, 1000, 5000] {
        group.throughput(Throughput::Elements(sims as u64));
        group.bench_with_input(BenchmarkId::new("opening", sims), &sims, |b, &sims| {
            let evaluator = RolloutEvaluator::new();
            let config = MctsConfig::default();

            b.iter(|| {
                let mut tree = MctsTree::new();
                let mut cache = PositionCache::new(config.cache_capacity);
                let mut rng = ChaCha20Rng::seed_from_u64(42);

                black_box(
                    run_mcts(
                        &mut tree,
                        &mut cache,
                        &evaluator,
                        config.clone(),
                        Board::new(),
                        Player::Red,
                        sims,
                        &mut rng,
                    )
                    .unwrap(),
                )
            });
        });
    }

    group.finish();
}

// =============================================================================
// Tree Operation Benchmarks
// =============================================================================

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");

    // Benchmark node allocation through expansion
    group.bench_function("expand_root", |b| {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        b.iter(|| {
            let mut tree = MctsTree::new();
            let root = tree.add_root(Board::new(), Player::Red);
            while let Ok(Some(_)) = tree.expand(root, &mut rng) {}
            black_box(tree.len())
        });
    });

    // Benchmark child selection (UCB1 calculation)
    group.bench_function("select_child", |b| {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut tree = MctsTree::new();
        let root = tree.add_root(Board::new(), Player::Red);
        let mut i = 0u32;
        while let Ok(Some(child_id)) = tree.expand(root, &mut rng) {
            let child = tree.get_mut(child_id);
            child.visit_count = (i + 1) * 10;
            child.win_score = (i as f32 - 3.0) * 0.1 * child.visit_count as f32;
            i += 1;
        }
        tree.get_mut(root).visit_count = 280;

        b.iter(|| black_box(tree.select_child(root, 1.414)));
    });

    // Benchmark backpropagation
    group.bench_function("backpropagate_depth_6", |b| {
        b.iter_batched(
            || {
                let mut rng = ChaCha20Rng::seed_from_u64(3);
                let mut tree = MctsTree::new();
                let root = tree.add_root(Board::new(), Player::Red);
                let mut leaf = root;
                for _ in 0..6 {
                    leaf = tree.expand(leaf, &mut rng).unwrap().unwrap();
                }
                (tree, root, leaf)
            },
            |(mut tree, root, leaf)| {
                tree.backpropagate(leaf, root, 1.0);
                black_box(tree)
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// =============================================================================
// Bot Decision Benchmarks
// =============================================================================

fn bench_bot_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("bot_decisions");

    // Pre-filter short-circuits the search
    group.bench_function("forced_block", |b| {
        let (board, _) = play_moves(&[0, 6, 1, 6, 2]);
        let legal = board.legal_moves();
        let mut bot = StrongBot::with_seed(MctsConfig::default(), Player::Yellow, 7);
        bot.initialize().unwrap();

        b.iter(|| black_box(bot.select_move(&board, &legal, 1000).unwrap()));
    });

    // Opening replies are cached by the warm-up search
    group.bench_function("warm_start_1000", |b| {
        let (board, _) = play_moves(&[3]);
        let legal = board.legal_moves();
        let mut bot = StrongBot::with_seed(MctsConfig::default(), Player::Yellow, 7);
        bot.initialize().unwrap();

        b.iter(|| black_box(bot.select_move(&board, &legal, 1000).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rollouts,
    bench_mcts_search_simulations,
    bench_tree_operations,
    bench_bot_decisions,
);
criterion_main!(benches);
