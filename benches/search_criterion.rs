use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use arcade_chess::search::board_scoring::PieceSquareScorer;
use arcade_chess::search::iterative_deepening::{iterative_deepening_search, SearchConfig};
use arcade_chess::search::move_ordering::SearchHeuristics;
use arcade_chess::search::search_position::SearchPosition;
use arcade_chess::search::transposition_table::TranspositionTable;
use arcade_chess::utils::fen_parser::parse_fen;

#[derive(Clone, Copy)]
struct PerfCase {
    name: &'static str,
    fen: &'static str,
}

const CASES: &[PerfCase] = &[
    PerfCase {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    },
    PerfCase {
        name: "classical_mid",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    },
    PerfCase {
        name: "tactical",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    },
    PerfCase {
        name: "end_kpk",
        fen: "8/8/8/8/8/4k3/4P3/4K3 w - - 0 1",
    },
];

fn bench_search(c: &mut Criterion) {
    let depth = std::env::var("ARCADE_BENCH_DEPTH")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(4)
        .max(1);

    let mut group = c.benchmark_group("search");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    let scorer = PieceSquareScorer;
    let config = SearchConfig {
        max_depth: depth,
        movetime_ms: None,
        ..SearchConfig::default()
    };

    for case in CASES {
        let position = parse_fen(case.fen).expect("benchmark FEN should parse");
        group.bench_with_input(
            BenchmarkId::new(case.name, format!("d{depth}")),
            &position,
            |b, position| {
                b.iter(|| {
                    // Cold tables each run so iterations are comparable.
                    let mut tt = TranspositionTable::default();
                    let mut heuristics = SearchHeuristics::default();
                    let mut search_position = SearchPosition::from_position(position);
                    let result = iterative_deepening_search(
                        black_box(&mut search_position),
                        &scorer,
                        &config,
                        &mut tt,
                        &mut heuristics,
                    )
                    .expect("search should run");
                    black_box(result.best_move)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(search_benches, bench_search);
criterion_main!(search_benches);
