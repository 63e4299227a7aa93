use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chess_rules::game_state::position::Position;
use chess_rules::move_generation::legal_moves::perft;
use chess_rules::move_generation::move_apply::apply_move;
use chess_rules::move_generation::termination::classify;
use chess_rules::utils::long_algebraic::decode_move_token;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_nodes: &'static [u64],
}

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "position_1",
        fen: STARTPOS_FEN,
        expected_nodes: &[20, 400, 8902],
    },
    BenchCase {
        name: "position_2",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_nodes: &[48, 2039],
    },
    BenchCase {
        name: "position_3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_nodes: &[14, 191, 2812],
    },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(10);

    for case in CASES {
        let position = Position::from_fen(case.fen).expect("benchmark FEN should parse");

        for (depth_idx, expected_nodes) in case.expected_nodes.iter().enumerate() {
            let depth = (depth_idx + 1) as u8;

            // Correctness guard before benchmarking.
            assert_eq!(
                perft(&position, depth),
                *expected_nodes,
                "node mismatch for {} depth {}",
                case.name,
                depth
            );

            group.throughput(Throughput::Elements(*expected_nodes));
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{}_d{}", case.name, depth)),
                expected_nodes,
                |b, expected| {
                    b.iter(|| {
                        let nodes = perft(black_box(&position), black_box(depth));
                        assert_eq!(nodes, *expected);
                        black_box(nodes)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_apply_and_classify(c: &mut Criterion) {
    let position = Position::from_fen(CASES[1].fen).expect("benchmark FEN should parse");
    let (from, to, promotion) = decode_move_token("e1g1").expect("castle token");

    c.bench_function("apply_move_castle", |b| {
        b.iter(|| {
            apply_move(black_box(&position), from, to, promotion).expect("castling is legal")
        })
    });
    c.bench_function("classify_kiwipete", |b| b.iter(|| classify(black_box(&position))));
}

criterion_group!(perft_benches, bench_perft, bench_apply_and_classify);
criterion_main!(perft_benches);
