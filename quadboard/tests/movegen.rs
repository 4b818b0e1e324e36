use quadboard::{Position, FEN_KIWIPETE, FEN_STARTPOS};

/// Checks that the legal moves of the position described by `fen` are exactly `legal_moves`, ignoring order
fn lists_match(fen: &str, legal_moves: &[&str]) {
    let pos = Position::from_fen(fen).unwrap();
    let side = pos.side_to_move();

    let mut moves = pos
        .legal_moves()
        .iter()
        .map(|mv| mv.to_uci(side))
        .collect::<Vec<String>>();
    let mut legal_moves = legal_moves
        .iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<String>>();

    moves.sort();
    legal_moves.sort();

    let extra = moves
        .iter()
        .filter(|mv| !legal_moves.contains(mv))
        .collect::<Vec<_>>();
    let missing = legal_moves
        .iter()
        .filter(|mv| !moves.contains(mv))
        .collect::<Vec<_>>();

    assert!(
        extra.is_empty() && missing.is_empty(),
        "\nExtra: {extra:?}\nMissing: {missing:?}\nPosition: {fen}\n{pos:?}"
    );
    assert_eq!(moves.len(), legal_moves.len(), "Duplicate moves in {fen}");
}

#[test]
#[rustfmt::skip]
fn test_moves_from_startpos() {
    lists_match(FEN_STARTPOS, &[ "a2a3", "a2a4", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3", "e2e4", "f2f3", "f2f4", "g2g3", "g2g4", "h2h3", "h2h4", "b1a3", "b1c3", "g1f3", "g1h3" ]);
}

#[test]
#[rustfmt::skip]
fn test_moves_from_kiwipete() {
    lists_match(FEN_KIWIPETE, &[ "a2a3", "a2a4", "b2b3", "g2g3", "g2h3", "g2g4", "d5d6", "d5e6", "c3b1", "c3d1", "c3a4", "c3b5", "e5d3", "e5c4", "e5g4", "e5c6", "e5g6", "e5d7", "e5f7", "d2c1", "d2e3", "d2f4", "d2g5", "d2h6", "e2d1", "e2f1", "e2d3", "e2c4", "e2b5", "e2a6", "a1b1", "a1c1", "a1d1", "h1f1", "h1g1", "f3d3", "f3e3", "f3g3", "f3h3", "f3f4", "f3g4", "f3f5", "f3h5", "f3f6", "e1c1", "e1d1", "e1f1", "e1g1" ]);
}

#[test]
fn test_moves_after_knight_development() {
    lists_match(
        "rnbqkbnr/1ppppppp/8/p7/8/N7/PPPPPPPP/R1BQKBNR w KQkq - 2 1",
        &[
            "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3", "e2e4", "f2f3", "f2f4", "g2g3",
            "g2g4", "h2h3", "h2h4", "g1f3", "g1h3", "a3b1", "a3c4", "a3b5", "a1b1",
        ],
    );
}

#[cfg(test)]
mod pin_tests {
    use super::*;

    #[test]
    fn test_pawn_pinned_to_file_may_not_capture_en_passant() {
        lists_match(
            "1r4b1/8/4R3/pP6/8/1K1N3q/8/3k4 w - a6 0 1",
            &["b5b6", "b3a2", "b3b2", "b3a3", "b3c3", "b3a4", "b3c4"],
        );
    }

    #[test]
    fn test_pinned_knights_cannot_move() {
        lists_match(
            "k2r3b/8/5N2/3N4/1N1K2Nq/8/1N6/b7 w - - 0 1",
            &[
                "b4a2", "b4c2", "b4d3", "b4a6", "b4c6", "d4c3", "d4d3", "d4e3", "d4c4", "d4e4",
                "d4c5", "d4e5",
            ],
        );
    }

    #[test]
    #[rustfmt::skip]
    fn test_pinned_rooks_slide_along_the_pin() {
        lists_match("k1r5/2R2b2/4R3/8/1RK2Rq1/8/8/2R5 w - - 0 1", &[ "c1a1", "c1b1", "c1d1", "c1e1", "c1f1", "c1g1", "c1h1", "c1c2", "c1c3", "b4b1", "b4b2", "b4b3", "b4a4", "b4b5", "b4b6", "b4b7", "b4b8", "f4d4", "f4e4", "f4g4", "c7c5", "c7c6", "c7c8", "c4b3", "c4c3", "c4d3", "c4d4", "c4b5", "c4c5", "c4d5" ]);
    }

    #[test]
    #[rustfmt::skip]
    fn test_pinned_bishops_slide_along_the_pin() {
        lists_match("k1r5/2B2b2/4B3/8/1BK2Bq1/8/8/2B5 w - - 0 1", &[ "c1b2", "c1d2", "c1a3", "c1e3", "b4e1", "b4d2", "b4a3", "b4c3", "b4a5", "b4c5", "b4d6", "b4e7", "b4f8", "e6d5", "e6f7", "c4b3", "c4c3", "c4d3", "c4d4", "c4b5", "c4c5", "c4d5" ]);
    }
}

#[cfg(test)]
mod en_passant_tests {
    use super::*;

    #[test]
    fn test_en_passant_blocked_by_check() {
        lists_match(
            "k2r4/5n1b/6P1/2pP4/8/P2KP2q/2P5/8 w - c6 0 1",
            &["c2c3", "c2c4", "a3a4", "d5d6", "g6h7", "d3d2", "d3e2", "d3c3", "d3c4", "d3e4"],
        );
    }

    #[test]
    fn test_en_passant_along_a_diagonal_pin() {
        lists_match(
            "7k/r7/8/2pP4/8/8/5K2/8 w - c6 0 1",
            &["d5d6", "d5c6", "f2e1", "f2f1", "f2g1", "f2e2", "f2g2", "f2e3", "f2f3", "f2g3"],
        );
        lists_match(
            "7k/b7/8/2pP4/8/8/5K2/8 w - c6 0 1",
            &["d5d6", "f2e1", "f2f1", "f2g1", "f2e2", "f2g2", "f2e3", "f2f3", "f2g3"],
        );
    }

    #[test]
    fn test_en_passant_removing_two_pawns_from_a_rank() {
        lists_match(
            "7k/8/8/b1pP1K2/8/8/8/8 w - c6 0 1",
            &["d5d6", "d5c6", "f5e4", "f5f4", "f5g4", "f5e5", "f5g5", "f5e6", "f5f6", "f5g6"],
        );
        lists_match(
            "7k/8/8/r1pP1K2/8/8/8/8 w - c6 0 1",
            &["d5d6", "f5e4", "f5f4", "f5g4", "f5e5", "f5g5", "f5e6", "f5f6", "f5g6"],
        );
    }

    #[test]
    fn test_en_passant_for_black() {
        lists_match(
            "8/8/8/8/1pP5/8/8/K6k b - c3 0 1",
            &["b4c3", "b4b3", "h1g2", "h1h2", "h1g1"],
        );
    }
}

#[cfg(test)]
mod castling_tests {
    use super::*;

    const ROOK_MOVES: [&str; 19] = [
        "a1b1", "a1c1", "a1d1", "a1a2", "a1a3", "a1a4", "a1a5", "a1a6", "a1a7", "a1a8", "h1f1",
        "h1g1", "h1h2", "h1h3", "h1h4", "h1h5", "h1h6", "h1h7", "h1h8",
    ];

    fn with_rook_moves(king_moves: &[&'static str]) -> Vec<&'static str> {
        ROOK_MOVES.iter().chain(king_moves).copied().collect()
    }

    #[test]
    fn test_both_castles() {
        let legal = with_rook_moves(&["e1c1", "e1d1", "e1f1", "e1g1", "e1d2", "e1e2", "e1f2"]);
        lists_match("1k6/8/8/8/8/8/8/R3K2R w KQ - 0 1", &legal);
    }

    #[test]
    fn test_castles_need_rights() {
        let legal = with_rook_moves(&["e1d1", "e1f1", "e1g1", "e1d2", "e1e2", "e1f2"]);
        lists_match("1k6/8/8/8/8/8/8/R3K2R w K - 0 1", &legal);

        let legal = with_rook_moves(&["e1c1", "e1d1", "e1f1", "e1d2", "e1e2", "e1f2"]);
        lists_match("1k6/8/8/8/8/8/8/R3K2R w Q - 0 1", &legal);
    }

    #[test]
    fn test_castles_through_attacked_squares() {
        let legal = with_rook_moves(&["e1f1", "e1g1", "e1e2", "e1f2"]);
        lists_match("1k1r4/8/8/8/8/8/8/R3K2R w KQ - 0 1", &legal);

        let legal = with_rook_moves(&["e1c1", "e1d1", "e1d2", "e1e2"]);
        lists_match("1k3r2/8/8/8/8/8/8/R3K2R w KQ - 0 1", &legal);

        let legal = with_rook_moves(&["e1e2"]);
        lists_match("1k1r1r2/8/8/8/8/8/8/R3K2R w KQ - 0 1", &legal);
    }

    #[test]
    #[rustfmt::skip]
    fn test_castles_for_black() {
        lists_match("r3k2r/8/8/8/8/8/8/1K6 b kq - 0 1", &[ "e8d8", "e8f8", "e8d7", "e8e7", "e8f7", "a8b8", "a8c8", "a8d8", "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "h8f8", "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8c8", "e8g8" ]);
        lists_match("r3k2r/8/8/8/8/8/8/1K1R4 b kq - 0 1", &[ "e8f8", "e8e7", "e8f7", "a8b8", "a8c8", "a8d8", "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "h8f8", "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8g8" ]);
    }
}

#[test]
fn test_black_promotions() {
    lists_match(
        "4k3/8/8/8/8/8/1p6/4K3 b - - 0 1",
        &["b2b1q", "b2b1r", "b2b1b", "b2b1n", "e8d8", "e8f8", "e8d7", "e8e7", "e8f7"],
    );
}
