use quadboard::{perft, PositionStack, Square, FEN_KIWIPETE, FEN_STARTPOS, MAX_PLY};
use rand::{seq::SliceRandom, thread_rng};

/// Plays random legal games from `fen`, checking the position invariants at every ply.
fn random_walks(fen: &str, games: usize) {
    let mut rng = thread_rng();

    for _ in 0..games {
        let mut stack = PositionStack::from_fen(fen).unwrap();

        while stack.ply() + 1 < MAX_PLY {
            let position = *stack.current();
            assert!(position.is_consistent(), "Inconsistent position:\n{position:?}");
            assert_eq!(position.flipped().flipped(), position);

            // Flipping changes the perspective, never the board
            let flipped = position.flipped();
            for square in Square::iter() {
                assert_eq!(flipped.piece_at(square), position.piece_at(square));
            }

            // The FEN survives a round trip
            let fen = position.to_fen();
            assert_eq!(PositionStack::from_fen(&fen).unwrap().current(), &position);

            let moves = position.legal_moves();
            assert_eq!(perft(&mut stack, 1), moves.len() as u64, "{fen}");

            let Some(&mv) = moves.choose(&mut rng) else {
                break;
            };

            stack.make_move(mv);
            stack.unmake_move();
            assert_eq!(stack.current(), &position, "{mv:?} was not undone in {fen}");

            stack.make_move(mv);
        }
    }
}

#[test]
fn random_walks_from_startpos() {
    random_walks(FEN_STARTPOS, 200);
}

#[test]
fn random_walks_from_kiwipete() {
    random_walks(FEN_KIWIPETE, 200);
}

#[test]
fn random_walks_from_promotion_race() {
    random_walks("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 200);
}
