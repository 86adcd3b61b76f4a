//! Search and board properties
//!
//! Cross-checks the alpha-beta search against an unpruned reference minimax
//! and verifies the scoring and tie-break rules on concrete positions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use tic_tac_toe_minimax::board::{Board, DRAW_SCORE, LOSS_SCORE, WIN_SCORE};
use tic_tac_toe_minimax::search::{SearchLimits, Searcher};
use tic_tac_toe_minimax::types::{GameOutcome, Player, Position, PruningMode, TerminalState};

fn searcher(max_depth: u8) -> Searcher {
    let limits = SearchLimits {
        max_depth,
        timeout: Duration::from_secs(120),
    };
    Searcher::new(limits, PruningMode::Sequential, 2)
}

/// Plain minimax without pruning or deadline, same leaf rules as the engine
fn plain_minimax(board: &mut Board, depth: u8, max_depth: u8, maximizing: bool) -> i32 {
    let score = board.evaluate();
    if score != DRAW_SCORE || board.is_full() {
        return score;
    }
    if depth >= max_depth {
        return DRAW_SCORE;
    }

    let mover = if maximizing {
        Player::Computer
    } else {
        Player::Human
    };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for pos in board.empty_positions() {
        let score = {
            let mut placed = board.speculate(pos, mover);
            plain_minimax(&mut placed, depth + 1, max_depth, !maximizing)
        };
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

fn plain_root(board: &mut Board, max_depth: u8) -> (Option<Position>, i32) {
    let mut best_move = None;
    let mut best_score = i32::MIN;
    for pos in board.empty_positions() {
        let score = {
            let mut placed = board.speculate(pos, Player::Computer);
            plain_minimax(&mut placed, 0, max_depth, false)
        };
        if score > best_score {
            best_score = score;
            best_move = Some(pos);
        }
    }
    (best_move, best_score)
}

/// Full board with no complete line for any N >= 3
fn drawn_board(n: usize) -> Board {
    let rows: Vec<String> = (0..n)
        .map(|r| {
            (0..n)
                .map(|c| if (2 * r + c) % 4 < 2 { 'X' } else { 'O' })
                .collect()
        })
        .collect();
    let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
    Board::from_rows(&refs).unwrap()
}

#[test]
fn test_evaluate_agrees_with_winner_checks_on_random_playouts() {
    let mut rng = StdRng::seed_from_u64(7);

    for n in 3..=10 {
        for _ in 0..25 {
            let mut board = Board::new(n);
            let mut player = Player::Human;

            loop {
                let human = board.is_winner(Player::Human);
                let computer = board.is_winner(Player::Computer);
                assert!(!(human && computer), "both players won on\n{}", board);

                let expected = if computer {
                    WIN_SCORE
                } else if human {
                    LOSS_SCORE
                } else {
                    DRAW_SCORE
                };
                assert_eq!(board.evaluate(), expected);

                if human || computer || board.is_full() {
                    break;
                }

                let empty = board.empty_positions();
                let pos = empty[rng.random_range(0..empty.len())];
                assert!(board.place(pos.row, pos.col, player));
                player = match player {
                    Player::Human => Player::Computer,
                    Player::Computer => Player::Human,
                };
            }
        }
    }
}

#[test]
fn test_every_line_kind_wins_on_every_size() {
    for n in 3..=10 {
        let mut row = Board::new(n);
        let mut col = Board::new(n);
        let mut diag = Board::new(n);
        let mut anti = Board::new(n);
        for i in 0..n {
            row.place(n - 1, i, Player::Computer);
            col.place(i, 0, Player::Human);
            diag.place(i, i, Player::Computer);
            anti.place(i, n - 1 - i, Player::Human);
        }
        assert_eq!(row.evaluate(), WIN_SCORE);
        assert_eq!(col.evaluate(), LOSS_SCORE);
        assert_eq!(diag.evaluate(), WIN_SCORE);
        assert_eq!(anti.evaluate(), LOSS_SCORE);
    }
}

#[test]
fn test_full_board_without_line_is_a_draw_on_every_size() {
    for n in 3..=10 {
        let board = drawn_board(n);
        assert!(board.is_full());
        assert!(!board.is_winner(Player::Human));
        assert!(!board.is_winner(Player::Computer));

        let terminal = TerminalState {
            winner: None,
            draw: board.is_full(),
        };
        assert_eq!(terminal.outcome(), Some(GameOutcome::Draw));
        assert_eq!(GameOutcome::Draw.code(), 2);
    }
}

#[test]
fn test_placement_on_occupied_cell_never_mutates() {
    let mut board = drawn_board(5);
    let before = board.clone();
    for pos in (0..5).flat_map(|r| (0..5).map(move |c| Position::new(r, c))) {
        assert!(!board.place(pos.row, pos.col, Player::Human));
        assert!(!board.place(pos.row, pos.col, Player::Computer));
    }
    assert_eq!(board, before);
}

#[test]
fn test_empty_three_by_three_picks_top_left() {
    let mut board = Board::new(3);
    let outcome = searcher(9).get_best_move(&mut board);
    assert_eq!(outcome.best_move, Some(Position::new(0, 0)));
    assert_eq!(outcome.best_score, DRAW_SCORE);
    assert!(outcome.candidates.iter().all(|c| c.score == DRAW_SCORE));
}

#[test]
fn test_center_opening_is_answered_with_a_corner() {
    let mut board = Board::new(3);
    board.place(1, 1, Player::Human);

    let outcome = searcher(9).get_best_move(&mut board);
    assert_eq!(outcome.best_move, Some(Position::new(0, 0)));
    assert_eq!(outcome.best_score, DRAW_SCORE);

    for candidate in &outcome.candidates {
        let p = candidate.position;
        let corner = (p.row == 0 || p.row == 2) && (p.col == 0 || p.col == 2);
        let expected = if corner { DRAW_SCORE } else { LOSS_SCORE };
        assert_eq!(candidate.score, expected, "candidate {}", p);
    }
}

#[test]
fn test_alpha_beta_matches_plain_minimax_on_three_by_three() {
    let positions = [
        vec!["...", "...", "..."],
        vec!["X..", "...", "..."],
        vec!["X..", ".O.", "..X"],
        vec!["XO.", ".X.", "..."],
        vec![".X.", "XO.", "..."],
    ];
    for rows in positions.iter() {
        for depth in 0..=4 {
            let mut board = Board::from_rows(rows).unwrap();
            let expected = plain_root(&mut board.clone(), depth);
            let outcome = searcher(depth).get_best_move(&mut board);
            assert_eq!(
                (outcome.best_move, outcome.best_score),
                expected,
                "depth {} on {:?}",
                depth,
                rows
            );
        }
    }
}

#[test]
fn test_alpha_beta_matches_plain_minimax_on_four_by_four() {
    let positions = [
        vec!["....", "....", "....", "...."],
        vec!["XXX.", "OO..", "....", "...."],
        vec!["X..O", ".XO.", "..X.", "O..."],
    ];
    for rows in positions.iter() {
        for depth in 1..=4 {
            let mut board = Board::from_rows(rows).unwrap();
            let expected = plain_root(&mut board.clone(), depth);
            let outcome = searcher(depth).get_best_move(&mut board);
            assert_eq!(
                (outcome.best_move, outcome.best_score),
                expected,
                "depth {} on {:?}",
                depth,
                rows
            );
        }
    }
}

#[test]
fn test_alpha_beta_matches_plain_minimax_on_five_by_five() {
    let rows = ["XO.X.", ".XO..", "O.X..", ".O.XO", "X.XO."];
    for depth in 1..=4 {
        let mut board = Board::from_rows(&rows).unwrap();
        let expected = plain_root(&mut board.clone(), depth);
        let outcome = searcher(depth).get_best_move(&mut board);
        assert_eq!(
            (outcome.best_move, outcome.best_score),
            expected,
            "depth {}",
            depth
        );
    }
}

#[test]
fn test_near_zero_budget_still_returns_an_empty_cell() {
    for n in 3..=10 {
        let limits = SearchLimits {
            max_depth: 9,
            timeout: Duration::from_nanos(1),
        };
        let mut board = Board::new(n);
        board.place(0, 0, Player::Human);
        board.place(n - 1, n - 1, Player::Computer);

        for mode in [PruningMode::Sequential, PruningMode::Parallel].iter() {
            let outcome = Searcher::new(limits, *mode, 1).get_best_move(&mut board);
            let best = outcome.best_move.expect("move while cells remain");
            assert!(board.is_empty_at(best), "{} is occupied", best);
        }
    }
}

#[test]
fn test_single_empty_cell_is_chosen() {
    let mut board = Board::from_rows(&["XOX", "XOO", "OX."]).unwrap();
    let outcome = searcher(9).get_best_move(&mut board);
    assert_eq!(outcome.best_move, Some(Position::new(2, 2)));
    assert_eq!(outcome.candidates.len(), 1);
}
