//! Pseudo-legal move generation, one generator per piece type.
//!
//! Everything here obeys movement geometry and the rule that a piece never
//! lands on a piece of its own color. Whether the move exposes the mover's
//! king is decided later by `Game`.

use std::collections::HashSet;

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const STRAIGHTS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Pseudo-legal moves for `piece` standing on `at`.
pub fn piece_moves(board: &Board, at: Square, piece: Piece) -> HashSet<Move> {
    let mut moves = HashSet::new();
    let color = piece.color;
    match piece.piece_type {
        PieceType::Pawn => generate_pawn_moves(board, at, color, &mut moves),
        PieceType::Knight => generate_step_moves(board, at, color, &KNIGHT_OFFSETS, &mut moves),
        PieceType::Bishop => generate_sliding_moves(board, at, color, &DIAGONALS, &mut moves),
        PieceType::Rook => generate_sliding_moves(board, at, color, &STRAIGHTS, &mut moves),
        PieceType::Queen => {
            generate_sliding_moves(board, at, color, &DIAGONALS, &mut moves);
            generate_sliding_moves(board, at, color, &STRAIGHTS, &mut moves);
        }
        PieceType::King => generate_step_moves(board, at, color, &KING_OFFSETS, &mut moves),
    }
    moves
}

fn is_enemy(board: &Board, sq: Square, color: Color) -> bool {
    board.get_piece(sq).map(|p| p.color != color).unwrap_or(false)
}

fn is_own(board: &Board, sq: Square, color: Color) -> bool {
    board.get_piece(sq).map(|p| p.color == color).unwrap_or(false)
}

/// Push a pawn move, expanding it into one move per promotion kind when it
/// lands on the promotion row.
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut HashSet<Move>) {
    if to.row == color.promotion_row() {
        for pt in PieceType::PROMOTIONS {
            moves.insert(Move::new(from, to, Some(pt)));
        }
    } else {
        moves.insert(Move::new(from, to, None));
    }
}

fn generate_pawn_moves(board: &Board, at: Square, color: Color, moves: &mut HashSet<Move>) {
    let dir = color.forward();

    // Only reachable through add_piece: a pawn placed on its own promotion
    // row. The old board code indexed past the edge and faulted here; this
    // generator yields no moves instead.
    let Some(one_ahead) = at.offset(dir, 0) else {
        return;
    };

    // Single push, and the double push from the starting row
    if board.get_piece(one_ahead).is_none() {
        push_pawn_move(at, one_ahead, color, moves);

        if at.row == color.pawn_row() {
            if let Some(two_ahead) = at.offset(2 * dir, 0) {
                if board.get_piece(two_ahead).is_none() {
                    moves.insert(Move::new(at, two_ahead, None));
                }
            }
        }
    }

    // Diagonal captures
    for dc in [-1, 1] {
        if let Some(target) = at.offset(dir, dc) {
            if is_enemy(board, target, color) {
                push_pawn_move(at, target, color, moves);
            }
        }
    }
}

/// Knight and king: a fixed set of single hops.
fn generate_step_moves(
    board: &Board,
    at: Square,
    color: Color,
    offsets: &[(i32, i32)],
    moves: &mut HashSet<Move>,
) {
    for &(dr, dc) in offsets {
        let Some(target) = at.offset(dr, dc) else {
            continue;
        };
        if is_own(board, target, color) {
            continue;
        }
        moves.insert(Move::new(at, target, None));
    }
}

/// Walk each ray outward until it leaves the board or hits a piece. An enemy
/// piece ends the ray and is capturable, an own piece just ends it.
fn generate_sliding_moves(
    board: &Board,
    at: Square,
    color: Color,
    directions: &[(i32, i32)],
    moves: &mut HashSet<Move>,
) {
    for &(dr, dc) in directions {
        let mut cursor = at;
        while let Some(target) = cursor.offset(dr, dc) {
            match board.get_piece(target) {
                None => {
                    moves.insert(Move::new(at, target, None));
                }
                Some(p) => {
                    if p.color != color {
                        moves.insert(Move::new(at, target, None));
                    }
                    break;
                }
            }
            cursor = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: i32, col: i32) -> Square {
        Square::new(row, col)
    }

    fn board_with(pieces: &[(Square, PieceType, Color)]) -> Board {
        let mut board = Board::empty();
        for &(at, pt, color) in pieces {
            board.add_piece(at, Piece::new(pt, color));
        }
        board
    }

    fn targets(moves: &HashSet<Move>) -> Vec<Square> {
        let mut to: Vec<Square> = moves.iter().map(|m| m.to).collect();
        to.sort();
        to.dedup();
        to
    }

    fn moves_at(board: &Board, at: Square) -> HashSet<Move> {
        let piece = board.get_piece(at).expect("square should be occupied");
        piece_moves(board, at, piece)
    }

    #[test]
    fn knight_in_corner_has_two_moves() {
        let board = board_with(&[(sq(1, 1), PieceType::Knight, Color::White)]);
        let moves = moves_at(&board, sq(1, 1));
        assert_eq!(moves.len(), 2);
        assert_eq!(targets(&moves), vec![sq(2, 3), sq(3, 2)]);
    }

    #[test]
    fn knight_jumps_over_pieces_but_not_onto_own() {
        let board = board_with(&[
            (sq(4, 4), PieceType::Knight, Color::White),
            (sq(4, 5), PieceType::Pawn, Color::White),
            (sq(5, 4), PieceType::Pawn, Color::White),
            (sq(6, 5), PieceType::Pawn, Color::White),
            (sq(2, 3), PieceType::Rook, Color::Black),
        ]);
        let moves = moves_at(&board, sq(4, 4));
        assert_eq!(moves.len(), 7);
        assert!(!moves.iter().any(|m| m.to == sq(6, 5)));
        assert!(moves.contains(&Move::new(sq(4, 4), sq(2, 3), None)));
    }

    #[test]
    fn rook_ray_stops_at_first_piece() {
        let board = board_with(&[
            (sq(1, 1), PieceType::Rook, Color::White),
            (sq(4, 1), PieceType::Pawn, Color::Black),
            (sq(1, 3), PieceType::Knight, Color::White),
        ]);
        let moves = moves_at(&board, sq(1, 1));
        // up: (2,1) (3,1) capture (4,1); right: (1,2) then blocked by own knight
        assert_eq!(targets(&moves), vec![sq(1, 2), sq(2, 1), sq(3, 1), sq(4, 1)]);
    }

    #[test]
    fn bishop_on_empty_board_covers_both_diagonals() {
        let board = board_with(&[(sq(4, 4), PieceType::Bishop, Color::Black)]);
        assert_eq!(moves_at(&board, sq(4, 4)).len(), 13);
    }

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let board = board_with(&[
            (sq(4, 4), PieceType::Queen, Color::White),
            (sq(6, 6), PieceType::Pawn, Color::Black),
            (sq(4, 7), PieceType::Pawn, Color::White),
        ]);
        let queen = moves_at(&board, sq(4, 4));

        let mut as_rook = board.clone();
        as_rook.add_piece(sq(4, 4), Piece::new(PieceType::Rook, Color::White));
        let mut as_bishop = board.clone();
        as_bishop.add_piece(sq(4, 4), Piece::new(PieceType::Bishop, Color::White));

        let union: HashSet<Move> = moves_at(&as_rook, sq(4, 4))
            .union(&moves_at(&as_bishop, sq(4, 4)))
            .copied()
            .collect();
        assert_eq!(queen, union);
    }

    #[test]
    fn king_steps_one_square_and_never_castles() {
        let board = board_with(&[
            (sq(1, 5), PieceType::King, Color::White),
            (sq(1, 8), PieceType::Rook, Color::White),
            (sq(1, 1), PieceType::Rook, Color::White),
            (sq(2, 5), PieceType::Pawn, Color::White),
        ]);
        let moves = moves_at(&board, sq(1, 5));
        assert_eq!(targets(&moves), vec![sq(1, 4), sq(1, 6), sq(2, 4), sq(2, 6)]);
    }

    #[test]
    fn pawn_single_and_double_push_from_home_row() {
        let board = board_with(&[(sq(2, 5), PieceType::Pawn, Color::White)]);
        assert_eq!(targets(&moves_at(&board, sq(2, 5))), vec![sq(3, 5), sq(4, 5)]);

        let board = board_with(&[(sq(7, 4), PieceType::Pawn, Color::Black)]);
        assert_eq!(targets(&moves_at(&board, sq(7, 4))), vec![sq(5, 4), sq(6, 4)]);
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let blocked_near = board_with(&[
            (sq(2, 5), PieceType::Pawn, Color::White),
            (sq(3, 5), PieceType::Knight, Color::Black),
        ]);
        assert!(moves_at(&blocked_near, sq(2, 5)).is_empty());

        let blocked_far = board_with(&[
            (sq(2, 5), PieceType::Pawn, Color::White),
            (sq(4, 5), PieceType::Knight, Color::Black),
        ]);
        assert_eq!(targets(&moves_at(&blocked_far, sq(2, 5))), vec![sq(3, 5)]);
    }

    #[test]
    fn pawn_off_home_row_only_steps_once() {
        let board = board_with(&[(sq(3, 5), PieceType::Pawn, Color::White)]);
        assert_eq!(targets(&moves_at(&board, sq(3, 5))), vec![sq(4, 5)]);
    }

    #[test]
    fn pawn_captures_diagonally_only_enemies() {
        let board = board_with(&[
            (sq(4, 4), PieceType::Pawn, Color::White),
            (sq(5, 3), PieceType::Bishop, Color::Black),
            (sq(5, 5), PieceType::Bishop, Color::White),
            (sq(5, 4), PieceType::Rook, Color::Black),
        ]);
        let moves = moves_at(&board, sq(4, 4));
        assert_eq!(moves.len(), 1);
        assert!(moves.contains(&Move::new(sq(4, 4), sq(5, 3), None)));
    }

    #[test]
    fn pawn_reaching_far_row_emits_four_promotions() {
        let board = board_with(&[
            (sq(2, 2), PieceType::Pawn, Color::Black),
            (sq(1, 1), PieceType::Knight, Color::White),
        ]);
        let moves = moves_at(&board, sq(2, 2));
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.promotion.is_some()));
        for pt in PieceType::PROMOTIONS {
            assert!(moves.contains(&Move::new(sq(2, 2), sq(1, 2), Some(pt))));
            assert!(moves.contains(&Move::new(sq(2, 2), sq(1, 1), Some(pt))));
        }
    }

    #[test]
    fn pawn_on_far_row_has_no_moves() {
        let board = board_with(&[(sq(8, 3), PieceType::Pawn, Color::White)]);
        assert!(moves_at(&board, sq(8, 3)).is_empty());
    }

    #[test]
    fn no_piece_but_a_pawn_lands_on_its_own_side() {
        let board = Board::new();
        for at in Square::all() {
            let Some(piece) = board.get_piece(at) else {
                continue;
            };
            for mv in piece_moves(&board, at, piece) {
                assert!(
                    !is_own(&board, mv.to, piece.color),
                    "{piece:?} on {at} may not land on {}",
                    mv.to
                );
            }
        }
    }
}
