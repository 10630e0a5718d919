//! Opening-book support with TSV import compatible with public opening datasets.
//!
//! Every line in the TSV is replayed from the start position. Each prefix of
//! a line becomes a key (the space-separated long algebraic history) mapping
//! to the candidate moves that continue it. An entry also remembers the board
//! hash it was built on, so a position that merely shares an empty or short
//! history with a book line (say, one imported from FEN) is never answered
//! from the book.

use std::collections::HashMap;
use std::sync::OnceLock;

use rand::Rng;
use tracing::warn;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};

/// The book is only consulted while fewer plies than this have been played.
pub const BOOK_PLY_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMove {
    pub lan: String,
    pub weight: u32,
}

#[derive(Debug, Clone)]
struct BookEntry {
    board_key: u64,
    moves: Vec<BookMove>,
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_history: HashMap<String, BookEntry>,
}

static DEFAULT_BOOK: OnceLock<OpeningBook> = OnceLock::new();

/// The embedded opening book, built on first use.
pub fn default_book() -> &'static OpeningBook {
    DEFAULT_BOOK.get_or_init(|| {
        OpeningBook::from_tsv_str(include_str!("data/opening_lines.tsv")).unwrap_or_else(|err| {
            warn!(%err, "embedded opening book failed to build, continuing without it");
            OpeningBook::default()
        })
    })
}

fn invalid_line(line: &str, reason: impl ToString) -> ChessError {
    ChessError::InvalidBookLine {
        line: line.to_owned(),
        reason: reason.to_string(),
    }
}

impl OpeningBook {
    /// Build a book from TSV text with a header row.
    ///
    /// The move sequence is read from a `uci` or `moves` column. An optional
    /// `weight`/`count`/`plays` column weights each line (default 1); a
    /// candidate's weight is the sum over every line passing through it.
    pub fn from_tsv_str(tsv: &str) -> ChessResult<Self> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| invalid_line("", "opening TSV is empty"))?;
        let columns: Vec<&str> = header.split('\t').collect();

        let mut uci_idx = None;
        let mut moves_idx = None;
        let mut weight_idx = None;

        for (i, name) in columns.iter().enumerate() {
            let lc = name.trim().to_ascii_lowercase();
            if lc == "uci" {
                uci_idx = Some(i);
            } else if lc == "moves" {
                moves_idx = Some(i);
            } else if lc == "weight" || lc == "count" || lc == "plays" {
                weight_idx = Some(i);
            }
        }

        let sequence_idx = uci_idx
            .or(moves_idx)
            .ok_or_else(|| invalid_line(header, "header needs a 'uci' or 'moves' column"))?;

        let mut building: HashMap<String, (u64, HashMap<String, u32>)> = HashMap::new();

        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let sequence = fields
                .get(sequence_idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| invalid_line(line, "missing move sequence"))?;

            let row_weight = weight_idx
                .and_then(|idx| fields.get(idx).copied())
                .and_then(|w| w.trim().parse::<u32>().ok())
                .unwrap_or(1)
                .max(1);

            let mut position = Position::new_game();
            for token in sequence.split_whitespace() {
                let mv = long_algebraic_to_move(token, &position.board)
                    .map_err(|err| invalid_line(line, format!("move '{token}': {err}")))?;
                if position.board.color_at(mv.from) != Some(position.side_to_move) {
                    return Err(invalid_line(line, format!("move '{token}' is out of turn")));
                }

                let key = position.history_key();
                let board_key = compute_zobrist_key(&position.board, position.side_to_move);
                let lan = move_to_long_algebraic(&mv)?;
                let (_, weights) = building
                    .entry(key)
                    .or_insert_with(|| (board_key, HashMap::new()));
                let weight = weights.entry(lan).or_insert(0);
                *weight = weight.saturating_add(row_weight);

                position = position.apply_engine_move(&mv);
            }
        }

        let by_history = building
            .into_iter()
            .map(|(key, (board_key, weights))| {
                let mut moves: Vec<BookMove> = weights
                    .into_iter()
                    .map(|(lan, weight)| BookMove { lan, weight })
                    .collect();
                moves.sort_by(|a, b| a.lan.cmp(&b.lan));
                (key, BookEntry { board_key, moves })
            })
            .collect();

        Ok(Self { by_history })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_history.is_empty()
    }

    /// Candidates for `position`, or `None` when the book has no entry for
    /// its history or the board does not match the book line.
    pub fn moves_for(&self, position: &Position) -> Option<&[BookMove]> {
        let entry = self.by_history.get(&position.history_key())?;
        let board_key = compute_zobrist_key(&position.board, position.side_to_move);
        (entry.board_key == board_key).then_some(entry.moves.as_slice())
    }

    /// Pick a candidate with probability proportional to its weight.
    pub fn choose_move<R: Rng + ?Sized>(&self, position: &Position, rng: &mut R) -> Option<Move> {
        if position.move_history.len() >= BOOK_PLY_LIMIT || position.result.is_over() {
            return None;
        }
        let moves = self.moves_for(position)?;

        let total_weight: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
        if total_weight == 0 {
            return None;
        }

        let mut pick = rng.random_range(0..total_weight);
        let chosen = moves
            .iter()
            .find(|m| {
                let w = u64::from(m.weight);
                if pick < w {
                    true
                } else {
                    pick -= w;
                    false
                }
            })
            .unwrap_or(&moves[0]);

        long_algebraic_to_move(&chosen.lan, &position.board).ok()
    }
}
