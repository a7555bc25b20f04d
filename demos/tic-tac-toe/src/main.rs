use arbiter::prelude::*;

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell { Empty, X, O }

#[derive(Clone, Copy, PartialEq, Eq)]
enum Outcome { XWins, OWins, Draw }

/// Squares are chess-style: file a-c, rank 1-3. "a1" is bottom-left.
/// X is the room creator and moves first.
struct TicTacToe {
    board: [[Cell; 3]; 3], // board[rank][file]
    moves: Vec<String>,
    outcome: Option<Outcome>,
}

fn parse_square(mv: &str) -> Option<(usize, usize)> {
    let mut chars = mv.chars();
    let file = match chars.next()? { 'a' => 0, 'b' => 1, 'c' => 2, _ => return None };
    let rank = match chars.next()? { '1' => 0, '2' => 1, '3' => 2, _ => return None };
    if chars.next().is_some() { return None; }
    Some((rank, file))
}

fn wins(b: &[[Cell; 3]; 3], m: Cell) -> bool {
    let rank = (0..3).any(|r| (0..3).all(|f| b[r][f] == m));
    let file = (0..3).any(|f| (0..3).all(|r| b[r][f] == m));
    let diag =
        (0..3).all(|i| b[i][i] == m) || (0..3).all(|i| b[i][2 - i] == m);
    rank || file || diag
}

// ---------------------------------------------------------------------------
// Rules engine
// ---------------------------------------------------------------------------

impl RulesEngine for TicTacToe {
    fn new_game() -> Self {
        Self {
            board: [[Cell::Empty; 3]; 3],
            moves: Vec::new(),
            outcome: None,
        }
    }

    fn apply_move(&mut self, mv: &str) -> Result<(), MoveRejected> {
        if self.outcome.is_some() {
            return Err(MoveRejected::new("game is over"));
        }
        let (rank, file) = parse_square(mv)
            .ok_or_else(|| MoveRejected::new(format!("bad square: {mv}")))?;
        if self.board[rank][file] != Cell::Empty {
            return Err(MoveRejected::new(format!("square occupied: {mv}")));
        }

        let mark = if self.moves.len() % 2 == 0 { Cell::X } else { Cell::O };
        self.board[rank][file] = mark;
        self.moves.push(mv.to_string());

        if wins(&self.board, mark) {
            self.outcome = Some(if mark == Cell::X { Outcome::XWins } else { Outcome::OWins });
        } else if self.board.iter().flatten().all(|c| *c != Cell::Empty) {
            self.outcome = Some(Outcome::Draw);
        }
        Ok(())
    }

    fn turn_owner(&self) -> Seat {
        if self.moves.len() % 2 == 0 { Seat::First } else { Seat::Second }
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// FEN-flavored: ranks top (3) to bottom (1) joined by `/`, with a
    /// result tag once the game is decided. E.g. `.../.O./X.X X wins`.
    fn position(&self) -> String {
        let board = self
            .board
            .iter()
            .rev()
            .map(|rank| {
                rank.iter()
                    .map(|c| match c {
                        Cell::Empty => '.',
                        Cell::X => 'X',
                        Cell::O => 'O',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/");
        match self.outcome {
            Some(Outcome::XWins) => format!("{board} X wins"),
            Some(Outcome::OWins) => format!("{board} O wins"),
            Some(Outcome::Draw) => format!("{board} draw"),
            None => board,
        }
    }

    fn record(&self) -> String {
        self.moves.join(" ")
    }

    fn history(&self) -> Vec<String> {
        self.moves.clone()
    }
}

// ---------------------------------------------------------------------------
// Entrypoint
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    arbiter::init_tracing();
    tracing::info!("starting tic-tac-toe server on 0.0.0.0:8080");

    let server = ArbiterServerBuilder::new()
        .bind("0.0.0.0:8080")
        .build::<TicTacToe, _>(MemoryStore::new())
        .await?;

    server.run().await?;
    Ok(())
}
