use crate::board::{Color, Piece};
use crate::coords::{apply_orientation, pixel_to_board_cell, row_col_to_square};
use crate::engine::Engine;
use crate::moves::Move;
use crate::notation;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Piece placement by square index, handed to the view on every repaint.
pub type BoardSnapshot = [Option<Piece>; 64];

/// The rendering surface. Implementations draw; they never mutate game state.
pub trait BoardView {
    fn draw_board(&self, board: &BoardSnapshot);
    /// Redraw with the selected square and its reachable squares marked.
    fn highlight_moves(&self, board: &BoardSnapshot, selected: u8, targets: &[u8]);
    /// Show the promotion picker on screen row 0, columns 2-5.
    fn show_promotion_choices(&self, color: Color);
    fn append_move(&self, color: Color, notation: &str);
    fn announce(&self, text: &str);
}

/// The yield point between committing the human's move and starting the
/// blocking opponent search: `resume` must not run until the surface has
/// completed a full paint of the state committed before the call. This is a
/// paint-cycle contract, never a timed delay. Implementations must defer
/// `resume` past the current call stack.
pub trait FrameScheduler {
    fn after_paint(&self, resume: Box<dyn FnOnce()>);
}

/// What the user currently has selected. Owned exclusively by the session and
/// reset to `Idle` by every resolving click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selected { piece: Piece, row: u8, col: u8 },
    /// A validated promotion move, carrying a queen-promotion kind as the
    /// placeholder until the user picks a piece.
    AwaitingPromotion { pending: Move },
}

/// One game of human vs. engine: routes clicks through the selection state
/// machine, commits validated moves, and sequences the paint/compute handoff
/// before every engine reply.
pub struct Session {
    engine: Box<dyn Engine>,
    view: Rc<dyn BoardView>,
    scheduler: Rc<dyn FrameScheduler>,
    human_color: Color,
    state: SelectionState,
    user_turn: bool,
    game_over: bool,
    stopped: bool,
    self_weak: Weak<RefCell<Session>>,
}

impl Session {
    pub fn new(
        engine: Box<dyn Engine>,
        view: Rc<dyn BoardView>,
        scheduler: Rc<dyn FrameScheduler>,
        human_color: Color,
    ) -> Rc<RefCell<Session>> {
        Rc::new_cyclic(|me| {
            RefCell::new(Session {
                engine,
                view,
                scheduler,
                human_color,
                state: SelectionState::Idle,
                user_turn: false,
                game_over: false,
                stopped: false,
                self_weak: me.clone(),
            })
        })
    }

    /// Begins the game. When the position gives the engine the first move,
    /// its (blocking) reply is computed before the human's clicks count.
    pub fn start(&mut self) {
        if self.engine.side_to_move() == self.human_color {
            self.engine.rebuild_move_set();
            self.user_turn = true;
        } else {
            self.opponent_turn();
        }
    }

    /// Stops routing input. A yield-then-compute continuation that is already
    /// scheduled is not cancelled; it fizzles through its weak session handle.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.user_turn = false;
    }

    pub fn draw(&self) {
        self.view.draw_board(&self.snapshot());
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_user_turn(&self) -> bool {
        self.user_turn
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn piece_on(&self, square: u8) -> Option<Piece> {
        self.engine.piece_on(square)
    }

    /// Handles one click at surface-local pixel coordinates.
    pub fn handle_click(&mut self, x: f32, y: f32) {
        if self.stopped || self.game_over || !self.user_turn {
            return;
        }
        let Some((view_row, view_col)) = pixel_to_board_cell(x, y) else {
            return;
        };

        // the promotion picker lives in screen coordinates, row 0 cols 2-5
        if let SelectionState::AwaitingPromotion { pending } = self.state {
            self.state = SelectionState::Idle;
            if view_row == 0 && (2..=5).contains(&view_col) {
                self.execute_user_move(pending.with_promotion_choice(view_col));
            } else {
                self.draw();
            }
            return;
        }

        let (row, col) = apply_orientation(view_row, view_col, self.human_color);
        let square = row_col_to_square(row, col);
        let clicked = self.engine.piece_on(square);
        let is_own_piece = clicked.map_or(false, |piece| piece.color == self.human_color);

        match self.state {
            SelectionState::Idle => {
                if let Some(piece) = clicked {
                    if is_own_piece {
                        self.select(piece, row, col);
                    }
                }
            }
            SelectionState::Selected {
                row: selected_row,
                col: selected_col,
                ..
            } => {
                let from = row_col_to_square(selected_row, selected_col);
                let kind = self.engine.classify(from, square);

                if is_own_piece {
                    // castling is gestured as king first, own rook second
                    if kind.is_castle() {
                        if let Some(mv) = self.engine.validate(selected_row, selected_col, row, col, kind) {
                            self.state = SelectionState::Idle;
                            self.execute_user_move(mv);
                            return;
                        }
                    }
                    self.select(clicked.unwrap(), row, col);
                } else {
                    let validated = self.engine.validate(selected_row, selected_col, row, col, kind);
                    self.state = SelectionState::Idle;
                    match validated {
                        Some(mv) if mv.kind().is_queen_promotion() => {
                            self.state = SelectionState::AwaitingPromotion { pending: mv };
                            self.view.show_promotion_choices(self.human_color);
                        }
                        Some(mv) => self.execute_user_move(mv),
                        None => self.draw(),
                    }
                }
            }
            SelectionState::AwaitingPromotion { .. } => unreachable!("handled above"),
        }
    }

    fn select(&mut self, piece: Piece, row: u8, col: u8) {
        let square = row_col_to_square(row, col);
        let targets: Vec<u8> = self
            .engine
            .moves_from(square)
            .iter()
            .map(|mv| mv.to_square())
            .collect();
        self.state = SelectionState::Selected { piece, row, col };
        self.view.highlight_moves(&self.snapshot(), square, &targets);
    }

    /// Commits a validated human move, then yields to the paint cycle before
    /// kicking off the blocking opponent search.
    fn execute_user_move(&mut self, mv: Move) {
        let text = notation::render(mv, |square| self.engine.piece_on(square));
        self.engine.commit(mv);
        self.draw();
        self.view.append_move(self.human_color, &text);

        if self.check_game_over() {
            return;
        }

        self.user_turn = false;
        let session = self.self_weak.clone();
        self.scheduler.after_paint(Box::new(move || {
            // a continuation from a superseded session upgrades to None
            if let Some(session) = session.upgrade() {
                session.borrow_mut().opponent_turn();
            }
        }));
    }

    fn opponent_turn(&mut self) {
        if self.stopped || self.game_over {
            return;
        }
        if let Some(mv) = self.engine.best_reply() {
            let text = notation::render(mv, |square| self.engine.piece_on(square));
            self.engine.commit(mv);
            self.draw();
            self.view.append_move(self.human_color.opposite(), &text);
        }
        self.engine.rebuild_move_set();
        if self.check_game_over() {
            return;
        }
        self.user_turn = true;
    }

    fn check_game_over(&mut self) -> bool {
        if let Some(outcome) = self.engine.outcome() {
            self.game_over = true;
            self.user_turn = false;
            self.view.announce(&outcome.describe());
            true
        } else {
            false
        }
    }

    fn snapshot(&self) -> BoardSnapshot {
        let mut board = [None; 64];
        for (square, slot) in board.iter_mut().enumerate() {
            *slot = self.engine.piece_on(square as u8);
        }
        board
    }
}
