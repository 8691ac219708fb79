use crate::board::{Color, Piece, PieceType};
use crate::coords::apply_orientation;
use crate::engine::GameEngine;
use crate::session::{BoardSnapshot, BoardView, FrameScheduler, Session};
use crate::{AppWindow, Field};
use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn piece_glyph(piece: Piece) -> &'static str {
    match (piece.color, piece.kind) {
        (Color::White, PieceType::Pawn) => "♙",
        (Color::White, PieceType::Knight) => "♘",
        (Color::White, PieceType::Bishop) => "♗",
        (Color::White, PieceType::Rook) => "♖",
        (Color::White, PieceType::Queen) => "♕",
        (Color::White, PieceType::King) => "♔",
        (Color::Black, PieceType::Pawn) => "♟",
        (Color::Black, PieceType::Knight) => "♞",
        (Color::Black, PieceType::Bishop) => "♝",
        (Color::Black, PieceType::Rook) => "♜",
        (Color::Black, PieceType::Queen) => "♛",
        (Color::Black, PieceType::King) => "♚",
    }
}

/// Maps a board snapshot to the UI field model, flipping into screen
/// orientation for a Black-playing human.
fn map_board_to_fields(
    board: &BoardSnapshot,
    human_color: Color,
    selected: Option<u8>,
    targets: &[u8],
) -> ModelRc<Field> {
    let mut fields = Vec::with_capacity(64);

    for view_row in 0..8u8 {
        for view_col in 0..8u8 {
            let (row, col) = apply_orientation(view_row, view_col, human_color);
            let square = row * 8 + col;
            let piece = board[square as usize];
            fields.push(Field {
                glyph: SharedString::from(piece.map_or("", piece_glyph)),
                white: piece.map_or(false, |piece| piece.color == Color::White),
                dark: (view_row + view_col) % 2 == 1,
                highlight: targets.contains(&square),
                selected: selected == Some(square),
            });
        }
    }

    ModelRc::new(VecModel::from(fields))
}

/// Renders into the Slint window; one instance per session.
struct SlintView {
    window: slint::Weak<AppWindow>,
    human_color: Color,
    history: RefCell<Vec<String>>,
}

impl BoardView for SlintView {
    fn draw_board(&self, board: &BoardSnapshot) {
        let Some(ui) = self.window.upgrade() else { return };
        ui.set_fields(map_board_to_fields(board, self.human_color, None, &[]));
        ui.set_promotion_active(false);
    }

    fn highlight_moves(&self, board: &BoardSnapshot, selected: u8, targets: &[u8]) {
        let Some(ui) = self.window.upgrade() else { return };
        ui.set_fields(map_board_to_fields(board, self.human_color, Some(selected), targets));
        ui.set_promotion_active(false);
    }

    fn show_promotion_choices(&self, color: Color) {
        let Some(ui) = self.window.upgrade() else { return };
        let glyphs: Vec<SharedString> = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight]
            .into_iter()
            .map(|kind| SharedString::from(piece_glyph(Piece { color, kind })))
            .collect();
        ui.set_promotion_glyphs(ModelRc::new(VecModel::from(glyphs)));
        ui.set_promotion_active(true);
    }

    fn append_move(&self, color: Color, notation: &str) {
        let Some(ui) = self.window.upgrade() else { return };
        let tag = match color {
            Color::White => "W",
            Color::Black => "B",
        };
        self.history.borrow_mut().push(format!("{} {}", tag, notation));
        ui.set_history_text(SharedString::from(self.history.borrow().join("  ")));
    }

    fn announce(&self, text: &str) {
        if let Some(ui) = self.window.upgrade() {
            ui.set_status(SharedString::from(text));
        }
    }
}

/// Yield point on the Slint event loop: two chained zero-delay turns, the
/// analogue of a double requestAnimationFrame, so the window paints the
/// committed move before the opponent search blocks the thread.
struct EventLoopScheduler;

impl FrameScheduler for EventLoopScheduler {
    fn after_paint(&self, resume: Box<dyn FnOnce()>) {
        slint::Timer::single_shot(Duration::ZERO, move || {
            slint::Timer::single_shot(Duration::ZERO, move || resume());
        });
    }
}

/// Builds the window, engine and session, wires the click callback and runs
/// the event loop until the window closes.
pub fn setup_ui(fen: &str, human_color: Color) -> Result<(), String> {
    let ui = AppWindow::new().map_err(|error| error.to_string())?;
    let engine = GameEngine::from_fen(fen)?;

    let view = Rc::new(SlintView {
        window: ui.as_weak(),
        human_color,
        history: RefCell::new(Vec::new()),
    });
    let session = Session::new(
        Box::new(engine),
        view.clone() as Rc<dyn BoardView>,
        Rc::new(EventLoopScheduler),
        human_color,
    );

    ui.on_surface_clicked({
        let session = Rc::downgrade(&session);
        move |x, y| {
            if let Some(session) = session.upgrade() {
                session.borrow_mut().handle_click(x, y);
            }
        }
    });

    ui.set_status(SharedString::from(match human_color {
        Color::White => "You play White",
        Color::Black => "You play Black",
    }));
    session.borrow_mut().start();
    session.borrow().draw();

    ui.run().map_err(|error| error.to_string())
}
