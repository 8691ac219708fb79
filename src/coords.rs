use crate::board::Color;

// Board geometry in logical pixels; ui/appwindow.slint lays the tiles out
// with the same numbers.
pub const BOARD_SIDE: u8 = 8;
pub const TILE_WIDTH: f32 = 52.0;
pub const TILE_HEIGHT: f32 = 40.0;
pub const BOARD_ORIGIN_X: f32 = 26.0;
pub const BOARD_ORIGIN_Y: f32 = 120.0;

/// Row 0 is the far rank as seen with White at the bottom (rank 8),
/// column 0 is the a-file.
pub fn square_to_row_col(square: u8) -> (u8, u8) {
    (square / 8, square % 8)
}

pub fn row_col_to_square(row: u8, col: u8) -> u8 {
    row * 8 + col
}

/// Maps a click in surface-local coordinates to a board cell, or `None` when
/// the point falls outside the 8x8 tile grid.
pub fn pixel_to_board_cell(x: f32, y: f32) -> Option<(u8, u8)> {
    let dx = x - BOARD_ORIGIN_X;
    let dy = y - BOARD_ORIGIN_Y;
    if dx < 0.0 || dy < 0.0 {
        return None;
    }
    let col = (dx / TILE_WIDTH) as u8;
    let row = (dy / TILE_HEIGHT) as u8;
    if row >= BOARD_SIDE || col >= BOARD_SIDE {
        return None;
    }
    Some((row, col))
}

/// Flips the board 180 degrees when the human plays Black, so their home rank
/// is drawn at the bottom. Involutive, and applied exactly once per direction:
/// once from screen cell to engine cell, once from engine cell to screen cell.
pub fn apply_orientation(row: u8, col: u8, human_color: Color) -> (u8, u8) {
    match human_color {
        Color::White => (row, col),
        Color::Black => (7 - row, 7 - col),
    }
}
