use ab_glyph::{Font, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::backtracking_search::Assignment;
use crate::grid_config::GridConfig;
use crate::word_list::WordList;

/// Printed for blocked cells.
pub const BLOCK: char = '█';

/// Side length of one cell in a rendered image, in pixels.
pub const CELL_SIZE: u32 = 100;

/// Background left showing around the edge of each open cell.
pub const CELL_BORDER: u32 = 2;

const LETTER_SCALE: f32 = 80.0;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The letter in each cell of the grid, found by laying each filled slot's word along its
/// direction from its start cell.
pub fn letter_grid(
    config: &GridConfig,
    words: &WordList,
    assignment: &Assignment,
) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; config.width]; config.height];

    for (slot_id, word_id) in assignment.iter() {
        let slot = config.slot(slot_id);
        for ((row, col), &glyph) in slot.cell_coords().zip(&words.word(word_id).glyphs) {
            letters[row][col] = Some(glyph);
        }
    }

    letters
}

/// Turn the given grid and fill into a rendered string, one line per row.
pub fn render_grid(config: &GridConfig, words: &WordList, assignment: &Assignment) -> String {
    let letters = letter_grid(config, words, assignment);

    letters
        .iter()
        .enumerate()
        .map(|(row, row_letters)| {
            row_letters
                .iter()
                .enumerate()
                .map(|(col, letter)| {
                    if config.is_open((row, col)) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draw the grid on a black canvas, with a white square for each open cell and its letter
/// centred inside. Without a font only the cells are drawn.
pub fn render_image<F: Font>(
    config: &GridConfig,
    words: &WordList,
    assignment: &Assignment,
    font: Option<&F>,
) -> RgbaImage {
    let letters = letter_grid(config, words, assignment);
    let interior_size = CELL_SIZE - 2 * CELL_BORDER;
    let scale = PxScale::from(LETTER_SCALE);

    let mut image = RgbaImage::from_pixel(
        config.width as u32 * CELL_SIZE,
        config.height as u32 * CELL_SIZE,
        BLACK,
    );

    for (row, row_letters) in letters.iter().enumerate() {
        for (col, letter) in row_letters.iter().enumerate() {
            if !config.is_open((row, col)) {
                continue;
            }

            let left = (col as u32 * CELL_SIZE + CELL_BORDER) as i32;
            let top = (row as u32 * CELL_SIZE + CELL_BORDER) as i32;
            let cell = Rect::at(left, top).of_size(interior_size, interior_size);
            draw_filled_rect_mut(&mut image, cell, WHITE);

            if let (Some(letter), Some(font)) = (letter, font) {
                let text = letter.to_string();
                let (text_width, text_height) = text_size(scale, font, &text);
                let x = left + (interior_size as i32 - text_width as i32) / 2;
                let y = top + (interior_size as i32 - text_height as i32) / 2;
                draw_text_mut(&mut image, BLACK, x, y, scale, font, &text);
            }
        }
    }

    image
}
