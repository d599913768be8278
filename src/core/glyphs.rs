use fnv::FnvHashMap;
use glam::Vec3;

use super::constants::GLYPH_CELL;

// Letters live on a 5x7 grid, (column, row) with row 0 at the top.
const GLYPH_COLUMNS: u8 = 5;
const GLYPH_ROWS: u8 = 7;
const GLYPH_GAP: u8 = 1;

const S: &[(u8, u8)] = &[
    (1, 0), (2, 0), (3, 0), (4, 0),
    (0, 1), (0, 2),
    (1, 3), (2, 3), (3, 3),
    (4, 4), (4, 5),
    (0, 6), (1, 6), (2, 6), (3, 6),
];
const K: &[(u8, u8)] = &[
    (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
    (4, 0), (3, 1), (2, 2), (1, 3), (2, 4), (3, 5), (4, 6),
];
const Y: &[(u8, u8)] = &[
    (0, 0), (4, 0), (1, 1), (3, 1),
    (2, 2), (2, 3), (2, 4), (2, 5), (2, 6),
];
const N: &[(u8, u8)] = &[
    (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
    (1, 1), (1, 2), (2, 3), (3, 4), (3, 5),
    (4, 0), (4, 1), (4, 2), (4, 3), (4, 4), (4, 5), (4, 6),
];
const E: &[(u8, u8)] = &[
    (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
    (1, 0), (2, 0), (3, 0), (4, 0),
    (1, 3), (2, 3), (3, 3),
    (1, 6), (2, 6), (3, 6), (4, 6),
];
const T: &[(u8, u8)] = &[
    (0, 0), (1, 0), (2, 0), (3, 0), (4, 0),
    (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6),
];
const A: &[(u8, u8)] = &[
    (1, 0), (2, 0), (3, 0),
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
    (4, 1), (4, 2), (4, 3), (4, 4), (4, 5), (4, 6),
    (1, 3), (2, 3), (3, 3),
];
const I: &[(u8, u8)] = &[
    (1, 0), (2, 0), (3, 0),
    (2, 1), (2, 2), (2, 3), (2, 4), (2, 5),
    (1, 6), (2, 6), (3, 6),
];

fn letter_table() -> FnvHashMap<char, &'static [(u8, u8)]> {
    let mut table = FnvHashMap::default();
    table.insert('S', S);
    table.insert('K', K);
    table.insert('Y', Y);
    table.insert('N', N);
    table.insert('E', E);
    table.insert('T', T);
    table.insert('A', A);
    table.insert('I', I);
    table
}

/// World-space point cloud spelling a fixed string, built once and reused by
/// every glyph-field transition.
#[derive(Clone, Debug)]
pub struct GlyphTable {
    points: Vec<Vec3>,
}

impl GlyphTable {
    /// Rasterize `text` into glyph points centred on the origin. Characters
    /// without a glyph (spaces included) advance the cursor and emit nothing.
    pub fn new(text: &str) -> Self {
        let letters = letter_table();
        let advance = (GLYPH_COLUMNS + GLYPH_GAP) as f32;
        let count = text.chars().count() as f32;
        let width = (count * advance - GLYPH_GAP as f32).max(0.0);
        let half_w = (width - 1.0).max(0.0) * 0.5;
        let half_h = (GLYPH_ROWS - 1) as f32 * 0.5;

        let mut points = Vec::new();
        for (slot, ch) in text.chars().enumerate() {
            let Some(cells) = letters.get(&ch.to_ascii_uppercase()) else {
                continue;
            };
            let x0 = slot as f32 * advance;
            for &(col, row) in cells.iter() {
                let x = (x0 + col as f32 - half_w) * GLYPH_CELL;
                let y = (half_h - row as f32) * GLYPH_CELL;
                points.push(Vec3::new(x, y, 0.0));
            }
        }
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
