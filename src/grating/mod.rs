//! Simple rows by columns reference grid with letter rows and numbered columns.

mod features;

pub use features::to_geojson;

use crate::error::{AtlasError, Result};
use geo_types::{Coord, Line, coord};

pub const MIN_ROW_COL: u32 = 2;
pub const MAX_ROW_COL: u32 = 40;

/// Row label alphabet. I, L, O, Q and S are left out so labels are not
/// mistaken for digits.
pub const LABEL_LETTERS: [&str; 21] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "J", "K", "M", "N", "P", "R", "T", "U", "V", "W", "X",
    "Y", "Z",
];

/// Label of row index `idx`: single letters first, then two letters
/// (`AA`, `AB`, ...) and so on.
pub fn label_with(idx: usize, letters: &[&str]) -> String {
    let n = letters.len();
    if n == 0 {
        return String::new();
    }
    if idx < n {
        return letters[idx].to_string();
    }
    let mut label = label_with(idx / n - 1, letters);
    label.push_str(letters[idx % n]);
    label
}

/// Splits a `width` by `height` area into roughly square cells, using
/// `division` cells along the longer side.
///
/// Returns `(col_width, row_height, rows, cols)`.
pub fn squarish(width: f64, height: f64, division: u32) -> (f64, f64, u32, u32) {
    let (width, height) = (width.abs(), height.abs());
    let division = division.max(1);
    let width_division = width / division as f64;
    let height_division = height / division as f64;

    if width_division >= height_division {
        let rows = ((height / width_division) as u32).max(1);
        return (width_division, height / rows as f64, rows, division);
    }
    let cols = ((width / height_division) as u32).max(1);
    (width / cols as f64, height_division, division, cols)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grating {
    rows: u32,
    cols: u32,
    /// `[min_x, min_y, max_x, max_y]`, with the y values swapped when `flip_y` is set.
    extent: [f64; 4],
    col_width: f64,
    row_height: f64,
    flip_y: bool,
    flip_y_label: bool,
}

impl Grating {
    /// A grating over the box at `x`,`y` of size `width` by `height`.
    ///
    /// `rows` and `cols` must be within [`MIN_ROW_COL`]..=[`MAX_ROW_COL`].
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rows: u32,
        cols: u32,
        flip_y: bool,
    ) -> Result<Self> {
        if !(MIN_ROW_COL..=MAX_ROW_COL).contains(&rows) {
            return Err(AtlasError::InvalidRowCount(rows));
        }
        if !(MIN_ROW_COL..=MAX_ROW_COL).contains(&cols) {
            return Err(AtlasError::InvalidColCount(cols));
        }
        let mut extent = [x, y, x + width, y + height];
        if flip_y {
            extent.swap(1, 3);
        }
        Ok(Self {
            rows,
            cols,
            extent,
            col_width: width / cols as f64,
            row_height: height / rows as f64,
            flip_y,
            flip_y_label: false,
        })
    }

    /// Labels row 0 with `A` instead of the last row.
    pub fn with_flip_y_label(mut self, flip: bool) -> Self {
        self.flip_y_label = flip;
        self
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn extent(&self) -> [f64; 4] {
        self.extent
    }

    pub fn col_width(&self) -> f64 {
        self.col_width
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    pub fn flip_y_label(&self) -> bool {
        self.flip_y_label
    }

    pub fn label_for_row(&self, row: u32) -> Option<String> {
        if row >= self.rows {
            return None;
        }
        let idx = if self.flip_y_label {
            row
        } else {
            self.rows - row - 1
        };
        Some(label_with(idx as usize, &LABEL_LETTERS))
    }

    /// 1-based column number.
    pub fn label_for_col(&self, col: u32) -> Option<String> {
        (col < self.cols).then(|| (col + 1).to_string())
    }

    pub fn y_for_row(&self, row: u32) -> f64 {
        let offset = row as f64 * self.row_height;
        if self.flip_y {
            self.extent[1] - offset
        } else {
            self.extent[1] + offset
        }
    }

    pub fn x_for_col(&self, col: u32) -> f64 {
        self.extent[0] + col as f64 * self.col_width
    }

    pub fn position_for(&self, row: u32, col: u32) -> Coord<f64> {
        coord! { x: self.x_for_col(col), y: self.y_for_row(row) }
    }

    /// Horizontal line at the top of `row`, from 0 to `rows`.
    pub fn line_for_row(&self, row: u32) -> Line<f64> {
        let y = self.y_for_row(row);
        Line::new(
            coord! { x: self.extent[0], y: y },
            coord! { x: self.extent[2], y: y },
        )
    }

    /// Vertical line at the left of `col`, from 0 to `cols`.
    pub fn line_for_col(&self, col: u32) -> Line<f64> {
        let x = self.x_for_col(col);
        Line::new(
            coord! { x: x, y: self.extent[1] },
            coord! { x: x, y: self.extent[3] },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(g: &Grating) -> Vec<String> {
        (0..g.rows()).filter_map(|r| g.label_for_row(r)).collect()
    }

    #[test]
    fn test_row_labels_top_to_bottom() -> Result<()> {
        let g = Grating::new(0.0, 0.0, 100.0, 110.0, 11, 5, false)?;
        assert_eq!(labels(&g).join(" "), "M K J H G F E D C B A");

        let g = g.with_flip_y_label(true);
        assert_eq!(labels(&g).join(" "), "A B C D E F G H J K M");
        Ok(())
    }

    #[test]
    fn test_multi_letter_labels() -> Result<()> {
        let g = Grating::new(0.0, 0.0, 100.0, 240.0, 24, 5, false)?;
        let first: Vec<String> = (0..6).filter_map(|r| g.label_for_row(r)).collect();
        assert_eq!(first, vec!["AC", "AB", "AA", "Z", "Y", "X"]);
        assert_eq!(g.label_for_row(24), None);
        assert_eq!(label_with(21 * 22, &LABEL_LETTERS), "AAA");
        Ok(())
    }

    #[test]
    fn test_labels_skip_confusable_letters() -> Result<()> {
        let g = Grating::new(0.0, 0.0, 10.0, 10.0, MAX_ROW_COL, MAX_ROW_COL, false)?;
        for label in labels(&g) {
            assert!(!label.contains(['I', 'L', 'O', 'Q', 'S']), "{label}");
        }
        Ok(())
    }

    #[test]
    fn test_col_labels() -> Result<()> {
        let g = Grating::new(0.0, 0.0, 10.0, 10.0, 2, 3, false)?;
        assert_eq!(g.label_for_col(0).as_deref(), Some("1"));
        assert_eq!(g.label_for_col(2).as_deref(), Some("3"));
        assert_eq!(g.label_for_col(3), None);
        Ok(())
    }

    #[test]
    fn test_row_col_bounds() {
        assert!(matches!(
            Grating::new(0.0, 0.0, 1.0, 1.0, 1, 5, false),
            Err(AtlasError::InvalidRowCount(1))
        ));
        assert!(matches!(
            Grating::new(0.0, 0.0, 1.0, 1.0, 5, 41, false),
            Err(AtlasError::InvalidColCount(41))
        ));
        assert!(Grating::new(0.0, 0.0, 1.0, 1.0, 2, 40, false).is_ok());
    }

    #[test]
    fn test_positions_and_flip() -> Result<()> {
        let g = Grating::new(10.0, 20.0, 100.0, 50.0, 5, 4, false)?;
        assert_eq!(g.position_for(2, 3), coord! { x: 85.0, y: 40.0 });
        assert_eq!(g.line_for_col(1).start, coord! { x: 35.0, y: 20.0 });
        assert_eq!(g.line_for_col(1).end, coord! { x: 35.0, y: 70.0 });
        assert_eq!(g.line_for_row(5).start.y, 70.0);

        let flipped = Grating::new(10.0, 20.0, 100.0, 50.0, 5, 4, true)?;
        assert_eq!(flipped.extent(), [10.0, 70.0, 110.0, 20.0]);
        assert_eq!(flipped.y_for_row(1), 60.0);
        assert_eq!(flipped.line_for_row(5).end.y, 20.0);
        // labels only follow flip_y_label
        assert_eq!(flipped.label_for_row(0), g.label_for_row(0));
        Ok(())
    }

    #[test]
    fn test_squarish() {
        let (w, h, rows, cols) = squarish(100.0, 50.0, 10);
        assert_eq!((rows, cols), (5, 10));
        assert_eq!((w, h), (10.0, 10.0));

        let (w, h, rows, cols) = squarish(30.0, -90.0, 9);
        assert_eq!((rows, cols), (9, 3));
        assert_eq!((w, h), (10.0, 10.0));

        let (_, _, rows, cols) = squarish(10.0, 0.0, 0);
        assert!(rows >= 1 && cols >= 1);
    }
}
