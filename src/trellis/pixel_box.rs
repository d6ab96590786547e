use crate::trellis::Bar;
use geo_types::{Coord, Line, coord};

const DEFAULT_BUFFER: f64 = 10.0;

/// Maps page-space meters into the pixel box a map occupies on the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    pub starting: Coord<f64>,
    pub ending: Coord<f64>,
    /// Meters per pixel.
    pub ground_pixel: f64,
    pub left_buffer: f64,
    pub bottom_buffer: f64,
    pub right_buffer: f64,
    pub top_buffer: f64,
    pub row_offset: f64,
    pub col_offset: f64,
}

impl PixelBox {
    /// Buffers default to 10 pixels and offsets to 0.
    pub fn new(starting: Coord<f64>, ending: Coord<f64>, ground_pixel: f64) -> Self {
        Self {
            starting,
            ending,
            ground_pixel,
            left_buffer: DEFAULT_BUFFER,
            bottom_buffer: DEFAULT_BUFFER,
            right_buffer: DEFAULT_BUFFER,
            top_buffer: DEFAULT_BUFFER,
            row_offset: 0.0,
            col_offset: 0.0,
        }
    }

    /// Positional overrides: all buffers, then bottom and top, then right,
    /// then top, then both offsets, then the row offset.
    pub fn with_extras(mut self, extras: &[f64]) -> Self {
        if let Some(&v) = extras.first() {
            self.left_buffer = v;
            self.bottom_buffer = v;
            self.right_buffer = v;
            self.top_buffer = v;
        }
        if let Some(&v) = extras.get(1) {
            self.bottom_buffer = v;
            self.top_buffer = v;
        }
        if let Some(&v) = extras.get(2) {
            self.right_buffer = v;
        }
        if let Some(&v) = extras.get(3) {
            self.top_buffer = v;
        }
        if let Some(&v) = extras.get(4) {
            self.col_offset = v;
            self.row_offset = v;
        }
        if let Some(&v) = extras.get(5) {
            self.row_offset = v;
        }
        self
    }

    pub fn width(&self) -> f64 {
        (self.ending.x - self.starting.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.ending.y - self.starting.y).abs()
    }

    pub fn transform_point(&self, pt: Coord<f64>) -> Coord<f64> {
        coord! {
            x: self.starting.x + pt.x / self.ground_pixel,
            y: self.starting.y + pt.y / self.ground_pixel,
        }
    }

    pub fn transform_points(&self, pts: &[Coord<f64>]) -> Vec<Coord<f64>> {
        pts.iter().map(|&pt| self.transform_point(pt)).collect()
    }

    pub fn transform_line(&self, line: Line<f64>) -> Line<f64> {
        Line::new(self.transform_point(line.start), self.transform_point(line.end))
    }

    /// The bar in pixels. Bars have y up, so `starting` is taken as the
    /// bottom-left pixel and y is negated.
    pub fn bar_line(&self, bar: &Bar) -> Line<f64> {
        self.transform_line(Line::new(
            coord! { x: bar.x1, y: -bar.y1 },
            coord! { x: bar.x2, y: -bar.y2 },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{Hemisphere, UtmCoord};

    fn pixel_box() -> PixelBox {
        PixelBox::new(coord! { x: 100.0, y: 900.0 }, coord! { x: 700.0, y: 100.0 }, 2.0)
    }

    #[test]
    fn test_defaults_and_extras() {
        let pbx = pixel_box();
        assert_eq!(pbx.left_buffer, 10.0);
        assert_eq!(pbx.top_buffer, 10.0);
        assert_eq!(pbx.width(), 600.0);
        assert_eq!(pbx.height(), 800.0);

        let pbx = pixel_box().with_extras(&[5.0, 6.0, 7.0]);
        assert_eq!(pbx.left_buffer, 5.0);
        assert_eq!(pbx.bottom_buffer, 6.0);
        assert_eq!(pbx.top_buffer, 6.0);
        assert_eq!(pbx.right_buffer, 7.0);
        assert_eq!(pbx.row_offset, 0.0);

        let pbx = pixel_box().with_extras(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(pbx.top_buffer, 4.0);
        assert_eq!(pbx.col_offset, 5.0);
        assert_eq!(pbx.row_offset, 6.0);
    }

    #[test]
    fn test_transform() {
        let pbx = pixel_box();
        let pt = pbx.transform_point(coord! { x: 200.0, y: -100.0 });
        assert_eq!(pt, coord! { x: 200.0, y: 850.0 });
        let pts = pbx.transform_points(&[coord! { x: 0.0, y: 0.0 }]);
        assert_eq!(pts, vec![coord! { x: 100.0, y: 900.0 }]);
    }

    #[test]
    fn test_bar_line_flips_y() {
        let utm = UtmCoord {
            zone: 10,
            hemi: Hemisphere::North,
            easting: 0.0,
            northing: 0.0,
        };
        let bar = Bar {
            coordinate: 1000,
            start: utm,
            end: utm,
            x1: 0.0,
            y1: 200.0,
            x2: 1200.0,
            y2: 210.0,
        };
        let line = pixel_box().bar_line(&bar);
        assert_eq!(line.start, coord! { x: 100.0, y: 800.0 });
        assert_eq!(line.end, coord! { x: 700.0, y: 795.0 });
    }
}
