//! Drawing surface model and rasterizer.
//!
//! Strokes are recorded in CSS pixels of the on-screen canvas. Rasterizing
//! renders them at [`RASTER_SCALE`] times that size on a white background so
//! signatures print crisply regardless of the screen they were drawn on.

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use super::SignatureError;

pub const RASTER_SCALE: u32 = 2;

/// Pen width in CSS pixels.
pub const STROKE_WIDTH: f32 = 2.5;

const INK: Rgb<u8> = Rgb([17, 24, 39]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rasterized signature ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureImage {
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...`
    pub data_url: String,
}

impl SignatureImage {
    /// Raw PNG bytes behind the data URL.
    pub fn png_bytes(&self) -> Option<Vec<u8>> {
        let encoded = self.data_url.strip_prefix(PNG_DATA_URL_PREFIX)?;
        general_purpose::STANDARD.decode(encoded).ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    strokes: Vec<Vec<Point>>,
    dirty: bool,
}

impl SignaturePad {
    /// Creates a pad for a canvas of `width` x `height` CSS pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            strokes: Vec::new(),
            dirty: false,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    /// First pointer contact of a stroke. Marks the surface dirty.
    pub fn begin_stroke(&mut self, point: Point) {
        self.dirty = true;
        let point = self.clamp(point);
        self.strokes.push(vec![point]);
    }

    pub fn extend_stroke(&mut self, point: Point) {
        let point = self.clamp(point);
        match self.strokes.last_mut() {
            Some(stroke) => stroke.push(point),
            None => self.begin_stroke(point),
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.dirty = false;
    }

    pub fn is_empty(&self) -> bool {
        !self.dirty || self.strokes.iter().all(Vec::is_empty)
    }

    /// Renders the strokes at twice the canvas resolution and encodes a PNG.
    pub fn rasterize(&self) -> Result<SignatureImage, SignatureError> {
        if self.is_empty() {
            return Err(SignatureError::Empty);
        }

        let width = self.width * RASTER_SCALE;
        let height = self.height * RASTER_SCALE;
        let scale = RASTER_SCALE as f32;
        let radius = STROKE_WIDTH * scale / 2.0;

        let mut canvas = RgbImage::from_pixel(width, height, PAPER);
        for stroke in &self.strokes {
            let scaled: Vec<Point> = stroke
                .iter()
                .map(|p| Point::new(p.x * scale, p.y * scale))
                .collect();
            match scaled.as_slice() {
                [] => {}
                [dot] => stamp(&mut canvas, *dot, radius),
                points => {
                    for pair in points.windows(2) {
                        draw_segment(&mut canvas, pair[0], pair[1], radius);
                    }
                }
            }
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| SignatureError::Encode(e.to_string()))?;

        Ok(SignatureImage {
            width,
            height,
            data_url: format!(
                "{}{}",
                PNG_DATA_URL_PREFIX,
                general_purpose::STANDARD.encode(&bytes)
            ),
        })
    }

    fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0.0, self.width as f32),
            point.y.clamp(0.0, self.height as f32),
        )
    }
}

fn draw_segment(canvas: &mut RgbImage, from: Point, to: Point, radius: f32) {
    let length = ((to.x - from.x).powi(2) + (to.y - from.y).powi(2)).sqrt();
    let steps = (length / 0.5).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let point = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        stamp(canvas, point, radius);
    }
}

/// Fills a disc of ink centred on `center`, clipped to the canvas.
fn stamp(canvas: &mut RgbImage, center: Point, radius: f32) {
    let (width, height) = canvas.dimensions();
    let x0 = (center.x - radius).floor().max(0.0) as u32;
    let y0 = (center.y - radius).floor().max(0.0) as u32;
    let x1 = ((center.x + radius).ceil() as u32).min(width - 1);
    let y1 = ((center.y + radius).ceil() as u32).min(height - 1);
    let r2 = radius * radius;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r2 {
                canvas.put_pixel(x, y, INK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pad_is_empty_and_refuses_to_rasterize() {
        let pad = SignaturePad::new(400, 150);
        assert!(pad.is_empty());
        assert_eq!(pad.rasterize(), Err(SignatureError::Empty));
    }

    #[test]
    fn raster_is_twice_the_canvas_size_with_white_background() {
        let mut pad = SignaturePad::new(300, 120);
        pad.begin_stroke(Point::new(20.0, 60.0));
        pad.extend_stroke(Point::new(150.0, 40.0));
        pad.extend_stroke(Point::new(280.0, 90.0));

        let image = pad.rasterize().unwrap();
        assert_eq!((image.width, image.height), (600, 240));

        let decoded = image::load_from_memory(&image.png_bytes().unwrap())
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (600, 240));
        assert_eq!(*decoded.get_pixel(0, 0), PAPER);
        assert_eq!(*decoded.get_pixel(40, 120), INK);
    }

    #[test]
    fn points_outside_the_canvas_are_clamped() {
        let mut pad = SignaturePad::new(100, 50);
        pad.begin_stroke(Point::new(-10.0, 500.0));
        assert_eq!(pad.strokes()[0][0], Point::new(0.0, 50.0));
        assert!(pad.rasterize().is_ok());
    }

    #[test]
    fn clear_resets_dirty_flag() {
        let mut pad = SignaturePad::new(100, 50);
        pad.begin_stroke(Point::new(10.0, 10.0));
        pad.clear();
        assert!(pad.is_empty());
    }
}
