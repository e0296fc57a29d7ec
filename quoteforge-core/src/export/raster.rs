//! Bitmaps and the rasterizer seam.
//!
//! Rasterization itself is an external collaborator: anything that can
//! turn the printable HTML document into RGB pixels implements
//! [`Rasterizer`]. The pipeline only slices and embeds the result.

use async_trait::async_trait;

use super::error::ExportError;

/// An RGB8 bitmap, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes, row-major RGB
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// A white bitmap of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xff; (width as usize) * (height as usize) * 3],
        }
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * 3
    }

    /// Copy out a horizontal strip of rows. Out-of-range rows are clamped
    /// to the bitmap height.
    pub fn slice_rows(&self, rows: std::ops::Range<u32>) -> Bitmap {
        let start = rows.start.min(self.height);
        let end = rows.end.min(self.height);
        let row_bytes = self.row_bytes();

        let pixels = self.pixels[start as usize * row_bytes..end as usize * row_bytes].to_vec();
        Bitmap {
            width: self.width,
            height: end - start,
            pixels,
        }
    }

    /// Extend the bitmap to the given height with white rows. A bitmap at
    /// or above that height is returned unchanged.
    pub fn pad_rows(mut self, height: u32) -> Bitmap {
        if self.height >= height {
            return self;
        }
        let missing = (height - self.height) as usize * self.row_bytes();
        self.pixels.extend(std::iter::repeat(0xff).take(missing));
        self.height = height;
        self
    }

    /// Decode a binary PPM (P6, maxval 255) image.
    pub fn from_ppm(bytes: &[u8]) -> Result<Bitmap, ExportError> {
        let mut parser = PpmParser { bytes, pos: 0 };

        let magic = parser.token()?;
        if magic != b"P6" {
            return Err(ExportError::Bitmap("not a P6 PPM image".to_string()));
        }

        let width = parser.number()?;
        let height = parser.number()?;
        let maxval = parser.number()?;
        if maxval != 255 {
            return Err(ExportError::Bitmap(format!(
                "unsupported PPM maxval {}",
                maxval
            )));
        }
        // A single whitespace byte separates the header from pixel data
        parser.pos += 1;

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| ExportError::Bitmap("PPM dimensions out of range".to_string()))?;
        let end = parser
            .pos
            .checked_add(expected)
            .ok_or_else(|| ExportError::Bitmap("PPM dimensions out of range".to_string()))?;
        let data = parser
            .bytes
            .get(parser.pos..end)
            .ok_or_else(|| ExportError::Bitmap("truncated PPM pixel data".to_string()))?;

        Ok(Bitmap {
            width,
            height,
            pixels: data.to_vec(),
        })
    }
}

struct PpmParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PpmParser<'a> {
    /// Next whitespace-delimited token, skipping `#` comments.
    fn token(&mut self) -> Result<&'a [u8], ExportError> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => {
                    while let Some(b) = self.bytes.get(self.pos) {
                        self.pos += 1;
                        if *b == b'\n' {
                            break;
                        }
                    }
                }
                Some(_) => break,
                None => return Err(ExportError::Bitmap("truncated PPM header".to_string())),
            }
        }

        let start = self.pos;
        while let Some(b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn number(&mut self) -> Result<u32, ExportError> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ExportError::Bitmap("malformed PPM header number".to_string()))
    }
}

/// External rasterization collaborator: printable HTML in, pixels out.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Render the document at the given scale factor. Implementations are
    /// expected to wait for fonts to settle before rasterizing.
    async fn rasterize(&self, html: &str, scale: f32) -> Result<Bitmap, ExportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkered(width: u32, height: u32) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let offset = ((y * width + x) * 3) as usize;
                let v = if (x + y) % 2 == 0 { 0x00 } else { 0xff };
                bitmap.pixels[offset] = v;
            }
        }
        bitmap
    }

    #[test]
    fn test_slice_rows_extracts_strip() {
        let bitmap = checkered(4, 10);
        let strip = bitmap.slice_rows(2..5);

        assert_eq!(strip.width, 4);
        assert_eq!(strip.height, 3);
        assert_eq!(strip.pixels.len(), 4 * 3 * 3);
        assert_eq!(&strip.pixels[..], &bitmap.pixels[2 * 12..5 * 12]);
    }

    #[test]
    fn test_slice_rows_clamps_to_height() {
        let bitmap = Bitmap::new(4, 10);
        let strip = bitmap.slice_rows(8..20);
        assert_eq!(strip.height, 2);
    }

    #[test]
    fn test_pad_rows_extends_with_white() {
        let bitmap = checkered(4, 3).pad_rows(5);
        assert_eq!(bitmap.height, 5);
        assert!(bitmap.pixels[4 * 3 * 3..].iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_pad_rows_noop_when_tall_enough() {
        let bitmap = Bitmap::new(4, 5).pad_rows(3);
        assert_eq!(bitmap.height, 5);
    }

    #[test]
    fn test_from_ppm_roundtrip() {
        let mut ppm = b"P6\n# comment line\n2 2\n255\n".to_vec();
        ppm.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);

        let bitmap = Bitmap::from_ppm(&ppm).unwrap();
        assert_eq!(bitmap.width, 2);
        assert_eq!(bitmap.height, 2);
        assert_eq!(bitmap.pixels, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_from_ppm_rejects_wrong_magic() {
        let err = Bitmap::from_ppm(b"P3\n1 1\n255\n000").unwrap_err();
        assert!(matches!(err, ExportError::Bitmap(_)));
    }

    #[test]
    fn test_from_ppm_rejects_oversized_dimensions() {
        let err = Bitmap::from_ppm(b"P6\n4294967295 4294967295\n255\n").unwrap_err();
        assert!(matches!(err, ExportError::Bitmap(_)));
    }

    #[test]
    fn test_from_ppm_rejects_truncated_data() {
        let err = Bitmap::from_ppm(b"P6\n2 2\n255\n\x01\x02").unwrap_err();
        assert!(matches!(err, ExportError::Bitmap(_)));
    }
}
