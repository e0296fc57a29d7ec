//! Page slicing for the binary export path.
//!
//! A rasterized document of height H is cut into ceil(H / P) strips of
//! page height P, where P keeps the A4 aspect for the bitmap's width.
//! The strips exactly cover `[0, H)` with no gaps or overlaps.

use std::ops::Range;

/// A4 height over width (297mm / 210mm).
pub const A4_ASPECT: f64 = 297.0 / 210.0;

/// Pixel height of one page strip for a bitmap of the given width.
pub fn page_height_for_width(width: u32) -> u32 {
    (f64::from(width) * A4_ASPECT).round().max(1.0) as u32
}

/// Split `[0, content_height)` into page-sized row ranges.
///
/// Content that fits a single page is returned as one undivided range.
pub fn page_slices(content_height: u32, page_height: u32) -> Vec<Range<u32>> {
    if content_height == 0 {
        return vec![0..0];
    }
    if content_height <= page_height {
        return vec![0..content_height];
    }

    let mut slices = Vec::new();
    let mut top = 0;
    while top < content_height {
        let bottom = (top + page_height).min(content_height);
        slices.push(top..bottom);
        top = bottom;
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_is_ceil() {
        for (height, page, expected) in [
            (100, 100, 1),
            (101, 100, 2),
            (250, 100, 3),
            (300, 100, 3),
            (1, 100, 1),
        ] {
            assert_eq!(
                page_slices(height, page).len(),
                expected,
                "height={} page={}",
                height,
                page
            );
        }
    }

    #[test]
    fn test_slices_cover_exactly_without_gaps() {
        let slices = page_slices(995, 141);

        assert_eq!(slices.first().unwrap().start, 0);
        assert_eq!(slices.last().unwrap().end, 995);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        let covered: u32 = slices.iter().map(|r| r.end - r.start).sum();
        assert_eq!(covered, 995);
    }

    #[test]
    fn test_single_page_fast_path() {
        assert_eq!(page_slices(80, 141), vec![0..80]);
    }

    #[test]
    fn test_zero_height_yields_one_empty_page() {
        assert_eq!(page_slices(0, 141), vec![0..0]);
    }

    #[test]
    fn test_page_height_keeps_a4_aspect() {
        assert_eq!(page_height_for_width(100), 141);
        assert_eq!(page_height_for_width(210), 297);
        // Never zero, even for degenerate widths
        assert_eq!(page_height_for_width(0), 1);
    }
}
