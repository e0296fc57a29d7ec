//! Quote export pipeline.
//!
//! Transforms a snapshot of the basket, business profile, customer info,
//! and quote metadata into either a print-ready HTML document or a
//! paginated PDF built from a rasterized rendering of that document.

mod content;
mod error;
mod html;
mod paginate;
mod pdf;
mod raster;

pub use content::{
    build_content, FooterBlock, HeaderBlock, NotesBlock, QuoteContent, QuoteRow, QuoteSnapshot,
    DEFAULT_VALIDITY_DAYS,
};
pub use error::ExportError;
pub use html::render_printable;
pub use paginate::{page_height_for_width, page_slices, A4_ASPECT};
pub use pdf::assemble_pdf;
pub use raster::{Bitmap, Rasterizer};

/// Rasterization scale for the binary path; 2x keeps small Hebrew type
/// legible after the PDF embeds the bitmap.
pub const RASTER_SCALE: f32 = 2.0;

/// Render a quote to a multi-page PDF via the given rasterizer.
///
/// The printable document is rasterized at [`RASTER_SCALE`], sliced into
/// A4-proportioned page strips, and assembled into a PDF. Content that
/// fits a single page is not sliced. Rasterization failures propagate to
/// the caller; this function does not retry.
pub async fn render_binary<Rz>(content: &QuoteContent, rasterizer: &Rz) -> Result<Vec<u8>, ExportError>
where
    Rz: Rasterizer + ?Sized,
{
    let html = render_printable(content);
    let bitmap = rasterizer.rasterize(&html, RASTER_SCALE).await?;

    let page_height = page_height_for_width(bitmap.width);
    let pages: Vec<Bitmap> = page_slices(bitmap.height, page_height)
        .into_iter()
        .map(|rows| bitmap.slice_rows(rows).pad_rows(page_height))
        .collect();

    Ok(assemble_pdf(&pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct SolidRasterizer {
        height: u32,
    }

    #[async_trait]
    impl Rasterizer for SolidRasterizer {
        async fn rasterize(&self, _html: &str, _scale: f32) -> Result<Bitmap, ExportError> {
            Ok(Bitmap::new(100, self.height))
        }
    }

    struct BrokenRasterizer;

    #[async_trait]
    impl Rasterizer for BrokenRasterizer {
        async fn rasterize(&self, _html: &str, _scale: f32) -> Result<Bitmap, ExportError> {
            Err(ExportError::Rasterize("canvas allocation failed".to_string()))
        }
    }

    fn sample_content() -> QuoteContent {
        build_content(&QuoteSnapshot::sample())
    }

    #[tokio::test]
    async fn test_render_binary_single_page() {
        let content = sample_content();
        let bytes = render_binary(&content, &SolidRasterizer { height: 50 })
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/Count 1"));
    }

    #[tokio::test]
    async fn test_render_binary_multi_page() {
        let content = sample_content();
        // Page height for width 100 is 141; 300 rows make 3 pages
        let bytes = render_binary(&content, &SolidRasterizer { height: 300 })
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 3"));
    }

    #[tokio::test]
    async fn test_render_binary_propagates_raster_failure() {
        let content = sample_content();
        let err = render_binary(&content, &BrokenRasterizer).await.unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(_)));
    }
}
