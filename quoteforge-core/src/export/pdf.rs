//! Minimal PDF assembly: one embedded image per A4 page.
//!
//! The writer emits a fixed object layout: catalog, page tree, then a
//! page/content/image triple per input bitmap, all with uncompressed
//! DeviceRGB image streams. Every strip is stretched onto a full A4 media
//! box; callers pad the last strip to page height beforehand so the
//! mapping never distorts.

use super::raster::Bitmap;

/// A4 media box in PDF points.
const PAGE_WIDTH_PT: f64 = 595.28;
const PAGE_HEIGHT_PT: f64 = 841.89;

/// Assemble page bitmaps into a single PDF document.
pub fn assemble_pdf(pages: &[Bitmap]) -> Vec<u8> {
    let blank;
    let pages = if pages.is_empty() {
        blank = [Bitmap::new(1, 1)];
        &blank[..]
    } else {
        pages
    };

    let mut writer = PdfWriter::new();

    // Object 1: catalog, object 2: page tree, then three objects per page.
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 3 + i * 3))
        .collect();

    writer.object(1, "<< /Type /Catalog /Pages 2 0 R >>".as_bytes(), None);
    writer.object(
        2,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .as_bytes(),
        None,
    );

    for (i, bitmap) in pages.iter().enumerate() {
        let page_id = 3 + i * 3;
        let content_id = page_id + 1;
        let image_id = page_id + 2;

        writer.object(
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /XObject << /Im{} {} 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH_PT, PAGE_HEIGHT_PT, i, image_id, content_id
            )
            .as_bytes(),
            None,
        );

        let content = format!(
            "q\n{:.2} 0 0 {:.2} 0 0 cm\n/Im{} Do\nQ\n",
            PAGE_WIDTH_PT, PAGE_HEIGHT_PT, i
        );
        writer.object(
            content_id,
            format!("<< /Length {} >>", content.len()).as_bytes(),
            Some(content.as_bytes()),
        );

        writer.object(
            image_id,
            format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Length {} >>",
                bitmap.width,
                bitmap.height,
                bitmap.pixels.len()
            )
            .as_bytes(),
            Some(&bitmap.pixels),
        );
    }

    writer.finish()
}

struct PdfWriter {
    out: Vec<u8>,
    /// Byte offset of each written object, indexed by object id
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        Self {
            out,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, dict: &[u8], stream: Option<&[u8]>) {
        self.offsets.push((id, self.out.len()));
        self.out.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.out.extend_from_slice(dict);
        self.out.push(b'\n');
        if let Some(stream) = stream {
            self.out.extend_from_slice(b"stream\n");
            self.out.extend_from_slice(stream);
            self.out.extend_from_slice(b"\nendstream\n");
        }
        self.out.extend_from_slice(b"endobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let count = self.offsets.len() + 1;

        let xref_offset = self.out.len();
        self.out
            .extend_from_slice(format!("xref\n0 {}\n", count).as_bytes());
        self.out.extend_from_slice(b"0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            self.out
                .extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        self.out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                count, xref_offset
            )
            .as_bytes(),
        );
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_document() {
        let bytes = assemble_pdf(&[Bitmap::new(10, 14)]);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/Width 10 /Height 14"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_multi_page_document_has_one_image_per_page() {
        let pages = vec![Bitmap::new(4, 6), Bitmap::new(4, 6), Bitmap::new(4, 3)];
        let bytes = assemble_pdf(&pages);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("/Count 3"));
        for i in 0..3 {
            assert!(text.contains(&format!("/Im{} Do", i)));
        }
    }

    #[test]
    fn test_empty_input_yields_blank_page() {
        let bytes = assemble_pdf(&[]);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 1"));
    }

    #[test]
    fn test_startxref_points_at_xref_table() {
        let bytes = assemble_pdf(&[Bitmap::new(2, 2)]);

        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(64)..]);
        let offset: usize = tail
            .lines()
            .rev()
            .nth(1)
            .and_then(|line| line.parse().ok())
            .unwrap();
        assert_eq!(&bytes[offset..offset + 5], b"xref\n");
    }
}
