//! PDF rendering via `printpdf`: A4 pages, 2 cm margins, builtin Helvetica.
//!
//! Blocks flow top to bottom. A line or image that would cross the bottom
//! margin starts a new page; images are never split. Text wraps on measured
//! glyph advances, so no line runs past the right margin.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageFilter, ImageTransform, ImageXObject,
    IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Px,
};

use super::layout::{Block, ImageBlock, ImageRole, ImageSource, PRINT_DPI};
use super::metrics::{self, Face, MM_PER_PT};
use super::staging::{fit_within, load_image_file, print_pixels, StagingError};
use super::ReportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

const TITLE_PT: f32 = 16.0;
const HEADING_PT: f32 = 12.0;
const BODY_PT: f32 = 10.0;

const LINE_SPACING: f32 = 1.25;

/// Finished PDF plus what ended up in it.
#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub embedded: Vec<ImageRole>,
}

/// Render blocks into a single PDF document.
pub fn render(blocks: &[Block], title: &str) -> Result<RenderedPdf, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Page 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Font(e.to_string()))?;

    let (pages, embedded) = {
        let layer = doc.get_page(page1).get_layer(layer1);
        let mut cursor = PageCursor::new(&doc, layer);
        let mut embedded = Vec::new();

        for block in blocks {
            match block {
                Block::Title(text) => cursor.write_wrapped(text, TITLE_PT, Face::Bold, &bold),
                Block::Heading(text) => {
                    cursor.write_wrapped(text, HEADING_PT, Face::Bold, &bold)
                }
                Block::Text(text) => {
                    cursor.write_wrapped(text, BODY_PT, Face::Regular, &regular)
                }
                Block::Spacer(pt) => cursor.skip(pt * MM_PER_PT),
                Block::Image(img) => {
                    if cursor.place_image(img) {
                        embedded.push(img.role);
                    } else {
                        for line in &img.fallback {
                            cursor.write_wrapped(line, BODY_PT, Face::Regular, &regular);
                        }
                    }
                }
            }
        }
        (cursor.pages, embedded)
    };

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Serialize(e.to_string()))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| ReportError::Serialize(format!("PDF buffer error: {e}")))?;

    Ok(RenderedPdf {
        bytes,
        pages,
        embedded,
    })
}

/// Current layer plus the vertical position of the next line's top edge.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        }
    }

    fn at_top(&self) -> bool {
        self.y >= PAGE_HEIGHT_MM - MARGIN_MM
    }

    /// Start a new page unless `height` still fits above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN_MM && !self.at_top() {
            self.pages += 1;
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", self.pages),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    /// Spacers never push onto a fresh page and are dropped at a page top.
    fn skip(&mut self, height: f32) {
        if !self.at_top() {
            self.y = (self.y - height).max(MARGIN_MM);
        }
    }

    fn write_wrapped(&mut self, text: &str, size_pt: f32, face: Face, font: &IndirectFontRef) {
        let lost = metrics::unencodable_chars(text);
        if lost > 0 {
            tracing::warn!(
                chars = lost,
                "Text contains characters the PDF font cannot print, they will be garbled"
            );
        }

        let line_height = size_pt * LINE_SPACING * MM_PER_PT;
        for line in wrap_text(text, CONTENT_WIDTH_MM, size_pt, face) {
            self.reserve(line_height);
            self.y -= line_height;
            if !line.is_empty() {
                self.layer
                    .use_text(line, size_pt, Mm(MARGIN_MM), Mm(self.y), font);
            }
        }
    }

    /// Returns false when the image cannot be read back; nothing is drawn.
    fn place_image(&mut self, block: &ImageBlock) -> bool {
        let (image, (width_px, height_px)) = match pdf_image(block) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!(role = ?block.role, error = %e, "Image could not be embedded, printing fallback");
                return false;
            }
        };
        if width_px == 0 || height_px == 0 {
            tracing::warn!(role = ?block.role, "Image has no pixels, printing fallback");
            return false;
        }

        self.reserve(block.height_mm);
        self.y -= block.height_mm;

        let natural_width_mm = width_px as f32 / PRINT_DPI * 25.4;
        let natural_height_mm = height_px as f32 / PRINT_DPI * 25.4;
        let transform = ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(self.y)),
            scale_x: Some(block.width_mm / natural_width_mm),
            scale_y: Some(block.height_mm / natural_height_mm),
            dpi: Some(PRINT_DPI),
            ..Default::default()
        };
        image.add_to_layer(self.layer.clone(), transform);
        true
    }
}

/// Image object for a block plus its pixel size.
///
/// Staged uploads are already print-sized JPEG and go in as a DCT stream.
/// Assets are decoded and capped at the block's print resolution.
fn pdf_image(block: &ImageBlock) -> Result<(Image, (u32, u32)), StagingError> {
    match &block.source {
        ImageSource::Staged(staged) => {
            let object = ImageXObject {
                width: Px(staged.width_px as usize),
                height: Px(staged.height_px as usize),
                color_space: ColorSpace::Rgb,
                bits_per_component: ColorBits::Bit8,
                interpolate: true,
                image_data: staged.read_jpeg()?,
                image_filter: Some(ImageFilter::DCT),
                smask: None,
                clipping_bbox: None,
            };
            Ok((Image::from(object), (staged.width_px, staged.height_px)))
        }
        ImageSource::Asset(path) => {
            let max_px = print_pixels((block.width_mm, block.height_mm), PRINT_DPI);
            let decoded = fit_within(load_image_file(path)?, max_px);
            let size = (decoded.width(), decoded.height());
            Ok((Image::from_dynamic_image(&decoded), size))
        }
    }
}

/// Word-wrap on measured width. Line breaks in the input are kept; an empty
/// input yields one empty line; a word wider than the line is split.
fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32, face: Face) -> Vec<String> {
    let width = |s: &str| metrics::text_width_mm(s, size_pt, face);
    let space = width(" ");
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = width(word);

            if word_width > max_width_mm {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = split_word(word, max_width_mm, size_pt, face);
                current = pieces.pop().unwrap_or_default();
                current_width = width(&current);
                lines.extend(pieces);
                continue;
            }

            if !current.is_empty() && current_width + space + word_width > max_width_mm {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += space;
            }
            current.push_str(word);
            current_width += word_width;
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Break one overlong word into pieces that each fit `max_width_mm`.
fn split_word(word: &str, max_width_mm: f32, size_pt: f32, face: Face) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0.0;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let w = metrics::text_width_mm(c.encode_utf8(&mut buf), size_pt, face);
        if !piece.is_empty() && piece_width + w > max_width_mm {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0.0;
        }
        piece.push(c);
        piece_width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::staging::stage_image;
    use crate::report::staging::tests::encoded_image;
    use image::ImageFormat;

    const PRINT_BOX: (u32, u32) = (1417, 1063);

    fn text_blocks(n: usize, text: &str) -> Vec<Block> {
        (0..n).map(|_| Block::Text(text.into())).collect()
    }

    fn body_wrap(text: &str) -> Vec<String> {
        wrap_text(text, CONTENT_WIDTH_MM, BODY_PT, Face::Regular)
    }

    #[test]
    fn renders_pdf_magic() {
        let out = render(&[Block::Title("Informe".into())], "Informe").unwrap();
        assert_eq!(&out.bytes[0..4], b"%PDF");
        assert_eq!(out.pages, 1);
        assert!(out.embedded.is_empty());
    }

    #[test]
    fn empty_text_blocks_render() {
        let blocks = vec![Block::Text(String::new()), Block::Heading(String::new())];
        let out = render(&blocks, "").unwrap();
        assert!(!out.bytes.is_empty());
    }

    #[test]
    fn unencodable_text_still_renders() {
        let out = render(&[Block::Text("李小龙 😀 Ωμέγα".into())], "Informe").unwrap();
        assert_eq!(&out.bytes[0..4], b"%PDF");
    }

    #[test]
    fn long_content_paginates() {
        let out = render(&text_blocks(200, "Hallazgo"), "Informe").unwrap();
        assert!(out.pages >= 3, "got {} pages", out.pages);
    }

    #[test]
    fn wrapped_paragraph_paginates() {
        let long = "palabra ".repeat(6000);
        let out = render(&[Block::Text(long)], "Informe").unwrap();
        assert!(out.pages > 1);
    }

    #[test]
    fn staged_image_embeds() {
        let dir = tempfile::tempdir().unwrap();
        let staged =
            stage_image(&encoded_image(ImageFormat::Jpeg, 120, 90), dir.path(), PRINT_BOX)
                .unwrap();
        let blocks = vec![Block::Image(ImageBlock {
            role: ImageRole::Source,
            source: ImageSource::Staged(staged),
            width_mm: 120.0,
            height_mm: 90.0,
            fallback: vec!["Imagen no disponible para impresión".into()],
        })];

        let out = render(&blocks, "Informe").unwrap();
        assert_eq!(out.embedded, vec![ImageRole::Source]);
        assert_eq!(out.pages, 1);
    }

    #[test]
    fn staged_jpeg_is_embedded_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let staged =
            stage_image(&encoded_image(ImageFormat::Png, 800, 600), dir.path(), PRINT_BOX)
                .unwrap();
        let jpeg_len = staged.read_jpeg().unwrap().len();
        let blocks = vec![Block::Image(ImageBlock {
            role: ImageRole::Source,
            source: ImageSource::Staged(staged),
            width_mm: 120.0,
            height_mm: 90.0,
            fallback: Vec::new(),
        })];

        let out = render(&blocks, "Informe").unwrap();
        // raw RGB would be 800 * 600 * 3 bytes
        assert!(out.bytes.len() < jpeg_len + 64 * 1024, "pdf {} jpeg {jpeg_len}", out.bytes.len());
        assert!(out.bytes.windows(9).any(|w| w == b"DCTDecode"));
    }

    #[test]
    fn image_that_does_not_fit_moves_to_next_page() {
        let dir = tempfile::tempdir().unwrap();
        // 45 body lines leave less than 90 mm on page one
        let mut blocks = text_blocks(45, "Hallazgo");
        let staged =
            stage_image(&encoded_image(ImageFormat::Png, 40, 30), dir.path(), PRINT_BOX)
                .unwrap();
        blocks.push(Block::Image(ImageBlock {
            role: ImageRole::Source,
            source: ImageSource::Staged(staged),
            width_mm: 120.0,
            height_mm: 90.0,
            fallback: Vec::new(),
        }));

        let out = render(&blocks, "Informe").unwrap();
        assert_eq!(out.pages, 2);
        assert_eq!(out.embedded, vec![ImageRole::Source]);
    }

    #[test]
    fn oversized_signature_asset_embeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firma_yesid.png");
        std::fs::write(&path, encoded_image(ImageFormat::Png, 2000, 800)).unwrap();

        let blocks = vec![Block::Image(ImageBlock {
            role: ImageRole::Signature,
            source: ImageSource::Asset(path),
            width_mm: 50.0,
            height_mm: 20.0,
            fallback: Vec::new(),
        })];

        let out = render(&blocks, "Informe").unwrap();
        assert_eq!(out.embedded, vec![ImageRole::Signature]);
        // capped at 591 x 236 px of raw RGB
        assert!(out.bytes.len() < 600_000, "pdf {}", out.bytes.len());
    }

    #[test]
    fn unreadable_asset_prints_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("firma_yesid.png");
        std::fs::write(&bogus, b"not a png").unwrap();

        let blocks = vec![Block::Image(ImageBlock {
            role: ImageRole::Signature,
            source: ImageSource::Asset(bogus),
            width_mm: 50.0,
            height_mm: 20.0,
            fallback: vec!["Dr.".into(), "Especialidad".into(), "M.P.".into()],
        })];

        let out = render(&blocks, "Informe").unwrap();
        assert!(out.embedded.is_empty());
        assert_eq!(&out.bytes[0..4], b"%PDF");
    }

    #[test]
    fn wrap_respects_width() {
        let text = "uno dos tres cuatro cinco seis";
        let max = metrics::text_width_mm("cuatro cinco", BODY_PT, Face::Regular);
        let lines = wrap_text(text, max, BODY_PT, Face::Regular);
        assert!(lines.len() > 1);
        assert!(lines
            .iter()
            .all(|l| metrics::text_width_mm(l, BODY_PT, Face::Regular) <= max));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn uppercase_text_stays_inside_margins() {
        let findings = "ZONA DE TRANSFORMACION TIPO 3 CON EPITELIO ACETOBLANCO DENSO, \
                        MOSAICO GROSERO Y PUNTEADO EN LOS CUADRANTES ANTERIORES, \
                        VASOS ATIPICOS Y BORDES NETOS";
        for (size, face) in [
            (BODY_PT, Face::Regular),
            (HEADING_PT, Face::Bold),
            (TITLE_PT, Face::Bold),
        ] {
            let lines = wrap_text(findings, CONTENT_WIDTH_MM, size, face);
            assert!(lines.len() > 1);
            for line in &lines {
                let w = metrics::text_width_mm(line, size, face);
                assert!(w <= CONTENT_WIDTH_MM, "{w} mm: {line}");
            }
        }
    }

    #[test]
    fn lowercase_lines_hold_more_words() {
        let text = "palabra ".repeat(60);
        let lower = body_wrap(&text);
        let upper = body_wrap(&text.to_uppercase());
        assert!(upper.len() > lower.len());
    }

    #[test]
    fn wrap_keeps_accented_text_whole() {
        assert_eq!(body_wrap("ñññ ááá é"), vec!["ñññ ááá é"]);
    }

    #[test]
    fn wrap_keeps_line_breaks() {
        assert_eq!(body_wrap("primera\n\nsegunda"), vec!["primera", "", "segunda"]);
    }

    #[test]
    fn wrap_empty_yields_single_line() {
        assert_eq!(body_wrap(""), vec![String::new()]);
    }

    #[test]
    fn overlong_word_is_split_to_fit() {
        let word = "M".repeat(200);
        let lines = body_wrap(&format!("inicio {word} fin"));
        assert_eq!(lines.first().map(String::as_str), Some("inicio"));
        assert!(lines.last().unwrap().ends_with(" fin"));
        assert_eq!(lines.concat().matches('M').count(), 200);
        for line in &lines {
            assert!(metrics::text_width_mm(line, BODY_PT, Face::Regular) <= CONTENT_WIDTH_MM);
        }
    }
}
