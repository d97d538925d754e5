//! [`DocumentExporter`] backed by `genpdf`.
//!
//! Fonts are read from `font_dir` on every export so a missing font surfaces as an export
//! error instead of a startup failure. The photo is decoded with `image`, masked to a
//! circle over the accent color and handed to `genpdf` through a scoped temp PNG.
//!
//! `genpdf` has no fill primitive, so the TwoSide sidebar background is a one-pixel accent
//! PNG stretched over the column area on every page the table row spans.

use std::path::PathBuf;

use genpdf::elements::{Break, Image as PdfImage, LinearLayout, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::render::Area;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{
    Alignment, Context, Document, Element, Margins, Position, RenderResult, Scale,
    SimplePageDecorator,
};
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat, Rgb, RgbImage};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::export::{section_lines, DocumentExporter, ExportError, ExportSettings, Line};
use crate::photo::decode_data_url;
use crate::render::color::AccentColor;
use crate::render::{ClassicLayout, Header, RenderTree, SectionNode, TwoSideLayout};

const FALLBACK_FONT_FAMILY: &str = "LiberationSans";
const PHOTO_CSS_PX: u32 = 120;
const NAME_FONT_SIZE: u8 = 18;
const HEADING_FONT_SIZE: u8 = 12;
const INK: Color = Color::Rgb(0x1f, 0x29, 0x37);
const MUTED: Color = Color::Rgb(0x6b, 0x72, 0x80);
const MM_PER_INCH: f64 = 25.4;
const SIDEBAR_PADDING_MM: i32 = 4;

/// Text colors for one region of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Palette {
    heading: Color,
    text: Color,
    muted: Color,
}

const BODY: Palette = Palette {
    heading: INK,
    text: INK,
    muted: MUTED,
};

/// The sidebar sits on the accent fill, so all of its text uses the contrast color.
fn sidebar_palette(text_color: &AccentColor) -> Palette {
    let ink = pdf_color(text_color);
    Palette {
        heading: ink,
        text: ink,
        muted: ink,
    }
}

fn pdf_color(color: &AccentColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

pub struct GenPdfExporter {
    font_dir: PathBuf,
    font_family: String,
    settings: ExportSettings,
}

impl GenPdfExporter {
    pub fn new(font_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_family: font_family.into(),
            settings: ExportSettings::default(),
        }
    }

    fn load_font(&self) -> Result<FontFamily<FontData>, ExportError> {
        match genpdf::fonts::from_files(&self.font_dir, &self.font_family, None) {
            Ok(family) => Ok(family),
            Err(e) if self.font_family != FALLBACK_FONT_FAMILY => {
                warn!(
                    "Font family '{}' unavailable ({e}), falling back to {FALLBACK_FONT_FAMILY}",
                    self.font_family
                );
                genpdf::fonts::from_files(&self.font_dir, FALLBACK_FONT_FAMILY, None)
                    .map_err(|e| self.font_error(FALLBACK_FONT_FAMILY, e))
            }
            Err(e) => Err(self.font_error(&self.font_family, e)),
        }
    }

    fn font_error(&self, family: &str, e: genpdf::error::Error) -> ExportError {
        ExportError::Font {
            dir: self.font_dir.display().to_string(),
            family: family.to_string(),
            message: e.to_string(),
        }
    }

    fn configure_document(&self, person_name: &str) -> Result<Document, ExportError> {
        let mut doc = Document::new(self.load_font()?);
        doc.set_title(if person_name.is_empty() {
            "Resume".to_string()
        } else {
            format!("{person_name} Resume")
        });
        doc.set_paper_size(genpdf::PaperSize::A4);
        doc.set_font_size(self.settings.base_font_size);
        doc.set_line_spacing(1.25);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(self.settings.margin_mm);
        doc.set_page_decorator(decorator);
        Ok(doc)
    }
}

impl DocumentExporter for GenPdfExporter {
    fn export(&self, tree: &RenderTree) -> Result<Vec<u8>, ExportError> {
        let mut doc = self.configure_document(tree.person_name())?;

        // Keep temporary files alive until rendering finishes
        let mut temp_files: Vec<NamedTempFile> = Vec::new();

        match tree {
            RenderTree::Classic(layout) => push_classic(&mut doc, layout),
            RenderTree::TwoSide(layout) => {
                push_two_side(&mut doc, layout, &self.settings, &mut temp_files)?
            }
        }

        let mut out = Vec::new();
        doc.render(&mut out)?;
        info!(
            "Exported {} sections to {} bytes of PDF",
            tree.section_nodes().len(),
            out.len()
        );
        Ok(out)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classic
// ────────────────────────────────────────────────────────────────────────────

fn push_classic(doc: &mut Document, layout: &ClassicLayout) {
    doc.push(header_block(&layout.header));
    for node in &layout.body {
        doc.push(Break::new(1));
        doc.push(section_block(node, BODY));
    }
}

fn header_block(header: &Header) -> LinearLayout {
    let mut block = LinearLayout::vertical();
    if !header.name.is_empty() {
        block.push(
            Paragraph::new(StyledString::new(
                header.name.clone(),
                Style::new().bold().with_font_size(NAME_FONT_SIZE).with_color(INK),
            ))
            .aligned(Alignment::Center),
        );
    }
    if !header.contacts.is_empty() {
        block.push(
            Paragraph::new(StyledString::new(
                header.contacts.join("  |  "),
                Style::new().with_color(MUTED),
            ))
            .aligned(Alignment::Center),
        );
    }
    block
}

// ────────────────────────────────────────────────────────────────────────────
// TwoSide
// ────────────────────────────────────────────────────────────────────────────

fn push_two_side(
    doc: &mut Document,
    layout: &TwoSideLayout,
    settings: &ExportSettings,
    temp_files: &mut Vec<NamedTempFile>,
) -> Result<(), ExportError> {
    let sidebar = &layout.sidebar;
    let (r, g, b) = sidebar.accent.rgb();
    let palette = sidebar_palette(&sidebar.text_color);

    let mut left = LinearLayout::vertical();
    if let Some(photo) = &sidebar.photo {
        let diameter = settings.raster_px(PHOTO_CSS_PX);
        let masked = circular_photo(photo, [r, g, b], diameter)?;
        let tmp = write_temp_png(&masked)?;
        let mut image = PdfImage::from_path(tmp.path())?;
        image.set_dpi(settings.image_dpi());
        image.set_alignment(Alignment::Center);
        temp_files.push(tmp);
        left.push(image);
        left.push(Break::new(1));
    }
    if !sidebar.name.is_empty() {
        left.push(Paragraph::new(StyledString::new(
            sidebar.name.clone(),
            Style::new().bold().with_font_size(16).with_color(palette.heading),
        )));
    }
    for contact in &sidebar.contacts {
        left.push(Paragraph::new(StyledString::new(
            contact.clone(),
            Style::new().with_font_size(9).with_color(palette.muted),
        )));
    }
    if let Some(skills) = &sidebar.skills {
        left.push(Break::new(1));
        left.push(section_block(skills, palette));
    }

    let fill_png = write_temp_png(&RgbImage::from_pixel(1, 1, Rgb([r, g, b])))?;
    let fill = PdfImage::from_path(fill_png.path())?;
    temp_files.push(fill_png);
    let sidebar_column = FilledColumn {
        fill,
        inner: left.padded(Margins::all(SIDEBAR_PADDING_MM)),
    };

    let mut right = LinearLayout::vertical();
    for (i, node) in layout.body.iter().enumerate() {
        if i > 0 {
            right.push(Break::new(1));
        }
        right.push(section_block(node, BODY));
    }

    let mut table = TableLayout::new(vec![1, 2]);
    table
        .row()
        .element(sidebar_column)
        .element(right.padded(Margins::trbl(0, 0, 0, SIDEBAR_PADDING_MM)))
        .push()?;
    doc.push(table);
    Ok(())
}

/// Paints `fill` over the whole area it is given, then renders `inner` on top.
///
/// The fill is repeated on every call, so a column that spans pages stays filled down to
/// the bottom margin of each one.
struct FilledColumn<E: Element> {
    /// A single pixel; scaled to the area in millimetres at `MM_PER_INCH` dpi.
    fill: PdfImage,
    inner: E,
}

impl<E: Element> Element for FilledColumn<E> {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        style: Style,
    ) -> Result<RenderResult, genpdf::error::Error> {
        let size = area.size();
        self.fill.set_dpi(MM_PER_INCH);
        self.fill
            .set_scale(Scale::new(f64::from(size.width), f64::from(size.height)));
        self.fill.set_position(Position::new(0, 0));
        self.fill.render(context, area.clone(), style)?;
        self.inner.render(context, area, style)
    }
}

/// Square crop of the photo, scaled to `diameter` and masked to a circle. Pixels outside
/// the circle take the accent color.
pub fn circular_photo(data_url: &str, accent: [u8; 3], diameter: u32) -> Result<RgbImage, ExportError> {
    let bytes = decode_data_url(data_url).map_err(|e| ExportError::Photo(e.to_string()))?;
    let img = image::load_from_memory(&bytes).map_err(|e| ExportError::Photo(e.to_string()))?;

    let (w, h) = img.dimensions();
    let side = w.min(h);
    let square = img.crop_imm((w - side) / 2, (h - side) / 2, side, side);
    let mut rgb = square
        .resize_exact(diameter, diameter, FilterType::Lanczos3)
        .to_rgb8();

    let radius = diameter as f64 / 2.0;
    for (x, y, pixel) in rgb.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - radius;
        let dy = y as f64 + 0.5 - radius;
        if dx * dx + dy * dy > radius * radius {
            *pixel = Rgb(accent);
        }
    }
    debug!("Masked photo to a {diameter}px circle");
    Ok(rgb)
}

fn write_temp_png(img: &RgbImage) -> Result<NamedTempFile, ExportError> {
    let mut tmp = NamedTempFile::new()?;
    img.write_to(tmp.as_file_mut(), ImageFormat::Png)
        .map_err(|e| ExportError::Photo(e.to_string()))?;
    Ok(tmp)
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn section_block(node: &SectionNode, palette: Palette) -> LinearLayout {
    let text_style = Style::new().with_color(palette.text);
    let mut block = LinearLayout::vertical();
    for line in section_lines(node) {
        match line {
            Line::Heading(text) => block.push(Paragraph::new(StyledString::new(
                text.to_uppercase(),
                Style::new()
                    .bold()
                    .with_font_size(HEADING_FONT_SIZE)
                    .with_color(palette.heading),
            ))),
            Line::Text(text) => block.push(Paragraph::new(StyledString::new(text, text_style))),
            Line::Bullet(text) => {
                let mut p = Paragraph::new(StyledString::new("• ", text_style));
                p.push(StyledString::new(text, text_style));
                block.push(p);
            }
            Line::EntryTitle { title, meta } => {
                let mut p = Paragraph::new(StyledString::new(title, text_style.bold()));
                if !meta.trim().is_empty() {
                    p.push(StyledString::new(
                        format!("  ({meta})"),
                        Style::new().with_color(palette.muted),
                    ));
                }
                block.push(p);
            }
            Line::EntrySubtitle(text) => {
                block.push(Paragraph::new(StyledString::new(text, text_style.italic())))
            }
            Line::Gap => block.push(Break::new(0.5)),
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::content::ExperienceFields;
    use crate::models::document::TemplateKind;
    use crate::models::ResumeDocument;
    use crate::photo::to_data_url;
    use crate::render::render;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_data_url(width: u32, height: u32) -> String {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        to_data_url("image/png", &out.into_inner())
    }

    #[test]
    fn test_circular_photo_masks_corners_with_accent() {
        let masked = circular_photo(&png_data_url(60, 40), [1, 2, 3], 50).unwrap();
        assert_eq!(masked.dimensions(), (50, 50));
        assert_eq!(*masked.get_pixel(0, 0), Rgb([1, 2, 3]));
        assert_eq!(*masked.get_pixel(49, 49), Rgb([1, 2, 3]));
        assert_ne!(*masked.get_pixel(25, 25), Rgb([1, 2, 3]));
    }

    #[test]
    fn test_circular_photo_rejects_garbage() {
        let err = circular_photo("data:image/jpeg;base64,AAAA", [0, 0, 0], 10).unwrap_err();
        assert!(matches!(err, ExportError::Photo(_)));
    }

    #[test]
    fn test_missing_fonts_are_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = GenPdfExporter::new(dir.path(), "NoSuchFont");
        let err = exporter
            .export(&render(&ResumeDocument::default()))
            .unwrap_err();
        assert!(matches!(err, ExportError::Font { .. }));
    }

    fn fixture_exporter(dir: &tempfile::TempDir) -> GenPdfExporter {
        let font = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures/fonts/DejaVuSansMono.ttf");
        for style in ["Regular", "Bold", "Italic", "BoldItalic"] {
            std::fs::copy(&font, dir.path().join(format!("Fixture-{style}.ttf"))).unwrap();
        }
        GenPdfExporter::new(dir.path(), "Fixture")
    }

    fn sample_document(experience_entries: usize) -> ResumeDocument {
        let mut doc = ResumeDocument::default();
        doc.content.personal_info.name = "Ada Lovelace".into();
        doc.content.personal_info.email = "ada@example.com".into();
        doc.content.summary = "Analyst of engines.\nWrites notes on them.".into();
        doc.content.skills = vec!["Mathematics".into(), "Notation".into()];
        for i in 0..experience_entries {
            doc.content.add_experience(ExperienceFields {
                title: format!("Engineer {i}"),
                company: "Analytical Engine Co".into(),
                duration: "1842-1843".into(),
                description: "Wrote the first program\nTranslated Menabrea".into(),
            });
        }
        doc
    }

    fn two_side(mut doc: ResumeDocument, accent: &str) -> ResumeDocument {
        doc.template = TemplateKind::TwoSide;
        doc.accent_color = AccentColor::parse(accent).unwrap();
        doc
    }

    fn page_count(pdf: &[u8]) -> usize {
        pdf.windows(b"/MediaBox".len())
            .filter(|w| *w == b"/MediaBox")
            .count()
    }

    #[test]
    fn test_classic_export_is_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = fixture_exporter(&dir)
            .export(&render(&sample_document(2)))
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn test_two_side_export_with_photo_is_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = two_side(sample_document(2), "#2c3e50");
        doc.content.personal_info.photo = Some(png_data_url(80, 60));
        let pdf = fixture_exporter(&dir).export(&render(&doc)).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn test_long_documents_flow_onto_more_pages() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = fixture_exporter(&dir);

        let classic = exporter.export(&render(&sample_document(60))).unwrap();
        assert!(classic.starts_with(b"%PDF"));
        assert!(page_count(&classic) > 1);

        let wide = exporter
            .export(&render(&two_side(sample_document(60), "#16a085")))
            .unwrap();
        assert!(wide.starts_with(b"%PDF"));
        assert!(page_count(&wide) > 1);
    }

    #[test]
    fn test_light_accent_exports_with_dark_sidebar_text() {
        let dir = tempfile::tempdir().unwrap();
        for accent in ["#ffffff", "#fde68a"] {
            let pdf = fixture_exporter(&dir)
                .export(&render(&two_side(sample_document(1), accent)))
                .unwrap();
            assert!(pdf.starts_with(b"%PDF"));
        }
    }

    #[test]
    fn test_sidebar_text_never_uses_the_accent() {
        for accent in ["#ffffff", "#fde68a", "#2c3e50"] {
            let accent = AccentColor::parse(accent).unwrap();
            let palette = sidebar_palette(&accent.contrast_text());
            assert_ne!(palette.heading, pdf_color(&accent));
            assert_ne!(palette.text, pdf_color(&accent));
        }
        let light = sidebar_palette(&AccentColor::parse("#ffffff").unwrap().contrast_text());
        assert_eq!(light.heading, INK);
    }

    #[test]
    fn test_written_png_is_readable() {
        let img = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        let tmp = write_temp_png(&img).unwrap();
        let back = image::open(tmp.path()).unwrap();
        assert_eq!(back.dimensions(), (4, 4));
    }
}
