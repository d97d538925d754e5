//! Document Exporter: turns a render tree into PDF bytes.
//!
//! The exporter never sees the document itself, only what the renderer produced, so the
//! preview and the PDF agree on which sections exist and in what order. Sections are
//! first lowered to [`Line`]s, which is the part of the layout that does not need fonts.

pub mod handlers;
pub mod pdf;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::render::{EntryNode, NodeBody, RenderTree, SectionNode};

pub use pdf::GenPdfExporter;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not load font family '{family}' from {dir}: {message}")]
    Font {
        dir: String,
        family: String,
        message: String,
    },

    #[error("Could not prepare the photo: {0}")]
    Photo(String),

    #[error("PDF layout failed: {0}")]
    Layout(#[from] genpdf::error::Error),

    #[error("I/O error while exporting: {0}")]
    Io(#[from] std::io::Error),
}

/// Page geometry shared by every export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    pub margin_mm: i32,
    /// Raster assets are produced at `scale` times screen resolution.
    pub scale: u32,
    pub base_font_size: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            margin_mm: 10,
            scale: 2,
            base_font_size: 10,
        }
    }
}

impl ExportSettings {
    pub const SCREEN_DPI: f64 = 96.0;

    pub fn image_dpi(&self) -> f64 {
        Self::SCREEN_DPI * self.scale as f64
    }

    /// Pixel size of a raster that should appear `css_px` screen pixels wide.
    pub fn raster_px(&self, css_px: u32) -> u32 {
        css_px * self.scale
    }
}

/// Produces the bytes of a printable document. Runs on the blocking pool.
pub trait DocumentExporter: Send + Sync {
    fn export(&self, tree: &RenderTree) -> Result<Vec<u8>, ExportError>;
}

/// `Jane Q Doe` -> `Jane_Q_Doe_Resume.pdf`; blank -> `Resume.pdf`. Control characters are
/// dropped.
pub fn export_file_name(person_name: &str) -> String {
    let cleaned: String = person_name
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    if parts.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{}_Resume.pdf", parts.join("_"))
    }
}

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `Content-Disposition` value for a download of the person's résumé.
///
/// `filename=` carries an ASCII-only name with quotes and backslashes removed, for
/// clients that ignore `filename*`, which carries the full UTF-8 name.
pub fn content_disposition(person_name: &str) -> String {
    let ascii_name: String = person_name
        .chars()
        .filter(|c| c.is_ascii() && !matches!(c, '"' | '\\'))
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        export_file_name(&ascii_name),
        utf8_percent_encode(&export_file_name(person_name), ATTR_CHAR)
    )
}

/// A laid-out line of a section, before fonts are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading(String),
    Text(String),
    Bullet(String),
    EntryTitle { title: String, meta: String },
    EntrySubtitle(String),
    Gap,
}

pub fn section_lines(node: &SectionNode) -> Vec<Line> {
    let mut lines = vec![Line::Heading(node.heading.clone())];
    match &node.body {
        NodeBody::Text { text } => {
            lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(|l| Line::Text(l.to_string())),
            );
        }
        NodeBody::Inline { joined, .. } => lines.push(Line::Text(joined.clone())),
        NodeBody::Bullets { items } => {
            lines.extend(items.iter().map(|item| Line::Bullet(item.clone())));
        }
        NodeBody::Entries { entries } => {
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::Gap);
                }
                entry_lines(entry, &mut lines);
            }
        }
    }
    lines
}

fn entry_lines(entry: &EntryNode, lines: &mut Vec<Line>) {
    lines.push(Line::EntryTitle {
        title: entry.title.clone(),
        meta: entry.meta.clone(),
    });
    if !entry.subtitle.trim().is_empty() {
        lines.push(Line::EntrySubtitle(entry.subtitle.clone()));
    }
    lines.extend(entry.details.iter().map(|d| Line::Bullet(d.clone())));
}
