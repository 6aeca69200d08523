//! Fixed certificate layout

use image::Rgb;

/// Canvas width in pixels
pub const CANVAS_WIDTH: u32 = 800;

/// Canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 600;

/// Distance from each canvas edge to the centre of the border stroke
pub const BORDER_INSET: u32 = 20;

/// Border stroke width, centred on the inset rectangle
pub const BORDER_WIDTH: u32 = 10;

pub const BACKGROUND: Rgb<u8> = Rgb([0xf0, 0xf0, 0xf0]);
pub const INK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

/// Salutation placed before the recipient's name
pub const SALUTATION: &str = "Mr/Mrs.";

/// Font size and weight of one text line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    /// Nominal size in pixels
    pub size: u32,
    pub bold: bool,
}

impl Font {
    pub const fn regular(size: u32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: u32) -> Self {
        Self { size, bold: true }
    }
}

/// Where a line's text comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineContent {
    Static(&'static str),
    /// Salutation followed by the recipient's name
    Recipient,
    ProjectTitle,
}

/// One horizontally centred line of text; `baseline` is its y coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLine {
    pub content: LineContent,
    pub baseline: u32,
    pub font: Font,
}

/// The five lines of a completion certificate, top to bottom
pub const LINES: [TextLine; 5] = [
    TextLine {
        content: LineContent::Static("CERTIFICATE OF COMPLETION"),
        baseline: 100,
        font: Font::bold(36),
    },
    TextLine {
        content: LineContent::Static("This is to certify that"),
        baseline: 200,
        font: Font::regular(24),
    },
    TextLine {
        content: LineContent::Recipient,
        baseline: 250,
        font: Font::bold(32),
    },
    TextLine {
        content: LineContent::Static("has completed his/her contribution to the project"),
        baseline: 300,
        font: Font::regular(24),
    },
    TextLine {
        content: LineContent::ProjectTitle,
        baseline: 350,
        font: Font::bold(28),
    },
];

impl TextLine {
    /// Text drawn for this line
    pub fn text(&self, recipient: &str, project_title: &str) -> String {
        match self.content {
            LineContent::Static(text) => text.to_string(),
            LineContent::Recipient => format!("{} {}", SALUTATION, recipient),
            LineContent::ProjectTitle => project_title.to_string(),
        }
    }
}
