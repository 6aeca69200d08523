//! Certificate rendering
//!
//! The canvas lives only for the duration of one [`render`] call: it is
//! created, drawn on, encoded and dropped. Identical requests produce
//! byte-identical PNGs.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::info;

use super::layout::{
    BACKGROUND, BORDER_INSET, BORDER_WIDTH, CANVAS_HEIGHT, CANVAS_WIDTH, INK, LINES,
};
use super::text::{draw_centered, fill_rect};
use super::types::{CertificateArtifact, CertificateRequest};
use crate::error::Result;

/// Render a completion certificate
pub fn render(request: &CertificateRequest) -> Result<CertificateArtifact> {
    request.validate()?;

    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);
    draw_border(&mut canvas);

    for line in LINES {
        let text = line.text(&request.recipient_display_name, &request.project_title);
        draw_centered(&mut canvas, &text, line.font, line.baseline, INK);
    }

    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(canvas).write_to(&mut output, ImageFormat::Png)?;

    let artifact = CertificateArtifact::new(output.into_inner(), request.suggested_filename());
    info!(
        filename = %artifact.filename(),
        size_bytes = artifact.size_bytes(),
        "Certificate rendered"
    );
    Ok(artifact)
}

/// Stroke the inset rectangle with the stroke centred on its edges
fn draw_border(canvas: &mut RgbImage) {
    let half = BORDER_WIDTH / 2;
    let outer_left = BORDER_INSET - half;
    let inner_left = BORDER_INSET + half;
    let outer_right = CANVAS_WIDTH - BORDER_INSET + half;
    let inner_right = CANVAS_WIDTH - BORDER_INSET - half;
    let outer_bottom = CANVAS_HEIGHT - BORDER_INSET + half;
    let inner_bottom = CANVAS_HEIGHT - BORDER_INSET - half;

    // top, bottom, left, right
    fill_rect(canvas, outer_left, outer_left, outer_right, inner_left, INK);
    fill_rect(canvas, outer_left, inner_bottom, outer_right, outer_bottom, INK);
    fill_rect(canvas, outer_left, outer_left, inner_left, outer_bottom, INK);
    fill_rect(canvas, inner_right, outer_left, outer_right, outer_bottom, INK);
}
