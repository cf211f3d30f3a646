//! Font management for PrevueMD
//!
//! egui ships a single proportional and a single monospace typeface. The
//! serif preview font is taken from the operating system when a known serif
//! font file exists; otherwise the serif family falls back to the
//! proportional fonts so text still renders.

use std::fs;

use egui::{FontData, FontDefinitions, FontFamily, FontId};
use log::{debug, info};

use crate::config::PreviewFont;

/// Custom font family for the serif preview font
pub const FONT_SERIF: &str = "Serif";

/// System serif fonts, tried in order.
const SERIF_FONT_PATHS: &[&str] = &[
    // Windows
    "C:\\Windows\\Fonts\\georgia.ttf",
    "C:\\Windows\\Fonts\\times.ttf",
    // macOS
    "/System/Library/Fonts/Supplemental/Georgia.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/liberation-serif/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/noto/NotoSerif-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSerif-Regular.ttf",
];

/// Create font definitions with the serif family registered.
pub fn create_font_definitions() -> FontDefinitions {
    let serif = SERIF_FONT_PATHS.iter().find_map(|path| match fs::read(path) {
        Ok(bytes) => {
            info!("Using serif font {}", path);
            Some(bytes)
        }
        Err(_) => None,
    });
    if serif.is_none() {
        debug!("No system serif font found; serif preview uses the proportional font");
    }
    font_definitions_with_serif(serif)
}

/// Font definitions whose serif family starts with `serif`, if given, and
/// falls back to the proportional fonts.
fn font_definitions_with_serif(serif: Option<Vec<u8>>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();

    let mut family = Vec::new();
    if let Some(bytes) = serif {
        fonts
            .font_data
            .insert(FONT_SERIF.to_owned(), FontData::from_owned(bytes));
        family.push(FONT_SERIF.to_owned());
    }
    family.extend(
        fonts
            .families
            .get(&FontFamily::Proportional)
            .cloned()
            .unwrap_or_default(),
    );
    fonts
        .families
        .insert(FontFamily::Name(FONT_SERIF.into()), family);

    fonts
}

/// Get the font family used to draw the preview.
pub fn preview_font_family(font: PreviewFont) -> FontFamily {
    match font {
        PreviewFont::Sans => FontFamily::Proportional,
        PreviewFont::Serif => FontFamily::Name(FONT_SERIF.into()),
    }
}

/// Create a FontId for the preview pane.
pub fn preview_font_id(size: f32, font: PreviewFont) -> FontId {
    FontId::new(size, preview_font_family(font))
}
