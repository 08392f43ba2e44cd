use eframe::egui::Color32;

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }
}

/// Message palette for the form: text and fill for success and error boxes.
pub struct Palette;

impl Palette {
    pub fn success_text() -> Color32 {
        Color32::from_hex("#166534").unwrap_or(Color32::DARK_GREEN)
    }

    pub fn success_fill() -> Color32 {
        Color32::from_hex("#dcfce7").unwrap_or(Color32::LIGHT_GREEN)
    }

    pub fn error_text() -> Color32 {
        Color32::from_hex("#991b1b").unwrap_or(Color32::DARK_RED)
    }

    pub fn error_fill() -> Color32 {
        Color32::from_hex("#fee2e2").unwrap_or(Color32::LIGHT_RED)
    }
}
