use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of `text` set in the heaviest available face of `font_family`, or
/// `None` when no face could be loaded.
pub fn measure_heavy_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FaceAdvances>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key);
            self.faces.insert(key.clone(), face);
        }
        self.faces
            .get_mut(&key)
            .and_then(|face| face.as_mut())
            .map(|face| face.width(text, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FaceAdvances> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" => Family::SansSerif,
                "monospace" => Family::Monospace,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        // Labels are drawn at weight 900; fontdb picks the closest match.
        let query = Query {
            families: &families,
            weight: Weight::BLACK,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FaceAdvances::load(data, index))
            .flatten()
    }
}

/// Horizontal advances of one face, with ASCII precomputed and other
/// characters resolved lazily.
struct FaceAdvances {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii: [u16; 128],
    extra: HashMap<char, Option<u16>>,
}

impl FaceAdvances {
    fn load(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let mut ascii = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data: data.to_vec(),
            index,
            units_per_em: face.units_per_em().max(1),
            ascii,
            extra: HashMap::new(),
        })
    }

    fn width(&mut self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.6;
        let Self {
            data,
            index,
            ascii,
            extra,
            ..
        } = self;
        let mut face: Option<Face<'_>> = None;
        let mut width = 0.0f32;

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                Some(ascii[ch as usize]).filter(|advance| *advance > 0)
            } else {
                match extra.get(&ch).copied() {
                    Some(cached) => cached,
                    None => {
                        if face.is_none() {
                            face = Face::parse(data.as_slice(), *index).ok();
                        }
                        let advance = face.as_ref().and_then(|parsed| {
                            parsed
                                .glyph_index(ch)
                                .and_then(|glyph| parsed.glyph_hor_advance(glyph))
                        });
                        extra.insert(ch, advance);
                        advance
                    }
                }
            };
            width += match advance {
                Some(units) => units as f32 * scale,
                None => fallback,
            };
        }

        width.max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero_wide() {
        assert_eq!(measure_heavy_text_width("", 20.0, "sans-serif"), Some(0.0));
    }

    #[test]
    fn blank_family_normalizes_to_sans() {
        assert_eq!(normalize_family_key("   "), "sans-serif");
        assert_eq!(normalize_family_key(" Arial "), "Arial");
    }

    #[test]
    fn wider_text_measures_wider_when_face_available() {
        let Some(short) = measure_heavy_text_width("GO", 20.0, "sans-serif") else {
            return;
        };
        let long = measure_heavy_text_width("JAVASCRIPT", 20.0, "sans-serif")
            .expect("same family loaded once");
        assert!(long > short);
    }
}
