//! Colour palette: names, RGB values and display symbols for each [`ColorId`].
//!
//! This is presentation-layer bookkeeping only -- the core solver never
//! looks at a [`ColorPalette`], it only ever sees [`ColorId`]s and
//! [`ColorSet`](crate::bitset::ColorSet)s.

use hashbrown::HashMap;

use crate::bitset::ColorId;

/// Colour `0` is always the background colour (spec: "Colour 0 is background").
pub const BACKGROUND: ColorId = 0;

#[derive(Debug, PartialEq, Clone)]
pub enum ColorValue {
    CommonName(String),
    RgbTriplet(u8, u8, u8),
    HexValue3(u16),
    HexValue6(u32),
}

impl ColorValue {
    /// ```
    /// use nonogrid_core::color::ColorValue;
    ///
    /// assert_eq!(ColorValue::parse("0F0"), ColorValue::HexValue3(240));
    /// assert_eq!(ColorValue::parse("0000FF"), ColorValue::HexValue6(255));
    /// assert_eq!(ColorValue::parse("white"), ColorValue::CommonName("white".to_string()));
    /// assert_eq!(ColorValue::parse("200, 16,0  "), ColorValue::RgbTriplet(200, 16, 0));
    /// assert_eq!(ColorValue::parse("200, X, 16"), ColorValue::CommonName("200, X, 16".to_string()));
    /// ```
    pub fn parse(value: &str) -> Self {
        if value.len() == 3 {
            if let Ok(hex3) = u16::from_str_radix(value, 16) {
                return ColorValue::HexValue3(hex3);
            }
        }

        if value.len() == 6 {
            if let Ok(hex6) = u32::from_str_radix(value, 16) {
                return ColorValue::HexValue6(hex6);
            }
        }

        let rgb: Vec<_> = value.split(',').collect();
        if rgb.len() == 3 {
            let rgb: Vec<_> = rgb
                .iter()
                .filter_map(|component| component.trim().parse::<u8>().ok())
                .collect();

            if rgb.len() == 3 {
                return ColorValue::RgbTriplet(rgb[0], rgb[1], rgb[2]);
            }
        }

        ColorValue::CommonName(value.to_string())
    }

    /// ```
    /// use nonogrid_core::color::ColorValue;
    ///
    /// assert_eq!(ColorValue::parse("0F0").to_rgb(), (0, 255, 0));
    /// assert_eq!(ColorValue::parse("red").to_rgb(), (255, 0, 0));
    /// assert_eq!(ColorValue::parse("unknown").to_rgb(), (0, 0, 0));
    /// ```
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match self {
            ColorValue::RgbTriplet(r, g, b) => (*r, *g, *b),
            ColorValue::HexValue3(hex3) => {
                let (r, gb) = (hex3 / 256, hex3 % 256);
                let (g, b) = (gb / 16, gb % 16);
                ((r * 17) as u8, (g * 17) as u8, (b * 17) as u8)
            }
            ColorValue::HexValue6(hex6) => {
                let (r, gb) = (hex6 / (1 << 16), hex6 % (1 << 16));
                let (g, b) = (gb / 256, gb % 256);
                (r as u8, g as u8, b as u8)
            }
            ColorValue::CommonName(name) => match name.to_lowercase().as_str() {
                "black" => (0, 0, 0),
                "white" => (255, 255, 255),
                "red" => (255, 0, 0),
                "lime" | "green" => (0, 128, 0),
                "blue" => (0, 0, 255),
                "yellow" => (255, 255, 0),
                "cyan" | "aqua" => (0, 255, 255),
                "magenta" | "fuchsia" => (255, 0, 255),
                "gray" | "grey" => (128, 128, 128),
                _unknown => (0, 0, 0),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColorDesc {
    pub name: String,
    pub value: ColorValue,
    pub symbol: char,
}

/// Maps [`ColorId`]s to human-readable names, RGB values and display symbols.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    by_id: HashMap<ColorId, ColorDesc>,
}

impl ColorPalette {
    /// A palette with just a background colour named `blank_name`.
    pub fn with_background(blank_name: &str) -> Self {
        let mut by_id = HashMap::new();
        let _ = by_id.insert(
            BACKGROUND,
            ColorDesc {
                name: blank_name.to_string(),
                value: ColorValue::HexValue3(0xFFF),
                symbol: '.',
            },
        );
        Self { by_id }
    }

    pub fn add(&mut self, id: ColorId, name: &str, value: ColorValue, symbol: char) {
        let _ = self.by_id.insert(
            id,
            ColorDesc {
                name: name.to_string(),
                value,
                symbol,
            },
        );
    }

    pub fn desc(&self, id: ColorId) -> Option<&ColorDesc> {
        self.by_id.get(&id)
    }

    pub fn symbol(&self, id: ColorId) -> char {
        self.desc(id).map_or('?', |d| d.symbol)
    }

    pub fn id_by_name(&self, name: &str) -> Option<ColorId> {
        self.by_id
            .iter()
            .find(|(_, desc)| desc.name == name)
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorPalette, ColorValue};

    #[test]
    fn background_is_present() {
        let p = ColorPalette::with_background("white");
        assert_eq!(p.symbol(0), '.');
        assert_eq!(p.id_by_name("white"), Some(0));
    }

    #[test]
    fn custom_color_symbol() {
        let mut p = ColorPalette::with_background("white");
        p.add(1, "black", ColorValue::HexValue3(0x000), 'X');
        assert_eq!(p.symbol(1), 'X');
        assert_eq!(p.symbol(42), '?');
    }
}
