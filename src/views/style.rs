// src/views/style.rs
//
// Line style state and color string parsing. Colors normalize to 0..1
// ratio RGBA tuples, the form the renderer consumes.

use nannou::color::{rgba, Rgba};

use crate::config::StyleConfig;
use crate::error::ColorParseError;

/// Marker accent is fixed red, independent of the line style.
pub fn marker_color() -> Rgba<f32> {
    rgba(1.0, 0.0, 0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgba<f32>,
    pub line_width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: rgba(0x16 as f32 / 255.0, 0x16 as f32 / 255.0, 0x16 as f32 / 255.0, 1.0),
            line_width: 1.0,
        }
    }
}

impl LineStyle {
    /// Builds the style from config, keeping the built-in default when the
    /// configured color string is unusable.
    pub fn from_config(config: &StyleConfig) -> Self {
        let fallback = Self::default();
        let color = match parse_color(&config.default_line_color) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("{}; using default line color", e);
                fallback.color
            }
        };
        Self {
            color,
            line_width: config.default_line_width,
        }
    }
}

/// Parses a CSS-style color string: named colors, `#rgb`/`#rgba`/
/// `#rrggbb`/`#rrggbbaa`, `rgb()`/`rgba()` and `hsl()`/`hsla()`.
pub fn parse_color(input: &str) -> Result<Rgba<f32>, ColorParseError> {
    let trimmed = input.trim();

    if let Some((r, g, b)) = named_color(trimmed) {
        return Ok(ratio_rgba(r, g, b, 1.0));
    }
    if let Some(color) = parse_hex(trimmed) {
        return Ok(color);
    }
    if let Some(color) = parse_rgb_func(trimmed) {
        return Ok(color);
    }
    if let Some(color) = parse_hsl_func(trimmed) {
        return Ok(color);
    }

    Err(ColorParseError {
        input: input.to_string(),
    })
}

fn ratio_rgba(r: u8, g: u8, b: u8, alpha: f32) -> Rgba<f32> {
    rgba(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    )
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "lime" => (0, 255, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "steelblue" => (70, 130, 180),
        "tomato" => (255, 99, 71),
        _ => return None,
    };
    Some(rgb)
}

fn parse_hex(input: &str) -> Option<Rgba<f32>> {
    let re = regex::Regex::new(r"^#([0-9a-fA-F]+)$").ok()?;
    let digits = re.captures(input)?.get(1)?.as_str();

    let (r, g, b, a) = match digits.len() {
        3 | 4 => {
            let mut nibbles = digits
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = nibbles.next()??;
            let g = nibbles.next()??;
            let b = nibbles.next()??;
            let a = nibbles.next().unwrap_or(Some(255))?;
            (r, g, b, a)
        }
        6 | 8 => {
            let byte_at = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            let r = byte_at(0)?;
            let g = byte_at(2)?;
            let b = byte_at(4)?;
            let a = if digits.len() == 8 { byte_at(6)? } else { 255 };
            (r, g, b, a)
        }
        _ => return None,
    };
    Some(ratio_rgba(r, g, b, a as f32 / 255.0))
}

fn parse_rgb_func(input: &str) -> Option<Rgba<f32>> {
    let re = regex::Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([\d.]+)\s*)?\)$",
    )
    .ok()?;
    let caps = re.captures(input)?;

    let channel = |i: usize| -> Option<u8> {
        let value: u32 = caps.get(i)?.as_str().parse().ok()?;
        if value > 255 {
            return None;
        }
        Some(value as u8)
    };
    let r = channel(1)?;
    let g = channel(2)?;
    let b = channel(3)?;
    let a = match caps.get(4) {
        Some(m) => m.as_str().parse::<f32>().ok()?,
        None => 1.0,
    };
    Some(ratio_rgba(r, g, b, a))
}

fn parse_hsl_func(input: &str) -> Option<Rgba<f32>> {
    let re = regex::Regex::new(
        r"^hsla?\(\s*([\d.]+)\s*,\s*([\d.]+)%\s*,\s*([\d.]+)%\s*(?:,\s*([\d.]+)\s*)?\)$",
    )
    .ok()?;
    let caps = re.captures(input)?;

    let h: f32 = caps.get(1)?.as_str().parse().ok()?;
    let s: f32 = caps.get(2)?.as_str().parse::<f32>().ok()? / 100.0;
    let l: f32 = caps.get(3)?.as_str().parse::<f32>().ok()? / 100.0;
    let a = match caps.get(4) {
        Some(m) => m.as_str().parse::<f32>().ok()?,
        None => 1.0,
    };
    if s > 1.0 || l > 1.0 {
        return None;
    }

    let (r, g, b) = hsl_to_rgb(h.rem_euclid(360.0), s, l);
    Some(rgba(r, g, b, a.clamp(0.0, 1.0)))
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (r1 + m, g1 + m, b1 + m)
}
