//! Surface materials and their colors.
//!
//! Materials live in the scene graph's material arena and are shared by every
//! node that references them, so recoloring `main_material` repaints the whole body.

use std::sync::Arc;

use crate::{
    data_structures::texture::EnvironmentMap,
    error::{Error, Result},
};

/// sRGB-encoded color with channels in `[0, 1]`, as written in CSS styles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn set_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.r = r;
        self.g = g;
        self.b = b;
    }

    /// Parse a CSS-style color string and assign it.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` with 0-255 or percentage
    /// components, `hsl(h, s%, l%)` and a handful of color names. On error the
    /// color is left untouched.
    pub fn set_style(&mut self, style: &str) -> Result<()> {
        *self = Self::parse_style(style)?;
        Ok(())
    }

    pub fn parse_style(style: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(style.to_string());
        let s = style.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        if let Some(args) = functional(&s, "rgb") {
            let [r, g, b] = three(args).ok_or_else(invalid)?;
            let channel = |c: &str| -> Option<f32> {
                let value = match c.strip_suffix('%') {
                    Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
                    None => c.parse::<f32>().ok()? / 255.0,
                };
                Some(value.clamp(0.0, 1.0))
            };
            return match (channel(r), channel(g), channel(b)) {
                (Some(r), Some(g), Some(b)) => Ok(Self::new(r, g, b)),
                _ => Err(invalid()),
            };
        }
        if let Some(args) = functional(&s, "hsl") {
            let [h, sat, l] = three(args).ok_or_else(invalid)?;
            let h = h.parse::<f32>().map_err(|_| invalid())?;
            let pct = |v: &str| {
                v.strip_suffix('%')
                    .and_then(|v| v.trim().parse::<f32>().ok())
                    .map(|v| (v / 100.0).clamp(0.0, 1.0))
            };
            let (sat, l) = pct(sat).zip(pct(l)).ok_or_else(invalid)?;
            return Ok(from_hsl(h.rem_euclid(360.0) / 360.0, sat, l));
        }
        named(&s).ok_or_else(invalid)
    }
}

fn functional<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn three(args: &str) -> Option<[&str; 3]> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [a, b, c] => Some([*a, *b, *c]),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits: Vec<u8> = match hex.len() {
        3 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<_>>()?,
        6 => (0..3)
            .map(|i| u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok())
            .collect::<Option<_>>()?,
        _ => return None,
    };
    Some(Color::new(
        digits[0] as f32 / 255.0,
        digits[1] as f32 / 255.0,
        digits[2] as f32 / 255.0,
    ))
}

fn from_hsl(h: f32, s: f32, l: f32) -> Color {
    if s == 0.0 {
        return Color::new(l, l, l);
    }
    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * 6.0 * (2.0 / 3.0 - t)
        } else {
            p
        }
    };
    Color::new(hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

fn named(name: &str) -> Option<Color> {
    let hex = match name {
        "black" => "000000",
        "white" => "ffffff",
        "red" => "ff0000",
        "green" => "008000",
        "lime" => "00ff00",
        "blue" => "0000ff",
        "yellow" => "ffff00",
        "orange" => "ffa500",
        "silver" => "c0c0c0",
        "gray" | "grey" => "808080",
        "navy" => "000080",
        "maroon" => "800000",
        _ => return None,
    };
    parse_hex(hex)
}

/// How a material is shaded; decides whether it can take an environment map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    /// Physically based metallic/roughness material.
    Standard,
    /// Custom shader. Only reflective when it declares an env map uniform.
    Shader { env_map_slot: bool },
    /// Unlit.
    Basic,
}

#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    pub emissive: Color,
    pub env_map: Option<Arc<EnvironmentMap>>,
    /// Set when a change requires the renderer to rebuild the material's pipeline.
    pub needs_update: bool,
}

impl Material {
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: Color::WHITE,
            emissive: Color::BLACK,
            env_map: None,
            needs_update: false,
        }
    }

    pub fn accepts_env_map(&self) -> bool {
        match self.kind {
            MaterialKind::Standard => true,
            MaterialKind::Shader { env_map_slot } => env_map_slot,
            MaterialKind::Basic => false,
        }
    }
}
