use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Light,
    Medium1,
    Medium2,
    Heavy,
    Rotary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct IconDescriptor {
    pub glyph: Glyph,
    #[schema(value_type = String)]
    pub url: &'static str,
    #[schema(value_type = Vec<u32>)]
    pub size: [u32; 2],
    #[schema(value_type = Vec<u32>)]
    pub anchor: [u32; 2],
}

impl IconDescriptor {
    const fn new(glyph: Glyph, url: &'static str) -> Self {
        IconDescriptor {
            glyph,
            url,
            size: [32, 32],
            anchor: [16, 16],
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [self.size[0] as f64 / 2.0, self.size[1] as f64 / 2.0]
    }
}

pub static LIGHT: IconDescriptor = IconDescriptor::new(Glyph::Light, "/static/icons/aircraft_light.png");
pub static MEDIUM_1: IconDescriptor =
    IconDescriptor::new(Glyph::Medium1, "/static/icons/aircraft_medium_1.png");
pub static MEDIUM_2: IconDescriptor =
    IconDescriptor::new(Glyph::Medium2, "/static/icons/aircraft_medium_2.png");
pub static HEAVY: IconDescriptor = IconDescriptor::new(Glyph::Heavy, "/static/icons/aircraft_heavy.png");
pub static ROTARY: IconDescriptor =
    IconDescriptor::new(Glyph::Rotary, "/static/icons/aircraft_helicopter.png");

/// Glyph for an aircraft category code. Unrecognised codes, including the
/// empty string, get the medium-2 glyph so the contact is still drawn.
pub fn resolve(category: &str) -> &'static IconDescriptor {
    match category {
        "LGHT" => &LIGHT,
        "MED1" => &MEDIUM_1,
        "MED2" => &MEDIUM_2,
        "HVTX" | "HEVY" => &HEAVY,
        "ROTR" => &ROTARY,
        _ => &MEDIUM_2,
    }
}
