use serde::Serialize;
use utoipa::ToSchema;

use crate::contact::{Contact, Position};

use super::format::reading_cell;
use super::icon::{self, IconDescriptor};

/// Rotation currently applied to a marker glyph: clockwise from north, about
/// `origin` (pixels within the glyph).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Rotation {
    pub angle_deg: f64,
    #[schema(value_type = Vec<f64>)]
    pub origin: [f64; 2],
}

/// Popup text, one entry per line. Values are plain text, never markup.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Popup {
    pub lines: Vec<String>,
}

impl Popup {
    fn for_contact(contact: &Contact) -> Self {
        let mut lines = vec![
            format!("ICAO: {}", contact.icao),
            format!("Callsign: {}", contact.callsign),
        ];
        if contact.altitude.known().is_some() {
            lines.push(format!("Altitude: {}", reading_cell(&contact.altitude)));
        }
        Popup { lines }
    }
}

/// Every setter re-applies the rotation; nothing assumes the previous
/// rotation survived a redraw.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrientedMarker {
    pub icao: String,
    pub position: Position,
    pub icon: IconDescriptor,
    heading_deg: f64,
    rotation: Rotation,
    pub popup: Popup,
}

impl OrientedMarker {
    pub fn new(
        icao: &str,
        position: Position,
        icon: &IconDescriptor,
        heading_deg: f64,
        popup: Popup,
    ) -> Self {
        let mut marker = OrientedMarker {
            icao: icao.to_string(),
            position,
            icon: *icon,
            heading_deg,
            rotation: Rotation {
                angle_deg: 0.0,
                origin: icon.center(),
            },
            popup,
        };
        marker.apply_rotation();
        marker
    }

    pub fn for_contact(contact: &Contact) -> Option<Self> {
        let position = *contact.position.known()?;
        Some(Self::new(
            &contact.icao,
            position,
            icon::resolve(&contact.aircraft_category),
            contact_heading(contact),
            Popup::for_contact(contact),
        ))
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_heading(&mut self, heading_deg: f64) {
        self.heading_deg = heading_deg;
        self.apply_rotation();
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.apply_rotation();
    }

    pub fn update_from(&mut self, next: OrientedMarker) {
        self.icon = next.icon;
        self.popup = next.popup;
        self.set_position(next.position);
        self.set_heading(next.heading_deg);
    }

    fn apply_rotation(&mut self) {
        let angle_deg = if self.heading_deg.is_finite() {
            self.heading_deg.rem_euclid(360.0)
        } else {
            0.0
        };
        self.rotation = Rotation {
            angle_deg,
            origin: self.icon.center(),
        };
    }
}

fn contact_heading(contact: &Contact) -> f64 {
    contact.heading.known().map(|h| h.degrees).unwrap_or(0.0)
}
