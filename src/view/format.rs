use std::fmt::Display;

use crate::contact::{Reading, TriState};

pub fn switch_label(state: TriState) -> &'static str {
    match state {
        TriState::On => "ON",
        TriState::Off => "OFF",
        TriState::NotAvailable => "",
    }
}

pub fn reading_cell<T: Display>(reading: &Reading<T>) -> String {
    match reading {
        Reading::Known(value) => value.to_string(),
        Reading::Unknown => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{Altitude, AltitudeKind};

    #[test]
    fn tri_state_labels() {
        assert_eq!(switch_label(TriState::On), "ON");
        assert_eq!(switch_label(TriState::Off), "OFF");
        assert_eq!(switch_label(TriState::NotAvailable), "");
    }

    #[test]
    fn unknown_reading_is_empty_not_zero() {
        let unknown: Reading<Altitude> = Reading::Unknown;
        assert_eq!(reading_cell(&unknown), "");

        let known = Reading::Known(Altitude {
            feet: 0.0,
            kind: AltitudeKind::Gnss,
        });
        assert_eq!(reading_cell(&known), "0");
    }

    #[test]
    fn numbers_render_in_shortest_form() {
        assert_eq!(reading_cell(&Reading::Known(36000.0)), "36000");
        assert_eq!(reading_cell(&Reading::Known(48.1)), "48.1");
        assert_eq!(reading_cell(&Reading::Known(-64.0)), "-64");
    }
}
