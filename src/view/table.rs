use serde::Serialize;
use utoipa::ToSchema;

use crate::contact::{is_fresh, Contact, ContactSnapshot};

use super::format::{reading_cell, switch_label};

pub const COLUMNS: [&str; 17] = [
    "ICAO",
    "Callsign",
    "LAT",
    "LON",
    "ALT",
    "Selected ALT",
    "Speed",
    "Track",
    "Selected Heading",
    "VRate",
    "Type",
    "Autopilot",
    "Approach Mode",
    "Altitude Hold Mode",
    "TCAS Mode",
    "Messages",
    "Last Seen",
];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TableRow {
    pub icao: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ContactTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Table projection of the current snapshot: every fresh contact, with or
/// without a position fix. No snapshot yet gives headers and no rows.
pub fn derive(snapshot: Option<&ContactSnapshot>, threshold_s: f64) -> ContactTable {
    let rows = snapshot
        .map(|s| {
            s.contacts()
                .iter()
                .filter(|c| is_fresh(c, threshold_s))
                .map(row)
                .collect()
        })
        .unwrap_or_default();

    ContactTable {
        headers: COLUMNS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

fn row(c: &Contact) -> TableRow {
    let lat = c.position.map(|p| p.lat);
    let lon = c.position.map(|p| p.lon);
    let cells = vec![
        c.icao.clone(),
        c.callsign.clone(),
        reading_cell(&lat),
        reading_cell(&lon),
        reading_cell(&c.altitude),
        reading_cell(&c.selected_altitude),
        reading_cell(&c.speed),
        reading_cell(&c.heading),
        reading_cell(&c.selected_heading),
        reading_cell(&c.vertical_rate),
        c.aircraft_category.clone(),
        switch_label(c.autopilot).to_string(),
        switch_label(c.approach_mode).to_string(),
        switch_label(c.altitude_hold_mode).to_string(),
        switch_label(c.tcas_operational).to_string(),
        c.n_messages.to_string(),
        c.last_seen.to_string(),
    ];
    TableRow {
        icao: c.icao.clone(),
        cells,
    }
}

impl ContactTable {
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(&row.cells) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let mut push_line = |cells: &[String]| {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        };
        push_line(&self.headers);
        for row in &self.rows {
            push_line(&row.cells);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::decode_snapshot;
    use chrono::Utc;

    fn snapshot(json: &str) -> ContactSnapshot {
        decode_snapshot(json.as_bytes(), Utc::now()).unwrap()
    }

    fn cell<'a>(row: &'a TableRow, column: &str) -> &'a str {
        let index = COLUMNS.iter().position(|c| *c == column).unwrap();
        &row.cells[index]
    }

    #[test]
    fn headers_without_snapshot() {
        let table = derive(None, 10.0);
        assert_eq!(table.headers.len(), 17);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn fresh_contact_row() {
        let s = snapshot(
            r#"{"contacts":[{"icao":"A1B2C3","last_seen":5,"lat":48.1,"lon":11.5,
            "position_status":"KNOWN","aircraft_category":"ROTR","autopilot":"true",
            "approach_mode":"false","tcas_operational":"NA","n_messages":7}]}"#,
        );
        let table = derive(Some(&s), 10.0);
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.cells.len(), COLUMNS.len());
        assert_eq!(cell(row, "ICAO"), "A1B2C3");
        assert_eq!(cell(row, "LAT"), "48.1");
        assert_eq!(cell(row, "LON"), "11.5");
        assert_eq!(cell(row, "Type"), "ROTR");
        assert_eq!(cell(row, "Autopilot"), "ON");
        assert_eq!(cell(row, "Approach Mode"), "OFF");
        assert_eq!(cell(row, "Altitude Hold Mode"), "");
        assert_eq!(cell(row, "TCAS Mode"), "");
        assert_eq!(cell(row, "Messages"), "7");
        assert_eq!(cell(row, "Last Seen"), "5");
    }

    #[test]
    fn stale_contact_is_hidden() {
        let s = snapshot(r#"{"contacts":[{"icao":"A1B2C3","last_seen":15}]}"#);
        assert!(derive(Some(&s), 10.0).rows.is_empty());
        assert_eq!(derive(Some(&s), 20.0).rows.len(), 1);
    }

    #[test]
    fn sentinel_position_stays_in_table() {
        let s = snapshot(
            r#"{"contacts":[
            {"icao":"000001","last_seen":2,"lat":0,"lon":0,"position_status":"KNOWN"},
            {"icao":"000002","last_seen":2,"lat":0,"lon":0,"position_status":"UNDETERMINED"}]}"#,
        );
        let table = derive(Some(&s), 10.0);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(cell(&table.rows[0], "LAT"), "0");
        assert_eq!(cell(&table.rows[0], "LON"), "0");
        assert_eq!(cell(&table.rows[1], "LAT"), "");
        assert_eq!(cell(&table.rows[1], "LON"), "");
    }

    #[test]
    fn undetermined_altitude_is_blank() {
        let s = snapshot(
            r#"{"contacts":[{"icao":"A1B2C3","last_seen":1,
            "altitude_type":"UNDETERMINED","altitude":0,
            "speed_type":"GROUND_SPEED","speed":"250"}]}"#,
        );
        let row = &derive(Some(&s), 10.0).rows[0];
        assert_eq!(cell(row, "ALT"), "");
        assert_eq!(cell(row, "Speed"), "250");
        assert_eq!(cell(row, "Track"), "");
        assert_eq!(cell(row, "VRate"), "");
    }

    #[test]
    fn text_rendering_aligns_columns() {
        let s = snapshot(r#"{"contacts":[{"icao":"A1B2C3","callsign":"DLH4AB","last_seen":1}]}"#);
        let text = derive(Some(&s), 10.0).to_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ICAO    Callsign"));
        assert!(lines[1].starts_with("A1B2C3  DLH4AB"));
    }
}
