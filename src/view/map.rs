use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::contact::{is_fresh, Contact, ContactSnapshot};
use crate::geo::GeoPoint;

use super::marker::OrientedMarker;

pub const DEFAULT_ZOOM: u8 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapScene {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<OrientedMarker>,
}

fn visible_contacts(
    snapshot: &ContactSnapshot,
    threshold_s: f64,
) -> impl Iterator<Item = &Contact> + '_ {
    snapshot
        .contacts()
        .iter()
        .filter(|c| matches!(c.position.known(), Some(p) if !p.is_sentinel()))
        .filter(move |c| is_fresh(c, threshold_s))
}

/// Map projection of the current snapshot. Nothing is rendered until the
/// viewport center is known; before the first snapshot the map is empty.
pub fn derive(
    center: Option<GeoPoint>,
    zoom: u8,
    snapshot: Option<&ContactSnapshot>,
    threshold_s: f64,
) -> Option<MapScene> {
    let center = center?;
    let markers = snapshot
        .map(|s| {
            visible_contacts(s, threshold_s)
                .filter_map(OrientedMarker::for_contact)
                .collect()
        })
        .unwrap_or_default();

    Some(MapScene {
        center,
        zoom,
        markers,
    })
}

#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: HashMap<String, OrientedMarker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`derive`]s the scene, then carries it over onto the live markers:
    /// known contacts have their marker updated (re-applying the rotation),
    /// new ones get a marker and departed ones are dropped.
    pub fn scene(
        &mut self,
        center: Option<GeoPoint>,
        zoom: u8,
        snapshot: Option<&ContactSnapshot>,
        threshold_s: f64,
    ) -> Option<MapScene> {
        let mut scene = derive(center, zoom, snapshot, threshold_s)?;

        let mut live = HashMap::with_capacity(scene.markers.len());
        for next in scene.markers.iter_mut() {
            let marker = match self.markers.remove(&next.icao) {
                Some(mut marker) => {
                    marker.update_from(next.clone());
                    marker
                }
                None => {
                    log::debug!(
                        "new marker {} rotated {}",
                        next.icao,
                        next.rotation().angle_deg
                    );
                    next.clone()
                }
            };
            *next = marker.clone();
            live.insert(marker.icao.clone(), marker);
        }

        if !self.markers.is_empty() {
            log::debug!("removed {} markers", self.markers.len());
        }
        self.markers = live;
        Some(scene)
    }
}
