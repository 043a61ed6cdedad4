mod error;
mod freshness;
mod store;
mod types;
mod wire;

pub use error::DecodeError;
pub use freshness::is_fresh;
pub use store::ContactStore;
pub use types::{
    Altitude, AltitudeKind, Contact, ContactSnapshot, Heading, HeadingKind, Position, Reading,
    SelectedAltitude, SelectedAltitudeSource, Speed, SpeedKind, TriState, VerticalRate,
    VerticalRateSource,
};
pub use wire::decode_snapshot;
