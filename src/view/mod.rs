pub mod format;
pub mod icon;
pub mod map;
pub mod marker;
pub mod table;

pub use icon::{Glyph, IconDescriptor};
pub use map::{MapScene, MarkerLayer};
pub use marker::{OrientedMarker, Popup, Rotation};
pub use table::{ContactTable, TableRow};
