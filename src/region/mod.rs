//! The rectangle region model.
//!
//! A [`Region`] is an axis-aligned rectangle that can be moved, resized,
//! rotated and scaled on an image, carries label and rating sub-states,
//! and exports as resolution-independent annotation records.
//!
//! # Design Principles
//!
//! 1. **One-way ownership**: a [`Session`] owns [`ImageContext`]s, which own
//!    their regions. Regions refer back to their image by [`ImageIndex`],
//!    and selection slots hold [`RegionHandle`]s.
//!
//! 2. **Pixels at rest**: stored geometry is in pixels. Percentage
//!    geometry only exists between loading and the first image-size
//!    update, which converts it exactly once.
//!
//! 3. **Percentages on export**: exported values are computed against the
//!    image's current stage size, never the size the geometry was captured at.
//!
//! # Example
//!
//! ```
//! use rectregion::region::{Attachment, ImageContext, LabelSet, Region, RegionGeometry};
//!
//! let mut labels = LabelSet::new("label").with_label("cat");
//! labels.select("cat");
//!
//! let image = ImageContext::new("image", "cat.jpg", 2000.0, 2000.0)
//!     .with_stage(1000.0, 1000.0)
//!     .with_control("label")
//!     .with_region(
//!         Region::with_id("r1", RegionGeometry::new(100.0, 200.0, 50.0, 25.0))
//!             .with_attachment(Attachment::Labels(labels)),
//!     );
//!
//! let records = image.export_all().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].value.x, 10.0);
//! ```

mod attachment;
mod bbox;
mod coord;
pub mod export;
mod geometry;
mod ids;
pub mod io_json;
pub mod io_results;
mod model;
mod space;
mod style;

pub use attachment::{
    Attachment, AttachmentError, AttachmentKind, AttachmentSet, Choice, Label, LabelSet,
    Rating,
};
pub use bbox::Bounds;
pub use coord::{percent_to_pixel, pixel_to_percent, Coord};
pub use export::{ExportRecord, ExportValue, Exported};
pub use geometry::{ImageSizeSnapshot, RegionGeometry};
pub use ids::{ExternalId, ImageIndex, RegionId};
pub use model::{ImageContext, Region, RegionHandle, Session};
pub use space::{CoordsType, Percent, Pixel};
pub use style::{RegionStyle, ShapeProps, HIGHLIGHT_STROKE};
