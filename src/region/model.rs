//! Region, owning image context and session.
//!
//! Ownership runs one way: a [`Session`] owns its [`ImageContext`]s, an
//! image owns its [`Region`]s, a region owns its attachments. Back
//! references are plain indices: a region remembers the [`ImageIndex`] of
//! its parent, and the session's highlighted slot holds a [`RegionHandle`].

use log::debug;
use serde::{Deserialize, Serialize};

use super::attachment::{Attachment, AttachmentSet};
use super::coord::{is_usable_extent, Coord};
use super::geometry::RegionGeometry;
use super::ids::{ExternalId, ImageIndex, RegionId};
use super::space::Pixel;
use super::style::{RegionStyle, ShapeProps, HIGHLIGHT_STROKE};
use crate::error::RegionError;

/// Addresses one region inside a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionHandle {
    pub image: ImageIndex,
    pub region: RegionId,
}

impl RegionHandle {
    pub fn new(image: ImageIndex, region: impl Into<RegionId>) -> Self {
        Self {
            image,
            region: region.into(),
        }
    }
}

/// One annotated rectangle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    id: RegionId,

    /// Cross-reference id; regenerated when absent from the input.
    #[serde(default, alias = "pid")]
    pub external_id: ExternalId,

    pub geometry: RegionGeometry,

    #[serde(default)]
    pub style: RegionStyle,

    #[serde(default)]
    pub attachments: AttachmentSet,

    /// Shared label-configuration fragment copied verbatim into exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<serde_json::Value>,

    #[serde(skip)]
    selected: bool,

    #[serde(skip)]
    highlighted: bool,

    #[serde(skip)]
    parent: Option<ImageIndex>,
}

impl Region {
    /// Creates a region with a freshly generated id.
    pub fn new(geometry: RegionGeometry) -> Self {
        Self::with_id(RegionId::generate(), geometry)
    }

    /// Creates a region with the given id.
    pub fn with_id(id: impl Into<RegionId>, geometry: RegionGeometry) -> Self {
        Self {
            id: id.into(),
            external_id: ExternalId::generate(),
            geometry,
            style: RegionStyle::default(),
            attachments: AttachmentSet::new(),
            normalization: None,
            selected: false,
            highlighted: false,
            parent: None,
        }
    }

    pub fn with_style(mut self, style: RegionStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_attachment(mut self, state: Attachment) -> Self {
        self.attachments.add_state(state);
        self
    }

    pub fn with_normalization(mut self, normalization: serde_json::Value) -> Self {
        self.normalization = Some(normalization);
        self
    }

    #[inline]
    pub fn id(&self) -> &RegionId {
        &self.id
    }

    /// Index of the owning image, once the region has been attached.
    #[inline]
    pub fn parent(&self) -> Option<ImageIndex> {
        self.parent
    }

    /// Handle addressing this region in its session.
    pub fn handle(&self) -> Option<RegionHandle> {
        self.parent.map(|image| RegionHandle {
            image,
            region: self.id.clone(),
        })
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Changes only the highlight flag (hover, relation mode).
    pub fn set_highlight(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub fn set_position(&mut self, x: f64, y: f64, width: f64, height: f64, rotation: f64) {
        self.geometry.set_position(x, y, width, height, rotation);
    }

    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.geometry.set_scale(scale_x, scale_y);
    }

    /// Applies the attributes a surface reports when a drag or transform
    /// gesture ends.
    #[allow(clippy::too_many_arguments)]
    pub fn commit_transform(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
        scale_x: f64,
        scale_y: f64,
    ) {
        self.set_position(x, y, width, height, rotation);
        self.set_scale(scale_x, scale_y);
    }

    /// Position a surface may move the region to while dragging.
    pub fn drag_bound(x: f64, y: f64) -> Coord<Pixel> {
        Coord::<Pixel>::new(x, y).clamp_drag()
    }

    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        self.geometry.contains_point(px, py)
    }

    pub fn update_image_size(
        &mut self,
        natural_width: f64,
        natural_height: f64,
        display_width: f64,
        display_height: f64,
    ) -> Result<(), RegionError> {
        self.geometry
            .update_image_size(natural_width, natural_height, display_width, display_height)
    }

    /// Appends a label or rating sub-state.
    pub fn add_state(&mut self, state: Attachment) {
        self.attachments.add_state(state);
    }

    pub fn set_fill(&mut self, color: impl Into<String>) {
        self.style.set_fill(color);
    }

    /// Properties a rendering surface draws this region with.
    pub fn shape_props(&self) -> ShapeProps {
        let stroke = if self.highlighted {
            HIGHLIGHT_STROKE.to_string()
        } else {
            self.style.stroke_color.clone()
        };
        ShapeProps {
            x: self.geometry.x,
            y: self.geometry.y,
            width: self.geometry.width,
            height: self.geometry.height,
            scale_x: self.geometry.scale_x,
            scale_y: self.geometry.scale_y,
            rotation: self.geometry.rotation,
            opacity: self.style.opacity,
            stroke,
            stroke_width: self.style.stroke_width,
            stroke_scale_enabled: false,
            fill: self.style.fill_color.clone(),
            draggable: true,
        }
    }
}

/// The image a set of regions is drawn on.
///
/// Supplies the names and sizes export needs, and holds the image-level
/// selected-region slot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageContext {
    /// Name of the image tag; the `to_name` of exported records.
    pub name: String,

    /// Image source (URL or path); the `source` of exported records.
    pub value: String,

    pub natural_width: f64,
    pub natural_height: f64,

    /// Currently rendered size.
    pub stage_width: f64,
    pub stage_height: f64,

    /// Names of the labeling controls bound to this image, in declaration
    /// order. The first one is the `from_name` of exported records.
    #[serde(default)]
    pub controls: Vec<String>,

    #[serde(default)]
    regions: Vec<Region>,

    #[serde(skip)]
    selected: Option<RegionId>,

    #[serde(skip)]
    index: ImageIndex,
}

impl ImageContext {
    /// Creates an image rendered at its natural size.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        natural_width: f64,
        natural_height: f64,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            natural_width,
            natural_height,
            stage_width: natural_width,
            stage_height: natural_height,
            controls: Vec::new(),
            regions: Vec::new(),
            selected: None,
            index: ImageIndex::default(),
        }
    }

    pub fn with_stage(mut self, stage_width: f64, stage_height: f64) -> Self {
        self.stage_width = stage_width;
        self.stage_height = stage_height;
        self
    }

    pub fn with_control(mut self, name: impl Into<String>) -> Self {
        self.controls.push(name.into());
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.add_region(region);
        self
    }

    #[inline]
    pub fn index(&self) -> ImageIndex {
        self.index
    }

    /// The first declared labeling control, if any.
    pub fn first_control(&self) -> Option<&str> {
        self.controls.first().map(String::as_str)
    }

    /// Takes ownership of a region and points its parent reference here.
    ///
    /// Ids are not checked for uniqueness, matching what a loaded session
    /// document may contain. Lookups by id resolve to the first region with
    /// that id; duplicates are reported by
    /// [`validate_session`](crate::validation::validate_session).
    pub fn add_region(&mut self, mut region: Region) -> RegionId {
        region.parent = Some(self.index);
        let id = region.id.clone();
        self.regions.push(region);
        id
    }

    /// Drops a region; clears the selected slot if it pointed at it.
    pub fn remove_region(&mut self, id: &RegionId) -> Option<Region> {
        let pos = self.regions.iter().position(|r| &r.id == id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        let mut region = self.regions.remove(pos);
        region.parent = None;
        Some(region)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    pub fn region_mut(&mut self, id: &RegionId) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| &r.id == id)
    }

    pub fn selected_region_id(&self) -> Option<&RegionId> {
        self.selected.as_ref()
    }

    pub fn set_selected(&mut self, id: Option<RegionId>) {
        self.selected = id;
    }

    /// Topmost region containing the point; later regions are drawn on top.
    pub fn region_at(&self, px: f64, py: f64) -> Option<&Region> {
        self.regions.iter().rev().find(|r| r.contains_point(px, py))
    }

    /// Records a new rendered size and forwards it to every region.
    ///
    /// Extents are checked once up front so either every region sees the
    /// update or none does.
    pub fn resize(
        &mut self,
        natural_width: f64,
        natural_height: f64,
        display_width: f64,
        display_height: f64,
    ) -> Result<(), RegionError> {
        let extents = [natural_width, natural_height, display_width, display_height];
        if !extents.iter().all(|extent| is_usable_extent(*extent)) {
            return Err(RegionError::InvalidImageSize {
                natural_width,
                natural_height,
                display_width,
                display_height,
            });
        }

        self.natural_width = natural_width;
        self.natural_height = natural_height;
        self.stage_width = display_width;
        self.stage_height = display_height;

        for region in &mut self.regions {
            region.update_image_size(natural_width, natural_height, display_width, display_height)?;
        }
        debug!(
            "image '{}' resized to {display_width}x{display_height} ({} regions)",
            self.name,
            self.regions.len()
        );
        Ok(())
    }

    fn set_index(&mut self, index: ImageIndex) {
        self.index = index;
        for region in &mut self.regions {
            region.parent = Some(index);
        }
    }
}

/// Root state shared by all images of one annotation: the images and the
/// single highlighted-node slot.
///
/// Selection is last-writer-wins. Selecting a region overwrites the slots
/// but does not clear the `selected` flag of whichever region held them
/// before; that region keeps its flag until it is unselected itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "SessionDocument")]
pub struct Session {
    images: Vec<ImageContext>,

    #[serde(skip)]
    highlighted: Option<RegionHandle>,
}

#[derive(Deserialize)]
struct SessionDocument {
    #[serde(default)]
    images: Vec<ImageContext>,
}

impl From<SessionDocument> for Session {
    fn from(doc: SessionDocument) -> Self {
        Session::from_images(doc.images)
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session and wires every region to its parent image.
    pub fn from_images(images: Vec<ImageContext>) -> Self {
        let mut session = Session::new();
        for image in images {
            session.add_image(image);
        }
        session
    }

    pub fn add_image(&mut self, mut image: ImageContext) -> ImageIndex {
        let index = ImageIndex(self.images.len());
        image.set_index(index);
        self.images.push(image);
        index
    }

    pub fn images(&self) -> &[ImageContext] {
        &self.images
    }

    pub fn image(&self, index: ImageIndex) -> Result<&ImageContext, RegionError> {
        self.images
            .get(index.0)
            .ok_or(RegionError::ImageNotFound(index.0))
    }

    pub fn image_mut(&mut self, index: ImageIndex) -> Result<&mut ImageContext, RegionError> {
        self.images
            .get_mut(index.0)
            .ok_or(RegionError::ImageNotFound(index.0))
    }

    pub fn region(&self, handle: &RegionHandle) -> Result<&Region, RegionError> {
        self.image(handle.image)?
            .region(&handle.region)
            .ok_or_else(|| RegionError::RegionNotFound(handle.region.to_string()))
    }

    pub fn region_mut(&mut self, handle: &RegionHandle) -> Result<&mut Region, RegionError> {
        self.image_mut(handle.image)?
            .region_mut(&handle.region)
            .ok_or_else(|| RegionError::RegionNotFound(handle.region.to_string()))
    }

    /// The node currently held by the highlighted slot.
    pub fn highlighted_node(&self) -> Option<&RegionHandle> {
        self.highlighted.as_ref()
    }

    /// The region the session considers selected.
    pub fn selected_region(&self) -> Option<&Region> {
        self.highlighted
            .as_ref()
            .and_then(|handle| self.region(handle).ok())
    }

    /// Marks a region selected and records it in the session and in its
    /// parent image.
    pub fn select_region(&mut self, handle: &RegionHandle) -> Result<(), RegionError> {
        let image = self.image_mut(handle.image)?;
        let region = image
            .region_mut(&handle.region)
            .ok_or_else(|| RegionError::RegionNotFound(handle.region.to_string()))?;
        region.selected = true;
        image.set_selected(Some(handle.region.clone()));
        self.highlighted = Some(handle.clone());
        debug!("selected region {} on image {}", handle.region, handle.image);
        Ok(())
    }

    /// Clears a region's selected flag, its parent's slot and the session's
    /// highlighted slot.
    pub fn unselect_region(&mut self, handle: &RegionHandle) -> Result<(), RegionError> {
        let image = self.image_mut(handle.image)?;
        let region = image
            .region_mut(&handle.region)
            .ok_or_else(|| RegionError::RegionNotFound(handle.region.to_string()))?;
        region.selected = false;
        image.set_selected(None);
        self.highlighted = None;
        debug!("unselected region {} on image {}", handle.region, handle.image);
        Ok(())
    }

    pub fn set_highlight(&mut self, handle: &RegionHandle, highlighted: bool) -> Result<(), RegionError> {
        self.region_mut(handle)?.set_highlight(highlighted);
        Ok(())
    }

    /// Removes a region from its image, dropping any slot that pointed at it.
    pub fn remove_region(&mut self, handle: &RegionHandle) -> Result<Region, RegionError> {
        let region = self
            .image_mut(handle.image)?
            .remove_region(&handle.region)
            .ok_or_else(|| RegionError::RegionNotFound(handle.region.to_string()))?;
        if self.highlighted.as_ref() == Some(handle) {
            self.highlighted = None;
        }
        Ok(region)
    }
}
