//! Session validation for rectregion.
//!
//! This module checks a session before export, looking for:
//! - Structural problems (duplicate region IDs, images without controls)
//! - Geometry problems (negative or non-finite sizes, unresolved
//!   percentage geometry, regions leaving the stage)
//! - Style and attachment values outside their expected ranges

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;

use crate::region::{Attachment, CoordsType, ImageContext, Region, RegionId, Session};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a session and returns a report of all issues found.
pub fn validate_session(session: &Session, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (index, image) in session.images().iter().enumerate() {
        validate_image(index, image, &mut report);

        let mut seen_ids: HashMap<&RegionId, usize> = HashMap::new();
        for (pos, region) in image.regions().iter().enumerate() {
            let context = IssueContext::Region {
                image: index,
                id: region.id().to_string(),
            };

            if let Some(first_pos) = seen_ids.get(region.id()) {
                report.add(ValidationIssue::error(
                    IssueCode::DuplicateRegionId,
                    format!(
                        "Duplicate region ID {} (first seen at position {})",
                        region.id(),
                        first_pos
                    ),
                    context.clone(),
                ));
            } else {
                seen_ids.insert(region.id(), pos);
            }

            validate_geometry(region, image, &context, &mut report);
            validate_style(region, &context, &mut report);
            validate_attachments(region, &context, &mut report);
        }
    }

    report
}

/// Validates image-level sizes and controls.
fn validate_image(index: usize, image: &ImageContext, report: &mut ValidationReport) {
    let sizes = [
        image.natural_width,
        image.natural_height,
        image.stage_width,
        image.stage_height,
    ];
    if !sizes.iter().all(|v| v.is_finite() && *v > 0.0) {
        report.add(ValidationIssue::error(
            IssueCode::InvalidImageSize,
            format!(
                "Invalid size: natural {}x{}, stage {}x{} (must be positive)",
                image.natural_width, image.natural_height, image.stage_width, image.stage_height
            ),
            IssueContext::Image { index },
        ));
    }

    if image.controls.is_empty() && !image.regions().is_empty() {
        report.add(ValidationIssue::error(
            IssueCode::MissingControlTag,
            format!(
                "Image '{}' has {} region(s) but no labeling control to export them from",
                image.name,
                image.regions().len()
            ),
            IssueContext::Image { index },
        ));
    }
}

/// Validates a region's geometry against its image.
fn validate_geometry(
    region: &Region,
    image: &ImageContext,
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    let geometry = &region.geometry;

    if !geometry.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::GeometryNotFinite,
            format!(
                "Non-finite geometry ({}, {}, {}, {}, scale {}x{}, rotation {})",
                geometry.x,
                geometry.y,
                geometry.width,
                geometry.height,
                geometry.scale_x,
                geometry.scale_y,
                geometry.rotation
            ),
            context.clone(),
        ));
        return; // Skip further geometry checks if values are invalid
    }

    if geometry.width < 0.0 || geometry.height < 0.0 {
        report.add(ValidationIssue::error(
            IssueCode::NegativeSize,
            format!("Negative size {}x{}", geometry.width, geometry.height),
            context.clone(),
        ));
    }

    if geometry.coords_type == CoordsType::Percent {
        // Percent geometry cannot be compared with the stage yet.
        report.add(ValidationIssue::warning(
            IssueCode::UnresolvedPercentGeometry,
            "Geometry is still in percent space; no image size update received",
            context.clone(),
        ));
        return;
    }

    let (w, h) = (image.stage_width, image.stage_height);
    if w > 0.0 && h > 0.0 {
        // Allow small tolerance for floating point
        let env = geometry.envelope();
        if !env.is_within(w, h, 0.5) {
            report.add(ValidationIssue::warning(
                IssueCode::RegionOutOfBounds,
                format!(
                    "Region ({:.1}, {:.1}, {:.1}, {:.1}) extends outside stage bounds (0, 0, {}, {})",
                    env.min.x, env.min.y, env.max.x, env.max.y, w, h
                ),
                context.clone(),
            ));
        }
    }
}

fn validate_style(region: &Region, context: &IssueContext, report: &mut ValidationReport) {
    if !region.style.opacity_in_range() {
        report.add(ValidationIssue::error(
            IssueCode::OpacityOutOfRange,
            format!("Opacity {} outside [0, 1]", region.style.opacity),
            context.clone(),
        ));
    }
    if !region.style.stroke_width_in_range() {
        report.add(ValidationIssue::error(
            IssueCode::NegativeStrokeWidth,
            format!("Negative stroke width {}", region.style.stroke_width),
            context.clone(),
        ));
    }
}

fn validate_attachments(region: &Region, context: &IssueContext, report: &mut ValidationReport) {
    for attachment in &region.attachments {
        match attachment {
            Attachment::Labels(set) | Attachment::RectangleLabels(set) => {
                if set.selected_names().is_empty() {
                    report.add(ValidationIssue::warning(
                        IssueCode::EmptyLabelSelection,
                        format!("No label selected in '{}'", set.name),
                        context.clone(),
                    ));
                }
            }
            Attachment::Rating(rating) => {
                if rating.rating > rating.max_rating {
                    report.add(ValidationIssue::warning(
                        IssueCode::RatingOutOfRange,
                        format!(
                            "Rating {} exceeds maximum {} in '{}'",
                            rating.rating, rating.max_rating, rating.name
                        ),
                        context.clone(),
                    ));
                }
            }
        }
    }
}
