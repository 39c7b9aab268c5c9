//! Label and rating sub-states attached to a region.
//!
//! The set of sub-state kinds is closed: label sets, ratings and
//! rectangle-specific label sets. Each contributes one export record,
//! keyed by its [`AttachmentKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a sub-state could not be rebuilt from exported names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("rating value '{0}' is not a whole number")]
    RatingNotANumber(String),

    #[error("rating carries {0} values; expected at most 1")]
    TooManyRatings(usize),
}

/// Discriminator of an attachment; also the `type` of its export record
/// and the key of its value inside the record's `value` object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttachmentKind {
    #[serde(rename = "labels")]
    Labels,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "rectanglelabels")]
    RectangleLabels,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Labels => "labels",
            AttachmentKind::Rating => "rating",
            AttachmentKind::RectangleLabels => "rectanglelabels",
        }
    }

    /// Parses a record `type`; `None` for anything that is not an
    /// attachment kind (including the bare `"rectangle"`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "labels" => Some(AttachmentKind::Labels),
            "rating" => Some(AttachmentKind::Rating),
            "rectanglelabels" => Some(AttachmentKind::RectangleLabels),
            _ => None,
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a label set allows one or many selected labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    #[default]
    Single,
    Multiple,
}

/// One selectable label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub value: String,
    #[serde(default)]
    pub selected: bool,
}

/// A named set of labels with a selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelSet {
    /// Name of the labeling control this set belongs to.
    pub name: String,
    #[serde(default)]
    pub choice: Choice,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl LabelSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            choice: Choice::Single,
            labels: Vec::new(),
        }
    }

    /// Allows more than one selected label.
    pub fn multiple(mut self) -> Self {
        self.choice = Choice::Multiple;
        self
    }

    /// Adds an unselected label.
    pub fn with_label(mut self, value: impl Into<String>) -> Self {
        self.labels.push(Label {
            value: value.into(),
            selected: false,
        });
        self
    }

    /// Selects the label with the given value. In single-choice sets every
    /// other label is unselected. Returns false if no such label exists.
    pub fn select(&mut self, value: &str) -> bool {
        if !self.labels.iter().any(|label| label.value == value) {
            return false;
        }
        let single = self.choice == Choice::Single;
        for label in &mut self.labels {
            if label.value == value {
                label.selected = true;
            } else if single {
                label.selected = false;
            }
        }
        true
    }

    /// Flips the selection of the label with the given value.
    pub fn toggle(&mut self, value: &str) -> bool {
        let currently = self
            .labels
            .iter()
            .find(|label| label.value == value)
            .map(|label| label.selected);
        match currently {
            Some(true) => {
                for label in self.labels.iter_mut().filter(|l| l.value == value) {
                    label.selected = false;
                }
                true
            }
            Some(false) => self.select(value),
            None => false,
        }
    }

    /// Values of the selected labels, in declaration order.
    pub fn selected_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .filter(|label| label.selected)
            .map(|label| label.value.clone())
            .collect()
    }
}

fn default_max_rating() -> u32 {
    5
}

/// A numeric rating; zero means unrated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub name: String,
    #[serde(default = "default_max_rating")]
    pub max_rating: u32,
    #[serde(default)]
    pub rating: u32,
}

impl Rating {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_rating: default_max_rating(),
            rating: 0,
        }
    }

    pub fn with_max(mut self, max_rating: u32) -> Self {
        self.max_rating = max_rating;
        self
    }

    /// Sets the rating, capped at `max_rating`.
    pub fn set_rating(&mut self, rating: u32) {
        self.rating = rating.min(self.max_rating);
    }

    /// The rating rendered as a single name, or nothing when unrated.
    pub fn selected_names(&self) -> Vec<String> {
        if self.rating == 0 {
            Vec::new()
        } else {
            vec![self.rating.to_string()]
        }
    }
}

/// A sub-state attached to a region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Attachment {
    #[serde(rename = "labels")]
    Labels(LabelSet),
    #[serde(rename = "rating")]
    Rating(Rating),
    #[serde(rename = "rectanglelabels")]
    RectangleLabels(LabelSet),
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Labels(_) => AttachmentKind::Labels,
            Attachment::Rating(_) => AttachmentKind::Rating,
            Attachment::RectangleLabels(_) => AttachmentKind::RectangleLabels,
        }
    }

    /// Name of the control this sub-state belongs to.
    pub fn name(&self) -> &str {
        match self {
            Attachment::Labels(set) | Attachment::RectangleLabels(set) => &set.name,
            Attachment::Rating(rating) => &rating.name,
        }
    }

    pub fn selected_names(&self) -> Vec<String> {
        match self {
            Attachment::Labels(set) | Attachment::RectangleLabels(set) => set.selected_names(),
            Attachment::Rating(rating) => rating.selected_names(),
        }
    }

    /// Rebuilds a sub-state from the names an export record carried.
    pub fn from_selected(
        kind: AttachmentKind,
        name: impl Into<String>,
        names: &[String],
    ) -> Result<Self, AttachmentError> {
        let name = name.into();
        match kind {
            AttachmentKind::Labels | AttachmentKind::RectangleLabels => {
                let mut set = LabelSet::new(name);
                if names.len() > 1 {
                    set = set.multiple();
                }
                for value in names {
                    set = set.with_label(value.clone());
                    set.select(value);
                }
                Ok(if kind == AttachmentKind::Labels {
                    Attachment::Labels(set)
                } else {
                    Attachment::RectangleLabels(set)
                })
            }
            AttachmentKind::Rating => {
                let mut rating = Rating::new(name);
                match names {
                    [] => {}
                    [value] => {
                        let parsed: u32 = value
                            .parse()
                            .map_err(|_| AttachmentError::RatingNotANumber(value.clone()))?;
                        rating.max_rating = rating.max_rating.max(parsed);
                        rating.set_rating(parsed);
                    }
                    _ => return Err(AttachmentError::TooManyRatings(names.len())),
                }
                Ok(Attachment::Rating(rating))
            }
        }
    }
}

/// Ordered sub-states of one region. Order only affects export order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentSet(Vec<Attachment>);

impl AttachmentSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a sub-state.
    pub fn add_state(&mut self, state: Attachment) {
        self.0.push(state);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attachment> {
        self.0.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Attachment> {
        self.0.get_mut(index)
    }
}

impl<'a> IntoIterator for &'a AttachmentSet {
    type Item = &'a Attachment;
    type IntoIter = std::slice::Iter<'a, Attachment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Attachment> for AttachmentSet {
    fn from_iter<I: IntoIterator<Item = Attachment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_choice_select_replaces() {
        let mut set = LabelSet::new("label").with_label("cat").with_label("dog");
        assert!(set.select("cat"));
        assert!(set.select("dog"));
        assert_eq!(set.selected_names(), vec!["dog".to_string()]);
        assert!(!set.select("bird"));
    }

    #[test]
    fn test_multiple_choice_keeps_selection() {
        let mut set = LabelSet::new("label")
            .multiple()
            .with_label("cat")
            .with_label("dog");
        set.select("dog");
        set.select("cat");
        assert_eq!(set.selected_names(), vec!["cat".to_string(), "dog".to_string()]);
        assert!(set.toggle("cat"));
        assert_eq!(set.selected_names(), vec!["dog".to_string()]);
    }

    #[test]
    fn test_rating_names() {
        let mut rating = Rating::new("quality");
        assert!(rating.selected_names().is_empty());
        rating.set_rating(4);
        assert_eq!(rating.selected_names(), vec!["4".to_string()]);
        rating.set_rating(9);
        assert_eq!(rating.rating, 5);
    }

    #[test]
    fn test_kind_tags_match_record_types() {
        let attachment = Attachment::RectangleLabels(LabelSet::new("box"));
        assert_eq!(attachment.kind().as_str(), "rectanglelabels");
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "rectanglelabels");
        assert_eq!(AttachmentKind::parse("rectangle"), None);
        assert_eq!(AttachmentKind::parse("rating"), Some(AttachmentKind::Rating));
    }

    #[test]
    fn test_from_selected_rebuilds_state() {
        let names = vec!["cat".to_string(), "dog".to_string()];
        let attachment = Attachment::from_selected(AttachmentKind::Labels, "label", &names).unwrap();
        assert_eq!(attachment.selected_names(), names);

        let rating =
            Attachment::from_selected(AttachmentKind::Rating, "q", &["7".to_string()]).unwrap();
        assert_eq!(rating.selected_names(), vec!["7".to_string()]);

        let err = Attachment::from_selected(AttachmentKind::Rating, "q", &["x".to_string()])
            .expect_err("non-numeric rating");
        assert_eq!(err, AttachmentError::RatingNotANumber("x".to_string()));

        let err = Attachment::from_selected(
            AttachmentKind::Rating,
            "q",
            &["1".to_string(), "2".to_string()],
        )
        .expect_err("two ratings");
        assert_eq!(err, AttachmentError::TooManyRatings(2));
    }

    #[test]
    fn test_attachment_set_preserves_order() {
        let mut set = AttachmentSet::new();
        set.add_state(Attachment::Rating(Rating::new("a")));
        set.add_state(Attachment::Labels(LabelSet::new("b")));
        set.add_state(Attachment::Labels(LabelSet::new("c")));
        let names: Vec<&str> = set.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(set.len(), 3);
    }
}
