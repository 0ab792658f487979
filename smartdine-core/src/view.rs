//! Framework-free view model.
//!
//! Front-ends render these values; none of them know about HTTP or the
//! state machine internals.

use crate::rating::RatingBadge;
use crate::types::Recommendation;

pub const APP_NAME: &str = "SmartDine";
pub const LOADING_MESSAGE: &str = "Finding the perfect dish for you…";
pub const NO_MATCHES_MESSAGE: &str =
    "No matching recommendations found. Try rephrasing your craving.";
pub const PROMPT_MESSAGE: &str = "Start by telling SmartDine what you’re craving.";

/// What the results area shows. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState<'a> {
    Loading,
    Error(&'a str),
    NoMatches,
    Prompt,
    Results(&'a [Recommendation]),
}

/// Small label under a card's explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Bestseller,
    BudgetFriendly,
}

impl Tag {
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Bestseller => "Bestseller",
            Tag::BudgetFriendly => "Budget-friendly",
        }
    }
}

/// Everything needed to draw one recommendation card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView<'a> {
    pub title: &'a str,
    pub restaurant: &'a str,
    pub badge: RatingBadge,
    pub explanation: &'a str,
    pub tags: Vec<Tag>,
}

impl<'a> CardView<'a> {
    pub fn new(rec: &'a Recommendation) -> Self {
        let mut tags = Vec::new();
        if rec.is_bestseller {
            tags.push(Tag::Bestseller);
        }
        if !rec.is_expensive {
            tags.push(Tag::BudgetFriendly);
        }

        Self {
            title: &rec.item_name,
            restaurant: &rec.restaurant_name,
            badge: RatingBadge::from_rating(rec.rating),
            explanation: &rec.explanation,
            tags,
        }
    }
}

impl<'a> From<&'a Recommendation> for CardView<'a> {
    fn from(rec: &'a Recommendation) -> Self {
        CardView::new(rec)
    }
}
