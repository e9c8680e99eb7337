//! Shared types for the cold-start rating pipeline: the three-class label,
//! the predicted-rating column, and per-label summaries.

pub mod labeled;
pub mod rating;

pub use labeled::{PREDICTED_RATING, proportions, rating_counts, with_predictions};
pub use rating::{Rating, UnknownRating};
