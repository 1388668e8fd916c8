//! Question segmentation.
//!
//! Raw OCR text → ordered `QuestionUnit`s with normalised major numbers.
//! Degraded input never errors: empty text gives no units, a document with
//! no markers gives a single group.

pub mod markers;
pub mod noise;
pub mod normalize;
pub mod segmenter;

pub use segmenter::{segment, Segmenter};
