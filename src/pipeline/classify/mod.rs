pub mod annotate;
pub mod normalize;
pub mod scorer;

pub use annotate::{detect_format, detect_resources, is_current_affairs};
pub use normalize::fold_width;
pub use scorer::FieldClassifier;
