pub mod document;
pub mod enums;
pub mod question;

pub use document::*;
pub use enums::*;
pub use question::*;
