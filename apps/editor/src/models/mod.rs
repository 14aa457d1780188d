pub mod dates;
pub mod document;
pub mod resume;
