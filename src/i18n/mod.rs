//! Supported languages and every localized string shown to the user.

mod language;
mod strings;

pub use language::{Language, SUPPORTED_LANGUAGES, TextDirection, print_languages};
pub use strings::Strings;
