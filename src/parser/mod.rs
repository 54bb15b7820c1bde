// Parsers for the small string formats found in payloads and on the command line

pub mod color;
pub mod lexer;

// Public API re-exports
pub use color::parse_color;
pub use lexer::parse_size;
