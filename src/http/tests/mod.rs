mod first_line_test;
mod headers_test;

pub use string_writter::*;
