pub mod span;
pub mod text_buffer;
