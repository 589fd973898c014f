pub mod package;
pub mod text;
pub mod xml;
