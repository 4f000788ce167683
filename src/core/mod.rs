pub mod integrate;
pub mod parsing;
