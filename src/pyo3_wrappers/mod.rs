pub mod text_methods;
#[cfg(feature = "python")]
pub mod wrappers;
