#[cfg(feature = "completion")]
pub mod html_completion;
#[cfg(feature = "outlining")]
pub mod html_outlining;
#[cfg(feature = "validation")]
pub mod html_validation;
