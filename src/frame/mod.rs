pub mod fit;
pub mod source;
