pub mod digest;
pub mod zip;
