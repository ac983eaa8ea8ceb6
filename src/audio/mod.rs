pub mod buffer;
pub mod decode;
pub mod envelope;
pub mod filter;
pub mod loudness;
pub mod spectral;
