pub mod analysis;
pub mod decode;
pub mod features;
pub mod pitch;
pub mod rhythm;
pub mod spectrum;
pub mod vocal;
