pub mod loader;
pub mod resample;
pub mod resize;
