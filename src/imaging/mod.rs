pub mod crop;

pub use crop::crop_and_resize;
