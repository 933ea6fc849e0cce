pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod math;
pub mod render;
pub mod transfer_function;
pub mod ui;
pub mod viewer;
pub mod volume;

pub use camera::{ArcballCamera, CameraCommand, CameraPose};
pub use config::ViewerConfig;
pub use error::VolumeError;
pub use viewer::Viewer;
pub use volume::Volume;
