mod display_context;
mod gpu_context;
mod input_adapter;
mod surface_renderer;
mod timer;

pub use display_context::DisplayContext;
pub use gpu_context::GpuContext;
pub use input_adapter::{is_quit_key, ArcballController, DragMode};
pub use surface_renderer::{EguiFrame, SurfaceRenderer};
pub use timer::{FixedHz, FpsCounter, FrameClock};
