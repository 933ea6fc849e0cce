// ui - egui panels drawn over the rendered image
mod control_panel;
mod transfer_function_widget;

pub use control_panel::{ControlPanel, PanelAction, PanelStats};
pub use transfer_function_widget::{TransferFunctionWidget, COLORMAP_SIZE};
