//! JSON config files for the command-line tools.
pub mod lines;
pub mod shapes;

pub use lines::{load_line_tool_config, LineToolConfig};
pub use shapes::{load_shape_tool_config, ShapeToolConfig};
