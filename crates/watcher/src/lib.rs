//! Terminal front end for the cell lottery.
//!
//! Renders the board to text and keeps user preferences in a TOML file.

pub mod preferences;
pub mod render;

pub use preferences::FilePreferences;
pub use render::render_board;
