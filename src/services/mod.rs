// Boundary collaborators: roster ingestion and output rendering
pub mod render;
pub mod roster;

pub use render::{escape_cell, markdown_filename, render_console, render_markdown, to_rendered, write_round_markdown};
pub use roster::{read_roster, read_roster_from, RosterError};
