pub mod components;
pub mod layout;
pub mod line_input;
pub mod text_entry;
pub mod theme;
