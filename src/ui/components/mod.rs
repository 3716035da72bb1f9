pub mod chat_panel;
pub mod exercise_area;
pub mod menu;
pub mod progress_bar;
pub mod quiz_panel;
pub mod results_panel;
pub mod sidebar;
pub mod summary_panel;
