pub mod menu;
pub mod prompt;
