pub mod command;
pub mod editor_state;
pub mod file_handle;
pub mod registry;
