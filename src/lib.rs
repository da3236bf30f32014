pub mod clipboard;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod prefs;
pub mod projects;
pub mod terminal;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
