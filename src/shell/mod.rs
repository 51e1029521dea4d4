//! Display shell: where indicator handles are shown
//!
//! The core never looks inside a display handle. A shell mounts the handles
//! once, re-renders them after every tick and reports user actions back as
//! [`ShellEvent`]s.

mod commands;
mod terminal;

pub use commands::{parse_command, spawn_stdin_commands};
pub use terminal::{ansi_color, TerminalShell};

use mm_core::DisplayHandle;
use mm_types::GlobalSettings;

/// User action reported by a shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// The overlay was moved to a new position
    Moved { x: i32, y: i32 },
    Quit,
}

/// Something that can display indicator handles
pub trait DisplayShell {
    /// Take ownership of the handles, in configured order, at `position`
    fn mount(
        &mut self,
        handles: Vec<DisplayHandle>,
        position: (i32, i32),
        settings: &GlobalSettings,
    ) -> std::io::Result<()>;

    /// Show the handles' current contents
    fn render(&mut self) -> std::io::Result<()>;

    /// Position changed on the user's request
    fn move_to(&mut self, x: i32, y: i32);
}
