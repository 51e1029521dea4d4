//! Terminal shell: the indicator row on a single, redrawn line

use super::DisplayShell;
use mm_core::{DisplayHandle, Rgb, StackBar};
use mm_types::GlobalSettings;
use std::io::Write;

/// Width of a bar handle, in cells
const BAR_WIDTH: u32 = 10;
const SEPARATOR: &str = "  ";
const RESET: &str = "\x1b[0m";

/// ANSI foreground code for a color name
pub fn ansi_color(name: &str) -> Option<&'static str> {
    let code = match name.to_ascii_lowercase().as_str() {
        "black" => "\x1b[30m",
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        _ => return None,
    };
    Some(code)
}

fn rgb_fg(color: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", color.0, color.1, color.2)
}

/// Shell writing to a terminal (or any writer)
pub struct TerminalShell<W: Write> {
    out: W,
    handles: Vec<DisplayHandle>,
    position: (i32, i32),
    color: Option<&'static str>,
    live: bool,
}

impl<W: Write> TerminalShell<W> {
    /// `live` redraws one line in place; otherwise each render is a new line
    pub fn new(out: W, live: bool) -> Self {
        Self {
            out,
            handles: Vec::new(),
            position: (0, 0),
            color: None,
            live,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    /// The row as plain text
    pub fn line(&self) -> String {
        self.compose(false)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn compose(&self, colored: bool) -> String {
        let parts: Vec<String> = self
            .handles
            .iter()
            .map(|handle| match handle {
                DisplayHandle::Label(label) => match (colored, self.color) {
                    (true, Some(code)) => format!("{}{}{}", code, label.text(), RESET),
                    _ => label.text(),
                },
                DisplayHandle::Bar(bar) => draw_bar(bar, colored),
            })
            .collect();
        parts.join(SEPARATOR)
    }
}

/// `[#####     ]`, each layer in its own color when `colored`
fn draw_bar(bar: &StackBar, colored: bool) -> String {
    let mut cells = String::from("[");
    let mut filled = 0;
    for (_, len, color) in bar.layer_extents(BAR_WIDTH) {
        if len == 0 {
            continue;
        }
        let segment = "#".repeat(len as usize);
        if colored {
            cells.push_str(&rgb_fg(color));
            cells.push_str(&segment);
            cells.push_str(RESET);
        } else {
            cells.push_str(&segment);
        }
        filled += len;
    }
    cells.push_str(&" ".repeat(BAR_WIDTH.saturating_sub(filled) as usize));
    cells.push(']');
    cells
}

impl<W: Write> DisplayShell for TerminalShell<W> {
    fn mount(
        &mut self,
        handles: Vec<DisplayHandle>,
        position: (i32, i32),
        settings: &GlobalSettings,
    ) -> std::io::Result<()> {
        self.color = ansi_color(&settings.color);
        if self.color.is_none() {
            log::warn!("Unknown color {:?}, rendering uncolored", settings.color);
        }
        self.handles = handles;
        self.position = position;
        log::info!(
            "Mounted {} indicator(s) at ({}, {})",
            self.handles.len(),
            position.0,
            position.1
        );
        Ok(())
    }

    fn render(&mut self) -> std::io::Result<()> {
        let line = self.compose(true);
        if self.live {
            write!(self.out, "\r\x1b[K{}", line)?;
        } else {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{BarLayer, TextLabel};

    fn settings(color: &str) -> GlobalSettings {
        GlobalSettings {
            color: color.to_string(),
        }
    }

    #[test]
    fn test_ansi_color() {
        assert_eq!(ansi_color("blue"), Some("\x1b[34m"));
        assert_eq!(ansi_color("Red"), Some("\x1b[31m"));
        assert_eq!(ansi_color("#0000ff"), None);
    }

    #[test]
    fn test_line_joins_handles_in_order() {
        let cpu = TextLabel::new();
        let bar = StackBar::new();
        cpu.set_text("CPU  12%");
        bar.set_layers(vec![BarLayer {
            value: 40.0,
            color: Rgb::GREEN,
        }]);

        let mut shell = TerminalShell::new(Vec::new(), false);
        shell
            .mount(
                vec![DisplayHandle::Label(cpu), DisplayHandle::Bar(bar)],
                (400, 400),
                &settings("blue"),
            )
            .unwrap();
        assert_eq!(shell.line(), "CPU  12%  [####      ]");
    }

    #[test]
    fn test_render_colors_labels() {
        let label = TextLabel::new();
        label.set_text("MEM  50%");
        let mut shell = TerminalShell::new(Vec::new(), false);
        shell
            .mount(vec![DisplayHandle::Label(label.clone())], (0, 0), &settings("red"))
            .unwrap();
        shell.render().unwrap();
        label.set_text("MEM  51%");
        shell.render().unwrap();

        let out = String::from_utf8(shell.into_inner()).unwrap();
        assert_eq!(out, "\x1b[31mMEM  50%\x1b[0m\n\x1b[31mMEM  51%\x1b[0m\n");
    }

    #[test]
    fn test_unknown_color_renders_plain() {
        let label = TextLabel::new();
        label.set_text("x");
        let mut shell = TerminalShell::new(Vec::new(), true);
        shell
            .mount(vec![DisplayHandle::Label(label)], (0, 0), &settings("teal"))
            .unwrap();
        shell.render().unwrap();
        assert_eq!(String::from_utf8(shell.into_inner()).unwrap(), "\r\x1b[Kx");
    }

    #[test]
    fn test_move_to() {
        let mut shell = TerminalShell::new(Vec::new(), true);
        shell.move_to(5, 6);
        assert_eq!(shell.position(), (5, 6));
    }
}
