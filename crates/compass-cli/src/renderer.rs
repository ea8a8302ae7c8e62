//! Terminal rendering module for rich markdown output
//!
//! Rich markdown display via termimad, with a plain-text fallback for
//! `--no-color` and non-interactive use.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        // Cyan structure, green emphasis, dim muted italics. Command
        // snippets get their own foreground so they stand out inside
        // step text.
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Green);
        skin.italic.set_fg(Color::AnsiValue(245));
        skin.inline_code.set_fg(Color::Yellow);
        skin.inline_code.set_bg(Color::AnsiValue(235));
        skin.code_block.set_bg(Color::AnsiValue(235));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            // Render line by line, keeping the hash symbols on headers so
            // session and step IDs stay copy-pastable
            for line in markdown.lines() {
                if line.starts_with('#') {
                    println!("\x1b[1;36m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
