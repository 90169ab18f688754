//! Progress messages printed while a sprite is created
use std::{
    fmt::Display,
    io::{IsTerminal, Write},
};

use chameleon_sprite::Report;

const GREY: &str = "\x1b[90m";
const GREEN: &str = "\x1b[32m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

const RAINBOW: [(&str, (u8, u8, u8)); 9] = [
    ("Modifying ", (0xFF, 0xBE, 0x5E)),
    ("the ", (0xFF, 0xF2, 0x5E)),
    ("sprite ", (0xA3, 0xFF, 0x5E)),
    ("to ", (0x5E, 0xFF, 0x8B)),
    ("become ", (0x5E, 0xF5, 0xFF)),
    ("an ", (0x6E, 0x8E, 0xFF)),
    ("adaptable ", (0xAE, 0x5E, 0xFF)),
    ("chameleon ", (0xFF, 0x5E, 0xDB)),
    ("...", (0xFF, 0x5E, 0x84)),
];

/// Writes progress to the console, keeping standard output free for any results.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<std::io::Stderr> {
    /// Creates a console writing to standard error, colored only when it's a terminal
    pub fn stderr() -> Self {
        let out = std::io::stderr();
        let color = out.is_terminal();
        Self::new(out).with_color(color)
    }
}

impl<W: Write> Console<W> {
    /// Creates a console writing plain text to the given sink
    pub fn new(out: W) -> Self {
        Self { out, color: false }
    }

    /// Sets whether lines are colored with ANSI escapes
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.color {
            code
        } else {
            ""
        }
    }

    /// Returns the sink written to
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints a dimmed line of progress
    pub fn progress(&mut self, message: impl Display) {
        let (grey, reset) = (self.paint(GREY), self.paint(RESET));
        self.line(format_args!("{grey}{message}{reset}"));
    }

    /// Prints a line dividing each stage
    pub fn separator(&mut self) {
        self.progress("-------------------------------");
    }

    /// Prints the number of icons found
    pub fn found(&mut self, count: usize) {
        let (grey, green, reset) = (self.paint(GREY), self.paint(GREEN), self.paint(RESET));
        self.line(format_args!(
            "{grey}Found {green}{count}{grey} SVGs.{reset}"
        ));
    }

    /// Prints the announcement of the variables being injected
    pub fn modifying(&mut self) {
        let words = RAINBOW
            .iter()
            .map(|(word, (r, g, b))| {
                if self.color {
                    format!("\x1b[38;2;{r};{g};{b}m{word}")
                } else {
                    (*word).to_string()
                }
            })
            .collect::<String>();
        let reset = self.paint(RESET);
        self.line(format_args!("{words}{reset}"));
    }

    /// Prints the number of attributes given variables, skipping any kind that had none
    pub fn injected(&mut self, report: &Report) {
        let (grey, green, reset) = (self.paint(GREY), self.paint(GREEN), self.paint(RESET));
        if report.colors > 0 {
            self.line(format_args!(
                "{grey}Injected color variables into {green}{}{grey} attributes.{reset}",
                report.colors
            ));
        }
        if report.stroke_widths > 0 {
            self.line(format_args!(
                "{grey}Injected stroke-width variables into {green}{}{grey} attributes.{reset}",
                report.stroke_widths
            ));
        }
    }

    /// Prints the final message of a successful run
    pub fn complete(&mut self) {
        let (bold_green, reset) = (self.paint(BOLD_GREEN), self.paint(RESET));
        self.line(format_args!("{bold_green}Task complete!{reset}"));
    }

    fn line(&mut self, message: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{message}") {
            log::debug!("failed to write to console: {err}");
        }
    }
}
