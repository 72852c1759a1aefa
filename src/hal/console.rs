//! Text renderer for terminals and logs.
//!
//! Prints each frame as a small block: status strip, clock, date and the three
//! departure columns side by side.
//!
//! ```text
//! [!] * -45
//! 08:30
//! Wednesday
//! 3 September
//! 5 min          | 12 min | canc.
//! 08:35          | 08:42  | 08:50
//! LST to CBG (4)
//! ```

use std::io::{self, Write};

use crate::format::{BatteryAlert, Frame, Indicators};
use crate::traits::Renderer;

/// Renderer writing plain text to any `io::Write`.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    indicators: Indicators,
    connected: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Create a renderer writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            indicators: Indicators::default(),
            connected: true,
        }
    }

    /// Consume the renderer, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn status_line(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.connected {
            parts.push("(no phone)");
        }
        if self.indicators.request_failed {
            parts.push("[!]");
        }
        match self.indicators.battery {
            BatteryAlert::Critical => parts.push("**"),
            BatteryAlert::Low => parts.push("*"),
            BatteryAlert::None => {}
        }
        if !self.indicators.clock_offset.is_empty() {
            parts.push(self.indicators.clock_offset.as_str());
        }
        parts.join(" ")
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        let status = self.status_line();
        writeln!(self.out, "{status}")?;
        writeln!(self.out, "{}", frame.clock)?;
        writeln!(self.out, "{}", frame.date)?;

        let columns: Vec<Vec<&str>> = (0..3)
            .map(|i| frame.train_text(i).lines().collect())
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .map(|c| c.iter().map(|l| l.chars().count()).max().unwrap_or(0))
            .collect();
        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

        for row in 0..rows {
            let cells: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(col, width)| format!("{:<width$}", col.get(row).copied().unwrap_or("")))
                .collect();
            let line = cells.join(" | ");
            writeln!(self.out, "{}", line.trim_end_matches(|c: char| c == ' ' || c == '|'))?;
        }
        self.out.flush()
    }

    fn render_indicators(&mut self, indicators: &Indicators) -> io::Result<()> {
        self.indicators = indicators.clone();
        Ok(())
    }

    fn set_connected(&mut self, connected: bool) -> io::Result<()> {
        self.connected = connected;
        if !connected {
            writeln!(self.out, "phone disconnected")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::truncated;

    #[test]
    fn renders_columns_side_by_side() {
        let frame = Frame {
            clock: truncated("08:30"),
            date: truncated("Wednesday\n3 September"),
            next_train: truncated("5 min\n08:35\nLST to CBG (4)"),
            later_trains: [truncated("12 min\n08:42\n"), truncated("canc.\n08:50\n")],
            cancelled: [false, false, true],
        };
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer
            .render_indicators(&Indicators {
                battery: BatteryAlert::Low,
                request_failed: true,
                clock_offset: truncated("-45"),
            })
            .unwrap();
        renderer.render(&frame).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[!] * -45");
        assert_eq!(lines[1], "08:30");
        assert_eq!(lines[2], "Wednesday");
        assert_eq!(lines[3], "3 September");
        assert_eq!(lines[4], "5 min          | 12 min | canc.");
        assert_eq!(lines[5], "08:35          | 08:42  | 08:50");
        assert_eq!(lines[6], "LST to CBG (4)");
    }

    #[test]
    fn reports_disconnect() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.set_connected(false).unwrap();
        renderer.render(&Frame::default()).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.starts_with("phone disconnected\n(no phone)\n"));
    }
}
