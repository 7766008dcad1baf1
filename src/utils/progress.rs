use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use std::io::{self, Write};

const BAR_WIDTH: usize = 30;

/// Single-line progress bar on stderr. Silent when stderr is redirected.
pub struct Progress {
    label: String,
    total: usize,
    current: usize,
    visible: bool,
}

impl Progress {
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        Self {
            label: label.into(),
            total,
            current: 0,
            visible: io::stderr().is_tty(),
        }
    }

    pub fn hidden(label: impl Into<String>, total: usize) -> Self {
        Self { visible: false, ..Self::new(label, total) }
    }

    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn inc(&mut self) {
        self.current = (self.current + 1).min(self.total);
        self.draw();
    }

    pub fn finish(&mut self) {
        if self.visible {
            let _ = writeln!(io::stderr());
        }
    }

    fn draw(&self) {
        if !self.visible {
            return;
        }
        let line = format!("{} {} {}/{}", self.label, render_bar(self.current, self.total), self.current, self.total);
        let mut err = io::stderr();
        let _ = queue!(err, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(line));
        let _ = err.flush();
    }
}

fn render_bar(current: usize, total: usize) -> String {
    let filled = if total == 0 { BAR_WIDTH } else { current * BAR_WIDTH / total };
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
