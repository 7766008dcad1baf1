use crossterm::style::{Color, Stylize};

use crate::shared::constants;

pub struct BannerInfo<'a> {
    pub program: &'a str,
    pub description: &'a str,
    pub author: &'a str,
    pub project_link: &'a str,
    pub author_link: &'a str,
}

impl BannerInfo<'static> {
    pub fn current() -> Self {
        Self {
            program: concat!("V2I v", env!("CARGO_PKG_VERSION")),
            description: constants::APP_DESCRIPTION,
            author: constants::APP_AUTHOR,
            project_link: constants::PROJECT_LINK,
            author_link: constants::AUTHOR_LINK,
        }
    }
}

/// Boxed, colored info block. Returns the lines and the inner width of the box.
pub fn render(info: &BannerInfo<'_>) -> (Vec<String>, usize) {
    let rows = [
        (info.program.to_string(), Color::Cyan),
        (info.description.to_string(), Color::White),
        (format!("Author: {}", info.author), Color::Green),
        (format!("Project: {}", info.project_link), Color::Blue),
        (format!("Homepage: {}", info.author_link), Color::Magenta),
    ];

    let width = rows.iter().map(|(text, _)| text.chars().count()).max().unwrap_or(0) + 2;
    let border = format!("+{}+", "-".repeat(width));

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(border.clone());
    for (text, color) in rows {
        let pad = width - 2 - text.chars().count();
        lines.push(format!("| {}{} |", text.with(color), " ".repeat(pad)));
    }
    lines.push(border);

    (lines, width)
}

pub fn print(info: &BannerInfo<'_>) -> usize {
    let (lines, width) = render(info);
    for line in lines {
        println!("{}", line);
    }
    width
}

/// Full-width rule printed between videos.
pub fn separator(width: usize) -> String {
    "=".repeat(width + 2)
}
