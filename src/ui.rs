pub mod active;
pub mod select;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Clear, Widget},
    Frame,
};

use crate::app::{App, Layer};

/// Width of the centered "phone screen" column
pub const COLUMN_WIDTH: u16 = 48;

/// Agency blue used for the badge ring and selection
pub const PRIMARY: Color = Color::Rgb(0x1c, 0x33, 0x7e);

pub fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}

/// Horizontally centered column no wider than `width`
pub fn column(area: Rect, width: u16) -> Rect {
    Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area)[1]
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for layer in self.layers() {
            match layer {
                Layer::Select => select::SelectScreen::new(self).render(area, buf),
                Layer::Active => {
                    // full-screen overlay: nothing from below may show through
                    Clear.render(area, buf);
                    active::ActiveScreen::new(self).render(area, buf);
                }
            }
        }
    }
}

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

/// Rows of a rendered buffer as plain strings
#[cfg(test)]
pub(crate) fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{Config, Presentation};
    use chrono::{TimeZone, Utc};
    use std::sync::{mpsc, Arc};

    fn test_app(presentation: Presentation) -> App {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 13, 15, 0).unwrap(),
        ));
        let (tx, _rx) = mpsc::channel();
        let config = Config {
            presentation,
            timezone: Some("America/Detroit".into()),
            tick_interval_ms: 60_000,
            ..Config::default()
        };
        App::new(config, clock, tx)
    }

    fn render(app: &App) -> Vec<String> {
        let area = Rect::new(0, 0, 60, 32);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer_lines(&buffer)
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn test_column_is_centered() {
        let col = column(Rect::new(0, 0, 100, 10), 40);
        assert_eq!(col.width, 40);
        assert_eq!(col.x, 30);
        let narrow = column(Rect::new(0, 0, 20, 10), 40);
        assert_eq!(narrow.width, 20);
    }

    #[test]
    fn test_overlay_hides_select_screen() {
        let mut app = test_app(Presentation::Overlay);
        app.select_pass(crate::pass::PassType::SevenDay);
        app.activate();
        let lines = render(&app);
        assert!(contains(&lines, "Show operator your ticket"));
        assert!(contains(&lines, "Expires Jun 8, 2024 at 9:15 AM"));
        assert!(!contains(&lines, "Select Pass Type"));
    }

    #[test]
    fn test_inline_renders_active_only() {
        let mut app = test_app(Presentation::Inline);
        app.activate();
        let lines = render(&app);
        assert!(contains(&lines, "9:15:00 AM"));
        assert!(!contains(&lines, "Select Pass Type"));
    }

    #[test]
    fn test_reset_returns_to_select_screen() {
        let mut app = test_app(Presentation::Overlay);
        app.activate();
        app.reset();
        let lines = render(&app);
        assert!(contains(&lines, "Select Pass Type"));
        assert!(!contains(&lines, "Show operator your ticket"));
    }

    #[test]
    fn test_draw_through_terminal() {
        use ratatui::{backend::TestBackend, Terminal};

        let app = test_app(Presentation::Overlay);
        let backend = TestBackend::new(60, 32);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        let lines = buffer_lines(terminal.backend().buffer());
        assert!(contains(&lines, "Activate 4 Hour"));
    }
}
