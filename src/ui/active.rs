use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget},
};

use super::{bold, column, muted, COLUMN_WIDTH, PRIMARY};
use crate::app::App;

const BADGE_WIDTH: u16 = 18;
const BADGE_HEIGHT: u16 = 7;

/// The pass shown to the operator: live clock plus expiry
pub struct ActiveScreen<'a> {
    app: &'a App,
}

impl<'a> ActiveScreen<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn header(&self, area: Rect, buf: &mut Buffer) {
        let app = self.app;
        let [title, close] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(7)]).areas(area);

        Paragraph::new(vec![
            Line::from(Span::styled(app.config.agency_name.as_str(), bold())),
            Line::from("Show operator your ticket"),
        ])
        .render(title, buf);

        Paragraph::new(vec![
            Line::from(Span::styled("✕", bold())),
            Line::from(Span::styled("(esc)", muted())),
        ])
        .alignment(Alignment::Right)
        .render(close, buf);
    }

    /// Ring badge standing in for the agency logo
    fn badge(&self, area: Rect, buf: &mut Buffer) {
        let ring = column(area, BADGE_WIDTH);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(PRIMARY))
            .padding(Padding::uniform(1));
        let inner = block.inner(ring);
        block.render(ring, buf);

        let [_, logo, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);
        Paragraph::new(Span::styled(
            self.app.config.agency_name.as_str(),
            bold().fg(Color::White).bg(PRIMARY),
        ))
        .alignment(Alignment::Center)
        .render(logo, buf);
    }

    fn clock(&self) -> Paragraph<'a> {
        let reading = self.app.current_time();
        Paragraph::new(Line::from(vec![
            Span::styled(reading.time, bold()),
            Span::raw(" "),
            Span::styled(reading.period, bold()),
        ]))
        .alignment(Alignment::Center)
    }

    fn fare_card(&self) -> Paragraph<'a> {
        let app = self.app;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Regional Full Fare {}", app.session.selected_pass().name()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(app.config.region.as_str(), muted())),
        ];
        if let Some(expiry) = app.expiry_label() {
            lines.push(Line::from(format!("Expires {expiry}")));
        }
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1)),
        )
    }
}

impl Widget for ActiveScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = column(area, COLUMN_WIDTH);
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2), // header
            Constraint::Fill(1),
            Constraint::Length(BADGE_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1), // clock
            Constraint::Length(1),
            Constraint::Length(5), // fare card
            Constraint::Fill(1),
        ])
        .split(area);

        self.header(chunks[1], buf);
        self.badge(chunks[3], buf);
        self.clock().render(chunks[5], buf);
        self.fare_card().render(chunks[7], buf);
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::{Clock, FixedClock, Tick};
    use crate::config::Config;
    use crate::pass::PassType;
    use crate::runtime::PassEvent;
    use crate::ui::buffer_lines;
    use crate::App;
    use chrono::{TimeDelta, TimeZone, Utc};
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
    use std::sync::{mpsc, Arc};

    fn detroit_app(clock: Arc<FixedClock>) -> App {
        let (tx, _rx) = mpsc::channel();
        let config = Config {
            timezone: Some("America/Detroit".into()),
            tick_interval_ms: 60_000,
            ..Config::default()
        };
        App::new(config, clock, tx)
    }

    fn render(app: &App) -> Vec<String> {
        let area = Rect::new(0, 0, 60, 30);
        let mut buffer = Buffer::empty(area);
        super::ActiveScreen::new(app).render(area, &mut buffer);
        buffer_lines(&buffer)
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn test_active_pass_contents() {
        // 10:00 AM in Detroit
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap(),
        ));
        let mut app = detroit_app(clock);
        app.select_pass(PassType::TwentyFourHour);
        app.activate();

        let lines = render(&app);
        assert!(contains(&lines, "DART"));
        assert!(contains(&lines, "Show operator your ticket"));
        assert!(contains(&lines, "✕"));
        assert!(contains(&lines, "10:00:00 AM"));
        assert!(contains(&lines, "Regional Full Fare 24 Hour"));
        assert!(contains(&lines, "Detroit, MI"));
        assert!(contains(&lines, "Expires Jan 16, 2024 at 10:00 AM"));
    }

    #[test]
    fn test_thirty_one_day_from_midnight() {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap(),
        ));
        let mut app = detroit_app(clock);
        app.select_pass(PassType::ThirtyOneDay);
        app.activate();

        let lines = render(&app);
        assert!(contains(&lines, "12:00:00 AM"));
        assert!(contains(&lines, "Expires Apr 1, 2024 at 12:00 AM"));
    }

    #[test]
    fn test_clock_line_refreshes_on_tick() {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 13, 15, 0).unwrap(),
        ));
        let mut app = detroit_app(clock.clone());
        app.activate();
        clock.advance(TimeDelta::seconds(42));
        app.on_event(PassEvent::Tick(Tick {
            generation: app.live_clock.generation(),
            at: clock.now(),
        }));

        let lines = render(&app);
        assert!(contains(&lines, "9:15:42 AM"));
        // expiry is anchored to activation, not to the clock
        assert!(contains(&lines, "Expires Jun 1, 2024 at 1:15 PM"));
    }

    #[test]
    fn test_inactive_session_has_no_expiry_line() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let app = detroit_app(clock);
        let lines = render(&app);
        assert!(!contains(&lines, "Expires"));
    }
}
