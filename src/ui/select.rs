use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Row, Table, Widget},
};

use super::{bold, column, muted, COLUMN_WIDTH, PRIMARY};
use crate::app::App;

/// Pick a fare and activate it
pub struct SelectScreen<'a> {
    app: &'a App,
}

impl<'a> SelectScreen<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn header(&self) -> Paragraph<'a> {
        let app = self.app;
        let cfg = &app.config;
        Paragraph::new(vec![
            Line::from(Span::styled(cfg.agency_name.as_str(), bold())),
            Line::from(Span::styled(cfg.agency_full_name.as_str(), muted())),
        ])
        .alignment(Alignment::Center)
    }

    fn options(&self) -> Table<'a> {
        let selected = self.app.session.selected_pass();
        let rows = self
            .app
            .session
            .catalog()
            .offered()
            .iter()
            .enumerate()
            .map(|(i, pass)| {
                let marker = if *pass == selected { "▶" } else { " " };
                let row = Row::new(vec![
                    Line::from(format!("{marker} {}. {}", i + 1, pass.name())),
                    Line::from(format!("Valid for {}", pass.duration_label())),
                    Line::from(pass.price_label()).alignment(Alignment::Right),
                ]);
                if *pass == selected {
                    row.style(bold().fg(Color::White).bg(PRIMARY))
                } else {
                    row
                }
            });

        Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Fill(1),
                Constraint::Length(7),
            ],
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Line::from(" Select Pass Type ").centered())
                .padding(Padding::horizontal(1)),
        )
    }

    fn fare_card(&self) -> Paragraph<'a> {
        let app = self.app;
        let pass = app.session.selected_pass();
        Paragraph::new(vec![
            Line::from(Span::styled(
                format!("Regional Full Fare {}", pass.name()),
                bold(),
            )),
            Line::from(Span::styled(
                format!("Valid for {} from activation", pass.duration_label()),
                muted(),
            )),
            Line::from(app.config.region.as_str()),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1)),
        )
    }

    fn button(&self) -> Paragraph<'a> {
        Paragraph::new(Line::from(format!(
            "Activate {}",
            self.app.session.selected_pass().name()
        )))
        .style(
            Style::default()
                .fg(Color::White)
                .bg(PRIMARY)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::vertical(1)))
    }

    fn legend(&self) -> Paragraph<'a> {
        let text = if self.app.session.catalog().has_choice() {
            "(↑↓/1-4) choose / (enter) activate / (q)uit"
        } else {
            "(enter) activate / (q)uit"
        };
        Paragraph::new(Span::styled(
            text,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
    }
}

impl Widget for SelectScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = column(area, COLUMN_WIDTH);
        let choice = self.app.session.catalog().has_choice();
        let list_height = if choice {
            self.app.session.catalog().offered().len() as u16 + 2
        } else {
            0
        };

        let chunks = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),           // header
            Constraint::Length(1),           // padding
            Constraint::Length(list_height), // pass list
            Constraint::Length(u16::from(choice)),
            Constraint::Length(5), // fare card
            Constraint::Length(1),
            Constraint::Length(3), // activate button
            Constraint::Length(1),
            Constraint::Length(1), // legend
            Constraint::Fill(1),
        ])
        .split(area);

        self.header().render(chunks[1], buf);
        if choice {
            self.options().render(chunks[3], buf);
        }
        self.fare_card().render(chunks[5], buf);
        self.button().render(chunks[7], buf);
        self.legend().render(chunks[9], buf);
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::pass::{PassCatalog, PassType};
    use crate::ui::buffer_lines;
    use crate::App;
    use chrono::Utc;
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
    use std::sync::{mpsc, Arc};

    fn render(config: Config, pick: Option<PassType>) -> Vec<String> {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(config, Arc::new(FixedClock::new(Utc::now())), tx);
        if let Some(p) = pick {
            app.select_pass(p);
        }
        let area = Rect::new(0, 0, 60, 28);
        let mut buffer = Buffer::empty(area);
        super::SelectScreen::new(&app).render(area, &mut buffer);
        buffer_lines(&buffer)
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn test_lists_every_pass_with_price() {
        let lines = render(Config::default(), None);
        assert!(contains(&lines, "DART"));
        assert!(contains(&lines, "Detroit Area Regional Transportation"));
        assert!(contains(&lines, "Select Pass Type"));
        for pass in PassType::ALL {
            assert!(contains(&lines, pass.price_label()), "{pass} missing");
            assert!(contains(
                &lines,
                &format!("Valid for {}", pass.duration_label())
            ));
        }
    }

    #[test]
    fn test_card_and_button_follow_selection() {
        let lines = render(Config::default(), Some(PassType::ThirtyOneDay));
        assert!(contains(&lines, "Regional Full Fare 31 Day"));
        assert!(contains(&lines, "Valid for 31 days from activation"));
        assert!(contains(&lines, "Activate 31 Day"));
        assert!(contains(&lines, "▶ 4. 31 Day"));
    }

    #[test]
    fn test_single_catalog_hides_list() {
        let config = Config {
            catalog: PassCatalog::Single,
            ..Config::default()
        };
        let lines = render(config, None);
        assert!(!contains(&lines, "Select Pass Type"));
        assert!(contains(&lines, "Regional Full Fare 4 Hour"));
        assert!(contains(&lines, "Activate 4 Hour"));
    }

    #[test]
    fn test_region_from_config() {
        let config = Config {
            region: "Ann Arbor, MI".into(),
            ..Config::default()
        };
        let lines = render(config, None);
        assert!(contains(&lines, "Ann Arbor, MI"));
    }
}
