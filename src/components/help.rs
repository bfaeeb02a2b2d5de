use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 60 / 100;
        let popup_height = (area.height * 70 / 100).min(22);
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let entry = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(key, Style::default().fg(THEME.text_accent)),
                Span::styled(desc, Style::default().fg(THEME.text)),
            ])
        };
        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            ))
        };

        let help_text = vec![
            section("Views"),
            entry("  1        ", "Overview"),
            entry("  2        ", "Mint Property"),
            entry("  3        ", "Query Property"),
            Line::from(""),
            section("Wallet & Contract"),
            entry("  c        ", "Connect wallet (overview)"),
            entry("  r        ", "Refresh pause state (overview)"),
            entry("  u        ", "Unpause contract (overview, while paused)"),
            Line::from(""),
            section("Forms"),
            entry("  e / i    ", "Edit fields"),
            entry("  Tab      ", "Next field"),
            entry("  Enter    ", "Submit"),
            entry("  Esc      ", "Stop editing"),
            Line::from(""),
            section("Other"),
            entry("  ?        ", "Toggle this help"),
            entry("  q        ", "Quit"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
