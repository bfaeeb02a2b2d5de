use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::events::AppEvent;
use crate::theme::THEME;

const FIELDS: &[&str] = &["Recipient (address)", "Token URI"];

/// Mint form: recipient address and token URI. Field contents survive
/// submission; a successful mint does not clear them.
pub struct MintForm {
    pub to: String,
    pub uri: String,
    pub editing: bool,
    current_field: usize,
}

impl MintForm {
    pub fn new() -> Self {
        Self {
            to: String::new(),
            uri: String::new(),
            editing: false,
            current_field: 0,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        if self.current_field == 0 {
            &mut self.to
        } else {
            &mut self.uri
        }
    }

    fn submit(&self) -> Option<AppEvent> {
        Some(AppEvent::MintRequested {
            to: self.to.clone(),
            uri: self.uri.clone(),
        })
    }
}

impl Component for MintForm {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.editing {
            match key.code {
                KeyCode::Esc => {
                    self.editing = false;
                    None
                }
                KeyCode::Tab => {
                    self.current_field = (self.current_field + 1) % FIELDS.len();
                    None
                }
                KeyCode::BackTab => {
                    self.current_field = if self.current_field == 0 {
                        FIELDS.len() - 1
                    } else {
                        self.current_field - 1
                    };
                    None
                }
                KeyCode::Enter => {
                    self.editing = false;
                    self.submit()
                }
                KeyCode::Char(c) => {
                    self.field_mut().push(c);
                    None
                }
                KeyCode::Backspace => {
                    self.field_mut().pop();
                    None
                }
                _ => None,
            }
        } else {
            match key.code {
                KeyCode::Char('e') | KeyCode::Char('i') => {
                    self.editing = true;
                    self.current_field = 0;
                    None
                }
                KeyCode::Enter => self.submit(),
                _ => None,
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Mint Property ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = vec![Line::from("")];

        for (i, label) in FIELDS.iter().enumerate() {
            let value = if i == 0 { &self.to } else { &self.uri };
            let active = self.editing && i == self.current_field;
            let cursor = if active { "_" } else { "" };
            let value_style = if active {
                Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(THEME.text)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {label}: "), THEME.muted_style()),
                Span::styled(format!("{value}{cursor}"), value_style),
            ]));
        }

        lines.push(Line::from(""));
        let hint = if self.editing {
            "  [Tab] Next field  [Enter] Mint  [Esc] Stop editing"
        } else {
            "  [e] Edit fields  [Enter] Mint"
        };
        lines.push(Line::from(Span::styled(hint, THEME.muted_style())));

        let paragraph = Paragraph::new(lines).style(Style::default().fg(THEME.text));
        frame.render_widget(paragraph, inner);
    }
}
