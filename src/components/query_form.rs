use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::chain::types::{PropertyInfo, PropertyState};
use crate::components::Component;
use crate::events::AppEvent;
use crate::theme::THEME;

/// Query form: token id in, owner/state/URI out. A successful mint pre-fills
/// the token id; a failed query clears the result.
pub struct QueryForm {
    pub token_id: String,
    pub editing: bool,
    pub info: Option<PropertyInfo>,
}

impl QueryForm {
    pub fn new() -> Self {
        Self {
            token_id: String::new(),
            editing: false,
            info: None,
        }
    }
}

impl Component for QueryForm {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.editing {
            match key.code {
                KeyCode::Esc => {
                    self.editing = false;
                    None
                }
                KeyCode::Enter => {
                    self.editing = false;
                    Some(AppEvent::QueryRequested(self.token_id.clone()))
                }
                KeyCode::Char(c) => {
                    self.token_id.push(c);
                    None
                }
                KeyCode::Backspace => {
                    self.token_id.pop();
                    None
                }
                _ => None,
            }
        } else {
            match key.code {
                KeyCode::Char('e') | KeyCode::Char('i') => {
                    self.editing = true;
                    None
                }
                KeyCode::Enter => Some(AppEvent::QueryRequested(self.token_id.clone())),
                _ => None,
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Query Property ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = vec![Line::from("")];

        let cursor = if self.editing { "_" } else { "" };
        let value_style = if self.editing {
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(THEME.text)
        };
        lines.push(Line::from(vec![
            Span::styled("  Token id: ", THEME.muted_style()),
            Span::styled(format!("{}{cursor}", self.token_id), value_style),
        ]));

        lines.push(Line::from(""));
        let hint = if self.editing {
            "  [Enter] Query  [Esc] Stop editing"
        } else {
            "  [e] Edit token id  [Enter] Query"
        };
        lines.push(Line::from(Span::styled(hint, THEME.muted_style())));

        if let Some(ref info) = self.info {
            let state = PropertyState::from(info.state);
            let state_style = match state {
                PropertyState::Registered => THEME.success_style(),
                PropertyState::Unknown => THEME.muted_style(),
                _ => THEME.accent_style(),
            };
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("  Owner: ", THEME.muted_style()),
                Span::styled(format!("{}", info.owner), THEME.address_style()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  State: ", THEME.muted_style()),
                Span::styled(state.label(), state_style),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  URI:   ", THEME.muted_style()),
                Span::styled(info.uri.clone(), THEME.hash_style()),
            ]));
        }

        let paragraph = Paragraph::new(lines).style(Style::default().fg(THEME.text));
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(form: &mut QueryForm, code: KeyCode) -> Option<AppEvent> {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_submit_emits_current_token_id() {
        let mut form = QueryForm::new();
        press(&mut form, KeyCode::Char('e'));
        press(&mut form, KeyCode::Char('4'));
        press(&mut form, KeyCode::Char('2'));
        let event = press(&mut form, KeyCode::Enter);
        assert_eq!(event, Some(AppEvent::QueryRequested("42".to_string())));
    }

    #[test]
    fn test_submit_without_editing_uses_prefilled_id() {
        // A mint pre-fills the token id; Enter re-queries it directly.
        let mut form = QueryForm::new();
        form.token_id = "7".to_string();
        let event = press(&mut form, KeyCode::Enter);
        assert_eq!(event, Some(AppEvent::QueryRequested("7".to_string())));
    }
}
