use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::chain::types::PauseState;
use crate::components::Component;
use crate::events::AppEvent;
use crate::theme::THEME;

/// Session and pause-state panel with the connect/refresh/unpause actions.
pub struct OverviewPanel {
    pub account: Option<Address>,
    pub pause: PauseState,
    pub contract: Option<Address>,
    pub has_wallet: bool,
    pub checked_at: Option<DateTime<Utc>>,
}

impl OverviewPanel {
    pub fn new() -> Self {
        Self {
            account: None,
            pause: PauseState::Unknown,
            contract: None,
            has_wallet: false,
            checked_at: None,
        }
    }
}

impl Component for OverviewPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char('c') => Some(AppEvent::ConnectRequested),
            KeyCode::Char('r') => Some(AppEvent::RefreshRequested),
            // The unpause action is only offered while the contract is paused
            KeyCode::Char('u') if self.pause == PauseState::Paused => {
                Some(AppEvent::UnpauseRequested)
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Overview ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(""));
        let session = match self.account {
            Some(ref addr) => Line::from(vec![
                Span::styled("  Account:  ", THEME.muted_style()),
                Span::styled(format!("{addr}"), THEME.address_style()),
            ]),
            None => {
                let hint = if self.has_wallet {
                    "not connected  ([c] connect wallet)"
                } else {
                    "no signing key configured (--private-key)"
                };
                Line::from(vec![
                    Span::styled("  Account:  ", THEME.muted_style()),
                    Span::styled(hint, Style::default().fg(THEME.text)),
                ])
            }
        };
        lines.push(session);

        if let Some(ref contract) = self.contract {
            lines.push(Line::from(vec![
                Span::styled("  Contract: ", THEME.muted_style()),
                Span::styled(format!("{contract}"), THEME.address_style()),
            ]));
        }

        lines.push(Line::from(""));

        let state_span = match self.pause {
            PauseState::Unknown => Span::styled("unknown", THEME.muted_style()),
            PauseState::Paused => Span::styled(
                "PAUSED",
                Style::default().fg(THEME.error).add_modifier(Modifier::BOLD),
            ),
            PauseState::Active => Span::styled("ACTIVE", THEME.success_style()),
        };
        let mut state_line = vec![
            Span::styled("  Contract state: ", THEME.muted_style()),
            state_span,
        ];
        if let Some(ref checked) = self.checked_at {
            state_line.push(Span::styled(
                format!("  (checked {} UTC)", checked.format("%H:%M:%S")),
                THEME.muted_style(),
            ));
        }
        lines.push(Line::from(state_line));

        if self.pause == PauseState::Paused {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("  [u] ", THEME.accent_style()),
                Span::styled("Unpause contract", Style::default().fg(THEME.text)),
                Span::styled("  (only the owner can unpause)", THEME.muted_style()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  [c] connect   [r] refresh pause state",
            THEME.muted_style(),
        )));

        let paragraph = Paragraph::new(lines).style(Style::default().fg(THEME.text));
        frame.render_widget(paragraph, inner);
    }
}
