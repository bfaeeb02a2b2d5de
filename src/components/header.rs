use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub chain_id: u64,
    pub current_tab: usize,
    pub account: Option<Address>,
    pub connected: bool,
}

const TABS: &[&str] = &["Overview [1]", "Mint [2]", "Query [3]"];

impl Header {
    pub fn new() -> Self {
        Self {
            chain_id: 0,
            current_tab: 0,
            account: None,
            connected: false,
        }
    }

    fn display_chain_name(&self) -> &str {
        match self.chain_id {
            1 => "Mainnet",
            17000 => "Holesky",
            11155111 => "Sepolia",
            _ => "Unknown",
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background for the entire header bar
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        // Split the header into three sections: left (title), center (tabs), right (account/network)
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(14),
                Constraint::Min(0),
                Constraint::Length(34),
            ])
            .split(area);

        // Left: App title
        let title = Paragraph::new(Span::styled(
            " property-tui",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        // Center: Tab navigation
        let tab_titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
        let tabs = Tabs::new(tab_titles)
            .select(self.current_tab)
            .style(THEME.muted_style())
            .highlight_style(THEME.accent_style().add_modifier(Modifier::BOLD))
            .divider(Span::raw(" | "));
        frame.render_widget(tabs, chunks[1]);

        // Right: network and connected account
        let account_span = match self.account {
            Some(ref addr) => Span::styled(utils::truncate_address(addr), THEME.address_style()),
            None => Span::styled("no account", THEME.muted_style()),
        };
        let network_info = Line::from(vec![
            Span::styled(self.display_chain_name(), Style::default().fg(THEME.text)),
            Span::styled(" | ", THEME.muted_style()),
            account_span,
            Span::raw(" "),
        ]);
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[2]);
    }
}
