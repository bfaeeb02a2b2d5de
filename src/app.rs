use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use chrono::Utc;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::chain::ContractService;
use crate::chain::reader::ChainReader;
use crate::chain::types::{ErrorKind, OpError, PauseState};
use crate::chain::wallet::WalletConnector;
use crate::components::Component;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::mint_form::MintForm;
use crate::components::overview::OverviewPanel;
use crate::components::query_form::QueryForm;
use crate::components::status_bar::StatusBar;
use crate::events::{Action, AppEvent, View};
use crate::theme::THEME;
use crate::utils;

/// Delay between an unpause submission and the pause-state recheck.
const PAUSE_RECHECK_DELAY: Duration = Duration::from_secs(3);

#[derive(Default)]
struct InFlight {
    connect: bool,
    unpause: bool,
    mint: bool,
    query: bool,
}

impl InFlight {
    fn any(&self) -> bool {
        self.connect || self.unpause || self.mint || self.query
    }
}

pub struct App<R: ChainReader, W: WalletConnector> {
    // Navigation
    current_view: View,

    // Components
    header: Header,
    overview: OverviewPanel,
    mint_form: MintForm,
    query_form: QueryForm,
    status_bar: StatusBar,
    help: HelpOverlay,

    // Collaborators
    service: Arc<ContractService<R, W>>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    session: Option<Address>,
    status: String,
    in_flight: InFlight,
    pause_recheck: Option<JoinHandle<()>>,
    should_quit: bool,
    tick_rate: Duration,
}

impl<R: ChainReader, W: WalletConnector> App<R, W> {
    pub fn with_service(
        service: Arc<ContractService<R, W>>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        tick_rate_ms: u64,
    ) -> Self {
        Self {
            current_view: View::Overview,
            header: Header::new(),
            overview: OverviewPanel::new(),
            mint_form: MintForm::new(),
            query_form: QueryForm::new(),
            status_bar: StatusBar::new(),
            help: HelpOverlay::new(),
            service,
            event_rx,
            session: None,
            status: String::new(),
            in_flight: InFlight::default(),
            pause_recheck: None,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn set_network(&mut self, chain_id: u64, contract: Address, has_wallet: bool) {
        self.header.chain_id = chain_id;
        self.header.connected = true;
        self.status_bar.connected = true;
        self.status_bar.contract = Some(contract);
        self.overview.contract = Some(contract);
        self.overview.has_wallet = has_wallet;
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        // Initial pause-state read
        self.service.refresh_pause_state();

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        // Stop the scheduled recheck so nothing fires after teardown.
        if let Some(handle) = self.pause_recheck.take() {
            handle.abort();
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Fill background
        frame.render_widget(Block::default().style(Style::default().bg(THEME.bg)), area);

        // Layout: header (1) | content (fill) | activity (6) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(6),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);

        match self.current_view {
            View::Overview => self.overview.render(frame, chunks[1]),
            View::Mint => self.mint_form.render(frame, chunks[1]),
            View::Query => self.query_form.render(frame, chunks[1]),
        }

        self.render_activity(frame, chunks[2]);

        self.status_bar.loading = self.in_flight.any();
        self.status_bar.render(frame, chunks[3]);

        // Overlay (rendered on top)
        self.help.render(frame, area);
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Activity ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = if self.status.is_empty() {
            Text::styled("Ready.", THEME.muted_style())
        } else {
            Text::styled(self.status.as_str(), Style::default().fg(THEME.text))
        };
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            if key.kind != KeyEventKind::Press {
                return;
            }

            // Help overlay consumes all keys when visible
            if self.help.handle_key(key) {
                return;
            }

            // A form in edit mode consumes keys before global shortcuts
            let editing = match self.current_view {
                View::Mint => self.mint_form.editing,
                View::Query => self.query_form.editing,
                View::Overview => false,
            };
            if editing {
                let app_event = match self.current_view {
                    View::Mint => self.mint_form.handle_key(key),
                    View::Query => self.query_form.handle_key(key),
                    View::Overview => None,
                };
                if let Some(event) = app_event {
                    self.handle_app_event(event);
                }
                return;
            }

            // Global keys
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.help.toggle();
                    return;
                }
                KeyCode::Char('1') => {
                    self.navigate_to(View::Overview);
                    return;
                }
                KeyCode::Char('2') => {
                    self.navigate_to(View::Mint);
                    return;
                }
                KeyCode::Char('3') => {
                    self.navigate_to(View::Query);
                    return;
                }
                _ => {}
            }

            // Delegate to current view's component
            let app_event = match self.current_view {
                View::Overview => self.overview.handle_key(key),
                View::Mint => self.mint_form.handle_key(key),
                View::Query => self.query_form.handle_key(key),
            };

            if let Some(event) = app_event {
                self.handle_app_event(event);
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            // --- UI requests ---
            AppEvent::ConnectRequested => {
                if self.in_flight.connect {
                    self.note_busy("connect");
                    return;
                }
                self.in_flight.connect = true;
                self.status = "Connecting wallet...".to_string();
                self.service.connect();
            }
            AppEvent::RefreshRequested => {
                self.service.refresh_pause_state();
            }
            AppEvent::UnpauseRequested => {
                if self.in_flight.unpause {
                    self.note_busy("unpause");
                    return;
                }
                self.in_flight.unpause = true;
                self.status = "Unpausing contract...".to_string();
                self.service.unpause(self.session);
            }
            AppEvent::MintRequested { to, uri } => {
                if self.in_flight.mint {
                    self.note_busy("mint");
                    return;
                }
                self.in_flight.mint = true;
                self.status = "Estimating gas...".to_string();
                self.service.mint(self.session, to, uri);
            }
            AppEvent::QueryRequested(token_id) => {
                if self.in_flight.query {
                    self.note_busy("query");
                    return;
                }
                self.in_flight.query = true;
                self.status = "Querying...".to_string();
                self.service.query(token_id);
            }
            AppEvent::Navigate(view) => {
                self.navigate_to(view);
            }

            // --- Task progress and results ---
            AppEvent::WalletConnected(address) => {
                self.in_flight.connect = false;
                self.session = Some(address);
                self.header.account = Some(address);
                self.overview.account = Some(address);
                self.status = format!("Wallet connected: {address}");
            }
            AppEvent::PauseState(paused) => {
                self.overview.pause = PauseState::from(paused);
                self.overview.checked_at = Some(Utc::now());
            }
            AppEvent::GasEstimated(gas) => {
                self.status = format!(
                    "Gas estimate: {} units. Sending mint...",
                    utils::format_number(gas)
                );
            }
            AppEvent::UnpauseSubmitted(hash) => {
                self.in_flight.unpause = false;
                self.status = format!("Unpause sent, tx hash: {hash}");
                self.schedule_pause_recheck();
            }
            AppEvent::MintSubmitted(_hash) => {
                self.status = "Mint sent, awaiting confirmation...".to_string();
            }
            AppEvent::MintConfirmed {
                hash,
                token_id,
                gas_limit,
            } => {
                self.in_flight.mint = false;
                // Pre-fill the query form with the fresh token id.
                self.query_form.token_id = token_id.clone();
                self.status = format!(
                    "Mint succeeded!\nTx hash: {hash}\nToken id: {token_id}\nGas limit: {}",
                    utils::format_number(gas_limit)
                );
            }
            AppEvent::MintUnconfirmed { hash } => {
                self.in_flight.mint = false;
                self.status =
                    format!("Mint sent (tx hash: {hash}), but no token id was found in the logs");
            }
            AppEvent::PropertyLoaded(info) => {
                self.in_flight.query = false;
                self.query_form.info = Some(info);
                self.status = "Query ready.".to_string();
            }
            AppEvent::QueryFailed(error) => {
                self.in_flight.query = false;
                self.query_form.info = None;
                self.status = format!("Error: {}", error.message);
            }
            AppEvent::ActionFailed { action, error } => {
                match action {
                    Action::Connect => self.in_flight.connect = false,
                    Action::Unpause => self.in_flight.unpause = false,
                    Action::Mint => self.in_flight.mint = false,
                    Action::Query => self.in_flight.query = false,
                    Action::RefreshPause => {}
                }
                match failure_status(action, &error) {
                    Some(status) => self.status = status,
                    // Pause reads fail quietly: the previous state stands.
                    None => {
                        self.status_bar.error_message =
                            Some(format!("pause check failed: {}", error.message));
                    }
                }
            }
        }
    }

    fn navigate_to(&mut self, view: View) {
        self.current_view = view;
        self.header.current_tab = match view {
            View::Overview => 0,
            View::Mint => 1,
            View::Query => 2,
        };
        self.status_bar.error_message = None;
    }

    fn note_busy(&mut self, action: &str) {
        self.status_bar.error_message = Some(format!("{action} already in progress"));
    }

    /// Re-read the pause flag after a fixed delay. Tracked so a re-schedule
    /// or teardown aborts the pending recheck instead of leaking it.
    fn schedule_pause_recheck(&mut self) {
        if let Some(handle) = self.pause_recheck.take() {
            handle.abort();
        }
        let service = Arc::clone(&self.service);
        self.pause_recheck = Some(tokio::spawn(async move {
            tokio::time::sleep(PAUSE_RECHECK_DELAY).await;
            service.refresh_pause_state();
        }));
    }
}

impl<R: ChainReader, W: WalletConnector> Drop for App<R, W> {
    fn drop(&mut self) {
        if let Some(handle) = self.pause_recheck.take() {
            handle.abort();
        }
    }
}

/// Project an operation failure onto the status message. `None` means the
/// failure stays out of the activity log (pause-state reads).
fn failure_status(action: Action, error: &OpError) -> Option<String> {
    match (action, error.kind) {
        (Action::RefreshPause, _) => None,
        (_, ErrorKind::WalletRequired) => Some(error.message.clone()),
        (Action::Connect, _) => Some(format!("Wallet connection failed: {}", error.message)),
        (Action::Unpause, _) => Some(format!("Error unpausing: {}", error.message)),
        _ => Some(format!("Error: {}", error.message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::WALLET_REQUIRED;

    #[test]
    fn test_wallet_required_shown_verbatim() {
        let error = OpError::new(ErrorKind::WalletRequired, WALLET_REQUIRED);
        assert_eq!(
            failure_status(Action::Mint, &error),
            Some(WALLET_REQUIRED.to_string())
        );
        assert_eq!(
            failure_status(Action::Unpause, &error),
            Some(WALLET_REQUIRED.to_string())
        );
    }

    #[test]
    fn test_pause_read_failures_stay_quiet() {
        let error = OpError::new(ErrorKind::Read, "rpc unreachable");
        assert_eq!(failure_status(Action::RefreshPause, &error), None);
    }

    #[test]
    fn test_remote_failures_render_short_message() {
        let error = OpError::new(ErrorKind::Simulate, "execution reverted: not owner");
        assert_eq!(
            failure_status(Action::Unpause, &error),
            Some("Error unpausing: execution reverted: not owner".to_string())
        );
        let error = OpError::new(ErrorKind::Gas, "intrinsic gas too low");
        assert_eq!(
            failure_status(Action::Mint, &error),
            Some("Error: intrinsic gas too low".to_string())
        );
    }
}
