//! TUI application: single-owner UI loop
//!
//! Architecture:
//! ```text
//! TuiApp (select! loop, owns all screen state)
//!   ├─ crossterm EventStream ── keys / mouse / resize
//!   ├─ rx (AppEvent) <────────── backend bus handlers (worker tasks)
//!   │                 <────────── command bus handlers (spawned per emit)
//!   │                 <────────── chat exchange task
//!   └─ tick_interval ─────────── spinner
//! ```
//!
//! Handlers on other tasks only repost into `rx`; the layout engine and the
//! confirmation coordinator are touched from this loop alone.

use super::chat::ChatController;
use super::clipboard::{Clipboard, SystemClipboard};
use super::commands::{HELP_TEXT, UiCommand, demo_request, parse_command, yank_text};
use super::confirmation::{ConfirmationCoordinator, KeyOutcome};
use super::content::{PanelContent, Scroll};
use super::event::AppEvent;
use super::keymap::{KeyAction, map_key};
use super::layout::{AuxiliaryMode, LayoutConfig, LayoutEngine, RenderFailure};
use super::panel::PanelId;
use super::theme::{Theme, ThemeName};
use super::widgets::{
    status_bar::Activity,
    text_viewer::TextViewer,
};
use confab_application::{
    AutoAcceptPolicy, BackendEvent, BackendTopic, ChatBackend, CommandBus, CommandEvent,
    CommandTopic, EventBus, SubscriptionId,
};
use confab_domain::{ChatMessage, ContentType, DomainError};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::stream::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const HELP_OVERLAY: &str = "help";

/// Startup settings for the TUI.
#[derive(Debug, Clone)]
pub struct TuiSettings {
    pub layout: LayoutConfig,
    pub theme: ThemeName,
    pub tick_rate: Duration,
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            theme: ThemeName::Default,
            tick_rate: Duration::from_millis(250),
        }
    }
}

/// Main TUI application
pub struct TuiApp {
    engine: LayoutEngine,
    coordinator: ConfirmationCoordinator,
    chat: ChatController,
    clipboard: Box<dyn Clipboard>,

    // -- Buses --
    backend_bus: Arc<dyn EventBus>,
    command_bus: Arc<dyn CommandBus>,
    backend_subscriptions: Vec<(BackendTopic, SubscriptionId)>,
    command_subscriptions: Vec<(CommandTopic, SubscriptionId)>,

    // -- Loop inbox --
    rx: mpsc::UnboundedReceiver<AppEvent>,

    tick_rate: Duration,
    demo_sequence: u64,
    should_quit: bool,
    last_failures: Vec<RenderFailure>,
}

impl TuiApp {
    pub fn new(
        settings: TuiSettings,
        backend_bus: Arc<dyn EventBus>,
        command_bus: Arc<dyn CommandBus>,
        policy: Arc<dyn AutoAcceptPolicy>,
        chat_backend: Arc<dyn ChatBackend>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let engine =
            LayoutEngine::with_default_panels(Theme::from_name(settings.theme), settings.layout);
        let coordinator = ConfirmationCoordinator::new(Arc::clone(&backend_bus), policy);
        let chat = ChatController::new(chat_backend, tx.clone());

        let backend_subscriptions = BackendTopic::ALL
            .iter()
            .map(|&topic| {
                let tx = tx.clone();
                let id = backend_bus.subscribe(
                    topic,
                    Arc::new(move |event: &BackendEvent| {
                        let _ = tx.send(AppEvent::Backend(event.clone()));
                    }),
                );
                (topic, id)
            })
            .collect();

        let command_subscriptions = [
            CommandTopic::InputText,
            CommandTopic::InputCancel,
            CommandTopic::ThemeChanged,
            CommandTopic::ShortcutHelp,
        ]
        .into_iter()
        .map(|topic| {
            let tx = tx.clone();
            let id = command_bus.subscribe(
                topic,
                Arc::new(move |event: CommandEvent| {
                    let _ = tx.send(AppEvent::Command(event));
                }),
            );
            (topic, id)
        })
        .collect();

        Self {
            engine,
            coordinator,
            chat,
            clipboard: Box::new(SystemClipboard),
            backend_bus,
            command_bus,
            backend_subscriptions,
            command_subscriptions,
            rx,
            tick_rate: settings.tick_rate,
            demo_sequence: 0,
            should_quit: false,
            last_failures: Vec::new(),
        }
    }

    /// Replace the clipboard used by `:yank`.
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal if the UI thread panics. Panics on worker
        // threads are caught by the buses and only logged.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if std::thread::current().name() == Some("main") {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
                original_hook(info);
            } else {
                tracing::error!(panic = %info, "Panic on worker thread");
            }
        }));

        let mut event_stream = EventStream::new();
        let mut tick = tokio::time::interval(self.tick_rate);
        self.greet();
        info!("TUI started");

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                // Terminal events (keyboard, mouse, resize)
                term_event = event_stream.next() => match term_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                    None => self.should_quit = true,
                },

                // Reposted bus and chat events
                Some(event) = self.rx.recv() => {
                    self.apply_app_event(event);
                }

                // Spinner
                _ = tick.tick() => {
                    if let Some(status) = self.engine.status_mut() {
                        status.tick();
                    }
                }
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("TUI stopped");

        Ok(())
    }

    fn greet(&mut self) {
        self.system_message(
            "Welcome to confab. Type a message and press Enter. :help lists commands, F1 shows keys.",
        );
    }

    // ==================== Rendering ====================

    pub(crate) fn render(&mut self, frame: &mut Frame) {
        self.update_status();
        let failures = self.engine.draw(frame);

        let fresh: Vec<RenderFailure> = failures
            .iter()
            .filter(|f| !self.last_failures.contains(f))
            .cloned()
            .collect();
        for failure in fresh {
            warn!(panel = %failure.panel, error = %failure.error, "Panel failed to render");
            self.debug_line(format!("render {}: {}", failure.panel, failure.error));
        }
        self.last_failures = failures;
    }

    fn update_status(&mut self) {
        let queue = self.coordinator.queue_status();
        let streaming = self.chat.is_busy();
        let focus = self
            .engine
            .focused()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let right = self.engine.right_panel();

        if let Some(status) = self.engine.status_mut() {
            status.activity = if queue.processing {
                Activity::AwaitingConfirmation
            } else if streaming {
                Activity::Streaming
            } else {
                Activity::Idle
            };
            status.queue = queue;
            status.focus = focus;
            status.zoomed = right.zoomed;
            status.auxiliary = right.visible.then(|| right.mode.panel().to_string());
        }
    }

    // ==================== Terminal events ====================

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                let scroll = match mouse.kind {
                    MouseEventKind::ScrollUp => Scroll::Up(3),
                    MouseEventKind::ScrollDown => Scroll::Down(3),
                    _ => return,
                };
                if let Some(id) = self.engine.panel_at(mouse.column, mouse.row) {
                    self.engine.scroll(&id, scroll);
                }
            }
            Event::Resize(width, height) => {
                self.engine.layout(width, height);
            }
            _ => {}
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        // An open overlay is on top, so it takes its close keys first
        if self.engine.has_overlay(HELP_OVERLAY) && matches!(key.code, KeyCode::Esc | KeyCode::F(1))
        {
            self.engine.close_overlay(HELP_OVERLAY);
            return;
        }

        if self.coordinator.handle_key(&mut self.engine, &key) == KeyOutcome::Handled {
            return;
        }

        let editing = self.engine.focused() == Some(&PanelId::Input)
            && matches!(
                self.engine.content(&PanelId::Input),
                Some(PanelContent::Input(_))
            );
        let action = map_key(key, editing);
        self.handle_action(action);
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::None => {}
            KeyAction::Quit => self.quit(),
            KeyAction::FocusNext => {
                self.engine.focus_next();
            }
            KeyAction::ToggleHelp => {
                self.command_bus.emit(CommandEvent::ShortcutHelp);
            }
            KeyAction::ToggleDebug => self.engine.toggle_auxiliary_panel(AuxiliaryMode::Debug),
            KeyAction::ToggleZoom => self.toggle_zoom(),
            KeyAction::Scroll(scroll) => {
                let target = self.engine.scroll_target();
                self.engine.scroll(&target, scroll);
            }
            KeyAction::Cancel => self.cancel_input(),
            KeyAction::Submit => self.submit_input(),
            KeyAction::InsertChar(c) => self.edit(|input| input.insert(c)),
            KeyAction::Backspace => self.edit(|input| input.backspace()),
            KeyAction::Delete => self.edit(|input| input.delete()),
            KeyAction::CursorLeft => self.edit(|input| input.move_left()),
            KeyAction::CursorRight => self.edit(|input| input.move_right()),
            KeyAction::CursorHome => self.edit(|input| input.move_home()),
            KeyAction::CursorEnd => self.edit(|input| input.move_end()),
            KeyAction::HistoryPrev => self.edit(|input| input.history_prev()),
            KeyAction::HistoryNext => self.edit(|input| input.history_next()),
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut super::widgets::input::InputLine)) {
        if let Some(input) = self.engine.input_mut() {
            f(input);
        }
    }

    fn toggle_zoom(&mut self) {
        if !self.engine.right_panel().visible {
            self.system_message("Nothing to zoom: no side viewer is open.");
            return;
        }
        let zoomed = self.engine.toggle_zoom();
        debug!(zoomed, "Zoom toggled");
    }

    fn submit_input(&mut self) {
        let Some(input) = self.engine.input_mut() else {
            return;
        };
        let text = input.take();
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if let Some(command) = parse_command(text) {
            match command {
                Ok(command) => self.run_command(command),
                Err(message) => self.error_message(message),
            }
            return;
        }

        if let Some(conversation) = self.engine.conversation_mut() {
            conversation.push(ChatMessage::user(text));
        }
        self.command_bus
            .emit(CommandEvent::InputText(text.to_string()));
        match self.chat.submit(text.to_string()) {
            Ok(generation) => debug!(generation, "Chat exchange started"),
            Err(DomainError::Busy) => {
                self.error_message("A reply is still streaming. Press Esc to cancel it.")
            }
            Err(e) => self.error_message(e.to_string()),
        }
    }

    fn run_command(&mut self, command: UiCommand) {
        debug!(?command, "Running command");
        match command {
            UiCommand::Help => {
                self.command_bus.emit(CommandEvent::ShortcutHelp);
            }
            UiCommand::Theme(name) => {
                self.command_bus
                    .emit(CommandEvent::ThemeChanged(name.to_string()));
            }
            UiCommand::Demo(kind) => {
                self.demo_sequence += 1;
                let request = demo_request(kind, self.demo_sequence);
                if let Err(e) = self
                    .backend_bus
                    .publish(BackendEvent::ConfirmationRequested(request))
                {
                    self.error_message(format!("Could not start demo: {}", e));
                }
            }
            UiCommand::Zoom => self.toggle_zoom(),
            UiCommand::Debug => self.engine.toggle_auxiliary_panel(AuxiliaryMode::Debug),
            UiCommand::Clear => {
                if let Some(conversation) = self.engine.conversation_mut() {
                    conversation.clear();
                }
            }
            UiCommand::Yank(count) => self.yank(count),
            UiCommand::Cancel => self.cancel_input(),
            UiCommand::Quit => self.quit(),
        }
    }

    fn yank(&mut self, count: usize) {
        let Some(conversation) = self.engine.conversation_mut() else {
            return;
        };
        let messages = conversation.messages();
        let taken = &messages[messages.len().saturating_sub(count)..];
        if taken.is_empty() {
            self.system_message("No messages to copy.");
            return;
        }

        let copied = taken.len();
        let text = yank_text(taken);
        match self.clipboard.copy(&text) {
            Ok(()) if copied == 1 => self.system_message("Copied last message to clipboard."),
            Ok(()) => self.system_message(format!("Copied last {} messages to clipboard.", copied)),
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                self.error_message(format!("Failed to copy to clipboard: {}", e));
            }
        }
    }

    /// Esc or `:cancel`. The running reply is stopped here on the loop;
    /// the emitted event only names the prompt on screen right now, so a
    /// request that lands before delivery is never declined by it.
    fn cancel_input(&mut self) {
        if self.chat.cancel() {
            debug!("Cancelling chat exchange");
        }
        let confirmation = self.coordinator.active().map(|r| r.execution_id.clone());
        self.command_bus
            .emit(CommandEvent::InputCancel { confirmation });
    }

    /// Decline whatever is still pending so the backend is not left
    /// waiting, then leave the loop.
    fn quit(&mut self) {
        let declined = self.coordinator.cancel_active(&mut self.engine);
        if !declined.is_empty() {
            info!(count = declined.len(), "Declined pending confirmations on exit");
        }
        self.chat.cancel();
        self.should_quit = true;
    }

    // ==================== Reposted events ====================

    pub(crate) fn apply_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Backend(event) => self.apply_backend_event(event),
            AppEvent::Command(event) => self.apply_command_event(event),
            AppEvent::Diagnostic(line) => self.debug_line(line),
            AppEvent::ChatFinished(generation) => self.chat.finish(generation),
        }
    }

    fn apply_backend_event(&mut self, event: BackendEvent) {
        self.debug_line(format!("bus {}", event.topic()));
        match event {
            BackendEvent::ConfirmationRequested(request) => {
                let submission = self.coordinator.submit(&mut self.engine, request);
                debug!(?submission, "Confirmation request handled");
            }
            BackendEvent::ConfirmationResolved { response, .. } => {
                self.debug_line(format!(
                    "  {} -> {}",
                    response.execution_id,
                    if response.confirmed { "confirmed" } else { "declined" }
                ));
            }
            BackendEvent::ChatStarted { .. } => {}
            BackendEvent::ChatChunk { text, .. } => {
                if let Some(conversation) = self.engine.conversation_mut() {
                    conversation.append_stream(&text);
                }
            }
            BackendEvent::ChatCompleted { .. } => {
                if let Some(conversation) = self.engine.conversation_mut() {
                    conversation.finish_stream();
                }
            }
            BackendEvent::ChatCancelled { .. } => {
                if let Some(conversation) = self.engine.conversation_mut() {
                    conversation.finish_stream();
                }
                self.system_message("Reply cancelled.");
            }
            BackendEvent::ChatFailed { error, .. } => {
                if let Some(conversation) = self.engine.conversation_mut() {
                    conversation.finish_stream();
                }
                self.error_message(error);
            }
        }
    }

    fn apply_command_event(&mut self, event: CommandEvent) {
        self.debug_line(format!("cmd {}", event.topic()));
        match event {
            CommandEvent::InputText(_) => {}
            CommandEvent::InputCancel { confirmation: None } => {}
            CommandEvent::InputCancel {
                confirmation: Some(id),
            } => {
                let still_active = self
                    .coordinator
                    .active()
                    .is_some_and(|r| r.execution_id == id);
                if !still_active {
                    debug!(execution_id = %id, "Cancel for a prompt that is no longer shown");
                    return;
                }
                let declined = self.coordinator.cancel_active(&mut self.engine);
                self.system_message(format!(
                    "Declined {} pending confirmation(s).",
                    declined.len()
                ));
            }
            CommandEvent::ThemeChanged(name) => match name.parse::<ThemeName>() {
                Ok(theme) => {
                    self.engine.set_theme(Theme::from_name(theme));
                    self.coordinator.refresh_theme(&mut self.engine);
                    self.system_message(format!("Theme set to {}.", theme));
                }
                Err(e) => self.error_message(e),
            },
            CommandEvent::ShortcutHelp => self.toggle_help(),
        }
    }

    fn toggle_help(&mut self) {
        if self.engine.has_overlay(HELP_OVERLAY) {
            self.engine.close_overlay(HELP_OVERLAY);
            return;
        }
        let viewer = TextViewer::with_text("Help", ContentType::Markdown, HELP_TEXT);
        let id = self.engine.open_overlay(
            HELP_OVERLAY,
            PanelContent::TextViewer(viewer),
            70,
            80,
        );
        if let Err(e) = self.engine.focus_panel(&id) {
            debug!(error = %e, "Help overlay not focusable");
        }
    }

    // ==================== Messages ====================

    fn system_message(&mut self, text: impl Into<String>) {
        if let Some(conversation) = self.engine.conversation_mut() {
            conversation.push(ChatMessage::system(text));
        }
    }

    fn error_message(&mut self, text: impl Into<String>) {
        if let Some(conversation) = self.engine.conversation_mut() {
            conversation.push(ChatMessage::error(text));
        }
    }

    fn debug_line(&mut self, line: impl Into<String>) {
        if let Some(debug) = self.engine.debug_mut() {
            debug.push(line);
        }
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        for (topic, id) in self.backend_subscriptions.drain(..) {
            self.backend_bus.unsubscribe(topic, id);
        }
        for (topic, id) in self.command_subscriptions.drain(..) {
            self.command_bus.unsubscribe(topic, id);
        }
    }
}
