use super::{
    ConfirmationQueue, Decision, KeyOutcome, Preview, QueueStatus, SeenIds, flavor_for,
    interpret_key,
};
use crate::tui::content::PanelContent;
use crate::tui::layout::{AuxiliaryMode, LayoutEngine};
use crate::tui::panel::PanelId;
use crate::tui::widgets::input::InputLine;
use confab_application::{AutoAcceptPolicy, BackendEvent, EventBus};
use confab_domain::{ChatMessage, ConfirmationKind, ConfirmationRequest, ConfirmationResponse};
use crossterm::event::KeyEvent;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    AutoAccepted,
    Presented,
    Queued { position: usize },
    /// The execution id was seen before; nothing was done
    Duplicate,
}

#[derive(Debug)]
struct ActiveConfirmation {
    request: ConfirmationRequest,
    /// Auxiliary viewer opened for this prompt
    opened: Option<AuxiliaryMode>,
}

/// Drives the confirmation state machine on the UI loop.
///
/// Idle → Processing on the first request; further requests queue up and
/// are presented one after another without going back to the normal input
/// in between. Every request gets exactly one published response.
pub struct ConfirmationCoordinator {
    bus: Arc<dyn EventBus>,
    policy: Arc<dyn AutoAcceptPolicy>,
    queue: ConfirmationQueue,
    active: Option<ActiveConfirmation>,
    /// The normal input line while a prompt has its slot
    stashed_input: Option<PanelContent>,
    /// Recently accepted ids, bounded
    seen: SeenIds,
}

impl ConfirmationCoordinator {
    pub fn new(bus: Arc<dyn EventBus>, policy: Arc<dyn AutoAcceptPolicy>) -> Self {
        Self {
            bus,
            policy,
            queue: ConfirmationQueue::new(),
            active: None,
            stashed_input: None,
            seen: SeenIds::default(),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ConfirmationRequest> {
        self.active.as_ref().map(|a| &a.request)
    }

    pub fn queue_status(&self) -> QueueStatus {
        QueueStatus {
            processing: self.is_processing(),
            queued: self.queue.len(),
        }
    }

    /// Accept a new request from the backend.
    pub fn submit(
        &mut self,
        engine: &mut LayoutEngine,
        request: ConfirmationRequest,
    ) -> Submission {
        if !self.seen.insert(&request.execution_id) {
            warn!(
                execution_id = %request.execution_id,
                "Ignoring confirmation request with a reused execution id"
            );
            return Submission::Duplicate;
        }

        let subject = request.subject().to_string();
        if self.policy.auto_accept(&subject) {
            info!(kind = %request.kind, subject = %subject, "Auto-accepting confirmation");
            if !self.policy.is_hidden(&subject) {
                if let Some(conversation) = engine.conversation_mut() {
                    conversation.push(ChatMessage::system(format!(
                        "Auto-accepted {} confirmation: {}",
                        request.kind, subject
                    )));
                }
            }
            self.publish(
                request.kind,
                ConfirmationResponse::accept(request.execution_id),
            );
            return Submission::AutoAccepted;
        }

        if self.active.is_some() {
            let title = flavor_for(request.kind).prompt(&request).title;
            let position = self.queue.push(request);
            debug!(position, "Queued confirmation request");
            if let Some(conversation) = engine.conversation_mut() {
                conversation.push(ChatMessage::system(format!(
                    "Confirmation request queued (position {}): {}",
                    position, title
                )));
            }
            return Submission::Queued { position };
        }

        self.present(engine, request);
        Submission::Presented
    }

    /// Answer the active prompt. Returns the published response, or `None`
    /// when nothing was pending.
    pub fn resolve(
        &mut self,
        engine: &mut LayoutEngine,
        confirmed: bool,
    ) -> Option<ConfirmationResponse> {
        let ActiveConfirmation { request, opened } = self.active.take()?;
        let response = if confirmed {
            ConfirmationResponse::accept(request.execution_id)
        } else {
            ConfirmationResponse::decline(request.execution_id)
        };
        info!(
            execution_id = %response.execution_id,
            confirmed,
            "Confirmation resolved"
        );
        self.publish(request.kind, response.clone());
        Self::close_preview(engine, opened);

        match self.queue.pop() {
            Some(next) => self.present(engine, next),
            None => self.restore_input(engine),
        }
        Some(response)
    }

    /// Offer a key to the active prompt.
    pub fn handle_key(&mut self, engine: &mut LayoutEngine, key: &KeyEvent) -> KeyOutcome {
        if self.active.is_none() {
            return KeyOutcome::NotHandled;
        }
        match interpret_key(key) {
            Some(Decision::Confirm) => {
                self.resolve(engine, true);
                KeyOutcome::Handled
            }
            Some(Decision::Decline) => {
                self.resolve(engine, false);
                KeyOutcome::Handled
            }
            None => KeyOutcome::NotHandled,
        }
    }

    /// Decline the active prompt and everything queued behind it, then
    /// give the input panel back.
    pub fn cancel_active(&mut self, engine: &mut LayoutEngine) -> Vec<ConfirmationResponse> {
        let Some(ActiveConfirmation { request, opened }) = self.active.take() else {
            return Vec::new();
        };

        let pending: Vec<ConfirmationRequest> =
            std::iter::once(request).chain(self.queue.drain()).collect();
        let responses: Vec<ConfirmationResponse> = pending
            .into_iter()
            .map(|request| {
                let response = ConfirmationResponse::decline(request.execution_id);
                self.publish(request.kind, response.clone());
                response
            })
            .collect();

        info!(count = responses.len(), "Cancelled pending confirmations");
        Self::close_preview(engine, opened);
        self.restore_input(engine);
        responses
    }

    /// Re-apply the prompt frame colour after a theme change.
    pub fn refresh_theme(&self, engine: &mut LayoutEngine) {
        if self.active.is_some() {
            let color = engine.theme().secondary;
            engine.set_frame_color(&PanelId::Input, Some(color));
        }
    }

    fn present(&mut self, engine: &mut LayoutEngine, request: ConfirmationRequest) {
        let flavor = flavor_for(request.kind);
        let prompt = flavor.prompt(&request);
        debug!(
            execution_id = %request.execution_id,
            title = %prompt.title,
            "Presenting confirmation"
        );

        match engine.swap_component(&PanelId::Input, PanelContent::Prompt(prompt)) {
            // A prompt replacing a prompt leaves the stashed input alone
            Ok(previous @ PanelContent::Input(_)) => self.stashed_input = Some(previous),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Cannot show confirmation prompt"),
        }

        let color = engine.theme().secondary;
        engine.set_frame_color(&PanelId::Input, Some(color));
        if let Err(e) = engine.focus_panel(&PanelId::Input) {
            warn!(error = %e, "Cannot focus confirmation prompt");
        }

        let opened = flavor
            .preview(&request)
            .map(|preview| Self::open_preview(engine, preview));
        self.active = Some(ActiveConfirmation { request, opened });
    }

    fn open_preview(engine: &mut LayoutEngine, preview: Preview) -> AuxiliaryMode {
        match preview.mode {
            AuxiliaryMode::DiffViewer => {
                if let Some(viewer) = engine.diff_viewer_mut() {
                    viewer.load(preview.title, preview.body);
                }
            }
            AuxiliaryMode::TextViewer => {
                if let Some(viewer) = engine.text_viewer_mut() {
                    viewer.load(preview.title, preview.content_type, preview.body);
                }
            }
            AuxiliaryMode::Debug => {}
        }
        engine.show_auxiliary_panel(preview.mode);
        preview.mode
    }

    fn close_preview(engine: &mut LayoutEngine, opened: Option<AuxiliaryMode>) {
        let right = engine.right_panel();
        if right.visible && opened == Some(right.mode) {
            engine.hide_auxiliary_panel();
        }
    }

    fn restore_input(&mut self, engine: &mut LayoutEngine) {
        let input = self
            .stashed_input
            .take()
            .unwrap_or_else(|| PanelContent::Input(InputLine::new()));
        if let Err(e) = engine.swap_component(&PanelId::Input, input) {
            warn!(error = %e, "Cannot restore input panel");
        }
        engine.set_frame_color(&PanelId::Input, None);
        if let Err(e) = engine.focus_panel(&PanelId::Input) {
            warn!(error = %e, "Cannot focus input panel");
        }
    }

    fn publish(&self, kind: ConfirmationKind, response: ConfirmationResponse) {
        if let Err(e) = self
            .bus
            .publish(BackendEvent::ConfirmationResolved { kind, response })
        {
            warn!(error = %e, "Failed to publish confirmation response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::layout::LayoutConfig;
    use crate::tui::theme::Theme;
    use confab_application::{BackendTopic, BusError, EventHandler, SubscriptionId};
    use confab_domain::ContentType;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBus {
        published: Mutex<Vec<BackendEvent>>,
    }

    impl RecordingBus {
        fn responses(&self) -> Vec<(String, bool)> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter_map(|event| match event {
                    BackendEvent::ConfirmationResolved { response, .. } => Some((
                        response.execution_id.as_str().to_string(),
                        response.confirmed,
                    )),
                    _ => None,
                })
                .collect()
        }
    }

    impl EventBus for RecordingBus {
        fn publish(&self, event: BackendEvent) -> Result<(), BusError> {
            self.published.lock().unwrap().push(event);
            Ok(())
        }

        fn subscribe(&self, _topic: BackendTopic, _handler: EventHandler) -> SubscriptionId {
            SubscriptionId(0)
        }

        fn unsubscribe(&self, _topic: BackendTopic, _id: SubscriptionId) -> bool {
            false
        }
    }

    struct StaticPolicy {
        accepted: Vec<&'static str>,
        hidden: Vec<&'static str>,
    }

    impl AutoAcceptPolicy for StaticPolicy {
        fn auto_accept(&self, subject: &str) -> bool {
            self.accepted.contains(&subject)
        }

        fn is_hidden(&self, subject: &str) -> bool {
            self.hidden.contains(&subject)
        }
    }

    fn setup(accepted: Vec<&'static str>) -> (Arc<RecordingBus>, ConfirmationCoordinator, LayoutEngine) {
        let bus = Arc::new(RecordingBus::default());
        let policy = Arc::new(StaticPolicy {
            accepted,
            hidden: vec!["list_dir"],
        });
        let coordinator = ConfirmationCoordinator::new(bus.clone(), policy);
        let mut engine =
            LayoutEngine::with_default_panels(Theme::default(), LayoutConfig::default());
        engine.layout(100, 30);
        (bus, coordinator, engine)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn prompt_id(engine: &LayoutEngine) -> Option<String> {
        engine
            .content(&PanelId::Input)
            .and_then(PanelContent::as_prompt)
            .map(|p| p.execution_id.as_str().to_string())
    }

    #[test]
    fn test_requests_are_presented_in_arrival_order() {
        let (bus, mut coordinator, mut engine) = setup(vec![]);
        for id in ["a", "b", "c", "d"] {
            coordinator.submit(&mut engine, ConfirmationRequest::tool(id, "shell"));
        }
        assert_eq!(
            coordinator.queue_status(),
            QueueStatus {
                processing: true,
                queued: 3
            }
        );

        let mut presented = Vec::new();
        while let Some(id) = prompt_id(&engine) {
            presented.push(id);
            coordinator.resolve(&mut engine, true);
        }
        assert_eq!(presented, vec!["a", "b", "c", "d"]);
        assert_eq!(bus.responses().len(), 4);
        assert!(!coordinator.is_processing());
    }

    #[test]
    fn test_queue_position_is_reported() {
        let (_bus, mut coordinator, mut engine) = setup(vec![]);
        assert_eq!(
            coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "shell")),
            Submission::Presented
        );
        assert_eq!(
            coordinator.submit(&mut engine, ConfirmationRequest::tool("b", "write_file")),
            Submission::Queued { position: 1 }
        );

        let last = engine.conversation_mut().unwrap().messages().last().cloned().unwrap();
        assert_eq!(
            last.content,
            "Confirmation request queued (position 1): Tool: write_file"
        );
    }

    #[test]
    fn test_second_prompt_replaces_first_without_restoring_input() {
        let (bus, mut coordinator, mut engine) = setup(vec![]);
        engine.input_mut().unwrap().insert('h');
        coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "shell"));
        coordinator.submit(&mut engine, ConfirmationRequest::tool("b", "shell"));
        assert_eq!(prompt_id(&engine).as_deref(), Some("a"));

        assert_eq!(
            coordinator.handle_key(&mut engine, &key('y')),
            KeyOutcome::Handled
        );
        assert_eq!(bus.responses(), vec![("a".to_string(), true)]);
        assert_eq!(prompt_id(&engine).as_deref(), Some("b"));
        assert!(coordinator.is_processing());
        assert_eq!(engine.focused(), Some(&PanelId::Input));

        coordinator.handle_key(&mut engine, &key('n'));
        assert_eq!(bus.responses()[1], ("b".to_string(), false));
        assert_eq!(engine.input_mut().unwrap().text(), "h");
        assert!(!coordinator.is_processing());
    }

    #[test]
    fn test_auto_accept_bypasses_prompt() {
        let (bus, mut coordinator, mut engine) = setup(vec!["read_file", "list_dir"]);
        engine.focus_panel(&PanelId::Conversation).unwrap();

        assert_eq!(
            coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "read_file")),
            Submission::AutoAccepted
        );
        assert_eq!(bus.responses(), vec![("a".to_string(), true)]);
        assert!(!coordinator.is_processing());
        assert_eq!(coordinator.queue_status(), QueueStatus::default());
        assert_eq!(engine.focused(), Some(&PanelId::Conversation));
        assert!(prompt_id(&engine).is_none());
        assert_eq!(engine.conversation_mut().unwrap().messages().len(), 1);

        // Hidden subjects are accepted without a notice
        coordinator.submit(&mut engine, ConfirmationRequest::tool("b", "list_dir"));
        assert_eq!(engine.conversation_mut().unwrap().messages().len(), 1);
        assert_eq!(bus.responses().len(), 2);
    }

    #[test]
    fn test_execution_ids_are_resolved_once() {
        let (bus, mut coordinator, mut engine) = setup(vec![]);
        coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "shell"));
        assert_eq!(
            coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "shell")),
            Submission::Duplicate
        );

        assert!(coordinator.resolve(&mut engine, true).is_some());
        assert!(coordinator.resolve(&mut engine, true).is_none());
        assert_eq!(
            coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "shell")),
            Submission::Duplicate
        );
        assert_eq!(bus.responses(), vec![("a".to_string(), true)]);
    }

    #[test]
    fn test_cancel_declines_active_and_queued() {
        let (bus, mut coordinator, mut engine) = setup(vec![]);
        engine.input_mut().unwrap().insert('d');
        for id in ["a", "b", "c"] {
            coordinator.submit(&mut engine, ConfirmationRequest::tool(id, "shell"));
        }

        let responses = coordinator.cancel_active(&mut engine);
        assert_eq!(responses.len(), 3);
        assert_eq!(
            bus.responses(),
            vec![
                ("a".to_string(), false),
                ("b".to_string(), false),
                ("c".to_string(), false)
            ]
        );
        assert_eq!(coordinator.queue_status(), QueueStatus::default());
        assert_eq!(engine.input_mut().unwrap().text(), "d");
        assert!(coordinator.cancel_active(&mut engine).is_empty());
    }

    #[test]
    fn test_keys_without_prompt_or_unrelated_are_not_handled() {
        let (bus, mut coordinator, mut engine) = setup(vec![]);
        assert_eq!(
            coordinator.handle_key(&mut engine, &key('y')),
            KeyOutcome::NotHandled
        );

        coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "shell"));
        assert_eq!(
            coordinator.handle_key(&mut engine, &key('x')),
            KeyOutcome::NotHandled
        );
        assert!(coordinator.is_processing());
        assert!(bus.responses().is_empty());
    }

    #[test]
    fn test_preview_opens_and_closes_with_prompt() {
        let (_bus, mut coordinator, mut engine) = setup(vec![]);
        let request = ConfirmationRequest::user("a", "Apply change")
            .with_content(ContentType::Diff, "--- a\n+++ b\n-x\n+y")
            .with_file_path("lib.rs");
        coordinator.submit(&mut engine, request);

        assert!(engine.is_visible(&PanelId::DiffViewer));
        let viewer = engine.diff_viewer_mut().unwrap();
        assert_eq!(viewer.content(), "--- a\n+++ b\n-x\n+y");

        coordinator.handle_key(&mut engine, &key('1'));
        assert!(!engine.right_panel().visible);
    }

    #[test]
    fn test_prompt_frame_uses_theme_colour() {
        let (_bus, mut coordinator, mut engine) = setup(vec![]);
        coordinator.submit(&mut engine, ConfirmationRequest::tool("a", "shell"));
        engine.layout(100, 30);
        let secondary = engine.theme().secondary;
        assert_eq!(
            engine.view(&PanelId::Input).unwrap().frame_color,
            secondary
        );

        coordinator.resolve(&mut engine, false);
        engine.layout(100, 30);
        assert_ne!(
            engine.view(&PanelId::Input).unwrap().frame_color,
            secondary
        );
    }
}
