use tokio::sync::mpsc;
use tracing::warn;

/// Default capacity for the UI event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// Action offered by a blocking dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    GoToMyCourses,
}

/// Observable side effects emitted by the views for a rendering shell.
///
/// The views never render anything themselves; toasts, dialogs, navigation
/// and the celebratory effect all cross this channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Transient notification
    Toast { level: ToastLevel, message: String },
    /// Blocking confirmation dialog with a navigation escape hatch
    Dialog {
        title: String,
        body: String,
        action: DialogAction,
    },
    /// Navigation side effect to a service-provided target
    Navigate(String),
    CelebrationStarted,
    CelebrationEnded,
}

/// Creates the UI event channel.
pub fn ui_channel(capacity: usize) -> (UiEventSender, mpsc::Receiver<UiEvent>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (UiEventSender::new(sender), receiver)
}

#[derive(Debug, Clone)]
pub struct UiEventSender {
    sender: mpsc::Sender<UiEvent>,
}

impl UiEventSender {
    /// Creates a new UiEventSender
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    /// Sends an event, best-effort. A shell that has gone away must never
    /// fail the orchestration, so a closed channel is only logged.
    pub async fn send(&self, event: UiEvent) {
        if self.sender.send(event).await.is_err() {
            warn!("ui event receiver dropped; event discarded");
        }
    }

    pub async fn toast_success(&self, message: impl Into<String>) {
        self.send(UiEvent::Toast {
            level: ToastLevel::Success,
            message: message.into(),
        })
        .await;
    }

    pub async fn toast_error(&self, message: impl Into<String>) {
        self.send(UiEvent::Toast {
            level: ToastLevel::Error,
            message: message.into(),
        })
        .await;
    }
}
