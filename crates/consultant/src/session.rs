//! Consultation session: the handle a front end drives.
//!
//! The session owns the conversation store, the staged template input, the
//! copy indicator and the event log. At most one generation request runs at
//! a time; a second `send` while one is outstanding is rejected.

use parking_lot::Mutex;
use providers::{GeminiClient, TextGenerator};
use shared::events::{EventEntry, EventFilter, EventLog, SessionEvent};
use shared::settings::ConsultSettings;
use shared::{Message, MessageId, Mode, PromptTemplate, TemplateFilter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use uuid::Uuid;

use crate::conversation::ConversationStore;
use crate::copy_indicator::CopyIndicator;
use crate::error::ConsultError;
use crate::generation::{model_for, GenerationClient, GenerationOutcome};
use crate::templates::TemplateCatalog;

/// Outcome of one `send`
#[derive(Debug, Clone)]
pub struct Reply {
    pub request_id: Uuid,
    pub outcome: GenerationOutcome,
    /// Appended assistant message; `None` when the conversation was reset
    /// while the request was outstanding
    pub message: Option<Message>,
}

/// Single-slot in-flight marker, released on drop
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ConsultError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| ConsultError::RequestInFlight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner {
    store: Mutex<ConversationStore>,
    pending_input: Mutex<Option<String>>,
    copy_indicator: Mutex<CopyIndicator>,
    events: Mutex<EventLog>,
    in_flight: AtomicBool,
    generator: GenerationClient,
    catalog: TemplateCatalog,
    context_window: usize,
}

/// Cheaply cloneable handle to one consultation session
#[derive(Clone)]
pub struct ConsultSession {
    inner: Arc<Inner>,
}

impl ConsultSession {
    /// Session backed by Gemini. A missing API key is reported per request.
    pub fn new(settings: &ConsultSettings) -> Result<Self, ConsultError> {
        let client = GeminiClient::from_settings(&settings.model, &settings.auth)?;
        if !client.has_credential() {
            tracing::warn!("no API key configured; requests will fail until one is set");
        }
        Ok(Self::with_backend(Arc::new(client), settings))
    }

    pub fn with_backend(backend: Arc<dyn TextGenerator>, settings: &ConsultSettings) -> Self {
        let store = ConversationStore::new();
        tracing::info!(conversation_id = %store.id(), provider = backend.id(), "session started");
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                pending_input: Mutex::new(None),
                copy_indicator: Mutex::new(CopyIndicator::new(Duration::from_millis(
                    settings.copy_indicator_ms,
                ))),
                events: Mutex::new(EventLog::new()),
                in_flight: AtomicBool::new(false),
                generator: GenerationClient::new(backend, settings.model.clone()),
                catalog: TemplateCatalog::builtin(),
                context_window: settings.context_window,
            }),
        }
    }

    fn record(&self, event: SessionEvent) {
        self.inner.events.lock().record(event);
    }

    pub fn mode(&self) -> Mode {
        self.inner.store.lock().mode()
    }

    pub fn set_mode(&self, mode: Mode) {
        let previous = self.inner.store.lock().mode_controller().set_mode(mode);
        if previous != mode {
            self.record(SessionEvent::ModeChanged {
                from: previous,
                to: mode,
            });
        }
    }

    pub fn subscribe_mode(&self) -> watch::Receiver<Mode> {
        self.inner.store.lock().mode_controller().subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.store.lock().messages().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.lock().is_empty()
    }

    pub fn conversation_id(&self) -> Uuid {
        self.inner.store.lock().id()
    }

    pub fn title(&self) -> String {
        self.inner.store.lock().title().to_string()
    }

    /// Start a new conversation: no messages, default mode, nothing staged
    pub fn reset(&self) {
        let (conversation_id, previous) = {
            let mut store = self.inner.store.lock();
            let previous = store.mode();
            store.reset();
            (store.id(), previous)
        };
        self.inner.pending_input.lock().take();
        self.inner.copy_indicator.lock().clear();
        if previous != Mode::default() {
            self.record(SessionEvent::ModeChanged {
                from: previous,
                to: Mode::default(),
            });
        }
        self.record(SessionEvent::ConversationReset { conversation_id });
        tracing::info!(%conversation_id, "conversation reset");
    }

    pub fn templates(&self, search: &str, filter: TemplateFilter) -> Vec<&'static PromptTemplate> {
        self.inner.catalog.filter(search, filter)
    }

    /// Switch to the template's mode and stage its prompt for editing.
    /// Nothing is sent.
    pub fn select_template(&self, template_id: &str) -> Result<&'static PromptTemplate, ConsultError> {
        let template =
            self.inner
                .catalog
                .get(template_id)
                .ok_or_else(|| ConsultError::UnknownTemplate {
                    template_id: template_id.to_string(),
                })?;
        self.set_mode(template.mode);
        *self.inner.pending_input.lock() = Some(template.prompt.clone());
        self.record(SessionEvent::TemplateSelected {
            template_id: template.id.clone(),
            mode: template.mode,
        });
        Ok(template)
    }

    pub fn pending_input(&self) -> Option<String> {
        self.inner.pending_input.lock().clone()
    }

    pub fn take_pending_input(&self) -> Option<String> {
        self.inner.pending_input.lock().take()
    }

    /// Content to put on the clipboard; marks the message as copied
    pub fn copy_message(&self, id: MessageId) -> Result<String, ConsultError> {
        let content = self
            .inner
            .store
            .lock()
            .get(id)
            .map(|m| m.content.clone())
            .ok_or(ConsultError::UnknownMessage { message_id: id })?;
        self.inner.copy_indicator.lock().mark(id);
        Ok(content)
    }

    pub fn is_copied(&self, id: MessageId) -> bool {
        self.inner.copy_indicator.lock().is_copied(id)
    }

    pub fn events(&self, filter: &EventFilter) -> Vec<EventEntry> {
        self.inner.events.lock().query(filter)
    }

    /// Send a user message and append the assistant's reply.
    ///
    /// Provider failures come back as a `Reply` whose message carries the
    /// fallback text. Dropping the future mid-request leaves the user message
    /// in place, appends nothing else and clears the loading flag.
    pub async fn send(&self, text: &str) -> Result<Reply, ConsultError> {
        if text.trim().is_empty() {
            return Err(ConsultError::EmptyMessage);
        }
        let _in_flight = InFlight::acquire(&self.inner.in_flight)?;
        let request_id = Uuid::new_v4();

        let (conversation_id, mode, history, user_id) = {
            let mut store = self.inner.store.lock();
            // history is taken before the new message so it is not sent twice
            let history = store.context_window(self.inner.context_window);
            let mode = store.mode();
            let user_id = store.append_user_message(text)?.id;
            (store.id(), mode, history, user_id)
        };
        self.inner.pending_input.lock().take();
        self.record(SessionEvent::MessageAppended {
            message_id: user_id,
            role: shared::Role::User,
        });
        self.record(SessionEvent::GenerationStarted {
            request_id,
            mode,
            model: model_for(mode, self.inner.generator.models()).to_string(),
            history_len: history.len(),
        });

        let started = Instant::now();
        let outcome = self
            .inner
            .generator
            .generate_response(text, mode, &history)
            .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            GenerationOutcome::Failed { kind, error } => self.record(SessionEvent::GenerationFailed {
                request_id,
                kind: *kind,
                error: error.clone(),
                duration_ms,
            }),
            other => self.record(SessionEvent::GenerationFinished {
                request_id,
                duration_ms,
                empty: !other.is_answer(),
            }),
        }

        let message = {
            let mut store = self.inner.store.lock();
            if store.id() == conversation_id {
                Some(store.append_assistant_message(outcome.display_text(), mode).clone())
            } else {
                None
            }
        };
        match &message {
            Some(msg) => self.record(SessionEvent::MessageAppended {
                message_id: msg.id,
                role: msg.role,
            }),
            None => {
                tracing::info!(%request_id, "reply discarded after conversation reset");
                self.record(SessionEvent::ReplyDiscarded { request_id });
            }
        }

        Ok(Reply {
            request_id,
            outcome,
            message,
        })
    }
}
