use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use questionnaire_bus::{EventBus, EventKey, Handler, HandlerError, Interests, Subscriber};
use tracing::debug;

use crate::{
    BusinessRule, HelpLinkPrompt, InfoPrompt, PromptActivated, PromptDeactivated, PromptEvent,
    PromptId, PromptKind, QuestionPrompt, SingleChoicePrompt, TextPrompt, WiringError,
};

/// A single prompt in a questionnaire.
///
/// Prompts are always shared as `Arc<Prompt>`: the tree, the event bus and
/// published events all refer to the same instance. Every change of the
/// `active` flag is published on the bus the prompt is attached to.
pub struct Prompt {
    id: PromptId,
    this: Weak<Prompt>,
    text: String,
    description: Option<String>,
    kind: PromptKind,
    active: AtomicBool,
    value: RwLock<Option<String>>,
    rules: Vec<Box<dyn BusinessRule>>,
    dependencies: RwLock<HashMap<EventKey, Vec<PromptId>>>,
    bus: Mutex<Weak<EventBus>>,
    subscribed: AtomicBool,
}

impl Prompt {
    /// Create an active prompt with the given text and kind.
    pub fn new(text: impl Into<String>, kind: PromptKind) -> Arc<Self> {
        Self::builder(text, kind).build()
    }

    /// Start building a prompt.
    pub fn builder(text: impl Into<String>, kind: PromptKind) -> PromptBuilder {
        PromptBuilder {
            text: text.into(),
            description: None,
            kind,
            active: true,
            value: None,
            rules: Vec::new(),
        }
    }

    /// A mandatory numbered question.
    pub fn question(number: u32, title: impl Into<String>, prompts: Vec<Arc<Prompt>>) -> Arc<Self> {
        Self::new(title, PromptKind::Question(QuestionPrompt::new(number, prompts)))
    }

    /// A single-choice answer over the given options.
    pub fn single_choice(options: Vec<Arc<Prompt>>) -> Arc<Self> {
        Self::new("", PromptKind::SingleChoice(SingleChoicePrompt::new(options)))
    }

    /// A boolean answer, unchecked until answered.
    pub fn boolean(text: impl Into<String>) -> Arc<Self> {
        Self::new(text, PromptKind::Boolean)
    }

    /// A free text answer.
    pub fn text_answer(max_length: usize) -> Arc<Self> {
        Self::new("", PromptKind::Text(TextPrompt::new(max_length)))
    }

    pub fn note(text: impl Into<String>) -> Arc<Self> {
        Self::new(text, PromptKind::Note)
    }

    pub fn info(text: impl Into<String>) -> Arc<Self> {
        Self::new(text, PromptKind::Info(InfoPrompt::plain()))
    }

    pub fn bold_info(text: impl Into<String>) -> Arc<Self> {
        Self::new(text, PromptKind::Info(InfoPrompt::bold()))
    }

    /// A titled help link grouping the given prompts.
    pub fn help_link(title: impl Into<String>, prompts: Vec<Arc<Prompt>>) -> Arc<Self> {
        Self::new(title, PromptKind::HelpLink(HelpLinkPrompt::new(prompts)))
    }

    pub fn id(&self) -> PromptId {
        self.id
    }

    /// The display text (the title for questions and help links).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> &PromptKind {
        &self.kind
    }

    /// Nested prompts, empty for leaves.
    pub fn children(&self) -> &[Arc<Prompt>] {
        self.kind.children()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Activate or deactivate the prompt.
    ///
    /// Publishes `PromptActivated` or `PromptDeactivated` exactly once per
    /// actual change; setting the current value publishes nothing. Returns
    /// whether the state changed.
    pub fn set_active(&self, active: bool) -> bool {
        if self.active.swap(active, Ordering::AcqRel) == active {
            return false;
        }

        let (Some(bus), Some(this)) = (self.bus(), self.this.upgrade()) else {
            debug!(prompt = %self.id, active, "prompt not attached to a bus, change not published");
            return true;
        };

        if active {
            bus.publish(PromptActivated { prompt: this });
        } else {
            bus.publish(PromptDeactivated { prompt: this });
        }
        true
    }

    /// The current answer, if any.
    pub fn value(&self) -> Option<String> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value.into());
    }

    pub fn clear_value(&self) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a boolean answer is checked.
    pub fn is_checked(&self) -> bool {
        self.value().as_deref() == Some("true")
    }

    /// Check or uncheck a boolean answer.
    pub fn set_checked(&self, checked: bool) {
        self.set_value(if checked { "true" } else { "false" });
    }

    /// Check every business rule attached to this prompt.
    pub fn is_valid(&self) -> bool {
        self.rules.iter().all(|rule| rule.is_valid(self))
    }

    /// Record that this prompt reacts to `E` events coming from `source`.
    ///
    /// This only fills the dependency map. The prompt must also be
    /// subscribed for the reaction to happen; [`Prompt::watch`] does both.
    pub fn add_dependency<E: PromptEvent>(&self, source: &Prompt) {
        let mut dependencies = self
            .dependencies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let sources = dependencies.entry(EventKey::of::<E>()).or_default();
        if !sources.contains(&source.id) {
            sources.push(source.id);
        }
    }

    /// Prompts whose `E` events this prompt reacts to, in the order they were added.
    pub fn dependencies<E: PromptEvent>(&self) -> Vec<PromptId> {
        self.dependencies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&EventKey::of::<E>())
            .cloned()
            .unwrap_or_default()
    }

    /// Check if this prompt reacts to `E` events coming from `source`.
    pub fn depends_on<E: PromptEvent>(&self, source: PromptId) -> bool {
        self.dependencies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&EventKey::of::<E>())
            .is_some_and(|sources| sources.contains(&source))
    }

    /// Deactivate this prompt whenever `dependency` is deactivated.
    ///
    /// Records the dependency and subscribes this prompt to the bus in one
    /// step. Both prompts must be attached to the same bus. Watching several
    /// prompts subscribes only once.
    pub fn watch(self: &Arc<Self>, dependency: &Prompt) -> Result<(), WiringError> {
        if self.id == dependency.id {
            return Err(WiringError::SelfDependency(self.id));
        }
        let bus = self.bus().ok_or(WiringError::NotAttached(self.id))?;
        match dependency.bus() {
            None => return Err(WiringError::NotAttached(dependency.id)),
            Some(other) if !Arc::ptr_eq(&bus, &other) => {
                return Err(WiringError::ForeignBus(dependency.id));
            }
            Some(_) => {}
        }

        self.add_dependency::<PromptDeactivated>(dependency);
        if !self.subscribed.swap(true, Ordering::AcqRel) {
            bus.subscribe(self);
        }

        debug!(
            dependency = %dependency.id,
            dependent = %self.id,
            "wired deactivation dependency"
        );
        Ok(())
    }

    /// Attach this prompt to the bus its state changes are published on.
    ///
    /// Attaching again to the same bus is a no-op. A prompt whose bus has been
    /// dropped counts as unattached and can join a new one; its wiring from
    /// the old bus is discarded and must be set up again with [`Prompt::watch`].
    pub fn attach(&self, bus: &Arc<EventBus>) -> Result<(), WiringError> {
        let mut attached = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        if Weak::ptr_eq(&*attached, &Arc::downgrade(bus)) {
            return Ok(());
        }
        if attached.strong_count() > 0 {
            return Err(WiringError::ForeignBus(self.id));
        }

        let rebound = !Weak::ptr_eq(&*attached, &Weak::new());
        *attached = Arc::downgrade(bus);
        if rebound {
            self.subscribed.store(false, Ordering::Release);
            self.dependencies
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
            debug!(prompt = %self.id, "previous bus dropped, prompt rebound");
        }
        Ok(())
    }

    /// Check that [`Prompt::attach`] would accept `bus`, without attaching.
    pub fn can_attach(&self, bus: &Arc<EventBus>) -> Result<(), WiringError> {
        let attached = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        if attached.strong_count() > 0 && !Weak::ptr_eq(&*attached, &Arc::downgrade(bus)) {
            Err(WiringError::ForeignBus(self.id))
        } else {
            Ok(())
        }
    }

    /// The bus this prompt publishes on, if attached and still alive.
    pub fn bus(&self) -> Option<Arc<EventBus>> {
        self.bus
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .upgrade()
    }

    /// Check if the prompt is attached to this bus.
    pub fn is_attached_to(&self, bus: &Arc<EventBus>) -> bool {
        self.bus().is_some_and(|attached| Arc::ptr_eq(&attached, bus))
    }
}

impl Subscriber for Prompt {
    fn interests(interests: &mut Interests<Self>) {
        interests.on::<PromptDeactivated>();
    }
}

impl Handler<PromptDeactivated> for Prompt {
    fn on_event(&self, event: &PromptDeactivated) -> Result<(), HandlerError> {
        let source = event.prompt();
        debug!(source = source.text(), target = self.text(), "PromptDeactivated received");

        if self.depends_on::<PromptDeactivated>(source.id()) {
            self.set_active(false);
        }
        Ok(())
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("active", &self.is_active())
            .field("children", &self.children().len())
            .finish_non_exhaustive()
    }
}

/// Builder for prompts that need more than text and kind.
pub struct PromptBuilder {
    text: String,
    description: Option<String>,
    kind: PromptKind,
    active: bool,
    value: Option<String>,
    rules: Vec<Box<dyn BusinessRule>>,
}

impl PromptBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Start in the inactive state.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Pre-fill the answer.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a validation rule.
    pub fn rule(mut self, rule: impl BusinessRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> Arc<Prompt> {
        Arc::new_cyclic(|this| Prompt {
            id: PromptId::next(),
            this: this.clone(),
            text: self.text,
            description: self.description,
            kind: self.kind,
            active: AtomicBool::new(self.active),
            value: RwLock::new(self.value),
            rules: self.rules,
            dependencies: RwLock::new(HashMap::new()),
            bus: Mutex::new(Weak::new()),
            subscribed: AtomicBool::new(false),
        })
    }
}
