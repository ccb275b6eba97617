//! Overlay message handler.
//!
//! [`Overlay`] is a synchronous state machine over a [`Document`]. Everything
//! that happens to the page arrives as an [`OverlayMessage`]; everything that
//! must happen later or outside the page leaves as an [`Effect`]. The run loop
//! executes effects and feeds their outcomes back as messages.
//!
//! Discovery work goes through an explicit queue: mutation batches and
//! credential changes enqueue [`Discovery`] items, and one drain loop turns
//! them into bindings.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use promptassist_config::{DiscoveryPolicy, OverlayConfig, SiteDescriptor, SiteRegistry};
use promptassist_dom::{
    Document, DomError, DomEvent, EventKind, InsertPosition, MutationRecord, NodeId,
};
use promptassist_protocols::{CredentialChange, RewriteError, RewriteResult};

use crate::binding::{BindingId, InputBinding};
use crate::credential_gate::{CredentialGate, GateAction};
use crate::error::OverlayError;
use crate::locator::{self, ContainerHit, ContainerStrategy, SiteSelectors};
use crate::render;
use crate::state::ButtonState;
use crate::text_io::{self, is_blank};
use crate::watcher::{self, ContainerWatch, ContentWatch};

/// Upper bound on drain rounds per message; a page that keeps mutating in
/// response to the overlay is left alone after this many.
const MAX_PUMP_ROUNDS: usize = 32;

/// Timings and policy for one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    /// Delay before a rich editor's content change is evaluated.
    pub debounce: Duration,
    /// Delay before a success or error indicator reverts.
    pub revert_delay: Duration,
    pub discovery: DiscoveryPolicy,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self::from(&OverlayConfig::default())
    }
}

impl From<&OverlayConfig> for OverlayOptions {
    fn from(config: &OverlayConfig) -> Self {
        Self {
            debounce: config.debounce(),
            revert_delay: config.revert_delay(),
            discovery: config.discovery,
        }
    }
}

/// Input to the overlay.
#[derive(Debug, Clone)]
pub enum OverlayMessage {
    /// A batch of mutation records drained from the document.
    Mutations(Vec<MutationRecord>),
    /// An event drained from the document.
    Event(DomEvent),
    /// Credential store notification.
    Credential(CredentialChange),
    /// Credential re-read after notifications were missed.
    CredentialRefreshed(Option<String>),
    /// A rewrite call finished.
    RewriteDone {
        binding: BindingId,
        request: u64,
        outcome: Result<RewriteResult, RewriteError>,
    },
    /// A success or error indicator is due to revert.
    RevertDue { binding: BindingId, generation: u64 },
    /// A rich editor's content has been quiet for the debounce delay.
    SettleDue { binding: BindingId, generation: u64 },
}

/// Work the overlay asks its host to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call the rewrite collaborator once and report back with `RewriteDone`.
    Rewrite {
        binding: BindingId,
        request: u64,
        prompt: String,
    },
    /// Send `RevertDue` after the delay.
    ScheduleRevert {
        binding: BindingId,
        generation: u64,
        after: Duration,
    },
    /// Send `SettleDue` after the delay.
    ScheduleSettle {
        binding: BindingId,
        generation: u64,
        after: Duration,
    },
    /// Ask the host to show the credential entry surface.
    ShowCredentialSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Discovery {
    /// Look for inputs across the page.
    Scan,
    /// Bind one input.
    Candidate(NodeId),
    /// Retry container discovery for a binding parked in a synthesized container.
    RetryContainer(BindingId),
}

/// The overlay for one page.
#[derive(Debug)]
pub struct Overlay {
    site: Option<Arc<SiteDescriptor>>,
    selectors: Option<SiteSelectors>,
    options: OverlayOptions,
    gate: CredentialGate,
    bindings: Vec<InputBinding>,
    queue: VecDeque<Discovery>,
    next_binding: u64,
    next_request: u64,
}

impl Overlay {
    /// Overlay for a resolved descriptor. Without one the overlay is inert.
    pub fn new(
        site: Option<Arc<SiteDescriptor>>,
        options: OverlayOptions,
    ) -> Result<Self, OverlayError> {
        let selectors = site.as_deref().map(SiteSelectors::compile).transpose()?;
        Ok(Self {
            site,
            selectors,
            options,
            gate: CredentialGate::default(),
            bindings: Vec::new(),
            queue: VecDeque::new(),
            next_binding: 0,
            next_request: 0,
        })
    }

    /// Resolve the page's descriptor and build the overlay.
    pub fn for_page(
        registry: &SiteRegistry,
        doc: &Document,
        options: OverlayOptions,
    ) -> Result<Self, OverlayError> {
        let site = registry.resolve(doc.url());
        if site.is_none() {
            info!("No site descriptor for {}, overlay stays inert", doc.url());
        }
        Self::new(site, options)
    }

    /// Whether a descriptor matched the page.
    pub fn is_active(&self) -> bool {
        self.site.is_some()
    }

    pub fn site(&self) -> Option<&SiteDescriptor> {
        self.site.as_deref()
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    pub fn has_credential(&self) -> bool {
        self.gate.has_credential()
    }

    /// Bindings in discovery order.
    pub fn bindings(&self) -> &[InputBinding] {
        &self.bindings
    }

    pub fn binding(&self, id: BindingId) -> Option<&InputBinding> {
        self.bindings.iter().find(|b| b.id == id)
    }

    pub fn binding_for_input(&self, input: NodeId) -> Option<&InputBinding> {
        self.bindings.iter().find(|b| b.input == input)
    }

    /// Button state of a bound input.
    pub fn state_of(&self, input: NodeId) -> Option<&ButtonState> {
        self.binding_for_input(input).map(|b| &b.state)
    }

    /// Initial scan, run once the credential has been read.
    pub fn start(&mut self, doc: &mut Document, credential: Option<&str>) -> Vec<Effect> {
        self.gate = CredentialGate::new(credential);
        let mut effects = Vec::new();
        let Some(site) = self.site.clone() else {
            discard_pending(doc);
            return effects;
        };

        info!(
            "Overlay active on {} using site '{}' (credential {})",
            doc.url(),
            site.display_name(),
            if self.gate.has_credential() { "present" } else { "absent" }
        );
        // The scan below covers everything the page built so far.
        doc.take_mutations();
        self.enqueue(Discovery::Scan);
        self.run_discovery(doc);
        self.pump_into(doc, &mut effects);
        effects
    }

    /// Handle one message, then drain whatever it caused on the page.
    pub fn handle(&mut self, doc: &mut Document, message: OverlayMessage) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.is_active() {
            discard_pending(doc);
            return effects;
        }

        match message {
            OverlayMessage::Mutations(records) => self.on_mutations(doc, &records, &mut effects),
            OverlayMessage::Event(event) => self.on_event(doc, event, &mut effects),
            OverlayMessage::Credential(change) => {
                let action = self.gate.apply(&change);
                self.on_gate(doc, action);
            }
            OverlayMessage::CredentialRefreshed(value) => {
                let action = self.gate.sync(value.as_deref());
                self.on_gate(doc, action);
            }
            OverlayMessage::RewriteDone {
                binding,
                request,
                outcome,
            } => self.on_rewrite_done(doc, binding, request, outcome, &mut effects),
            OverlayMessage::RevertDue {
                binding,
                generation,
            } => self.on_revert(doc, binding, generation),
            OverlayMessage::SettleDue {
                binding,
                generation,
            } => self.on_settle(doc, binding, generation),
        }

        self.pump_into(doc, &mut effects);
        effects
    }

    /// Drain mutation records and events left on the document, e.g. after
    /// the host edited the page.
    pub fn pump(&mut self, doc: &mut Document) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.is_active() {
            self.pump_into(doc, &mut effects);
        } else {
            discard_pending(doc);
        }
        effects
    }

    fn pump_into(&mut self, doc: &mut Document, effects: &mut Vec<Effect>) {
        for _ in 0..MAX_PUMP_ROUNDS {
            let records = doc.take_mutations();
            let events = doc.take_events();
            if records.is_empty() && events.is_empty() {
                return;
            }
            if !records.is_empty() {
                self.on_mutations(doc, &records, effects);
            }
            for event in events {
                self.on_event(doc, event, effects);
            }
        }
        warn!("Page did not settle after {} rounds", MAX_PUMP_ROUNDS);
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    fn enqueue(&mut self, item: Discovery) {
        if !self.queue.contains(&item) {
            self.queue.push_back(item);
        }
    }

    fn run_discovery(&mut self, doc: &mut Document) {
        while let Some(item) = self.queue.pop_front() {
            match item {
                Discovery::Scan => self.scan(doc),
                Discovery::Candidate(input) => self.bind(doc, input),
                Discovery::RetryContainer(id) => self.retry_container(doc, id),
            }
        }
    }

    fn scan(&mut self, doc: &Document) {
        if self.options.discovery == DiscoveryPolicy::RequireCredential
            && !self.gate.has_credential()
        {
            debug!("No credential, discovery deferred");
            return;
        }
        let Some(selectors) = &self.selectors else {
            return;
        };
        let found = locator::find_inputs(doc, selectors);
        let fresh: Vec<NodeId> = found
            .into_iter()
            .filter(|&input| self.binding_for_input(input).is_none())
            .collect();
        if !fresh.is_empty() {
            debug!("Discovered {} new input(s)", fresh.len());
        }
        for input in fresh {
            self.enqueue(Discovery::Candidate(input));
        }
    }

    fn bind(&mut self, doc: &mut Document, input: NodeId) {
        // Re-binding a bound input is a no-op.
        if self.binding_for_input(input).is_some() || !doc.is_connected(input) {
            return;
        }
        let (Some(site), Some(selectors)) = (self.site.clone(), self.selectors.as_ref()) else {
            return;
        };

        let hit = match locator::find_container(doc, input, &selectors.container) {
            Ok(hit) => hit,
            Err(e) => {
                warn!("No place for a button next to input {}: {}", input, e);
                return;
            }
        };

        match self.attach(doc, &site, input, hit) {
            Ok(binding) => {
                info!(
                    "Bound input {} ({}) as {}, button in {} container {}, state {}",
                    input,
                    binding.kind.name(),
                    binding.id,
                    hit.strategy.name(),
                    hit.node,
                    binding.state
                );
                self.bindings.push(binding);
            }
            Err(e) => warn!("Failed to attach button to input {}: {}", input, e),
        }
    }

    fn attach(
        &mut self,
        doc: &mut Document,
        site: &SiteDescriptor,
        input: NodeId,
        hit: ContainerHit,
    ) -> Result<InputBinding, DomError> {
        let synthesized = hit.strategy == ContainerStrategy::Synthesized;
        let button = render::create_button(doc, site)?;
        let position = if synthesized {
            InsertPosition::InsideEnd
        } else {
            site.button_container.insert_position
        };
        doc.insert_adjacent(hit.node, position, button)?;

        let kind = text_io::classify(doc, input);
        self.next_binding += 1;
        let mut binding = InputBinding {
            id: BindingId(self.next_binding),
            input,
            kind,
            button,
            container: hit.node,
            strategy: hit.strategy,
            container_watch: synthesized
                .then(|| ContainerWatch::new(locator::watch_scope(doc, input))),
            content_watch: text_io::adapter(kind)
                .watches_content()
                .then(|| ContentWatch::new(input)),
            state: ButtonState::NoCredential,
            has_credential: false,
            hovered: false,
            drawn: None,
            revert_generation: 0,
            pending_request: None,
        };
        evaluate(doc, site, &self.gate, &mut binding);
        Ok(binding)
    }

    fn retry_container(&mut self, doc: &mut Document, id: BindingId) {
        let (Some(site), Some(selectors)) = (self.site.clone(), self.selectors.as_ref()) else {
            return;
        };
        let Some(index) = self.bindings.iter().position(|b| b.id == id) else {
            return;
        };
        let input = self.bindings[index].input;
        let Some(hit) = locator::find_existing_container(doc, input, &selectors.container) else {
            return;
        };

        let binding = &mut self.bindings[index];
        let synthetic = binding.container;
        let moved = doc
            .insert_adjacent(hit.node, site.button_container.insert_position, binding.button)
            .and_then(|_| doc.remove(synthetic));
        match moved {
            Ok(()) => {
                info!(
                    "Moved {} button into {} container {}",
                    binding.id,
                    hit.strategy.name(),
                    hit.node
                );
                binding.container = hit.node;
                binding.strategy = hit.strategy;
                binding.container_watch = None;
            }
            Err(e) => warn!("Failed to move {} button: {}", binding.id, e),
        }
    }

    /// Drop bindings whose input or button left the page. A binding that lost
    /// only its button is rediscovered.
    fn prune_detached(&mut self, doc: &mut Document) {
        let (kept, gone): (Vec<_>, Vec<_>) = std::mem::take(&mut self.bindings)
            .into_iter()
            .partition(|b| doc.is_connected(b.input) && doc.is_connected(b.button));
        self.bindings = kept;

        for binding in gone {
            if doc.is_connected(binding.input) {
                debug!("Button of {} was removed by the page, rebinding", binding.id);
                self.enqueue(Discovery::Scan);
            } else {
                info!("Input {} left the page, dropping {}", binding.input, binding.id);
            }
            let mut leftovers = vec![binding.button];
            if binding.container_watch.is_some() {
                leftovers.push(binding.container);
            }
            for node in leftovers {
                if doc.is_connected(node) {
                    if let Err(e) = doc.remove(node) {
                        warn!("Failed to remove {}: {}", node, e);
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Page changes
    // ------------------------------------------------------------------

    fn on_mutations(
        &mut self,
        doc: &mut Document,
        records: &[MutationRecord],
        effects: &mut Vec<Effect>,
    ) {
        if watcher::removes_nodes(records) {
            self.prune_detached(doc);
        }

        let debounce = self.options.debounce;
        for binding in &mut self.bindings {
            if let Some(watch) = binding.content_watch.as_mut() {
                if watch.is_triggered(doc, records) {
                    effects.push(Effect::ScheduleSettle {
                        binding: binding.id,
                        generation: watch.bump(),
                        after: debounce,
                    });
                }
            }
        }

        let retries: Vec<BindingId> = self
            .bindings
            .iter()
            .filter(|b| {
                b.container_watch
                    .as_ref()
                    .is_some_and(|w| w.is_triggered(doc, records))
            })
            .map(|b| b.id)
            .collect();
        for id in retries {
            self.enqueue(Discovery::RetryContainer(id));
        }

        if watcher::adds_foreign_nodes(doc, records) {
            self.enqueue(Discovery::Scan);
        }
        self.run_discovery(doc);
    }

    fn on_event(&mut self, doc: &mut Document, event: DomEvent, effects: &mut Vec<Effect>) {
        if let Some(index) = self
            .bindings
            .iter()
            .position(|b| doc.contains(b.input, event.target))
        {
            if matches!(
                event.kind,
                EventKind::Input | EventKind::Change | EventKind::KeyDown { .. }
            ) {
                self.refresh(doc, index);
            }
            return;
        }

        let Some(index) = self
            .bindings
            .iter()
            .position(|b| doc.contains(b.button, event.target))
        else {
            return;
        };
        match event.kind {
            EventKind::Click => self.on_click(doc, index, effects),
            EventKind::PointerEnter => self.set_hovered(doc, index, true),
            EventKind::PointerLeave => self.set_hovered(doc, index, false),
            _ => {}
        }
    }

    /// Re-derive a resting state from the current prompt text.
    fn refresh(&mut self, doc: &mut Document, index: usize) {
        let Some(site) = self.site.clone() else {
            return;
        };
        let binding = &mut self.bindings[index];
        if binding.state.is_resting() {
            evaluate(doc, &site, &self.gate, binding);
        }
    }

    fn set_hovered(&mut self, doc: &mut Document, index: usize, hovered: bool) {
        let Some(site) = self.site.clone() else {
            return;
        };
        let binding = &mut self.bindings[index];
        binding.hovered = hovered;
        let state = binding.state.clone();
        transition(doc, &site, binding, state);
    }

    fn on_click(&mut self, doc: &mut Document, index: usize, effects: &mut Vec<Effect>) {
        let Some(site) = self.site.clone() else {
            return;
        };
        let binding = &mut self.bindings[index];
        let state = binding.state.clone();
        match state {
            ButtonState::NoCredential => {
                info!("{} clicked without a credential", binding.id);
                effects.push(Effect::ShowCredentialSurface);
            }
            ButtonState::Ready => {
                let prompt = text_io::adapter(binding.kind).read(doc, binding.input);
                if is_blank(&prompt) {
                    evaluate(doc, &site, &self.gate, binding);
                    return;
                }
                self.next_request += 1;
                let request = self.next_request;
                binding.pending_request = Some(request);
                transition(doc, &site, binding, ButtonState::Busy);
                info!("{} requesting rewrite #{}", binding.id, request);
                effects.push(Effect::Rewrite {
                    binding: binding.id,
                    request,
                    prompt,
                });
            }
            other => debug!("Ignoring click on {} while {}", binding.id, other),
        }
    }

    // ------------------------------------------------------------------
    // Collaborator outcomes and timers
    // ------------------------------------------------------------------

    fn on_rewrite_done(
        &mut self,
        doc: &mut Document,
        id: BindingId,
        request: u64,
        outcome: Result<RewriteResult, RewriteError>,
        effects: &mut Vec<Effect>,
    ) {
        let Some(site) = self.site.clone() else {
            return;
        };
        let Some(index) = self.bindings.iter().position(|b| b.id == id) else {
            debug!("Rewrite #{} finished for dropped {}", request, id);
            return;
        };
        let revert_delay = self.options.revert_delay;
        let binding = &mut self.bindings[index];
        if binding.pending_request != Some(request) {
            debug!("Ignoring stale rewrite #{} for {}", request, id);
            return;
        }
        binding.pending_request = None;

        let outcome = outcome.and_then(|result| {
            if result.is_valid() {
                Ok(result)
            } else {
                Err(RewriteError::EmptyResponse)
            }
        });
        let next = match outcome {
            Ok(result) => {
                let io = text_io::adapter(binding.kind);
                match io.write(doc, binding.input, &result.enhanced_prompt) {
                    Ok(()) => {
                        info!("{} prompt improved", id);
                        ButtonState::Success
                    }
                    Err(e) => {
                        warn!("{} failed to write the improved prompt: {}", id, e);
                        ButtonState::Error(e.to_string())
                    }
                }
            }
            Err(e) => {
                warn!("{} rewrite failed: {}", id, e);
                ButtonState::Error(e.to_string())
            }
        };

        // The credential went away mid-flight; that state wins.
        if binding.state != ButtonState::Busy {
            debug!("{} left busy before rewrite #{} finished", id, request);
            return;
        }
        binding.revert_generation += 1;
        let generation = binding.revert_generation;
        transition(doc, &site, binding, next);
        effects.push(Effect::ScheduleRevert {
            binding: id,
            generation,
            after: revert_delay,
        });
    }

    fn on_revert(&mut self, doc: &mut Document, id: BindingId, generation: u64) {
        let Some(site) = self.site.clone() else {
            return;
        };
        let Some(binding) = self.bindings.iter_mut().find(|b| b.id == id) else {
            return;
        };
        if binding.revert_generation == generation && binding.state.is_transient() {
            evaluate(doc, &site, &self.gate, binding);
        }
    }

    fn on_settle(&mut self, doc: &mut Document, id: BindingId, generation: u64) {
        let Some(site) = self.site.clone() else {
            return;
        };
        let Some(binding) = self.bindings.iter_mut().find(|b| b.id == id) else {
            return;
        };
        let current = binding
            .content_watch
            .as_ref()
            .is_some_and(|w| w.is_current(generation));
        if current && binding.state.is_resting() {
            evaluate(doc, &site, &self.gate, binding);
        }
    }

    fn on_gate(&mut self, doc: &mut Document, action: GateAction) {
        let Some(site) = self.site.clone() else {
            return;
        };
        match action {
            GateAction::CollapseAll => {
                for binding in &mut self.bindings {
                    // Pending reverts must not resurrect the old state.
                    binding.revert_generation += 1;
                    binding.has_credential = false;
                    transition(doc, &site, binding, ButtonState::NoCredential);
                }
            }
            GateAction::Rediscover => {
                for binding in &mut self.bindings {
                    if binding.state.is_resting() {
                        evaluate(doc, &site, &self.gate, binding);
                    }
                }
                self.enqueue(Discovery::Scan);
                self.run_discovery(doc);
            }
            GateAction::Nothing => {}
        }
    }
}

/// Resting state from credential presence and the current prompt text.
fn evaluate(
    doc: &mut Document,
    site: &SiteDescriptor,
    gate: &CredentialGate,
    binding: &mut InputBinding,
) {
    let text = text_io::adapter(binding.kind).read(doc, binding.input);
    binding.has_credential = gate.has_credential();
    let next = ButtonState::evaluate(binding.has_credential, is_blank(&text));
    transition(doc, site, binding, next);
}

fn transition(
    doc: &mut Document,
    site: &SiteDescriptor,
    binding: &mut InputBinding,
    next: ButtonState,
) {
    if binding.state != next {
        debug!("{}: {} -> {}", binding.id, binding.state, next);
    }
    binding.state = next;
    if let Err(e) = render::render(
        doc,
        binding.button,
        site,
        &binding.state,
        binding.hovered,
        &mut binding.drawn,
    ) {
        warn!("Failed to render {}: {}", binding.id, e);
    }
}

fn discard_pending(doc: &mut Document) {
    doc.take_mutations();
    doc.take_events();
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
