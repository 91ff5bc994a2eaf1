use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::accordion::{AccordionState, FragmentUpdate, Transition};
use crate::answer::{AnswerSource, Dispatch};
use crate::debounce::{wait_until, Debouncer};
use crate::markup::{render_outcome, MarkupPolicy};
use crate::model::{AnswerOutcome, DisplayItem};
use crate::render::render;
use crate::search::{filter, Query};
use crate::store::FaqStore;
use crate::view::FaqView;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The search box changed; carries its full current value.
    Input(String),
    /// Submit button or confirm key; carries the search box value.
    Submit(String),
    /// An item header was clicked.
    Toggle(String),
    /// The address fragment changed from outside (back/forward, pasted link).
    FragmentChanged(Option<String>),
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub markup: MarkupPolicy,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            markup: MarkupPolicy::default(),
        }
    }
}

struct Completion {
    seq: u64,
    outcome: AnswerOutcome,
}

struct InFlight {
    seq: u64,
    handle: JoinHandle<()>,
}

enum Wake {
    Event(Option<UiEvent>),
    DebounceElapsed,
    Answer(Completion),
}

/// Search-and-answer controller.
///
/// Owns the widget's only mutable state and is driven by one event loop:
/// UI events, the live-filter debounce timer, and answer completions.
/// Live input filters only; the answer service is asked on explicit submit.
pub struct FaqController<V> {
    store: FaqStore,
    view: V,
    answers: Arc<dyn AnswerSource>,
    markup: MarkupPolicy,
    accordion: AccordionState,
    live_filter: Debouncer<String>,
    in_flight: Option<InFlight>,
    latest_seq: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<V: FaqView> FaqController<V> {
    pub fn new(
        store: FaqStore,
        view: V,
        answers: Arc<dyn AnswerSource>,
        settings: ControllerSettings,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            store,
            view,
            answers,
            markup: settings.markup,
            accordion: AccordionState::new(),
            live_filter: Debouncer::new(settings.debounce),
            in_flight: None,
            latest_seq: 0,
            completions_tx,
            completions_rx,
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[cfg(test)]
    pub fn into_view(self) -> V {
        self.view
    }

    #[cfg(test)]
    pub fn accordion(&self) -> &AccordionState {
        &self.accordion
    }

    /// Initial paint: full list, answer region hidden, then the load-time fragment.
    pub fn start(&mut self, fragment: Option<&str>) {
        self.view.set_loading(false);
        self.view.set_answer_visible(false);
        let items = render(self.store.records());
        self.render_items(items);
        self.apply_fragment(fragment);
        self.view.commit();
        if self.store.is_empty() {
            warn!("FAQ store is empty, only generated answers will be shown");
        }
        info!(
            records = self.store.len(),
            debounce_ms = self.live_filter.quiet().as_millis(),
            "faq widget ready"
        );
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Input(value) => {
                if self.live_filter.schedule(value) {
                    debug!("live filter rescheduled");
                }
            }
            UiEvent::Submit(value) => {
                self.live_filter.cancel();
                self.resolve(&value);
            }
            UiEvent::Toggle(slug) => {
                if let Some(transition) = self.accordion.toggle(&slug) {
                    self.apply_transition(&transition);
                }
            }
            UiEvent::FragmentChanged(fragment) => self.apply_fragment(fragment.as_deref()),
        }
        self.view.commit();
    }

    /// Event loop. Returns when the event source closes; any in-flight request is
    /// abandoned at that point.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> Self {
        loop {
            let wake = tokio::select! {
                event = events.recv() => Wake::Event(event),
                _ = wait_until(self.live_filter.deadline()) => Wake::DebounceElapsed,
                Some(done) = self.completions_rx.recv() => Wake::Answer(done),
            };
            match wake {
                Wake::Event(Some(event)) => self.handle(event),
                Wake::Event(None) => break,
                Wake::DebounceElapsed => {
                    if let Some(value) = self.live_filter.take_due(Instant::now()) {
                        self.resolve_live(&value);
                        self.view.commit();
                    }
                }
                Wake::Answer(done) => {
                    self.complete_answer(done);
                    self.view.commit();
                }
            }
        }
        self.cancel_answer();
        self
    }

    /// Immediate path: filter, render, and ask the answer service.
    fn resolve(&mut self, input: &str) {
        let Some(query) = Query::parse(input) else {
            self.show_everything();
            return;
        };
        let filtered = filter(self.store.records(), &query);
        debug!(query = query.raw(), matches = filtered.len(), "search submitted");
        let items = render(filtered);
        self.render_items(items);
        self.dispatch_answer(query.raw());
    }

    /// Debounced path: filter and render only.
    fn resolve_live(&mut self, input: &str) {
        let Some(query) = Query::parse(input) else {
            self.show_everything();
            return;
        };
        let filtered = filter(self.store.records(), &query);
        debug!(query = query.raw(), matches = filtered.len(), "live filter applied");
        let items = render(filtered);
        self.render_items(items);
    }

    fn show_everything(&mut self) {
        let items = render(self.store.records());
        self.render_items(items);
        self.cancel_answer();
        self.view.set_loading(false);
        self.view.set_answer_visible(false);
    }

    fn render_items(&mut self, items: Vec<DisplayItem>) {
        self.view.render_list(&items);
        self.accordion.reset(&items);
    }

    fn apply_fragment(&mut self, fragment: Option<&str>) {
        self.view
            .fragment_navigated(fragment.map(|f| f.strip_prefix('#').unwrap_or(f)));
        let transition = self.accordion.apply_fragment(fragment);
        self.apply_transition(&transition);
        if let Some(slug) = &transition.expanded {
            self.view.reveal(slug);
        }
    }

    fn apply_transition(&mut self, transition: &Transition) {
        if let Some(slug) = &transition.collapsed {
            self.view.set_expanded(slug, false);
        }
        if let Some(slug) = &transition.expanded {
            self.view.set_expanded(slug, true);
        }
        match &transition.fragment {
            FragmentUpdate::Unchanged => {}
            FragmentUpdate::Set(slug) => self.view.replace_fragment(Some(slug)),
            FragmentUpdate::Clear => self.view.replace_fragment(None),
        }
    }

    fn dispatch_answer(&mut self, query: &str) {
        self.cancel_answer();
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.view.set_answer_visible(true);

        match self.answers.fetch_answer(query) {
            Dispatch::Ready(outcome) => {
                self.view.set_loading(false);
                self.show_outcome(&outcome);
            }
            Dispatch::InFlight(fut) => {
                self.view.set_answer_content("");
                self.view.set_loading(true);
                let tx = self.completions_tx.clone();
                let handle = tokio::spawn(async move {
                    let outcome = fut.await;
                    // Receiver is gone only when the controller itself is.
                    let _ = tx.send(Completion { seq, outcome });
                });
                self.in_flight = Some(InFlight { seq, handle });
                info!(seq, query, "answer requested");
            }
        }
    }

    fn cancel_answer(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.handle.abort();
            debug!(seq = previous.seq, "answer request abandoned");
        }
    }

    fn complete_answer(&mut self, done: Completion) {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|current| current.seq == done.seq);
        if !is_current {
            debug!(seq = done.seq, latest = self.latest_seq, "discarding stale answer");
            return;
        }
        self.in_flight = None;
        self.show_outcome(&done.outcome);
        self.view.set_loading(false);
        debug!(seq = done.seq, "answer displayed");
    }

    fn show_outcome(&mut self, outcome: &AnswerOutcome) {
        let markup = render_outcome(outcome, self.markup);
        self.view.set_answer_content(&markup);
    }
}
