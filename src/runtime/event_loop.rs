use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};

use crate::dom::dom_model::{Document, NodeId};
use crate::error::FormError;
use crate::runtime::clock::Clock;
use crate::runtime::timer::{Timer, TimerAction, TimerPolicy};
use crate::submitter::form_submitter::{FormSubmitter, ScheduledHide, SubmitEvent};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::transport::transport_model::{SubmitOutcome, Transport};

/// A finished request on its way back from a worker thread.
#[derive(Debug)]
struct Completion {
    submission: u64,
    submitter: usize,
    outcome: SubmitOutcome,
}

/// Single-threaded owner of the document.
///
/// Submit handlers, response callbacks and timers all run on the thread
/// that drives the loop. Requests go out on worker threads which only
/// send their `SubmitOutcome` back.
pub struct EventLoop {
    document: Document,
    submitters: Vec<FormSubmitter>,
    transport: Arc<dyn Transport>,
    clock: Box<dyn Clock>,
    policy: TimerPolicy,
    tracer: TraceLogger,

    timers: BinaryHeap<Reverse<Timer>>,
    next_timer_seq: u64,
    // Latest hide generation per message area
    generations: HashMap<NodeId, u64>,

    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: usize,
    next_submission: u64,
    outcomes: Vec<SubmitOutcome>,
}

impl EventLoop {
    pub fn new(document: Document, transport: Arc<dyn Transport>, clock: Box<dyn Clock>) -> Self {
        let (sender, receiver) = mpsc::channel();
        EventLoop {
            document,
            submitters: Vec::new(),
            transport,
            clock,
            policy: TimerPolicy::default(),
            tracer: TraceLogger::disabled(),
            timers: BinaryHeap::new(),
            next_timer_seq: 0,
            generations: HashMap::new(),
            sender,
            receiver,
            in_flight: 0,
            next_submission: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: TimerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn submitters(&self) -> &[FormSubmitter] {
        &self.submitters
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Outcomes delivered so far, in delivery order.
    pub fn outcomes(&self) -> &[SubmitOutcome] {
        &self.outcomes
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Bind a submit listener.
    pub fn bind(&mut self, submitter: FormSubmitter) {
        self.submitters.push(submitter);
    }

    /// Find and bind submitters by selector. Returns how many were bound;
    /// zero when either element is missing.
    pub fn initialize(
        &mut self,
        form_selector: &str,
        message_selector: &str,
        hide_delay_ms: u64,
    ) -> Result<usize, FormError> {
        let found = FormSubmitter::initialize(&self.document, form_selector, message_selector)?;
        let count = found.len();
        for submitter in found {
            self.bind(submitter.with_hide_delay(hide_delay_ms));
        }
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Fire a submit event on `form`, running every bound listener.
    pub fn dispatch_submit(&mut self, form: NodeId) -> SubmitEvent {
        self.dispatch_submit_from(form, None)
    }

    fn dispatch_submit_from(&mut self, form: NodeId, button: Option<NodeId>) -> SubmitEvent {
        let mut event = SubmitEvent::new(form, button);

        let listeners: Vec<usize> = self
            .submitters
            .iter()
            .enumerate()
            .filter(|(_, s)| s.form == form)
            .map(|(i, _)| i)
            .collect();

        for index in listeners {
            let prepared = self.submitters[index].on_submit(&self.document, &mut event);
            let submission = self.next_submission;
            self.next_submission += 1;

            let mut trace = TraceEvent::new(self.now_ms(), "submit")
                .with_submission(submission)
                .with_detail(prepared.payload.encode());
            if let Ok(request) = &prepared.request {
                trace = trace.with_url(&request.url);
            }
            self.tracer.log(&trace);

            self.in_flight += 1;
            let sender = self.sender.clone();
            match prepared.request {
                Ok(request) => {
                    let transport = Arc::clone(&self.transport);
                    std::thread::spawn(move || {
                        // A panicking transport still owes the loop a completion
                        let outcome =
                            panic::catch_unwind(AssertUnwindSafe(|| transport.post_form(&request)))
                                .unwrap_or_else(|cause| {
                                    SubmitOutcome::network(panic_message(cause.as_ref()))
                                });
                        // The loop may already be gone; nothing to report to then
                        let _ = sender.send(Completion {
                            submission,
                            submitter: index,
                            outcome,
                        });
                    });
                }
                Err(reason) => {
                    let _ = sender.send(Completion {
                        submission,
                        submitter: index,
                        outcome: SubmitOutcome::network(reason),
                    });
                }
            }
        }

        event
    }

    /// Activate `node` the way a click would. Submit buttons submit
    /// their form; anything else does nothing.
    pub fn click(&mut self, node: NodeId) -> Option<SubmitEvent> {
        let el = self.document.get(node)?;
        if !el.is_submit_control() || el.disabled {
            return None;
        }
        let form = self.document.owning_form(node)?;
        Some(self.dispatch_submit_from(form, Some(node)))
    }

    /// Press Enter inside `node`: implicit submission for text fields.
    pub fn press_enter(&mut self, node: NodeId) -> Option<SubmitEvent> {
        let el = self.document.get(node)?;
        if !el.is_text_entry() {
            return None;
        }
        let form = self.document.owning_form(node)?;
        Some(self.dispatch_submit(form))
    }

    // ------------------------------------------------------------------
    // Driving the loop
    // ------------------------------------------------------------------

    /// Block until every in-flight request has answered, running the
    /// callbacks in arrival order. Timers do not fire here.
    pub fn wait_for_responses(&mut self) -> Result<usize, FormError> {
        let mut delivered = 0;
        while self.in_flight > 0 {
            let Ok(completion) = self.receiver.recv() else {
                break;
            };
            self.deliver(completion)?;
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Move the clock forward by `ms`, firing timers that fall due.
    pub fn advance_by(&mut self, ms: u64) {
        let target = self.now_ms().saturating_add(ms);
        while let Some(deadline) = self.next_deadline() {
            if deadline > target {
                break;
            }
            self.clock.sleep_until(deadline);
            self.fire_due_timers();
        }
        self.clock.sleep_until(target);
    }

    /// Run until no request is in flight and no timer is pending.
    pub fn run_until_idle(&mut self) -> Result<(), FormError> {
        loop {
            let next_deadline = self.next_deadline();

            if self.in_flight > 0 {
                let budget = next_deadline.and_then(|d| self.clock.wait_budget(d));
                let received = match budget {
                    Some(budget) => match self.receiver.recv_timeout(budget) {
                        Ok(c) => Some(c),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    },
                    None => match self.receiver.recv() {
                        Ok(c) => Some(c),
                        Err(_) => break,
                    },
                };
                if let Some(completion) = received {
                    self.deliver(completion)?;
                    continue;
                }
            }

            match next_deadline {
                Some(deadline) => {
                    self.clock.sleep_until(deadline);
                    self.fire_due_timers();
                }
                None if self.in_flight == 0 => break,
                None => {}
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn deliver(&mut self, completion: Completion) -> Result<(), FormError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.tracer.log(&TraceEvent::completed(
            self.now_ms(),
            completion.submission,
            &completion.outcome,
        ));

        let Some(submitter) = self.submitters.get(completion.submitter).cloned() else {
            return Ok(());
        };

        let hide = match &completion.outcome {
            SubmitOutcome::Success { body, .. } => {
                let hide = submitter.on_success(&mut self.document, body)?;
                self.tracer.log(
                    &TraceEvent::new(self.now_ms(), "fields_cleared")
                        .with_submission(completion.submission),
                );
                hide
            }
            SubmitOutcome::Failure(failure) => submitter.on_failure(&mut self.document, failure),
        };
        self.outcomes.push(completion.outcome);

        self.tracer.log(
            &TraceEvent::new(self.now_ms(), "message_shown")
                .with_submission(completion.submission)
                .with_detail(submitter.message.content(&self.document)),
        );
        self.schedule_hide(completion.submission, hide);
        Ok(())
    }

    fn schedule_hide(&mut self, submission: u64, hide: ScheduledHide) {
        let generation = self.generations.entry(hide.area.node).or_insert(0);
        *generation += 1;

        let timer = Timer {
            deadline_ms: self.clock.now_ms().saturating_add(hide.delay_ms),
            seq: self.next_timer_seq,
            submission,
            action: TimerAction::HideMessage {
                area: hide.area,
                generation: *generation,
            },
        };
        self.next_timer_seq += 1;
        self.timers.push(Reverse(timer));
    }

    fn next_deadline(&self) -> Option<u64> {
        self.timers.peek().map(|Reverse(t)| t.deadline_ms)
    }

    fn fire_due_timers(&mut self) {
        let now = self.now_ms();
        while self.next_deadline().is_some_and(|d| d <= now) {
            let Some(Reverse(timer)) = self.timers.pop() else {
                break;
            };
            self.fire(timer);
        }
    }

    fn fire(&mut self, timer: Timer) {
        match timer.action {
            TimerAction::HideMessage { area, generation } => {
                let latest = self.generations.get(&area.node).copied().unwrap_or(0);
                if self.policy == TimerPolicy::Reschedule && generation != latest {
                    self.tracer.log(
                        &TraceEvent::new(self.now_ms(), "hide_superseded")
                            .with_submission(timer.submission),
                    );
                    return;
                }
                area.hide(&mut self.document);
                self.tracer.log(
                    &TraceEvent::new(self.now_ms(), "message_hidden")
                        .with_submission(timer.submission),
                );
            }
        }
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    let detail = cause
        .downcast_ref::<&str>()
        .map(|m| m.to_string())
        .or_else(|| cause.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("Transport panicked: {}", detail)
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("submitters", &self.submitters)
            .field("policy", &self.policy)
            .field("now_ms", &self.now_ms())
            .field("in_flight", &self.in_flight)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}
