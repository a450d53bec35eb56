//! How builtins report their results.
//!
//! A builtin call can succeed in several mutually exclusive ways (once per
//! realization site, once per guarded value), so it never returns "the"
//! answer. It returns an [`Answers`] stream instead: zero or more
//! [`Notification::Result`]s followed by exactly one
//! [`Notification::Complete`]. A call that completes without any result has
//! failed.
//!
//! Builtins build the stream with an [`AnswerSink`]; `finish` is the only way
//! to obtain `Answers`, which is what guarantees the single completion marker.
//! Consumers either iterate the stream or [`drive`](Answers::drive) a
//! callback-style [`Continuation`].

use std::vec;

use crate::backend::grounded::ExecError;
use crate::backend::models::{Guard, Term};

/// One way a builtin call holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Arguments of the call after the builtin's bindings
    pub args: Vec<Term>,
    /// Condition under which this answer holds; `Guard::False` reports a
    /// branch that was decided and failed
    pub guard: Guard,
    /// No further results follow this one
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Result(Answer),
    Complete,
}

/// Callback-style receiver of a builtin's results
pub trait Continuation {
    fn notify_result(&mut self, answer: Answer);

    fn notify_complete(&mut self);
}

/// Collects the notifications it receives
impl Continuation for Vec<Notification> {
    fn notify_result(&mut self, answer: Answer) {
        self.push(Notification::Result(answer));
    }

    fn notify_complete(&mut self) {
        self.push(Notification::Complete);
    }
}

/// Accumulates the answers of one builtin call
#[derive(Debug, Default)]
pub struct AnswerSink {
    answers: Vec<Answer>,
}

impl AnswerSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, args: Vec<Term>, guard: Guard) {
        self.answers.push(Answer {
            args,
            guard,
            is_last: false,
        });
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Close the stream; the final answer is flagged `is_last`.
    pub fn finish(mut self) -> Answers {
        if let Some(last) = self.answers.last_mut() {
            last.is_last = true;
        }
        Answers {
            answers: self.answers,
            failure: None,
        }
    }
}

/// Finite result stream of one builtin call
#[derive(Debug, Clone, PartialEq)]
pub struct Answers {
    answers: Vec<Answer>,
    failure: Option<ExecError>,
}

impl Answers {
    /// A call that failed: no results, completion only.
    /// `reason` is kept as a diagnostic.
    pub fn failed(reason: ExecError) -> Self {
        Answers {
            answers: Vec::new(),
            failure: Some(reason),
        }
    }

    pub fn results(&self) -> &[Answer] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Recoverable error that turned this call into a failure, if any
    pub fn failure(&self) -> Option<&ExecError> {
        self.failure.as_ref()
    }

    /// At least one answer holds under a satisfiable guard
    pub fn succeeded(&self) -> bool {
        self.answers.iter().any(|a| !a.guard.is_false())
    }

    /// Feed the stream to a callback-style continuation: one
    /// `notify_result` per answer, then `notify_complete` exactly once.
    pub fn drive<C: Continuation + ?Sized>(self, continuation: &mut C) {
        for notification in self {
            match notification {
                Notification::Result(answer) => continuation.notify_result(answer),
                Notification::Complete => continuation.notify_complete(),
            }
        }
    }
}

impl IntoIterator for Answers {
    type Item = Notification;
    type IntoIter = AnswerStream;

    fn into_iter(self) -> AnswerStream {
        AnswerStream {
            answers: self.answers.into_iter(),
            completed: false,
        }
    }
}

/// Iterator over a call's notifications, ending with `Complete`
#[derive(Debug)]
pub struct AnswerStream {
    answers: vec::IntoIter<Answer>,
    completed: bool,
}

impl Iterator for AnswerStream {
    type Item = Notification;

    fn next(&mut self) -> Option<Notification> {
        if let Some(answer) = self.answers.next() {
            return Some(Notification::Result(answer));
        }
        if self.completed {
            return None;
        }
        self.completed = true;
        Some(Notification::Complete)
    }
}
