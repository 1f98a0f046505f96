//! Visitor-driven tree walker.
//!
//! A [`Visitor`] receives three hooks per node: `wildcard` (every node, before
//! kind dispatch), `enter` (pre-order) and `exit` (post-order). Each hook
//! answers with a [`Flow`] that decides what happens next. State is threaded
//! down the tree: a child sees the state its parent's hooks produced and never
//! a sibling's.

use std::borrow::Cow;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::ast::Node;
use crate::domain::children::ChildRef;

/// Answer of a visitor hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow<S> {
    /// Keep going with the current state.
    Continue,
    /// Prune this node: no children, no exit hook.
    Skip,
    /// Children see this state instead.
    Replace(S),
    /// Replace the state and do not descend into the listed children.
    ReplaceIgnoring { state: S, ignore: Vec<ChildRef> },
    /// Abort the whole walk; no further hooks run anywhere.
    Exit,
}

/// Hooks invoked by [`walk`]. Every hook defaults to [`Flow::Continue`].
pub trait Visitor {
    type State: Clone;

    fn wildcard(&mut self, _node: &Node, _state: &Self::State) -> Flow<Self::State> {
        Flow::Continue
    }

    fn enter(&mut self, _node: &Node, _parent: Option<&Node>, _state: &Self::State) -> Flow<Self::State> {
        Flow::Continue
    }

    /// Runs after all children, with the state the children saw. Only
    /// [`Flow::Exit`] has an effect here.
    fn exit(&mut self, _node: &Node, _state: &Self::State) -> Flow<Self::State> {
        Flow::Continue
    }
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed,
    /// A hook returned [`Flow::Exit`].
    Terminated,
    /// The cancellation token fired between node visits.
    Canceled,
}

impl WalkOutcome {
    pub fn terminated(self) -> bool {
        self == WalkOutcome::Terminated
    }

    pub fn canceled(self) -> bool {
        self == WalkOutcome::Canceled
    }
}

/// Cooperative cancellation flag shared between a request and its walk.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    canceled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

/// Walks `root` depth-first, polling `token` before every node.
pub fn walk<V: Visitor>(
    root: &Node,
    visitor: &mut V,
    token: &CancellationToken,
    initial: V::State,
) -> WalkOutcome {
    let mut walker = Walker { visitor, token };
    match walker.visit(root, None, &initial) {
        ControlFlow::Continue(()) => WalkOutcome::Completed,
        ControlFlow::Break(Halt::Exit) => WalkOutcome::Terminated,
        ControlFlow::Break(Halt::Canceled) => WalkOutcome::Canceled,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Private helpers
// ─────────────────────────────────────────────────────────────────────────────

enum Halt {
    Exit,
    Canceled,
}

struct Walker<'v, V> {
    visitor: &'v mut V,
    token: &'v CancellationToken,
}

impl<V: Visitor> Walker<'_, V> {
    fn visit(&mut self, node: &Node, parent: Option<&Node>, state: &V::State) -> ControlFlow<Halt> {
        if self.token.is_canceled() {
            return ControlFlow::Break(Halt::Canceled);
        }

        let mut current = Cow::Borrowed(state);
        let mut ignore = Vec::new();

        let flow = self.visitor.wildcard(node, &current);
        if let Some(stop) = absorb(flow, &mut current, &mut ignore) {
            return stop;
        }
        let flow = self.visitor.enter(node, parent, &current);
        if let Some(stop) = absorb(flow, &mut current, &mut ignore) {
            return stop;
        }

        node.for_each_child(|slot, child| {
            if ignore.iter().any(|suppressed: &ChildRef| suppressed.covers(&slot)) {
                return ControlFlow::Continue(());
            }
            self.visit(child, Some(node), &current)
        })?;

        match self.visitor.exit(node, &current) {
            Flow::Exit => ControlFlow::Break(Halt::Exit),
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Folds a hook's answer into the node's state. Returns `Some` when the node
/// must stop here.
fn absorb<S: Clone>(
    flow: Flow<S>,
    state: &mut Cow<'_, S>,
    ignore: &mut Vec<ChildRef>,
) -> Option<ControlFlow<Halt>> {
    match flow {
        Flow::Continue => None,
        Flow::Skip => Some(ControlFlow::Continue(())),
        Flow::Exit => Some(ControlFlow::Break(Halt::Exit)),
        Flow::Replace(next) => {
            *state = Cow::Owned(next);
            None
        }
        Flow::ReplaceIgnoring { state: next, ignore: refs } => {
            *state = Cow::Owned(next);
            ignore.extend(refs);
            None
        }
    }
}
