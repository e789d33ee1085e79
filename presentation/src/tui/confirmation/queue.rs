use confab_domain::ConfirmationRequest;
use std::collections::VecDeque;

/// Requests waiting for the input panel, oldest first.
#[derive(Debug, Default)]
pub struct ConfirmationQueue {
    items: VecDeque<ConfirmationRequest>,
}

impl ConfirmationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request and return its 1-based position.
    pub fn push(&mut self, request: ConfirmationRequest) -> usize {
        self.items.push_back(request);
        self.items.len()
    }

    pub fn pop(&mut self) -> Option<ConfirmationRequest> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove everything, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = ConfirmationRequest> + '_ {
        self.items.drain(..)
    }
}
