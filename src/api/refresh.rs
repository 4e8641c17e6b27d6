use std::fmt;

/// What asked for a new render pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefreshRequest {
    DataSource(String),
    Component(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&RefreshRequest)>;

/// Observer list raised when an owner needs the chart to render again.
#[derive(Default)]
pub struct RefreshSignal {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl RefreshSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RefreshRequest) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn raise(&mut self, request: &RefreshRequest) {
        for (_, listener) in &mut self.listeners {
            listener(request);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for RefreshSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshSignal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
