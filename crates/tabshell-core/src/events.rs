//! Change notifications for the shell state holders
//!
//! The permission service, the route instance cache and the tab session
//! manager each own their state and announce every mutation on a shared
//! broadcast bus. The tab bar and the sidebar subscribe instead of reading
//! ambient globals.

use std::sync::Arc;
use tokio::sync::broadcast;

/// State changes published through the EventBus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    // ========== Permission Events ==========
    /// The grant set was replaced wholesale (login)
    GrantsReplaced { user_id: u64, granted: usize },

    /// The grant set was emptied (logout)
    GrantsCleared,

    // ========== Tab Events ==========
    /// A new tab was appended to the tab bar
    TabOpened { id: String },

    /// The active tab changed
    TabActivated { id: String },

    /// A tab was removed from the tab bar
    TabClosed { id: String },

    /// Every tab was removed
    TabsCleared,

    // ========== Cache Events ==========
    /// A detached page instance was stored
    RouteCaptured { key: String },

    /// A stored page instance was handed back for re-attachment
    RouteRestored { key: String },

    /// A stored page instance was released because its tab closed
    RouteEvicted { key: String },

    /// A capture was refused because the route was marked for eviction
    CaptureSuppressed { key: String },
}

impl ShellEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GrantsReplaced { .. } => "grants_replaced",
            Self::GrantsCleared => "grants_cleared",
            Self::TabOpened { .. } => "tab_opened",
            Self::TabActivated { .. } => "tab_activated",
            Self::TabClosed { .. } => "tab_closed",
            Self::TabsCleared => "tabs_cleared",
            Self::RouteCaptured { .. } => "route_captured",
            Self::RouteRestored { .. } => "route_restored",
            Self::RouteEvicted { .. } => "route_evicted",
            Self::CaptureSuppressed { .. } => "capture_suppressed",
        }
    }
}

/// Broadcast bus for shell state changes
///
/// Each subscriber receives a copy of every event published after it
/// subscribed. Publishing never blocks and never fails; with no subscribers
/// the event is dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShellEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with the specified capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow subscribers start losing events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, capacity }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of active receivers that will receive this event.
    pub fn publish(&self, event: ShellEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    /// Create a default event bus with capacity of 256 events
    fn default() -> Self {
        Self::new(256)
    }
}

/// Thread-safe wrapper around EventBus
pub type SharedEventBus = Arc<EventBus>;

/// Create a new shared event bus
pub fn shared_event_bus(capacity: usize) -> SharedEventBus {
    Arc::new(EventBus::new(capacity))
}

/// Event filter for selective subscription
#[derive(Debug, Default)]
pub struct EventFilter {
    types: Option<Vec<&'static str>>,
}

impl EventFilter {
    /// Create a new event filter
    pub fn new() -> Self {
        Self { types: None }
    }

    /// Filter by event types
    pub fn only_types(mut self, types: Vec<&'static str>) -> Self {
        self.types = Some(types);
        self
    }

    /// Check if an event matches the filter
    pub fn matches(&self, event: &ShellEvent) -> bool {
        match &self.types {
            Some(types) => types.contains(&event.event_type()),
            None => true,
        }
    }
}

/// Filtered event subscriber
pub struct FilteredSubscriber {
    receiver: broadcast::Receiver<ShellEvent>,
    filter: EventFilter,
}

impl FilteredSubscriber {
    /// Create a new filtered subscriber
    pub fn new(bus: &EventBus, filter: EventFilter) -> Self {
        Self {
            receiver: bus.subscribe(),
            filter,
        }
    }

    /// Drain every matching event that is already buffered
    pub fn drain(&mut self) -> Vec<ShellEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => events.push(event),
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        events
    }
}
