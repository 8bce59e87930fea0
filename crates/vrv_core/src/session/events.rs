use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::inventory::InventoryResponse;

use super::payloads::EquippedItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started { session_id: String },
    Ended { session_id: String },
    ScoreReported { score: i64 },
    Error { message: String },
    Retrieved { session_json: String },
    EquippedItemChanged(EquippedItem),
    InventoryReceived(InventoryResponse),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "session_started",
            Self::Ended { .. } => "session_ended",
            Self::ScoreReported { .. } => "score_reported",
            Self::Error { .. } => "session_error",
            Self::Retrieved { .. } => "session_retrieved",
            Self::EquippedItemChanged(_) => "equipped_item_changed",
            Self::InventoryReceived(_) => "inventory_received",
        }
    }
}

pub trait SessionObserver {
    fn on_session_event(&mut self, event: &SessionEvent);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionEvent),
{
    fn on_session_event(&mut self, event: &SessionEvent) {
        self(event)
    }
}

/// Forwards events into an mpsc channel. A dropped receiver is not an error.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<SessionEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<SessionEvent>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, Receiver<SessionEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }
}

impl SessionObserver for ChannelObserver {
    fn on_session_event(&mut self, event: &SessionEvent) {
        let _ = self.sender.send(event.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn SessionObserver>)>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: SessionObserver + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.subscribers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // Delivery order is subscription order.
    pub fn publish(&mut self, event: &SessionEvent) {
        for (_, observer) in &mut self.subscribers {
            observer.on_session_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn every_subscriber_receives_each_event_in_order() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event: &SessionEvent| {
                seen.borrow_mut().push(format!("{tag}:{}", event.name()));
            });
        }

        bus.publish(&SessionEvent::ScoreReported { score: 3 });

        assert_eq!(
            *seen.borrow(),
            vec![
                "first:score_reported".to_string(),
                "second:score_reported".to_string()
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let (observer, receiver) = ChannelObserver::channel();
        let id = bus.subscribe(observer);

        bus.publish(&SessionEvent::Started {
            session_id: "s-1".to_string(),
        });
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&SessionEvent::Ended {
            session_id: "s-1".to_string(),
        });

        let events = receiver.try_iter().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![SessionEvent::Started {
                session_id: "s-1".to_string()
            }]
        );
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn dropped_receiver_does_not_break_publish() {
        let mut bus = EventBus::new();
        let (observer, receiver) = ChannelObserver::channel();
        bus.subscribe(observer);
        drop(receiver);

        bus.publish(&SessionEvent::Error {
            message: "boom".to_string(),
        });
        assert_eq!(bus.subscriber_count(), 1);
    }
}
