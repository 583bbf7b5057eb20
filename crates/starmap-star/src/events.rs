//! Pointer input and the star's observer interface.
//!
//! The host scene forwards pointer events that hit a star's root; the star
//! translates them into [`StarEvent`]s and delivers them synchronously to its
//! listeners in subscription order.

use glam::Vec2;

use crate::state::StarState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// A button was released over the star.
    Up(PointerButton),
    /// The pointer entered the hit region.
    Enter,
    /// The pointer left the hit region.
    Leave,
}

/// Raw pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// World-space pointer position.
    pub position: Vec2,
}

impl PointerEvent {
    pub fn up(button: PointerButton, position: Vec2) -> Self {
        Self {
            kind: PointerKind::Up(button),
            position,
        }
    }

    pub fn enter(position: Vec2) -> Self {
        Self {
            kind: PointerKind::Enter,
            position,
        }
    }

    pub fn leave(position: Vec2) -> Self {
        Self {
            kind: PointerKind::Leave,
            position,
        }
    }
}

/// Event emitted by a star.
#[derive(Debug, Clone, Copy)]
pub enum StarEvent<'a> {
    Selected {
        star: &'a StarState,
        pointer: &'a PointerEvent,
    },
    HoverStart {
        star: &'a StarState,
    },
    HoverEnd {
        star: &'a StarState,
    },
}

impl<'a> StarEvent<'a> {
    /// Maps a pointer event to the star event it triggers, if any.
    pub fn from_pointer(star: &'a StarState, pointer: &'a PointerEvent) -> Option<Self> {
        match pointer.kind {
            PointerKind::Up(PointerButton::Primary) => Some(StarEvent::Selected { star, pointer }),
            PointerKind::Up(_) => None,
            PointerKind::Enter => Some(StarEvent::HoverStart { star }),
            PointerKind::Leave => Some(StarEvent::HoverEnd { star }),
        }
    }

    pub fn star(&self) -> &'a StarState {
        match *self {
            StarEvent::Selected { star, .. }
            | StarEvent::HoverStart { star }
            | StarEvent::HoverEnd { star } => star,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StarEvent::Selected { .. } => "selected",
            StarEvent::HoverStart { .. } => "hover_start",
            StarEvent::HoverEnd { .. } => "hover_end",
        }
    }
}

/// Handle returned by [`EventHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StarEvent<'_>)>;

/// Ordered listener list.
#[derive(Default)]
pub struct EventHub {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventHub {
    pub fn subscribe(&mut self, listener: impl FnMut(&StarEvent<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, event: &StarEvent<'_>) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::StarId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn state() -> StarState {
        StarState::fresh(StarId(2), Vec2::ZERO, &mut ChaCha8Rng::seed_from_u64(0))
    }

    #[test]
    fn test_pointer_mapping() {
        let s = state();
        let up = PointerEvent::up(PointerButton::Primary, Vec2::ZERO);
        let right = PointerEvent::up(PointerButton::Secondary, Vec2::ZERO);
        let enter = PointerEvent::enter(Vec2::ZERO);
        let leave = PointerEvent::leave(Vec2::ZERO);

        assert_eq!(StarEvent::from_pointer(&s, &up).unwrap().name(), "selected");
        assert!(StarEvent::from_pointer(&s, &right).is_none());
        assert_eq!(StarEvent::from_pointer(&s, &enter).unwrap().name(), "hover_start");
        assert_eq!(StarEvent::from_pointer(&s, &leave).unwrap().name(), "hover_end");
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::default();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            hub.subscribe(move |event| log.borrow_mut().push((tag, event.star().id)));
        }

        assert_eq!(hub.len(), 3);

        let s = state();
        hub.emit(&StarEvent::HoverStart { star: &s });
        assert_eq!(
            *log.borrow(),
            vec![("a", StarId(2)), ("b", StarId(2)), ("c", StarId(2))]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut hub = EventHub::default();
        let counter = Rc::clone(&count);
        let id = hub.subscribe(move |_| *counter.borrow_mut() += 1);

        let s = state();
        hub.emit(&StarEvent::HoverEnd { star: &s });
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        hub.emit(&StarEvent::HoverEnd { star: &s });

        assert_eq!(*count.borrow(), 1);
        assert!(hub.is_empty());
    }
}
