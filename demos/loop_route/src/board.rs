//! Alert board — consumer-side cards built from alert events.
//!
//! Cards start `Active` and move to `Resolved` only when the operator
//! resolves them.  Resolution is local to the board; the engine never hears
//! about it.

use bt_core::AlertEvent;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardState {
    Active,
    Resolved,
}

#[derive(Clone, Debug)]
pub struct AlertCard {
    pub id:    usize,
    pub event: AlertEvent,
    pub state: CardState,
}

impl AlertCard {
    pub fn render(&self) -> String {
        match self.state {
            CardState::Active => format!("#{} {}", self.id, self.event),
            CardState::Resolved => format!("#{} {} [Resolved]", self.id, self.event),
        }
    }
}

#[derive(Default)]
pub struct AlertBoard {
    cards: Vec<AlertCard>,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active card and return its id.  Ids are 1-based and never
    /// reused.
    pub fn push(&mut self, event: AlertEvent) -> usize {
        let id = self.cards.len() + 1;
        self.cards.push(AlertCard { id, event, state: CardState::Active });
        id
    }

    /// Move card `id` to the resolved column.  Returns `false` for unknown or
    /// already-resolved cards.
    pub fn resolve(&mut self, id: usize) -> bool {
        match self.cards.get_mut(id.wrapping_sub(1)) {
            Some(card) if card.state == CardState::Active => {
                card.state = CardState::Resolved;
                true
            }
            _ => false,
        }
    }

    pub fn card(&self, id: usize) -> Option<&AlertCard> {
        self.cards.get(id.wrapping_sub(1))
    }

    pub fn active(&self) -> impl Iterator<Item = &AlertCard> {
        self.cards.iter().filter(|c| c.state == CardState::Active)
    }

    pub fn resolved(&self) -> impl Iterator<Item = &AlertCard> {
        self.cards.iter().filter(|c| c.state == CardState::Resolved)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
}
