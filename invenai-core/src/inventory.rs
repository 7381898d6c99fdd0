//! Local inventory state.
//!
//! All mutation goes through [`reduce`], a pure transition from
//! (collection, action) to collection. [`InventoryStore`] wraps it in an
//! observable container: `dispatch` applies an action and every subscriber
//! sees the new collection.

use std::sync::{Arc, Weak};

use log::{debug, warn};
use tokio::sync::watch;

use crate::item::{InventoryItem, ItemId};

/// A state transition for the local inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the whole collection (hydration).
    SetItems(Vec<InventoryItem>),
    /// Append an item. The caller assigns its id.
    AddItem(InventoryItem),
    /// Replace the record with the same id, keeping its position.
    UpdateItem(InventoryItem),
    /// Drop every record with this id.
    RemoveItem(ItemId),
}

/// Applies an action to a collection.
///
/// Total and deterministic: unknown ids on update or remove leave the
/// collection unchanged, and duplicate ids on add are accepted as given.
pub fn reduce(mut items: Vec<InventoryItem>, action: Action) -> Vec<InventoryItem> {
    match action {
        Action::SetItems(next) => next,
        Action::AddItem(item) => {
            items.push(item);
            items
        }
        Action::UpdateItem(item) => {
            let mut matched = false;
            for slot in items.iter_mut().filter(|slot| slot.id == item.id) {
                *slot = item.clone();
                matched = true;
            }
            if !matched {
                warn!("update for unknown item {}, nothing changed", item.id);
            }
            items
        }
        Action::RemoveItem(id) => {
            items.retain(|item| item.id != id);
            items
        }
    }
}

/// Anything that accepts inventory actions.
///
/// Returns `false` when the action was discarded because the target store
/// no longer exists.
pub trait Dispatch {
    fn dispatch(&self, action: Action) -> bool;
}

/// Receiver half of a store subscription.
pub type Subscription = watch::Receiver<Vec<InventoryItem>>;

/// Observable in-memory inventory.
///
/// The store is the sole owner of the collection. Dropping it is the
/// "unmount": weak handles created with [`InventoryStore::downgrade`] stop
/// applying actions from that point on.
#[derive(Debug)]
pub struct InventoryStore {
    state: Arc<watch::Sender<Vec<InventoryItem>>>,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Creates a store seeded with the given collection.
    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        let (tx, _rx) = watch::channel(items);
        Self {
            state: Arc::new(tx),
        }
    }

    /// Applies an action and notifies subscribers.
    pub fn dispatch(&self, action: Action) {
        apply(&self.state, action);
    }

    /// Subscribes to collection changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> Subscription {
        self.state.subscribe()
    }

    /// Returns a copy of the current collection.
    pub fn snapshot(&self) -> Vec<InventoryItem> {
        self.state.borrow().clone()
    }

    /// Looks up the first item with the given id.
    pub fn get(&self, id: &ItemId) -> Option<InventoryItem> {
        self.state.borrow().iter().find(|item| &item.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Creates a handle that can dispatch only while this store is alive.
    pub fn downgrade(&self) -> WeakInventoryStore {
        WeakInventoryStore {
            state: Arc::downgrade(&self.state),
        }
    }

    pub fn set_items(&self, items: Vec<InventoryItem>) {
        self.dispatch(Action::SetItems(items));
    }

    pub fn add_item(&self, item: InventoryItem) {
        self.dispatch(Action::AddItem(item));
    }

    pub fn update_item(&self, item: InventoryItem) {
        self.dispatch(Action::UpdateItem(item));
    }

    pub fn remove_item(&self, id: &ItemId) {
        self.dispatch(Action::RemoveItem(id.clone()));
    }
}

impl Dispatch for InventoryStore {
    fn dispatch(&self, action: Action) -> bool {
        InventoryStore::dispatch(self, action);
        true
    }
}

/// Non-owning store handle for asynchronous producers.
///
/// Results that arrive after the store was dropped are discarded instead of
/// being applied to a collection nobody observes.
#[derive(Debug, Clone)]
pub struct WeakInventoryStore {
    state: Weak<watch::Sender<Vec<InventoryItem>>>,
}

impl WeakInventoryStore {
    /// Whether the owning store still exists.
    pub fn is_alive(&self) -> bool {
        self.state.strong_count() > 0
    }
}

impl Dispatch for WeakInventoryStore {
    fn dispatch(&self, action: Action) -> bool {
        match self.state.upgrade() {
            Some(state) => {
                apply(&state, action);
                true
            }
            None => {
                debug!("store dropped, discarding {:?}", action);
                false
            }
        }
    }
}

fn apply(state: &watch::Sender<Vec<InventoryItem>>, action: Action) {
    state.send_modify(|items| {
        let current = std::mem::take(items);
        *items = reduce(current, action);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, name: &str, quantity: u32) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(id),
            name: name.to_string(),
            description: String::new(),
            quantity,
            category: String::new(),
            date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            image_url: String::new(),
        }
    }

    #[test]
    fn add_appends_in_order() {
        let items = reduce(Vec::new(), Action::AddItem(item("a", "A", 1)));
        let items = reduce(items, Action::AddItem(item("b", "B", 1)));
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn add_accepts_duplicate_ids() {
        let items = reduce(vec![item("a", "A", 1)], Action::AddItem(item("a", "A2", 2)));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn update_replaces_in_place() {
        let start = vec![item("a", "A", 1), item("b", "B", 1), item("c", "C", 1)];
        let items = reduce(start, Action::UpdateItem(item("b", "B", 9)));
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(items[1].quantity, 9);
    }

    #[test]
    fn update_unknown_is_noop() {
        let start = vec![item("a", "A", 1)];
        let items = reduce(start.clone(), Action::UpdateItem(item("zzz", "Z", 3)));
        assert_eq!(items, start);
    }

    #[test]
    fn remove_filters_all_matches() {
        let start = vec![item("a", "A", 1), item("b", "B", 1), item("a", "A", 2)];
        let items = reduce(start, Action::RemoveItem(ItemId::new("a")));
        assert_eq!(items, vec![item("b", "B", 1)]);
    }

    #[test]
    fn remove_twice_equals_remove_once() {
        let start = vec![item("a", "A", 1), item("b", "B", 1)];
        let once = reduce(start.clone(), Action::RemoveItem(ItemId::new("a")));
        let twice = reduce(once.clone(), Action::RemoveItem(ItemId::new("a")));
        assert_eq!(once, twice);
    }

    #[test]
    fn subscribers_observe_dispatch() {
        let store = InventoryStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add_item(item("a", "A", 1));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn weak_handle_stops_after_drop() {
        let store = InventoryStore::new();
        let weak = store.downgrade();

        assert!(weak.dispatch(Action::AddItem(item("a", "A", 1))));
        assert_eq!(store.len(), 1);

        drop(store);
        assert!(!weak.is_alive());
        assert!(!weak.dispatch(Action::AddItem(item("b", "B", 1))));
    }

    #[test]
    fn get_finds_first_match() {
        let store = InventoryStore::with_items(vec![item("a", "A", 1), item("b", "B", 2)]);
        assert_eq!(store.get(&ItemId::new("b")).unwrap().quantity, 2);
        assert!(store.get(&ItemId::new("x")).is_none());
    }
}
