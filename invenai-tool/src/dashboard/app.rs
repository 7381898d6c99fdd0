use invenai_core::producer::NO_DESCRIPTION;
use invenai_core::{
    Action, DeleteOutcome, Described, Dispatch, InventoryItem, InventorySession, InventoryStats,
    ItemDraft, ItemId, Subscription, sync,
};
use invenai_http::{RemoteAssistant, RemoteCollection};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Browse,
    AddItem,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// Completion of a background task.
///
/// Reload and save carry the edit count seen when they started.
#[derive(Debug)]
pub enum TaskResult {
    Hydrated(u64, Result<usize, String>),
    Committed(u64, Result<usize, String>),
    Deleted(ItemId, Result<DeleteOutcome, String>),
    /// Name of the added item; the error is a lookup failure that fell back to defaults.
    Added(String, Option<String>),
    Reply(Result<String, String>),
}

pub struct DashboardApp {
    pub mode: AppMode,
    pub should_quit: bool,
    pub session: InventorySession<RemoteCollection>,
    pub assistant: RemoteAssistant,
    pub items: Vec<InventoryItem>,
    pub stats: InventoryStats,
    pub selected: usize,
    /// Local edits not yet committed.
    pub dirty: bool,
    /// Bumped on every local edit.
    pub edits: u64,
    pub input: String,
    pub chat: Vec<(Speaker, String)>,
    pub chat_scroll: u16,
    pub pending: usize,
    pub notice: Option<Notice>,
    items_rx: Subscription,
    results_tx: mpsc::UnboundedSender<TaskResult>,
    results_rx: mpsc::UnboundedReceiver<TaskResult>,
}

impl DashboardApp {
    pub fn new(session: InventorySession<RemoteCollection>, assistant: RemoteAssistant) -> Self {
        let items_rx = session.store().subscribe();
        let items = session.items();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            mode: AppMode::Browse,
            should_quit: false,
            stats: InventoryStats::from_items(&items),
            items,
            session,
            assistant,
            selected: 0,
            dirty: false,
            edits: 0,
            input: String::new(),
            chat: Vec::new(),
            chat_scroll: 0,
            pending: 0,
            notice: None,
            items_rx,
            results_tx,
            results_rx,
        }
    }

    fn gateway(&self) -> RemoteCollection {
        self.session.gateway().clone()
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.results_tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    pub fn selected_item(&self) -> Option<&InventoryItem> {
        self.items.get(self.selected)
    }

    /// Reloads the whole collection from the server, discarding local edits.
    pub fn reload(&mut self) {
        let gateway = self.gateway();
        let store = self.session.store().downgrade();
        let retry = self.session.retry();
        let edits = self.edits;
        self.spawn(async move {
            let result = sync::hydrate(&gateway, &store, retry).await;
            TaskResult::Hydrated(edits, result.map_err(|e| e.to_string()))
        });
    }

    /// Pushes the current items. Edits made while the save is running stay unsaved.
    pub fn commit(&mut self) {
        let gateway = self.gateway();
        let items = self.session.items();
        let edits = self.edits;
        self.spawn(async move {
            let result = sync::commit(&gateway, &items).await;
            TaskResult::Committed(edits, result.map_err(|e| e.to_string()))
        });
    }

    fn mark_edited(&mut self) {
        self.edits += 1;
        self.dirty = true;
    }

    /// Clears `dirty` unless something was edited after `edits` was captured.
    fn mark_synced(&mut self, edits: u64) {
        if edits == self.edits {
            self.dirty = false;
        }
    }

    /// Deletes the selected item remotely; it disappears locally once confirmed.
    pub fn delete_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let id = item.id.clone();
        let gateway = self.gateway();
        let store = self.session.store().downgrade();
        let retry = self.session.retry();
        self.spawn(async move {
            let result = sync::delete_confirmed(&gateway, &store, &id, retry).await;
            TaskResult::Deleted(id, result.map_err(|e| e.to_string()))
        });
    }

    pub fn adjust_quantity(&mut self, delta: i64) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let quantity = (i64::from(item.quantity) + delta).clamp(0, i64::from(u32::MAX)) as u32;
        if quantity == item.quantity {
            return;
        }
        let updated = InventoryItem {
            quantity,
            ..item.clone()
        };
        self.session.update(updated);
        self.mark_edited();
        self.sync_items();
    }

    pub fn start_add(&mut self) {
        self.input.clear();
        self.mode = AppMode::AddItem;
    }

    /// Adds the typed name, enriched by a description lookup.
    ///
    /// The result lands through a weak store handle, so it is dropped if the
    /// dashboard has closed in the meantime.
    pub fn submit_add(&mut self) {
        let name = self.input.trim().to_string();
        self.input.clear();
        self.mode = AppMode::Browse;
        if name.is_empty() {
            return;
        }
        let assistant = self.assistant.clone();
        let store = self.session.store().downgrade();
        self.mark_edited();
        self.spawn(async move {
            let (draft, lookup_error) = match assistant.describe(&name).await {
                Ok(described) => (ItemDraft::from_description(&name, described), None),
                Err(e) => {
                    let fallback = Described {
                        description: NO_DESCRIPTION.to_string(),
                        category: String::new(),
                    };
                    (ItemDraft::from_description(&name, fallback), Some(e.to_string()))
                }
            };
            store.dispatch(Action::AddItem(draft.into_item()));
            TaskResult::Added(name, lookup_error)
        });
    }

    pub fn send_chat(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.input.clear();
        self.chat.push((Speaker::User, text.clone()));
        self.chat_scroll = 0;

        let assistant = self.assistant.clone();
        self.spawn(async move {
            TaskResult::Reply(assistant.chat(&text).await.map_err(|e| e.to_string()))
        });
    }

    /// Drains finished tasks and picks up store changes.
    pub fn poll_results(&mut self) {
        loop {
            match self.results_rx.try_recv() {
                Ok(result) => {
                    self.pending = self.pending.saturating_sub(1);
                    self.apply_result(result);
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        }
        self.sync_items();
    }

    fn apply_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Hydrated(edits, Ok(count)) => {
                self.mark_synced(edits);
                self.info(format!("Loaded {count} items"));
            }
            TaskResult::Committed(edits, Ok(count)) => {
                self.mark_synced(edits);
                self.info(format!("Saved {count} items"));
            }
            TaskResult::Deleted(_, Ok(outcome)) => self.info(outcome.message().to_string()),
            // The item reached the store after the submit, so reloads or saves
            // started in between did not see it.
            TaskResult::Added(name, lookup_error) => {
                self.mark_edited();
                match lookup_error {
                    None => self.info(format!("Added {name}")),
                    Some(e) => self.error(format!("Added {name} without description: {e}")),
                }
            }
            TaskResult::Reply(Ok(reply)) => {
                self.chat.push((Speaker::Assistant, reply));
                self.chat_scroll = 0;
            }
            TaskResult::Hydrated(_, Err(e))
            | TaskResult::Committed(_, Err(e))
            | TaskResult::Deleted(_, Err(e))
            | TaskResult::Reply(Err(e)) => self.error(e),
        }
    }

    fn sync_items(&mut self) {
        if !self.items_rx.has_changed().unwrap_or(false) {
            return;
        }
        self.items = self.items_rx.borrow_and_update().clone();
        self.stats = InventoryStats::from_items(&self.items);
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    fn info(&mut self, text: String) {
        self.notice = Some(Notice {
            text,
            is_error: false,
        });
    }

    fn error(&mut self, text: String) {
        self.notice = Some(Notice {
            text,
            is_error: true,
        });
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn toggle_chat(&mut self) {
        self.input.clear();
        self.mode = match self.mode {
            AppMode::Chat => AppMode::Browse,
            _ => AppMode::Chat,
        };
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.mode = AppMode::Browse;
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input.pop();
    }
}
