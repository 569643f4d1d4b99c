//! # Document Store
//!
//! Owns the document, the selection and the view state for one editing
//! session, and notifies subscribers synchronously on every change.
//!
//! ## Semantics
//!
//! - `set_document` merges whole entries by key and never validates
//!   referential integrity
//! - `reset_document` replaces everything in one step; structural mutations
//!   commit through it so observers never see an intermediate state
//! - Every subscriber has been called before the mutating call returns
//! - Subscribers receive a borrowed snapshot and cannot call back into the
//!   store while being notified

use crate::view::{MainTab, ScreenSize, ViewState};
use mailframe_schema::{Block, BlockId, Document};
use tracing::debug;

/// What kind of state a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Document,
    Selection,
    View,
}

/// Snapshot passed to subscribers
#[derive(Debug)]
pub struct StoreEvent<'a> {
    pub change: StoreChange,
    pub document: &'a Document,
    pub selected_block_id: Option<&'a str>,
    pub view: &'a ViewState,
    /// Bumped on every document change
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Subscriber = Box<dyn FnMut(&StoreEvent<'_>)>;

pub struct EditorStore {
    document: Document,
    selected_block_id: Option<BlockId>,
    view: ViewState,
    version: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorStore")
            .field("blocks", &self.document.len())
            .field("selected_block_id", &self.selected_block_id)
            .field("view", &self.view)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EditorStore {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selected_block_id: None,
            view: ViewState::default(),
            version: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Merge entries into the document, replacing each key wholesale
    pub fn set_document(&mut self, partial: impl IntoIterator<Item = (BlockId, Block)>) {
        self.document.merge(partial);
        self.version += 1;
        debug!(version = self.version, blocks = self.document.len(), "document merged");
        self.notify(StoreChange::Document);
    }

    /// Replace the whole document
    pub fn reset_document(&mut self, document: Document) {
        self.document = document;
        self.version += 1;
        debug!(version = self.version, blocks = self.document.len(), "document reset");
        self.notify(StoreChange::Document);
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    /// The selected entry, if the selection still resolves
    pub fn selected_block(&self) -> Option<(&str, &Block)> {
        let id = self.selected_block_id.as_deref()?;
        self.document.get(id).map(|block| (id, block))
    }

    /// Change the selection. Re-selecting the current id is not a change.
    pub fn set_selected_block_id(&mut self, id: Option<BlockId>) {
        if self.selected_block_id == id {
            return;
        }
        self.selected_block_id = id;
        self.notify(StoreChange::Selection);
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn set_selected_screen_size(&mut self, size: ScreenSize) {
        self.update_view(|view| view.selected_screen_size = size);
    }

    pub fn set_selected_main_tab(&mut self, tab: MainTab) {
        self.update_view(|view| view.selected_main_tab = tab);
    }

    pub fn set_inspector_drawer_open(&mut self, open: bool) {
        self.update_view(|view| view.inspector_drawer_open = open);
    }

    pub fn toggle_inspector_drawer(&mut self) {
        self.update_view(|view| view.inspector_drawer_open = !view.inspector_drawer_open);
    }

    fn update_view(&mut self, apply: impl FnOnce(&mut ViewState)) {
        let before = self.view.clone();
        apply(&mut self.view);
        if self.view != before {
            self.notify(StoreChange::View);
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreEvent<'_>) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns whether the subscription existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        let event = StoreEvent {
            change,
            document: &self.document,
            selected_block_id: self.selected_block_id.as_deref(),
            view: &self.view,
            version: self.version,
        };
        debug!(?change, subscribers = self.subscribers.len(), "notifying subscribers");
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailframe_schema::BlockType;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(store: &mut EditorStore) -> Rc<RefCell<Vec<(StoreChange, u64)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |event| sink.borrow_mut().push((event.change, event.version)));
        seen
    }

    #[test]
    fn test_set_document_merges_and_notifies() {
        let mut store = EditorStore::default();
        let seen = recorder(&mut store);

        store.set_document([("t".to_string(), Block::starter(BlockType::Text))]);

        assert_eq!(store.document().len(), 2);
        assert_eq!(store.version(), 1);
        assert_eq!(*seen.borrow(), vec![(StoreChange::Document, 1)]);
    }

    #[test]
    fn test_set_document_accepts_dangling_children() {
        let mut store = EditorStore::default();
        let root = Block::starter(BlockType::EmailLayout).with_children(0, vec!["ghost".into()]);
        store.set_document([("root".to_string(), root)]);
        assert_eq!(store.document().root().unwrap().children(0), ["ghost".to_string()]);
    }

    #[test]
    fn test_reselecting_same_id_is_silent() {
        let mut store = EditorStore::default();
        let seen = recorder(&mut store);

        store.set_selected_block_id(Some("root".into()));
        store.set_selected_block_id(Some("root".into()));
        store.set_selected_block_id(None);

        assert_eq!(
            *seen.borrow(),
            vec![(StoreChange::Selection, 0), (StoreChange::Selection, 0)]
        );
    }

    #[test]
    fn test_subscriber_sees_state_after_change() {
        let mut store = EditorStore::default();
        let observed = Rc::new(RefCell::new(None));
        let sink = observed.clone();
        store.subscribe(move |event| {
            *sink.borrow_mut() = Some(event.document.len());
        });

        let mut next = Document::default();
        next.insert("a", Block::starter(BlockType::Spacer));
        next.insert("b", Block::starter(BlockType::Spacer));
        store.reset_document(next);

        assert_eq!(*observed.borrow(), Some(3));
    }

    #[test]
    fn test_view_setters() {
        let mut store = EditorStore::default();
        let seen = recorder(&mut store);

        store.set_selected_screen_size(ScreenSize::Mobile);
        store.set_selected_main_tab(MainTab::Preview);
        store.toggle_inspector_drawer();
        store.set_inspector_drawer_open(false);

        assert_eq!(store.view().selected_screen_size, ScreenSize::Mobile);
        assert_eq!(store.view().selected_main_tab, MainTab::Preview);
        assert!(!store.view().inspector_drawer_open);
        // The last call changed nothing
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = EditorStore::default();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.set_selected_block_id(Some("root".into()));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_selected_block_id(None);

        assert_eq!(*count.borrow(), 1);
    }
}
