//! Test doubles and fixtures shared by the cache tests

use std::sync::{mpsc, Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use url::Url;
use uuid::Uuid;

use super::store::{
    CachedFeed, DeletionCompletion, DeletionResult, FeedStore, InsertionCompletion,
    InsertionResult, LocalFeedImage, RetrievalCompletion, RetrievalResult, StoreError,
};
use crate::feed::FeedImage;

/// A message the spy received, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedMessage {
    DeleteCachedFeed,
    Insert(Vec<LocalFeedImage>, DateTime<Utc>),
    Retrieve,
}

/// Store that records calls and holds completions until a test fires them
#[derive(Default)]
pub struct FeedStoreSpy {
    messages: Mutex<Vec<ReceivedMessage>>,
    deletions: Mutex<Vec<Option<DeletionCompletion>>>,
    insertions: Mutex<Vec<Option<InsertionCompletion>>>,
    retrievals: Mutex<Vec<Option<RetrievalCompletion>>>,
}

impl FeedStoreSpy {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received_messages(&self) -> Vec<ReceivedMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn complete_deletion(&self, error: StoreError, index: usize) {
        let completion = self.deletions.lock().unwrap()[index].take();
        completion.expect("deletion already completed")(Err(error));
    }

    pub fn complete_deletion_successfully(&self, index: usize) {
        let completion = self.deletions.lock().unwrap()[index].take();
        completion.expect("deletion already completed")(Ok(()));
    }

    pub fn complete_insertion(&self, error: StoreError, index: usize) {
        let completion = self.insertions.lock().unwrap()[index].take();
        completion.expect("insertion already completed")(Err(error));
    }

    pub fn complete_insertion_successfully(&self, index: usize) {
        let completion = self.insertions.lock().unwrap()[index].take();
        completion.expect("insertion already completed")(Ok(()));
    }

    pub fn complete_retrieval(&self, error: StoreError, index: usize) {
        let completion = self.retrievals.lock().unwrap()[index].take();
        completion.expect("retrieval already completed")(Err(error));
    }

    pub fn complete_retrieval_with_empty_cache(&self, index: usize) {
        let completion = self.retrievals.lock().unwrap()[index].take();
        completion.expect("retrieval already completed")(Ok(None));
    }

    pub fn complete_retrieval_with(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        index: usize,
    ) {
        let completion = self.retrievals.lock().unwrap()[index].take();
        completion.expect("retrieval already completed")(Ok(Some(CachedFeed { feed, timestamp })));
    }
}

impl FeedStore for FeedStoreSpy {
    fn retrieve(&self, completion: RetrievalCompletion) {
        self.retrievals.lock().unwrap().push(Some(completion));
        self.messages.lock().unwrap().push(ReceivedMessage::Retrieve);
    }

    fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        self.insertions.lock().unwrap().push(Some(completion));
        self.messages
            .lock()
            .unwrap()
            .push(ReceivedMessage::Insert(feed, timestamp));
    }

    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        self.deletions.lock().unwrap().push(Some(completion));
        self.messages
            .lock()
            .unwrap()
            .push(ReceivedMessage::DeleteCachedFeed);
    }
}

pub fn any_error() -> StoreError {
    StoreError::Unavailable("any error".to_string())
}

pub fn unique_image() -> FeedImage {
    FeedImage::new(
        Uuid::new_v4(),
        Some("any".to_string()),
        Some("any".to_string()),
        Url::parse("https://any-url.com").unwrap(),
    )
}

/// Returns a pair of domain images and their cache-side copies
pub fn unique_image_feed() -> (Vec<FeedImage>, Vec<LocalFeedImage>) {
    let models = vec![unique_image(), unique_image()];
    let local = models.iter().cloned().map(LocalFeedImage::from).collect();
    (models, local)
}

/// Runs `retrieve` on a store that completes before returning
pub fn retrieve<S: FeedStore + ?Sized>(store: &S) -> RetrievalResult {
    let (tx, rx) = mpsc::channel();
    store.retrieve(Box::new(move |result| tx.send(result).unwrap()));
    rx.try_recv().expect("retrieve should complete synchronously")
}

/// Runs `insert` on a store that completes before returning
pub fn insert<S: FeedStore + ?Sized>(
    store: &S,
    feed: Vec<LocalFeedImage>,
    timestamp: DateTime<Utc>,
) -> InsertionResult {
    let (tx, rx) = mpsc::channel();
    store.insert(feed, timestamp, Box::new(move |result| tx.send(result).unwrap()));
    rx.try_recv().expect("insert should complete synchronously")
}

/// Runs `delete_cached_feed` on a store that completes before returning
pub fn delete<S: FeedStore + ?Sized>(store: &S) -> DeletionResult {
    let (tx, rx) = mpsc::channel();
    store.delete_cached_feed(Box::new(move |result| tx.send(result).unwrap()));
    rx.try_recv().expect("delete should complete synchronously")
}

// Contract checks every `FeedStore` implementation must pass. Each expects an
// empty, writable store.

pub fn assert_retrieve_delivers_empty_on_empty_cache<S: FeedStore + ?Sized>(store: &S) {
    assert!(retrieve(store).unwrap().is_none());
}

pub fn assert_retrieve_has_no_side_effects_on_empty_cache<S: FeedStore + ?Sized>(store: &S) {
    assert!(retrieve(store).unwrap().is_none());
    assert!(retrieve(store).unwrap().is_none());
}

pub fn assert_retrieve_delivers_inserted_values<S: FeedStore + ?Sized>(store: &S) {
    let (_, feed) = unique_image_feed();
    let timestamp = Utc::now();

    insert(store, feed.clone(), timestamp).expect("Insert should succeed");

    let cached = retrieve(store).unwrap().expect("Should find cache");
    assert_eq!(cached, CachedFeed { feed, timestamp });
}

pub fn assert_retrieve_has_no_side_effects_on_non_empty_cache<S: FeedStore + ?Sized>(store: &S) {
    insert(store, unique_image_feed().1, Utc::now()).unwrap();

    let first = retrieve(store).unwrap();
    let second = retrieve(store).unwrap();

    assert!(first.is_some());
    assert_eq!(first, second);
}

pub fn assert_insert_overrides_previously_inserted_cache<S: FeedStore + ?Sized>(store: &S) {
    let (_, first) = unique_image_feed();
    let (_, latest) = unique_image_feed();
    let latest_timestamp = Utc::now();

    insert(store, first, latest_timestamp - Duration::hours(1)).unwrap();
    insert(store, latest.clone(), latest_timestamp).unwrap();

    let cached = retrieve(store).unwrap().unwrap();
    assert_eq!(cached.feed, latest);
    assert_eq!(cached.timestamp, latest_timestamp);
}

pub fn assert_delete_has_no_side_effects_on_empty_cache<S: FeedStore + ?Sized>(store: &S) {
    delete(store).expect("Deleting an empty cache should succeed");
    delete(store).expect("Deleting twice should succeed");
    assert!(retrieve(store).unwrap().is_none());
}

pub fn assert_delete_empties_previously_inserted_cache<S: FeedStore + ?Sized>(store: &S) {
    insert(store, unique_image_feed().1, Utc::now()).unwrap();

    delete(store).expect("Delete should succeed");

    assert!(retrieve(store).unwrap().is_none());
}
