use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    next_id: u64,
    callbacks: BTreeMap<u64, Arc<Callback<T>>>,
}

/// An observer set for one kind of record.
pub struct Topic<T> {
    inner: Arc<Mutex<Subscribers<T>>>,
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Subscribers {
                next_id: 0,
                callbacks: BTreeMap::new(),
            })),
        }
    }
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Topic<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let mut subscribers = self.inner.lock();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.callbacks.insert(id, Arc::new(Box::new(callback)));

        let inner = Arc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.lock().callbacks.remove(&id);
                }
            })),
        }
    }

    /// Calls every subscriber in subscription order. Subscribers may subscribe
    /// or unsubscribe from inside the callback.
    pub fn publish(&self, record: &T) {
        let callbacks: Vec<_> = self.inner.lock().callbacks.values().cloned().collect();
        for callback in callbacks {
            callback(record);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().callbacks.len()
    }
}

/// Releases its subscriber when dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Keeps the subscriber for the life of the topic.
    pub fn detach(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the UI should surface to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl UserNotice {
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}
