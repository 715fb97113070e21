use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{ActiveAnimation, Animation};

/// Called once when an animation stops: `true` if it reached its target,
/// `false` if it was interrupted by a write or another animation.
pub type CompletionCallback = Box<dyn FnOnce(bool) + Send>;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Running {
    animation: ActiveAnimation,
    on_done: Option<CompletionCallback>,
}

struct Inner<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_subscription: u64,
    running: Option<Running>,
}

/// Observable cell shared between a writer and its readers.
///
/// Clones share the same cell. Subscribers run after every write, outside the
/// lock, so they may read the value (or other values) freely.
pub struct SharedValue<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for SharedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedValue").field(&self.get()).finish()
    }
}

impl<T: Clone> SharedValue<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                subscribers: Vec::new(),
                next_subscription: 0,
                running: None,
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Write a value and notify subscribers. Stops any running animation.
    pub fn set(&self, value: T) {
        let interrupted = {
            let mut inner = self.lock();
            inner.value = value;
            inner.running.take()
        };
        if let Some(on_done) = interrupted.and_then(|running| running.on_done) {
            on_done(false);
        }
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push((id, Arc::new(f)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub, _)| *sub != id);
        inner.subscribers.len() != before
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.lock().running.is_some()
    }

    fn notify(&self) {
        let (value, subscribers) = {
            let inner = self.lock();
            let subscribers: Vec<Subscriber<T>> =
                inner.subscribers.iter().map(|(_, f)| Arc::clone(f)).collect();
            (inner.value.clone(), subscribers)
        };
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SharedValue<f64> {
    /// Start `animation` from the current value, replacing any running one.
    pub fn animate(&self, animation: Animation, on_done: Option<CompletionCallback>) {
        let interrupted = {
            let mut inner = self.lock();
            let from = inner.value;
            inner.running.replace(Running {
                animation: ActiveAnimation::new(animation, from),
                on_done,
            })
        };
        if let Some(on_done) = interrupted.and_then(|running| running.on_done) {
            on_done(false);
        }
    }

    /// Advance the running animation by `dt`. Returns whether it is still running.
    pub fn tick(&self, dt: Duration) -> bool {
        let finished = {
            let mut inner = self.lock();
            let current = inner.value;
            let Some(running) = inner.running.as_mut() else {
                return false;
            };
            let (value, done) = running.animation.step(current, dt);
            inner.value = value;
            if done { inner.running.take() } else { None }
        };
        self.notify();
        match finished {
            Some(running) => {
                if let Some(on_done) = running.on_done {
                    on_done(true);
                }
                false
            }
            None => true,
        }
    }
}
