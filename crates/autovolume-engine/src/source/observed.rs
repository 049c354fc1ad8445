use std::sync::Arc;

use parking_lot::Mutex;

pub type ChangeCallback = Arc<dyn Fn(f64) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A scalar that tells its subscribers about every `set`.
///
/// Callbacks run on the setter's thread after the new value is stored, with
/// no lock held, so a callback may read the cell again.
pub struct ObservedValue {
    inner: Mutex<ObservedInner>,
}

struct ObservedInner {
    value: f64,
    next_id: u64,
    callbacks: Vec<(SubscriptionId, ChangeCallback)>,
}

impl ObservedValue {
    pub fn new(initial: f64) -> Self {
        Self {
            inner: Mutex::new(ObservedInner {
                value: initial,
                next_id: 0,
                callbacks: Vec::new(),
            }),
        }
    }

    pub fn get(&self) -> f64 {
        self.inner.lock().value
    }

    pub fn set(&self, value: f64) {
        let callbacks = {
            let mut inner = self.inner.lock();
            inner.value = value;
            inner
                .callbacks
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect::<Vec<_>>()
        };
        for cb in callbacks {
            cb(value);
        }
    }

    pub fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.callbacks.push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().callbacks.retain(|(cb_id, _)| *cb_id != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::ObservedValue;

    #[test]
    fn set_notifies_subscribers_with_new_value() {
        let cell = Arc::new(ObservedValue::new(1.0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reader = Arc::clone(&cell);
        let id = cell.subscribe(Arc::new(move |value| {
            sink.lock().push((value, reader.get()));
        }));

        cell.set(0.4);
        assert_eq!(cell.get(), 0.4);
        assert_eq!(*seen.lock(), vec![(0.4, 0.4)]);

        cell.unsubscribe(id);
        cell.set(0.9);
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(cell.subscriber_count(), 0);
    }
}
