use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chime_common::{ConversationKey, Event, EventBus, PlatformError};
use tracing::debug;

use super::record::{Activation, NotificationRecord};
use super::{NotificationOptions, NotificationPresenter, Permission};

/// Live system notifications, at most one per tag.
pub struct NotificationCenter {
    presenter: Arc<dyn NotificationPresenter>,
    live: Mutex<HashMap<ConversationKey, Arc<NotificationRecord>>>,
    events: Option<EventBus>,
}

impl NotificationCenter {
    pub fn new(presenter: Arc<dyn NotificationPresenter>) -> Arc<Self> {
        Arc::new(Self {
            presenter,
            live: Mutex::new(HashMap::new()),
            events: None,
        })
    }

    /// Like [`new`](Self::new), publishing shown/closed events on `events`.
    pub fn with_events(presenter: Arc<dyn NotificationPresenter>, events: EventBus) -> Arc<Self> {
        Arc::new(Self {
            presenter,
            live: Mutex::new(HashMap::new()),
            events: Some(events),
        })
    }

    fn live(&self) -> MutexGuard<'_, HashMap<ConversationKey, Arc<NotificationRecord>>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn permission(&self) -> Permission {
        self.presenter.permission()
    }

    pub async fn request_permission(&self) -> Permission {
        self.presenter.request_permission().await
    }

    /// Surface a notification. An entry already live under the same tag
    /// is replaced, not stacked.
    pub fn show(
        self: &Arc<Self>,
        title: &str,
        options: NotificationOptions,
    ) -> Result<Arc<NotificationRecord>, PlatformError> {
        let record = Arc::new(NotificationRecord::new(
            title,
            options,
            self.presenter.supports_close(),
            Arc::downgrade(self),
        ));
        self.presenter.present(&record)?;

        let tag = record.tag().clone();
        let previous = self.live().insert(tag.clone(), Arc::clone(&record));
        if let Some(previous) = previous {
            debug!(tag = %tag, replaced = %previous.id(), "notification replaced");
            previous.mark_replaced();
        }

        debug!(tag = %tag, id = %record.id(), "notification shown");
        if let Some(events) = &self.events {
            events.publish(Event::NotificationShown { tag });
        }
        Ok(record)
    }

    /// Route a click reported only by tag to the live entry for `tag`.
    pub fn activate(&self, tag: &ConversationKey) -> Activation {
        let record = self.live().get(tag).cloned();
        match record {
            Some(record) => record.activate(),
            None => Activation::Unclaimed,
        }
    }

    pub fn get(&self, tag: &ConversationKey) -> Option<Arc<NotificationRecord>> {
        self.live().get(tag).cloned()
    }

    pub fn visible_count(&self) -> usize {
        self.live().len()
    }

    /// Close every live entry.
    pub fn close_all(&self) {
        let records: Vec<_> = self.live().values().cloned().collect();
        for record in records {
            record.close();
        }
    }

    pub(super) fn release(&self, record: &NotificationRecord) {
        {
            let mut live = self.live();
            if live.get(record.tag()).map(|r| r.id()) == Some(record.id()) {
                live.remove(record.tag());
            }
        }
        if record.is_closable() {
            self.presenter.withdraw(record);
        }
        debug!(tag = %record.tag(), id = %record.id(), "notification closed");
        if let Some(events) = &self.events {
            events.publish(Event::NotificationClosed {
                tag: record.tag().clone(),
            });
        }
    }
}
