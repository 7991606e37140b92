use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, Weak};

use chime_common::{ConversationKey, NotificationId};

use super::center::NotificationCenter;
use super::NotificationOptions;

type ClickHandler = Box<dyn FnOnce() + Send>;

/// What became of a user's click on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The click handler ran.
    Handled,
    /// The click was already delivered, or a newer notification replaced
    /// this one. Nothing more should happen.
    Stale,
    /// No live notification can take the click.
    Unclaimed,
}

/// One surfaced system notification.
///
/// Closing is idempotent and clicking fires the handler at most once,
/// no matter how many times either is triggered.
pub struct NotificationRecord {
    id: NotificationId,
    title: String,
    options: NotificationOptions,
    closable: bool,
    closed: AtomicBool,
    clicked: AtomicBool,
    replaced: AtomicBool,
    on_click: Mutex<Option<ClickHandler>>,
    center: Weak<NotificationCenter>,
}

impl NotificationRecord {
    pub(super) fn new(
        title: &str,
        options: NotificationOptions,
        closable: bool,
        center: Weak<NotificationCenter>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            title: title.to_string(),
            options,
            closable,
            closed: AtomicBool::new(false),
            clicked: AtomicBool::new(false),
            replaced: AtomicBool::new(false),
            on_click: Mutex::new(None),
            center,
        }
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &NotificationOptions {
        &self.options
    }

    pub fn tag(&self) -> &ConversationKey {
        &self.options.tag
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn set_on_click(&self, handler: impl FnOnce() + Send + 'static) {
        let mut slot = self.on_click.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Box::new(handler));
    }

    /// Deliver a user click.
    ///
    /// A record that expired unclicked reports [`Activation::Unclaimed`] so
    /// the caller can fall back to its own routing.
    pub fn activate(&self) -> Activation {
        if self.replaced.load(Ordering::Acquire) {
            return Activation::Stale;
        }
        if self.is_closed() && !self.clicked.load(Ordering::Acquire) {
            return Activation::Unclaimed;
        }
        if self.clicked.swap(true, Ordering::AcqRel) {
            return Activation::Stale;
        }
        let handler = self
            .on_click
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handler {
            Some(handler) => {
                handler();
                Activation::Handled
            }
            None => Activation::Unclaimed,
        }
    }

    /// Run the click handler. Returns `false` if it already ran or none is set.
    pub fn click(&self) -> bool {
        self.activate() == Activation::Handled
    }

    /// Close the notification. Closing an already-closed record does nothing.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(center) = self.center.upgrade() {
            center.release(self);
        }
    }

    /// A newer entry took over the tag; the platform already replaced us.
    pub(super) fn mark_replaced(&self) {
        self.replaced.store(true, Ordering::Release);
        self.closed.store(true, Ordering::Release);
    }
}

impl fmt::Debug for NotificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationRecord")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("tag", &self.options.tag)
            .field("closable", &self.closable)
            .field("closed", &self.is_closed())
            .finish()
    }
}
