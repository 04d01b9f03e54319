//! Toast notifications for fetch failures.
//!
//! Polling retries a failing request every few seconds, so a toast whose
//! message is already on screen is refreshed in place instead of stacking.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

const MAX_VISIBLE: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Recoverable, e.g. a poll that will be retried
    Warning,
    /// Needs user action, e.g. the instance list could not be loaded
    Error,
}

impl ToastKind {
    fn lifetime_ms(self) -> u32 {
        match self {
            ToastKind::Warning => 5000,
            ToastKind::Error => 8000,
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Warning => "toast",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
}

/// Context handle for raising toasts from any component
#[derive(Clone, Copy)]
pub struct Toasts {
    items: Signal<Vec<Toast>>,
    next_id: Signal<u32>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: Signal::new(Vec::new()),
            next_id: Signal::new(0),
        }
    }

    /// Show `message`, or restart the timer of an identical visible toast.
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        let message = message.into();
        let id = *self.next_id.peek();
        *self.next_id.write() += 1;

        {
            let mut items = self.items.write();
            items.retain(|t| t.message != message);
            if items.len() >= MAX_VISIBLE {
                items.remove(0);
            }
            items.push(Toast { id, message, kind });
        }

        let mut items = self.items;
        spawn(async move {
            TimeoutFuture::new(kind.lifetime_ms()).await;
            items.write().retain(|t| t.id != id);
        });
    }

    pub fn dismiss(&mut self, id: u32) {
        self.items.write().retain(|t| t.id != id);
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the toast context. Call once at the app root.
pub fn use_toast_provider() -> Toasts {
    use_context_provider(Toasts::new)
}

pub fn use_toast() -> Toasts {
    use_context::<Toasts>()
}

/// Renders the visible toasts, newest last
#[component]
pub fn ToastFrame() -> Element {
    let mut toasts = use_toast();
    let items = toasts.items.read();

    rsx! {
        div { class: "toast-container",
            for toast in items.iter() {
                div { key: "{toast.id}", class: toast.kind.class(),
                    span { class: "toast-icon", "!" }
                    span { class: "toast-message", "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: {
                            let id = toast.id;
                            move |_| toasts.dismiss(id)
                        },
                        "×"
                    }
                }
            }
        }
    }
}
