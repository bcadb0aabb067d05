//! Transient notifications ("toasts").
//!
//! Short-lived messages raised when an operation fails with a structured
//! error. Each toast expires on its own 30 second timer; several may be
//! live at once. Server-provided text is untrusted and passes through
//! [`sanitize`] before it reaches a terminal.

use std::time::{Duration, Instant};

/// How long a toast stays live if never dismissed.
pub const TOAST_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub body: String,
    raised_at: Instant,
}

impl Toast {
    /// Build a toast, sanitizing both texts.
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: sanitize(title),
            body: sanitize(body),
            raised_at: Instant::now(),
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) >= TOAST_TTL
    }
}

/// Ordered collection of live toasts.
#[derive(Debug, Default)]
pub struct ToastRack {
    toasts: Vec<Toast>,
}

impl ToastRack {
    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Drop every toast whose timer has run out.
    pub fn sweep(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Strip ANSI escape sequences and control characters from untrusted text.
///
/// The original console interpolated server text into markup unescaped;
/// a terminal has the same problem with escape sequences, so everything
/// that could alter the display is removed before rendering.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI sequence: swallow through its final byte
            if chars.peek() == Some(&'[') {
                chars.next();
                while let Some(&n) = chars.peek() {
                    chars.next();
                    if ('\u{40}'..='\u{7e}').contains(&n) {
                        break;
                    }
                }
            }
            continue;
        }
        if c.is_control() {
            continue;
        }
        out.push(c);
    }
    out
}
