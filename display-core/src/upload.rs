//! Upload lifecycle: payload bytes -> hex body -> POST -> UI events.
//!
//! Each upload is an explicit operation object driven through two seams,
//! [`Transport`] (the HTTP POST) and [`ConsoleUi`] (progress display and
//! notifications), so the whole flow runs in tests without a network.
//! Failures are terminal and local to the one operation; nothing retries.

use std::sync::Arc;

use thiserror::Error;

use crate::{api, hex};

/// What is being uploaded, and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadKind {
    /// Firmware image for the standby OTA slot.
    Firmware,
    /// Animation asset, stored on the device under `filename`.
    Animation { filename: String },
}

impl UploadKind {
    pub fn path(&self) -> &'static str {
        match self {
            UploadKind::Firmware => api::UPLOAD_OTA,
            UploadKind::Animation { .. } => api::UPLOAD_ANIMATION,
        }
    }

    /// Query parameter for the destination, if the endpoint takes one.
    /// The HTTP layer URL-encodes the value.
    pub fn query(&self) -> Option<(&'static str, &str)> {
        match self {
            UploadKind::Firmware => None,
            UploadKind::Animation { filename } => Some(("filename", filename)),
        }
    }
}

/// A prepared upload: destination plus the hex-encoded body.
#[derive(Debug, Clone)]
pub struct Upload {
    pub kind: UploadKind,
    pub body: String,
}

impl Upload {
    pub fn prepare(kind: UploadKind, payload: &[u8]) -> Self {
        Self {
            kind,
            body: hex::encode(payload),
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Outcome of an HTTP exchange that reached the server.
///
/// `error` carries the `error` field of a JSON failure body, when the
/// server sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub ok: bool,
    pub error: Option<String>,
}

/// Transport-level failure: the request never produced a response.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Receives integer percentages in `0..=100` while bytes are in flight.
pub type ProgressSink = Arc<dyn Fn(u8) + Send + Sync>;

pub trait Transport {
    /// POST the upload body as `application/x-www-form-urlencoded`,
    /// feeding percentage updates to `progress` as bytes go out. When the
    /// transferred total is not known, no update is emitted.
    fn post(
        &mut self,
        upload: &Upload,
        progress: ProgressSink,
    ) -> Result<UploadResponse, TransportError>;
}

/// Presentation collaborator: the upload dialog, its progress element and
/// the toast area.
pub trait ConsoleUi {
    fn open_dialog(&mut self);
    /// Sink for live transfer updates; may outlive this borrow for the
    /// duration of one POST.
    fn progress_sink(&self) -> ProgressSink;
    fn set_progress(&mut self, percent: u8);
    fn mark_failed(&mut self);
    fn toast(&mut self, title: &str, body: &str);
    fn reload(&mut self);
    fn dismiss(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing to send; no network activity, no UI activity.
    NoFile,
    Completed,
    Failed,
}

/// Drive one upload from payload to completion.
///
/// With no payload the operation aborts silently before any network
/// activity. Otherwise the dialog opens, the POST runs with live progress,
/// and on success the UI reloads device state. A failure marks the
/// progress display and raises a toast only when the server supplied a
/// structured error message. Regardless of outcome the progress display is
/// forced to 100% and the dialog dismissed.
pub fn run_upload(
    transport: &mut dyn Transport,
    ui: &mut dyn ConsoleUi,
    kind: UploadKind,
    source: Option<&[u8]>,
) -> UploadOutcome {
    let Some(payload) = source else {
        return UploadOutcome::NoFile;
    };
    let upload = Upload::prepare(kind, payload);

    ui.open_dialog();
    let result = transport.post(&upload, ui.progress_sink());
    let outcome = match result {
        Ok(response) if response.ok => {
            ui.reload();
            UploadOutcome::Completed
        }
        Ok(response) => {
            ui.mark_failed();
            if let Some(message) = response.error {
                ui.toast("Upload failed", &message);
            }
            UploadOutcome::Failed
        }
        Err(_) => {
            ui.mark_failed();
            UploadOutcome::Failed
        }
    };
    ui.set_progress(100);
    ui.dismiss();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::upload_percent;
    use std::sync::Mutex;

    /// Scripted transport: replays byte-count events, then returns the
    /// scripted result.
    struct FakeTransport {
        calls: usize,
        events: Vec<(u64, Option<u64>)>,
        result: Result<UploadResponse, String>,
        last_body: Option<String>,
    }

    impl FakeTransport {
        fn returning(result: Result<UploadResponse, String>) -> Self {
            Self {
                calls: 0,
                events: Vec::new(),
                result,
                last_body: None,
            }
        }
    }

    impl Transport for FakeTransport {
        fn post(
            &mut self,
            upload: &Upload,
            progress: ProgressSink,
        ) -> Result<UploadResponse, TransportError> {
            self.calls += 1;
            self.last_body = Some(upload.body.clone());
            for &(loaded, total) in &self.events {
                if let Some(total) = total {
                    progress(upload_percent(loaded, total));
                }
            }
            self.result.clone().map_err(TransportError)
        }
    }

    #[derive(Default)]
    struct RecordingUi {
        dialog_open: bool,
        dismissed: bool,
        live_progress: Arc<Mutex<Vec<u8>>>,
        forced_progress: Vec<u8>,
        failed: bool,
        toasts: Vec<(String, String)>,
        reloads: usize,
    }

    impl ConsoleUi for RecordingUi {
        fn open_dialog(&mut self) {
            self.dialog_open = true;
        }

        fn progress_sink(&self) -> ProgressSink {
            let log = Arc::clone(&self.live_progress);
            Arc::new(move |pct| log.lock().unwrap().push(pct))
        }

        fn set_progress(&mut self, percent: u8) {
            self.forced_progress.push(percent);
        }

        fn mark_failed(&mut self) {
            self.failed = true;
        }

        fn toast(&mut self, title: &str, body: &str) {
            self.toasts.push((title.to_string(), body.to_string()));
        }

        fn reload(&mut self) {
            self.reloads += 1;
        }

        fn dismiss(&mut self) {
            self.dismissed = true;
        }
    }

    fn ok_response() -> Result<UploadResponse, String> {
        Ok(UploadResponse { ok: true, error: None })
    }

    #[test]
    fn test_no_payload_is_a_silent_noop() {
        let mut transport = FakeTransport::returning(ok_response());
        let mut ui = RecordingUi::default();

        let outcome = run_upload(&mut transport, &mut ui, UploadKind::Firmware, None);

        assert_eq!(outcome, UploadOutcome::NoFile);
        assert_eq!(transport.calls, 0);
        assert!(!ui.dialog_open);
        assert!(!ui.dismissed);
        assert!(ui.toasts.is_empty());
    }

    #[test]
    fn test_successful_upload_reloads_exactly_once() {
        let mut transport = FakeTransport::returning(ok_response());
        transport.events = vec![(50, Some(200)), (200, Some(200))];
        let mut ui = RecordingUi::default();

        let outcome = run_upload(&mut transport, &mut ui, UploadKind::Firmware, Some(&[1, 2, 3]));

        assert_eq!(outcome, UploadOutcome::Completed);
        assert_eq!(transport.calls, 1);
        assert_eq!(ui.reloads, 1);
        assert!(!ui.failed);
        assert!(ui.toasts.is_empty());
        assert_eq!(*ui.live_progress.lock().unwrap(), vec![25, 100]);
        assert_eq!(ui.forced_progress, vec![100]);
        assert!(ui.dialog_open);
        assert!(ui.dismissed);
    }

    #[test]
    fn test_structured_error_raises_one_toast() {
        let mut transport = FakeTransport::returning(Ok(UploadResponse {
            ok: false,
            error: Some("bad image".to_string()),
        }));
        let mut ui = RecordingUi::default();

        let outcome = run_upload(&mut transport, &mut ui, UploadKind::Firmware, Some(&[0xAB]));

        assert_eq!(outcome, UploadOutcome::Failed);
        assert!(ui.failed);
        assert_eq!(ui.toasts, vec![("Upload failed".to_string(), "bad image".to_string())]);
        assert_eq!(ui.reloads, 0);
        // the dialog still closes with a full bar
        assert_eq!(ui.forced_progress, vec![100]);
        assert!(ui.dismissed);
    }

    #[test]
    fn test_failure_without_message_shows_no_toast() {
        let mut transport =
            FakeTransport::returning(Ok(UploadResponse { ok: false, error: None }));
        let mut ui = RecordingUi::default();

        let outcome = run_upload(&mut transport, &mut ui, UploadKind::Firmware, Some(&[1]));

        assert_eq!(outcome, UploadOutcome::Failed);
        assert!(ui.failed);
        assert!(ui.toasts.is_empty());
    }

    #[test]
    fn test_transport_failure_shows_no_toast() {
        let mut transport = FakeTransport::returning(Err("connection refused".to_string()));
        let mut ui = RecordingUi::default();

        let outcome = run_upload(&mut transport, &mut ui, UploadKind::Firmware, Some(&[1]));

        assert_eq!(outcome, UploadOutcome::Failed);
        assert!(ui.failed);
        assert!(ui.toasts.is_empty());
        assert!(ui.dismissed);
    }

    #[test]
    fn test_unknown_total_emits_no_progress() {
        let mut transport = FakeTransport::returning(ok_response());
        transport.events = vec![(10, None), (20, None)];
        let mut ui = RecordingUi::default();

        run_upload(&mut transport, &mut ui, UploadKind::Firmware, Some(&[1, 2]));

        assert!(ui.live_progress.lock().unwrap().is_empty());
    }

    #[test]
    fn test_body_is_hex_of_payload() {
        let mut transport = FakeTransport::returning(ok_response());
        let mut ui = RecordingUi::default();

        run_upload(&mut transport, &mut ui, UploadKind::Firmware, Some(&[0xDE, 0xAD]));

        assert_eq!(transport.last_body.as_deref(), Some("DEAD"));
    }

    #[test]
    fn test_kind_destinations() {
        assert_eq!(UploadKind::Firmware.path(), api::UPLOAD_OTA);
        assert_eq!(UploadKind::Firmware.query(), None);

        let kind = UploadKind::Animation { filename: "nyan cat.gif".to_string() };
        assert_eq!(kind.path(), api::UPLOAD_ANIMATION);
        assert_eq!(kind.query(), Some(("filename", "nyan cat.gif")));
    }

    #[test]
    fn test_empty_payload_uploads_empty_body() {
        let upload = Upload::prepare(UploadKind::Firmware, &[]);
        assert_eq!(upload.body, "");
        assert_eq!(upload.total_bytes(), 0);
    }
}
