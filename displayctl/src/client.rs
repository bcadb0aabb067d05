//! HTTP client for the device's REST API.

use std::io::{self, Cursor, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use display_core::api::{self, AnimationList, Partition};
use display_core::progress::upload_percent;
use display_core::upload::{ProgressSink, Transport, TransportError, Upload, UploadResponse};
use log::debug;
use reqwest::blocking::{Body, Client};
use reqwest::header::CONTENT_TYPE;

// Control requests answer quickly; uploads crawl at SPIFFS write speed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

pub struct DeviceClient {
    base: String,
    http: Client,
    upload_http: Client,
}

impl DeviceClient {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        let upload_http = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .context("building upload HTTP client")?;
        Ok(Self {
            base: format!("http://{host}:{port}"),
            http,
            upload_http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// GET an endpoint whose response body the console ignores.
    fn get_ignored(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        debug!("GET {path}");
        let mut request = self.http.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().with_context(|| format!("GET {path}"))?;
        response
            .error_for_status()
            .with_context(|| format!("GET {path}"))?;
        Ok(())
    }

    pub fn animations(&self) -> Result<AnimationList> {
        debug!("GET {}", api::ANIMATIONS);
        let response = self
            .http
            .get(self.url(api::ANIMATIONS))
            .send()
            .context("fetching animation list")?
            .error_for_status()
            .context("fetching animation list")?;
        response.json().context("decoding animation list")
    }

    pub fn set_animation(&self, name: &str) -> Result<()> {
        self.get_ignored(api::SET_ANIMATION, &[("filename", name)])
    }

    pub fn delete_animation(&self, name: &str) -> Result<()> {
        self.get_ignored(api::DELETE_ANIMATION, &[("filename", name)])
    }

    pub fn set_enable_leds(&self, enable: bool) -> Result<()> {
        self.get_ignored(api::SET_ENABLE_LEDS, &[("enable", api::switch_flag(enable))])
    }

    pub fn set_led_update_disable(&self, disable: bool) -> Result<()> {
        self.get_ignored(
            api::SET_LED_UPDATE_DISABLE,
            &[("disable", api::switch_flag(disable))],
        )
    }

    pub fn activate_partition(&self, partition: Partition) -> Result<()> {
        self.get_ignored(partition.activate_path(), &[])
    }

    /// Fire the reboot request without waiting for an answer; the device
    /// usually drops the connection mid-response.
    pub fn reboot(&self) {
        let http = self.http.clone();
        let url = self.url(api::REBOOT);
        std::thread::spawn(move || {
            if let Err(e) = http.get(&url).send() {
                debug!("reboot request: {e}");
            }
        });
    }
}

/// Streams the upload body while reporting transfer percentages.
struct CountingReader {
    inner: Cursor<Vec<u8>>,
    sent: u64,
    total: u64,
    progress: ProgressSink,
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.sent += n as u64;
            (self.progress)(upload_percent(self.sent, self.total));
        }
        Ok(n)
    }
}

impl Transport for DeviceClient {
    fn post(
        &mut self,
        upload: &Upload,
        progress: ProgressSink,
    ) -> Result<UploadResponse, TransportError> {
        let total = upload.total_bytes();
        let reader = CountingReader {
            inner: Cursor::new(upload.body.clone().into_bytes()),
            sent: 0,
            total,
            progress,
        };

        debug!("POST {} ({total} bytes)", upload.kind.path());
        let mut request = self
            .upload_http
            .post(self.url(upload.kind.path()))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::sized(reader, total));
        if let Some((key, value)) = upload.kind.query() {
            request = request.query(&[(key, value)]);
        }

        let response = request.send().map_err(|e| TransportError(e.to_string()))?;
        let ok = response.status().is_success();
        let error = if ok {
            None
        } else {
            let body = response.text().unwrap_or_default();
            api::error_message(&body)
        };
        Ok(UploadResponse { ok, error })
    }
}
