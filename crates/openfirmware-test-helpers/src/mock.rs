//! Scriptable resource loader doubles.
//!
//! Each double answers from a [`LoaderScript`] and records the requests it
//! received, so tests can assert on what the bridge asked for.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use openfirmware_fetch::{LoadStatus, RequestStatus, RequestTag, ResourceCallback, ResourceLoader};
use parking_lot::Mutex;

/// Status code reported for resources missing from the script.
pub const NOT_FOUND: i32 = -2;

/// Scripted answers keyed by resource name.
#[derive(Debug, Clone, Default)]
pub struct LoaderScript {
    answers: HashMap<String, Result<Vec<u8>, i32>>,
}

impl LoaderScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.answers.insert(name.to_owned(), Ok(bytes.into()));
        self
    }

    pub fn with_failure(mut self, name: &str, code: i32) -> Self {
        self.answers.insert(name.to_owned(), Err(code));
        self
    }

    fn knows(&self, name: &str) -> bool {
        self.answers.contains_key(name)
    }

    fn answer(&self, name: &str) -> (LoadStatus, Vec<u8>) {
        match self.answers.get(name) {
            Some(Ok(bytes)) => (LoadStatus::Success, bytes.clone()),
            Some(Err(code)) => (LoadStatus::Failed { code: *code }, Vec::new()),
            None => (LoadStatus::Failed { code: NOT_FOUND }, Vec::new()),
        }
    }

    fn immediate_status(&self, name: &str, tag: RequestTag) -> RequestStatus {
        if self.knows(name) {
            RequestStatus::Queued(tag)
        } else {
            RequestStatus::Rejected { code: NOT_FOUND }
        }
    }
}

#[derive(Debug, Default)]
struct RequestLog {
    next_tag: AtomicU64,
    requests: Mutex<Vec<(String, String)>>,
}

impl RequestLog {
    fn record(&self, owner: &str, name: &str) -> RequestTag {
        self.requests.lock().push((owner.to_owned(), name.to_owned()));
        RequestTag(self.next_tag.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }
}

/// Calls back from a freshly spawned thread, optionally after a delay.
///
/// This is how real resource subsystems behave: the callback races with the
/// requesting thread's wait.
#[derive(Debug, Default)]
pub struct ThreadedLoader {
    script: LoaderScript,
    delay: Duration,
    log: RequestLog,
}

impl ThreadedLoader {
    pub fn new(script: LoaderScript) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `(owner, resource_name)` pairs in request order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.log.snapshot()
    }
}

impl ResourceLoader for ThreadedLoader {
    fn request(
        &self,
        owner: &str,
        resource_name: &str,
        callback: ResourceCallback,
    ) -> RequestStatus {
        let tag = self.log.record(owner, resource_name);
        let (status, data) = self.script.answer(resource_name);
        let delay = self.delay;
        thread::spawn(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            callback(tag, status, &data);
        });
        self.script.immediate_status(resource_name, tag)
    }
}

/// Calls back on the requesting thread before `request` returns.
#[derive(Debug, Default)]
pub struct InlineLoader {
    script: LoaderScript,
    log: RequestLog,
}

impl InlineLoader {
    pub fn new(script: LoaderScript) -> Self {
        Self {
            script,
            log: RequestLog::default(),
        }
    }

    /// `(owner, resource_name)` pairs in request order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.log.snapshot()
    }
}

impl ResourceLoader for InlineLoader {
    fn request(
        &self,
        owner: &str,
        resource_name: &str,
        callback: ResourceCallback,
    ) -> RequestStatus {
        let tag = self.log.record(owner, resource_name);
        let (status, data) = self.script.answer(resource_name);
        callback(tag, status, &data);
        self.script.immediate_status(resource_name, tag)
    }
}

/// Parks every callback until the test releases it.
#[derive(Default)]
pub struct SilentLoader {
    parked: Mutex<Vec<(RequestTag, ResourceCallback)>>,
    log: RequestLog,
}

impl SilentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting to be released.
    pub fn pending(&self) -> usize {
        self.parked.lock().len()
    }

    /// Complete every parked request successfully with `data`.
    pub fn release_all(&self, data: &[u8]) -> usize {
        let parked: Vec<_> = self.parked.lock().drain(..).collect();
        let count = parked.len();
        for (tag, callback) in parked {
            callback(tag, LoadStatus::Success, data);
        }
        count
    }
}

impl ResourceLoader for SilentLoader {
    fn request(
        &self,
        owner: &str,
        resource_name: &str,
        callback: ResourceCallback,
    ) -> RequestStatus {
        let tag = self.log.record(owner, resource_name);
        self.parked.lock().push((tag, callback));
        RequestStatus::Queued(tag)
    }
}
