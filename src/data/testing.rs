//! In-memory [`SeriesSource`] for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::data::client::{HttpReply, SeriesSource};
use crate::error::AppError;

type Hook = Box<dyn Fn(&str, i32) + Send + Sync>;

#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Replays queued replies per `(code, year)`; unscripted keys answer 404.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<HashMap<(String, i32), VecDeque<Result<HttpReply, AppError>>>>,
    calls: CallCounter,
    requests: Arc<Mutex<Vec<(String, i32)>>>,
    hook: Mutex<Option<Hook>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, code: &str, year: i32, reply: Result<HttpReply, AppError>) {
        self.replies
            .lock()
            .unwrap()
            .entry((code.to_string(), year))
            .or_default()
            .push_back(reply);
    }

    /// Run `f` at the start of every request.
    pub fn on_get(&self, f: impl Fn(&str, i32) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(f));
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    /// Requested keys in call order.
    pub fn requests(&self) -> Arc<Mutex<Vec<(String, i32)>>> {
        Arc::clone(&self.requests)
    }
}

impl SeriesSource for ScriptedSource {
    fn get(&self, code: &str, year: i32) -> Result<HttpReply, AppError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((code.to_string(), year));
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(code, year);
        }
        self.replies
            .lock()
            .unwrap()
            .get_mut(&(code.to_string(), year))
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| Ok(HttpReply::new(404, "")))
    }
}

/// A `{"serie": [...]}` body from `(date, value)` pairs, in the order given.
pub fn series_body(samples: &[(&str, Option<f64>)]) -> String {
    let serie: Vec<serde_json::Value> = samples
        .iter()
        .map(|(date, value)| {
            serde_json::json!({
                "fecha": format!("{date}T03:00:00.000Z"),
                "valor": value,
            })
        })
        .collect();
    serde_json::json!({ "serie": serie }).to_string()
}
