#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cruscotto::{CruscottoError, PayloadShape, RawPayload, SeriesConnector, SeriesRequest};
use serde_json::Value;
use tokio::time::{Duration, sleep};

pub const DATA_SHAPE: PayloadShape = PayloadShape::Array {
    path: &["data"],
    date_field: "date",
    value_field: "value",
};

type ScriptFn = Arc<dyn Fn(&SeriesRequest) -> Result<Value, CruscottoError> + Send + Sync>;

/// Scriptable in-memory connector used by integration tests.
///
/// By default every request returns `body`; `by_code` entries override it per
/// series code, and `script` overrides everything.
pub struct ScriptedConnector {
    pub name: &'static str,
    pub shape: PayloadShape,
    pub body: Value,
    pub by_code: Vec<(&'static str, Result<Value, CruscottoError>)>,
    pub delay_ms: u64,
    pub slow_codes: Vec<&'static str>,
    pub script: Option<ScriptFn>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn builder(name: &'static str) -> ScriptedBuilder {
        ScriptedBuilder {
            inner: Self {
                name,
                shape: DATA_SHAPE,
                body: Value::Null,
                by_code: Vec::new(),
                delay_ms: 0,
                slow_codes: Vec::new(),
                script: None,
                calls: Arc::new(AtomicUsize::new(0)),
            },
        }
    }

}

pub struct ScriptedBuilder {
    inner: ScriptedConnector,
}

impl ScriptedBuilder {
    pub fn shape(mut self, shape: PayloadShape) -> Self {
        self.inner.shape = shape;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.inner.body = body;
        self
    }

    pub fn returns(mut self, code: &'static str, body: Value) -> Self {
        self.inner.by_code.push((code, Ok(body)));
        self
    }

    pub fn fails(mut self, code: &'static str, err: CruscottoError) -> Self {
        self.inner.by_code.push((code, Err(err)));
        self
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.inner.delay_ms = ms;
        self
    }

    /// Requests for `code` hang far past any test timeout.
    pub fn slow(mut self, code: &'static str) -> Self {
        self.inner.slow_codes.push(code);
        self
    }

    pub fn script(
        mut self,
        f: impl Fn(&SeriesRequest) -> Result<Value, CruscottoError> + Send + Sync + 'static,
    ) -> Self {
        self.inner.script = Some(Arc::new(f));
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.inner.calls)
    }

    pub fn build(self) -> Arc<ScriptedConnector> {
        Arc::new(self.inner)
    }
}

#[async_trait]
impl SeriesConnector for ScriptedConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "test"
    }

    fn shape(&self, _req: &SeriesRequest) -> Result<PayloadShape, CruscottoError> {
        Ok(self.shape)
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let code = req.series.code.as_str();
        if self.slow_codes.iter().any(|c| *c == code) {
            sleep(Duration::from_secs(30)).await;
        } else if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let body = if let Some(f) = &self.script {
            f(req)?
        } else if let Some((_, res)) = self.by_code.iter().find(|(c, _)| *c == code) {
            res.clone()?
        } else {
            self.body.clone()
        };
        Ok(RawPayload::new(self.key(), body))
    }
}

/// `{"data": [{"date": d, "value": v}, ...]}`.
pub fn data(points: &[(&str, &str)]) -> Value {
    let rows: Vec<Value> = points
        .iter()
        .map(|(d, v)| serde_json::json!({"date": d, "value": v}))
        .collect();
    serde_json::json!({ "data": rows })
}
