//! The dispatch registry: operation name in, result envelope out.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use sourcebridge_connectors::Credentials;
use sourcebridge_platform::Platform;
use sourcebridge_shared::{DefaultsConfig, Result, input_schema, validate};

use crate::catalog::Operation;
use crate::envelope::ToolResult;
use crate::ops;

/// Source of the current time.
pub type Clock = fn() -> DateTime<Utc>;

/// One entry of the tool listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Descriptors for the whole catalog under `defaults`.
pub fn tool_descriptors(defaults: &DefaultsConfig) -> Vec<ToolDescriptor> {
    Operation::all()
        .into_iter()
        .map(|op| ToolDescriptor {
            name: op.name().to_string(),
            description: op.description(),
            input_schema: input_schema(&op.params(defaults)).to_value(),
        })
        .collect()
}

/// Binds every operation to its parameters and its remote call.
///
/// Holds no per-invocation state; share it behind an `Arc` and invoke
/// concurrently.
pub struct Dispatcher {
    platform: Arc<dyn Platform>,
    credentials: Credentials,
    defaults: DefaultsConfig,
    clock: Clock,
}

impl Dispatcher {
    pub fn new(
        platform: Arc<dyn Platform>,
        credentials: Credentials,
        defaults: DefaultsConfig,
    ) -> Self {
        Self {
            platform,
            credentials,
            defaults,
            clock: Utc::now,
        }
    }

    /// Replace the clock (tests pin "now").
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Name, description and JSON Schema of every operation.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        tool_descriptors(&self.defaults)
    }

    /// Run one invocation. Every failure comes back as an error envelope.
    #[instrument(skip_all, fields(operation = %name, invocation = %Uuid::now_v7()))]
    pub async fn invoke(&self, name: &str, arguments: &Map<String, Value>) -> ToolResult {
        let Some(op) = Operation::from_name(name) else {
            warn!("unknown operation");
            return ToolResult::error(format!("unknown operation '{name}'"));
        };

        let start = Instant::now();
        let result = self.run(op, arguments).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(elapsed_ms, "operation succeeded"),
            Err(e) => warn!(elapsed_ms, error = %e, "operation failed"),
        }
        result.into()
    }

    async fn run(&self, op: Operation, arguments: &Map<String, Value>) -> Result<Value> {
        let args = validate(&op.params(&self.defaults), arguments)?;
        ops::dispatch(self, op, &args).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("credentials", &self.credentials.configured_names())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
