//! # Invocation Context
//!
//! The dispatcher is generic over its context type and never looks inside
//! it. [`InvocationContext`] is a ready-made context for hosts that do not
//! bring their own: the execution metadata a serverless trigger usually
//! delivers with each event.

use std::time::{Duration, SystemTime};

/// Per-invocation execution metadata.
///
/// # Example
///
/// ```rust,ignore
/// let ctx = InvocationContext::new("req-42")
///     .with_function("demo", "$LATEST")
///     .with_timeout(Duration::from_secs(3));
///
/// assert!(ctx.remaining_time().unwrap() <= Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    /// Identifier of this request.
    pub request_id: String,
    /// Name of the deployed function.
    pub function_name: String,
    /// Version of the deployed function.
    pub function_version: String,
    /// Fully qualified identifier the function was invoked through.
    pub invoked_function_arn: String,
    /// Memory assigned to the function, in megabytes.
    pub memory_limit_mb: u32,
    /// Point in time after which the trigger abandons the invocation.
    pub deadline: Option<SystemTime>,
}

impl InvocationContext {
    /// Create a context for the given request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Set the function name and version.
    pub fn with_function(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.function_name = name.into();
        self.function_version = version.into();
        self
    }

    /// Set the invoked function ARN.
    pub fn with_invoked_function_arn(mut self, arn: impl Into<String>) -> Self {
        self.invoked_function_arn = arn.into();
        self
    }

    /// Set the memory limit.
    pub fn with_memory_limit_mb(mut self, memory_limit_mb: u32) -> Self {
        self.memory_limit_mb = memory_limit_mb;
        self
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: SystemTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the deadline `timeout` from now.
    ///
    /// A timeout too large to represent as a point in time leaves the
    /// context without a deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = SystemTime::now().checked_add(timeout);
        self
    }

    /// Time left before the deadline. Zero once it has passed, `None` without
    /// a deadline.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.deadline.map(|deadline| {
            deadline
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO)
        })
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.remaining_time() == Some(Duration::ZERO)
    }
}
