#![allow(dead_code)]

use cloudfn::{Bean, InvocationContext};

// ============================================================================
// Test Event Types
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestEvent {
    pub id: u64,
    pub content: String,
}

impl TestEvent {
    pub fn new(id: u64, content: &str) -> Self {
        Self {
            id,
            content: content.to_string(),
        }
    }
}

pub fn context(request_id: &str) -> InvocationContext {
    InvocationContext::new(request_id).with_function("demo", "$LATEST")
}

// ============================================================================
// Plain Beans
// ============================================================================

/// An application object without the handler tag.
pub struct Clock;

impl Bean for Clock {
    fn bean_name(&self) -> &str {
        "clock"
    }
}

/// Another untagged object, using the default name.
pub struct Repository {
    pub rows: Vec<String>,
}

impl Bean for Repository {}
