//! Feed, batch and listing parameters.

use serde_json::{json, Value};

/// Parameters for a feed or batch retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    /// Page to fetch, starting at 1.
    pub page: u32,
    /// Number of results per page.
    pub batch_count: u32,
    /// Interaction events giving context to the recommendation, in order.
    pub events: Vec<Value>,
    /// Free-text prompt steering retrieval.
    pub search_prompt: String,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            page: 1,
            batch_count: 10,
            events: Vec::new(),
            search_prompt: String::new(),
        }
    }
}

impl FeedQuery {
    /// Creates a query with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the batch count.
    pub fn batch_count(mut self, batch_count: u32) -> Self {
        self.batch_count = batch_count;
        self
    }

    /// Appends an event.
    pub fn event(mut self, event: Value) -> Self {
        self.events.push(event);
        self
    }

    /// Replaces the events.
    pub fn events(mut self, events: Vec<Value>) -> Self {
        self.events = events;
        self
    }

    /// Sets the search prompt.
    pub fn search_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.search_prompt = prompt.into();
        self
    }

    /// Serializes to the request payload.
    pub fn to_json(&self) -> Value {
        json!({
            "page": self.page,
            "batch_count": self.batch_count,
            "events": self.events,
            "search_prompt": self.search_prompt,
        })
    }
}

/// Pagination for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page to fetch, starting at 1.
    pub page: u32,
    /// Number of records per page.
    pub count: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, count: 10 }
    }
}

impl Pagination {
    /// Creates pagination for a specific page and size.
    pub fn new(page: u32, count: u32) -> Self {
        Self { page, count }
    }

    pub(crate) fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("count".to_string(), self.count.to_string()),
        ]
    }
}
