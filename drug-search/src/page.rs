use std::sync::{PoisonError, RwLock};

/// Content of the result container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderTarget {
    #[default]
    Empty,
    Markup(String),
    Text(String),
}

impl RenderTarget {
    /// Raw content, markup or text, as it would sit in the container
    pub fn as_str(&self) -> &str {
        match self {
            RenderTarget::Empty => "",
            RenderTarget::Markup(markup) => markup,
            RenderTarget::Text(text) => text,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            RenderTarget::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn markup(&self) -> Option<&str> {
        match self {
            RenderTarget::Markup(markup) => Some(markup),
            _ => None,
        }
    }
}

/// The host page elements the search handler is wired to: the query field,
/// the blocking notice and the result container.
pub trait Page: Send + Sync {
    /// Current value of the query field
    fn query_value(&self) -> String;

    /// Show a blocking notice to the user
    fn alert(&self, message: &str);

    /// Replace the result container with markup
    fn set_markup(&self, markup: String);

    /// Replace the result container with plain text
    fn set_text(&self, text: String);
}

/// Page kept entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryPage {
    query: RwLock<String>,
    target: RwLock<RenderTarget>,
    notices: RwLock<Vec<String>>,
}

impl InMemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        let page = Self::new();
        page.set_query(query);
        page
    }

    /// Type into the query field
    pub fn set_query(&self, query: impl Into<String>) {
        *self.query.write().unwrap_or_else(PoisonError::into_inner) = query.into();
    }

    pub fn target(&self) -> RenderTarget {
        self.target
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Notices raised so far, oldest first
    pub fn notices(&self) -> Vec<String> {
        self.notices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Page for InMemoryPage {
    fn query_value(&self) -> String {
        self.query
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn alert(&self, message: &str) {
        self.notices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn set_markup(&self, markup: String) {
        *self.target.write().unwrap_or_else(PoisonError::into_inner) = RenderTarget::Markup(markup);
    }

    fn set_text(&self, text: String) {
        *self.target.write().unwrap_or_else(PoisonError::into_inner) = RenderTarget::Text(text);
    }
}
