pub mod config;
pub mod error;
pub mod handler;
pub mod page;
pub mod payload;
pub mod render;
pub mod transport;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ErrorKind, Result, SearchError};
pub use handler::{Activation, HandlerState, Query, SearchHandler};
pub use page::{InMemoryPage, Page, RenderTarget};
pub use payload::{BrandComparison, DrugInfo, GenericLookup, SearchRequest};
pub use render::{render_document, render_info};
pub use transport::{HttpTransport, SearchReply, SearchTransport};
