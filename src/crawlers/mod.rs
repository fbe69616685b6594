pub mod memory;
pub mod pagination;
pub mod session;
pub mod web;

pub use memory::MemorySession;
pub use pagination::PageWalker;
pub use session::BrowsingSession;
pub use web::WebDriverSession;
