// src/page/mod.rs
// =============================================================================
// This module loads the starting page and exposes its DOM.
//
// Submodules:
// - dom: the PageDom capability and the scraper-backed RenderedPage
// - loader: the PageLoader capability and the reqwest-backed HttpPageLoader
//
// The rest of the program only talks to the two traits, so the extractor can
// be tested against an in-memory DOM and the pipeline against any loader.
// =============================================================================

pub mod dom;
mod loader;

pub use dom::PageDom;
pub use loader::{HttpPageLoader, PageLoader};
