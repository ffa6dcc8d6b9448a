//! Interaction controllers for the product-page storefront sections, plus a
//! settings-schema to control-metadata mapper for the component
//! documentation tool.
//!
//! The widgets hydrate server-rendered section markup: a page-load scan
//! mounts a controller per matching container, and the storefront's
//! section-replacement event remounts just the replaced container. Widget
//! logic is generic over [`dom::Dom`], so the unit tests drive the same
//! controllers against the headless [`fake_dom`] backend with a manual
//! clock. The schema mapper is pure and shared with the documentation tool
//! through the [`story_api`] exports.

pub mod accordion;
pub mod carousel;
pub mod config;
pub mod dom;
pub mod events;
pub mod fake_dom;
pub mod schema;
pub mod sections;
pub mod story_api;
pub mod web_dom;

pub use accordion::Accordion;
pub use carousel::{Carousel, CarouselConfig, ATHLETE_SLIDER, REVIEWS_SLIDER};
pub use schema::{
    extract_defaults, extract_schema_from_liquid, generate_story, parse_block, parse_schema,
    parse_setting, validate_schema, ParseOptions, Schema, Story,
};

use wasm_bindgen::prelude::wasm_bindgen;

/// Wasm entry point: install the panic hook, then the section lifecycle
/// listeners.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    sections::install();
}
