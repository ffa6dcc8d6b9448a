//! Widget behavior constants and the storefront markup contract.

// Gesture and autoplay behavior
pub const SWIPE_THRESHOLD_PX: i32 = 40;
pub const AUTOPLAY_RESUME_DELAY_MS: u32 = 300;

// Default autoplay intervals per slider flavor
pub const ATHLETE_INTERVAL_MS: u32 = 5000;
pub const REVIEWS_INTERVAL_MS: u32 = 6000;

// Configuration attributes read from widget roots
pub const ATTR_SLIDER: &str = "data-slider";
pub const ATTR_AUTOPLAY: &str = "data-autoplay";
pub const ATTR_INTERVAL: &str = "data-interval";
pub const ATTR_LOOP: &str = "data-loop";
pub const ATTR_CLOSE_OTHERS: &str = "data-close-others";

// Section-level container classes scanned at boot
pub const SECTION_ATHLETE_CLASS: &str = "treadmill-f80-athlete-slider";
pub const SECTION_REVIEWS_CLASS: &str = "treadmill-f80-reviews";
pub const SECTION_SPECS_CLASS: &str = "treadmill-f80-specifications";

// Accordion markup
pub const ACCORDION_CLASS: &str = "pdp__accordion";
pub const ACCORDION_TRIGGER_CLASS: &str = "pdp__accordion-trigger";

// Storefront lifecycle event carrying a replaced section container
pub const SECTION_LOAD_EVENT: &str = "shopify:section:load";
