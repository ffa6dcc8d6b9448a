//! Element-handle and timer abstraction over the rendering surface.
//!
//! Controllers never touch `web_sys` directly: they are generic over [`Dom`],
//! which supplies element handles and timer scheduling. The browser backend
//! lives in [`crate::web_dom`]; [`crate::fake_dom`] provides a headless tree
//! and a manual clock so the same controllers run under native unit tests.

/// Handle to one element in the document tree.
///
/// Handles are cheap clones referring to the same underlying node; equality
/// is node identity. Queries search descendants only, in document order.
pub trait Element: Clone + PartialEq + 'static {
    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&self, name: &str, value: &str);
    fn remove_attr(&self, name: &str);

    fn has_class(&self, class: &str) -> bool;
    /// Add or remove `class` so that it is present exactly when `on` holds.
    fn set_class(&self, class: &str, on: bool);

    /// Set an inline style property.
    fn set_style(&self, property: &str, value: &str);

    fn find_by_class(&self, class: &str) -> Option<Self>;
    fn find_all_by_class(&self, class: &str) -> Vec<Self>;
    fn find_by_attr(&self, name: &str, value: &str) -> Option<Self>;
    fn find_by_id(&self, id: &str) -> Option<Self>;

    /// The `id` attribute, when present and non-empty.
    fn id(&self) -> Option<String> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// `data-*` toggle semantics: enabled only by the literal `"true"`.
    fn flag(&self, name: &str) -> bool {
        self.attr(name).as_deref() == Some("true")
    }

    /// Positive-integer attribute with a fallback for absent or invalid
    /// values.
    fn int_attr_or(&self, name: &str, fallback: u32) -> u32 {
        self.attr(name)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(fallback)
    }
}

/// Rendering-surface backend: element handles plus timer scheduling.
///
/// Timer handles cancel their callback when dropped. Interval handles must
/// tolerate being dropped from inside their own callback; the autoplay reset
/// path does exactly that.
pub trait Dom: Clone + 'static {
    type Element: Element;
    type Interval;
    type Timeout;

    fn set_interval(&self, ms: u32, callback: Box<dyn FnMut()>) -> Self::Interval;
    fn set_timeout(&self, ms: u32, callback: Box<dyn FnOnce()>) -> Self::Timeout;
}
