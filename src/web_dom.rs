//! Browser backend: `web-sys` elements and `gloo-timers` scheduling.

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;

use crate::dom::{Dom, Element};

/// The live browser rendering surface.
#[derive(Clone, Copy, Default)]
pub struct WebDom;

/// Handle to a live DOM element.
#[derive(Clone, PartialEq)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self(element)
    }

    pub fn as_raw(&self) -> &web_sys::Element {
        &self.0
    }

    fn select_first(&self, selector: &str) -> Option<WebElement> {
        self.0
            .query_selector(selector)
            .ok()
            .flatten()
            .map(WebElement)
    }

    fn select_all(&self, selector: &str) -> Vec<WebElement> {
        let Ok(list) = self.0.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement)
            .collect()
    }
}

impl Element for WebElement {
    fn attr(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn remove_attr(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_class(&self, class: &str, on: bool) {
        let _ = self.0.class_list().toggle_with_force(class, on);
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(element) = self.0.dyn_ref::<web_sys::HtmlElement>() {
            let _ = element.style().set_property(property, value);
        }
    }

    fn find_by_class(&self, class: &str) -> Option<Self> {
        self.select_first(&format!(".{class}"))
    }

    fn find_all_by_class(&self, class: &str) -> Vec<Self> {
        self.select_all(&format!(".{class}"))
    }

    fn find_by_attr(&self, name: &str, value: &str) -> Option<Self> {
        self.select_first(&format!("[{name}=\"{value}\"]"))
    }

    fn find_by_id(&self, id: &str) -> Option<Self> {
        self.select_first(&format!("[id=\"{id}\"]"))
    }
}

impl Dom for WebDom {
    type Element = WebElement;
    type Interval = Interval;
    type Timeout = Timeout;

    fn set_interval(&self, ms: u32, mut callback: Box<dyn FnMut()>) -> Interval {
        Interval::new(ms, move || callback())
    }

    fn set_timeout(&self, ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(ms, callback)
    }
}
