//! Document scan, widget mounting, and storefront section lifecycle.
//!
//! A full scan runs once the document is ready; afterwards the storefront's
//! section-replacement event remounts just the replaced container. Mounted
//! widgets are tracked in a registry keyed by section id so the replaced
//! instance releases its timers and listeners before the new one mounts.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_utils::document;
use log::debug;
use wasm_bindgen::JsCast;

use crate::accordion::Accordion;
use crate::carousel::{Carousel, CarouselMarkup, ATHLETE_SLIDER, REVIEWS_SLIDER};
use crate::config::{
    SECTION_ATHLETE_CLASS, SECTION_LOAD_EVENT, SECTION_REVIEWS_CLASS, SECTION_SPECS_CLASS,
};
use crate::dom::Element;
use crate::events::EventBinding;
use crate::web_dom::{WebDom, WebElement};

thread_local! {
    /// Widgets currently mounted; entries drop (and tear down) when their
    /// section is replaced.
    static MOUNTED: RefCell<Vec<MountedWidget>> = RefCell::new(Vec::new());
}

struct MountedWidget {
    section_id: Option<String>,
    _widget: Widget,
}

enum Widget {
    Carousel {
        controller: Carousel<WebDom>,
        _listeners: Vec<EventBinding>,
    },
    Accordion {
        _controller: Rc<RefCell<Accordion<WebElement>>>,
        _listeners: Vec<EventBinding>,
    },
}

impl Drop for Widget {
    fn drop(&mut self) {
        if let Widget::Carousel { controller, .. } = self {
            controller.destroy();
        }
    }
}

/// Install the boot listeners: an initial scan once the document is ready
/// and targeted re-instantiation on section replacement. Called from the
/// wasm start function.
pub fn install() {
    let doc = document();
    if doc.ready_state() == "loading" {
        EventBinding::listen(&doc, "DOMContentLoaded", |_| init_all()).forget();
    } else {
        init_all();
    }

    EventBinding::listen(&doc, SECTION_LOAD_EVENT, |event| {
        let Some(section) = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        remount_section(&WebElement::new(section));
    })
    .forget();
}

/// Scan the whole document and mount every widget container found.
pub fn init_all() {
    let doc = document();
    for (class, markup) in [
        (SECTION_ATHLETE_CLASS, &ATHLETE_SLIDER),
        (SECTION_REVIEWS_CLASS, &REVIEWS_SLIDER),
    ] {
        for section in select_sections(&doc, class) {
            mount_carousel(&section, markup);
        }
    }
    for section in select_sections(&doc, SECTION_SPECS_CLASS) {
        mount_accordion(&section);
    }
}

fn select_sections(doc: &web_sys::Document, class: &str) -> Vec<WebElement> {
    let Ok(list) = doc.query_selector_all(&format!("section.{class}")) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement::new)
        .collect()
}

/// Tear down whatever was mounted for this section, then mount the widget
/// families its classes declare.
fn remount_section(section: &WebElement) {
    if let Some(id) = section.id() {
        let released = MOUNTED.with(|mounted| {
            let mut mounted = mounted.borrow_mut();
            let before = mounted.len();
            mounted.retain(|entry| entry.section_id.as_deref() != Some(id.as_str()));
            before - mounted.len()
        });
        if released > 0 {
            debug!("section {id} replaced, released {released} widget(s)");
        }
    }
    if section.has_class(SECTION_ATHLETE_CLASS) {
        mount_carousel(section, &ATHLETE_SLIDER);
    }
    if section.has_class(SECTION_REVIEWS_CLASS) {
        mount_carousel(section, &REVIEWS_SLIDER);
    }
    if section.has_class(SECTION_SPECS_CLASS) {
        mount_accordion(section);
    }
}

fn register(section: &WebElement, widget: Widget) {
    MOUNTED.with(|mounted| {
        mounted.borrow_mut().push(MountedWidget {
            section_id: section.id(),
            _widget: widget,
        })
    });
}

fn mount_carousel(section: &WebElement, markup: &'static CarouselMarkup) {
    let Some(controller) = Carousel::mount(WebDom, section, markup) else {
        return;
    };
    let listeners = wire_carousel(&controller);
    register(
        section,
        Widget::Carousel {
            controller,
            _listeners: listeners,
        },
    );
}

fn wire_carousel(carousel: &Carousel<WebDom>) -> Vec<EventBinding> {
    let mut listeners = Vec::new();

    if let Some(prev) = carousel.prev_control() {
        let handle = carousel.clone();
        listeners.push(EventBinding::listen(prev.as_raw(), "click", move |_| {
            handle.prev()
        }));
    }
    if let Some(next) = carousel.next_control() {
        let handle = carousel.clone();
        listeners.push(EventBinding::listen(next.as_raw(), "click", move |_| {
            handle.next()
        }));
    }

    for (index, dot) in carousel.dots().into_iter().enumerate() {
        let click = carousel.clone();
        listeners.push(EventBinding::listen(dot.as_raw(), "click", move |_| {
            click.go_to(index as isize)
        }));
        let key = carousel.clone();
        listeners.push(EventBinding::listen(dot.as_raw(), "keydown", move |event| {
            let Some(keyboard) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            if is_activation_key(&keyboard.key()) {
                key.go_to(index as isize);
            }
        }));
    }

    if let Some(track) = carousel.track() {
        let start = carousel.clone();
        listeners.push(EventBinding::listen_passive(
            track.as_raw(),
            "touchstart",
            move |event| {
                if let Some(x) = gesture_start_x(&event) {
                    start.touch_start(x);
                }
            },
        ));
        let end = carousel.clone();
        listeners.push(EventBinding::listen_passive(
            track.as_raw(),
            "touchend",
            move |event| {
                if let Some(x) = gesture_end_x(&event) {
                    end.touch_end(x);
                }
            },
        ));
    }

    let root = carousel.root();
    let enter = carousel.clone();
    listeners.push(EventBinding::listen(root.as_raw(), "mouseenter", move |_| {
        enter.pointer_enter()
    }));
    let leave = carousel.clone();
    listeners.push(EventBinding::listen(root.as_raw(), "mouseleave", move |_| {
        leave.pointer_leave()
    }));

    listeners
}

fn mount_accordion(section: &WebElement) {
    let Some(accordion) = Accordion::mount(section) else {
        return;
    };
    let shared = Rc::new(RefCell::new(accordion));
    let mut listeners = Vec::new();

    let count = shared.borrow().len();
    for index in 0..count {
        let Some(trigger) = shared.borrow().trigger(index).cloned() else {
            continue;
        };
        let click = Rc::clone(&shared);
        listeners.push(EventBinding::listen(trigger.as_raw(), "click", move |event| {
            event.prevent_default();
            click.borrow_mut().toggle(index);
        }));
        let key = Rc::clone(&shared);
        listeners.push(EventBinding::listen(
            trigger.as_raw(),
            "keydown",
            move |event| {
                let Some(keyboard) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                if is_activation_key(&keyboard.key()) {
                    // Space would otherwise scroll the page.
                    event.prevent_default();
                    key.borrow_mut().toggle(index);
                }
            },
        ));
    }

    register(
        section,
        Widget::Accordion {
            _controller: shared,
            _listeners: listeners,
        },
    );
}

/// Keys that activate a control from the keyboard.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_space_activate() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
        assert!(!is_activation_key("Escape"));
        assert!(!is_activation_key("Spacebar"));
    }
}
