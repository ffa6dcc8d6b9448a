//! Headless backend: a minimal element tree and a manual clock.
//!
//! Unit tests build widget markup with the [`FakeElement`] builders and step
//! timers deterministically with [`FakeDom::advance`]; no rendering surface
//! is involved. Timer entries live behind shared flags so a handle dropped
//! from inside its own callback only marks the entry cancelled — the actual
//! cleanup happens after delivery, outside any borrow.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{Dom, Element};

/// Element handle in the fake tree. Clones share the underlying node.
#[derive(Clone)]
pub struct FakeElement(Rc<RefCell<NodeData>>);

struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    children: Vec<FakeElement>,
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("FakeElement")
            .field("tag", &node.tag)
            .field("attrs", &node.attrs)
            .finish()
    }
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.set_class(class, true);
        self
    }

    pub fn with_child(self, child: FakeElement) -> Self {
        self.append(child);
        self
    }

    pub fn append(&self, child: FakeElement) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// Inline style value, for test inspection.
    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    fn class_tokens(&self) -> Vec<String> {
        self.attr("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Depth-first descendants in document order; the receiver is excluded,
    /// matching `querySelectorAll` scoping.
    fn descendants(&self) -> Vec<FakeElement> {
        let mut out = Vec::new();
        for child in self.0.borrow().children.iter() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }

    fn find_all(&self, matches: impl Fn(&FakeElement) -> bool) -> Vec<FakeElement> {
        self.descendants()
            .into_iter()
            .filter(|element| matches(element))
            .collect()
    }
}

impl Element for FakeElement {
    fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&self, name: &str) {
        self.0.borrow_mut().attrs.remove(name);
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_tokens().iter().any(|token| token == class)
    }

    fn set_class(&self, class: &str, on: bool) {
        let mut tokens = self.class_tokens();
        tokens.retain(|token| token != class);
        if on {
            tokens.push(class.to_string());
        }
        if tokens.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", &tokens.join(" "));
        }
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn find_by_class(&self, class: &str) -> Option<Self> {
        self.find_all_by_class(class).into_iter().next()
    }

    fn find_all_by_class(&self, class: &str) -> Vec<Self> {
        self.find_all(|element| element.has_class(class))
    }

    fn find_by_attr(&self, name: &str, value: &str) -> Option<Self> {
        self.find_all(|element| element.attr(name).as_deref() == Some(value))
            .into_iter()
            .next()
    }

    fn find_by_id(&self, id: &str) -> Option<Self> {
        self.find_by_attr("id", id)
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Manual clock

enum TimerCallback {
    Repeating(Box<dyn FnMut()>),
    Once(Option<Box<dyn FnOnce()>>),
}

struct TimerEntry {
    due: Cell<u64>,
    period: Option<u64>,
    cancelled: Cell<bool>,
    callback: RefCell<TimerCallback>,
}

/// Cancels its timer entry when dropped.
pub struct FakeTimer(Rc<TimerEntry>);

impl Drop for FakeTimer {
    fn drop(&mut self) {
        self.0.cancelled.set(true);
    }
}

/// The headless backend; clones share one clock and timer registry.
#[derive(Clone, Default)]
pub struct FakeDom {
    clock: Rc<ClockData>,
}

#[derive(Default)]
struct ClockData {
    now: Cell<u64>,
    timers: RefCell<Vec<Rc<TimerEntry>>>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.clock.now.get()
    }

    /// Live (not yet cancelled) timer count, for lifecycle assertions.
    pub fn active_timers(&self) -> usize {
        self.clock
            .timers
            .borrow()
            .iter()
            .filter(|timer| !timer.cancelled.get())
            .count()
    }

    /// Move the clock forward, delivering every due callback in due order.
    /// Delivery happens outside the registry borrow, so callbacks may freely
    /// schedule or cancel timers.
    pub fn advance(&self, ms: u64) {
        let target = self.clock.now.get() + ms;
        loop {
            let next = self
                .clock
                .timers
                .borrow()
                .iter()
                .filter(|timer| !timer.cancelled.get() && timer.due.get() <= target)
                .min_by_key(|timer| timer.due.get())
                .cloned();
            let Some(entry) = next else { break };

            self.clock.now.set(entry.due.get());
            match entry.period {
                Some(period) => entry.due.set(entry.due.get() + period),
                None => entry.cancelled.set(true),
            }

            let mut callback = entry.callback.borrow_mut();
            match &mut *callback {
                TimerCallback::Repeating(tick) => tick(),
                TimerCallback::Once(slot) => {
                    let fire = slot.take();
                    drop(callback);
                    if let Some(fire) = fire {
                        fire();
                    }
                }
            }
        }
        self.clock.now.set(target);
        self.clock
            .timers
            .borrow_mut()
            .retain(|timer| !timer.cancelled.get());
    }

    fn schedule(&self, delay: u64, period: Option<u64>, callback: TimerCallback) -> FakeTimer {
        let entry = Rc::new(TimerEntry {
            due: Cell::new(self.clock.now.get() + delay),
            period,
            cancelled: Cell::new(false),
            callback: RefCell::new(callback),
        });
        self.clock.timers.borrow_mut().push(Rc::clone(&entry));
        FakeTimer(entry)
    }
}

impl Dom for FakeDom {
    type Element = FakeElement;
    type Interval = FakeTimer;
    type Timeout = FakeTimer;

    fn set_interval(&self, ms: u32, callback: Box<dyn FnMut()>) -> FakeTimer {
        // A zero period would never progress the clock loop.
        let period = u64::from(ms.max(1));
        self.schedule(period, Some(period), TimerCallback::Repeating(callback))
    }

    fn set_timeout(&self, ms: u32, callback: Box<dyn FnOnce()>) -> FakeTimer {
        self.schedule(u64::from(ms), None, TimerCallback::Once(Some(callback)))
    }
}
