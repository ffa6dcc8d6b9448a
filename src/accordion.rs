//! Disclosure (accordion) controller for the specifications section.
//!
//! Each trigger declares its panel through `aria-controls`. The expanded
//! flag lives on the pair itself; the `hidden` and `aria-expanded`
//! attributes are a projection kept in sync on every transition, so tests
//! and callers never have to read presentation state back out of the tree.

use log::warn;

use crate::config::{ACCORDION_CLASS, ACCORDION_TRIGGER_CLASS, ATTR_CLOSE_OTHERS};
use crate::dom::Element;

struct DisclosurePair<E> {
    trigger: E,
    panel: Option<E>,
    expanded: bool,
}

/// Accordion over the (trigger, panel) pairs of one container.
pub struct Accordion<E: Element> {
    pairs: Vec<DisclosurePair<E>>,
    close_others: bool,
}

impl<E: Element> Accordion<E> {
    /// Discover the accordion under `section`. An absent root or an empty
    /// trigger set yields `None` with a diagnostic. Initial expanded state
    /// is whatever the markup declares; nothing is mutated at mount time.
    pub fn mount(section: &E) -> Option<Self> {
        let section_id = section.id().unwrap_or_default();
        let Some(root) = section.find_by_class(ACCORDION_CLASS) else {
            warn!("no accordion found in section {section_id:?}");
            return None;
        };

        let close_others = root.flag(ATTR_CLOSE_OTHERS);
        let triggers = root.find_all_by_class(ACCORDION_TRIGGER_CLASS);
        if triggers.is_empty() {
            warn!("accordion in section {section_id:?} has no triggers");
            return None;
        }

        let pairs = triggers
            .into_iter()
            .map(|trigger| {
                let panel_id = trigger.attr("aria-controls");
                let panel = panel_id
                    .as_deref()
                    .and_then(|id| root.find_by_id(id));
                if panel.is_none() {
                    warn!(
                        "accordion trigger controls missing panel {:?}",
                        panel_id.unwrap_or_default()
                    );
                }
                let expanded = trigger.flag("aria-expanded");
                DisclosurePair {
                    trigger,
                    panel,
                    expanded,
                }
            })
            .collect();

        Some(Self {
            pairs,
            close_others,
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn close_others(&self) -> bool {
        self.close_others
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.pairs.get(index).is_some_and(|pair| pair.expanded)
    }

    pub fn trigger(&self, index: usize) -> Option<&E> {
        self.pairs.get(index).map(|pair| &pair.trigger)
    }

    /// Flip one pair. Expanding under exclusivity first collapses every
    /// other pair unconditionally, so at most one pair stays expanded.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.pairs.len() {
            return;
        }
        if self.pairs[index].expanded {
            self.collapse(index);
        } else {
            if self.close_others {
                for other in 0..self.pairs.len() {
                    if other != index {
                        self.collapse(other);
                    }
                }
            }
            self.expand(index);
        }
    }

    fn collapse(&mut self, index: usize) {
        let pair = &mut self.pairs[index];
        pair.expanded = false;
        if let Some(panel) = &pair.panel {
            panel.set_attr("hidden", "");
        }
        pair.trigger.set_attr("aria-expanded", "false");
    }

    fn expand(&mut self, index: usize) {
        let pair = &mut self.pairs[index];
        pair.expanded = true;
        if let Some(panel) = &pair.panel {
            panel.remove_attr("hidden");
        }
        pair.trigger.set_attr("aria-expanded", "true");
    }
}
