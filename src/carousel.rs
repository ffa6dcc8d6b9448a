//! Index-based slide navigation with autoplay, swipe gestures, and hover
//! pausing.
//!
//! One controller serves both product-page slider flavors; a
//! [`CarouselMarkup`] descriptor carries the selectors, the default autoplay
//! interval, and the visual mechanism that distinguish the athlete slider
//! from the reviews slider. Everything else — clamping/wrapping navigation,
//! the single autoplay timer, the 40 px swipe threshold, the 300 ms resume
//! delay — is shared.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::config::{
    ATHLETE_INTERVAL_MS, ATTR_AUTOPLAY, ATTR_INTERVAL, ATTR_LOOP, ATTR_SLIDER,
    AUTOPLAY_RESUME_DELAY_MS, REVIEWS_INTERVAL_MS, SWIPE_THRESHOLD_PX,
};
use crate::dom::{Dom, Element};

/// How the active slide is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEffect {
    /// Toggle an active class and `aria-hidden` on each slide element.
    Stacked { active_class: &'static str },
    /// Shift a single track element with a `translateX` offset.
    TrackOffset,
}

/// Markup contract for one carousel flavor.
#[derive(Debug)]
pub struct CarouselMarkup {
    /// `data-slider` marker on the widget root.
    pub marker: &'static str,
    pub slide_class: &'static str,
    pub dot_class: &'static str,
    pub dot_active_class: &'static str,
    pub prev_class: &'static str,
    pub next_class: &'static str,
    pub track_class: &'static str,
    pub default_interval_ms: u32,
    pub effect: SlideEffect,
}

/// The benefits ("athlete") slider: discrete slides, class/ARIA toggling.
pub const ATHLETE_SLIDER: CarouselMarkup = CarouselMarkup {
    marker: "benefits",
    slide_class: "pdp__slider-slide",
    dot_class: "pdp__slider-dot",
    dot_active_class: "pdp__slider-dot--active",
    prev_class: "pdp__slider-arrow--prev",
    next_class: "pdp__slider-arrow--next",
    track_class: "pdp__slider-track",
    default_interval_ms: ATHLETE_INTERVAL_MS,
    effect: SlideEffect::Stacked {
        active_class: "pdp__slider-slide--active",
    },
};

/// The reviews slider: one track shifted by a percentage offset.
pub const REVIEWS_SLIDER: CarouselMarkup = CarouselMarkup {
    marker: "reviews",
    slide_class: "pdp__review-card",
    dot_class: "pdp__reviews-dot",
    dot_active_class: "pdp__reviews-dot--active",
    prev_class: "pdp__reviews-arrow--prev",
    next_class: "pdp__reviews-arrow--next",
    track_class: "pdp__reviews-track",
    default_interval_ms: REVIEWS_INTERVAL_MS,
    effect: SlideEffect::TrackOffset,
};

/// Per-instance navigation configuration, parsed once from the widget
/// root's data attributes at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselConfig {
    pub autoplay: bool,
    pub interval_ms: u32,
    pub looping: bool,
}

impl CarouselConfig {
    pub fn from_root<E: Element>(root: &E, default_interval_ms: u32) -> Self {
        Self {
            autoplay: root.flag(ATTR_AUTOPLAY),
            interval_ms: root.int_attr_or(ATTR_INTERVAL, default_interval_ms),
            looping: root.flag(ATTR_LOOP),
        }
    }
}

/// Slide navigation controller shared by both slider flavors.
///
/// A `Carousel` is a cheap clone of one shared instance; the event bindings
/// and the autoplay callback all act on the same state.
pub struct Carousel<D: Dom> {
    inner: Rc<RefCell<Inner<D>>>,
}

impl<D: Dom> Clone for Carousel<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<D: Dom> {
    dom: D,
    markup: &'static CarouselMarkup,
    root: D::Element,
    slides: Vec<D::Element>,
    dots: Vec<D::Element>,
    prev: Option<D::Element>,
    next: Option<D::Element>,
    track: Option<D::Element>,
    config: CarouselConfig,
    current: usize,
    start_x: i32,
    timer: Option<D::Interval>,
    resume: Option<D::Timeout>,
}

impl<D: Dom> Carousel<D> {
    /// Locate the widget inside `section` and bring it up: initial visual
    /// state, then autoplay when configured. Returns `None` (with a
    /// diagnostic) when the slider root, its slides, or a required track
    /// element are missing.
    pub fn mount(dom: D, section: &D::Element, markup: &'static CarouselMarkup) -> Option<Self> {
        let section_id = section.id().unwrap_or_default();
        let Some(root) = section.find_by_attr(ATTR_SLIDER, markup.marker) else {
            warn!(
                "no \"{}\" slider found in section {section_id:?}",
                markup.marker
            );
            return None;
        };

        let slides = root.find_all_by_class(markup.slide_class);
        if slides.is_empty() {
            warn!(
                "\"{}\" slider in section {section_id:?} has no slides",
                markup.marker
            );
            return None;
        }

        let track = root.find_by_class(markup.track_class);
        if track.is_none() && matches!(markup.effect, SlideEffect::TrackOffset) {
            warn!(
                "\"{}\" slider in section {section_id:?} has no track element",
                markup.marker
            );
            return None;
        }

        let config = CarouselConfig::from_root(&root, markup.default_interval_ms);
        let inner = Inner {
            dots: root.find_all_by_class(markup.dot_class),
            prev: root.find_by_class(markup.prev_class),
            next: root.find_by_class(markup.next_class),
            dom,
            markup,
            root,
            slides,
            track,
            config,
            current: 0,
            start_x: 0,
            timer: None,
            resume: None,
        };
        inner.apply_visual();

        let carousel = Self {
            inner: Rc::new(RefCell::new(inner)),
        };
        carousel.start_autoplay();
        Some(carousel)
    }

    pub fn current(&self) -> usize {
        self.inner.borrow().current
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> CarouselConfig {
        self.inner.borrow().config
    }

    /// Navigate to `target`, wrapping (loop mode) or clamping at the ends,
    /// then reset autoplay so the next automatic advance starts a full
    /// interval from now.
    pub fn go_to(&self, target: isize) {
        {
            let mut inner = self.inner.borrow_mut();
            let total = inner.slides.len() as isize;
            let mut index = target;
            if index < 0 {
                index = if inner.config.looping { total - 1 } else { 0 };
            }
            if index >= total {
                index = if inner.config.looping { 0 } else { total - 1 };
            }
            inner.current = index as usize;
            debug!(
                "\"{}\" slider -> slide {}/{}",
                inner.markup.marker,
                inner.current + 1,
                total
            );
            inner.apply_visual();
        }
        self.reset_autoplay();
    }

    pub fn next(&self) {
        let current = self.current() as isize;
        self.go_to(current + 1);
    }

    pub fn prev(&self) {
        let current = self.current() as isize;
        self.go_to(current - 1);
    }

    /// Begin periodic advancement when configured. Idempotent: a second call
    /// while a timer is live is a no-op.
    pub fn start_autoplay(&self) {
        let weak = Rc::downgrade(&self.inner);
        let mut inner = self.inner.borrow_mut();
        if !inner.config.autoplay || inner.timer.is_some() {
            return;
        }
        let tick: Box<dyn FnMut()> = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Carousel { inner }.next();
            }
        });
        let interval_ms = inner.config.interval_ms;
        inner.timer = Some(inner.dom.set_interval(interval_ms, tick));
    }

    /// Stop periodic advancement and cancel any pending resume.
    pub fn pause_autoplay(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.timer = None;
        inner.resume = None;
    }

    fn reset_autoplay(&self) {
        self.pause_autoplay();
        self.start_autoplay();
    }

    /// Re-enable autoplay once the fixed resume delay elapses.
    pub fn resume_autoplay_after_delay(&self) {
        let weak = Rc::downgrade(&self.inner);
        let restart: Box<dyn FnOnce()> = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                let carousel = Carousel { inner };
                carousel.inner.borrow_mut().resume = None;
                carousel.start_autoplay();
            }
        });
        let mut inner = self.inner.borrow_mut();
        inner.resume = Some(
            inner
                .dom
                .set_timeout(AUTOPLAY_RESUME_DELAY_MS, restart),
        );
    }

    /// Record the gesture origin and pause autoplay while the finger is
    /// down.
    pub fn touch_start(&self, x: i32) {
        self.inner.borrow_mut().start_x = x;
        self.pause_autoplay();
    }

    /// Complete a gesture: a horizontal displacement beyond the swipe
    /// threshold navigates, and autoplay resumes after the fixed delay
    /// regardless of the outcome.
    pub fn touch_end(&self, x: i32) {
        let delta = self.inner.borrow().start_x - x;
        if delta.abs() > SWIPE_THRESHOLD_PX {
            if delta > 0 {
                self.next();
            } else {
                self.prev();
            }
        }
        self.resume_autoplay_after_delay();
    }

    pub fn pointer_enter(&self) {
        self.pause_autoplay();
    }

    pub fn pointer_leave(&self) {
        self.resume_autoplay_after_delay();
    }

    /// Tear down the controller: no timer callback fires after this
    /// returns. The binding layer drops its listeners alongside.
    pub fn destroy(&self) {
        self.pause_autoplay();
    }

    // Accessors for the event-wiring layer.

    pub fn root(&self) -> D::Element {
        self.inner.borrow().root.clone()
    }

    pub fn track(&self) -> Option<D::Element> {
        self.inner.borrow().track.clone()
    }

    pub fn dots(&self) -> Vec<D::Element> {
        self.inner.borrow().dots.clone()
    }

    pub fn prev_control(&self) -> Option<D::Element> {
        self.inner.borrow().prev.clone()
    }

    pub fn next_control(&self) -> Option<D::Element> {
        self.inner.borrow().next.clone()
    }
}

impl<D: Dom> Inner<D> {
    /// Project `current` onto the markup: exactly one active slide and one
    /// active indicator at any time.
    fn apply_visual(&self) {
        match self.markup.effect {
            SlideEffect::Stacked { active_class } => {
                for (index, slide) in self.slides.iter().enumerate() {
                    let active = index == self.current;
                    slide.set_class(active_class, active);
                    slide.set_attr("aria-hidden", if active { "false" } else { "true" });
                }
            }
            SlideEffect::TrackOffset => {
                if let Some(track) = &self.track {
                    let offset = -(self.current as i64) * 100;
                    track.set_style("transform", &format!("translateX({offset}%)"));
                }
            }
        }
        for (index, dot) in self.dots.iter().enumerate() {
            let active = index == self.current;
            dot.set_class(self.markup.dot_active_class, active);
            dot.set_attr("aria-selected", if active { "true" } else { "false" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_dom::{FakeDom, FakeElement};

    fn athlete_section(slide_count: usize, attrs: &[(&str, &str)]) -> FakeElement {
        let track = FakeElement::new("div").with_class("pdp__slider-track");
        for _ in 0..slide_count {
            track.append(FakeElement::new("div").with_class("pdp__slider-slide"));
        }
        let slider = FakeElement::new("div")
            .with_attr(ATTR_SLIDER, "benefits")
            .with_child(track);
        for (name, value) in attrs {
            slider.set_attr(name, value);
        }
        for _ in 0..slide_count {
            slider.append(FakeElement::new("button").with_class("pdp__slider-dot"));
        }
        slider.append(FakeElement::new("button").with_class("pdp__slider-arrow--prev"));
        slider.append(FakeElement::new("button").with_class("pdp__slider-arrow--next"));

        FakeElement::new("section")
            .with_attr("id", "athlete-1")
            .with_child(slider)
    }

    fn reviews_section(slide_count: usize, attrs: &[(&str, &str)]) -> FakeElement {
        let track = FakeElement::new("div").with_class("pdp__reviews-track");
        for _ in 0..slide_count {
            track.append(FakeElement::new("div").with_class("pdp__review-card"));
        }
        let slider = FakeElement::new("div")
            .with_attr(ATTR_SLIDER, "reviews")
            .with_child(track);
        for (name, value) in attrs {
            slider.set_attr(name, value);
        }
        for _ in 0..slide_count {
            slider.append(FakeElement::new("button").with_class("pdp__reviews-dot"));
        }

        FakeElement::new("section").with_child(slider)
    }

    fn mount_athlete(
        slide_count: usize,
        attrs: &[(&str, &str)],
    ) -> (FakeDom, Carousel<FakeDom>) {
        let dom = FakeDom::new();
        let section = athlete_section(slide_count, attrs);
        let carousel = Carousel::mount(dom.clone(), &section, &ATHLETE_SLIDER)
            .expect("athlete slider mounts");
        (dom, carousel)
    }

    #[test]
    fn mount_without_slider_root_is_inert() {
        let dom = FakeDom::new();
        let section = FakeElement::new("section");
        assert!(Carousel::mount(dom, &section, &ATHLETE_SLIDER).is_none());
    }

    #[test]
    fn mount_without_slides_is_inert() {
        let dom = FakeDom::new();
        let section = athlete_section(0, &[]);
        assert!(Carousel::mount(dom, &section, &ATHLETE_SLIDER).is_none());
    }

    #[test]
    fn track_flavor_requires_track_element() {
        let dom = FakeDom::new();
        let slider = FakeElement::new("div")
            .with_attr(ATTR_SLIDER, "reviews")
            .with_child(FakeElement::new("div").with_class("pdp__review-card"));
        let section = FakeElement::new("section").with_child(slider);
        assert!(Carousel::mount(dom, &section, &REVIEWS_SLIDER).is_none());
    }

    #[test]
    fn config_defaults_when_attributes_absent() {
        let (_dom, carousel) = mount_athlete(3, &[]);
        let config = carousel.config();
        assert!(!config.autoplay);
        assert!(!config.looping);
        assert_eq!(config.interval_ms, ATHLETE_INTERVAL_MS);
    }

    #[test]
    fn invalid_interval_falls_back_to_flavor_default() {
        let (_dom, carousel) = mount_athlete(3, &[("data-interval", "soon")]);
        assert_eq!(carousel.config().interval_ms, ATHLETE_INTERVAL_MS);

        let dom = FakeDom::new();
        let section = reviews_section(3, &[]);
        let reviews = Carousel::mount(dom, &section, &REVIEWS_SLIDER).unwrap();
        assert_eq!(reviews.config().interval_ms, REVIEWS_INTERVAL_MS);
    }

    #[test]
    fn go_to_clamps_without_looping() {
        let (_dom, carousel) = mount_athlete(3, &[]);
        carousel.go_to(-1);
        assert_eq!(carousel.current(), 0);
        carousel.go_to(3);
        assert_eq!(carousel.current(), 2);
        carousel.go_to(7);
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn go_to_wraps_with_looping() {
        let (_dom, carousel) = mount_athlete(3, &[("data-loop", "true")]);
        carousel.go_to(-1);
        assert_eq!(carousel.current(), 2);
        carousel.go_to(3);
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn index_stays_in_bounds_for_any_target() {
        let (_dom, carousel) = mount_athlete(4, &[]);
        for target in -5..10 {
            carousel.go_to(target);
            assert!(carousel.current() < carousel.len());
        }
    }

    #[test]
    fn exactly_one_slide_and_dot_active() {
        let dom = FakeDom::new();
        let section = athlete_section(4, &[]);
        let carousel = Carousel::mount(dom, &section, &ATHLETE_SLIDER).unwrap();
        carousel.go_to(2);

        let slides = section.find_all_by_class("pdp__slider-slide");
        let active_slides: Vec<_> = slides
            .iter()
            .filter(|slide| slide.has_class("pdp__slider-slide--active"))
            .collect();
        assert_eq!(active_slides.len(), 1);
        assert_eq!(slides[2].attr("aria-hidden").as_deref(), Some("false"));
        assert_eq!(slides[0].attr("aria-hidden").as_deref(), Some("true"));

        let dots = section.find_all_by_class("pdp__slider-dot");
        let selected: Vec<_> = dots
            .iter()
            .filter(|dot| dot.attr("aria-selected").as_deref() == Some("true"))
            .collect();
        assert_eq!(selected.len(), 1);
        assert!(dots[2].has_class("pdp__slider-dot--active"));
    }

    #[test]
    fn track_flavor_translates_by_slide_offset() {
        let dom = FakeDom::new();
        let section = reviews_section(3, &[]);
        let carousel = Carousel::mount(dom, &section, &REVIEWS_SLIDER).unwrap();
        let track = section.find_by_class("pdp__reviews-track").unwrap();

        assert_eq!(track.style("transform").as_deref(), Some("translateX(0%)"));
        carousel.go_to(2);
        assert_eq!(
            track.style("transform").as_deref(),
            Some("translateX(-200%)")
        );
    }

    #[test]
    fn autoplay_advances_every_interval() {
        let (dom, carousel) =
            mount_athlete(3, &[("data-autoplay", "true"), ("data-interval", "1000")]);
        dom.advance(999);
        assert_eq!(carousel.current(), 0);
        dom.advance(1);
        assert_eq!(carousel.current(), 1);
        dom.advance(1000);
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn starting_autoplay_twice_keeps_a_single_timer() {
        let (dom, carousel) =
            mount_athlete(3, &[("data-autoplay", "true"), ("data-interval", "1000")]);
        carousel.start_autoplay();
        carousel.start_autoplay();
        assert_eq!(dom.active_timers(), 1);
        dom.advance(1000);
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn manual_navigation_restarts_the_interval() {
        let (dom, carousel) =
            mount_athlete(3, &[("data-autoplay", "true"), ("data-interval", "1000")]);
        dom.advance(600);
        carousel.go_to(0);
        dom.advance(600);
        assert_eq!(carousel.current(), 0);
        dom.advance(400);
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn swipe_beyond_threshold_navigates() {
        let (_dom, carousel) = mount_athlete(3, &[]);
        carousel.touch_start(100);
        carousel.touch_end(59); // 41 px leftward
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn swipe_below_threshold_is_ignored() {
        let (_dom, carousel) = mount_athlete(3, &[]);
        carousel.touch_start(100);
        carousel.touch_end(61); // 39 px
        assert_eq!(carousel.current(), 0);
        carousel.touch_start(100);
        carousel.touch_end(60); // exactly 40 px does not trigger
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn rightward_swipe_goes_back() {
        let (_dom, carousel) = mount_athlete(3, &[("data-loop", "true")]);
        carousel.touch_start(10);
        carousel.touch_end(60);
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn touch_pauses_and_resumes_after_delay() {
        let (dom, carousel) =
            mount_athlete(3, &[("data-autoplay", "true"), ("data-interval", "1000")]);
        carousel.touch_start(100);
        dom.advance(5000);
        assert_eq!(carousel.current(), 0);

        carousel.touch_end(100);
        dom.advance(AUTOPLAY_RESUME_DELAY_MS as u64 - 1);
        assert_eq!(dom.active_timers(), 1); // only the pending resume
        dom.advance(1);
        dom.advance(1000);
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn hover_enter_cancels_pending_resume() {
        let (dom, carousel) =
            mount_athlete(3, &[("data-autoplay", "true"), ("data-interval", "1000")]);
        carousel.pointer_leave();
        carousel.pointer_enter();
        dom.advance(10_000);
        assert_eq!(carousel.current(), 0);
        assert_eq!(dom.active_timers(), 0);
    }

    #[test]
    fn destroy_leaves_no_live_timers() {
        let (dom, carousel) =
            mount_athlete(3, &[("data-autoplay", "true"), ("data-interval", "1000")]);
        carousel.pointer_leave();
        carousel.destroy();
        dom.advance(10_000);
        assert_eq!(carousel.current(), 0);
        assert_eq!(dom.active_timers(), 0);
    }

    #[test]
    fn autoplay_disabled_never_schedules() {
        let (dom, carousel) = mount_athlete(3, &[("data-interval", "1000")]);
        assert_eq!(dom.active_timers(), 0);
        dom.advance(10_000);
        assert_eq!(carousel.current(), 0);
    }
}
