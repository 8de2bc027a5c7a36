//! The screen: element tree, focus, key routing and rendering.
//!
//! [`Screen`] is the context handed to every key handler. It owns the tree
//! and the previous frame; bytes produced by [`Screen::render`] are queued
//! until the runtime (or a test) takes them with [`Screen::take_output`].
//!
//! # Routing
//!
//! For each key event:
//! 1. the focused element's first binding matching the key name runs
//! 2. every matching screen-level binding runs, in registration order
//!
//! Both stages run even when they bind the same name. Events dispatched
//! from inside a handler are queued and handled, in order, once the
//! current event is done. Timers fired by [`Screen::fire_timers`] go
//! through the same queue, so a timer never interrupts a key handler.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::config::ScreenOptions;
use crate::element::{Element, ElementId, ElementOptions, Tree};
use crate::error::{Error, Result};
use crate::input::KeyEvent;
use crate::keys::{Bindings, KeyHandler, KeyNames};
use crate::layout::{self, Layout, Viewport};
use crate::renderer::{ansi, compose, encode_into, DiffRenderer, FrameBuffer, OutputBuffer};
use crate::timers::{TimerId, Timers};
use crate::types::Rect;

/// Focus history depth.
const MAX_HISTORY: usize = 10;

/// What one [`Screen::render`] emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Changed runs written.
    pub ops: usize,
    /// Cells written across all runs.
    pub cells: usize,
    /// Every cell was written (no previous frame to diff against).
    pub full: bool,
}

/// Something routed through the dispatch queue.
#[derive(Debug)]
enum Event {
    Key(KeyEvent),
    Timer(TimerId, Instant),
}

pub struct Screen {
    tree: Tree,
    root: ElementId,
    focus: Option<ElementId>,
    history: Vec<ElementId>,
    globals: Bindings,
    timers: Timers,
    dispatching: bool,
    queue: VecDeque<Event>,
    renderer: DiffRenderer,
    viewport: Viewport,
    layout: Layout,
    output: OutputBuffer,
    exit_code: Option<i32>,
    options: ScreenOptions,
}

impl Screen {
    /// Create a screen of `size` cells with an empty root element.
    pub fn new(options: ScreenOptions, size: impl Into<Viewport>) -> Self {
        let mut tree = Tree::new();
        let root = tree.insert(Element::new(ElementOptions {
            focusable: false,
            ..Default::default()
        }));

        Self {
            tree,
            root,
            focus: None,
            history: Vec::new(),
            globals: Bindings::new(),
            timers: Timers::new(),
            dispatching: false,
            queue: VecDeque::new(),
            renderer: DiffRenderer::new(),
            viewport: size.into(),
            layout: Layout::default(),
            output: OutputBuffer::new(),
            exit_code: None,
            options,
        }
    }

    pub fn options(&self) -> &ScreenOptions {
        &self.options
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Append an element under the root.
    pub fn append(&mut self, element: impl Into<Element>) -> Result<ElementId> {
        self.append_child(self.root, element)
    }

    /// Append an element as the last child of `parent`.
    pub fn append_child(&mut self, parent: ElementId, element: impl Into<Element>) -> Result<ElementId> {
        if !self.tree.contains(parent) {
            return Err(Error::UnknownElement(parent));
        }
        let id = self.tree.insert(element.into());
        if let Err(err) = self.tree.attach(parent, id) {
            self.tree.remove(id);
            return Err(err);
        }
        trace!(%id, %parent, "appended");
        Ok(id)
    }

    /// Destroy `id` and its subtree.
    ///
    /// If focus was inside the removed subtree it moves back through the
    /// focus history, or is cleared. The root cannot be removed.
    pub fn remove(&mut self, id: ElementId) -> Result<()> {
        if !self.tree.contains(id) {
            return Err(Error::UnknownElement(id));
        }
        if id == self.root {
            return Ok(());
        }

        let removed = self.tree.remove(id);
        self.history.retain(|h| !removed.contains(h));

        if self.focus.is_some_and(|f| removed.contains(&f)) {
            self.focus = None;
            self.restore_focus();
        }
        debug!(%id, count = removed.len(), "removed");
        Ok(())
    }

    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.tree.get(id).ok_or(Error::UnknownElement(id))
    }

    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.tree.get_mut(id).ok_or(Error::UnknownElement(id))
    }

    // =========================================================================
    // Key bindings
    // =========================================================================

    /// Bind `names` at screen level. Runs regardless of focus.
    pub fn key<F>(&mut self, names: impl Into<KeyNames>, handler: F)
    where
        F: FnMut(&mut Screen, &KeyEvent) -> Result<()> + 'static,
    {
        let handler: KeyHandler = Box::new(handler);
        self.globals.add(names.into(), handler);
    }

    pub fn unkey(&mut self, names: impl Into<KeyNames>) {
        self.globals.remove_names(&names.into());
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn focused(&self) -> Option<ElementId> {
        self.focus
    }

    fn can_focus(&self, id: ElementId) -> bool {
        self.tree.get(id).is_some_and(|e| e.focusable) && self.tree.is_visible_from(self.root, id)
    }

    fn push_history(&mut self, id: ElementId) {
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(id);
    }

    /// Focus `id`. Returns false (and changes nothing) if the element is
    /// missing, not focusable, hidden or not attached to the root.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.can_focus(id) {
            trace!(%id, "focus refused");
            return false;
        }
        if let Some(previous) = self.focus {
            if previous != id {
                self.push_history(previous);
            }
        }
        self.focus = Some(id);
        trace!(%id, "focused");
        true
    }

    pub fn blur(&mut self) {
        if let Some(previous) = self.focus.take() {
            self.push_history(previous);
        }
    }

    fn focusable_order(&self) -> Vec<ElementId> {
        self.tree
            .pre_order(self.root)
            .into_iter()
            .filter(|&id| self.can_focus(id))
            .collect()
    }

    /// Move focus to the next focusable element in tree order, wrapping.
    pub fn focus_next(&mut self) -> bool {
        let order = self.focusable_order();
        let next = match self.focus.and_then(|f| order.iter().position(|&id| id == f)) {
            Some(pos) => order.get((pos + 1) % order.len()),
            None => order.first(),
        };
        match next.copied() {
            Some(id) => self.focus(id),
            None => false,
        }
    }

    /// Move focus to the previous focusable element in tree order, wrapping.
    pub fn focus_previous(&mut self) -> bool {
        let order = self.focusable_order();
        let prev = match self.focus.and_then(|f| order.iter().position(|&id| id == f)) {
            Some(0) => order.last(),
            Some(pos) => order.get(pos - 1),
            None => order.last(),
        };
        match prev.copied() {
            Some(id) => self.focus(id),
            None => false,
        }
    }

    /// Push the current focus onto the history.
    pub fn save_focus(&mut self) {
        if let Some(id) = self.focus {
            self.push_history(id);
        }
    }

    /// Pop the history until an element that can still take focus is found.
    pub fn restore_focus(&mut self) -> bool {
        while let Some(id) = self.history.pop() {
            if self.can_focus(id) {
                self.focus = Some(id);
                return true;
            }
        }
        false
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Route a key event to the focused element and the screen bindings.
    ///
    /// The first handler error stops routing; events still queued behind
    /// it are dropped.
    pub fn dispatch(&mut self, event: KeyEvent) -> Result<()> {
        self.deliver(Event::Key(event))
    }

    fn deliver(&mut self, event: Event) -> Result<()> {
        if self.dispatching {
            trace!(?event, "queued");
            self.queue.push_back(event);
            return Ok(());
        }

        self.dispatching = true;
        let mut result = self.handle(event);
        while result.is_ok() {
            let Some(next) = self.queue.pop_front() else {
                break;
            };
            result = self.handle(next);
        }
        self.queue.clear();
        self.dispatching = false;
        result
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.route(&key),
            Event::Timer(id, now) => {
                let Some(mut handler) = self.timers.take(id, now) else {
                    return Ok(());
                };
                trace!(?id, "timer");
                let result = handler(self);
                self.timers.restore(id, handler);
                result
            }
        }
    }

    fn route(&mut self, event: &KeyEvent) -> Result<()> {
        let name = event.name();
        trace!(key = %name, "dispatch");

        if let Some(id) = self.focus {
            let matched = self.tree.get(id).and_then(|e| e.bindings.first_match(&name));
            if let Some(binding) = matched {
                let handler = self.tree.get_mut(id).and_then(|e| e.bindings.take(binding));
                if let Some(mut handler) = handler {
                    let result = handler(self, event);
                    if let Some(element) = self.tree.get_mut(id) {
                        element.bindings.restore(binding, handler);
                    }
                    result?;
                }
            }
        }

        for binding in self.globals.matches(&name) {
            let Some(mut handler) = self.globals.take(binding) else {
                continue;
            };
            let result = handler(self, event);
            self.globals.restore(binding, handler);
            result?;
        }
        Ok(())
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Run `handler` every `interval`, starting one interval from now.
    pub fn every<F>(&mut self, interval: Duration, handler: F) -> TimerId
    where
        F: FnMut(&mut Screen) -> Result<()> + 'static,
    {
        self.timers.add(Instant::now() + interval, Some(interval), Box::new(handler))
    }

    /// Run `handler` once, `delay` from now.
    pub fn after<F>(&mut self, delay: Duration, handler: F) -> TimerId
    where
        F: FnMut(&mut Screen) -> Result<()> + 'static,
    {
        self.timers.add(Instant::now() + delay, None, Box::new(handler))
    }

    /// Stop a timer. Returns false if it is unknown or already fired.
    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// When the next timer is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Fire every timer due at `now`, earliest first. Returns how many
    /// were due.
    ///
    /// Repeating timers are re-armed relative to `now`, so a stalled loop
    /// fires each of them once rather than catching up.
    pub fn fire_timers(&mut self, now: Instant) -> Result<usize> {
        let due = self.timers.due(now);
        for &id in &due {
            self.deliver(Event::Timer(id, now))?;
        }
        Ok(due.len())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Lay out, composite and diff the tree, queueing the bytes for the
    /// changed cells.
    ///
    /// On a [`LayoutError`](crate::error::LayoutError) nothing is queued
    /// and the previous frame is kept.
    pub fn render(&mut self) -> Result<RenderStats> {
        let layout = layout::resolve(&self.tree, self.root, self.viewport)?;
        let frame = compose(&self.tree, self.root, &layout);

        if !self.options.smart_csr {
            self.renderer.invalidate();
        }
        let full = !self.renderer.has_previous();
        let ops = self.renderer.diff(&frame);
        encode_into(&mut self.output, &ops);
        self.layout = layout;

        let stats = RenderStats {
            ops: ops.len(),
            cells: ops.iter().map(|op| op.cells.len()).sum(),
            full,
        };
        debug!(ops = stats.ops, cells = stats.cells, full, "render");
        Ok(stats)
    }

    /// Adopt a new terminal size. The next render redraws every cell.
    ///
    /// Returns false when the size is unchanged.
    pub fn resize(&mut self, viewport: impl Into<Viewport>) -> bool {
        let viewport = viewport.into();
        if viewport == self.viewport {
            return false;
        }
        info!(cols = viewport.cols, rows = viewport.rows, "resize");
        self.viewport = viewport;
        self.renderer.invalidate();
        true
    }

    /// Forget the previous frame so the next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.renderer.invalidate();
    }

    /// The last rendered frame.
    pub fn frame(&self) -> Option<&FrameBuffer> {
        self.renderer.previous()
    }

    /// Layout of the last successful render.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Resolved rect of `id` as of the last successful render.
    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.layout.rect(id)
    }

    /// Bytes queued for the terminal since the last call.
    pub fn take_output(&mut self) -> Vec<u8> {
        self.output.take()
    }

    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn title(&self) -> Option<&str> {
        self.options.title.as_deref()
    }

    /// Change the window title. The OSC sequence is queued with the output.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        ansi::set_title(&mut self.output, &title)?;
        self.options.title = Some(title);
        Ok(())
    }

    /// Ask the run loop to stop with `code`.
    pub fn exit(&mut self, code: i32) {
        info!(code, "exit requested");
        self.exit_code = Some(code);
    }

    pub fn exit_requested(&self) -> Option<i32> {
        self.exit_code
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("root", &self.root)
            .field("elements", &self.tree.len())
            .field("focus", &self.focus)
            .field("viewport", &self.viewport)
            .field("globals", &self.globals)
            .field("timers", &self.timers)
            .field("exit_code", &self.exit_code)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::{KeyCode, Modifier};
    use crate::layout::{Position, Size};

    type Log = Rc<RefCell<Vec<String>>>;

    fn screen() -> Screen {
        Screen::new(ScreenOptions::default(), (20, 6))
    }

    fn boxed(width: u16, height: u16) -> Element {
        Element::new(ElementOptions {
            width: Some(Size::Cells(width)),
            height: Some(Size::Cells(height)),
            ..Default::default()
        })
    }

    fn record(log: Log, label: &'static str) -> impl FnMut(&mut Screen, &KeyEvent) -> Result<()> + 'static {
        move |_, key| {
            log.borrow_mut().push(format!("{label}:{key}"));
            Ok(())
        }
    }

    #[test]
    fn test_focus_rules() {
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        let hidden = screen
            .append(Element::new(ElementOptions {
                hidden: true,
                ..Default::default()
            }))
            .unwrap();

        assert!(!screen.focus(screen.root()));
        assert!(!screen.focus(hidden));
        assert!(screen.focus(a));
        assert_eq!(screen.focused(), Some(a));

        screen.element_mut(a).unwrap().focusable = false;
        let b = screen.append(boxed(4, 2)).unwrap();
        screen.element_mut(b).unwrap().focusable = false;
        assert!(!screen.focus(b));
        assert_eq!(screen.focused(), Some(a));
    }

    #[test]
    fn test_focus_next_wraps() {
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        let b = screen.append(boxed(4, 2)).unwrap();
        let c = screen.append_child(b, boxed(2, 1)).unwrap();

        assert!(screen.focus_next());
        assert_eq!(screen.focused(), Some(a));
        screen.focus_next();
        assert_eq!(screen.focused(), Some(b));
        screen.focus_next();
        assert_eq!(screen.focused(), Some(c));
        screen.focus_next();
        assert_eq!(screen.focused(), Some(a));
        screen.focus_previous();
        assert_eq!(screen.focused(), Some(c));
    }

    #[test]
    fn test_remove_focused_restores_history() {
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        let b = screen.append(boxed(4, 2)).unwrap();
        let c = screen.append_child(b, boxed(2, 1)).unwrap();

        screen.focus(a);
        screen.focus(c);
        screen.remove(b).unwrap();

        assert_eq!(screen.focused(), Some(a));
        assert!(screen.element(c).is_err());
        assert!(matches!(screen.remove(b), Err(Error::UnknownElement(_))));

        screen.remove(a).unwrap();
        assert_eq!(screen.focused(), None);
    }

    #[test]
    fn test_history_bounded() {
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        for _ in 0..25 {
            screen.save_focus();
            screen.focus(a);
        }
        assert!(screen.history.len() <= MAX_HISTORY);
    }

    #[test]
    fn test_element_binding_before_globals() {
        let log: Log = Rc::default();
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        screen.element_mut(a).unwrap().key("enter", record(log.clone(), "box"));
        screen.element_mut(a).unwrap().key("enter", record(log.clone(), "box-second"));
        screen.key(["enter", "return"], record(log.clone(), "global"));
        screen.key("q", record(log.clone(), "quit"));
        screen.focus(a);

        screen.dispatch(KeyEvent::new(KeyCode::Enter, Modifier::NONE)).unwrap();
        screen.dispatch(KeyEvent::char('q')).unwrap();

        assert_eq!(*log.borrow(), vec!["box:enter", "global:enter", "quit:q"]);
    }

    #[test]
    fn test_unfocused_element_not_invoked() {
        let log: Log = Rc::default();
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        screen.element_mut(a).unwrap().key("x", record(log.clone(), "box"));

        screen.dispatch(KeyEvent::char('x')).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_reentrant_dispatch_is_queued() {
        let log: Log = Rc::default();
        let mut screen = screen();

        let inner = log.clone();
        screen.key("a", move |screen, _| {
            inner.borrow_mut().push("a-start".into());
            screen.dispatch(KeyEvent::char('b'))?;
            inner.borrow_mut().push("a-end".into());
            Ok(())
        });
        screen.key("b", record(log.clone(), "b"));

        screen.dispatch(KeyEvent::char('a')).unwrap();
        assert_eq!(*log.borrow(), vec!["a-start", "a-end", "b:b"]);
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let log: Log = Rc::default();
        let mut screen = screen();

        let inner = log.clone();
        let slow = screen.every(Duration::from_secs(1), move |_| {
            inner.borrow_mut().push("second".into());
            Ok(())
        });
        let inner = log.clone();
        screen.after(Duration::from_millis(500), move |_| {
            inner.borrow_mut().push("frame".into());
            Ok(())
        });

        let start = Instant::now();
        assert_eq!(screen.fire_timers(start).unwrap(), 0);
        assert!(screen.next_deadline().unwrap() <= start + Duration::from_millis(500));

        let later = start + Duration::from_secs(2);
        assert_eq!(screen.fire_timers(later).unwrap(), 2);
        assert_eq!(*log.borrow(), vec!["frame", "second"]);

        // One-shot is gone, the repeating timer re-armed from `later`
        assert_eq!(screen.fire_timers(later).unwrap(), 0);
        assert_eq!(screen.next_deadline(), Some(later + Duration::from_secs(1)));
        assert!(screen.cancel_timer(slow));
        assert_eq!(screen.next_deadline(), None);
    }

    #[test]
    fn test_timer_keys_queue_behind_it() {
        let log: Log = Rc::default();
        let mut screen = screen();
        screen.key("b", record(log.clone(), "b"));

        let inner = log.clone();
        screen.after(Duration::ZERO, move |screen| {
            inner.borrow_mut().push("tick-start".into());
            screen.dispatch(KeyEvent::char('b'))?;
            inner.borrow_mut().push("tick-end".into());
            Ok(())
        });

        screen.fire_timers(Instant::now() + Duration::from_millis(1)).unwrap();
        assert_eq!(*log.borrow(), vec!["tick-start", "tick-end", "b:b"]);
    }

    #[test]
    fn test_timer_can_cancel_itself() {
        let count = Rc::new(RefCell::new(0));
        let mut screen = screen();
        let id = Rc::new(RefCell::new(None));

        let (inner, own) = (count.clone(), id.clone());
        let timer = screen.every(Duration::ZERO, move |screen| {
            *inner.borrow_mut() += 1;
            if let Some(timer) = *own.borrow() {
                screen.cancel_timer(timer);
            }
            Ok(())
        });
        *id.borrow_mut() = Some(timer);

        let now = Instant::now() + Duration::from_millis(1);
        screen.fire_timers(now).unwrap();
        screen.fire_timers(now).unwrap();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(screen.next_deadline(), None);
    }

    #[test]
    fn test_half_covered_wide_glyph_is_blanked() {
        let mut screen = Screen::new(ScreenOptions::default(), (4, 1));
        screen.append(Element::new(ElementOptions {
            content: "日".into(),
            ..Default::default()
        }))
        .unwrap();
        for (col, text) in [(0, "a"), (2, "z")] {
            screen.append(Element::new(ElementOptions {
                left: Some(Position::Cells(col)),
                width: Some(Size::Cells(1)),
                content: text.into(),
                ..Default::default()
            }))
            .unwrap();
        }

        screen.render().unwrap();
        let frame = screen.frame().unwrap();
        assert_eq!(frame.row_text(0), "a z ");
        assert!(frame.row(0).iter().all(|cell| !cell.is_continuation()));

        // Contiguous cells, no cursor jump the terminal would not make
        let output = String::from_utf8(screen.take_output()).unwrap();
        assert!(output.contains("a z "), "{output:?}");
    }

    #[test]
    fn test_hide_show_toggle() {
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        screen.focus(a);

        screen.element_mut(a).unwrap().hide();
        screen.render().unwrap();
        assert_eq!(screen.rect(a), None);
        screen.blur();
        assert!(!screen.focus(a));

        screen.element_mut(a).unwrap().toggle();
        screen.render().unwrap();
        assert_eq!(screen.rect(a), Some(Rect::new(0, 0, 4, 2)));
        assert!(screen.focus(a));

        screen.element_mut(a).unwrap().toggle();
        assert!(screen.element(a).unwrap().hidden);
        screen.element_mut(a).unwrap().show();
        assert!(!screen.element(a).unwrap().hidden);
    }

    #[test]
    fn test_handler_can_unkey_itself() {
        let log: Log = Rc::default();
        let mut screen = screen();
        let inner = log.clone();
        screen.key("x", move |screen, _| {
            inner.borrow_mut().push("x".into());
            screen.unkey("x");
            Ok(())
        });

        screen.dispatch(KeyEvent::char('x')).unwrap();
        screen.dispatch(KeyEvent::char('x')).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_render_twice_writes_nothing() {
        let mut screen = screen();
        let a = screen.append(boxed(6, 3)).unwrap();
        screen.element_mut(a).unwrap().set_content("hi");

        let first = screen.render().unwrap();
        assert!(first.full);
        assert_eq!(first.cells, 20 * 6);
        assert!(screen.has_output());
        screen.take_output();

        let second = screen.render().unwrap();
        assert_eq!(second.ops, 0);
        assert!(!screen.has_output());
    }

    #[test]
    fn test_full_redraw_without_smart_csr() {
        let options = ScreenOptions {
            smart_csr: false,
            ..Default::default()
        };
        let mut screen = Screen::new(options, (10, 2));
        screen.render().unwrap();
        let again = screen.render().unwrap();
        assert!(again.full);
        assert_eq!(again.cells, 20);
    }

    #[test]
    fn test_layout_error_keeps_previous_frame() {
        let mut screen = screen();
        let a = screen.append(boxed(4, 2)).unwrap();
        screen.render().unwrap();
        screen.take_output();

        screen.element_mut(a).unwrap().width = Some(Size::Cells(0));
        assert!(matches!(screen.render(), Err(Error::Layout(_))));
        assert!(!screen.has_output());
        assert_eq!(screen.rect(a), Some(Rect::new(0, 0, 4, 2)));
        assert!(screen.frame().is_some());
    }

    #[test]
    fn test_resize_invalidates() {
        let mut screen = screen();
        screen.append(Element::new(ElementOptions {
            left: Some(Position::Center),
            width: Some(Size::Percent { percent: 50.0, offset: 0 }),
            ..Default::default()
        }))
        .unwrap();
        screen.render().unwrap();

        assert!(!screen.resize((20, 6)));
        assert!(screen.resize((30, 8)));
        let stats = screen.render().unwrap();
        assert!(stats.full);
        assert_eq!(stats.cells, 30 * 8);
    }

    #[test]
    fn test_set_title_queues_osc() {
        let mut screen = screen();
        screen.set_title("MentaliTTY").unwrap();
        assert_eq!(screen.title(), Some("MentaliTTY"));
        assert_eq!(screen.take_output(), b"\x1b]0;MentaliTTY\x07".to_vec());
    }

    #[test]
    fn test_exit_code() {
        let mut screen = screen();
        assert_eq!(screen.exit_requested(), None);
        screen.key("q", |screen, _| {
            screen.exit(0);
            Ok(())
        });
        screen.dispatch(KeyEvent::char('q')).unwrap();
        assert_eq!(screen.exit_requested(), Some(0));
    }
}
