//! Pointer-driven horizontal scrolling of the table body.
//!
//! `Idle -> Armed` on pointer down over a non-interactive area, `Armed ->
//! Dragging` once the pointer travels past the threshold, and back to `Idle`
//! on release, cancel, lost capture or blur. A release that ends a drag
//! suppresses the click that would otherwise follow it.

pub const DEFAULT_DRAG_THRESHOLD: u16 = 5;

/// Terminals only report a single pointer.
pub const MOUSE_POINTER_ID: u32 = 0;

/// Elements that handle their own clicks and never start a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveElement {
    Button,
    Input,
    Select,
    TextArea,
    Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Surface,
    Interactive(InteractiveElement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Armed,
    Dragging,
}

/// Outcome of a pointer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Released before the threshold; a genuine click.
    Click,
    /// Released at the end of a drag.
    DragEnd,
    /// Not the pointer this controller tracks.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragSession {
    origin_x: i32,
    origin_scroll_left: u16,
    has_crossed_threshold: bool,
    captured_pointer_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragScroll {
    threshold: u16,
    scroll_left: u16,
    max_scroll_left: u16,
    session: Option<DragSession>,
    suppress_next_click: bool,
}

impl Default for DragScroll {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragScroll {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold,
            scroll_left: 0,
            max_scroll_left: 0,
            session: None,
            suppress_next_click: false,
        }
    }

    pub fn phase(&self) -> DragPhase {
        match self.session {
            None => DragPhase::Idle,
            Some(s) if s.has_crossed_threshold => DragPhase::Dragging,
            Some(_) => DragPhase::Armed,
        }
    }

    pub fn scroll_left(&self) -> u16 {
        self.scroll_left
    }

    pub fn max_scroll_left(&self) -> u16 {
        self.max_scroll_left
    }

    /// The viewport holds pointer capture only while dragging.
    pub fn has_capture(&self) -> bool {
        self.phase() == DragPhase::Dragging
    }

    pub fn text_selection_suppressed(&self) -> bool {
        self.phase() == DragPhase::Dragging
    }

    pub fn set_max_scroll_left(&mut self, max: u16) {
        self.max_scroll_left = max;
        self.scroll_left = self.scroll_left.min(max);
    }

    /// Keyboard scrolling; ignored while a drag owns the offset.
    pub fn scroll_by(&mut self, delta: i32) {
        if self.phase() == DragPhase::Dragging {
            return;
        }
        self.scroll_left = self.clamp(i32::from(self.scroll_left) + delta);
    }

    pub fn pointer_down(&mut self, pointer_id: u32, x: i32, target: PointerTarget) {
        self.suppress_next_click = false;

        if let PointerTarget::Interactive(element) = target {
            tracing::debug!("Pointer down on {:?}, not arming drag", element);
            self.session = None;
            return;
        }

        self.session = Some(DragSession {
            origin_x: x,
            origin_scroll_left: self.scroll_left,
            has_crossed_threshold: false,
            captured_pointer_id: pointer_id,
        });
    }

    /// Returns true when the scroll offset changed.
    pub fn pointer_move(&mut self, pointer_id: u32, x: i32) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.captured_pointer_id != pointer_id {
            return false;
        }

        let dx = x - session.origin_x;
        if !session.has_crossed_threshold {
            if dx.unsigned_abs() <= u32::from(self.threshold) {
                return false;
            }
            session.has_crossed_threshold = true;
            tracing::debug!("Drag started at x={}", session.origin_x);
        }

        let target = i32::from(session.origin_scroll_left) - dx;
        let scroll_left = self.clamp(target);
        let changed = scroll_left != self.scroll_left;
        self.scroll_left = scroll_left;
        changed
    }

    pub fn pointer_up(&mut self, pointer_id: u32) -> Release {
        match self.session {
            Some(session) if session.captured_pointer_id != pointer_id => Release::Ignored,
            Some(session) => {
                self.session = None;
                if session.has_crossed_threshold {
                    self.suppress_next_click = true;
                    tracing::debug!("Drag ended at scroll_left={}", self.scroll_left);
                    Release::DragEnd
                } else {
                    Release::Click
                }
            }
            // released over an interactive element, which never armed
            None => Release::Click,
        }
    }

    pub fn pointer_cancel(&mut self, pointer_id: u32) {
        if self
            .session
            .is_some_and(|s| s.captured_pointer_id == pointer_id)
        {
            self.end_session();
        }
    }

    pub fn lost_capture(&mut self, pointer_id: u32) {
        self.pointer_cancel(pointer_id);
    }

    pub fn blur(&mut self) {
        self.end_session();
    }

    /// Consume the click that follows a release. False exactly once after a drag.
    pub fn accept_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_next_click)
    }

    fn end_session(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("Drag session cancelled");
        }
        self.suppress_next_click = false;
    }

    fn clamp(&self, value: i32) -> u16 {
        value.clamp(0, i32::from(self.max_scroll_left)) as u16
    }
}
