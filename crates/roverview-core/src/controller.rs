//! Gesture state machine and the viewer state it drives.
//!
//! [`Viewer`] owns the viewport, the overlay, the input state and the
//! bookkeeping for outstanding collaborator requests. Front-ends feed it
//! [`InputEvent`]s through [`Viewer::handle`] and repaint when the outcome
//! asks for it.

use tracing::{debug, info, trace, warn};

use crate::base_image::BaseImage;
use crate::collab::{CollaboratorError, Delivery, PathMetrics, PlanResult, RequestTicket};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::hit_test::{HitTester, LinearHitTester};
use crate::overlay::{DetectionBox, MarkerRole, OverlayModel, PathPolyline, Selection};
use crate::render::{self, Canvas};
use crate::rover::RoverReport;
use crate::transform::{ImagePoint, ScreenPoint, ViewportState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputState {
    Idle,
    /// The next click places the marker for this role.
    PlacingMarker(MarkerRole),
    Panning {
        down: ScreenPoint,
        offset_at_start: ScreenPoint,
        /// Largest distance from `down` seen during the gesture.
        moved: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    BeginPlacing(MarkerRole),
    CancelPlacing,
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    PointerUp(ScreenPoint),
    PointerLeave,
    Click(ScreenPoint),
    ZoomIn,
    ZoomOut,
    ResetView,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A collaborator request is in flight.
    Processing,
    /// The event makes no sense in the current input state.
    InvalidPointerState,
    /// The click ended a drag-pan.
    SuppressedAfterDrag,
    /// Markers need a base image to be placed on.
    NoImage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Visible state changed; repaint.
    Repaint,
    /// Accepted, nothing visible changed.
    Unchanged,
    Ignored(IgnoreReason),
}

pub struct Viewer<H: HitTester = LinearHitTester> {
    config: ViewerConfig,
    viewport: ViewportState,
    overlay: OverlayModel,
    state: InputState,
    image: Option<BaseImage>,
    metrics: Option<PathMetrics>,
    rover_report: Option<RoverReport>,
    pending_plan: Option<RequestTicket>,
    pending_detect: Option<RequestTicket>,
    pending_rover: Option<RequestTicket>,
    next_ticket: u64,
    suppress_click: bool,
    hit_tester: H,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        Self::with_hit_tester(config, LinearHitTester)
    }
}

impl<H: HitTester> Viewer<H> {
    pub fn with_hit_tester(config: ViewerConfig, hit_tester: H) -> Result<Self> {
        config.validate()?;
        let viewport = ViewportState::new(config.view.zoom_bounds()?);
        Ok(Self {
            config,
            viewport,
            overlay: OverlayModel::default(),
            state: InputState::Idle,
            image: None,
            metrics: None,
            rover_report: None,
            pending_plan: None,
            pending_detect: None,
            pending_rover: None,
            next_ticket: 0,
            suppress_click: false,
            hit_tester,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn overlay(&self) -> &OverlayModel {
        &self.overlay
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn image(&self) -> Option<&BaseImage> {
        self.image.as_ref()
    }

    pub fn metrics(&self) -> Option<&PathMetrics> {
        self.metrics.as_ref()
    }

    pub fn rover_report(&self) -> Option<&RoverReport> {
        self.rover_report.as_ref()
    }

    /// True while any collaborator request is outstanding.
    pub fn is_processing(&self) -> bool {
        self.pending_plan.is_some() || self.pending_detect.is_some() || self.pending_rover.is_some()
    }

    pub fn is_planning(&self) -> bool {
        self.pending_plan.is_some()
    }

    pub fn is_detecting(&self) -> bool {
        self.pending_detect.is_some()
    }

    pub fn is_searching_rover(&self) -> bool {
        self.pending_rover.is_some()
    }

    /// Switch to a new configuration in place. The image, overlay and
    /// outstanding requests survive; the view keeps its offset and has its
    /// scale clamped into the new zoom bounds. On error nothing changes.
    pub fn set_config(&mut self, config: ViewerConfig) -> Result<()> {
        config.validate()?;
        let bounds = config.view.zoom_bounds()?;
        self.viewport = ViewportState::new(bounds)
            .with_scale(self.viewport.scale())
            .pan_to(self.viewport.offset());
        self.config = config;
        debug!(scale = self.viewport.scale(), "Viewer reconfigured");
        Ok(())
    }

    /// Replace the base image. Overlays, metrics and outstanding requests
    /// belong to the previous image and are dropped; the view is reset.
    pub fn load_image(&mut self, image: BaseImage) {
        info!(width = image.width(), height = image.height(), "Base image loaded");
        self.image = Some(image);
        self.overlay.clear();
        self.metrics = None;
        self.rover_report = None;
        self.pending_plan = None;
        self.pending_detect = None;
        self.pending_rover = None;
        self.viewport = self.viewport.reset();
        self.state = InputState::Idle;
        self.suppress_click = false;
    }

    /// Single entry point for pointer, placement and zoom events.
    pub fn handle(&mut self, event: InputEvent) -> EventOutcome {
        let outcome = match event {
            InputEvent::BeginPlacing(role) => self.begin_placing(role),
            InputEvent::CancelPlacing => match self.state {
                InputState::PlacingMarker(_) => {
                    self.state = InputState::Idle;
                    EventOutcome::Unchanged
                }
                _ => EventOutcome::Ignored(IgnoreReason::InvalidPointerState),
            },
            InputEvent::PointerDown(p) => self.pointer_down(p),
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::PointerUp(_) => self.end_pan(true),
            InputEvent::PointerLeave => self.end_pan(false),
            InputEvent::Click(p) => self.click(p),
            InputEvent::ZoomIn => self.update_view(self.viewport.zoom_by(self.config.view.zoom_step)),
            InputEvent::ZoomOut => {
                self.update_view(self.viewport.zoom_by(-self.config.view.zoom_step))
            }
            InputEvent::ResetView => self.update_view(self.viewport.reset()),
        };

        match outcome {
            EventOutcome::Ignored(reason) => {
                trace!(?event, ?reason, state = ?self.state, "Input event ignored")
            }
            _ => trace!(?event, ?outcome, state = ?self.state, "Input event handled"),
        }
        outcome
    }

    fn begin_placing(&mut self, role: MarkerRole) -> EventOutcome {
        if self.is_processing() {
            return EventOutcome::Ignored(IgnoreReason::Processing);
        }
        if matches!(self.state, InputState::Panning { .. }) {
            return EventOutcome::Ignored(IgnoreReason::InvalidPointerState);
        }
        if self.image.is_none() {
            self.state = InputState::Idle;
            return EventOutcome::Ignored(IgnoreReason::NoImage);
        }
        self.state = InputState::PlacingMarker(role);
        debug!(%role, "Placing marker");
        EventOutcome::Unchanged
    }

    fn pointer_down(&mut self, p: ScreenPoint) -> EventOutcome {
        self.suppress_click = false;
        match self.state {
            InputState::Idle => {
                self.state = InputState::Panning {
                    down: p,
                    offset_at_start: self.viewport.offset(),
                    moved: 0.0,
                };
                EventOutcome::Unchanged
            }
            // Presses in placing mode belong to the placing click.
            InputState::PlacingMarker(_) => EventOutcome::Unchanged,
            InputState::Panning { .. } => EventOutcome::Ignored(IgnoreReason::InvalidPointerState),
        }
    }

    fn pointer_move(&mut self, p: ScreenPoint) -> EventOutcome {
        let InputState::Panning {
            down,
            offset_at_start,
            moved,
        } = self.state
        else {
            return EventOutcome::Ignored(IgnoreReason::InvalidPointerState);
        };

        self.state = InputState::Panning {
            down,
            offset_at_start,
            moved: moved.max(p.distance(down)),
        };
        self.update_view(self.viewport.pan_to(offset_at_start + (p - down)))
    }

    fn end_pan(&mut self, released: bool) -> EventOutcome {
        let InputState::Panning { moved, .. } = self.state else {
            return EventOutcome::Ignored(IgnoreReason::InvalidPointerState);
        };
        self.state = InputState::Idle;
        self.suppress_click = released && moved > self.config.input.drag_threshold;
        EventOutcome::Unchanged
    }

    fn click(&mut self, p: ScreenPoint) -> EventOutcome {
        if self.is_processing() {
            return EventOutcome::Ignored(IgnoreReason::Processing);
        }
        if std::mem::take(&mut self.suppress_click) {
            return EventOutcome::Ignored(IgnoreReason::SuppressedAfterDrag);
        }

        match self.state {
            InputState::PlacingMarker(role) => {
                self.state = InputState::Idle;
                if self.image.is_none() {
                    return EventOutcome::Ignored(IgnoreReason::NoImage);
                }
                let position = self.viewport.screen_to_image(p);
                self.overlay.place_marker(role, position);
                debug!(%role, x = position.x, y = position.y, "Marker placed");
                EventOutcome::Repaint
            }
            InputState::Idle => {
                let hit = self
                    .hit_tester
                    .hit_test(p, &self.viewport, &self.overlay)
                    .map(|b| Selection::Detection(b.id.clone()));
                if self.overlay.selection() == hit.as_ref() {
                    return EventOutcome::Unchanged;
                }
                debug!(selection = ?hit, "Selection changed");
                // The hit came from the current overlay, so it always exists.
                match self.overlay.select(hit) {
                    Ok(()) => EventOutcome::Repaint,
                    Err(_) => EventOutcome::Unchanged,
                }
            }
            InputState::Panning { .. } => EventOutcome::Ignored(IgnoreReason::InvalidPointerState),
        }
    }

    fn update_view(&mut self, next: ViewportState) -> EventOutcome {
        if next == self.viewport {
            return EventOutcome::Unchanged;
        }
        self.viewport = next;
        EventOutcome::Repaint
    }

    /// Detection box under a screen point, if any.
    pub fn hit_test(&self, screen: ScreenPoint) -> Option<&DetectionBox> {
        self.hit_tester.hit_test(screen, &self.viewport, &self.overlay)
    }

    /// Place a marker directly in image space, returning the position it replaced.
    pub fn place_marker(
        &mut self,
        role: MarkerRole,
        position: ImagePoint,
    ) -> Result<Option<ImagePoint>> {
        if self.image.is_none() {
            return Err(ViewerError::DegenerateInput(
                "load an image before placing markers".into(),
            ));
        }
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(ViewerError::DegenerateInput(format!(
                "{role} marker position must be finite, got {position:?}"
            )));
        }
        Ok(self.overlay.place_marker(role, position))
    }

    pub fn select(&mut self, selection: Option<Selection>) -> Result<()> {
        self.overlay.select(selection)
    }

    /// Jump to an explicit scale (clamped) and pan offset. Non-finite
    /// values are rejected and leave the view unchanged.
    pub fn set_view(&mut self, scale: f32, offset: ScreenPoint) -> Result<ViewportState> {
        check_view(scale, offset)?;
        self.viewport = self.viewport.with_scale(scale).pan_to(offset);
        Ok(self.viewport)
    }

    pub fn replace_path(&mut self, path: Option<PathPolyline>) {
        self.overlay.set_path(path);
    }

    /// Validate and install a detection set. On error nothing changes.
    pub fn replace_detections(&mut self, boxes: Vec<DetectionBox>) -> Result<()> {
        self.overlay.set_detections(boxes)
    }

    /// Remove markers, path, detections, selection and route metrics.
    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
        self.metrics = None;
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        RequestTicket(self.next_ticket)
    }

    /// Start a planning request between the placed markers. A new request
    /// supersedes any outstanding one.
    pub fn begin_planning(&mut self) -> Result<(RequestTicket, ImagePoint, ImagePoint)> {
        let (start, end) = self.overlay.markers().endpoints().ok_or_else(|| {
            ViewerError::DegenerateInput("set both start and end points first".into())
        })?;
        let ticket = self.issue_ticket();
        if let Some(old) = self.pending_plan.replace(ticket) {
            debug!(%old, %ticket, "Planning request superseded");
        }
        self.state = InputState::Idle;
        debug!(%ticket, "Planning requested");
        Ok((ticket, start, end))
    }

    /// Deliver a planner result. Only the latest ticket is applied; on
    /// failure the overlay is left as it was.
    pub fn complete_planning(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<PlanResult, CollaboratorError>,
    ) -> Result<Delivery<()>> {
        if self.pending_plan != Some(ticket) {
            debug!(%ticket, "Dropping stale planning result");
            return Ok(Delivery::Stale);
        }
        self.pending_plan = None;

        match result {
            Ok(plan) => {
                debug!(%ticket, segments = plan.path.segment_count(), "Path delivered");
                self.overlay.set_path(Some(plan.path));
                self.metrics = Some(plan.metrics);
                Ok(Delivery::Applied(()))
            }
            Err(e) => {
                warn!(%ticket, "Planner failed: {e}");
                Err(ViewerError::CollaboratorFailure(e.0))
            }
        }
    }

    /// Start a detection request on the current image, returning a shared
    /// handle to hand to the detector.
    pub fn begin_detection(&mut self) -> Result<(RequestTicket, BaseImage)> {
        let image = self
            .image
            .clone()
            .ok_or_else(|| ViewerError::DegenerateInput("load an image to analyze".into()))?;
        let ticket = self.issue_ticket();
        if let Some(old) = self.pending_detect.replace(ticket) {
            debug!(%old, %ticket, "Detection request superseded");
        }
        self.state = InputState::Idle;
        debug!(%ticket, "Detection requested");
        Ok((ticket, image))
    }

    /// Deliver a detector result, returning the number of boxes applied.
    pub fn complete_detection(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<Vec<DetectionBox>, CollaboratorError>,
    ) -> Result<Delivery<usize>> {
        if self.pending_detect != Some(ticket) {
            debug!(%ticket, "Dropping stale detection result");
            return Ok(Delivery::Stale);
        }
        self.pending_detect = None;

        let boxes = result.map_err(|e| {
            warn!(%ticket, "Detector failed: {e}");
            ViewerError::CollaboratorFailure(e.0)
        })?;
        let count = boxes.len();
        self.overlay.set_detections(boxes)?;
        debug!(%ticket, count, "Detections delivered");
        Ok(Delivery::Applied(count))
    }

    /// Start a rover search on the current image.
    pub fn begin_rover_search(&mut self) -> Result<(RequestTicket, BaseImage)> {
        let image = self
            .image
            .clone()
            .ok_or_else(|| ViewerError::DegenerateInput("load an image to search".into()))?;
        let ticket = self.issue_ticket();
        if let Some(old) = self.pending_rover.replace(ticket) {
            debug!(%old, %ticket, "Rover search superseded");
        }
        self.state = InputState::Idle;
        debug!(%ticket, "Rover search requested");
        Ok((ticket, image))
    }

    /// Deliver a rover search result. Reports with an out-of-range
    /// probability count as collaborator failures.
    pub fn complete_rover_search(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<RoverReport, CollaboratorError>,
    ) -> Result<Delivery<()>> {
        if self.pending_rover != Some(ticket) {
            debug!(%ticket, "Dropping stale rover search result");
            return Ok(Delivery::Stale);
        }
        self.pending_rover = None;

        let report = result.and_then(|r| r.validate().map(|()| r)).map_err(|e| {
            warn!(%ticket, "Rover search failed: {e}");
            ViewerError::CollaboratorFailure(e.0)
        })?;
        debug!(%ticket, probability = report.probability, "Rover report delivered");
        self.rover_report = Some(report);
        Ok(Delivery::Applied(()))
    }

    /// Repaint everything onto `canvas`.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        render::render(
            canvas,
            self.image.as_ref(),
            &self.viewport,
            &self.overlay,
            &self.config.style,
        );
    }
}

/// A view jump needs a finite scale and offset.
pub(crate) fn check_view(scale: f32, offset: ScreenPoint) -> Result<()> {
    if scale.is_finite() && scale > 0.0 && offset.x.is_finite() && offset.y.is_finite() {
        Ok(())
    } else {
        Err(ViewerError::DegenerateInput(format!(
            "view needs a finite positive scale and finite offset, got scale {scale} offset {offset:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_does_not_suppress_next_click() {
        let mut v = Viewer::new(ViewerConfig::default()).unwrap();
        v.handle(InputEvent::PointerDown(ScreenPoint::new(0.0, 0.0)));
        v.handle(InputEvent::PointerMove(ScreenPoint::new(50.0, 0.0)));
        v.handle(InputEvent::PointerLeave);
        assert!(!v.suppress_click);
        assert_eq!(v.state(), InputState::Idle);
    }

    #[test]
    fn test_tickets_increase() {
        let mut v = Viewer::new(ViewerConfig::default()).unwrap();
        v.load_image(BaseImage::new(image::RgbaImage::new(4, 4)));
        let (a, _) = v.begin_detection().unwrap();
        let (b, _) = v.begin_detection().unwrap();
        assert!(b > a);
    }
}
