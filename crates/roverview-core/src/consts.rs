/// Minimum pixel count (w*h) to resample the base image with row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon for floating-point comparisons in image space.
pub const EPSILON: f32 = 1e-4;

/// Default canvas size of the path-planning map.
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 500;

/// Zoom bounds and step of the path-planning map.
pub const MAP_MIN_SCALE: f32 = 0.5;
pub const MAP_MAX_SCALE: f32 = 2.0;
pub const MAP_ZOOM_STEP: f32 = 0.1;

/// Zoom bounds and step of the detection result view.
pub const DETECTION_MIN_SCALE: f32 = 0.5;
pub const DETECTION_MAX_SCALE: f32 = 3.0;
pub const DETECTION_ZOOM_STEP: f32 = 0.25;

/// Surface tint approximating the Martian color cast, as RGB.
pub const TINT_RGB: [u8; 3] = [226, 123, 88];
pub const MAP_TINT_ALPHA: f32 = 0.2;
pub const DETECTION_TINT_ALPHA: f32 = 0.1;

/// Grid spacing in image-space units.
pub const GRID_SPACING: f32 = 50.0;
pub const GRID_ALPHA: f32 = 0.1;

/// Marker disc radius in screen pixels. Does not scale with zoom.
pub const MARKER_RADIUS: f32 = 10.0;
pub const MARKER_RING_WIDTH: f32 = 2.0;
pub const MARKER_FONT_SIZE: f32 = 12.0;
pub const START_MARKER_RGB: [u8; 3] = [0x4c, 0xaf, 0x50];
pub const END_MARKER_RGB: [u8; 3] = [0xf4, 0x43, 0x36];

/// Path polyline styling.
pub const PATH_RGBA: [u8; 4] = [255, 255, 100, 204];
pub const PATH_WIDTH: f32 = 3.0;
pub const PATH_DOT_RADIUS: f32 = 3.0;

/// Detection box styling.
pub const BOX_WIDTH_SELECTED: f32 = 3.0;
pub const BOX_WIDTH_UNSELECTED: f32 = 2.0;
/// Dash pattern (on, off) of unselected boxes, in screen pixels.
pub const BOX_DASH: (f32, f32) = (5.0, 3.0);
pub const CORNER_HANDLE_SIZE: f32 = 6.0;
pub const LABEL_HEIGHT: f32 = 24.0;
pub const LABEL_PADDING: f32 = 5.0;
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const LABEL_BG_ALPHA_SELECTED: f32 = 0.8;
pub const LABEL_BG_ALPHA_UNSELECTED: f32 = 0.6;

/// Width estimate per character when no font is available for measuring.
pub const FALLBACK_CHAR_WIDTH: f32 = 7.0;

/// Pointer travel (screen pixels) above which a press counts as a drag,
/// so the trailing click is not treated as a selection click.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 3.0;

/// Canvas background behind the base image.
pub const BACKGROUND_RGBA: [u8; 4] = [0, 0, 0, 255];
