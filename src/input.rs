//! Host input for the backdrop.
//!
//! The host page (or the demo shell) forwards pointer, scroll and resize
//! events as messages. The handlers here only write targets: the camera rig
//! and the viewport. Hover and click handling live in the interaction layer.

use bevy::prelude::*;

use crate::camera::CameraRig;
use crate::types::FrameSet;

/// Pointer moved to a pixel position (origin top-left).
#[derive(Message, Clone, Copy, Debug)]
pub struct PointerMoved {
    pub position: Vec2,
}

/// Primary button clicked at a pixel position (origin top-left).
#[derive(Message, Clone, Copy, Debug)]
pub struct PointerClicked {
    pub position: Vec2,
}

/// Page scrolled to `scroll_y` out of `max_scroll` scrollable pixels.
#[derive(Message, Clone, Copy, Debug)]
pub struct PageScrolled {
    pub scroll_y: f32,
    pub max_scroll: f32,
}

/// Viewport resized, in pixels.
#[derive(Message, Clone, Copy, Debug)]
pub struct ViewportResized {
    pub width: f32,
    pub height: f32,
}

/// The overlay asked to dismiss the current selection.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct CloseSelection;

/// Size of the render surface in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// Convert a pixel position to NDC, `[-1, 1]²` with y up.
    pub fn to_ndc(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x / self.width.max(1.0) * 2.0 - 1.0,
            -(position.y / self.height.max(1.0)) * 2.0 + 1.0,
        )
    }
}

/// Which host events the mounted scene listens to.
///
/// Present only while the scene is mounted.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Listeners {
    pub pointer_move: bool,
    pub click: bool,
    pub scroll: bool,
    pub resize: bool,
}

impl Listeners {
    /// Listener set for a route: click only when selection is enabled.
    pub fn for_clicks(click: bool) -> Self {
        Self {
            pointer_move: true,
            click,
            scroll: true,
            resize: true,
        }
    }
}

/// Plugin registering host input messages and their handlers.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>()
            .add_message::<PointerMoved>()
            .add_message::<PointerClicked>()
            .add_message::<PageScrolled>()
            .add_message::<ViewportResized>()
            .add_message::<CloseSelection>()
            .add_systems(
                Update,
                (track_pointer, track_scroll, track_viewport).in_set(FrameSet::Input),
            );
    }
}

/// Point the camera's parallax target at the pointer.
pub fn track_pointer(
    listeners: Option<Res<Listeners>>,
    viewport: Res<Viewport>,
    mut moves: MessageReader<PointerMoved>,
    mut rig: ResMut<CameraRig>,
) {
    if !listeners.is_some_and(|l| l.pointer_move) {
        moves.clear();
        return;
    }
    if let Some(last) = moves.read().last() {
        rig.pointer.target = viewport.to_ndc(last.position);
    }
}

/// Update the scroll target from the page position.
pub fn track_scroll(
    listeners: Option<Res<Listeners>>,
    mut scrolls: MessageReader<PageScrolled>,
    mut rig: ResMut<CameraRig>,
) {
    if !listeners.is_some_and(|l| l.scroll) {
        scrolls.clear();
        return;
    }
    if let Some(last) = scrolls.read().last() {
        rig.set_scroll(last.scroll_y, last.max_scroll);
    }
}

/// Keep the viewport (and so the camera aspect) in sync with the host.
pub fn track_viewport(
    listeners: Option<Res<Listeners>>,
    mut resizes: MessageReader<ViewportResized>,
    mut viewport: ResMut<Viewport>,
) {
    if !listeners.is_some_and(|l| l.resize) {
        resizes.clear();
        return;
    }
    for resize in resizes.read() {
        if resize.width <= 0.0 || resize.height <= 0.0 {
            debug!("Ignoring degenerate viewport {}x{}", resize.width, resize.height);
            continue;
        }
        viewport.width = resize.width;
        viewport.height = resize.height;
    }
}
