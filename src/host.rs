//! Demo host shell: stands in for the page that embeds the backdrop.
//!
//! Translates window input into the backdrop's input messages and models a
//! tall scrollable page driven by the mouse wheel. Keyboard shortcuts:
//! - `M`: mount or unmount the backdrop
//! - `L`: switch between the landing and static routes (remounts)

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, WindowResized};
use bevy_egui::EguiContexts;

use crate::config::{RouteMode, SceneConfig};
use crate::input::{PageScrolled, PointerClicked, PointerMoved, ViewportResized};
use crate::lifecycle::{BackdropPhase, mount_scene};

/// Pixels scrolled per wheel line.
const LINE_HEIGHT: f32 = 40.0;

/// Virtual page height in viewport heights.
const PAGE_SCREENS: f32 = 4.0;

/// Scroll state of the virtual page.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct PageModel {
    pub scroll_y: f32,
}

impl PageModel {
    /// Scrollable distance for a viewport of the given height.
    pub fn max_scroll(viewport_height: f32) -> f32 {
        (viewport_height * PAGE_SCREENS - viewport_height).max(0.0)
    }

    /// Scroll by `delta` pixels, staying on the page.
    pub fn scroll_by(&mut self, delta: f32, viewport_height: f32) {
        self.scroll_y = (self.scroll_y + delta).clamp(0.0, Self::max_scroll(viewport_height));
    }
}

/// Set when a route switch needs the scene mounted again next frame.
#[derive(Resource, Default)]
struct PendingRemount(bool);

/// Plugin wiring a desktop window to the backdrop.
pub struct HostShellPlugin;

impl Plugin for HostShellPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PageModel>()
            .init_resource::<PendingRemount>()
            .add_systems(Startup, mount_on_startup)
            .add_systems(
                OnEnter(BackdropPhase::Mounted),
                announce_page.after(mount_scene),
            )
            .add_systems(
                PreUpdate,
                (
                    forward_pointer,
                    forward_clicks,
                    forward_wheel,
                    forward_resize,
                    lifecycle_shortcuts,
                ),
            );
    }
}

fn mount_on_startup(mut next: ResMut<NextState<BackdropPhase>>) {
    next.set(BackdropPhase::Mounted);
}

/// Tell a freshly mounted scene the current viewport and page position.
fn announce_page(
    windows: Query<&Window, With<PrimaryWindow>>,
    page: Res<PageModel>,
    mut resized: MessageWriter<ViewportResized>,
    mut scrolled: MessageWriter<PageScrolled>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    resized.write(ViewportResized {
        width: window.width(),
        height: window.height(),
    });
    scrolled.write(PageScrolled {
        scroll_y: page.scroll_y,
        max_scroll: PageModel::max_scroll(window.height()),
    });
}

fn forward_pointer(
    mut cursor: MessageReader<CursorMoved>,
    mut moved: MessageWriter<PointerMoved>,
) {
    for event in cursor.read() {
        moved.write(PointerMoved {
            position: event.position,
        });
    }
}

fn forward_clicks(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    mut clicked: MessageWriter<PointerClicked>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    // Clicks on the overlay card belong to the overlay
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_pointer_input()
    {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(position) = window.cursor_position() {
        clicked.write(PointerClicked { position });
    }
}

fn forward_wheel(
    mut wheel: MessageReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut page: ResMut<PageModel>,
    mut scrolled: MessageWriter<PageScrolled>,
) {
    let Ok(window) = windows.single() else {
        wheel.clear();
        return;
    };

    let mut delta = 0.0;
    for event in wheel.read() {
        let pixels = match event.unit {
            MouseScrollUnit::Line => event.y * LINE_HEIGHT,
            MouseScrollUnit::Pixel => event.y,
        };
        // Wheel up scrolls toward the top of the page
        delta -= pixels;
    }
    if delta == 0.0 {
        return;
    }

    page.scroll_by(delta, window.height());
    scrolled.write(PageScrolled {
        scroll_y: page.scroll_y,
        max_scroll: PageModel::max_scroll(window.height()),
    });
}

fn forward_resize(
    mut resizes: MessageReader<WindowResized>,
    mut resized: MessageWriter<ViewportResized>,
) {
    for event in resizes.read() {
        resized.write(ViewportResized {
            width: event.width,
            height: event.height,
        });
    }
}

fn lifecycle_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    phase: Res<State<BackdropPhase>>,
    mut next: ResMut<NextState<BackdropPhase>>,
    mut config: ResMut<SceneConfig>,
    mut pending: ResMut<PendingRemount>,
) {
    if pending.0 {
        pending.0 = false;
        next.set(BackdropPhase::Mounted);
        return;
    }

    if keys.just_pressed(KeyCode::KeyM) {
        let target = match phase.get() {
            BackdropPhase::Mounted => BackdropPhase::Unmounted,
            BackdropPhase::Unmounted => BackdropPhase::Mounted,
        };
        info!("Switching backdrop to {:?}", target);
        next.set(target);
    }

    if keys.just_pressed(KeyCode::KeyL) {
        config.route = match config.route {
            RouteMode::Landing => RouteMode::Static,
            RouteMode::Static => RouteMode::Landing,
        };
        info!("Route changed to {:?}", config.route);
        if *phase.get() == BackdropPhase::Mounted {
            next.set(BackdropPhase::Unmounted);
            pending.0 = true;
        }
    }
}
