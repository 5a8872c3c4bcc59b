//! Camera controller for the backdrop.
//!
//! The camera follows two smoothed channels: the pointer position (parallax)
//! and the page scroll fraction (a scripted fly-through on the landing page).
//! The resulting pose is kept in a resource with its own projection math so
//! picking and screen projection use exactly the pose that was rendered.

use std::f32::consts::TAU;
use std::ops::{Add, Mul, Sub};

use bevy::math::Ray3d;
use bevy::prelude::*;

use crate::config::{RouteMode, SceneConfig};
use crate::input::Viewport;
use crate::planets::hex_color;
use crate::types::{FrameSet, SceneEntity};

/// Fraction of the remaining distance covered per frame by both channels.
pub const SMOOTHING: f32 = 0.05;

/// Eye offset per unit of pointer NDC.
pub const PARALLAX: f32 = 80.0;

/// Eye of the static-page camera before parallax.
pub const STATIC_EYE: Vec3 = Vec3::new(0.0, 0.0, 400.0);

/// Vertical field of view.
pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 3000.0;

/// Landing fly-through: depth and height at the top and bottom of the page.
const FLIGHT_Z: (f32, f32) = (650.0, 180.0);
const FLIGHT_Y: (f32, f32) = (-120.0, 180.0);
/// Side-to-side sway over one page.
const FLIGHT_SWAY: f32 = 200.0;

/// Exponential distance fog fading far stars and planets into the void.
pub const FOG_COLOR: u32 = 0x0a0a12;
pub const FOG_DENSITY: f32 = 0.00025;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// A value eased toward a target by a fixed fraction each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Smoothed<T> {
    pub current: T,
    pub target: T,
}

impl<T> Smoothed<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    /// Move `current` toward `target` by `factor` of the gap.
    ///
    /// For `factor` in `[0, 1]` this never overshoots.
    pub fn step(&mut self, factor: f32) {
        self.current = self.current + (self.target - self.current) * factor;
    }
}

/// Smoothed pointer and scroll state driving the camera.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraRig {
    /// Pointer in NDC, `[-1, 1]²`, y up.
    pub pointer: Smoothed<Vec2>,
    /// Page scroll fraction in `[0, 1]`.
    pub scroll: Smoothed<f32>,
}

impl CameraRig {
    pub fn step(&mut self) {
        self.pointer.step(SMOOTHING);
        self.scroll.step(SMOOTHING);
    }

    /// Set the scroll target from the page offset and scrollable height.
    pub fn set_scroll(&mut self, scroll_y: f32, max_scroll: f32) {
        self.scroll.target = scroll_fraction(scroll_y, max_scroll);
    }
}

/// Scroll fraction of a page, clamped to `[0, 1]`.
pub fn scroll_fraction(scroll_y: f32, max_scroll: f32) -> f32 {
    (scroll_y / max_scroll.max(1.0)).clamp(0.0, 1.0)
}

/// Eye position of the landing fly-through at scroll fraction `s`.
pub fn flight_eye(s: f32) -> Vec3 {
    Vec3::new(
        FLIGHT_SWAY * (TAU * s).sin(),
        FLIGHT_Y.0 + (FLIGHT_Y.1 - FLIGHT_Y.0) * s,
        FLIGHT_Z.0 + (FLIGHT_Z.1 - FLIGHT_Z.0) * s,
    )
}

/// Current camera pose and lens, as rendered this frame.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: STATIC_EYE,
            target: Vec3::ZERO,
            fov_y: FOV_Y_DEGREES.to_radians(),
            near: NEAR,
            far: FAR,
        }
    }
}

impl CameraPose {
    /// Pose for a route given the smoothed rig.
    pub fn for_route(route: RouteMode, rig: &CameraRig) -> Self {
        let base = match route {
            RouteMode::Landing => flight_eye(rig.scroll.current),
            RouteMode::Static => STATIC_EYE,
        };
        let parallax = rig.pointer.current * PARALLAX;
        Self {
            eye: base + parallax.extend(0.0),
            ..Self::default()
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, viewport: &Viewport) -> Mat4 {
        self.projection(viewport.aspect()) * self.view()
    }

    /// Ray from the near plane through the given NDC point.
    pub fn ray_from_ndc(&self, ndc: Vec2, viewport: &Viewport) -> Option<Ray3d> {
        let inverse = self.view_projection(viewport).inverse();
        // Depth runs from 0 at the near plane to 1 at the far plane
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d {
            origin: near,
            direction,
        })
    }

    /// Pixel position of a world point, origin at the top-left.
    ///
    /// `None` for points behind the camera.
    pub fn world_to_screen(&self, point: Vec3, viewport: &Viewport) -> Option<Vec2> {
        let clip = self.view_projection(viewport) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc.y) * 0.5 * viewport.height,
        ))
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye).looking_at(self.target, Vec3::Y)
    }
}

/// Plugin providing camera functionality.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .init_resource::<CameraPose>()
            .add_systems(Update, update_camera.in_set(FrameSet::Camera));
    }
}

pub fn backdrop_fog() -> DistanceFog {
    DistanceFog {
        color: hex_color(FOG_COLOR),
        falloff: FogFalloff::Exponential {
            density: FOG_DENSITY,
        },
        ..default()
    }
}

/// Spawn the main camera at the initial pose for the configured route.
pub fn spawn_camera(commands: &mut Commands, pose: &CameraPose) -> Entity {
    commands
        .spawn((
            SceneEntity,
            MainCamera,
            Camera3d::default(),
            backdrop_fog(),
            Projection::from(PerspectiveProjection {
                fov: pose.fov_y,
                near: pose.near,
                far: pose.far,
                ..default()
            }),
            pose.transform(),
        ))
        .id()
}

/// Ease the rig, recompute the pose and move the camera.
pub fn update_camera(
    config: Res<SceneConfig>,
    mut rig: ResMut<CameraRig>,
    mut pose: ResMut<CameraPose>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    rig.step();
    *pose = CameraPose::for_route(config.route, &rig);

    for mut transform in cameras.iter_mut() {
        *transform = pose.transform();
    }
}
