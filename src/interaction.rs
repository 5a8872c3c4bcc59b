//! Pointer interaction with planets.
//!
//! Picking casts a ray through the current camera pose and tests it against
//! planet bounding spheres only. Hover brightens the planet under the
//! pointer. On the landing page a click selects a planet and publishes its
//! dataset record; the record is re-projected every frame while selected so
//! the overlay card can follow the planet.

use bevy::math::Ray3d;
use bevy::prelude::*;

use crate::camera::CameraPose;
use crate::effects::{BurstKind, SpawnBurstEvent};
use crate::input::{CloseSelection, Listeners, PointerClicked, PointerMoved, Viewport};
use crate::planets::{DatasetMetadata, EMISSIVE_HOVER, EMISSIVE_IDLE, Planet};
use crate::types::FrameSet;

/// Distance at which the overlay card is shown at full size.
const CARD_REFERENCE_DISTANCE: f32 = 500.0;
const CARD_SCALE_MIN: f32 = 0.3;
const CARD_SCALE_MAX: f32 = 1.0;

/// Planet currently under the pointer.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoveredPlanet {
    pub entity: Option<Entity>,
}

/// Pointer style the host should show.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over something clickable.
    Interactive,
}

/// What the overlay needs to show a selected planet.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionRecord {
    pub dataset: DatasetMetadata,
    /// Planet center in pixels, origin top-left.
    pub screen_position: Vec2,
    /// Card scale from camera distance, in `[0.3, 1.0]`.
    pub scale: f32,
}

/// Selected planet and the last record published for it.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub target: Option<Entity>,
    pub record: Option<SelectionRecord>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.target = None;
        self.record = None;
    }
}

/// Published whenever the selection is set, refreshed or cleared.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct SelectionChanged(pub Option<SelectionRecord>);

/// Distance along `ray` to the first intersection with a sphere.
///
/// A ray starting inside the sphere reports the exit point. `None` when the
/// sphere is missed or entirely behind the ray.
pub fn ray_sphere_intersection(ray: &Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = ray.origin - center;
    let b = to_origin.dot(*ray.direction);
    let c = to_origin.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Nearest sphere hit by `ray` among `(entity, center, radius)` candidates.
pub fn pick_nearest(
    ray: &Ray3d,
    candidates: impl IntoIterator<Item = (Entity, Vec3, f32)>,
) -> Option<(Entity, f32)> {
    candidates
        .into_iter()
        .filter_map(|(entity, center, radius)| {
            ray_sphere_intersection(ray, center, radius).map(|distance| (entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Where a ray crosses the `z = 0` plane, if it does so in front of its origin.
pub fn intersect_view_plane(ray: &Ray3d) -> Option<Vec3> {
    if ray.direction.z.abs() < f32::EPSILON {
        return None;
    }
    let distance = -ray.origin.z / ray.direction.z;
    (distance >= 0.0).then(|| ray.get_point(distance))
}

/// Overlay card scale for a planet `distance` away from the camera.
pub fn card_scale(distance: f32) -> f32 {
    (CARD_REFERENCE_DISTANCE / distance.max(f32::EPSILON)).clamp(CARD_SCALE_MIN, CARD_SCALE_MAX)
}

/// Build the record for a planet seen from `pose`.
///
/// Off-screen planets keep `fallback` as their screen position.
pub fn selection_record(
    pose: &CameraPose,
    viewport: &Viewport,
    center: Vec3,
    dataset: &DatasetMetadata,
    fallback: Vec2,
) -> SelectionRecord {
    SelectionRecord {
        dataset: dataset.clone(),
        screen_position: pose.world_to_screen(center, viewport).unwrap_or(fallback),
        scale: card_scale(pose.eye.distance(center)),
    }
}

/// Plugin providing planet hover, click selection and selection tracking.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoveredPlanet>()
            .init_resource::<CursorHint>()
            .init_resource::<Selection>()
            .add_message::<SelectionChanged>()
            .add_systems(
                Update,
                (update_hover, handle_clicks, close_selection)
                    .chain()
                    .in_set(FrameSet::Input),
            )
            .add_systems(Update, track_selection.in_set(FrameSet::Selection));
    }
}

fn planet_candidates<'a>(
    planets: &'a Query<(Entity, &Transform, &Planet, &DatasetMetadata)>,
) -> impl Iterator<Item = (Entity, Vec3, f32)> + 'a {
    planets
        .iter()
        .map(|(entity, transform, planet, _)| (entity, transform.translation, planet.radius))
}

/// Set a planet's emissive intensity on its material.
fn set_emissive(
    entity: Entity,
    intensity: f32,
    planets: &Query<(Entity, &Transform, &Planet, &DatasetMetadata)>,
    handles: &Query<&MeshMaterial3d<StandardMaterial>, With<Planet>>,
    materials: &mut Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Ok((_, _, planet, _)), Ok(handle)) = (planets.get(entity), handles.get(entity)) else {
        return;
    };
    if let Some(material) = materials.as_mut().and_then(|m| m.get_mut(&handle.0)) {
        material.emissive = planet.emissive_at(intensity);
    }
}

/// Highlight the planet under the pointer.
pub fn update_hover(
    listeners: Option<Res<Listeners>>,
    viewport: Res<Viewport>,
    pose: Res<CameraPose>,
    mut moves: MessageReader<PointerMoved>,
    planets: Query<(Entity, &Transform, &Planet, &DatasetMetadata)>,
    handles: Query<&MeshMaterial3d<StandardMaterial>, With<Planet>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
    mut hovered: ResMut<HoveredPlanet>,
    mut cursor: ResMut<CursorHint>,
) {
    if !listeners.is_some_and(|l| l.pointer_move) {
        moves.clear();
        return;
    }
    let Some(last) = moves.read().last() else {
        return;
    };

    let ndc = viewport.to_ndc(last.position);
    let hit = pose
        .ray_from_ndc(ndc, &viewport)
        .and_then(|ray| pick_nearest(&ray, planet_candidates(&planets)))
        .map(|(entity, _)| entity);

    if hit == hovered.entity {
        return;
    }

    if let Some(previous) = hovered.entity {
        set_emissive(previous, EMISSIVE_IDLE, &planets, &handles, &mut materials);
    }
    if let Some(current) = hit {
        set_emissive(current, EMISSIVE_HOVER, &planets, &handles, &mut materials);
    }

    debug!("Hover changed: {:?} -> {:?}", hovered.entity, hit);
    hovered.entity = hit;
    *cursor = if hit.is_some() {
        CursorHint::Interactive
    } else {
        CursorHint::Default
    };
}

/// Select the clicked planet, or clear the selection on empty space.
pub fn handle_clicks(
    listeners: Option<Res<Listeners>>,
    viewport: Res<Viewport>,
    pose: Res<CameraPose>,
    mut clicks: MessageReader<PointerClicked>,
    planets: Query<(Entity, &Transform, &Planet, &DatasetMetadata)>,
    mut selection: ResMut<Selection>,
    mut changes: MessageWriter<SelectionChanged>,
    mut bursts: MessageWriter<SpawnBurstEvent>,
) {
    if !listeners.is_some_and(|l| l.click) {
        clicks.clear();
        return;
    }

    for click in clicks.read() {
        let Some(ray) = pose.ray_from_ndc(viewport.to_ndc(click.position), &viewport) else {
            continue;
        };

        let hit = pick_nearest(&ray, planet_candidates(&planets))
            .and_then(|(entity, _)| planets.get(entity).ok());

        match hit {
            Some((entity, transform, _, dataset)) => {
                let center = transform.translation;
                let record = selection_record(&pose, &viewport, center, dataset, click.position);
                info!("Selected dataset '{}'", dataset.name);

                selection.target = Some(entity);
                selection.record = Some(record.clone());
                changes.write(SelectionChanged(Some(record)));
                bursts.write(SpawnBurstEvent {
                    position: center,
                    kind: BurstKind::PlanetPing,
                });
            }
            None => {
                if selection.target.is_some() {
                    debug!("Selection cleared by empty click");
                }
                selection.clear();
                changes.write(SelectionChanged(None));
                if let Some(position) = intersect_view_plane(&ray) {
                    bursts.write(SpawnBurstEvent {
                        position,
                        kind: BurstKind::Ripple,
                    });
                }
            }
        }
    }
}

/// Dismiss the selection when the overlay asks for it.
pub fn close_selection(
    mut requests: MessageReader<CloseSelection>,
    mut selection: ResMut<Selection>,
    mut changes: MessageWriter<SelectionChanged>,
) {
    if requests.read().count() == 0 {
        return;
    }
    debug!("Selection closed by overlay");
    selection.clear();
    changes.write(SelectionChanged(None));
}

/// Re-project the selected planet and republish its record.
pub fn track_selection(
    viewport: Res<Viewport>,
    pose: Res<CameraPose>,
    planets: Query<(Entity, &Transform, &Planet, &DatasetMetadata)>,
    mut selection: ResMut<Selection>,
    mut changes: MessageWriter<SelectionChanged>,
) {
    let Some(target) = selection.target else {
        return;
    };

    let Ok((_, transform, _, dataset)) = planets.get(target) else {
        warn!("Selected planet {:?} no longer exists", target);
        selection.clear();
        changes.write(SelectionChanged(None));
        return;
    };

    let fallback = selection
        .record
        .as_ref()
        .map(|r| r.screen_position)
        .unwrap_or(Vec2::ZERO);
    let record = selection_record(&pose, &viewport, transform.translation, dataset, fallback);
    selection.record = Some(record.clone());
    changes.write(SelectionChanged(Some(record)));
}
