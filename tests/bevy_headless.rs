//! Headless Bevy tests.
//!
//! These run the backdrop plugin with asset storage but no renderer or
//! window, driving it through host messages the way a page would.

mod common;

use approx::assert_relative_eq;
use bevy::prelude::*;
use common::*;

use orbital_backdrop::asteroid::Asteroid;
use orbital_backdrop::background::{AMBIENT_COLOR, STAR_SCALE, Star, StarField};
use orbital_backdrop::camera::{
    CameraPose, CameraRig, FOG_COLOR, FOG_DENSITY, MainCamera, flight_eye,
};
use orbital_backdrop::collision::CONTACT_THRESHOLD;
use orbital_backdrop::config::DeviceClass;
use orbital_backdrop::effects::{BurstKind, BurstParticle, ParticleBurst};
use orbital_backdrop::fleet::Spacecraft;
use orbital_backdrop::input::{
    CloseSelection, Listeners, PageScrolled, PointerClicked, PointerMoved, Viewport, ViewportResized,
};
use orbital_backdrop::interaction::{CursorHint, HoveredPlanet, Selection};
use orbital_backdrop::planets::{
    DatasetMetadata, EMISSIVE_HOVER, Moon, Planet, PlanetRing, hex_color,
};
use orbital_backdrop::sun::{SunLayer, SunMaterial};
use orbital_backdrop::types::{SceneClock, SceneEntity};
use orbital_backdrop::{BackdropPhase, SceneConfig};

fn bursts_of(app: &mut App, kind: BurstKind) -> usize {
    let mut query = app.world_mut().query::<&ParticleBurst>();
    query.iter(app.world()).filter(|b| b.kind == kind).count()
}

fn screen_center(app: &App) -> Vec2 {
    let viewport = app.world().resource::<Viewport>();
    Vec2::new(viewport.width * 0.5, viewport.height * 0.5)
}

/// Mount, pin one planet at the origin and hover it at the screen center.
fn mount_with_centered_planet(config: SceneConfig) -> (App, Entity) {
    let mut app = headless_app(config);
    mount(&mut app);
    let target = entities::<Planet>(&mut app)[0];
    isolate_planet_at_origin(&mut app, target);
    app.update();

    let center = screen_center(&app);
    app.world_mut().write_message(PointerMoved { position: center });
    app.update();
    (app, target)
}

fn click(app: &mut App, position: Vec2) {
    app.world_mut().write_message(PointerClicked { position });
    app.update();
}

#[test]
fn test_unmounted_scene_is_empty() {
    let mut app = headless_app(mobile_landing());
    app.update();

    assert_eq!(
        *app.world().resource::<State<BackdropPhase>>().get(),
        BackdropPhase::Unmounted
    );
    assert_eq!(count::<SceneEntity>(&mut app), 0);
    assert!(app.world().get_resource::<Listeners>().is_none());
    assert_eq!(app.world().resource::<SceneClock>().frame, 0);
}

#[test]
fn test_mount_spawns_desktop_scene() {
    let config = SceneConfig::landing()
        .with_device(DeviceClass::Desktop)
        .with_seed(7);
    let mut app = headless_app(config);
    mount(&mut app);

    assert_eq!(count::<MainCamera>(&mut app), 1);
    assert_eq!(count::<Star>(&mut app), 8000);
    assert_eq!(count::<SunLayer>(&mut app), 3);
    assert_eq!(count::<Planet>(&mut app), 6);
    assert_eq!(count::<Moon>(&mut app), 2);
    assert_eq!(count::<PlanetRing>(&mut app), 2);
    assert_eq!(count::<Asteroid>(&mut app), 40);
    assert_eq!(count::<Spacecraft>(&mut app), 12);

    let listeners = app.world().resource::<Listeners>();
    assert!(listeners.pointer_move && listeners.scroll && listeners.resize);
    assert!(listeners.click);
}

#[test]
fn test_mobile_halves_pools() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    assert_eq!(count::<Star>(&mut app), 4000);
    assert_eq!(count::<Asteroid>(&mut app), 20);
    assert_eq!(count::<Spacecraft>(&mut app), 6);
    // Planets are not scaled
    assert_eq!(count::<Planet>(&mut app), 6);
}

#[test]
fn test_every_planet_carries_dataset() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let mut query = app.world_mut().query::<(&Planet, &DatasetMetadata)>();
    let mut names: Vec<String> = query
        .iter(app.world())
        .map(|(_, dataset)| dataset.name.clone())
        .collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 6);
}

#[test]
fn test_teardown_releases_scene() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);
    run_frames(&mut app, 5);

    // Leave a ripple in flight
    click(&mut app, Vec2::new(2.0, 2.0));
    assert!(count::<ParticleBurst>(&mut app) > 0);

    unmount(&mut app);

    assert_eq!(count::<SceneEntity>(&mut app), 0);
    assert_eq!(count::<BurstParticle>(&mut app), 0);
    assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
    assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 0);
    assert_eq!(app.world().resource::<Assets<SunMaterial>>().len(), 0);
    assert!(app.world().get_resource::<Listeners>().is_none());

    let frame = app.world().resource::<SceneClock>().frame;
    run_frames(&mut app, 10);
    assert_eq!(app.world().resource::<SceneClock>().frame, frame);
}

#[test]
fn test_remount_rebuilds_same_scene() {
    fn asteroid_positions(app: &mut App) -> Vec<Vec3> {
        let mut query = app.world_mut().query::<(&Asteroid, &Transform)>();
        let mut positions: Vec<Vec3> = query.iter(app.world()).map(|(_, t)| t.translation).collect();
        positions.sort_by(|a, b| a.x.total_cmp(&b.x));
        positions
    }

    let mut app = headless_app(mobile_landing());
    mount(&mut app);
    let first = asteroid_positions(&mut app);
    let entity_count = count::<SceneEntity>(&mut app);

    unmount(&mut app);
    mount(&mut app);

    assert_eq!(count::<SceneEntity>(&mut app), entity_count);
    assert_eq!(asteroid_positions(&mut app), first);
    assert_eq!(app.world().resource::<SceneClock>().frame, 1);
}

#[test]
fn test_thousand_frames_advance_one_radian() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let target = entities::<Planet>(&mut app)[0];
    {
        let mut planet = app.world_mut().get_mut::<Planet>(target).unwrap();
        planet.initial_angle = 0.0;
        planet.angle = 0.0;
        planet.orbital_speed = 0.001;
    }

    run_frames(&mut app, 1000);

    let planet = app.world().get::<Planet>(target).unwrap();
    assert_relative_eq!(planet.angle, 1.0, epsilon = 1e-3);
}

#[test]
fn test_clock_advances_fixed_step() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);
    run_frames(&mut app, 99);

    let clock = app.world().resource::<SceneClock>();
    assert_eq!(clock.frame, 100);
    assert_relative_eq!(clock.time, 1.0, epsilon = 1e-4);
}

#[test]
fn test_colliding_pair_swaps_and_explodes() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let craft = entities::<Spacecraft>(&mut app);
    for (i, &entity) in craft.iter().enumerate() {
        let mut entity = app.world_mut().entity_mut(entity);
        entity.get_mut::<Spacecraft>().unwrap().velocity = Vec3::ZERO;
        entity.get_mut::<Transform>().unwrap().translation =
            Vec3::new(-1000.0 + 300.0 * i as f32, -1000.0, -1000.0);
    }
    let (a, b) = (craft[0], craft[1]);
    {
        let mut entity = app.world_mut().entity_mut(a);
        entity.get_mut::<Spacecraft>().unwrap().velocity = Vec3::X;
        entity.get_mut::<Transform>().unwrap().translation = Vec3::new(995.0, 1000.0, 1000.0);
    }
    {
        let mut entity = app.world_mut().entity_mut(b);
        entity.get_mut::<Spacecraft>().unwrap().velocity = Vec3::NEG_X;
        entity.get_mut::<Transform>().unwrap().translation = Vec3::new(1005.0, 1000.0, 1000.0);
    }

    app.update();

    let velocity_a = app.world().get::<Spacecraft>(a).unwrap().velocity;
    let velocity_b = app.world().get::<Spacecraft>(b).unwrap().velocity;
    assert!((velocity_a - Vec3::NEG_X).length() < 0.2);
    assert!((velocity_b - Vec3::X).length() < 0.2);

    let position_a = app.world().get::<Transform>(a).unwrap().translation;
    let position_b = app.world().get::<Transform>(b).unwrap().translation;
    assert!(position_a.distance(position_b) > CONTACT_THRESHOLD);

    // Noses turn onto the swapped headings
    for (entity, velocity) in [(a, velocity_a), (b, velocity_b)] {
        let nose = app.world().get::<Transform>(entity).unwrap().rotation * Vec3::Y;
        assert!(nose.distance(velocity.normalize()) < 1e-4);
    }

    assert_eq!(bursts_of(&mut app, BurstKind::Explosion), 1);
    assert_eq!(count::<ParticleBurst>(&mut app), 1);
}

#[test]
fn test_burst_removed_with_assets_after_max_age() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let meshes_before = app.world().resource::<Assets<Mesh>>().len();
    let materials_before = app.world().resource::<Assets<StandardMaterial>>().len();

    click(&mut app, Vec2::new(2.0, 2.0));
    assert_eq!(bursts_of(&mut app, BurstKind::Ripple), 1);
    assert_eq!(count::<BurstParticle>(&mut app), 30);
    assert_eq!(app.world().resource::<Assets<Mesh>>().len(), meshes_before + 1);

    run_frames(&mut app, 45);

    assert_eq!(count::<ParticleBurst>(&mut app), 0);
    assert_eq!(count::<BurstParticle>(&mut app), 0);
    assert_eq!(app.world().resource::<Assets<Mesh>>().len(), meshes_before);
    assert_eq!(
        app.world().resource::<Assets<StandardMaterial>>().len(),
        materials_before
    );
}

#[test]
fn test_hover_highlights_planet() {
    let (mut app, target) = mount_with_centered_planet(mobile_landing());

    assert_eq!(app.world().resource::<HoveredPlanet>().entity, Some(target));
    assert_eq!(*app.world().resource::<CursorHint>(), CursorHint::Interactive);

    let planet = app.world().get::<Planet>(target).unwrap().clone();
    let handle = app
        .world()
        .get::<MeshMaterial3d<StandardMaterial>>(target)
        .unwrap()
        .0
        .clone();
    let material = app
        .world()
        .resource::<Assets<StandardMaterial>>()
        .get(&handle)
        .unwrap();
    assert_eq!(material.emissive, planet.emissive_at(EMISSIVE_HOVER));

    // Moving off the planet restores the default cursor
    app.world_mut().write_message(PointerMoved {
        position: Vec2::new(2.0, 2.0),
    });
    app.update();
    assert_eq!(app.world().resource::<HoveredPlanet>().entity, None);
    assert_eq!(*app.world().resource::<CursorHint>(), CursorHint::Default);
}

#[test]
fn test_click_selects_planet() {
    let (mut app, target) = mount_with_centered_planet(mobile_landing());
    let center = screen_center(&app);
    click(&mut app, center);

    assert_eq!(app.world().resource::<Selection>().target, Some(target));
    assert_eq!(bursts_of(&mut app, BurstKind::PlanetPing), 1);

    let dataset = app.world().get::<DatasetMetadata>(target).unwrap().clone();
    let planet_center = app.world().get::<Transform>(target).unwrap().translation;
    let pose = *app.world().resource::<CameraPose>();
    let expected = pose.world_to_screen(planet_center, &Viewport::default()).unwrap();

    let log = app.world().resource::<SelectionLog>();
    let record = log.last().unwrap().as_ref().unwrap();
    assert_eq!(record.dataset, dataset);
    // Near the center, where the planet sits
    assert!(record.screen_position.distance(center) < 5.0);
    assert_relative_eq!(record.screen_position.x, expected.x, epsilon = 0.5);
    assert_relative_eq!(record.screen_position.y, expected.y, epsilon = 0.5);
    assert_relative_eq!(
        record.scale,
        500.0 / pose.eye.distance(planet_center),
        epsilon = 1e-3
    );

    // The record is republished every frame while selected
    let published = log.0.len();
    app.update();
    assert!(app.world().resource::<SelectionLog>().0.len() > published);
}

#[test]
fn test_empty_click_clears_and_ripples() {
    let (mut app, _) = mount_with_centered_planet(mobile_landing());
    let center = screen_center(&app);
    click(&mut app, center);
    assert!(app.world().resource::<Selection>().target.is_some());

    click(&mut app, Vec2::new(2.0, 2.0));

    assert_eq!(app.world().resource::<Selection>().target, None);
    assert_eq!(app.world().resource::<SelectionLog>().last(), Some(&None));
    assert_eq!(bursts_of(&mut app, BurstKind::Ripple), 1);
}

#[test]
fn test_close_selection_publishes_none() {
    let (mut app, _) = mount_with_centered_planet(mobile_landing());
    let center = screen_center(&app);
    click(&mut app, center);

    app.world_mut().write_message(CloseSelection);
    app.update();

    assert_eq!(app.world().resource::<Selection>().target, None);
    assert_eq!(app.world().resource::<SelectionLog>().last(), Some(&None));
}

#[test]
fn test_selection_dropped_when_planet_disappears() {
    let (mut app, target) = mount_with_centered_planet(mobile_landing());
    let center = screen_center(&app);
    click(&mut app, center);

    app.world_mut().entity_mut(target).despawn();
    app.update();

    assert_eq!(app.world().resource::<Selection>().target, None);
    assert_eq!(app.world().resource::<SelectionLog>().last(), Some(&None));
}

#[test]
fn test_static_route_ignores_clicks() {
    let config = SceneConfig::static_page()
        .with_device(DeviceClass::Mobile)
        .with_seed(42);
    let (mut app, _) = mount_with_centered_planet(config);
    assert!(!app.world().resource::<Listeners>().click);

    let center = screen_center(&app);
    click(&mut app, center);

    assert_eq!(app.world().resource::<Selection>().target, None);
    assert_eq!(count::<ParticleBurst>(&mut app), 0);
    assert!(app.world().resource::<SelectionLog>().0.is_empty());
}

#[test]
fn test_mount_without_asset_storage_spawns_nothing() {
    let mut app = bare_app(mobile_landing());
    mount(&mut app);
    run_frames(&mut app, 5);

    assert_eq!(count::<SceneEntity>(&mut app), 0);
    assert!(app.world().get_resource::<Listeners>().is_none());

    unmount(&mut app);
    assert_eq!(count::<SceneEntity>(&mut app), 0);
}

#[test]
fn test_mount_sets_ambient_fill_and_fog() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let ambient = app.world().resource::<GlobalAmbientLight>();
    assert_eq!(ambient.color, hex_color(AMBIENT_COLOR));

    let camera = entities::<MainCamera>(&mut app)[0];
    let fog = app.world().get::<DistanceFog>(camera).unwrap();
    assert_eq!(fog.color, hex_color(FOG_COLOR));
    assert!(matches!(
        fog.falloff,
        FogFalloff::Exponential { density } if density == FOG_DENSITY
    ));

    unmount(&mut app);
    let ambient = app.world().resource::<GlobalAmbientLight>();
    assert_eq!(ambient.color, GlobalAmbientLight::default().color);
}

#[test]
fn test_scroll_and_resize_drive_camera() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let camera = entities::<MainCamera>(&mut app)[0];
    let start_z = app.world().get::<Transform>(camera).unwrap().translation.z;
    assert_relative_eq!(start_z, 650.0, epsilon = 1e-3);

    let max_scroll = 2160.0;
    app.world_mut().write_message(ViewportResized {
        width: 1000.0,
        height: 500.0,
    });
    app.world_mut().write_message(PageScrolled {
        scroll_y: max_scroll,
        max_scroll,
    });

    let mut last_scroll = 0.0;
    let mut last_z = start_z;
    for _ in 0..60 {
        app.update();
        let scroll = app.world().resource::<CameraRig>().scroll.current;
        let z = app.world().get::<Transform>(camera).unwrap().translation.z;
        assert!(scroll > last_scroll && scroll < 1.0);
        assert!(z < last_z);
        assert_relative_eq!(z, flight_eye(scroll).z, epsilon = 1e-2);
        last_scroll = scroll;
        last_z = z;
    }

    // 1 - 0.95^60 of the way to the bottom of the page
    assert!(last_scroll > 0.95);
    assert!(last_z < 210.0 && last_z > 180.0);

    let viewport = app.world().resource::<Viewport>();
    assert_eq!((viewport.width, viewport.height), (1000.0, 500.0));
}

#[test]
fn test_host_messages_dropped_without_listeners() {
    let mut app = bare_app(mobile_landing());
    mount(&mut app);

    app.world_mut().write_message(PageScrolled {
        scroll_y: 500.0,
        max_scroll: 1000.0,
    });
    app.world_mut().write_message(ViewportResized {
        width: 300.0,
        height: 200.0,
    });
    run_frames(&mut app, 3);

    assert_eq!(app.world().resource::<CameraRig>().scroll.target, 0.0);
    assert_eq!(*app.world().resource::<Viewport>(), Viewport::default());
}

#[test]
fn test_asteroid_reflects_and_craft_wraps() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let asteroid = entities::<Asteroid>(&mut app)[0];
    {
        let mut entity = app.world_mut().entity_mut(asteroid);
        entity.get_mut::<Asteroid>().unwrap().velocity = Vec3::new(0.05, 0.0, 0.0);
        entity.get_mut::<Transform>().unwrap().translation = Vec3::new(1000.5, 0.0, 0.0);
    }
    // Spread the fleet out so no contact interferes
    let fleet = entities::<Spacecraft>(&mut app);
    for (i, &other) in fleet.iter().enumerate() {
        let mut entity = app.world_mut().entity_mut(other);
        entity.get_mut::<Spacecraft>().unwrap().velocity = Vec3::ZERO;
        entity.get_mut::<Transform>().unwrap().translation =
            Vec3::new(-600.0, 200.0 * i as f32 - 500.0, 0.0);
    }
    let craft = fleet[0];
    {
        let mut entity = app.world_mut().entity_mut(craft);
        entity.get_mut::<Spacecraft>().unwrap().velocity = Vec3::X;
        entity.get_mut::<Transform>().unwrap().translation = Vec3::new(1199.5, 0.0, 0.0);
    }

    app.update();

    // The asteroid turns back on the x axis only
    let velocity = app.world().get::<Asteroid>(asteroid).unwrap().velocity;
    assert_eq!(velocity, Vec3::new(-0.05, 0.0, 0.0));
    let x = app.world().get::<Transform>(asteroid).unwrap().translation.x;
    app.update();
    assert!(app.world().get::<Transform>(asteroid).unwrap().translation.x < x);

    // The craft left through +x one frame ago and now re-enters from -x
    let position = app.world().get::<Transform>(craft).unwrap().translation;
    assert_relative_eq!(position.x, -1199.0, epsilon = 1e-3);
    assert_eq!(app.world().get::<Spacecraft>(craft).unwrap().velocity, Vec3::X);
}

#[test]
fn test_starfield_rotates_and_twinkles() {
    let mut app = headless_app(mobile_landing());
    mount(&mut app);

    let field = entities::<StarField>(&mut app)[0];
    let start = app.world().get::<Transform>(field).unwrap().rotation;

    let sizes = |app: &mut App| -> Vec<f32> {
        let mut query = app.world_mut().query::<&Star>();
        query.iter(app.world()).map(|star| star.size).collect()
    };
    let before = sizes(&mut app);

    run_frames(&mut app, 200);

    let rotation = app.world().get::<Transform>(field).unwrap().rotation;
    assert!(rotation.angle_between(start) > 0.01);

    let after = sizes(&mut app);
    let changed = before.iter().zip(&after).filter(|(a, b)| a != b).count();
    assert!(changed > 100, "only {changed} stars twinkled");

    let mut query = app.world_mut().query::<(&Star, &Transform)>();
    for (star, transform) in query.iter(app.world()) {
        assert!((1.0..=6.0).contains(&star.size));
        assert_relative_eq!(transform.scale.x, star.size * STAR_SCALE, epsilon = 1e-5);
    }
}
