use spiderfy_core::{
    Channel, ClickOutcome, LatLng, LayerPoint, LayoutKind, MapEvent, MapHost, MarkerEvent,
    Notification, SPIDERFIED_Z_OFFSET, SpiderState, Spiderfier, SpiderfyOptions, centroid,
    circle_points, foot_points, layer_point, spiral_points, squared_distance,
};
use spiderfy_headless::{HeadlessMap, MarkerId};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Click(MarkerId, LatLng),
    Spiderfy(Vec<MarkerId>, Vec<MarkerId>),
    Unspiderfy(Vec<MarkerId>, Vec<MarkerId>),
}

fn record(engine: &mut Spiderfier<HeadlessMap>) -> Rc<RefCell<Vec<Seen>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for channel in [Channel::Click, Channel::Spiderfy, Channel::Unspiderfy] {
        let log = log.clone();
        engine.add_listener(channel, move |n| {
            let seen = match n {
                Notification::Click { marker, position } => Seen::Click((*marker).clone(), *position),
                Notification::Spiderfy {
                    markers,
                    non_nearby,
                } => Seen::Spiderfy(markers.to_vec(), non_nearby.to_vec()),
                Notification::Unspiderfy {
                    markers,
                    non_nearby,
                } => Seen::Unspiderfy(markers.to_vec(), non_nearby.to_vec()),
            };
            log.borrow_mut().push(seen);
        });
    }
    log
}

/// Map centered on (0, 0) at zoom 10; one degree of longitude is ~728px there.
fn setup(
    markers: &[(&str, f64, f64)],
    options: SpiderfyOptions,
) -> (HeadlessMap, Spiderfier<HeadlessMap>, Vec<MarkerId>) {
    let mut map = HeadlessMap::new(LatLng::new(0.0, 0.0), 10.0);
    let mut engine = Spiderfier::new(&mut map, options);
    let mut ids = Vec::new();
    for (name, lat, lng) in markers {
        let id = map.add_marker(*name, LatLng::new(*lat, *lng), 0).unwrap();
        engine.add_marker(&mut map, id.clone());
        ids.push(id);
    }
    (map, engine, ids)
}

fn id(name: &str) -> MarkerId {
    MarkerId::from(name)
}

fn position(map: &HeadlessMap, name: &str) -> LatLng {
    map.marker(&id(name)).unwrap().position
}

fn z(map: &HeadlessMap, name: &str) -> i32 {
    map.marker(&id(name)).unwrap().z_index_offset
}

#[test]
fn two_coincident_markers_spread_on_a_circle() {
    let (mut map, mut engine, _) =
        setup(&[("a", 0.0, 0.0), ("b", 0.0, 0.0)], SpiderfyOptions::default());
    let log = record(&mut engine);

    let outcome = map.click(&mut engine, &id("a"));
    assert_eq!(
        outcome,
        Some(ClickOutcome::Spiderfy {
            feet: 2,
            layout: LayoutKind::Circle
        })
    );
    assert_eq!(engine.state(), SpiderState::Spiderfied);
    assert_eq!(
        *log.borrow(),
        vec![Seen::Spiderfy(vec![id("a"), id("b")], vec![])]
    );
    assert_eq!(map.legs_on_map().count(), 2);

    let radius = 25.0 * 4.0 / TAU;
    let center = layer_point(0.0, 0.0);
    let pa = map.project(position(&map, "a"));
    let pb = map.project(position(&map, "b"));
    for p in [pa, pb] {
        assert!((squared_distance(p, center).sqrt() - radius).abs() < 1e-6);
    }
    // Opposite ends of the circle, first foot at 30 degrees.
    assert!((pa.x + pb.x).abs() < 1e-6 && (pa.y + pb.y).abs() < 1e-6);
    assert!((pa.y.atan2(pa.x) - TAU / 12.0).abs() < 1e-6);

    assert_eq!(z(&map, "a"), SPIDERFIED_Z_OFFSET);
    assert_eq!(z(&map, "b"), SPIDERFIED_Z_OFFSET);
    assert!(engine.is_spiderfied(&id("a")) && engine.is_spiderfied(&id("b")));

    for leg in map.legs_on_map() {
        assert_eq!(leg.path[0], LatLng::new(0.0, 0.0));
        assert_eq!(leg.style.color, "#222");
        assert_eq!(leg.style.weight, 1.5);
        assert!(!leg.style.interactive);
    }
}

#[test]
fn isolated_marker_click_is_a_plain_click() {
    let (mut map, mut engine, _) =
        setup(&[("a", 0.0, 0.0), ("far", 0.0, 1.0)], SpiderfyOptions::default());
    let log = record(&mut engine);

    let outcome = map.click(&mut engine, &id("a"));
    assert_eq!(outcome, Some(ClickOutcome::Click));
    assert_eq!(*log.borrow(), vec![Seen::Click(id("a"), LatLng::new(0.0, 0.0))]);
    assert_eq!(position(&map, "a"), LatLng::new(0.0, 0.0));
    assert_eq!(z(&map, "a"), 0);
    assert_eq!(engine.state(), SpiderState::Idle);
    assert_eq!(map.legs_on_map().count(), 0);
}

#[test]
fn ten_coincident_markers_use_the_spiral() {
    let names: Vec<String> = (0..10).map(|i| format!("m{i}")).collect();
    let markers: Vec<(&str, f64, f64)> = names.iter().map(|n| (n.as_str(), 0.0, 0.0)).collect();
    let (mut map, mut engine, ids) = setup(&markers, SpiderfyOptions::default());

    let outcome = map.click(&mut engine, &ids[3]);
    assert_eq!(
        outcome,
        Some(ClickOutcome::Spiderfy {
            feet: 10,
            layout: LayoutKind::Spiral
        })
    );

    // One-to-one: every marker landed on its own foot.
    let mut radii: Vec<f64> = ids
        .iter()
        .map(|m| {
            let p = map.project(map.marker(m).unwrap().position);
            squared_distance(p, layer_point(0.0, 0.0))
        })
        .collect();
    radii.sort_by(f64::total_cmp);
    for w in radii.windows(2) {
        assert!(w[1] > w[0] + 1e-6);
    }
    assert_eq!(map.legs_on_map().count(), 10);
}

#[test]
fn nine_markers_hit_the_switchover() {
    let names: Vec<String> = (0..9).map(|i| format!("m{i}")).collect();
    let markers: Vec<(&str, f64, f64)> = names.iter().map(|n| (n.as_str(), 0.0, 0.0)).collect();

    let (mut map, mut engine, ids) = setup(&markers, SpiderfyOptions::default());
    assert_eq!(
        map.click(&mut engine, &ids[0]),
        Some(ClickOutcome::Spiderfy {
            feet: 9,
            layout: LayoutKind::Spiral
        })
    );

    let (mut map, mut engine, ids) = setup(&markers[..8], SpiderfyOptions::default());
    assert_eq!(
        map.click(&mut engine, &ids[0]),
        Some(ClickOutcome::Spiderfy {
            feet: 8,
            layout: LayoutKind::Circle
        })
    );
}

#[test]
fn map_click_restores_positions_and_z_order() {
    let (mut map, mut engine, _) = setup(
        &[
            ("a", 0.0, 0.0),
            ("b", 0.000_01, 0.000_02),
            ("c", -0.000_02, 0.0),
            ("far", 2.0, 2.0),
        ],
        SpiderfyOptions::default(),
    );
    map.set_z_index_offset(&id("b"), 7);
    let before: Vec<(LatLng, i32)> = ["a", "b", "c", "far"]
        .iter()
        .map(|n| (position(&map, n), z(&map, n)))
        .collect();
    let log = record(&mut engine);

    map.click(&mut engine, &id("b"));
    assert_ne!(position(&map, "a"), before[0].0);
    assert_eq!(z(&map, "b"), 7 + SPIDERFIED_Z_OFFSET);

    assert!(map.fire_map(&mut engine, MapEvent::Click));
    let after: Vec<(LatLng, i32)> = ["a", "b", "c", "far"]
        .iter()
        .map(|n| (position(&map, n), z(&map, n)))
        .collect();
    assert_eq!(after, before);
    assert_eq!(map.legs_on_map().count(), 0);
    assert_eq!(engine.state(), SpiderState::Idle);
    assert_eq!(
        log.borrow().last(),
        Some(&Seen::Unspiderfy(
            vec![id("a"), id("b"), id("c")],
            vec![id("far")]
        ))
    );
}

#[test]
fn spiderfy_reports_non_nearby_markers() {
    let (mut map, mut engine, _) = setup(
        &[("near1", 0.0, 0.0), ("far", 0.0, 0.5), ("near2", 0.0, 0.0)],
        SpiderfyOptions::default(),
    );
    let log = record(&mut engine);
    map.click(&mut engine, &id("near2"));
    assert_eq!(
        *log.borrow(),
        vec![Seen::Spiderfy(
            vec![id("near1"), id("near2")],
            vec![id("far")]
        )]
    );
}

#[test]
fn unspiderfy_twice_is_unspiderfy_once() {
    let (mut map, mut engine, _) =
        setup(&[("a", 0.0, 0.0), ("b", 0.0, 0.0)], SpiderfyOptions::default());
    map.click(&mut engine, &id("a"));
    let log = record(&mut engine);

    assert!(engine.unspiderfy(&mut map, None));
    let restored = (position(&map, "a"), position(&map, "b"), z(&map, "a"));
    assert!(!engine.unspiderfy(&mut map, None));
    map.fire_map(&mut engine, MapEvent::Click);

    assert_eq!(log.borrow().len(), 1);
    assert_eq!(
        (position(&map, "a"), position(&map, "b"), z(&map, "a")),
        restored
    );
}

#[test]
fn zoom_end_collapses_the_cluster() {
    let (mut map, mut engine, _) =
        setup(&[("a", 0.0, 0.0), ("b", 0.0, 0.0)], SpiderfyOptions::default());
    map.click(&mut engine, &id("a"));
    map.set_zoom(&mut engine, 12.0);
    assert_eq!(engine.state(), SpiderState::Idle);
    assert_eq!(position(&map, "a"), LatLng::new(0.0, 0.0));
    assert_eq!(map.legs_on_map().count(), 0);
}

#[test]
fn removing_a_spiderfied_marker_collapses_first() {
    let (mut map, mut engine, _) = setup(
        &[("a", 0.0, 0.0), ("b", 0.0, 0.0), ("c", 0.0, 0.0)],
        SpiderfyOptions::default(),
    );
    map.click(&mut engine, &id("a"));
    assert_eq!(map.legs_on_map().count(), 3);

    engine.remove_marker(&mut map, &id("b"));
    assert_eq!(map.legs_on_map().count(), 0);
    assert_eq!(engine.state(), SpiderState::Idle);
    assert_eq!(position(&map, "b"), LatLng::new(0.0, 0.0));
    assert_eq!(z(&map, "b"), 0);
    assert_eq!(engine.markers(), vec![id("a"), id("c")]);
    assert_eq!(map.marker_subscription_count(&id("b"), MarkerEvent::Click), 0);
    assert_eq!(map.marker_subscription_count(&id("b"), MarkerEvent::MouseOver), 0);
}

#[test]
fn reclick_without_keep_collapses_and_restores_every_marker() {
    let (mut map, mut engine, _) =
        setup(&[("a", 0.0, 0.0), ("b", 0.0, 0.0)], SpiderfyOptions::default());
    map.click(&mut engine, &id("a"));
    let foot = position(&map, "a");
    let log = record(&mut engine);

    let outcome = map.click(&mut engine, &id("a"));
    assert_eq!(outcome, Some(ClickOutcome::Click));
    assert_eq!(engine.state(), SpiderState::Idle);
    assert_eq!(
        *log.borrow(),
        vec![
            Seen::Unspiderfy(vec![id("a"), id("b")], vec![]),
            Seen::Click(id("a"), foot),
        ]
    );
    assert_eq!(position(&map, "a"), LatLng::new(0.0, 0.0));
    assert_eq!(position(&map, "b"), LatLng::new(0.0, 0.0));
    assert_eq!(z(&map, "a"), 0);
    assert_eq!(map.legs_on_map().count(), 0);

    // Later collapses have nothing left to restore and leave "a" where it belongs.
    map.fire_map(&mut engine, MapEvent::Click);
    map.set_zoom(&mut engine, 11.0);
    assert_eq!(position(&map, "a"), LatLng::new(0.0, 0.0));

    // And "a" still clusters with "b" from its real position.
    assert!(matches!(
        map.click(&mut engine, &id("a")),
        Some(ClickOutcome::Spiderfy { feet: 2, .. })
    ));
}

#[test]
fn reclick_with_keep_leaves_the_cluster_spread() {
    let options = SpiderfyOptions {
        keep_spiderfied: true,
        ..Default::default()
    };
    let (mut map, mut engine, _) = setup(&[("a", 0.0, 0.0), ("b", 0.0, 0.0)], options);
    map.click(&mut engine, &id("a"));
    let foot = position(&map, "b");
    let log = record(&mut engine);

    let outcome = map.click(&mut engine, &id("b"));
    assert_eq!(outcome, Some(ClickOutcome::Click));
    assert_eq!(engine.state(), SpiderState::Spiderfied);
    assert_eq!(*log.borrow(), vec![Seen::Click(id("b"), foot)]);
    assert_eq!(map.legs_on_map().count(), 2);
    assert_eq!(z(&map, "b"), SPIDERFIED_Z_OFFSET);
}

#[test]
fn clicking_elsewhere_collapses_the_previous_cluster() {
    let (mut map, mut engine, _) = setup(
        &[("a", 0.0, 0.0), ("b", 0.0, 0.0), ("lonely", 1.0, 1.0)],
        SpiderfyOptions::default(),
    );
    map.click(&mut engine, &id("a"));
    let log = record(&mut engine);

    assert_eq!(map.click(&mut engine, &id("lonely")), Some(ClickOutcome::Click));
    assert_eq!(
        *log.borrow(),
        vec![
            Seen::Unspiderfy(vec![id("a"), id("b")], vec![id("lonely")]),
            Seen::Click(id("lonely"), LatLng::new(1.0, 1.0)),
        ]
    );
    assert_eq!(position(&map, "a"), LatLng::new(0.0, 0.0));
}

#[test]
fn markers_off_the_map_are_ignored() {
    let (mut map, mut engine, _) = setup(
        &[("a", 0.0, 0.0), ("hidden", 0.0, 0.0), ("far", 0.0, 3.0)],
        SpiderfyOptions::default(),
    );
    map.remove_from_map(&id("hidden")).unwrap();
    map.remove_from_map(&id("far")).unwrap();
    let log = record(&mut engine);

    assert_eq!(map.click(&mut engine, &id("a")), Some(ClickOutcome::Click));
    assert_eq!(*log.borrow(), vec![Seen::Click(id("a"), LatLng::new(0.0, 0.0))]);
    assert_eq!(position(&map, "hidden"), LatLng::new(0.0, 0.0));
}

#[test]
fn nearby_distance_bounds_the_cluster() {
    // ~7.3px apart at zoom 10.
    let markers = [("a", 0.0, 0.0), ("b", 0.0, 0.01)];

    let (mut map, mut engine, _) = setup(&markers, SpiderfyOptions::default());
    assert!(matches!(
        map.click(&mut engine, &id("a")),
        Some(ClickOutcome::Spiderfy { feet: 2, .. })
    ));

    let (mut map, mut engine, _) = setup(
        &markers,
        SpiderfyOptions {
            nearby_distance: 5.0,
            ..Default::default()
        },
    );
    assert_eq!(map.click(&mut engine, &id("a")), Some(ClickOutcome::Click));

    engine.options_mut().nearby_distance = 10.0;
    assert!(matches!(
        map.click(&mut engine, &id("a")),
        Some(ClickOutcome::Spiderfy { feet: 2, .. })
    ));
}

#[test]
fn hovering_recolors_the_leg() {
    let (mut map, mut engine, _) =
        setup(&[("a", 0.0, 0.0), ("b", 0.0, 0.0)], SpiderfyOptions::default());
    map.click(&mut engine, &id("a"));
    assert_eq!(map.marker_subscription_count(&id("a"), MarkerEvent::MouseOver), 1);
    assert_eq!(map.marker_subscription_count(&id("a"), MarkerEvent::MouseOut), 1);

    map.fire_marker(&mut engine, &id("a"), MarkerEvent::MouseOver);
    let colors = |map: &HeadlessMap| {
        let mut c: Vec<String> = map.legs_on_map().map(|l| l.style.color.clone()).collect();
        c.sort();
        c
    };
    assert_eq!(colors(&map), vec!["#222".to_string(), "#f00".to_string()]);

    map.fire_marker(&mut engine, &id("a"), MarkerEvent::MouseOut);
    assert_eq!(colors(&map), vec!["#222".to_string(), "#222".to_string()]);

    map.fire_map(&mut engine, MapEvent::Click);
    assert_eq!(map.marker_subscription_count(&id("a"), MarkerEvent::MouseOver), 0);
    assert_eq!(map.marker_subscription_count(&id("a"), MarkerEvent::MouseOut), 0);
}

#[test]
fn identical_leg_colors_skip_hover_listeners() {
    let mut options = SpiderfyOptions::default();
    options.leg_colors.highlighted = options.leg_colors.usual.clone();
    let (mut map, mut engine, _) = setup(&[("a", 0.0, 0.0), ("b", 0.0, 0.0)], options);
    map.click(&mut engine, &id("a"));
    assert_eq!(map.marker_subscription_count(&id("a"), MarkerEvent::MouseOver), 0);
    assert_eq!(
        map.fire_marker(&mut engine, &id("a"), MarkerEvent::MouseOver),
        None
    );
    assert!(map.legs_on_map().all(|l| l.style.color == "#222"));
}

/// Places markers at layer offsets (in px) from the view center at (0, 0), zoom 10.
fn setup_at_pixels(
    markers: &[(&str, LayerPoint)],
    options: SpiderfyOptions,
) -> (HeadlessMap, Spiderfier<HeadlessMap>) {
    let mut map = HeadlessMap::new(LatLng::new(0.0, 0.0), 10.0);
    let mut engine = Spiderfier::new(&mut map, options);
    for (name, px) in markers {
        let pos = map.unproject(*px);
        let id = map.add_marker(*name, pos, 0).unwrap();
        engine.add_marker(&mut map, id);
    }
    (map, engine)
}

fn assert_near(actual: LayerPoint, expected: LayerPoint) {
    assert!(
        squared_distance(actual, expected) < 1e-12,
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn circle_feet_go_to_the_nearest_remaining_marker() {
    // Circle of three from 30 degrees: feet point right-down, left-down and straight up
    // (layer y grows downwards). Registry order deliberately differs from foot order.
    let markers = [
        ("up", layer_point(0.0, -5.0)),
        ("left_down", layer_point(-4.0, 2.0)),
        ("right_down", layer_point(4.0, 2.0)),
    ];
    let (mut map, mut engine) = setup_at_pixels(&markers, SpiderfyOptions::default());
    let log = record(&mut engine);

    assert_eq!(
        map.click(&mut engine, &id("up")),
        Some(ClickOutcome::Spiderfy {
            feet: 3,
            layout: LayoutKind::Circle
        })
    );

    let body = centroid(&markers.map(|(_, p)| p));
    let feet = circle_points(3, body, 25.0, TAU / 12.0);
    let expected = ["right_down", "left_down", "up"];
    assert_eq!(
        *log.borrow(),
        vec![Seen::Spiderfy(expected.map(id).to_vec(), vec![])]
    );
    for (name, foot) in expected.iter().zip(&feet) {
        assert_near(map.project(position(&map, name)), *foot);
    }
}

#[test]
fn spiral_assigns_the_outermost_foot_first() {
    let opts = SpiderfyOptions::default();
    let (_, unit_feet) = foot_points(9, layer_point(0.0, 0.0), &opts);
    let outer = unit_feet[0];
    let len = squared_distance(outer, layer_point(0.0, 0.0)).sqrt();
    // 15px out along the outermost foot's direction, still inside the 20px radius.
    let outlier = layer_point(outer.x / len * 15.0, outer.y / len * 15.0);

    let names: Vec<String> = (0..8).map(|i| format!("m{i}")).collect();
    let mut markers: Vec<(&str, LayerPoint)> = names
        .iter()
        .map(|n| (n.as_str(), layer_point(0.0, 0.0)))
        .collect();
    markers.push(("outlier", outlier));
    let (mut map, mut engine) = setup_at_pixels(&markers, opts.clone());
    let log = record(&mut engine);

    assert_eq!(
        map.click(&mut engine, &id("m0")),
        Some(ClickOutcome::Spiderfy {
            feet: 9,
            layout: LayoutKind::Spiral
        })
    );

    let points: Vec<LayerPoint> = markers.iter().map(|(_, p)| *p).collect();
    let body = centroid(&points);
    let mut feet = spiral_points(
        9,
        body,
        opts.spiral_foot_separation,
        opts.spiral_length_start,
        opts.spiral_length_factor,
    );
    feet.reverse();

    let Seen::Spiderfy(order, non_nearby) = log.borrow()[0].clone() else {
        panic!("expected a spiderfy notification");
    };
    assert!(non_nearby.is_empty());
    assert_eq!(order[0], id("outlier"));
    // The rest tie at the origin, so they take the remaining feet in registry order.
    assert_eq!(&order[1..], &names.iter().map(|n| id(n)).collect::<Vec<_>>()[..]);
    for (marker, foot) in order.iter().zip(&feet) {
        assert_near(map.project(map.marker(marker).unwrap().position), *foot);
    }
}
