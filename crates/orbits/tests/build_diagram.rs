use geometry::MILLIMETERS_TO_POINTS as MM;
use glam::DVec2;
use orbits::{build_diagram, DiagramConfig, DiagramError, OrbitSource, OrbitSpec, OrbitWarning};
use scene_graph::{Item, LayerId, SceneGraph, TextPath};

fn assert_close(a: DVec2, b: DVec2) {
    assert!((a - b).length() < 1e-6, "expected {b:?}, got {a:?}");
}

fn add_layer(scene: &mut SceneGraph, parent: LayerId, name: &str, items: Vec<Item>) -> LayerId {
    let layer = scene.create_named_layer(parent, name).unwrap();
    for item in items {
        scene.layer_mut(layer).unwrap().push_item(item);
    }
    layer
}

/// An A4-sized template with a 10x10 curve and small glyphs.
fn template(title: Vec<Item>) -> SceneGraph {
    let mut scene = SceneGraph::new();
    let root = scene.root();

    let prototypes = add_layer(&mut scene, root, "OrbitsPrototype", vec![]);
    add_layer(
        &mut scene,
        prototypes,
        "Curve",
        vec![Item::ellipse(DVec2::new(-300.0, 0.0), DVec2::new(5.0, 5.0))],
    );
    let glyph = || vec![Item::rect(DVec2::new(-400.0, 0.0), DVec2::new(2.0, 6.0))];
    add_layer(&mut scene, prototypes, "PrimaryAnchor", glyph());
    add_layer(&mut scene, prototypes, "SecondaryAnchor", glyph());
    add_layer(&mut scene, prototypes, "Segment", glyph());
    add_layer(&mut scene, prototypes, "Title", title);

    add_layer(
        &mut scene,
        root,
        "Background",
        vec![Item::rect(DVec2::ZERO, DVec2::new(595.0, 842.0))],
    );
    scene
}

fn title_frame() -> Vec<Item> {
    vec![Item::text(TextPath::new(
        "Title",
        DVec2::new(-500.0, 0.0),
        DVec2::new(20.0, 20.0),
    ))]
}

struct FailingSource;

impl OrbitSource for FailingSource {
    fn load_orbits(&mut self) -> Result<Vec<OrbitSpec>, DiagramError> {
        Err(DiagramError::InputParse("unexpected end of input".into()))
    }
}

#[test]
fn test_builds_one_layer_per_orbit() {
    let mut scene = template(title_frame());
    let mut orbits = vec![
        OrbitSpec::new("Inner", 50.0, 30.0).with_title_angle(90.0),
        OrbitSpec::new("Outer", 80.0, 60.0).with_zero_delta(15.0),
    ];

    let report = build_diagram(Some(&mut scene), &mut orbits, &DiagramConfig::default()).unwrap();

    assert_close(report.center, DVec2::new(297.5, 421.0));
    assert_eq!(report.warnings().count(), 0);
    assert_eq!(scene.children(scene.root())[0], report.orbits_layer);
    assert_eq!(scene.layer(report.orbits_layer).unwrap().name(), "Orbits");

    let titles: Vec<&str> = report.orbits.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, ["Inner", "Outer"]);
    // Later orbits stack in front of earlier ones.
    assert_eq!(
        scene.children(report.orbits_layer),
        &[report.orbits[1].layer, report.orbits[0].layer]
    );
    for outcome in &report.orbits {
        assert_eq!(scene.parent(outcome.layer), Some(report.orbits_layer));
        let curve = scene.find_layer_by_name(outcome.layer, "Curve").unwrap();
        assert_close(scene.center(curve), report.center);
    }

    let inner = report.orbits[0].layer;
    let anchors = scene.find_layer_by_name(inner, "Anchors").unwrap();
    let primary = scene
        .children(anchors)
        .iter()
        .copied()
        .find(|&id| scene.layer(id).unwrap().name() == "PrimaryAnchor")
        .unwrap();
    assert_close(scene.center(primary), report.center + DVec2::new(50.0 * MM, 0.0));
}

#[test]
fn test_prototypes_are_untouched() {
    let mut scene = template(title_frame());
    let prototypes = scene
        .find_layer_by_name(scene.root(), "OrbitsPrototype")
        .unwrap();
    let before = scene.bounds(prototypes);
    let items = scene.item_count(prototypes);

    let mut orbits = vec![OrbitSpec::new("Inner", 50.0, 30.0).with_rotation(30.0)];
    build_diagram(Some(&mut scene), &mut orbits, &DiagramConfig::default()).unwrap();

    assert_eq!(scene.bounds(prototypes), before);
    assert_eq!(scene.item_count(prototypes), items);
}

#[test]
fn test_empty_orbit_list() {
    let mut scene = template(title_frame());
    let mut orbits = Vec::new();

    let report = build_diagram(Some(&mut scene), &mut orbits, &DiagramConfig::default()).unwrap();

    assert!(report.orbits.is_empty());
    assert!(scene.children(report.orbits_layer).is_empty());
    assert_eq!(scene.item_count(report.orbits_layer), 0);
}

#[test]
fn test_missing_title_text_is_recovered() {
    let mut scene = template(vec![]);
    let mut orbits = vec![OrbitSpec::new("Inner", 50.0, 30.0)];

    let report = build_diagram(Some(&mut scene), &mut orbits, &DiagramConfig::default()).unwrap();

    let warnings: Vec<&OrbitWarning> = report.warnings().collect();
    assert!(matches!(
        warnings.as_slice(),
        [OrbitWarning::MissingTextElement { .. }]
    ));
    let orbit = report.orbits[0].layer;
    for name in ["Curve", "Anchors", "Segments", "Title"] {
        assert!(scene.find_layer_by_name(orbit, name).is_some(), "{name} missing");
    }
    let title = scene.find_layer_by_name(orbit, "Title").unwrap();
    assert_eq!(scene.item_count(title), 0);
}

#[test]
fn test_no_document() {
    let mut orbits = vec![OrbitSpec::new("Inner", 50.0, 30.0)];
    assert!(matches!(
        build_diagram(None, &mut orbits, &DiagramConfig::default()),
        Err(DiagramError::NoActiveDocument)
    ));
}

#[test]
fn test_fatal_errors_leave_document_unchanged() {
    let mut scene = template(title_frame());
    let layers = scene.len();

    let result = build_diagram(Some(&mut scene), &mut FailingSource, &DiagramConfig::default());
    assert!(matches!(result, Err(DiagramError::InputParse(_))));
    assert_eq!(scene.len(), layers);

    let mut config = DiagramConfig::default();
    config.layers.primary_anchor = "Star".into();
    let mut orbits = vec![OrbitSpec::new("Inner", 50.0, 30.0)];
    let result = build_diagram(Some(&mut scene), &mut orbits, &config);
    assert!(matches!(
        result,
        Err(DiagramError::PrototypeNotFound { name }) if name == "Star"
    ));
    assert_eq!(scene.len(), layers);
}
