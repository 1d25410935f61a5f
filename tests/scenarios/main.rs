use cuetree::{
    BoxVisual, GraphStore, InteractionController, NoteDocument, VERSION,
    graph::EdgeKey,
};
use euclid::default::{Point2D, Rect, Size2D, Vector2D};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn scenarios_smoke_runs() {
    assert!(!VERSION.is_empty());
}

/// Shared-handle rendering double: the test keeps a clone, the controller
/// owns a boxed clone, both see the same state.
#[derive(Debug)]
struct VisualState {
    position: Point2D<f64>,
    size: Size2D<f64>,
    color: String,
    removed: bool,
}

#[derive(Clone)]
struct SharedVisual(Rc<RefCell<VisualState>>);

impl SharedVisual {
    fn new(position: Point2D<f64>) -> Self {
        Self(Rc::new(RefCell::new(VisualState {
            position,
            size: Size2D::new(80.0, 40.0),
            color: "#f5f0b5".to_string(),
            removed: false,
        })))
    }
}

impl BoxVisual for SharedVisual {
    fn position(&self) -> Point2D<f64> {
        self.0.borrow().position
    }
    fn set_position(&mut self, position: Point2D<f64>) {
        self.0.borrow_mut().position = position;
    }
    fn size(&self) -> Size2D<f64> {
        self.0.borrow().size
    }
    fn color(&self) -> String {
        self.0.borrow().color.clone()
    }
    fn set_color(&mut self, color: &str) {
        self.0.borrow_mut().color = color.to_string();
    }
    fn remove(&mut self) {
        self.0.borrow_mut().removed = true;
    }
}

fn canvas() -> Rect<f64> {
    Rect::new(Point2D::new(0.0, 0.0), Size2D::new(1200.0, 900.0))
}

fn register(controller: &mut InteractionController, store: &GraphStore, id: u64) -> SharedVisual {
    let visual = SharedVisual::new(store.node(id).unwrap().position);
    controller.register_visual(store, id, Box::new(visual.clone()));
    visual
}

/// The end-to-end editing session: seed, add-adjacent, drag, export,
/// re-import, and verify the restored graph is isomorphic.
#[test]
fn scenario_edit_drag_export_reimport() {
    let mut note = NoteDocument::new(Point2D::new(0.0, 0.0));
    let mut controller = InteractionController::new();
    register(&mut controller, note.graph(), 1);

    // Add-adjacent from the seed box: node 2 appears at node 1's center,
    // already connected.
    let added = controller
        .add_adjacent(note.graph_mut(), 1, Vector2D::zero())
        .unwrap();
    assert_eq!(added, 2);
    assert_eq!(note.list_node_ids(), &[1, 2]);
    assert!(note.graph().is_connected(1, 2));
    assert!(note.graph().is_connected(2, 1));
    assert_eq!(
        note.graph().node(2).unwrap().position,
        Point2D::new(40.0, 20.0)
    );
    register(&mut controller, note.graph(), 2);

    let key = EdgeKey::new(1, 2).unwrap();
    assert_eq!(key.to_string(), "1_2");
    let node2_end_before = controller.edge_geometry(key).unwrap().endpoint(2).unwrap();

    // Drag node 1 to (100, 100): its line endpoint follows its center,
    // node 2's endpoint stays put.
    controller.press(note.graph(), 1, Point2D::new(0.0, 0.0));
    controller.motion(note.graph_mut(), Point2D::new(100.0, 100.0), canvas());
    controller.release();

    assert_eq!(
        note.graph().node(1).unwrap().position,
        Point2D::new(100.0, 100.0)
    );
    let geometry = controller.edge_geometry(key).unwrap();
    assert_eq!(geometry.endpoint(1).unwrap(), Point2D::new(140.0, 120.0));
    assert_eq!(geometry.endpoint(2).unwrap(), node2_end_before);

    // Export: two boxes whose neighbor lists reference each other.
    note.heading = "Session".to_string();
    let json = note.export_json().unwrap();
    let snapshot = cuetree::persistence::from_json(&json).unwrap();
    assert_eq!(snapshot.boxes.len(), 2);
    assert_eq!(snapshot.boxes[0].lines, vec!["2".to_string()]);
    assert_eq!(snapshot.boxes[1].lines, vec!["1".to_string()]);

    // Clear and re-import: isomorphic to the pre-export graph.
    let mut restored = NoteDocument::new(Point2D::new(500.0, 500.0));
    restored.import_json(&json).unwrap();
    assert_eq!(restored.heading, "Session");
    assert_eq!(restored.list_node_ids(), note.list_node_ids());
    for &id in note.list_node_ids() {
        assert_eq!(restored.graph().node(id), note.graph().node(id));
    }
    assert!(restored.graph().is_connected(1, 2));

    // Fresh IDs never collide with restored ones.
    let fresh = restored
        .graph_mut()
        .create_node(Point2D::new(0.0, 0.0), "", "#fff");
    assert_eq!(fresh, 3);
}

#[test]
fn scenario_dangling_line_reference_is_dropped_on_import() {
    let mut note = NoteDocument::new(Point2D::new(0.0, 0.0));
    note.graph_mut()
        .create_node(Point2D::new(100.0, 0.0), "", "#fff");
    note.graph_mut().connect(1, 2);

    let mut snapshot = note.export();
    snapshot.boxes[0].lines.push("99".to_string());
    let json = cuetree::persistence::to_json(&snapshot).unwrap();

    let mut restored = NoteDocument::new(Point2D::new(0.0, 0.0));
    restored.import_json(&json).unwrap();
    assert_eq!(restored.graph().edge_count(), 1);
    assert!(!restored.has_node(99));
}

#[test]
fn scenario_failed_import_keeps_editing_state() {
    let mut note = NoteDocument::new(Point2D::new(0.0, 0.0));
    let mut controller = InteractionController::new();
    register(&mut controller, note.graph(), 1);
    controller.add_adjacent(note.graph_mut(), 1, Vector2D::new(60.0, 0.0));

    let before = note.export();
    assert!(note.import_json("{\"boxes\": []}").is_err());
    assert_eq!(note.export(), before);

    // The graph is still live for further edits.
    let next = note
        .graph_mut()
        .create_node(Point2D::new(0.0, 0.0), "", "#fff");
    assert_eq!(next, 3);
}

#[test]
fn scenario_delete_mid_session_leaves_no_dangling_lines() {
    let mut note = NoteDocument::new(Point2D::new(0.0, 0.0));
    let mut controller = InteractionController::new();
    register(&mut controller, note.graph(), 1);

    let b = controller
        .add_adjacent(note.graph_mut(), 1, Vector2D::new(120.0, 0.0))
        .unwrap();
    register(&mut controller, note.graph(), b);
    let c = controller
        .add_adjacent(note.graph_mut(), b, Vector2D::new(120.0, 0.0))
        .unwrap();
    register(&mut controller, note.graph(), c);

    controller.delete(note.graph_mut(), b);

    assert_eq!(note.list_node_ids(), &[1, c]);
    assert_eq!(note.graph().edge_count(), 0);
    assert_eq!(controller.edge_geometries().count(), 0);

    // Export after the delete carries no reference to the removed box.
    let json = note.export_json().unwrap();
    assert!(!json.contains(&format!("\"{b}\"")));
}
