//! Tests for the drag adapters: pointer sensor, tree drop preview and kanban drops

use std::sync::Arc;

use rstest::rstest;

use treeboard::application::drag::{
    drop_card, resolve_card_drop, DragEvent, DragSensor, DropTarget, DropTracker, Point, Release,
};
use treeboard::config::Settings;
use treeboard::domain::kanban::find_column;
use treeboard::domain::tree::find_node;
use treeboard::domain::{Board, DropPosition, Forest, KanbanColumn, TreeNode};
use treeboard::infrastructure::{fixtures, MockChildLoader, ServiceContainer};

fn board() -> Board {
    vec![
        KanbanColumn::new("x", "X").with_cards([("a", "A"), ("b", "B"), ("c", "C")]),
        KanbanColumn::new("y", "Y").with_cards([("d", "D")]),
        KanbanColumn::new("z", "Z"),
    ]
}

fn ids(board: &Board, column_id: &str) -> Vec<String> {
    find_column(board, column_id)
        .map(|column| column.cards.iter().map(|card| card.id.clone()).collect())
        .unwrap_or_default()
}

fn forest() -> Forest {
    vec![
        TreeNode::new("p", "Parent").with_children(vec![
            TreeNode::new("c1", "Child 1"),
            TreeNode::new("c2", "Child 2"),
        ]),
        TreeNode::new("r", "Root 2"),
    ]
}

// ============================================================
// Sensor
// ============================================================

#[test]
fn given_press_and_long_move_when_dragging_then_emits_start_over_end() {
    // Arrange
    let mut sensor = DragSensor::default();
    sensor.press("c2", Point::new(10.0, 10.0));

    // Act
    let start = sensor.moved(Point::new(10.0, 30.0), Some("c1"));
    let over = sensor.moved(Point::new(10.0, 40.0), Some("c1"));
    let release = sensor.release(Some("c1"));

    // Assert
    assert_eq!(start, Some(DragEvent::Start { active: "c2".into() }));
    assert_eq!(
        over,
        Some(DragEvent::Over {
            active: "c2".into(),
            over: Some("c1".into())
        })
    );
    assert_eq!(
        release,
        Release::Drop(DragEvent::End {
            active: "c2".into(),
            over: Some("c1".into())
        })
    );
    assert!(!sensor.is_dragging());
}

#[rstest]
#[case::still(0.0, 0.0, false)]
#[case::below(3.0, 4.0, false)]
#[case::exact(6.0, 8.0, false)]
#[case::beyond(6.0, 8.1, true)]
fn given_movement_when_measuring_then_activates_strictly_above_distance(
    #[case] dx: f32,
    #[case] dy: f32,
    #[case] dragging: bool,
) {
    let mut sensor = DragSensor::new(10.0);
    sensor.press("item", Point::new(0.0, 0.0));

    sensor.moved(Point::new(dx, dy), None);

    assert_eq!(sensor.is_dragging(), dragging);
    assert_eq!(sensor.active().is_some(), dragging);
}

#[test]
fn given_no_press_when_moving_or_releasing_then_ignored() {
    let mut sensor = DragSensor::default();
    assert_eq!(sensor.moved(Point::new(100.0, 0.0), Some("x")), None);
    assert_eq!(sensor.release(Some("x")), Release::Ignored);
    assert_eq!(sensor.cancel(), None);
}

#[test]
fn given_configured_distance_when_building_sensor_then_container_uses_it() {
    let mut settings = Settings::default();
    settings.drag.activation_distance = 2.5;
    let container = ServiceContainer::with_deps(
        settings,
        Vec::new(),
        Vec::new(),
        Arc::new(MockChildLoader::new(Default::default())),
    );

    assert_eq!(container.drag_sensor().activation_distance(), 2.5);
}

// ============================================================
// Tree drop preview
// ============================================================

#[test]
fn given_drag_over_sibling_before_zone_when_ending_then_reorders() {
    // Arrange
    let forest = forest();
    let mut tracker = DropTracker::new();
    tracker.start("c2");

    // Act
    tracker.over(&forest, Some("c1"));
    tracker.hover_zone(&forest, "c1", Some(DropPosition::Before));
    let forest = tracker.end(forest, Some("c1"));

    // Assert
    let parent = find_node(&forest, "p").unwrap();
    let order: Vec<&str> = parent.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["c2", "c1"]);
    assert!(tracker.dragged().is_none());
    assert!(tracker.target().is_none());
}

#[test]
fn given_new_hover_node_when_over_then_defaults_to_inside() {
    let forest = forest();
    let mut tracker = DropTracker::new();
    tracker.start("c1");

    tracker.over(&forest, Some("r"));

    assert_eq!(
        tracker.target(),
        Some(&DropTarget {
            node_id: "r".into(),
            position: DropPosition::Inside
        })
    );
    let forest = tracker.end(forest, Some("r"));
    assert_eq!(find_node(&forest, "c1").unwrap().parent_id.as_deref(), Some("r"));
}

#[test]
fn given_pointer_left_all_zones_when_ending_then_forest_unchanged() {
    let before = forest();
    let mut tracker = DropTracker::new();
    tracker.start("c1");
    tracker.over(&before, Some("r"));

    tracker.hover_zone(&before, "r", None);
    let after = tracker.end(before.clone(), Some("r"));

    assert_eq!(after, before);
}

#[test]
fn given_release_outside_when_ending_then_forest_unchanged() {
    let before = forest();
    let mut tracker = DropTracker::new();
    tracker.start("c1");
    tracker.over(&before, Some("r"));

    let after = tracker.end(before.clone(), None);

    assert_eq!(after, before);
}

#[test]
fn given_cancelled_drag_when_ending_then_nothing_moves() {
    let before = forest();
    let mut tracker = DropTracker::new();
    tracker.start("c1");
    tracker.over(&before, Some("r"));

    tracker.cancel();
    let after = tracker.end(before.clone(), Some("r"));

    assert_eq!(after, before);
}

#[test]
fn given_dragging_onto_itself_when_hovering_then_no_target() {
    let forest = forest();
    let mut tracker = DropTracker::new();
    tracker.start("p");

    tracker.hover_zone(&forest, "p", Some(DropPosition::After));
    assert!(tracker.target().is_none());
    tracker.over(&forest, Some("c1"));
    assert!(tracker.target().is_none());
}

// ============================================================
// Kanban drops
// ============================================================

#[test]
fn given_card_dropped_on_other_column_when_applying_then_appended() {
    let board = drop_card(board(), "a", Some("z"));

    assert_eq!(ids(&board, "x"), vec!["b", "c"]);
    assert_eq!(ids(&board, "z"), vec!["a"]);
    assert!(board.iter().all(|column| column.is_densely_ordered()));
}

#[test]
fn given_card_dropped_on_card_in_other_column_when_applying_then_placed_before_it() {
    let board = drop_card(board(), "d", Some("b"));

    assert_eq!(ids(&board, "x"), vec!["a", "d", "b", "c"]);
    assert!(ids(&board, "y").is_empty());
    assert!(board.iter().all(|column| column.is_densely_ordered()));
}

#[rstest]
#[case::upwards("c", "a", vec!["c", "a", "b"])]
#[case::downwards("a", "c", vec!["b", "a", "c"])]
#[case::neighbour("b", "a", vec!["b", "a", "c"])]
fn given_card_dropped_on_card_in_same_column_when_applying_then_placed_before_it(
    #[case] card: &str,
    #[case] over: &str,
    #[case] expected: Vec<&str>,
) {
    let board = drop_card(board(), card, Some(over));

    assert_eq!(ids(&board, "x"), expected);
    assert!(find_column(&board, "x").unwrap().is_densely_ordered());
}

#[rstest]
#[case::outside(None)]
#[case::own_column(Some("x"))]
#[case::itself(Some("a"))]
#[case::unknown(Some("nowhere"))]
fn given_noop_drop_when_resolving_then_no_moves(#[case] over: Option<&str>) {
    assert!(resolve_card_drop(&board(), "a", over).is_empty());
}

#[test]
fn given_unknown_card_when_dropping_then_board_unchanged() {
    let before = board();
    assert_eq!(drop_card(before.clone(), "ghost", Some("z")), before);
}

#[test]
fn given_fixture_board_when_dropping_through_service_then_store_updated() {
    // Arrange
    let container = ServiceContainer::with_deps(
        Settings::default(),
        Vec::new(),
        fixtures::initial_board(),
        Arc::new(MockChildLoader::new(Default::default())),
    );

    // Act
    container.board_service.drop_card("card-5", Some("card-1"));

    // Assert
    let board = container.board_service.board();
    assert_eq!(ids(&board, "todo"), vec!["card-5", "card-1", "card-2"]);
    assert_eq!(ids(&board, "done"), vec!["card-4"]);
    assert!(board.iter().all(|column| column.is_densely_ordered()));
}
