use tourmap::config::EditorConfig;
use tourmap::editor::{Cursor, EditorState, InputEvent, Key, KeyCommand, Modifiers, PointerState};
use tourmap::model::{City, CitySet, Point, Tour};
use tourmap::solver::TourUpdate;

fn click(state: &mut EditorState, x: f64, y: f64) {
    let at = Point::new(x, y);
    state.handle(InputEvent::PointerDown { at });
    state.handle(InputEvent::PointerUp { at });
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

#[test]
fn small_jitter_is_a_click_at_release_position() {
    let mut state = EditorState::default();
    state.handle(InputEvent::PointerDown { at: Point::new(10.0, 10.0) });
    state.handle(InputEvent::PointerMove { at: Point::new(13.0, 11.0) });
    assert!(matches!(state.pointer(), PointerState::PointerDown { .. }));
    state.handle(InputEvent::PointerUp { at: Point::new(13.0, 11.0) });

    assert_eq!(state.cities().as_slice(), &[City::new(13.0, 11.0)]);
    assert_eq!(state.viewport().offset(), Point::ZERO);
    assert!(state.pointer().is_idle());
}

#[test]
fn drag_past_threshold_pans_without_adding() {
    let mut state = EditorState::default();
    state.handle(InputEvent::PointerDown { at: Point::new(10.0, 10.0) });
    state.handle(InputEvent::PointerMove { at: Point::new(30.0, 10.0) });
    assert!(state.pointer().is_dragging());
    assert_eq!(state.cursor(), Cursor::Grabbing);
    state.handle(InputEvent::PointerUp { at: Point::new(30.0, 10.0) });

    assert!(state.cities().is_empty());
    assert_eq!(state.viewport().offset(), Point::new(20.0, 0.0));
    assert!(!state.can_undo());
}

#[test]
fn drag_follows_every_move() {
    let mut state = EditorState::default();
    state.handle(InputEvent::PointerDown { at: Point::new(0.0, 0.0) });
    state.handle(InputEvent::PointerMove { at: Point::new(10.0, 0.0) });
    state.handle(InputEvent::PointerMove { at: Point::new(10.0, 15.0) });
    state.handle(InputEvent::PointerUp { at: Point::new(12.0, 15.0) });
    assert_eq!(state.viewport().offset(), Point::new(12.0, 15.0));
    assert!(state.cities().is_empty());
}

#[test]
fn click_on_city_removes_it() {
    let mut state = EditorState::default();
    click(&mut state, 100.0, 100.0);
    click(&mut state, 200.0, 100.0);
    assert_eq!(state.cities().len(), 2);

    click(&mut state, 105.0, 98.0);
    assert_eq!(state.cities().as_slice(), &[City::new(200.0, 100.0)]);
}

#[test]
fn click_maps_through_the_viewport() {
    let mut state = EditorState::default();
    state.pan_by(50.0, 20.0);
    state.zoom_at(Point::new(50.0, 20.0), 2.0);
    click(&mut state, 70.0, 40.0);
    assert_eq!(state.cities().as_slice(), &[City::new(10.0, 10.0)]);
}

#[test]
fn hover_sets_cursor_without_mutation() {
    let mut state = EditorState::default();
    click(&mut state, 50.0, 50.0);
    let generation = state.generation();

    state.handle(InputEvent::PointerMove { at: Point::new(55.0, 50.0) });
    assert_eq!(state.cursor(), Cursor::Pointer);
    state.handle(InputEvent::PointerMove { at: Point::new(150.0, 50.0) });
    assert_eq!(state.cursor(), Cursor::Crosshair);
    assert_eq!(state.generation(), generation);
}

#[test]
fn leave_aborts_gesture() {
    let mut state = EditorState::default();
    state.handle(InputEvent::PointerDown { at: Point::new(10.0, 10.0) });
    state.handle(InputEvent::PointerLeave);
    state.handle(InputEvent::PointerUp { at: Point::new(10.0, 10.0) });
    assert!(state.cities().is_empty());
}

#[test]
fn wheel_zooms_at_pointer() {
    let mut state = EditorState::default();
    let at = Point::new(120.0, 80.0);
    let before = state.viewport().to_world(at);
    state.handle(InputEvent::Wheel { at, delta_y: -100.0 });
    assert!(state.viewport().scale() > 1.0);
    assert!(close(state.viewport().to_world(at), before));

    for _ in 0..3 {
        state.handle(InputEvent::Wheel { at, delta_y: 100_000.0 });
    }
    assert_eq!(state.viewport().scale(), 0.1);
    assert!(close(state.viewport().to_world(at), before));
}

#[test]
fn zoom_anchor_holds_for_any_factor() {
    for factor in [0.5, 0.9, 1.0, 1.25, 2.0, 50.0, 0.001] {
        for p in [Point::ZERO, Point::new(13.0, -7.5), Point::new(640.0, 480.0)] {
            let mut state = EditorState::default();
            state.pan_by(-30.0, 12.0);
            let before = state.viewport().to_world(p);
            state.zoom_at(p, factor);
            let after = state.viewport().to_world(p);
            assert!(close(before, after), "factor {factor} at {p:?}");
        }
    }
}

#[test]
fn remove_then_readd_clears_tour() {
    let mut state = EditorState::default();
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)] {
        state.add_city(Point::new(x, y));
    }
    let original: CitySet = state.cities().clone();
    state.apply_tour(TourUpdate {
        kind: "update".into(),
        tour: Tour::new(vec![0, 1, 2]),
    });
    assert!(state.tour().is_some());

    assert!(state.remove_near(Point::new(0.0, 100.0)));
    state.add_city(Point::new(0.0, 100.0));

    assert_eq!(state.cities(), &original);
    assert!(state.tour().is_none());
}

#[test]
fn undo_redo_restore_exact_sets() {
    let mut state = EditorState::default();
    state.add_city(Point::new(1.0, 2.0));
    let before = state.cities().clone();

    state.add_city(Point::new(3.0, 4.0));
    let after = state.cities().clone();

    assert!(state.undo());
    assert_eq!(state.cities(), &before);
    assert!(state.redo());
    assert_eq!(state.cities(), &after);
}

#[test]
fn edit_between_undo_and_redo_discards_redo() {
    let mut state = EditorState::default();
    state.add_city(Point::new(1.0, 2.0));
    state.add_city(Point::new(3.0, 4.0));
    state.undo();
    assert!(state.can_redo());

    state.add_city(Point::new(9.0, 9.0));
    assert!(!state.can_redo());
    assert!(!state.redo());
    assert_eq!(
        state.cities().as_slice(),
        &[City::new(1.0, 2.0), City::new(9.0, 9.0)]
    );
}

#[test]
fn undo_clears_tour_and_rebuilds_matrix() {
    let mut state = EditorState::default();
    state.add_city(Point::new(0.0, 0.0));
    state.add_city(Point::new(3.0, 4.0));
    state.apply_tour(TourUpdate {
        kind: "update".into(),
        tour: Tour::new(vec![0, 1]),
    });
    assert_eq!(state.matrix().get(0, 1), Some(5.0));

    state.undo();
    assert!(state.tour().is_none());
    assert_eq!(state.matrix().size(), 1);
}

#[test]
fn keyboard_undo_redo_are_global() {
    let mut state = EditorState::default();
    state.add_city(Point::new(0.0, 0.0));

    // Mid-gesture shortcuts still apply.
    state.handle(InputEvent::PointerDown { at: Point::new(300.0, 300.0) });
    let cmd = state.handle(InputEvent::Key {
        key: Key::Z,
        modifiers: Modifiers::ctrl(),
    });
    assert_eq!(cmd, Some(KeyCommand::Undo));
    assert!(state.cities().is_empty());

    let cmd = state.handle(InputEvent::Key {
        key: Key::Z,
        modifiers: Modifiers::ctrl_shift(),
    });
    assert_eq!(cmd, Some(KeyCommand::Redo));
    assert_eq!(state.cities().len(), 1);
}

#[test]
fn empty_history_is_a_noop() {
    let mut state = EditorState::default();
    let generation = state.generation();
    assert!(!state.undo());
    assert!(!state.redo());
    assert_eq!(state.generation(), generation);
}

#[test]
fn custom_threshold_is_respected() {
    let mut state = EditorState::new(EditorConfig::default().with_drag_threshold(50.0));
    state.handle(InputEvent::PointerDown { at: Point::new(10.0, 10.0) });
    state.handle(InputEvent::PointerMove { at: Point::new(30.0, 10.0) });
    state.handle(InputEvent::PointerUp { at: Point::new(30.0, 10.0) });
    assert_eq!(state.cities().as_slice(), &[City::new(30.0, 10.0)]);
}

#[test]
fn escape_cancels_a_pending_press() {
    let mut state = EditorState::default();
    state.handle(InputEvent::PointerDown { at: Point::new(40.0, 40.0) });
    let command = state.handle(InputEvent::Key {
        key: Key::Escape,
        modifiers: Modifiers::NONE,
    });
    assert_eq!(command, Some(KeyCommand::Cancel));
    assert!(state.pointer().is_idle());

    state.handle(InputEvent::PointerUp { at: Point::new(40.0, 40.0) });
    assert!(state.cities().is_empty());
    assert!(!state.can_undo());
}

#[test]
fn home_and_zero_reset_the_view() {
    for key in [Key::Home, Key::Num0] {
        let mut state = EditorState::default();
        state.handle(InputEvent::PointerDown { at: Point::new(0.0, 0.0) });
        state.handle(InputEvent::PointerMove { at: Point::new(60.0, 25.0) });
        state.handle(InputEvent::PointerUp { at: Point::new(60.0, 25.0) });
        state.handle(InputEvent::Wheel {
            at: Point::new(100.0, 100.0),
            delta_y: -300.0,
        });
        assert_ne!(state.viewport().offset(), Point::ZERO);
        assert_ne!(state.viewport().scale(), 1.0);
        state.take_redraw();

        let command = state.handle(InputEvent::Key {
            key,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(command, Some(KeyCommand::ResetView));
        assert_eq!(state.viewport().offset(), Point::ZERO);
        assert_eq!(state.viewport().scale(), 1.0);
        assert!(state.needs_redraw());
    }
}
