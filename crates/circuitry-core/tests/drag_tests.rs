use circuitry_core::{CircuitAction, DragController, PointerSurface, Vec2};
use proptest::prelude::*;

#[test]
fn test_drag_commits_final_position_once() {
    let surface = PointerSurface::new();
    let mut drag = DragController::new();
    let mut sent: Vec<CircuitAction> = Vec::new();

    drag.begin(Vec2::new(10.0, 20.0), surface.grab(1));
    drag.pointer_moved(Vec2::new(400.0, 300.0));
    drag.pointer_moved(Vec2::new(402.0, 297.0));
    drag.pointer_moved(Vec2::new(405.0, 295.0));
    assert!(sent.is_empty());

    assert!(drag.end(1, &mut sent));
    // A second release is a no-op.
    assert!(!drag.end(1, &mut sent));

    assert_eq!(
        sent,
        vec![CircuitAction::SetComponentCoordinates {
            component_id: 1,
            rel_x: 15.0,
            rel_y: 15.0,
        }]
    );
}

#[test]
fn test_first_move_only_sets_baseline() {
    let surface = PointerSurface::new();
    let mut drag = DragController::new();
    drag.begin(Vec2::new(10.0, 20.0), surface.grab(1));

    assert!(!drag.pointer_moved(Vec2::new(999.0, -999.0)));
    assert_eq!(drag.drag_position(), Some(Vec2::new(10.0, 20.0)));
}

#[test]
fn test_restart_resets_baseline() {
    let surface = PointerSurface::new();
    let mut drag = DragController::new();
    let mut sent: Vec<CircuitAction> = Vec::new();

    drag.begin(Vec2::ZERO, surface.grab(2));
    drag.pointer_moved(Vec2::new(0.0, 0.0));
    drag.pointer_moved(Vec2::new(10.0, 0.0));
    drag.end(2, &mut sent);

    drag.begin(Vec2::new(10.0, 0.0), surface.grab(2));
    // A far away first sample of the new gesture must not jump.
    drag.pointer_moved(Vec2::new(500.0, 500.0));
    drag.pointer_moved(Vec2::new(501.0, 500.0));
    drag.end(2, &mut sent);

    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[1],
        CircuitAction::SetComponentCoordinates {
            component_id: 2,
            rel_x: 11.0,
            rel_y: 0.0,
        }
    );
}

#[test]
fn test_release_without_moves_commits_origin() {
    let surface = PointerSurface::new();
    let mut drag = DragController::new();
    let mut sent: Vec<CircuitAction> = Vec::new();
    drag.begin(Vec2::new(7.0, 8.0), surface.grab(4));
    drag.end(4, &mut sent);
    assert_eq!(
        sent,
        vec![CircuitAction::SetComponentCoordinates {
            component_id: 4,
            rel_x: 7.0,
            rel_y: 8.0,
        }]
    );
    assert!(!surface.is_captured());
}

proptest! {
    /// The final position is the origin plus the pointer travel after the baseline sample.
    #[test]
    fn prop_drag_accumulates_relative_deltas(
        origin in (-500i32..500, -500i32..500),
        samples in proptest::collection::vec((-1000i32..1000, -1000i32..1000), 1..20),
    ) {
        let surface = PointerSurface::new();
        let mut drag = DragController::new();
        let origin = Vec2::new(origin.0 as f32, origin.1 as f32);
        drag.begin(origin, surface.grab(1));

        let samples: Vec<Vec2> = samples
            .into_iter()
            .map(|(x, y)| Vec2::new(x as f32, y as f32))
            .collect();
        for sample in &samples {
            drag.pointer_moved(*sample);
        }

        let travel = samples[samples.len() - 1] - samples[0];
        prop_assert_eq!(drag.drag_position(), Some(origin + travel));
    }
}
