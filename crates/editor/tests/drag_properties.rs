use posterframe_editor::{apply_events, PlacementEngine, ZoomRange};
use posterframe_placement_model::{CanvasSize, DisplaySize, EditorEvent};
use proptest::prelude::*;

fn engine_at(display: (f64, f64)) -> PlacementEngine {
    let mut engine = PlacementEngine::new(CanvasSize::PRINT);
    engine.set_display_size(DisplaySize::new(display.0, display.1).unwrap());
    engine
}

proptest! {
    #[test]
    fn drag_result_depends_only_on_final_pointer(
        display in (100.0f64..4000.0, 100.0f64..4000.0),
        start in (-1000.0f64..1000.0, -1000.0f64..1000.0),
        path in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 1..32),
    ) {
        let (end_x, end_y) = *path.last().unwrap();

        let mut stepped = engine_at(display);
        let mut events = vec![EditorEvent::pointer_down(start.0, start.1)];
        events.extend(path.iter().map(|&(x, y)| EditorEvent::pointer_move(x, y)));
        events.push(EditorEvent::PointerUp);
        apply_events(&mut stepped, &events, ZoomRange::default()).unwrap();

        let mut direct = engine_at(display);
        direct.begin_drag(start.0, start.1);
        direct.update_drag(end_x, end_y);
        direct.end_drag();

        prop_assert_eq!(stepped.placement(), direct.placement());

        let ratio = stepped.ratio();
        prop_assert!((direct.placement().offset_x - (end_x - start.0) * ratio.x).abs() < 1e-6);
        prop_assert!((direct.placement().offset_y - (end_y - start.1) * ratio.y).abs() < 1e-6);
    }

    #[test]
    fn reset_always_restores_identity(
        scale in 0.1f64..5.0,
        turns in 0usize..9,
        moves in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 0..8),
    ) {
        let mut engine = PlacementEngine::new(CanvasSize::PRINT);
        engine.set_scale(scale).unwrap();
        for _ in 0..turns {
            engine.rotate();
        }
        engine.begin_drag(0.0, 0.0);
        for (x, y) in moves {
            engine.update_drag(x, y);
        }
        engine.end_drag();

        engine.reset_placement();
        prop_assert!(engine.placement().is_identity());
        prop_assert_eq!(engine.placement().zoom_percent(), 100);
    }
}
