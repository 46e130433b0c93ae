use galpon::prelude::*;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

const DT: f32 = 1.0 / 60.0;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A warehouse whose forklift starts just east of the printer, facing it.
fn at_the_printer() -> Warehouse {
    let config = SimulationConfig::default()
        .with_forklift(ForkliftConfig::default().with_start(Vec3::new(-8.5, 0.0, -6.0), -FRAC_PI_2));
    Warehouse::new(config).unwrap()
}

fn wait_for_print(w: &mut Warehouse) -> PieceId {
    let id = w.print();
    while !w.printer().is_finished() {
        w.step_controls(Controls::empty(), DT);
    }
    id
}

fn hold(w: &mut Warehouse, controls: Controls, frames: usize) -> Vec<Interaction> {
    (0..frames)
        .filter_map(|_| w.step_controls(controls, DT))
        .collect()
}

fn press(w: &mut Warehouse, input: &mut Input, key: Key) -> Option<Interaction> {
    input.on_key(key, true);
    let res = w.step(input, DT);
    input.on_key(key, false);
    w.step(input, DT);
    res
}

#[test]
fn fork_stops_at_its_maximum() {
    init_logger();
    let mut w = Warehouse::new(SimulationConfig::default()).unwrap();
    let max = w.forklift().config().fork_max;
    let secs = max / w.forklift().config().lift_speed;

    for _ in 0..10 {
        w.step_controls(Controls::LIFT_UP, secs / 10.0);
    }
    assert!((w.forklift().fork_height() - max).abs() < 1.0e-5);

    hold(&mut w, Controls::LIFT_UP, 60);
    assert_eq!(w.forklift().fork_height(), max);
}

#[test]
fn wall_blocks_x_but_lets_z_slide() {
    init_logger();
    let mut printer = Printer::new(PrinterConfig::default(), PrinterParams::default());
    let mut shelf = Shelf::new(ShelfConfig::default());
    let mut pieces = Pieces::with_key();

    let obstacle = SpatialBox::new(Vec3::new(5.0, 0.0, -10.0), Vec3::new(10.0, 5.0, 10.0));
    let mut forklift = Forklift::new(
        ForkliftConfig::default().with_start(Vec3::new(0.0, 0.0, -3.0), FRAC_PI_4),
        KeyBindings::default(),
    );
    forklift.set_environment(&[&obstacle]);

    let mut blocked_at = None;
    for _ in 0..90 {
        let before = forklift.position();
        let mut env = Environment {
            printer: &mut printer,
            shelf: &mut shelf,
            pieces: &mut pieces,
        };
        forklift.update_controls(Controls::FORWARD, DT, &mut env);
        let after = forklift.position();

        if blocked_at.is_none() && after.x == before.x {
            blocked_at = Some(after.x);
        }
        if let Some(x) = blocked_at {
            assert_eq!(after.x, x, "x moved after the wall was reached");
            assert!(after.z > before.z, "z stopped sliding");
        }
    }

    let (hx, _) = forklift.half_extents();
    let x = blocked_at.expect("the wall was never reached");
    assert!(x + hx <= 5.1 + 1.0e-4);
    assert!(x + hx > 5.1 - 0.2);
}

#[test]
fn shelf_stores_into_the_nearest_free_slot() {
    init_logger();
    let mut w = at_the_printer();
    let id = wait_for_print(&mut w);

    let mut shelf = Shelf::new(ShelfConfig::default());
    let mut pieces = Pieces::with_key();
    let piece = w.piece(id).unwrap().clone();
    let id = pieces.insert(piece);

    let target = SlotId::new(0, 3);
    let near = shelf.slot_world_position(target) + Vec3::new(0.2, 0.3, 0.8);
    assert_eq!(shelf.slots().len(), 16);

    let reach = w.forklift().config().pickup_radius;
    assert!(shelf.add_object(id, near, reach, &mut pieces));
    assert_eq!(shelf.occupied_count(), 1);
    assert_eq!(shelf.slots().get(target).unwrap().occupant, Some(id));
    assert_eq!(pieces[id].slot(), Some(target));

    let next = shelf.find_nearest_free_slot(near).unwrap();
    assert_ne!(next.slot, target);
}

#[test]
fn pick_from_the_printer() {
    init_logger();
    let mut w = at_the_printer();
    let id = wait_for_print(&mut w);
    let mut input = Input::new();

    assert!(!w.forklift().is_carrying());
    assert_eq!(w.hud().hint(), Some(Hint::Pick));

    let res = press(&mut w, &mut input, Key::G);
    assert_eq!(res, Some(Interaction::PickedFromPrinter(id)));
    assert!(w.forklift().is_carrying());
    assert_eq!(w.printer().current_object(), None);
    assert_eq!(w.last_interaction(), res);
}

#[test]
fn place_out_of_reach_fails_silently() {
    init_logger();
    let mut w = at_the_printer();
    let id = wait_for_print(&mut w);
    let mut input = Input::new();

    press(&mut w, &mut input, Key::G);
    assert_eq!(w.forklift().carried(), Some(id));

    let res = press(&mut w, &mut input, Key::G);
    assert_eq!(res, None);
    assert!(w.forklift().is_carrying());
    assert_eq!(w.shelf().occupied_count(), 0);
}

#[test]
fn holding_interact_picks_once() {
    init_logger();
    let mut w = at_the_printer();
    let id = wait_for_print(&mut w);

    let interactions = hold(&mut w, Controls::INTERACT, 10);
    assert_eq!(interactions, vec![Interaction::PickedFromPrinter(id)]);
    assert_eq!(w.forklift().carried(), Some(id));

    // Releasing and pressing again fires again: here a failed place.
    hold(&mut w, Controls::empty(), 1);
    assert!(hold(&mut w, Controls::INTERACT, 10).is_empty());
    assert!(w.forklift().is_carrying());
}

#[test]
fn printer_to_shelf_and_back() {
    init_logger();
    let mut w = at_the_printer();
    let id = wait_for_print(&mut w);

    assert_eq!(
        hold(&mut w, Controls::INTERACT, 1),
        vec![Interaction::PickedFromPrinter(id)]
    );
    hold(&mut w, Controls::empty(), 1);

    // Face +z, drive out in front of the shelf, face +x, drive to column 3,
    // face the shelf and raise the fork to the bottom board.
    hold(&mut w, Controls::TURN_LEFT, 30);
    hold(&mut w, Controls::FORWARD, 39);
    hold(&mut w, Controls::TURN_LEFT, 30);
    hold(&mut w, Controls::FORWARD, 92);
    hold(&mut w, Controls::TURN_LEFT, 30);
    hold(&mut w, Controls::LIFT_UP, 81);

    let f = w.forklift();
    assert!((f.heading_normalized().abs() - std::f32::consts::PI).abs() < 1.0e-3);
    assert!(f.fork_tip().distance(Vec3::new(6.83, 2.6, -2.5)) < 0.1);

    // The carried piece rides with the fork.
    let carried = w.piece(id).unwrap().world_position();
    assert!(carried.distance(f.fork_tip()) < 1.0);

    let highlight = *w.shelf().highlight().unwrap();
    assert_eq!(highlight.mode, HighlightMode::Placing);
    assert_eq!(highlight.slot, SlotId::new(0, 3));
    assert_eq!(w.hud().hint(), Some(Hint::Place));

    let slot = SlotId::new(0, 3);
    assert_eq!(
        hold(&mut w, Controls::INTERACT, 1),
        vec![Interaction::Placed { piece: id, slot }]
    );
    assert!(!w.forklift().is_carrying());
    assert!(w.shelf().highlight().is_none());

    // The placement animation lands exactly on the slot.
    hold(&mut w, Controls::empty(), 30);
    assert!(w.shelf().animations().is_empty());
    assert_eq!(
        w.piece(id).unwrap().world_position(),
        w.shelf().slot_world_position(slot)
    );
    assert_eq!(w.shelf().highlight().map(|h| h.mode), Some(HighlightMode::Picking));

    assert_eq!(
        hold(&mut w, Controls::INTERACT, 1),
        vec![Interaction::PickedFromShelf { piece: id, slot }]
    );
    assert_eq!(w.shelf().occupied_count(), 0);
    assert_eq!(w.piece(id).unwrap().slot(), None);
}
