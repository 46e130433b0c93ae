use galpon::prelude::*;
use std::f32::consts::FRAC_PI_2;

const DT: f32 = 1.0 / 60.0;

/// Holds `keys` down for `secs` seconds of simulated time.
fn drive(w: &mut Warehouse, input: &mut Input, keys: &[Key], secs: f32) {
    for key in keys {
        input.on_key(*key, true);
    }

    let frames = (secs / DT).round() as usize;
    for _ in 0..frames {
        if let Some(interaction) = w.step(input, DT) {
            log::info!("{:?}", interaction);
        }
    }

    for key in keys {
        input.on_key(*key, false);
    }
    w.step(input, DT);
}

fn main() {
    env_logger::init();

    let config = SimulationConfig::default()
        .with_forklift(ForkliftConfig::default().with_start(Vec3::new(-8.5, 0.0, -6.0), -FRAC_PI_2))
        .with_printer_params(
            PrinterParams::default()
                .with_shape(PrintShape::Sweep(Outline::B2))
                .with_height(1.8)
                .with_twist(90.0),
        );
    let mut w = Warehouse::new(config).expect("the default layout is valid");
    let mut input = Input::new();
    w.cameras_mut().resize(1280.0, 720.0);

    w.print();
    while !w.printer().is_finished() {
        w.step(&input, DT);
    }
    println!("{}\n", w.hud());

    // Grab the piece, then follow the forklift from behind.
    drive(&mut w, &mut input, &[Key::G], DT);
    drive(&mut w, &mut input, &[Key::Key5], DT);

    drive(&mut w, &mut input, &[Key::A], 0.5);
    drive(&mut w, &mut input, &[Key::W], 0.65);
    drive(&mut w, &mut input, &[Key::A], 0.5);
    drive(&mut w, &mut input, &[Key::W], 1.53);
    drive(&mut w, &mut input, &[Key::A], 0.5);
    drive(&mut w, &mut input, &[Key::Q], 1.35);
    println!("{}\n", w.hud());

    drive(&mut w, &mut input, &[Key::G], DT);
    drive(&mut w, &mut input, &[], 0.5);

    // Look at the result from the shelf camera, a bit closer.
    drive(&mut w, &mut input, &[Key::Key3], DT);
    drive(&mut w, &mut input, &[Key::O], DT);
    println!("{}", w.hud());

    let cam = w.cameras().active();
    println!(
        "\nshelf camera at {:?}, looking at {:?}",
        cam.eye(),
        cam.at()
    );
}
