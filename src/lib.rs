/*!
# Galpon

Keep It Simple, Stupid warehouse simulation.

A forklift drives around a warehouse, picks up the pieces a stylized 3D
printer produces and stores them on a shelving unit. The crate owns the whole
simulation state and exposes world poses, bounding boxes and procedural
meshes: any renderer can draw it, and tests can drive it frame by frame
without a window.

## Features

* a drivable forklift with axis-aligned collision and wall sliding.
* an edge-triggered pick/place protocol between the printer, the forklift
  and the shelf slots.
* procedural pieces: Bézier profiles revolved by a lathe, or Catmull-Rom
  outlines swept with a twist.
* six cameras (three orbit cameras, three attached to the forklift).
* key translation from `winit` physical keys and from DOM key codes.

Driving the forklift to the printer and back is a matter of feeding key
states and frame times:

```no_run
use galpon::prelude::*;

let mut warehouse = Warehouse::new(SimulationConfig::default()).unwrap();
let mut input = Input::new();
let mut clock = FrameClock::default();

warehouse.print();
input.on_key(Key::W, true);

for _ in 0..60 {
    if let Some(interaction) = warehouse.step(&input, clock.delta()) {
        println!("{:?}", interaction);
    }
}

println!("{}", warehouse.hud());
```

The default controls are:

* `W`/`S`: drive forward / backward.
* `A`/`D`: turn left / right.
* `Q`/`E`: raise / lower the fork.
* `G`: pick up or drop a piece.
* `1`-`6`: select a camera; `O`/`P`: zoom the orbit cameras.

## Features flags

* `serde`: (de)serialization of every configuration type, and
  [`SimulationConfig::from_toml_str`](crate::config::SimulationConfig).
*/
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

pub use glamx;

pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod forklift;
pub mod hud;
pub mod input;
pub mod piece;
pub mod printer;
pub mod procedural;
pub mod shelf;
pub mod spatial;
pub mod warehouse;

pub mod prelude {
    pub use crate::camera::*;
    pub use crate::clock::*;
    pub use crate::color::*;
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::forklift::*;
    pub use crate::hud::*;
    pub use crate::input::*;
    pub use crate::piece::*;
    pub use crate::printer::*;
    pub use crate::procedural::{Outline, Profile, RenderMesh};
    pub use crate::shelf::*;
    pub use crate::spatial::*;
    pub use crate::warehouse::*;
    pub use glamx::{Mat4, Pose3, Quat, Vec2, Vec3};
}
