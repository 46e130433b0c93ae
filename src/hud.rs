//! Heads-up display text.

use crate::piece::Transferable;
use crate::printer::PieceSource;
use crate::shelf::HighlightMode;
use crate::warehouse::Warehouse;
use std::fmt;

/// What pressing the interact key would do right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hint {
    /// A piece is within reach.
    Pick,
    /// A free slot is within reach.
    Place,
}

/// A snapshot of the simulation state, rendered as a few lines of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    shape: String,
    mode: &'static str,
    height: f32,
    twist: f32,
    progress: Option<f32>,
    heading_degrees: f32,
    fork_height: f32,
    carrying: bool,
    stored: usize,
    capacity: usize,
    camera: String,
    hint: Option<Hint>,
    interact_key: String,
}

impl Hud {
    /// Captures the state of `warehouse`.
    pub fn new(warehouse: &Warehouse) -> Hud {
        let printer = warehouse.printer();
        let params = printer.params();
        let forklift = warehouse.forklift();
        let shelf = warehouse.shelf();

        let hint = match shelf.highlight().map(|h| h.mode) {
            Some(HighlightMode::Placing) => Some(Hint::Place),
            Some(HighlightMode::Picking) => Some(Hint::Pick),
            None if !forklift.is_carrying() => printer
                .current_object()
                .and_then(|id| warehouse.piece(id))
                .filter(|p| {
                    p.world_position().distance(forklift.fork_tip())
                        <= forklift.config().pickup_radius
                })
                .map(|_| Hint::Pick),
            None => None,
        };

        Hud {
            shape: params.shape.to_string(),
            mode: params.shape.mode(),
            height: params.height,
            twist: params.twist_degrees,
            progress: printer.printing_object().map(|_| printer.progress()),
            heading_degrees: forklift.heading_normalized().to_degrees(),
            fork_height: forklift.fork_height(),
            carrying: forklift.is_carrying(),
            stored: shelf.occupied_count(),
            capacity: shelf.slots().len(),
            camera: warehouse.cameras().active_view().to_string(),
            hint,
            interact_key: format!("{:?}", warehouse.config().bindings.interact),
        }
    }

    /// What the interact key would do.
    #[inline]
    pub fn hint(&self) -> Option<Hint> {
        self.hint
    }

    /// The text lines, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut res = vec![
            format!("Shape: {} | Mode: {}", self.shape, self.mode),
            format!("Height: {:.1} | Twist: {:.0}°", self.height, self.twist),
        ];

        match self.progress {
            Some(p) if p >= 1.0 => res.push("Print: done".to_string()),
            Some(p) => res.push(format!("Print: {:.0}%", p * 100.0)),
            None => res.push("Print: idle".to_string()),
        }

        res.push(format!(
            "Heading: {:.0}° | Fork: {:.2} | {} | Shelf: {}/{}",
            self.heading_degrees,
            self.fork_height,
            if self.carrying { "loaded" } else { "empty" },
            self.stored,
            self.capacity
        ));
        res.push(format!("Camera: {}", self.camera));

        match self.hint {
            Some(Hint::Pick) => res.push(format!("Press {} to pick up the piece", self.interact_key)),
            Some(Hint::Place) => res.push(format!("Press {} to drop the piece", self.interact_key)),
            None => {}
        }

        res.push(format!(
            "WASD: drive · Q/E: lift · {}: pick/drop · 1-6: cameras · O/P: zoom",
            self.interact_key
        ));
        res
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::input::Controls;

    #[test]
    fn idle_warehouse() {
        let w = Warehouse::new(SimulationConfig::default()).unwrap();
        let hud = w.hud();
        assert_eq!(hud.hint(), None);

        let text = hud.to_string();
        assert!(text.contains("Print: idle"));
        assert!(text.contains("Shelf: 0/16"));
        assert!(text.contains("Camera: overview (1)"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn progress_is_reported() {
        let mut w = Warehouse::new(SimulationConfig::default()).unwrap();
        w.print();
        assert!(w.hud().to_string().contains("Print: 0%"));

        for _ in 0..600 {
            w.step_controls(Controls::empty(), 1.0 / 60.0);
        }
        assert!(w.hud().to_string().contains("Print: done"));
    }
}
