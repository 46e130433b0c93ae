//! Aggregated simulation settings.

use crate::camera::CameraConfig;
use crate::error::ConfigError;
use crate::forklift::ForkliftConfig;
use crate::input::KeyBindings;
use crate::printer::{PrinterConfig, PrinterParams};
use crate::shelf::ShelfConfig;
use crate::warehouse::WarehouseLayout;

/// Every setting needed to build a [`Warehouse`](crate::warehouse::Warehouse).
///
/// With the `serde` feature, any subset of the fields can be read from TOML;
/// missing fields keep their defaults:
///
/// ```toml
/// [forklift]
/// speed = 6.0
///
/// [shelf]
/// levels = 3
/// columns = 6
///
/// [printer_params]
/// height = 2.0
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// The forklift.
    pub forklift: ForkliftConfig,
    /// The shelf.
    pub shelf: ShelfConfig,
    /// The printer hardware.
    pub printer: PrinterConfig,
    /// What the printer prints.
    pub printer_params: PrinterParams,
    /// The building.
    pub layout: WarehouseLayout,
    /// The cameras.
    pub cameras: CameraConfig,
    /// The forklift and zoom keys.
    pub bindings: KeyBindings,
}

impl SimulationConfig {
    /// Replaces the forklift settings.
    pub fn with_forklift(mut self, forklift: ForkliftConfig) -> Self {
        self.forklift = forklift;
        self
    }

    /// Replaces the shelf settings.
    pub fn with_shelf(mut self, shelf: ShelfConfig) -> Self {
        self.shelf = shelf;
        self
    }

    /// Replaces the printer parameters.
    pub fn with_printer_params(mut self, params: PrinterParams) -> Self {
        self.printer_params = params;
        self
    }

    /// Replaces the building layout.
    pub fn with_layout(mut self, layout: WarehouseLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Checks every section, then that the printer and the shelf stand on the floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forklift.validate()?;
        self.shelf.validate()?;
        self.printer.validate()?;
        self.printer_params.validate()?;
        self.layout.validate()?;
        self.cameras.validate()?;

        let floor = self.layout.floor();
        let on_floor = |p: glamx::Vec3| {
            p.x >= floor.min.x && p.x <= floor.max.x && p.z >= floor.min.z && p.z <= floor.max.z
        };

        if !on_floor(self.printer.position) {
            return Err(ConfigError::Inconsistent {
                name: "printer position",
                reason: format!("{:?} lies outside the warehouse", self.printer.position),
            });
        }
        if !on_floor(self.shelf.position) {
            return Err(ConfigError::Inconsistent {
                name: "shelf position",
                reason: format!("{:?} lies outside the warehouse", self.shelf.position),
            });
        }

        Ok(())
    }

    /// Parses and validates a TOML document.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<SimulationConfig, ConfigError> {
        let config: SimulationConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glamx::Vec3;

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn shelf_outside_the_building_is_rejected() {
        let config = SimulationConfig::default()
            .with_shelf(ShelfConfig::default().with_position(Vec3::new(100.0, 0.0, 0.0)));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("shelf position"));
    }

    #[test]
    fn section_errors_propagate() {
        let config = SimulationConfig::default()
            .with_layout(WarehouseLayout::default().with_size(-1.0, 40.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "warehouse width",
                ..
            })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_toml() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [forklift]
            speed = 6.0

            [shelf]
            levels = 3
            columns = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.forklift.speed, 6.0);
        assert_eq!(config.forklift.turn_speed, ForkliftConfig::default().turn_speed);
        assert_eq!(config.shelf.levels, 3);
        assert_eq!(config.shelf.columns, 6);

        assert!(matches!(
            SimulationConfig::from_toml_str("[forklift]\nspeed = -1.0"),
            Err(ConfigError::NonPositive { .. })
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("forklift = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
