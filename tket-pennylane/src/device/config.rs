//! Configuration for a [`PytketDevice`][super::PytketDevice].

use serde::{Deserialize, Serialize};

use crate::convert::{WireLabel, WireMap};

/// Optimisation level used for the backend default pass when none is set.
pub const DEFAULT_OPTIMISATION_LEVEL: u8 = 2;

/// The wires of a device, either as a count or as explicit labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Wires {
    /// Wires labelled `0..n`.
    Count(usize),
    /// Wires with explicit labels, in register order.
    Labels(Vec<WireLabel>),
}

impl Wires {
    /// Number of wires.
    pub fn len(&self) -> usize {
        match self {
            Wires::Count(n) => *n,
            Wires::Labels(labels) => labels.len(),
        }
    }

    /// Returns `true` if there are no wires.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the wire labels, in register order.
    pub fn labels(&self) -> Vec<WireLabel> {
        match self {
            Wires::Count(n) => (0..*n).map(|i| WireLabel::Index(i as i64)).collect(),
            Wires::Labels(labels) => labels.clone(),
        }
    }

    /// Maps each label to its position in the quantum register.
    pub fn wire_map(&self) -> WireMap {
        WireMap::from_labels(self.labels())
    }
}

impl From<usize> for Wires {
    fn from(n: usize) -> Self {
        Wires::Count(n)
    }
}

impl From<Vec<WireLabel>> for Wires {
    fn from(labels: Vec<WireLabel>) -> Self {
        Wires::Labels(labels)
    }
}

/// Options used when creating a [`PytketDevice`][super::PytketDevice].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DeviceConfig {
    /// The device wires.
    pub wires: Wires,
    /// Number of shots, only used by backends that support shots.
    ///
    /// When `None`, the backend decides.
    #[serde(default)]
    pub shots: Option<u32>,
    /// Optimisation level for the backend default compilation pass.
    ///
    /// Ignored when the device is given an explicit pass. When `None`,
    /// [`DEFAULT_OPTIMISATION_LEVEL`] is used.
    #[serde(default)]
    pub optimisation_level: Option<u8>,
}

impl DeviceConfig {
    /// Create a new [`DeviceConfig`] over the given wires.
    pub fn new(wires: impl Into<Wires>) -> Self {
        Self {
            wires: wires.into(),
            shots: None,
            optimisation_level: None,
        }
    }

    /// Set the number of shots.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Set the optimisation level of the backend default pass.
    #[must_use]
    pub fn with_optimisation_level(mut self, level: u8) -> Self {
        self.optimisation_level = Some(level);
        self
    }

    /// Load a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of wires on the device.
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    /// The optimisation level to request from the backend.
    pub fn optimisation_level(&self) -> u8 {
        self.optimisation_level.unwrap_or(DEFAULT_OPTIMISATION_LEVEL)
    }
}
