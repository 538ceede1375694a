//! Translation of circuits between PennyLane, pytket and Qiskit.
//!
//! - [`pennylane::pennylane_to_tk`] builds a pytket [`Circuit`] from a list
//!   of PennyLane operations.
//! - [`pennylane::tk_to_pennylane`] recovers PennyLane operations from a
//!   circuit made of supported gates.
//! - [`qiskit::tk_to_qiskit`] rebuilds a pytket [`Circuit`] as a Qiskit
//!   [`QuantumCircuit`].
//!
//! PennyLane operations are consumed through the [`Operation`] trait, so
//! callers can pass their own operation type. [`GateRecord`] is a plain
//! implementation of it.
//!
//! [`Circuit`]: crate::Circuit
//! [`QuantumCircuit`]: crate::qiskit::QuantumCircuit

pub mod pennylane;
pub mod qiskit;

use std::collections::HashMap;

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::circuit::CircuitError;
use crate::ops::INVERSE_SUFFIX;
use crate::qiskit::QiskitError;

pub use pennylane::{apply_operations, pennylane_to_tk, tk_to_pennylane, CIRCUIT_NAME};
pub use qiskit::tk_to_qiskit;

/// A wire label, as used by PennyLane devices.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(untagged)]
pub enum WireLabel {
    /// An integer label.
    Index(i64),
    /// A string label.
    Name(String),
}

impl From<&str> for WireLabel {
    fn from(name: &str) -> Self {
        WireLabel::Name(name.to_string())
    }
}

/// Map from device wire labels to qubit positions in the quantum register.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireMap(HashMap<WireLabel, usize>);

impl WireMap {
    /// Creates an empty wire map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the labels `0..n` to the positions `0..n`.
    pub fn identity(n: usize) -> Self {
        (0..n).map(|i| (WireLabel::Index(i as i64), i)).collect()
    }

    /// Maps each label to its position in `labels`.
    pub fn from_labels(labels: impl IntoIterator<Item = WireLabel>) -> Self {
        labels.into_iter().enumerate().map(|(i, l)| (l, i)).collect()
    }

    /// Maps `label` to `index`, returning the previous index if any.
    pub fn insert(&mut self, label: impl Into<WireLabel>, index: usize) -> Option<usize> {
        self.0.insert(label.into(), index)
    }

    /// Returns the index a label maps to.
    pub fn get(&self, label: &WireLabel) -> Option<usize> {
        self.0.get(label).copied()
    }

    /// Number of mapped labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no label is mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<WireLabel>> FromIterator<(L, usize)> for WireMap {
    fn from_iter<T: IntoIterator<Item = (L, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(l, i)| (l.into(), i)).collect())
    }
}

/// A PennyLane operation, as seen by the translator.
pub trait Operation {
    /// The operation name, possibly carrying the inverse suffix.
    fn name(&self) -> &str;

    /// Numeric parameters, in radians.
    fn parameters(&self) -> &[f64];

    /// Wire labels the operation acts on, in order.
    fn wires(&self) -> &[WireLabel];

    /// Whether the operation must be inverted.
    fn is_inverted(&self) -> bool {
        self.name().ends_with(INVERSE_SUFFIX)
    }
}

/// A recorded PennyLane operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    /// The operation name.
    pub name: String,
    /// Parameters, in radians.
    #[serde(default)]
    pub parameters: Vec<f64>,
    /// Wire labels.
    pub wires: Vec<WireLabel>,
    /// Explicit adjoint flag, set by [`GateRecord::adjoint`].
    #[serde(default)]
    pub inverse: bool,
}

impl GateRecord {
    /// Creates a new operation record.
    pub fn new(
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = f64>,
        wires: impl IntoIterator<Item = impl Into<WireLabel>>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().collect(),
            wires: wires.into_iter().map(Into::into).collect(),
            inverse: false,
        }
    }

    /// Wraps the operation in an adjoint.
    ///
    /// Taking the adjoint twice gives back the original operation.
    pub fn adjoint(mut self) -> Self {
        self.inverse = !self.inverse;
        self
    }

    /// Returns the operation name without the inverse suffix.
    pub fn base_name(&self) -> &str {
        self.name
            .strip_suffix(INVERSE_SUFFIX)
            .unwrap_or(&self.name)
    }
}

impl Operation for GateRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    fn wires(&self) -> &[WireLabel] {
        &self.wires
    }

    fn is_inverted(&self) -> bool {
        self.inverse != self.name.ends_with(INVERSE_SUFFIX)
    }
}

/// A rule a classical condition broke during the Qiskit translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[non_exhaustive]
pub enum ConditionRule {
    /// The condition does not cover a whole register.
    #[display("conditions must use an entire register")]
    PartialRegister,
    /// The condition spans more than one register.
    #[display("conditions can only use a single register")]
    MultipleRegisters,
    /// The condition bits are not listed in register order.
    #[display("conditions must list the register bits in order")]
    OutOfOrder,
}

/// Errors raised while translating circuits.
#[derive(Debug, Display, Error, From)]
#[non_exhaustive]
pub enum ConvertError {
    /// The PennyLane operation has no pytket equivalent.
    #[display("Operation {name} is not supported by the pytket device.")]
    UnsupportedGate {
        /// The operation name.
        name: String,
    },
    /// The wire label is not in the wire map.
    #[display("Wire {wire} is not in the wire map.")]
    UnresolvedWire {
        /// The wire label.
        wire: WireLabel,
    },
    /// The wire maps outside of the quantum register.
    #[display("Wire {wire} maps to position {index}, outside of register {register} of size {size}.")]
    WireOutOfRange {
        /// The wire label.
        wire: WireLabel,
        /// The mapped position.
        index: usize,
        /// The register name.
        register: String,
        /// The register size.
        size: usize,
    },
    /// The classical condition of a command cannot be expressed in Qiskit.
    #[display("Unsupported condition: {rule}.")]
    UnsupportedCondition {
        /// The broken rule.
        rule: ConditionRule,
    },
    /// The pytket operation has no equivalent in the target vocabulary.
    #[display("Cannot convert pytket operation {op}.")]
    UnsupportedOp {
        /// The operation name.
        op: String,
    },
    /// A unit does not have exactly one index.
    #[display("Qiskit registers must use a single index, but register {register} does not.")]
    MultiIndexedRegister {
        /// The register name.
        register: String,
    },
    /// The operation has symbolic parameters, which PennyLane operations
    /// cannot carry.
    #[display("Operation {op} has symbolic parameters.")]
    SymbolicParameter {
        /// The operation name.
        op: String,
    },
    /// The command arguments do not match its operation.
    #[display("Command {op} has malformed arguments.")]
    MalformedCommand {
        /// The operation name.
        op: String,
    },
    /// Error while building the pytket circuit.
    #[display("{_0}")]
    #[from]
    Circuit(CircuitError),
    /// Error while building the Qiskit circuit.
    #[display("{_0}")]
    #[from]
    Qiskit(QiskitError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::suffix(GateRecord::new("RZ.inv", [0.1], [0_i64]), true)]
    #[case::adjoint(GateRecord::new("RZ", [0.1], [0_i64]).adjoint(), true)]
    #[case::double(GateRecord::new("RZ.inv", [0.1], [0_i64]).adjoint(), false)]
    #[case::plain(GateRecord::new("RZ", [0.1], [0_i64]), false)]
    fn inversion(#[case] op: GateRecord, #[case] inverted: bool) {
        assert_eq!(op.is_inverted(), inverted);
        assert_eq!(op.base_name(), "RZ");
    }

    #[test]
    fn wire_labels() {
        let map: WireMap = [(WireLabel::from("a"), 1), (WireLabel::Index(3), 0)]
            .into_iter()
            .collect();
        assert_eq!(map.get(&"a".into()), Some(1));
        assert_eq!(map.get(&WireLabel::Index(3)), Some(0));
        assert_eq!(map.get(&WireLabel::Index(0)), None);
        assert_eq!(WireMap::identity(2).get(&WireLabel::Index(1)), Some(1));
    }

    #[test]
    fn record_from_json() {
        let op: GateRecord =
            serde_json::from_str(r#"{"name": "CNOT", "wires": [0, "aux"]}"#).unwrap();
        assert_eq!(op, GateRecord::new("CNOT", [], [WireLabel::Index(0), WireLabel::from("aux")]));
        assert!(!op.is_inverted());
    }
}
