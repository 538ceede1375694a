//! Interfaces to the execution backends and compilation passes driven by a
//! [`PytketDevice`].
//!
//! [`PytketDevice`]: super::PytketDevice

use std::fmt;

use derive_more::{Display, Error};
use itertools::Itertools;
use num_complex::Complex64;

use crate::circuit::{Bit, Circuit, Qubit, Unit};

/// A pytket-style execution backend.
pub trait Backend {
    /// Whether the backend returns measurement shots.
    fn supports_shots(&self) -> bool;

    /// Whether the backend returns a statevector.
    fn supports_state(&self) -> bool;

    /// The compilation pass making circuits valid for this backend, at the
    /// given optimisation level.
    fn default_compilation_pass(&self, optimisation_level: u8) -> Box<dyn CompilationPass>;

    /// Runs a compiled circuit and waits for its result.
    ///
    /// `n_shots` is `None` for backends that do not support shots.
    fn process_circuit(
        &mut self,
        circuit: &Circuit,
        n_shots: Option<u32>,
    ) -> Result<BackendResult, BackendError>;
}

/// A circuit transformation applied before execution.
pub trait CompilationPass: fmt::Debug + Send + Sync {
    /// A short name for the pass.
    fn name(&self) -> &str {
        "BasePass"
    }

    /// Transforms the circuit in place. Returns `true` if it was modified.
    fn apply(&self, circ: &mut Circuit) -> Result<bool, BackendError>;
}

/// Applies a list of passes in order.
#[derive(Debug, Default)]
pub struct SequencePass {
    passes: Vec<Box<dyn CompilationPass>>,
}

impl SequencePass {
    /// Creates a pass running `passes` in order.
    pub fn new(passes: impl IntoIterator<Item = Box<dyn CompilationPass>>) -> Self {
        Self {
            passes: passes.into_iter().collect(),
        }
    }

    /// Returns the inner passes.
    pub fn passes(&self) -> &[Box<dyn CompilationPass>] {
        &self.passes
    }
}

impl CompilationPass for SequencePass {
    fn name(&self) -> &str {
        "SequencePass"
    }

    fn apply(&self, circ: &mut Circuit) -> Result<bool, BackendError> {
        let mut changed = false;
        for pass in &self.passes {
            changed |= pass.apply(circ)?;
        }
        Ok(changed)
    }
}

/// The result of running a circuit on a [`Backend`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackendResult {
    bits: Vec<Bit>,
    shots: Option<Vec<Vec<u8>>>,
    qubits: Vec<Qubit>,
    state: Option<Vec<Complex64>>,
}

impl BackendResult {
    /// A shots table, one row per shot and one column per bit of `bits`.
    pub fn from_shots(bits: Vec<Bit>, shots: Vec<Vec<u8>>) -> Self {
        Self {
            bits,
            shots: Some(shots),
            ..Self::default()
        }
    }

    /// A statevector over `qubits`, with the first qubit as the most
    /// significant bit of the basis index.
    pub fn from_state(qubits: Vec<Qubit>, state: Vec<Complex64>) -> Self {
        Self {
            qubits,
            state: Some(state),
            ..Self::default()
        }
    }

    /// Returns the shots table restricted to `bits`, in that order.
    pub fn get_shots(&self, bits: &[Bit]) -> Result<Vec<Vec<u8>>, BackendError> {
        let shots = self.shots.as_ref().ok_or(BackendError::NoShots)?;
        let columns: Vec<usize> = bits
            .iter()
            .map(|b| {
                self.bits
                    .iter()
                    .position(|rb| rb == b)
                    .ok_or_else(|| BackendError::MissingUnit {
                        unit: b.clone().into(),
                    })
            })
            .collect::<Result<_, _>>()?;
        shots
            .iter()
            .map(|row| {
                if row.len() != self.bits.len() {
                    return Err(BackendError::MalformedResult {
                        reason: format!(
                            "shot has {} outcomes for {} bits",
                            row.len(),
                            self.bits.len()
                        ),
                    });
                }
                Ok(columns.iter().map(|&c| row[c]).collect())
            })
            .collect()
    }

    /// Returns the statevector with the qubits reordered as in `qubits`.
    ///
    /// `qubits` must be a permutation of the result's qubits.
    pub fn get_state(&self, qubits: &[Qubit]) -> Result<Vec<Complex64>, BackendError> {
        let state = self.state.as_ref().ok_or(BackendError::NoState)?;
        if let Some(q) = qubits.iter().find(|q| !self.qubits.contains(q)) {
            return Err(BackendError::MissingUnit {
                unit: q.clone().into(),
            });
        }
        if let Some(q) = self.qubits.iter().find(|q| !qubits.contains(q)) {
            return Err(BackendError::MissingUnit {
                unit: q.clone().into(),
            });
        }
        let n = self.qubits.len();
        if u32::try_from(n).ok().and_then(|n| 1usize.checked_shl(n)) != Some(state.len()) {
            return Err(BackendError::MalformedResult {
                reason: format!("state has {} amplitudes for {n} qubits", state.len()),
            });
        }
        let target_pos = self
            .qubits
            .iter()
            .map(|q| qubits.iter().position(|r| r == q).unwrap_or_default())
            .collect_vec();

        let mut permuted = vec![Complex64::default(); state.len()];
        for (idx, amp) in state.iter().enumerate() {
            let new_idx = target_pos
                .iter()
                .enumerate()
                .fold(0, |acc, (k, &p)| acc | (((idx >> (n - 1 - k)) & 1) << (n - 1 - p)));
            permuted[new_idx] = *amp;
        }
        Ok(permuted)
    }
}

/// Errors raised by a [`Backend`] or a [`CompilationPass`].
#[derive(Debug, Display, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum BackendError {
    /// The circuit does not satisfy the backend requirements.
    #[display("Circuit is not valid for the backend: {reason}")]
    CircuitNotValid {
        /// Description of the broken requirement.
        reason: String,
    },
    /// The result holds no shots.
    #[display("Result does not contain shots.")]
    NoShots,
    /// The result holds no statevector.
    #[display("Result does not contain a state.")]
    NoState,
    /// A requested unit is not part of the result.
    #[display("Unit {unit} is not part of the result.")]
    MissingUnit {
        /// The unit.
        unit: Unit,
    },
    /// The result does not match its own units.
    #[display("Malformed backend result: {reason}")]
    MalformedResult {
        /// What does not match.
        reason: String,
    },
    /// Any other backend failure.
    #[display("{msg}")]
    Custom {
        /// The error message.
        msg: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_asserts::assert_matches;
    use tket_json_rs::OpType;

    #[derive(Debug)]
    struct AddX;

    impl CompilationPass for AddX {
        fn apply(&self, circ: &mut Circuit) -> Result<bool, BackendError> {
            let q = Qubit::new("q", 0);
            circ.add_gate(OpType::X, Vec::<f64>::new(), &[q])
                .map_err(|e| BackendError::Custom { msg: e.to_string() })?;
            Ok(true)
        }
    }

    #[test]
    fn sequence() {
        let pass = SequencePass::new([Box::new(AddX) as Box<dyn CompilationPass>, Box::new(AddX)]);
        let mut circ = Circuit::new();
        circ.add_qubit(Qubit::new("q", 0)).unwrap();
        assert!(pass.apply(&mut circ).unwrap());
        assert_eq!(circ.n_gates_of_type(&OpType::X), 2);
        assert_eq!(pass.name(), "SequencePass");
        assert_eq!(pass.passes()[0].name(), "BasePass");
    }

    #[test]
    fn passes_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SequencePass>();
        assert_send_sync::<Box<dyn CompilationPass>>();
        assert_send_sync::<BackendResult>();
    }

    #[test]
    fn shots_by_bit() {
        let res = BackendResult::from_shots(
            vec![Bit::new("c", 0), Bit::new("c", 1)],
            vec![vec![0, 1], vec![1, 1]],
        );
        assert_eq!(
            res.get_shots(&[Bit::new("c", 1), Bit::new("c", 0)]).unwrap(),
            vec![vec![1, 0], vec![1, 1]]
        );
        assert_matches!(
            res.get_shots(&[Bit::new("d", 0)]),
            Err(BackendError::MissingUnit { .. })
        );
        assert_matches!(res.get_state(&[]), Err(BackendError::NoState));
    }

    #[test]
    fn state_reordering() {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::default();
        // |q0 q1> = |01>
        let res = BackendResult::from_state(
            vec![Qubit::new("q", 0), Qubit::new("q", 1)],
            vec![zero, one, zero, zero],
        );
        assert_eq!(
            res.get_state(&[Qubit::new("q", 0), Qubit::new("q", 1)]).unwrap(),
            vec![zero, one, zero, zero]
        );
        assert_eq!(
            res.get_state(&[Qubit::new("q", 1), Qubit::new("q", 0)]).unwrap(),
            vec![zero, zero, one, zero]
        );
        assert_matches!(
            res.get_state(&[Qubit::new("q", 0)]),
            Err(BackendError::MissingUnit { .. })
        );
    }

    #[test]
    fn short_state() {
        let one = Complex64::new(1.0, 0.0);
        let res = BackendResult::from_state(
            vec![Qubit::new("q", 0), Qubit::new("q", 1)],
            vec![Complex64::default(), one],
        );
        assert_matches!(
            res.get_state(&[Qubit::new("q", 1), Qubit::new("q", 0)]),
            Err(BackendError::MalformedResult { .. })
        );
        let res = BackendResult::from_state(vec![Qubit::new("q", 0)], vec![one; 4]);
        assert_matches!(
            res.get_state(&[Qubit::new("q", 0)]),
            Err(BackendError::MalformedResult { .. })
        );
    }

    #[test]
    fn short_shot_row() {
        let res = BackendResult::from_shots(
            vec![Bit::new("c", 0), Bit::new("c", 1)],
            vec![vec![0, 1], vec![1]],
        );
        assert_matches!(
            res.get_shots(&[Bit::new("c", 1)]),
            Err(BackendError::MalformedResult { .. })
        );
    }
}
