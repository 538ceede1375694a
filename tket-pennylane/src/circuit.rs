//! A pytket-style quantum circuit.
//!
//! [`Circuit`] is a flat list of [`Command`]s over named qubits and bits, with
//! a global phase. It plays the role of pytket's `Circuit` object: it is the
//! output of [`crate::pennylane_to_tk`] and the input of
//! [`crate::tk_to_qiskit`], and it can be exchanged with pytket through its
//! JSON serialization, see [`crate::serialize`].
//!
//! All parameters are expressed in half-turns, following the pytket
//! convention.

pub mod op;
pub mod units;

use derive_more::{Display, Error};
use indexmap::IndexSet;
use itertools::Itertools;
use tket_json_rs::OpType;

pub use op::{gate_signature, GateSignature, Op, Param, Unitary2qMatrix};
pub use units::{Bit, BitRegister, Qubit, QubitRegister, Unit};

/// An operation applied to some qubits and bits.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    op: Op,
    args: Vec<Unit>,
}

impl Command {
    /// Returns the operation.
    pub fn op(&self) -> &Op {
        &self.op
    }

    /// Returns the arguments, in order.
    pub fn args(&self) -> &[Unit] {
        &self.args
    }

    /// Iterates over the qubit arguments, in order.
    pub fn qubits(&self) -> impl Iterator<Item = &Qubit> + '_ {
        self.args.iter().filter_map(Unit::as_qubit)
    }

    /// Iterates over the bit arguments, in order.
    pub fn bits(&self) -> impl Iterator<Item = &Bit> + '_ {
        self.args.iter().filter_map(Unit::as_bit)
    }
}

/// A quantum circuit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Circuit {
    name: Option<String>,
    qubits: IndexSet<Qubit>,
    bits: IndexSet<Bit>,
    commands: Vec<Command>,
    phase: Param,
}

impl Circuit {
    /// Creates an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty named circuit.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Returns the name of the circuit.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the global phase, in half-turns.
    pub fn phase(&self) -> &Param {
        &self.phase
    }

    /// Adds to the global phase.
    pub fn add_phase(&mut self, phase: impl Into<Param>) {
        let phase = std::mem::take(&mut self.phase) + phase.into();
        self.phase = phase;
    }

    /// Declares a new qubit.
    pub fn add_qubit(&mut self, qubit: Qubit) -> Result<(), CircuitError> {
        if self.qubits.contains(&qubit) {
            return Err(CircuitError::UnitExists { unit: qubit.into() });
        }
        self.qubits.insert(qubit);
        Ok(())
    }

    /// Declares a new bit.
    pub fn add_bit(&mut self, bit: Bit) -> Result<(), CircuitError> {
        if self.bits.contains(&bit) {
            return Err(CircuitError::UnitExists { unit: bit.into() });
        }
        self.bits.insert(bit);
        Ok(())
    }

    /// Declares all the qubits in a register.
    pub fn add_q_register(&mut self, reg: &QubitRegister) -> Result<(), CircuitError> {
        reg.iter().try_for_each(|q| self.add_qubit(q))
    }

    /// Declares all the bits in a register.
    pub fn add_c_register(&mut self, reg: &BitRegister) -> Result<(), CircuitError> {
        reg.iter().try_for_each(|b| self.add_bit(b))
    }

    /// Iterates over the declared qubits, in declaration order.
    pub fn qubits(&self) -> impl ExactSizeIterator<Item = &Qubit> + '_ {
        self.qubits.iter()
    }

    /// Iterates over the declared bits, in declaration order.
    pub fn bits(&self) -> impl ExactSizeIterator<Item = &Bit> + '_ {
        self.bits.iter()
    }

    /// Returns `true` if the qubit is declared.
    pub fn has_qubit(&self, qubit: &Qubit) -> bool {
        self.qubits.contains(qubit)
    }

    /// Returns `true` if the bit is declared.
    pub fn has_bit(&self, bit: &Bit) -> bool {
        self.bits.contains(bit)
    }

    /// Returns the declaration position of a qubit.
    pub fn qubit_position(&self, qubit: &Qubit) -> Option<usize> {
        self.qubits.get_index_of(qubit)
    }

    /// Returns the number of declared qubits.
    pub fn n_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Returns the number of declared bits.
    pub fn n_bits(&self) -> usize {
        self.bits.len()
    }

    /// Returns the commands of the circuit, in program order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns the number of commands in the circuit.
    pub fn n_commands(&self) -> usize {
        self.commands.len()
    }

    /// Counts the commands with the given operation type.
    ///
    /// Conditional commands are counted as [`OpType::Conditional`].
    pub fn n_gates_of_type(&self, op_type: &OpType) -> usize {
        self.commands
            .iter()
            .filter(|cmd| &cmd.op.op_type() == op_type)
            .count()
    }

    /// Appends a primitive gate.
    ///
    /// # Errors
    ///
    /// Fails if the operation type is not a primitive gate, if the number of
    /// parameters or qubits does not match its signature, or if a qubit is not
    /// declared in the circuit.
    pub fn add_gate(
        &mut self,
        op_type: OpType,
        params: impl IntoIterator<Item = impl Into<Param>>,
        qubits: &[Qubit],
    ) -> Result<&mut Self, CircuitError> {
        let Some(sig) = gate_signature(&op_type) else {
            return Err(CircuitError::UnsupportedGate { op_type });
        };
        let params = params.into_iter().map_into().collect_vec();
        if params.len() != sig.params {
            return Err(CircuitError::WrongParamCount {
                op_type,
                expected: sig.params,
                given: params.len(),
            });
        }
        match sig.qubits {
            Some(n) if n != qubits.len() => {
                return Err(CircuitError::WrongQubitCount {
                    op_type,
                    expected: n,
                    given: qubits.len(),
                })
            }
            None if qubits.is_empty() => {
                return Err(CircuitError::WrongQubitCount {
                    op_type,
                    expected: 1,
                    given: 0,
                })
            }
            _ => {}
        }
        let args = qubits.iter().cloned().map_into().collect();
        self.push_command(Op::Gate { op_type, params }, args)?;
        Ok(self)
    }

    /// Appends a measurement of `qubit` into `bit`.
    pub fn add_measure(&mut self, qubit: Qubit, bit: Bit) -> Result<&mut Self, CircuitError> {
        self.push_command(Op::Measure, vec![qubit.into(), bit.into()])?;
        Ok(self)
    }

    /// Appends a reset of `qubit`.
    pub fn add_reset(&mut self, qubit: Qubit) -> Result<&mut Self, CircuitError> {
        self.push_command(Op::Reset, vec![qubit.into()])?;
        Ok(self)
    }

    /// Appends a barrier over some qubits.
    pub fn add_barrier(&mut self, qubits: &[Qubit]) -> Result<&mut Self, CircuitError> {
        let args = qubits.iter().cloned().map_into().collect();
        self.push_command(Op::Barrier, args)?;
        Ok(self)
    }

    /// Appends a sub-circuit as a single boxed operation.
    ///
    /// The box's qubits and bits are matched positionally with `qubits` and `bits`.
    pub fn add_circbox(
        &mut self,
        circ: Circuit,
        qubits: &[Qubit],
        bits: &[Bit],
    ) -> Result<&mut Self, CircuitError> {
        if circ.n_qubits() != qubits.len() {
            return Err(CircuitError::WrongQubitCount {
                op_type: OpType::CircBox,
                expected: circ.n_qubits(),
                given: qubits.len(),
            });
        }
        if circ.n_bits() != bits.len() {
            return Err(CircuitError::WrongBitCount {
                op_type: OpType::CircBox,
                expected: circ.n_bits(),
                given: bits.len(),
            });
        }
        let args = qubits
            .iter()
            .cloned()
            .map_into()
            .chain(bits.iter().cloned().map_into())
            .collect();
        self.push_command(Op::CircBox(Box::new(circ)), args)?;
        Ok(self)
    }

    /// Appends a two-qubit unitary.
    pub fn add_unitary2q(
        &mut self,
        matrix: Unitary2qMatrix,
        qubits: [Qubit; 2],
    ) -> Result<&mut Self, CircuitError> {
        let args = qubits.into_iter().map_into().collect();
        self.push_command(Op::Unitary2qBox(Box::new(matrix)), args)?;
        Ok(self)
    }

    /// Appends an operation guarded by `condition_bits == value`.
    ///
    /// `args` are the arguments of the guarded operation.
    pub fn add_conditional(
        &mut self,
        op: Op,
        condition_bits: &[Bit],
        value: u64,
        args: impl IntoIterator<Item = Unit>,
    ) -> Result<&mut Self, CircuitError> {
        let all_args = condition_bits
            .iter()
            .cloned()
            .map_into()
            .chain(args)
            .collect();
        let op = Op::Conditional {
            op: Box::new(op),
            width: condition_bits.len(),
            value,
        };
        self.push_command(op, all_args)?;
        Ok(self)
    }

    /// Appends all the commands of `other`, and adds its phase.
    ///
    /// Units are matched by name, so every unit of `other` must already be
    /// declared in this circuit.
    pub fn append(&mut self, other: &Circuit) -> Result<(), CircuitError> {
        if let Some(q) = other.qubits().find(|q| !self.qubits.contains(*q)) {
            return Err(CircuitError::UnknownUnit {
                unit: q.clone().into(),
            });
        }
        if let Some(b) = other.bits().find(|b| !self.bits.contains(*b)) {
            return Err(CircuitError::UnknownUnit {
                unit: b.clone().into(),
            });
        }
        self.commands.extend(other.commands.iter().cloned());
        self.add_phase(other.phase.clone());
        Ok(())
    }

    /// Returns the adjoint circuit: commands in reverse order, each replaced
    /// by its inverse, and the phase negated.
    ///
    /// # Errors
    ///
    /// Fails with [`CircuitError::NonInvertible`] if the circuit contains
    /// measurements, resets or conditionals.
    pub fn dagger(&self) -> Result<Circuit, CircuitError> {
        let commands = self
            .commands
            .iter()
            .rev()
            .map(|cmd| {
                Ok(Command {
                    op: cmd.op.dagger()?,
                    args: cmd.args.clone(),
                })
            })
            .collect::<Result<_, CircuitError>>()?;
        Ok(Circuit {
            name: self.name.clone(),
            qubits: self.qubits.clone(),
            bits: self.bits.clone(),
            commands,
            phase: -self.phase.clone(),
        })
    }

    /// Measures every qubit into the bit with the same position in register "c".
    ///
    /// Missing bits are declared.
    pub fn measure_all(&mut self) -> Result<(), CircuitError> {
        let qubits = self.qubits.iter().cloned().collect_vec();
        for (i, qubit) in qubits.into_iter().enumerate() {
            let bit = Bit::new("c", i);
            if !self.bits.contains(&bit) {
                self.bits.insert(bit.clone());
            }
            self.add_measure(qubit, bit)?;
        }
        Ok(())
    }

    fn push_command(&mut self, op: Op, args: Vec<Unit>) -> Result<(), CircuitError> {
        for (i, arg) in args.iter().enumerate() {
            let declared = match arg {
                Unit::Qubit(q) => self.qubits.contains(q),
                Unit::Bit(b) => self.bits.contains(b),
            };
            if !declared {
                return Err(CircuitError::UnknownUnit { unit: arg.clone() });
            }
            if args[..i].contains(arg) {
                return Err(CircuitError::DuplicateUnit { unit: arg.clone() });
            }
        }
        self.commands.push(Command { op, args });
        Ok(())
    }
}

/// Errors raised while building a [`Circuit`].
#[derive(Debug, Display, Error, Clone)]
#[non_exhaustive]
pub enum CircuitError {
    /// The operation type cannot be added as a primitive gate.
    #[display("{op_type:?} is not a supported gate.")]
    UnsupportedGate {
        /// The operation type.
        op_type: OpType,
    },
    /// The gate was given the wrong number of parameters.
    #[display("{op_type:?} expects {expected} parameters, but {given} were given.")]
    WrongParamCount {
        /// The operation type.
        op_type: OpType,
        /// Expected parameter count.
        expected: usize,
        /// Given parameter count.
        given: usize,
    },
    /// The operation was given the wrong number of qubits.
    #[display("{op_type:?} expects {expected} qubits, but {given} were given.")]
    WrongQubitCount {
        /// The operation type.
        op_type: OpType,
        /// Expected qubit count.
        expected: usize,
        /// Given qubit count.
        given: usize,
    },
    /// The operation was given the wrong number of bits.
    #[display("{op_type:?} expects {expected} bits, but {given} were given.")]
    WrongBitCount {
        /// The operation type.
        op_type: OpType,
        /// Expected bit count.
        expected: usize,
        /// Given bit count.
        given: usize,
    },
    /// A command refers to an undeclared unit.
    #[display("Unit {unit} is not declared in the circuit.")]
    UnknownUnit {
        /// The unit.
        unit: Unit,
    },
    /// A command uses the same unit twice.
    #[display("Unit {unit} is used more than once by the same command.")]
    DuplicateUnit {
        /// The unit.
        unit: Unit,
    },
    /// The unit is already declared.
    #[display("Unit {unit} already exists in the circuit.")]
    UnitExists {
        /// The unit.
        unit: Unit,
    },
    /// The operation has no inverse.
    #[display("Cannot invert operation {op}.")]
    NonInvertible {
        /// The operation name.
        op: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_asserts::assert_matches;
    use rstest::{fixture, rstest};

    #[fixture]
    fn two_qubits() -> Circuit {
        let mut circ = Circuit::with_name("test");
        circ.add_q_register(&QubitRegister::new("q", 2)).unwrap();
        circ.add_c_register(&BitRegister::new("c", 2)).unwrap();
        circ
    }

    #[rstest]
    fn build_commands(mut two_qubits: Circuit) {
        let q = QubitRegister::new("q", 2).to_list();
        two_qubits
            .add_gate(OpType::H, Vec::<f64>::new(), &q[..1])
            .unwrap()
            .add_gate(OpType::CX, Vec::<f64>::new(), &q)
            .unwrap()
            .add_measure(q[1].clone(), Bit::new("c", 1))
            .unwrap();
        assert_eq!(two_qubits.n_commands(), 3);
        assert_eq!(two_qubits.n_gates_of_type(&OpType::Measure), 1);
        let cx = &two_qubits.commands()[1];
        assert_eq!(cx.qubits().cloned().collect_vec(), q);
        assert_eq!(cx.bits().count(), 0);
    }

    #[rstest]
    fn arity_errors(mut two_qubits: Circuit) {
        let q = QubitRegister::new("q", 2).to_list();
        assert_matches!(
            two_qubits.add_gate(OpType::Rz, Vec::<f64>::new(), &q[..1]),
            Err(CircuitError::WrongParamCount { expected: 1, given: 0, .. })
        );
        assert_matches!(
            two_qubits.add_gate(OpType::CX, Vec::<f64>::new(), &q[..1]),
            Err(CircuitError::WrongQubitCount { expected: 2, given: 1, .. })
        );
        assert_matches!(
            two_qubits.add_gate(OpType::CX, Vec::<f64>::new(), &[q[0].clone(), q[0].clone()]),
            Err(CircuitError::DuplicateUnit { .. })
        );
        assert_matches!(
            two_qubits.add_gate(OpType::X, Vec::<f64>::new(), &[Qubit::new("r", 0)]),
            Err(CircuitError::UnknownUnit { .. })
        );
        assert_matches!(
            two_qubits.add_gate(OpType::Measure, Vec::<f64>::new(), &q[..1]),
            Err(CircuitError::UnsupportedGate { .. })
        );
        assert_eq!(two_qubits.n_commands(), 0);
    }

    #[rstest]
    fn dagger_reverses(mut two_qubits: Circuit) {
        let q = QubitRegister::new("q", 2).to_list();
        two_qubits
            .add_gate(OpType::T, Vec::<f64>::new(), &q[..1])
            .unwrap()
            .add_gate(OpType::CRz, [0.5], &q)
            .unwrap();
        two_qubits.add_phase(0.25);

        let inv = two_qubits.dagger().unwrap();
        let ops = inv.commands().iter().map(|c| c.op().clone()).collect_vec();
        assert_eq!(
            ops,
            vec![
                Op::gate(OpType::CRz, [-0.5]),
                Op::gate(OpType::Tdg, Vec::<f64>::new())
            ]
        );
        assert_eq!(inv.phase(), &Param::Value(-0.25));

        two_qubits.add_measure(q[0].clone(), Bit::new("c", 0)).unwrap();
        assert_matches!(two_qubits.dagger(), Err(CircuitError::NonInvertible { .. }));
    }

    #[rstest]
    fn append_requires_units(mut two_qubits: Circuit) {
        let mut other = Circuit::new();
        other.add_qubit(Qubit::new("q", 1)).unwrap();
        other
            .add_gate(OpType::X, Vec::<f64>::new(), &[Qubit::new("q", 1)])
            .unwrap();
        other.add_phase(0.5);
        two_qubits.append(&other).unwrap();
        assert_eq!(two_qubits.n_commands(), 1);
        assert_eq!(two_qubits.phase(), &Param::Value(0.5));

        let mut foreign = Circuit::new();
        foreign.add_qubit(Qubit::new("r", 0)).unwrap();
        assert_matches!(
            two_qubits.append(&foreign),
            Err(CircuitError::UnknownUnit { .. })
        );
    }

    #[test]
    fn measure_all_adds_bits() {
        let mut circ = Circuit::new();
        circ.add_q_register(&QubitRegister::new("q", 2)).unwrap();
        circ.measure_all().unwrap();
        assert_eq!(circ.n_bits(), 2);
        assert_eq!(circ.n_gates_of_type(&OpType::Measure), 2);
        let second = &circ.commands()[1];
        assert_eq!(
            second.args(),
            [Unit::Qubit(Qubit::new("q", 1)), Unit::Bit(Bit::new("c", 1))]
        );
    }

    #[rstest]
    fn boxes_and_conditionals(mut two_qubits: Circuit) {
        let mut inner = Circuit::new();
        inner.add_q_register(&QubitRegister::new("q", 1)).unwrap();
        inner
            .add_gate(OpType::S, Vec::<f64>::new(), &[Qubit::new("q", 0)])
            .unwrap();

        let q = QubitRegister::new("q", 2).to_list();
        let c = BitRegister::new("c", 2).to_list();
        two_qubits.add_circbox(inner.clone(), &q[1..], &[]).unwrap();
        assert_matches!(
            two_qubits.add_circbox(inner, &q, &[]),
            Err(CircuitError::WrongQubitCount { .. })
        );
        two_qubits
            .add_conditional(Op::gate(OpType::X, Vec::<f64>::new()), &c, 3, [q[0].clone().into()])
            .unwrap();
        let cond = &two_qubits.commands()[1];
        assert_matches!(cond.op(), Op::Conditional { width: 2, value: 3, .. });
        assert_eq!(cond.args().len(), 3);

        let inv = two_qubits.commands()[0].op().dagger().unwrap();
        let Op::CircBox(inv) = inv else {
            panic!("Expected a box");
        };
        assert_eq!(
            inv.commands()[0].op(),
            &Op::gate(OpType::Sdg, Vec::<f64>::new())
        );
    }
}
