//! A minimal model of Qiskit's `QuantumCircuit` builder.
//!
//! This is the target of [`crate::tk_to_qiskit`]. It keeps registers, the
//! instruction list and the global phase, which is enough to hand a circuit
//! over to a Qiskit-compatible consumer. Parameters are expressed in radians.

use std::fmt;

use derive_more::{Display, Error};
use itertools::Itertools;

use crate::circuit::Unitary2qMatrix;
use crate::ops::QiskitGate;

pub use crate::circuit::{Bit, BitRegister as ClassicalRegister, Qubit, QubitRegister as QuantumRegister};

/// A gate parameter, in radians.
#[derive(Clone, Debug, PartialEq, derive_more::From)]
pub enum QiskitParam {
    /// A numeric value.
    Value(f64),
    /// A symbolic parameter expression.
    Expression(String),
}

impl fmt::Display for QiskitParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QiskitParam::Value(v) => write!(f, "{v}"),
            QiskitParam::Expression(e) => write!(f, "{e}"),
        }
    }
}

/// An operation appended to a [`QuantumCircuit`].
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Instruction {
    /// A standard gate.
    Gate {
        /// The gate class.
        gate: QiskitGate,
        /// Parameters in radians.
        params: Vec<QiskitParam>,
    },
    /// Measurement of a qubit into a clbit.
    Measure,
    /// Reset of a qubit.
    Reset,
    /// A barrier.
    Barrier,
    /// An explicit two-qubit unitary.
    Unitary(Box<Unitary2qMatrix>),
    /// A sub-circuit converted into a single instruction.
    Composite(Box<QuantumCircuit>),
}

impl Instruction {
    /// Returns the Qiskit instruction name.
    pub fn name(&self) -> &str {
        match self {
            Instruction::Gate { gate, .. } => gate.class_name(),
            Instruction::Measure => "measure",
            Instruction::Reset => "reset",
            Instruction::Barrier => "barrier",
            Instruction::Unitary(_) => "unitary",
            Instruction::Composite(circ) => circ.name().unwrap_or("circuit"),
        }
    }
}

/// An instruction together with its operands.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitInstruction {
    /// The operation.
    pub operation: Instruction,
    /// Qubit operands.
    pub qubits: Vec<Qubit>,
    /// Clbit operands.
    pub clbits: Vec<Bit>,
    /// Classical guard, as a register name and the value it must hold.
    pub condition: Option<(String, u64)>,
}

impl CircuitInstruction {
    /// Guards the instruction with `creg == value`.
    pub fn c_if(&mut self, creg: &ClassicalRegister, value: u64) -> &mut Self {
        self.condition = Some((creg.name().to_string(), value));
        self
    }
}

/// A Qiskit circuit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuantumCircuit {
    name: Option<String>,
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    data: Vec<CircuitInstruction>,
    global_phase: f64,
}

impl QuantumCircuit {
    /// Creates an empty circuit.
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Self::default()
        }
    }

    /// Returns the circuit name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Adds a quantum register.
    pub fn add_qreg(&mut self, reg: QuantumRegister) -> Result<(), QiskitError> {
        if self.qregs.iter().any(|r| r.name() == reg.name()) {
            return Err(QiskitError::RegisterExists {
                name: reg.name().to_string(),
            });
        }
        self.qregs.push(reg);
        Ok(())
    }

    /// Adds a classical register.
    pub fn add_creg(&mut self, reg: ClassicalRegister) -> Result<(), QiskitError> {
        if self.cregs.iter().any(|r| r.name() == reg.name()) {
            return Err(QiskitError::RegisterExists {
                name: reg.name().to_string(),
            });
        }
        self.cregs.push(reg);
        Ok(())
    }

    /// Returns the quantum registers, in insertion order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Returns the classical registers, in insertion order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Returns the classical register with the given name.
    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name() == name)
    }

    /// Total number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qregs.iter().map(QuantumRegister::size).sum()
    }

    /// Total number of clbits.
    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(ClassicalRegister::size).sum()
    }

    /// Returns all the qubits, register by register.
    pub fn qubits(&self) -> Vec<Qubit> {
        self.qregs.iter().flat_map(QuantumRegister::iter).collect()
    }

    /// Returns all the clbits, register by register.
    pub fn clbits(&self) -> Vec<Bit> {
        self.cregs.iter().flat_map(ClassicalRegister::iter).collect()
    }

    /// Returns the instructions, in program order.
    pub fn data(&self) -> &[CircuitInstruction] {
        &self.data
    }

    /// Returns the global phase, in radians.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Adds to the global phase.
    pub fn add_global_phase(&mut self, phase: f64) {
        self.global_phase += phase;
    }

    /// Appends an instruction and returns a handle to it.
    pub fn append(
        &mut self,
        operation: Instruction,
        qubits: Vec<Qubit>,
        clbits: Vec<Bit>,
    ) -> Result<&mut CircuitInstruction, QiskitError> {
        if let Some(q) = qubits.iter().find(|q| !self.has_qubit(q)) {
            return Err(QiskitError::UnknownQubit { qubit: q.clone() });
        }
        if let Some(b) = clbits.iter().find(|b| !self.has_clbit(b)) {
            return Err(QiskitError::UnknownClbit { clbit: b.clone() });
        }
        if let Some(q) = qubits.iter().duplicates().next() {
            return Err(QiskitError::DuplicateQubit { qubit: q.clone() });
        }
        let idx = self.data.len();
        self.data.push(CircuitInstruction {
            operation,
            qubits,
            clbits,
            condition: None,
        });
        Ok(&mut self.data[idx])
    }

    /// Appends a standard gate.
    pub fn gate(
        &mut self,
        gate: QiskitGate,
        params: Vec<QiskitParam>,
        qubits: Vec<Qubit>,
    ) -> Result<&mut CircuitInstruction, QiskitError> {
        self.append(Instruction::Gate { gate, params }, qubits, vec![])
    }

    /// Measures `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: Qubit, clbit: Bit) -> Result<&mut CircuitInstruction, QiskitError> {
        self.append(Instruction::Measure, vec![qubit], vec![clbit])
    }

    /// Resets `qubit`.
    pub fn reset(&mut self, qubit: Qubit) -> Result<&mut CircuitInstruction, QiskitError> {
        self.append(Instruction::Reset, vec![qubit], vec![])
    }

    /// Places a barrier over `qubits`.
    pub fn barrier(&mut self, qubits: Vec<Qubit>) -> Result<&mut CircuitInstruction, QiskitError> {
        self.append(Instruction::Barrier, qubits, vec![])
    }

    /// Appends a multi-controlled X gate.
    pub fn mcx(&mut self, controls: Vec<Qubit>, target: Qubit) -> Result<&mut CircuitInstruction, QiskitError> {
        let qubits = controls.into_iter().chain([target]).collect();
        self.gate(QiskitGate::MCXGate, vec![], qubits)
    }

    /// Converts the whole circuit into a single instruction.
    pub fn to_instruction(self) -> Instruction {
        Instruction::Composite(Box::new(self))
    }

    fn has_qubit(&self, qubit: &Qubit) -> bool {
        self.qregs.iter().any(|r| {
            r.name() == qubit.reg_name() && qubit.single_index().is_some_and(|i| i < r.size())
        })
    }

    fn has_clbit(&self, clbit: &Bit) -> bool {
        self.cregs.iter().any(|r| {
            r.name() == clbit.reg_name() && clbit.single_index().is_some_and(|i| i < r.size())
        })
    }
}

/// Errors raised while building a [`QuantumCircuit`].
#[derive(Debug, Display, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QiskitError {
    /// A register with the same name already exists.
    #[display("Register {name} already exists.")]
    RegisterExists {
        /// The register name.
        name: String,
    },
    /// The qubit does not belong to any register of the circuit.
    #[display("Qubit {qubit} is not in the circuit.")]
    UnknownQubit {
        /// The qubit.
        qubit: Qubit,
    },
    /// The clbit does not belong to any register of the circuit.
    #[display("Clbit {clbit} is not in the circuit.")]
    UnknownClbit {
        /// The clbit.
        clbit: Bit,
    },
    /// The same qubit appears twice in an instruction.
    #[display("Qubit {qubit} is used more than once by the same instruction.")]
    DuplicateQubit {
        /// The qubit.
        qubit: Qubit,
    },
}
