//! Operations that can be placed in a [`Circuit`].
//!
//! Primitive gates are identified by their pytket [`OpType`] and carry their
//! parameters in half-turns. Boxes and conditionals embed further operations,
//! so [`Op`] is a recursive type.

use std::fmt;
use std::ops::{Add, Neg};

use itertools::Itertools;
use num_complex::Complex64;
use tket_json_rs::OpType;

use super::{Circuit, CircuitError};

/// Matrix of a two-qubit unitary box, in ILO-BE order.
pub type Unitary2qMatrix = [[Complex64; 4]; 4];

/// A gate parameter or phase, expressed in half-turns.
#[derive(Clone, Debug, PartialEq, derive_more::From)]
pub enum Param {
    /// A numeric value.
    Value(f64),
    /// A free symbolic expression.
    Symbolic(String),
}

impl Param {
    /// Parses a parameter string, falling back to a symbolic expression when
    /// it is not a plain number.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<f64>() {
            Ok(v) => Param::Value(v),
            Err(_) => Param::Symbolic(s.to_string()),
        }
    }

    /// Returns the numeric value of the parameter, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Param::Value(v) => Some(*v),
            Param::Symbolic(_) => None,
        }
    }

    /// Returns `true` if the parameter is numeric and equal to zero.
    pub fn is_zero(&self) -> bool {
        self.as_f64() == Some(0.0)
    }
}

impl Default for Param {
    fn default() -> Self {
        Param::Value(0.0)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(v) => write!(f, "{v}"),
            Param::Symbolic(s) => write!(f, "{s}"),
        }
    }
}

impl Neg for Param {
    type Output = Param;

    fn neg(self) -> Param {
        match self {
            Param::Value(v) => Param::Value(-v),
            Param::Symbolic(s) => Param::Symbolic(format!("-({s})")),
        }
    }
}

impl Add for Param {
    type Output = Param;

    fn add(self, rhs: Param) -> Param {
        match (self, rhs) {
            (Param::Value(a), Param::Value(b)) => Param::Value(a + b),
            (a, b) if a.is_zero() => b,
            (a, b) if b.is_zero() => a,
            (a, b) => Param::Symbolic(format!("({a}) + ({b})")),
        }
    }
}

/// Number of qubits and parameters taken by a primitive gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateSignature {
    /// Number of qubit arguments, or `None` for gates taking any positive number.
    pub qubits: Option<usize>,
    /// Number of parameters.
    pub params: usize,
}

impl GateSignature {
    const fn fixed(qubits: usize, params: usize) -> Self {
        Self {
            qubits: Some(qubits),
            params,
        }
    }

    const fn variadic(params: usize) -> Self {
        Self {
            qubits: None,
            params,
        }
    }
}

/// Returns the signature of a primitive gate, or `None` if the operation type
/// cannot be added with [`Circuit::add_gate`].
pub fn gate_signature(op_type: &OpType) -> Option<GateSignature> {
    let sig = match op_type {
        OpType::noop
        | OpType::X
        | OpType::Y
        | OpType::Z
        | OpType::H
        | OpType::S
        | OpType::Sdg
        | OpType::T
        | OpType::Tdg
        | OpType::V
        | OpType::Vdg
        | OpType::SX
        | OpType::SXdg => GateSignature::fixed(1, 0),
        OpType::Rx | OpType::Ry | OpType::Rz | OpType::U1 => GateSignature::fixed(1, 1),
        OpType::U2 | OpType::PhasedX => GateSignature::fixed(1, 2),
        OpType::U3 | OpType::TK1 => GateSignature::fixed(1, 3),
        OpType::CX | OpType::CY | OpType::CZ | OpType::CH | OpType::SWAP | OpType::ISWAPMax => {
            GateSignature::fixed(2, 0)
        }
        OpType::CRx
        | OpType::CRy
        | OpType::CRz
        | OpType::CU1
        | OpType::ISWAP
        | OpType::XXPhase
        | OpType::YYPhase
        | OpType::ZZPhase => GateSignature::fixed(2, 1),
        OpType::CU3 => GateSignature::fixed(2, 3),
        OpType::CCX | OpType::CSWAP => GateSignature::fixed(3, 0),
        OpType::CnX => GateSignature::variadic(0),
        OpType::CnRy => GateSignature::variadic(1),
        _ => return None,
    };
    Some(sig)
}

/// An operation in a [`Circuit`].
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Op {
    /// A primitive gate, see [`gate_signature`].
    Gate {
        /// The gate type.
        op_type: OpType,
        /// Parameters in half-turns.
        params: Vec<Param>,
    },
    /// Measurement of a qubit into a bit.
    Measure,
    /// Reset of a qubit to |0>.
    Reset,
    /// A barrier over some qubits.
    Barrier,
    /// A sub-circuit embedded as a single operation.
    CircBox(Box<Circuit>),
    /// An explicit two-qubit unitary.
    Unitary2qBox(Box<Unitary2qMatrix>),
    /// An operation guarded by the value of some classical bits.
    ///
    /// The first `width` arguments of the command are the condition bits,
    /// the rest are the arguments of `op`.
    Conditional {
        /// The guarded operation.
        op: Box<Op>,
        /// Number of condition bits.
        width: usize,
        /// Value the condition bits must hold, little-endian.
        value: u64,
    },
}

impl Op {
    /// Creates a primitive gate operation.
    pub fn gate(op_type: OpType, params: impl IntoIterator<Item = impl Into<Param>>) -> Self {
        Op::Gate {
            op_type,
            params: params.into_iter().map_into().collect(),
        }
    }

    /// Returns the pytket operation type.
    pub fn op_type(&self) -> OpType {
        match self {
            Op::Gate { op_type, .. } => op_type.clone(),
            Op::Measure => OpType::Measure,
            Op::Reset => OpType::Reset,
            Op::Barrier => OpType::Barrier,
            Op::CircBox(_) => OpType::CircBox,
            Op::Unitary2qBox(_) => OpType::Unitary2qBox,
            Op::Conditional { .. } => OpType::Conditional,
        }
    }

    /// Returns the parameters of the operation.
    pub fn params(&self) -> &[Param] {
        match self {
            Op::Gate { params, .. } => params,
            _ => &[],
        }
    }

    /// A human readable name, including the parameters.
    pub fn name(&self) -> String {
        match self {
            Op::Gate { op_type, params } if !params.is_empty() => {
                format!("{op_type:?}({})", params.iter().join(", "))
            }
            Op::Conditional { op, .. } => format!("Conditional({})", op.name()),
            op => format!("{:?}", op.op_type()),
        }
    }

    /// Returns the inverse operation.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitError::NonInvertible`] for measurements, resets,
    /// conditionals and gates without a known inverse.
    pub fn dagger(&self) -> Result<Op, CircuitError> {
        let non_invertible = || CircuitError::NonInvertible { op: self.name() };
        match self {
            Op::Gate { op_type, params } => {
                let (op_type, params) = gate_dagger(op_type, params).ok_or_else(non_invertible)?;
                Ok(Op::Gate { op_type, params })
            }
            Op::Barrier => Ok(Op::Barrier),
            Op::CircBox(circ) => Ok(Op::CircBox(Box::new(circ.dagger()?))),
            Op::Unitary2qBox(matrix) => Ok(Op::Unitary2qBox(Box::new(conj_transpose(matrix)))),
            Op::Measure | Op::Reset | Op::Conditional { .. } => Err(non_invertible()),
        }
    }
}

/// Inverse of a primitive gate.
fn gate_dagger(op_type: &OpType, params: &[Param]) -> Option<(OpType, Vec<Param>)> {
    let negated = || params.iter().cloned().map(Neg::neg).collect_vec();
    let inverse = match op_type {
        OpType::noop
        | OpType::X
        | OpType::Y
        | OpType::Z
        | OpType::H
        | OpType::CX
        | OpType::CY
        | OpType::CZ
        | OpType::CH
        | OpType::SWAP
        | OpType::CCX
        | OpType::CSWAP
        | OpType::CnX => (op_type.clone(), params.to_vec()),
        OpType::S => (OpType::Sdg, vec![]),
        OpType::Sdg => (OpType::S, vec![]),
        OpType::T => (OpType::Tdg, vec![]),
        OpType::Tdg => (OpType::T, vec![]),
        OpType::V => (OpType::Vdg, vec![]),
        OpType::Vdg => (OpType::V, vec![]),
        OpType::SX => (OpType::SXdg, vec![]),
        OpType::SXdg => (OpType::SX, vec![]),
        OpType::Rx
        | OpType::Ry
        | OpType::Rz
        | OpType::U1
        | OpType::CRx
        | OpType::CRy
        | OpType::CRz
        | OpType::CU1
        | OpType::CnRy
        | OpType::ISWAP
        | OpType::XXPhase
        | OpType::YYPhase
        | OpType::ZZPhase => (op_type.clone(), negated()),
        OpType::U3 | OpType::CU3 => {
            let [theta, phi, lambda] = params else {
                return None;
            };
            (
                op_type.clone(),
                vec![-theta.clone(), -lambda.clone(), -phi.clone()],
            )
        }
        OpType::U2 => {
            let [phi, lambda] = params else {
                return None;
            };
            (
                OpType::U3,
                vec![Param::Value(-0.5), -lambda.clone(), -phi.clone()],
            )
        }
        OpType::TK1 => {
            let [alpha, beta, gamma] = params else {
                return None;
            };
            (
                OpType::TK1,
                vec![-gamma.clone(), -beta.clone(), -alpha.clone()],
            )
        }
        OpType::PhasedX => {
            let [alpha, beta] = params else {
                return None;
            };
            (OpType::PhasedX, vec![-alpha.clone(), beta.clone()])
        }
        OpType::ISWAPMax => (OpType::ISWAP, vec![Param::Value(-1.0)]),
        _ => return None,
    };
    Some(inverse)
}

fn conj_transpose(matrix: &Unitary2qMatrix) -> Unitary2qMatrix {
    let mut result = [[Complex64::default(); 4]; 4];
    for (i, row) in matrix.iter().enumerate() {
        for (j, entry) in row.iter().enumerate() {
            result[j][i] = entry.conj();
        }
    }
    result
}
