//! PennyLane operations supported by the device.

use std::collections::HashMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tket_json_rs::OpType;

use crate::convert::ConvertError;

/// Suffix PennyLane appends to the name of an inverted operation.
pub const INVERSE_SUFFIX: &str = ".inv";

#[derive(
    Clone,
    Copy,
    Debug,
    Serialize,
    Deserialize,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
    EnumString,
    derive_more::Display,
)]
#[non_exhaustive]
/// PennyLane operations with a pytket equivalent.
///
/// The string representation of each variant is the PennyLane operation name.
//
// The declaration order matters: when two operations share a pytket type,
// `INV_OPERATION_MAP` keeps the one declared last.
pub enum PennylaneOp {
    /// Hadamard gate
    Hadamard,
    /// Pauli X gate
    PauliX,
    /// Pauli Y gate
    PauliY,
    /// Pauli Z gate
    PauliZ,
    /// S gate
    S,
    /// T gate
    T,
    /// X rotation, in radians
    RX,
    /// Y rotation, in radians
    RY,
    /// Z rotation, in radians
    RZ,
    /// Controlled X gate
    CNOT,
    /// Controlled Y gate
    CY,
    /// Controlled Z gate
    CZ,
    /// Swap gate
    SWAP,
    /// Phase gate, same as [`PennylaneOp::U1`]
    PhaseShift,
    /// U1 gate
    U1,
    /// U2 gate
    U2,
    /// U3 gate
    U3,
    /// Controlled Z rotation
    CRZ,
    /// Doubly-controlled X gate
    Toffoli,
    /// Controlled swap gate
    CSWAP,
}

impl PennylaneOp {
    /// Returns the equivalent pytket operation type.
    pub fn optype(self) -> OpType {
        match self {
            PennylaneOp::Hadamard => OpType::H,
            PennylaneOp::PauliX => OpType::X,
            PennylaneOp::PauliY => OpType::Y,
            PennylaneOp::PauliZ => OpType::Z,
            PennylaneOp::S => OpType::S,
            PennylaneOp::T => OpType::T,
            PennylaneOp::RX => OpType::Rx,
            PennylaneOp::RY => OpType::Ry,
            PennylaneOp::RZ => OpType::Rz,
            PennylaneOp::CNOT => OpType::CX,
            PennylaneOp::CY => OpType::CY,
            PennylaneOp::CZ => OpType::CZ,
            PennylaneOp::SWAP => OpType::SWAP,
            PennylaneOp::PhaseShift | PennylaneOp::U1 => OpType::U1,
            PennylaneOp::U2 => OpType::U2,
            PennylaneOp::U3 => OpType::U3,
            PennylaneOp::CRZ => OpType::CRz,
            PennylaneOp::Toffoli => OpType::CCX,
            PennylaneOp::CSWAP => OpType::CSWAP,
        }
    }

    /// Returns the PennyLane name of the operation.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns the name of the inverted operation.
    pub fn inverse_name(self) -> String {
        format!("{}{INVERSE_SUFFIX}", self.name())
    }

    /// Parses an operation name, accepting the inverse suffix.
    ///
    /// Returns the operation and whether the name denotes its inverse.
    pub fn from_name(name: &str) -> Option<(Self, bool)> {
        let (base, inverted) = match name.strip_suffix(INVERSE_SUFFIX) {
            Some(base) => (base, true),
            None => (name, false),
        };
        let op = PennylaneOp::from_str(base).ok()?;
        Some((op, inverted))
    }
}

lazy_static! {
    /// Map from PennyLane operation names to pytket operation types.
    ///
    /// Every operation also appears under its inverted name, with the same
    /// pytket type.
    pub static ref OPERATION_MAP: HashMap<String, OpType> = PennylaneOp::iter()
        .flat_map(|op| [(op.name().to_string(), op.optype()), (op.inverse_name(), op.optype())])
        .collect();

    /// Map from pytket operation types to the PennyLane operation emitting them.
    pub static ref INV_OPERATION_MAP: HashMap<OpType, PennylaneOp> =
        PennylaneOp::iter().map(|op| (op.optype(), op)).collect();
}

/// Resolves a PennyLane operation name, possibly carrying the inverse suffix,
/// to its pytket operation type.
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedGate`] if the operation is not supported.
pub fn lookup_opcode(name: &str) -> Result<OpType, ConvertError> {
    OPERATION_MAP
        .get(name)
        .cloned()
        .ok_or_else(|| ConvertError::UnsupportedGate {
            name: name.to_string(),
        })
}
