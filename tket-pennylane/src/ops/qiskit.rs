//! Qiskit gate classes with a pytket equivalent.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tket_json_rs::OpType;

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
)]
#[non_exhaustive]
/// Qiskit gate classes.
///
/// The string representation of each variant is the Qiskit class name.
//
// The declaration order matters, see `QISKIT_GATE_REV`.
#[allow(missing_docs)]
pub enum QiskitGate {
    C3XGate,
    C4XGate,
    CCXGate,
    CHGate,
    CPhaseGate,
    CRYGate,
    CRZGate,
    CSwapGate,
    CU1Gate,
    CU3Gate,
    CXGate,
    CYGate,
    CZGate,
    HGate,
    IGate,
    #[strum(serialize = "iSwapGate")]
    ISwapGate,
    PhaseGate,
    RGate,
    RXGate,
    RXXGate,
    RYGate,
    RYYGate,
    RZGate,
    RZZGate,
    SdgGate,
    SGate,
    SwapGate,
    SXdgGate,
    SXGate,
    TdgGate,
    TGate,
    U1Gate,
    U2Gate,
    U3Gate,
    UGate,
    XGate,
    YGate,
    ZGate,
    MCXGate,
    MCXGrayCode,
    MCXRecursive,
    MCXVChain,
}

impl QiskitGate {
    /// Returns the equivalent pytket operation type.
    pub fn optype(self) -> OpType {
        match self {
            QiskitGate::C3XGate
            | QiskitGate::C4XGate
            | QiskitGate::MCXGate
            | QiskitGate::MCXGrayCode
            | QiskitGate::MCXRecursive
            | QiskitGate::MCXVChain => OpType::CnX,
            QiskitGate::CCXGate => OpType::CCX,
            QiskitGate::CHGate => OpType::CH,
            QiskitGate::CPhaseGate | QiskitGate::CU1Gate => OpType::CU1,
            QiskitGate::CRYGate => OpType::CnRy,
            QiskitGate::CRZGate => OpType::CRz,
            QiskitGate::CSwapGate => OpType::CSWAP,
            QiskitGate::CU3Gate => OpType::CU3,
            QiskitGate::CXGate => OpType::CX,
            QiskitGate::CYGate => OpType::CY,
            QiskitGate::CZGate => OpType::CZ,
            QiskitGate::HGate => OpType::H,
            QiskitGate::IGate => OpType::noop,
            QiskitGate::ISwapGate => OpType::ISWAPMax,
            QiskitGate::PhaseGate | QiskitGate::U1Gate => OpType::U1,
            QiskitGate::RGate => OpType::PhasedX,
            QiskitGate::RXGate => OpType::Rx,
            QiskitGate::RXXGate => OpType::XXPhase,
            QiskitGate::RYGate => OpType::Ry,
            QiskitGate::RYYGate => OpType::YYPhase,
            QiskitGate::RZGate => OpType::Rz,
            QiskitGate::RZZGate => OpType::ZZPhase,
            QiskitGate::SdgGate => OpType::Sdg,
            QiskitGate::SGate => OpType::S,
            QiskitGate::SwapGate => OpType::SWAP,
            QiskitGate::SXdgGate => OpType::Vdg,
            QiskitGate::SXGate => OpType::V,
            QiskitGate::TdgGate => OpType::Tdg,
            QiskitGate::TGate => OpType::T,
            QiskitGate::U2Gate => OpType::U2,
            QiskitGate::U3Gate | QiskitGate::UGate => OpType::U3,
            QiskitGate::XGate => OpType::X,
            QiskitGate::YGate => OpType::Y,
            QiskitGate::ZGate => OpType::Z,
        }
    }

    /// Returns the Qiskit class name.
    pub fn class_name(self) -> &'static str {
        self.into()
    }
}

lazy_static! {
    /// Map from Qiskit gate classes to pytket operation types.
    pub static ref QISKIT_GATE_MAP: HashMap<QiskitGate, OpType> =
        QiskitGate::iter().map(|gate| (gate, gate.optype())).collect();

    /// Map from pytket operation types to the Qiskit gate class emitting them.
    ///
    /// When several classes share a type the last declared one is kept,
    /// except for [`OpType::U3`] which is emitted as a [`QiskitGate::U3Gate`].
    pub static ref QISKIT_GATE_REV: HashMap<OpType, QiskitGate> = {
        let mut rev: HashMap<OpType, QiskitGate> =
            QiskitGate::iter().map(|gate| (gate.optype(), gate)).collect();
        rev.insert(OpType::U3, QiskitGate::U3Gate);
        rev
    };
}
