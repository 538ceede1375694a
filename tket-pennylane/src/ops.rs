//! Gate vocabularies and their tables of equivalent pytket operation types.
//!
//! Each supported vocabulary declares its gates as an enum, and a single
//! `optype` match associates each gate with a pytket [`OpType`]. The lookup
//! maps in each submodule are derived from that match, in declaration order.
//!
//! When several gates share an operation type, the reverse map keeps the
//! gate declared last.
//!
//! [`OpType`]: tket_json_rs::OpType

pub mod pennylane;
pub mod qiskit;

pub use pennylane::{lookup_opcode, PennylaneOp, INVERSE_SUFFIX, INV_OPERATION_MAP, OPERATION_MAP};
pub use qiskit::{QiskitGate, QISKIT_GATE_MAP, QISKIT_GATE_REV};
