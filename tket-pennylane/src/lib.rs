//! Run PennyLane circuits through TKET compilation and backends.
//!
//! This crate translates PennyLane operation lists into pytket circuits, so
//! that they can be compiled and executed by pytket backends. Circuits can
//! also be translated onward into Qiskit circuits, and back into PennyLane
//! operations.
//!
//! The pytket-side circuit is a [`Circuit`], built from a fixed gate
//! vocabulary identified by [`tket_json_rs::OpType`], and exchangeable with
//! pytket through its JSON serialization (see [`serialize`]).
//!
//! The [`device`] module wraps the translation, compilation and execution
//! steps into a PennyLane-style device over a user-provided [`device::Backend`].
//!
//! # Example
//!
//! ```
//! use tket_pennylane::circuit::{BitRegister, QubitRegister};
//! use tket_pennylane::{pennylane_to_tk, tk_to_qiskit, GateRecord, WireMap};
//!
//! // A Bell pair, measured.
//! let ops = [
//!     GateRecord::new("Hadamard", [], [0_i64]),
//!     GateRecord::new("CNOT", [], [0_i64, 1]),
//! ];
//! let qreg = QubitRegister::new("q", 2);
//! let creg = BitRegister::new("c", 2);
//! let circ = pennylane_to_tk(&ops, &WireMap::identity(2), &qreg, &creg, true).unwrap();
//! assert_eq!(circ.n_commands(), 4);
//!
//! // Hand it over to Qiskit.
//! let qc = tk_to_qiskit(&circ).unwrap();
//! assert_eq!(qc.num_qubits(), 2);
//! assert_eq!(qc.data()[1].operation.name(), "CXGate");
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod circuit;
pub mod convert;
pub mod device;
pub mod ops;
pub mod param;
pub mod qiskit;
pub mod serialize;

pub use circuit::{Circuit, CircuitError};
pub use convert::{
    pennylane_to_tk, tk_to_pennylane, tk_to_qiskit, ConvertError, GateRecord, Operation,
    WireLabel, WireMap,
};
pub use device::{DeviceConfig, DeviceError, PytketDevice};
pub use ops::{lookup_opcode, PennylaneOp};
