//! Serialization and deserialization of circuits using the `pytket` JSON format.
//!
//! Conditionals and explicit unitary boxes are not supported by the format
//! mapping, and fail to encode.

use std::path::Path;
use std::{fs, io};

use derive_more::{Display, Error, From};
use itertools::Itertools;
use tket_json_rs::circuit_json::{self, SerialCircuit};
use tket_json_rs::opbox::{BoxID, OpBox};
use tket_json_rs::register::{self, ElementId};
use tket_json_rs::OpType;

use crate::circuit::{gate_signature, Bit, Circuit, CircuitError, Command, Op, Param, Qubit, Unit};

/// A serialized representation of a [`Circuit`].
///
/// Implemented by [`SerialCircuit`], the JSON format used by the `pytket` library.
pub trait TKETDecode: Sized {
    /// The error type for decoding.
    type DecodeError;
    /// The error type for encoding.
    type EncodeError;
    /// Convert the serialized circuit to a circuit.
    fn decode(&self) -> Result<Circuit, Self::DecodeError>;
    /// Convert a circuit to a new serialized circuit.
    fn encode(circuit: &Circuit) -> Result<Self, Self::EncodeError>;
}

impl TKETDecode for SerialCircuit {
    type DecodeError = PytketSerializeError;
    type EncodeError = PytketSerializeError;

    fn decode(&self) -> Result<Circuit, Self::DecodeError> {
        let mut circ = match &self.name {
            Some(name) => Circuit::with_name(name),
            None => Circuit::new(),
        };
        for qb in &self.qubits {
            circ.add_qubit(Qubit::from(qb.id.clone()))?;
        }
        for bit in &self.bits {
            circ.add_bit(Bit::from(bit.id.clone()))?;
        }
        if !self.phase.is_empty() {
            circ.add_phase(Param::parse(&self.phase));
        }
        for command in &self.commands {
            decode_command(&mut circ, command)?;
        }
        Ok(circ)
    }

    fn encode(circ: &Circuit) -> Result<Self, Self::EncodeError> {
        let mut ser = SerialCircuit::new(circ.name().map(str::to_string), circ.phase().to_string());
        ser.commands = circ
            .commands()
            .iter()
            .map(encode_command)
            .collect::<Result<_, _>>()?;
        ser.qubits = circ
            .qubits()
            .map(|q| register::Qubit::from(q.element_id().clone()))
            .collect();
        ser.bits = circ
            .bits()
            .map(|b| register::Bit::from(b.element_id().clone()))
            .collect();
        Ok(ser)
    }
}

fn decode_command(circ: &mut Circuit, command: &circuit_json::Command) -> Result<(), PytketSerializeError> {
    let op = &command.op;
    let (qubits, bits): (Vec<Qubit>, Vec<Bit>) = command
        .args
        .iter()
        .cloned()
        .partition_map(|arg| {
            let qb = Qubit::from(arg);
            match circ.has_qubit(&qb) {
                true => itertools::Either::Left(qb),
                false => itertools::Either::Right(Bit::from(ElementId::from(qb))),
            }
        });
    let unsupported = || PytketSerializeError::UnsupportedSerializedOp {
        op_type: op.op_type.clone(),
    };

    match op.op_type {
        OpType::Measure => {
            let ([qubit], [bit]) = (qubits.as_slice(), bits.as_slice()) else {
                return Err(unsupported());
            };
            circ.add_measure(qubit.clone(), bit.clone())?;
        }
        OpType::Reset => {
            let [qubit] = qubits.as_slice() else {
                return Err(unsupported());
            };
            circ.add_reset(qubit.clone())?;
        }
        OpType::Barrier => {
            circ.add_barrier(&qubits)?;
        }
        OpType::CircBox => {
            let Some(OpBox::CircBox { circuit, .. }) = &op.op_box else {
                return Err(PytketSerializeError::MissingBox {
                    op_type: op.op_type.clone(),
                });
            };
            circ.add_circbox(circuit.decode()?, &qubits, &bits)?;
        }
        _ => {
            if gate_signature(&op.op_type).is_none() {
                return Err(unsupported());
            }
            let params = op.params.iter().flatten().map(|p| Param::parse(p)).collect_vec();
            circ.add_gate(op.op_type.clone(), params, &qubits)?;
        }
    }
    Ok(())
}

fn encode_command(command: &Command) -> Result<circuit_json::Command, PytketSerializeError> {
    let num_qubits = command.qubits().count();
    let num_bits = command.bits().count();

    let mut op = circuit_json::Operation::default();
    op.op_type = command.op().op_type();
    op.n_qb = Some(num_qubits as u32);
    op.params = match command.op().params().is_empty() {
        false => Some(command.op().params().iter().map(ToString::to_string).collect()),
        true => None,
    };
    op.signature = Some([vec!["Q".into(); num_qubits], vec!["B".into(); num_bits]].concat());
    match command.op() {
        Op::CircBox(circ) => {
            op.op_box = Some(OpBox::CircBox {
                id: BoxID::new(),
                circuit: SerialCircuit::encode(circ)?,
            });
        }
        Op::Conditional { .. } | Op::Unitary2qBox(_) => {
            return Err(PytketSerializeError::UnsupportedOpSerialization {
                op: command.op().name(),
            })
        }
        _ => {}
    }

    let args = command
        .args()
        .iter()
        .map(|unit| match unit {
            Unit::Qubit(q) => q.element_id().clone(),
            Unit::Bit(b) => b.element_id().clone(),
        })
        .collect();
    Ok(circuit_json::Command {
        op,
        args,
        opgroup: None,
    })
}

/// Load a pytket circuit from a JSON file.
pub fn load_tk1_json_file(path: impl AsRef<Path>) -> Result<Circuit, PytketSerializeError> {
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    load_tk1_json_reader(reader)
}

/// Load a pytket circuit from a JSON reader.
pub fn load_tk1_json_reader(json: impl io::Read) -> Result<Circuit, PytketSerializeError> {
    let ser: SerialCircuit = serde_json::from_reader(json)?;
    ser.decode()
}

/// Load a pytket circuit from a JSON string.
pub fn load_tk1_json_str(json: &str) -> Result<Circuit, PytketSerializeError> {
    load_tk1_json_reader(json.as_bytes())
}

/// Save a circuit to file in pytket JSON format.
///
/// # Errors
///
/// Returns an error if the circuit contains operations not supported by the
/// format mapping.
pub fn save_tk1_json_file(circ: &Circuit, path: impl AsRef<Path>) -> Result<(), PytketSerializeError> {
    let file = fs::File::create(path)?;
    let writer = io::BufWriter::new(file);
    save_tk1_json_writer(circ, writer)
}

/// Save a circuit in pytket JSON format to a writer.
///
/// # Errors
///
/// Returns an error if the circuit contains operations not supported by the
/// format mapping.
pub fn save_tk1_json_writer(circ: &Circuit, w: impl io::Write) -> Result<(), PytketSerializeError> {
    let serial_circ = SerialCircuit::encode(circ)?;
    serde_json::to_writer(w, &serial_circ)?;
    Ok(())
}

/// Save a circuit in pytket JSON format to a String.
///
/// # Errors
///
/// Returns an error if the circuit contains operations not supported by the
/// format mapping.
pub fn save_tk1_json_str(circ: &Circuit) -> Result<String, PytketSerializeError> {
    let serial_circ = SerialCircuit::encode(circ)?;
    Ok(serde_json::to_string(&serial_circ)?)
}

/// Error type for conversion between [`Circuit`] and [`SerialCircuit`].
#[derive(Debug, Display, Error, From)]
#[non_exhaustive]
pub enum PytketSerializeError {
    /// The serialized operation is not supported, or has malformed arguments.
    #[display("Unsupported serialized pytket operation: {op_type:?}")]
    UnsupportedSerializedOp {
        /// The operation type.
        op_type: OpType,
    },
    /// The operation cannot be serialized.
    #[display("Cannot serialize operation: {op}")]
    UnsupportedOpSerialization {
        /// The operation name.
        op: String,
    },
    /// A box operation is missing its definition.
    #[display("Serialized {op_type:?} operation is missing its box definition.")]
    MissingBox {
        /// The operation type.
        op_type: OpType,
    },
    /// The circuit could not be built.
    #[display("Invalid circuit. {_0}")]
    #[from]
    Circuit(CircuitError),
    /// Invalid JSON.
    #[display("Invalid pytket JSON. {_0}")]
    #[from]
    InvalidJson(serde_json::Error),
    /// File could not be read or written.
    #[display("Unable to read or write pytket JSON. {_0}")]
    #[from]
    FileLoadError(io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{BitRegister, QubitRegister};
    use cool_asserts::assert_matches;
    use num_complex::Complex64;
    use rstest::rstest;

    const SIMPLE_JSON: &str = r#"{
        "phase": "0.25",
        "bits": [["c", [0]]],
        "qubits": [["q", [0]], ["q", [1]]],
        "commands": [
            {"args": [["q", [0]]], "op": {"type": "H"}},
            {"args": [["q", [1]]], "op": {"params": ["0.5"], "type": "Rz"}},
            {"args": [["q", [0]], ["q", [1]]], "op": {"type": "CX"}},
            {"args": [["q", [1]], ["c", [0]]], "op": {"type": "Measure"}}
        ],
        "implicit_permutation": [[["q", [0]], ["q", [0]]], [["q", [1]], ["q", [1]]]]
    }"#;

    const SYMBOLIC_JSON: &str = r#"{
        "name": "sym",
        "phase": "0",
        "bits": [],
        "qubits": [["q", [0]]],
        "commands": [
            {"args": [["q", [0]]], "op": {"params": ["alpha/2"], "type": "Rx"}}
        ],
        "implicit_permutation": []
    }"#;

    #[test]
    fn load_simple() {
        let circ = load_tk1_json_str(SIMPLE_JSON).unwrap();
        assert_eq!(circ.n_qubits(), 2);
        assert_eq!(circ.n_bits(), 1);
        assert_eq!(circ.n_commands(), 4);
        assert_eq!(circ.phase(), &Param::Value(0.25));
        assert_eq!(circ.commands()[1].op(), &Op::gate(OpType::Rz, [0.5]));
        assert_eq!(
            circ.commands()[3].args(),
            [Unit::Qubit(Qubit::new("q", 1)), Unit::Bit(Bit::new("c", 0))]
        );
    }

    #[test]
    fn load_symbolic() {
        let circ = load_tk1_json_str(SYMBOLIC_JSON).unwrap();
        assert_eq!(circ.name(), Some("sym"));
        assert_eq!(
            circ.commands()[0].op().params(),
            &[Param::Symbolic("alpha/2".into())]
        );
    }

    #[rstest]
    #[case::simple(SIMPLE_JSON)]
    #[case::symbolic(SYMBOLIC_JSON)]
    fn json_roundtrip(#[case] json: &str) {
        let circ = load_tk1_json_str(json).unwrap();
        let saved = save_tk1_json_str(&circ).unwrap();
        assert_eq!(load_tk1_json_str(&saved).unwrap(), circ);
    }

    #[test]
    fn encode_box() {
        let mut inner = Circuit::new();
        inner.add_q_register(&QubitRegister::new("q", 1)).unwrap();
        inner.add_gate(OpType::T, Vec::<f64>::new(), &[Qubit::new("q", 0)]).unwrap();

        let mut circ = Circuit::new();
        circ.add_q_register(&QubitRegister::new("q", 2)).unwrap();
        circ.add_circbox(inner.clone(), &[Qubit::new("q", 1)], &[]).unwrap();

        let ser = SerialCircuit::encode(&circ).unwrap();
        assert_eq!(ser.commands.len(), 1);
        assert_eq!(ser.commands[0].op.op_type, OpType::CircBox);
        assert_matches!(&ser.commands[0].op.op_box, Some(OpBox::CircBox { .. }));

        let decoded = ser.decode().unwrap();
        assert_eq!(decoded.commands()[0].op(), &Op::CircBox(Box::new(inner)));
    }

    #[test]
    fn unsupported_encodings() {
        let q = QubitRegister::new("q", 2).to_list();
        let mut circ = Circuit::new();
        circ.add_q_register(&QubitRegister::new("q", 2)).unwrap();
        circ.add_c_register(&BitRegister::new("c", 1)).unwrap();
        circ.add_unitary2q([[Complex64::default(); 4]; 4], [q[0].clone(), q[1].clone()])
            .unwrap();
        assert_matches!(
            save_tk1_json_str(&circ),
            Err(PytketSerializeError::UnsupportedOpSerialization { .. })
        );
    }

    #[test]
    fn invalid_json() {
        assert_matches!(load_tk1_json_str("{"), Err(PytketSerializeError::InvalidJson(_)));
        let bad_measure = SIMPLE_JSON.replace(r#"[["q", [1]], ["c", [0]]]"#, r#"[["q", [1]]]"#);
        assert_matches!(
            load_tk1_json_str(&bad_measure),
            Err(PytketSerializeError::UnsupportedSerializedOp { .. })
        );
    }

    #[rstest]
    #[case::conditional(r#"{"args": [["c", [0]], ["q", [0]]], "op": {"type": "Conditional"}}"#, OpType::Conditional)]
    #[case::unitary_box(r#"{"args": [["q", [0]], ["q", [1]]], "op": {"type": "Unitary2qBox"}}"#, OpType::Unitary2qBox)]
    #[case::zzmax(r#"{"args": [["q", [0]], ["q", [1]]], "op": {"type": "ZZMax"}}"#, OpType::ZZMax)]
    fn unknown_serialized_op(#[case] command: &str, #[case] expected: OpType) {
        let json = SIMPLE_JSON.replace(
            r#"{"args": [["q", [0]]], "op": {"type": "H"}}"#,
            command,
        );
        assert_matches!(
            load_tk1_json_str(&json),
            Err(PytketSerializeError::UnsupportedSerializedOp { op_type }) => {
                assert_eq!(op_type, expected);
            }
        );
    }

    #[test]
    fn circbox_without_definition() {
        let json = SIMPLE_JSON.replace(
            r#"{"args": [["q", [0]]], "op": {"type": "H"}}"#,
            r#"{"args": [["q", [0]]], "op": {"type": "CircBox"}}"#,
        );
        assert_matches!(
            load_tk1_json_str(&json),
            Err(PytketSerializeError::MissingBox {
                op_type: OpType::CircBox
            })
        );
    }
}
