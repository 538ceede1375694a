//! Translation between PennyLane operations and pytket circuits.

use itertools::Itertools;

use super::{ConvertError, GateRecord, Operation, WireLabel, WireMap};
use crate::circuit::{BitRegister, Circuit, Op, Param, Qubit, QubitRegister};
use crate::ops::{lookup_opcode, INV_OPERATION_MAP};
use crate::param::{half_turns_to_radians, radians_to_half_turns};

/// Name of the circuits built by [`pennylane_to_tk`].
pub const CIRCUIT_NAME: &str = "temp";

const LOG_TARGET: &str = "tket_pennylane::convert";

/// Translates each operation into a standalone circuit over `qreg`.
///
/// Each returned circuit declares every qubit of `qreg` and holds a single
/// gate, already inverted if the operation requested it. Parameters are
/// converted from radians to half-turns.
///
/// # Errors
///
/// Fails on the first operation whose wires cannot be resolved, whose name
/// has no pytket equivalent, or whose parameter or wire count does not match
/// the gate.
pub fn apply_operations<'a, O: Operation + 'a>(
    operations: impl IntoIterator<Item = &'a O>,
    wire_map: &WireMap,
    qreg: &QubitRegister,
) -> Result<Vec<Circuit>, ConvertError> {
    operations
        .into_iter()
        .map(|op| apply_operation(op, wire_map, qreg))
        .collect()
}

fn apply_operation(
    op: &impl Operation,
    wire_map: &WireMap,
    qreg: &QubitRegister,
) -> Result<Circuit, ConvertError> {
    let qubits: Vec<Qubit> = op
        .wires()
        .iter()
        .map(|wire| resolve_wire(wire, wire_map, qreg))
        .collect::<Result<_, _>>()?;
    let op_type = lookup_opcode(op.name())?;
    let params = op.parameters().iter().map(|&p| radians_to_half_turns(p));

    let mut circ = Circuit::new();
    circ.add_q_register(qreg)?;
    circ.add_gate(op_type, params, &qubits)?;
    if op.is_inverted() {
        circ = circ.dagger()?;
    }
    tracing::debug!(
        target: LOG_TARGET,
        "{} on [{}] -> {}",
        op.name(),
        qubits.iter().join(", "),
        circ.commands().iter().map(|cmd| cmd.op().name()).join(", "),
    );
    Ok(circ)
}

fn resolve_wire(
    wire: &WireLabel,
    wire_map: &WireMap,
    qreg: &QubitRegister,
) -> Result<Qubit, ConvertError> {
    let index = wire_map
        .get(wire)
        .ok_or_else(|| ConvertError::UnresolvedWire { wire: wire.clone() })?;
    qreg.get(index).ok_or_else(|| ConvertError::WireOutOfRange {
        wire: wire.clone(),
        index,
        register: qreg.name().to_string(),
        size: qreg.size(),
    })
}

/// Builds a pytket circuit from a sequence of PennyLane operations.
///
/// The circuit is named [`CIRCUIT_NAME`] and declares `qreg` and `creg`. The
/// operations are appended in order. When `measure` is set, each qubit of
/// `qreg` is then measured into the bit at the same position of `creg`, up to
/// the length of the shorter register.
///
/// # Errors
///
/// See [`apply_operations`]. Nothing is returned on failure.
#[tracing::instrument(target = "tket_pennylane::convert", skip_all, fields(qubits = qreg.size(), measure = measure))]
pub fn pennylane_to_tk<'a, O: Operation + 'a>(
    operations: impl IntoIterator<Item = &'a O>,
    wire_map: &WireMap,
    qreg: &QubitRegister,
    creg: &BitRegister,
    measure: bool,
) -> Result<Circuit, ConvertError> {
    let circuits = apply_operations(operations, wire_map, qreg)?;

    let mut circ = Circuit::with_name(CIRCUIT_NAME);
    circ.add_q_register(qreg)?;
    circ.add_c_register(creg)?;
    for sub in &circuits {
        circ.append(sub)?;
    }
    if measure {
        for (qubit, bit) in qreg.iter().zip(creg.iter()) {
            circ.add_measure(qubit, bit)?;
        }
    }
    tracing::debug!(target: LOG_TARGET, "built circuit with {} commands", circ.n_commands());
    Ok(circ)
}

/// Recovers PennyLane operations from a pytket circuit.
///
/// Wires are labelled by the declaration position of each qubit in `circ`.
/// Gates with no PennyLane name are emitted as the inverse of their
/// inverse when that one has a name, e.g. `Sdg` becomes `S.inv`.
///
/// # Errors
///
/// Fails on measurements, boxes, conditionals, symbolic parameters and gates
/// with no PennyLane equivalent.
pub fn tk_to_pennylane(circ: &Circuit) -> Result<Vec<GateRecord>, ConvertError> {
    circ.commands()
        .iter()
        .map(|cmd| {
            let wires = cmd
                .qubits()
                .map(|q| {
                    circ.qubit_position(q)
                        .map(|i| WireLabel::Index(i as i64))
                        .ok_or_else(|| ConvertError::MalformedCommand {
                            op: cmd.op().name(),
                        })
                })
                .collect::<Result<_, _>>()?;
            let (name, params) = pennylane_name(cmd.op())?;
            Ok(GateRecord {
                name,
                parameters: params,
                wires,
                inverse: false,
            })
        })
        .collect()
}

/// Returns the PennyLane name and radian parameters of a pytket gate.
fn pennylane_name(op: &Op) -> Result<(String, Vec<f64>), ConvertError> {
    let unsupported = || ConvertError::UnsupportedOp { op: op.name() };
    let Op::Gate { op_type, params } = op else {
        return Err(unsupported());
    };
    let radians = |params: &[Param]| -> Result<Vec<f64>, ConvertError> {
        params
            .iter()
            .map(|p| {
                p.as_f64()
                    .map(half_turns_to_radians)
                    .ok_or_else(|| ConvertError::SymbolicParameter { op: op.name() })
            })
            .collect()
    };

    if let Some(pl_op) = INV_OPERATION_MAP.get(op_type) {
        return Ok((pl_op.name().to_string(), radians(params)?));
    }
    // Emit the inverse of the inverse, when that one is named.
    match op.dagger() {
        Ok(Op::Gate {
            op_type: inv_type,
            params: inv_params,
        }) => {
            let pl_op = INV_OPERATION_MAP.get(&inv_type).ok_or_else(unsupported)?;
            Ok((pl_op.inverse_name(), radians(&inv_params)?))
        }
        _ => Err(unsupported()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Bit, CircuitError};
    use cool_asserts::assert_matches;
    use rstest::{fixture, rstest};
    use std::f64::consts::PI;
    use tket_json_rs::OpType;

    #[fixture]
    fn two_wires() -> (WireMap, QubitRegister, BitRegister) {
        (
            WireMap::identity(2),
            QubitRegister::new("q", 2),
            BitRegister::new("c", 2),
        )
    }

    fn expected_circuit(n: usize) -> (Circuit, Vec<Qubit>, Vec<Bit>) {
        let qreg = QubitRegister::new("q", n);
        let creg = BitRegister::new("c", n);
        let mut circ = Circuit::with_name(CIRCUIT_NAME);
        circ.add_q_register(&qreg).unwrap();
        circ.add_c_register(&creg).unwrap();
        (circ, qreg.to_list(), creg.to_list())
    }

    #[test]
    fn rotation_with_measurement() {
        let ops = [GateRecord::new("RZ", [0.6], [0_i64])];
        let qreg = QubitRegister::new("q", 1);
        let creg = BitRegister::new("c", 1);
        let circ = pennylane_to_tk(&ops, &WireMap::identity(1), &qreg, &creg, true).unwrap();

        let (mut expected, q, c) = expected_circuit(1);
        expected
            .add_gate(OpType::Rz, [0.6 / PI], &q)
            .unwrap()
            .add_measure(q[0].clone(), c[0].clone())
            .unwrap();
        assert_eq!(circ, expected);
        assert_eq!(circ.name(), Some("temp"));
    }

    #[rstest]
    fn bell_without_measurement(two_wires: (WireMap, QubitRegister, BitRegister)) {
        let (wire_map, qreg, creg) = two_wires;
        let ops = [
            GateRecord::new("Hadamard", [], [0_i64]),
            GateRecord::new("CNOT", [], [0_i64, 1]),
        ];
        let circ = pennylane_to_tk(&ops, &wire_map, &qreg, &creg, false).unwrap();

        let (mut expected, q, _) = expected_circuit(2);
        expected
            .add_gate(OpType::H, Vec::<f64>::new(), &q[..1])
            .unwrap()
            .add_gate(OpType::CX, Vec::<f64>::new(), &q)
            .unwrap();
        assert_eq!(circ, expected);
        assert_eq!(circ.n_gates_of_type(&OpType::Measure), 0);
    }

    #[rstest]
    fn permuted_wires(two_wires: (WireMap, QubitRegister, BitRegister)) {
        let (_, qreg, creg) = two_wires;
        let wire_map: WireMap = [(0_i64, 1), (1, 0)].into_iter().collect();
        let ops = [
            GateRecord::new("Hadamard", [], [0_i64]),
            GateRecord::new("CNOT", [], [0_i64, 1]),
        ];
        let circ = pennylane_to_tk(&ops, &wire_map, &qreg, &creg, true).unwrap();

        let (mut expected, q, c) = expected_circuit(2);
        expected
            .add_gate(OpType::H, Vec::<f64>::new(), &q[1..])
            .unwrap()
            .add_gate(OpType::CX, Vec::<f64>::new(), &[q[1].clone(), q[0].clone()])
            .unwrap()
            .add_measure(q[0].clone(), c[0].clone())
            .unwrap()
            .add_measure(q[1].clone(), c[1].clone())
            .unwrap();
        assert_eq!(circ, expected);
    }

    #[rstest]
    #[case::suffix(GateRecord::new("RZ.inv", [0.6], [0_i64]))]
    #[case::adjoint(GateRecord::new("RZ", [0.6], [0_i64]).adjoint())]
    fn inverted_rotation(#[case] op: GateRecord) {
        let qreg = QubitRegister::new("q", 1);
        let circs = apply_operations([&op], &WireMap::identity(1), &qreg).unwrap();
        assert_eq!(circs.len(), 1);
        assert_eq!(
            circs[0].commands()[0].op(),
            &Op::gate(OpType::Rz, [-(0.6 / PI)])
        );
    }

    #[test]
    fn inverted_s() {
        let qreg = QubitRegister::new("q", 1);
        let ops = [GateRecord::new("S.inv", [], [0_i64])];
        let circs = apply_operations(&ops, &WireMap::identity(1), &qreg).unwrap();
        assert_eq!(circs[0].commands()[0].op().op_type(), OpType::Sdg);
    }

    #[rstest]
    fn order_matters(two_wires: (WireMap, QubitRegister, BitRegister)) {
        let (wire_map, qreg, creg) = two_wires;
        let h = GateRecord::new("Hadamard", [], [0_i64]);
        let rx = GateRecord::new("RX", [0.3], [0_i64]);
        let a = pennylane_to_tk(&[h.clone(), rx.clone()], &wire_map, &qreg, &creg, false).unwrap();
        let b = pennylane_to_tk(&[rx, h], &wire_map, &qreg, &creg, false).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.commands()[0].op().op_type(), OpType::H);
        assert_eq!(b.commands()[0].op().op_type(), OpType::Rx);
    }

    #[rstest]
    fn translation_errors(two_wires: (WireMap, QubitRegister, BitRegister)) {
        let (wire_map, qreg, creg) = two_wires;
        let translate = |op: GateRecord| pennylane_to_tk(&[op], &wire_map, &qreg, &creg, true);

        assert_matches!(
            translate(GateRecord::new("QubitUnitary", [], [0_i64])),
            Err(ConvertError::UnsupportedGate { name }) => assert_eq!(name, "QubitUnitary")
        );
        assert_matches!(
            translate(GateRecord::new("PauliX", [], ["aux"])),
            Err(ConvertError::UnresolvedWire { .. })
        );
        assert_matches!(
            translate(GateRecord::new("RZ", [], [0_i64])),
            Err(ConvertError::Circuit(CircuitError::WrongParamCount { .. }))
        );
        assert_matches!(
            translate(GateRecord::new("CNOT", [], [0_i64])),
            Err(ConvertError::Circuit(CircuitError::WrongQubitCount { .. }))
        );

        let far: WireMap = [(0_i64, 5)].into_iter().collect();
        assert_matches!(
            pennylane_to_tk(&[GateRecord::new("PauliX", [], [0_i64])], &far, &qreg, &creg, false),
            Err(ConvertError::WireOutOfRange { index: 5, size: 2, .. })
        );
    }

    #[rstest]
    fn empty_program(two_wires: (WireMap, QubitRegister, BitRegister)) {
        let (expected, q, c) = expected_circuit(2);
        let mut measured = expected.clone();
        measured.add_measure(q[0].clone(), c[0].clone()).unwrap();
        measured.add_measure(q[1].clone(), c[1].clone()).unwrap();

        let (wire_map, qreg, creg) = two_wires;
        let ops: [GateRecord; 0] = [];
        assert_eq!(
            pennylane_to_tk(&ops, &wire_map, &qreg, &creg, false).unwrap(),
            expected
        );
        assert_eq!(
            pennylane_to_tk(&ops, &wire_map, &qreg, &creg, true).unwrap(),
            measured
        );
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn empty_program_without_wires(#[case] measure_all: bool) {
        let ops: [GateRecord; 0] = [];
        let circ = pennylane_to_tk(
            &ops,
            &WireMap::new(),
            &QubitRegister::new("q", 0),
            &BitRegister::new("c", 0),
            measure_all,
        )
        .unwrap();
        assert_eq!(circ.n_commands(), 0);
        assert_eq!(circ.n_qubits(), 0);
        assert_eq!(circ.n_bits(), 0);
    }

    #[test]
    fn measurement_stops_at_shorter_register() {
        let qreg = QubitRegister::new("q", 3);
        let creg = BitRegister::new("c", 2);
        let ops: [GateRecord; 0] = [];
        let circ = pennylane_to_tk(&ops, &WireMap::identity(3), &qreg, &creg, true).unwrap();
        assert_eq!(circ.n_gates_of_type(&OpType::Measure), 2);
    }

    #[rstest]
    fn back_to_pennylane(two_wires: (WireMap, QubitRegister, BitRegister)) {
        let (wire_map, qreg, creg) = two_wires;
        let ops = [
            GateRecord::new("Hadamard", [], [0_i64]),
            GateRecord::new("PhaseShift", [0.4], [1_i64]),
            GateRecord::new("S.inv", [], [1_i64]),
            GateRecord::new("CNOT", [], [1_i64, 0]),
        ];
        let circ = pennylane_to_tk(&ops, &wire_map, &qreg, &creg, false).unwrap();
        let recovered = tk_to_pennylane(&circ).unwrap();

        let names = recovered.iter().map(|op| op.name.as_str()).collect_vec();
        assert_eq!(names, ["Hadamard", "U1", "S.inv", "CNOT"]);
        assert!((recovered[1].parameters[0] - 0.4).abs() < 1e-12);
        assert_eq!(recovered[3].wires, vec![WireLabel::Index(1), WireLabel::Index(0)]);
        assert!(recovered[2].is_inverted());
    }

    #[test]
    fn back_to_pennylane_errors() {
        let (mut circ, q, _) = expected_circuit(1);
        circ.add_gate(OpType::Rz, [Param::Symbolic("a".into())], &q)
            .unwrap();
        assert_matches!(
            tk_to_pennylane(&circ),
            Err(ConvertError::SymbolicParameter { .. })
        );

        let (mut circ, q, c) = expected_circuit(1);
        circ.add_measure(q[0].clone(), c[0].clone()).unwrap();
        assert_matches!(tk_to_pennylane(&circ), Err(ConvertError::UnsupportedOp { .. }));

        let (mut circ, q, _) = expected_circuit(1);
        circ.add_gate(OpType::TK1, [0.1, 0.2, 0.3], &q).unwrap();
        assert_matches!(tk_to_pennylane(&circ), Err(ConvertError::UnsupportedOp { .. }));
    }
}
