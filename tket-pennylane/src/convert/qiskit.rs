//! Translation of pytket circuits into Qiskit circuits.

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use tket_json_rs::OpType;

use super::{ConditionRule, ConvertError};
use crate::circuit::{Bit, Circuit, Op, Param, Qubit, Unit};
use crate::ops::QISKIT_GATE_REV;
use crate::param::half_turns_to_radians;
use crate::qiskit::{
    CircuitInstruction, ClassicalRegister, Instruction, QiskitParam, QuantumCircuit, QuantumRegister,
};

const LOG_TARGET: &str = "tket_pennylane::convert";

/// Converts a pytket circuit into a Qiskit circuit.
///
/// One register is created per register name, sized to the largest index
/// used plus one, in order of first appearance. Parameters are converted to
/// radians. A symbolic global phase is dropped with a warning.
///
/// # Errors
///
/// Fails if a unit is not single-indexed, if a classical condition does not
/// cover exactly one whole register in order, or if an operation has no
/// Qiskit equivalent.
#[tracing::instrument(target = "tket_pennylane::convert", skip_all, fields(name = circ.name()))]
pub fn tk_to_qiskit(circ: &Circuit) -> Result<QuantumCircuit, ConvertError> {
    let mut qcirc = QuantumCircuit::new(circ.name());

    let qreg_sizes = register_sizes(circ.qubits().map(|q| (q.reg_name(), q.index())))?;
    let creg_sizes = register_sizes(circ.bits().map(|b| (b.reg_name(), b.index())))?;
    for (name, size) in qreg_sizes {
        qcirc.add_qreg(QuantumRegister::new(name, size))?;
    }
    let mut cregmap = HashMap::new();
    for (name, size) in creg_sizes {
        let creg = ClassicalRegister::new(name.clone(), size);
        qcirc.add_creg(creg.clone())?;
        cregmap.insert(name, creg);
    }

    for cmd in circ.commands() {
        append_command(cmd.op(), cmd.args(), &mut qcirc, &cregmap)?;
    }

    match circ.phase() {
        Param::Value(phase) => qcirc.add_global_phase(half_turns_to_radians(*phase)),
        Param::Symbolic(phase) => {
            tracing::warn!(target: LOG_TARGET, "symbolic global phase {phase}: ignoring")
        }
    }
    Ok(qcirc)
}

/// Computes the size of each register, in order of first appearance.
fn register_sizes<'a>(
    units: impl Iterator<Item = (&'a str, &'a [i64])>,
) -> Result<IndexMap<String, usize>, ConvertError> {
    let mut sizes: IndexMap<String, usize> = IndexMap::new();
    for (name, index) in units {
        let [i] = index else {
            return Err(ConvertError::MultiIndexedRegister {
                register: name.to_string(),
            });
        };
        let Ok(i) = usize::try_from(*i) else {
            return Err(ConvertError::MultiIndexedRegister {
                register: name.to_string(),
            });
        };
        let size = sizes.entry(name.to_string()).or_default();
        *size = (*size).max(i + 1);
    }
    Ok(sizes)
}

fn split_args(op: &Op, args: &[Unit]) -> Result<(Vec<Qubit>, Vec<Bit>), ConvertError> {
    let qubits = args.iter().filter_map(Unit::as_qubit).cloned().collect_vec();
    let bits = args.iter().filter_map(Unit::as_bit).cloned().collect_vec();
    if args[..qubits.len()].iter().any(|u| u.as_qubit().is_none()) {
        return Err(ConvertError::MalformedCommand { op: op.name() });
    }
    Ok((qubits, bits))
}

fn append_command<'c>(
    op: &Op,
    args: &[Unit],
    qcirc: &'c mut QuantumCircuit,
    cregmap: &HashMap<String, ClassicalRegister>,
) -> Result<&'c mut CircuitInstruction, ConvertError> {
    if let Op::Conditional { op: inner, width, value } = op {
        return append_conditional(inner, *width, *value, args, qcirc, cregmap);
    }

    let malformed = || ConvertError::MalformedCommand { op: op.name() };
    let (qubits, bits) = split_args(op, args)?;
    let instruction = match op {
        Op::Measure => {
            let ([qubit], [bit]) = (qubits.as_slice(), bits.as_slice()) else {
                return Err(malformed());
            };
            qcirc.measure(qubit.clone(), bit.clone())?
        }
        Op::Reset => {
            let [qubit] = qubits.as_slice() else {
                return Err(malformed());
            };
            qcirc.reset(qubit.clone())?
        }
        Op::CircBox(sub) => {
            let subqc = tk_to_qiskit(sub)?;
            qcirc.append(subqc.to_instruction(), qubits, bits)?
        }
        Op::Unitary2qBox(matrix) => {
            qcirc.append(Instruction::Unitary(matrix.clone()), qubits, bits)?
        }
        Op::Barrier => qcirc.barrier(qubits)?,
        Op::Gate {
            op_type: OpType::CnX,
            ..
        } => {
            let mut controls = qubits;
            let target = controls.pop().ok_or_else(malformed)?;
            qcirc.mcx(controls, target)?
        }
        Op::Gate { op_type, params } => {
            let gate = QISKIT_GATE_REV
                .get(op_type)
                .copied()
                .ok_or_else(|| ConvertError::UnsupportedOp { op: op.name() })?;
            let params = params.iter().map(param_to_qiskit).collect();
            qcirc.gate(gate, params, qubits)?
        }
        _ => return Err(ConvertError::UnsupportedOp { op: op.name() }),
    };
    Ok(instruction)
}

fn append_conditional<'c>(
    op: &Op,
    width: usize,
    value: u64,
    args: &[Unit],
    qcirc: &'c mut QuantumCircuit,
    cregmap: &HashMap<String, ClassicalRegister>,
) -> Result<&'c mut CircuitInstruction, ConvertError> {
    let unsupported = |rule| ConvertError::UnsupportedCondition { rule };
    if width == 0 || width > args.len() {
        return Err(unsupported(ConditionRule::PartialRegister));
    }
    let (cond_args, op_args) = args.split_at(width);
    let regname = cond_args[0].reg_name();
    let creg = cregmap
        .get(regname)
        .filter(|creg| cond_args[0].as_bit().is_some() && creg.size() == width)
        .ok_or_else(|| unsupported(ConditionRule::PartialRegister))?;
    for (i, arg) in cond_args.iter().enumerate() {
        if arg.reg_name() != regname {
            return Err(unsupported(ConditionRule::MultipleRegisters));
        }
        if arg.index() != [i as i64] {
            return Err(unsupported(ConditionRule::OutOfOrder));
        }
    }

    let instruction = append_command(op, op_args, qcirc, cregmap)?;
    instruction.c_if(creg, value);
    Ok(instruction)
}

fn param_to_qiskit(param: &Param) -> QiskitParam {
    match param {
        Param::Value(v) => QiskitParam::Value(half_turns_to_radians(*v)),
        Param::Symbolic(s) => QiskitParam::Expression(format!("({s})*pi")),
    }
}
