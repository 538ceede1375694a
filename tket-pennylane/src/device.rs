//! A PennyLane-style device running circuits through pytket compilation and
//! backends.
//!
//! A [`PytketDevice`] owns one quantum register "q" and one classical
//! register "c", both as wide as the device. Each call to
//! [`PytketDevice::apply`] translates the operations with
//! [`pennylane_to_tk`], compiles a copy of the circuit with the configured
//! [`CompilationPass`] and runs it on the [`Backend`]. The result is then
//! available through [`PytketDevice::samples`] or [`PytketDevice::state`].

pub mod backend;
pub mod config;

use derive_more::{Display, Error, From};
use num_complex::Complex64;
use serde::Serialize;
use tket_json_rs::OpType;

use crate::circuit::{BitRegister, Circuit, CircuitError, QubitRegister};
use crate::convert::{pennylane_to_tk, ConvertError, Operation, WireMap, CIRCUIT_NAME};
use crate::ops::OPERATION_MAP;

pub use backend::{Backend, BackendError, BackendResult, CompilationPass, SequencePass};
pub use config::{DeviceConfig, Wires, DEFAULT_OPTIMISATION_LEVEL};

/// Name of the device.
pub const DEVICE_NAME: &str = "pytket-pennylane plugin";
/// Short name used to register the device.
pub const DEVICE_SHORT_NAME: &str = "pytket.pytketdevice";
/// Observables the device can measure.
pub const OBSERVABLES: [&str; 6] = ["PauliX", "PauliY", "PauliZ", "Identity", "Hadamard", "Prod"];

const LOG_TARGET: &str = "tket_pennylane::device";

/// Capabilities reported by a [`PytketDevice`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct Capabilities {
    /// The device model.
    pub model: &'static str,
    /// Whether the device can return finite-shot samples.
    pub supports_finite_shots: bool,
    /// Whether the device can return its statevector.
    pub returns_state: bool,
    /// Whether inverted operations are accepted.
    pub supports_inverse_operations: bool,
}

/// A device executing PennyLane operations on a pytket [`Backend`].
#[derive(Debug)]
pub struct PytketDevice<B> {
    config: DeviceConfig,
    backend: B,
    compilation_pass: Box<dyn CompilationPass>,
    wire_map: WireMap,
    circuit: Circuit,
    qreg: QubitRegister,
    creg: BitRegister,
    result: Option<BackendResult>,
    state: Option<Vec<Complex64>>,
}

impl<B: Backend> PytketDevice<B> {
    /// Creates a new device.
    ///
    /// When `compilation_pass` is `None`, the backend default pass is used at
    /// the configured optimisation level.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnsupportedBackend`] if the backend supports
    /// neither shots nor state results.
    pub fn new(
        config: DeviceConfig,
        backend: B,
        compilation_pass: Option<Box<dyn CompilationPass>>,
    ) -> Result<Self, DeviceError> {
        if !(backend.supports_shots() || backend.supports_state()) {
            return Err(DeviceError::UnsupportedBackend);
        }
        let compilation_pass = match compilation_pass {
            Some(pass) => pass,
            None => backend.default_compilation_pass(config.optimisation_level()),
        };
        let num_wires = config.num_wires();
        let mut device = Self {
            wire_map: config.wires.wire_map(),
            config,
            backend,
            compilation_pass,
            circuit: Circuit::default(),
            qreg: QubitRegister::new("q", num_wires),
            creg: BitRegister::new("c", num_wires),
            result: None,
            state: None,
        };
        device.reset()?;
        Ok(device)
    }

    /// The device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The compilation pass applied before execution.
    pub fn compilation_pass(&self) -> &dyn CompilationPass {
        self.compilation_pass.as_ref()
    }

    /// The capabilities of the device.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            model: "qubit",
            supports_finite_shots: self.backend.supports_shots(),
            returns_state: self.backend.supports_state(),
            supports_inverse_operations: true,
        }
    }

    /// The names of the supported operations, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names = OPERATION_MAP.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// The last translated circuit, before compilation.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Clears the circuit and any previous result.
    pub fn reset(&mut self) -> Result<(), DeviceError> {
        let mut circuit = Circuit::with_name(CIRCUIT_NAME);
        circuit.add_q_register(&self.qreg)?;
        circuit.add_c_register(&self.creg)?;
        self.circuit = circuit;
        self.result = None;
        self.state = None;
        Ok(())
    }

    /// Translates `operations` followed by `rotations`, compiles the circuit
    /// and runs it.
    ///
    /// Measurements are only added for backends that do not return a state.
    pub fn apply<O: Operation>(&mut self, operations: &[O], rotations: &[O]) -> Result<(), DeviceError> {
        self.circuit = pennylane_to_tk(
            operations.iter().chain(rotations),
            &self.wire_map,
            &self.qreg,
            &self.creg,
            !self.backend.supports_state(),
        )?;
        let compiled = self.compile(&self.circuit)?;
        self.run(compiled)
    }

    /// Applies the compilation pass to a copy of `circuit`.
    pub fn compile(&self, circuit: &Circuit) -> Result<Circuit, DeviceError> {
        let mut compiled = circuit.clone();
        let changed = self.compilation_pass.apply(&mut compiled)?;
        tracing::debug!(
            target: LOG_TARGET,
            "{} {} the circuit",
            self.compilation_pass.name(),
            if changed { "modified" } else { "kept" },
        );
        Ok(compiled)
    }

    /// Runs a compiled circuit and stores its result.
    ///
    /// On shot backends, every qubit is measured if the circuit has no
    /// measurement yet.
    #[tracing::instrument(target = "tket_pennylane::device", skip_all, fields(commands = compiled.n_commands()))]
    pub fn run(&mut self, mut compiled: Circuit) -> Result<(), DeviceError> {
        let mut shots = None;
        if self.backend.supports_shots() {
            shots = self.config.shots;
            if compiled.n_gates_of_type(&OpType::Measure) == 0 {
                compiled.measure_all()?;
            }
        }
        self.state = None;
        self.result = Some(self.backend.process_circuit(&compiled, shots)?);
        Ok(())
    }

    /// The measured shots, one row per shot and one column per bit of "c".
    ///
    /// # Errors
    ///
    /// Fails if the backend does not support shots or if nothing was run.
    pub fn samples(&self) -> Result<Vec<Vec<u8>>, DeviceError> {
        if !self.backend.supports_shots() {
            return Err(DeviceError::SamplesUnsupported);
        }
        let result = self.result.as_ref().ok_or(DeviceError::NoResult)?;
        Ok(result.get_shots(&self.creg.to_list())?)
    }

    /// The statevector over "q", with the first qubit as the most significant
    /// bit of the basis index.
    ///
    /// # Errors
    ///
    /// Fails if the backend does not support state results or if nothing was run.
    pub fn state(&mut self) -> Result<&[Complex64], DeviceError> {
        if !self.backend.supports_state() {
            return Err(DeviceError::StateUnsupported);
        }
        if self.state.is_none() {
            let result = self.result.as_ref().ok_or(DeviceError::NoResult)?;
            self.state = Some(result.get_state(&self.qreg.to_list())?);
        }
        Ok(self.state.as_deref().unwrap_or_default())
    }
}

/// Errors raised by a [`PytketDevice`].
#[derive(Debug, Display, Error, From)]
#[non_exhaustive]
pub enum DeviceError {
    /// The backend returns neither shots nor states.
    #[display("pytket Backend must support shots or state.")]
    UnsupportedBackend,
    /// No circuit has been run since the last reset.
    #[display("Result does not exist.")]
    NoResult,
    /// The backend does not return states.
    #[display("Device does not support state.")]
    StateUnsupported,
    /// The backend does not return shots.
    #[display("Device does not support sampling.")]
    SamplesUnsupported,
    /// Translation error.
    #[display("{_0}")]
    #[from]
    Convert(ConvertError),
    /// Circuit construction error.
    #[display("{_0}")]
    #[from]
    Circuit(CircuitError),
    /// Backend or compilation error.
    #[display("{_0}")]
    #[from]
    Backend(BackendError),
}
