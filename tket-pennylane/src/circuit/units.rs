//! Qubit and bit identifiers, and the registers that produce them.
//!
//! Units follow the pytket naming scheme: a register name plus an index
//! vector. Everything in this crate only produces single-indexed units, but
//! multi-indexed ones can still appear in circuits loaded from pytket JSON.
//!
//! Registers are plain handles. A [`QubitRegister`] does not own any qubits,
//! it only knows how to name them; adding the register to a [`Circuit`] is
//! what declares the units.
//!
//! [`Circuit`]: super::Circuit

use std::fmt;

use itertools::Itertools;
use tket_json_rs::register::ElementId;

macro_rules! unit_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(ElementId);

        impl $name {
            /// Creates a new single-indexed unit.
            pub fn new(reg_name: impl Into<String>, index: usize) -> Self {
                Self(ElementId(reg_name.into(), vec![index as i64]))
            }

            /// Creates a new unit with an arbitrary index vector.
            pub fn with_indices(reg_name: impl Into<String>, index: Vec<i64>) -> Self {
                Self(ElementId(reg_name.into(), index))
            }

            /// Returns the name of the register containing the unit.
            pub fn reg_name(&self) -> &str {
                &self.0 .0
            }

            /// Returns the full index vector of the unit.
            pub fn index(&self) -> &[i64] {
                &self.0 .1
            }

            /// Returns the position of the unit in its register, if it is
            /// single-indexed.
            pub fn single_index(&self) -> Option<usize> {
                match self.index() {
                    [i] => usize::try_from(*i).ok(),
                    _ => None,
                }
            }

            /// Returns the pytket identifier of the unit.
            pub fn element_id(&self) -> &ElementId {
                &self.0
            }
        }

        impl From<ElementId> for $name {
            fn from(id: ElementId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ElementId {
            fn from(unit: $name) -> Self {
                unit.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}[{}]", self.reg_name(), self.index().iter().join(", "))
            }
        }
    };
}

unit_id! {
    /// A qubit identifier.
    Qubit
}

unit_id! {
    /// A classical bit identifier.
    Bit
}

/// Either a qubit or a bit argument of a [`Command`][super::Command].
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::From, derive_more::Display)]
pub enum Unit {
    /// A qubit argument.
    Qubit(Qubit),
    /// A bit argument.
    Bit(Bit),
}

impl Unit {
    /// Returns the qubit, if this is a qubit argument.
    pub fn as_qubit(&self) -> Option<&Qubit> {
        match self {
            Unit::Qubit(q) => Some(q),
            Unit::Bit(_) => None,
        }
    }

    /// Returns the bit, if this is a bit argument.
    pub fn as_bit(&self) -> Option<&Bit> {
        match self {
            Unit::Qubit(_) => None,
            Unit::Bit(b) => Some(b),
        }
    }

    /// Returns the name of the register containing the unit.
    pub fn reg_name(&self) -> &str {
        match self {
            Unit::Qubit(q) => q.reg_name(),
            Unit::Bit(b) => b.reg_name(),
        }
    }

    /// Returns the full index vector of the unit.
    pub fn index(&self) -> &[i64] {
        match self {
            Unit::Qubit(q) => q.index(),
            Unit::Bit(b) => b.index(),
        }
    }
}

macro_rules! register {
    ($(#[$meta:meta])* $name:ident => $unit:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            name: String,
            size: usize,
        }

        impl $name {
            /// Creates a new register handle.
            pub fn new(name: impl Into<String>, size: usize) -> Self {
                Self {
                    name: name.into(),
                    size,
                }
            }

            /// Returns the register name.
            pub fn name(&self) -> &str {
                &self.name
            }

            /// Returns the number of units in the register.
            pub fn size(&self) -> usize {
                self.size
            }

            /// Returns `true` if the register has no units.
            pub fn is_empty(&self) -> bool {
                self.size == 0
            }

            /// Returns the unit at position `index`, if it is in range.
            pub fn get(&self, index: usize) -> Option<$unit> {
                (index < self.size).then(|| $unit::new(&self.name, index))
            }

            /// Iterates over the units in the register, in order.
            pub fn iter(&self) -> impl ExactSizeIterator<Item = $unit> + '_ {
                (0..self.size).map(|i| $unit::new(&self.name, i))
            }

            /// Returns all the units in the register, in order.
            pub fn to_list(&self) -> Vec<$unit> {
                self.iter().collect()
            }
        }
    };
}

register! {
    /// A named block of qubits.
    QubitRegister => Qubit
}

register! {
    /// A named block of classical bits.
    BitRegister => Bit
}
