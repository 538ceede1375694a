//! Circuit serialization formats.

pub mod pytket;

pub use pytket::{
    load_tk1_json_file, load_tk1_json_reader, load_tk1_json_str, save_tk1_json_file,
    save_tk1_json_str, save_tk1_json_writer, PytketSerializeError, TKETDecode,
};
