//! Compose binary coders for records with data-dependent layouts.
//!
//! # Overview
//!
//! A [Coder] pairs a decoder with an encoder for one kind of value. Small coders for numbers,
//! booleans, padding, raw bytes and strings are combined into coders for arrays and, through a
//! declarative [Format], into coders for whole records.
//!
//! Decoding threads a single [Cursor] through every coder involved, so each coder starts reading
//! exactly where the previous one stopped. Encoding never takes a cursor: each coder returns its
//! own bytes and composite coders concatenate them in order.
//!
//! # Supported Types
//!
//! - Padding ([Pad]) and raw bytes ([Raw])
//! - Fixed-width numbers in either byte order: [U8], [U16], [U32], [U64], [I8], [I16], [I32],
//!   [I64], [F32], [F64]
//! - Booleans ([Bool])
//! - Strings: fixed length ([Str]), null-terminated ([NulStr]) and length-prefixed ([LenStr])
//! - Arrays: fixed length ([Array]) and length-prefixed ([LenArray])
//! - Records ([RecordCoder], [TypedCoder])
//!
//! # Example
//!
//! ```
//! use commonware_coder::{Coder, Cursor, Endian, NulStr, U16};
//!
//! let coder = U16::new(Endian::Big);
//! assert_eq!(coder.encode(&2814).unwrap(), &[10, 254][..]);
//! assert_eq!(U16::new(Endian::Little).encode(&2814).unwrap(), &[254, 10][..]);
//!
//! let encoded = NulStr.encode(&"Test".to_string()).unwrap();
//! assert_eq!(encoded, &[84, 101, 115, 116, 0][..]);
//!
//! let mut cursor = Cursor::default();
//! assert_eq!(NulStr.read(&encoded, &mut cursor).unwrap(), "Test");
//! assert_eq!(cursor.index(), 5);
//! ```

pub mod coder;
pub mod config;
pub mod cursor;
pub mod error;
pub mod record;
pub mod types;
pub mod util;
pub mod value;

// Re-export main types and traits
pub use coder::{Coder, FixedSize};
pub use config::{Endian, RangeCfg};
pub use cursor::Cursor;
pub use error::Error;
pub use record::{
    shared, DynCoder, Field, Format, RecordCoder, Registrar, SharedCoder, Structured, TypedCoder,
};
pub use types::{
    array::{Array, LenArray, U16LenArray, U32LenArray, U8LenArray},
    primitives::{
        Bool, Num, Number, Pad, Prefix, Raw, F32, F64, I16, I32, I64, I8, U16, U32, U64, U8,
    },
    string::{LenStr, NulStr, Str, U16LenStr, U32LenStr, U8LenStr},
};
pub use util::{merge, merge_async};
pub use value::{FieldValue, Record, Value};
