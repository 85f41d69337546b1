#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use commonware_coder::{
    Bool, Coder, Cursor, Endian, Format, LenArray, LenStr, Num, Number, NulStr, Pad, Raw, Record,
    RecordCoder, Str, U16LenStr, U32LenArray, U8LenStr, U16, U32,
};
use libfuzzer_sys::fuzz_target;
use std::fmt::Debug;

#[derive(Arbitrary, Debug, Clone, Copy)]
enum WrappedEndian {
    Big,
    Little,
}

impl From<WrappedEndian> for Endian {
    fn from(endian: WrappedEndian) -> Self {
        match endian {
            WrappedEndian::Big => Endian::Big,
            WrappedEndian::Little => Endian::Little,
        }
    }
}

fn roundtrip<C>(coder: C, value: C::Value)
where
    C: Coder,
    C::Value: PartialEq + Debug,
{
    let encoded = coder.encode(&value).expect("Failed to encode a valid input!");
    let mut cursor = Cursor::default();
    let decoded = coder
        .read(&encoded, &mut cursor)
        .expect("Failed to decode a successfully encoded input!");
    assert_eq!(value, decoded);
    assert_eq!(cursor.index(), encoded.len());
}

fn roundtrip_number<T>(value: T, endian: WrappedEndian)
where
    T: Number + PartialEq + Debug,
{
    let coder = Num::<T>::new(endian.into());
    let encoded = coder.encode(&value).expect("Failed to encode number!");
    assert_eq!(encoded.len(), T::SIZE);
    let decoded = coder.decode(&encoded).expect("Failed to decode number!");
    assert_eq!(value, decoded);
}

// NOTE: Separate float cases to handle NaN comparisons
fn roundtrip_f32(value: f32, endian: WrappedEndian) {
    let coder = Num::<f32>::new(endian.into());
    let decoded = coder
        .decode(&coder.encode(&value).expect("Failed to encode f32!"))
        .expect("Failed to decode f32!");
    assert_eq!(value.to_bits(), decoded.to_bits());
}

fn roundtrip_f64(value: f64, endian: WrappedEndian) {
    let coder = Num::<f64>::new(endian.into());
    let decoded = coder
        .decode(&coder.encode(&value).expect("Failed to encode f64!"))
        .expect("Failed to decode f64!");
    assert_eq!(value.to_bits(), decoded.to_bits());
}

fn roundtrip_nul_str(value: String) {
    if value.contains('\0') {
        assert!(NulStr.encode(&value).is_err());
        return;
    }
    roundtrip(NulStr, value);
}

fn roundtrip_len_str(value: String, endian: WrappedEndian) {
    let coder = LenStr::<u8>::new(endian.into());
    if value.len() > u8::MAX as usize {
        assert!(coder.encode(&value).is_err());
        return;
    }
    roundtrip(coder, value.clone());
    roundtrip(LenStr::<u16>::new(endian.into()), value.clone());
    roundtrip(Str::new(value.len()), value);
}

fn roundtrip_record(id: u32, flag: bool, name: String, data: Vec<u8>) {
    if name.len() > u16::MAX as usize || name.contains('\0') {
        return;
    }
    let coder = RecordCoder::new(Format::register(|r| {
        r.field("id", U32::default());
        r.field("flag", Bool);
        r.unnamed(Pad::new(3));
        r.field("len", U16::default());
        r.generated("data", |partial| {
            let len = partial.get::<u16>("len")? as usize;
            Some(commonware_coder::shared(Raw::new(len)))
        });
        r.generated("name", |partial| match partial.get::<bool>("flag")? {
            true => Some(commonware_coder::shared(NulStr)),
            false => Some(commonware_coder::shared(U16LenStr::default())),
        });
    }));
    let data = &data[..data.len().min(u16::MAX as usize)];
    let record = Record::new()
        .with("id", id)
        .with("flag", flag)
        .with("len", data.len() as u16)
        .with("data", Bytes::copy_from_slice(data))
        .with("name", name);
    roundtrip(coder, record);
}

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    // Numbers
    U8(u8, WrappedEndian),
    U16(u16, WrappedEndian),
    U32(u32, WrappedEndian),
    U64(u64, WrappedEndian),
    I8(i8, WrappedEndian),
    I16(i16, WrappedEndian),
    I32(i32, WrappedEndian),
    I64(i64, WrappedEndian),
    F32(f32, WrappedEndian),
    F64(f64, WrappedEndian),
    Bool(bool),

    // Bytes
    Raw(Vec<u8>),
    Pad(u8),

    // Strings
    NulStr(String),
    LenStr(String, WrappedEndian),

    // Arrays
    Array(Vec<u16>, WrappedEndian),
    Strings(Vec<String>),

    // Records
    Record {
        id: u32,
        flag: bool,
        name: String,
        data: Vec<u8>,
    },
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::U8(v, e) => roundtrip_number(v, e),
        FuzzInput::U16(v, e) => roundtrip_number(v, e),
        FuzzInput::U32(v, e) => roundtrip_number(v, e),
        FuzzInput::U64(v, e) => roundtrip_number(v, e),
        FuzzInput::I8(v, e) => roundtrip_number(v, e),
        FuzzInput::I16(v, e) => roundtrip_number(v, e),
        FuzzInput::I32(v, e) => roundtrip_number(v, e),
        FuzzInput::I64(v, e) => roundtrip_number(v, e),
        FuzzInput::F32(v, e) => roundtrip_f32(v, e),
        FuzzInput::F64(v, e) => roundtrip_f64(v, e),
        FuzzInput::Bool(v) => roundtrip(Bool, v),
        FuzzInput::Raw(v) => roundtrip(Raw::new(v.len()), Bytes::from(v)),
        FuzzInput::Pad(len) => roundtrip(Pad::new(len as usize), ()),
        FuzzInput::NulStr(v) => roundtrip_nul_str(v),
        FuzzInput::LenStr(v, e) => roundtrip_len_str(v, e),
        FuzzInput::Array(v, e) => {
            roundtrip(LenArray::<u32, _>::new(Num::<u16>::new(e.into()), e.into()), v)
        }
        FuzzInput::Strings(v) => {
            let v: Vec<String> = v.into_iter().filter(|s| !s.contains('\0')).collect();
            roundtrip(U32LenArray::new(NulStr, Endian::Big), v.clone());
            let v: Vec<String> = v.into_iter().filter(|s| s.len() <= u8::MAX as usize).collect();
            roundtrip(U32LenArray::new(U8LenStr::default(), Endian::Little), v);
        }
        FuzzInput::Record {
            id,
            flag,
            name,
            data,
        } => roundtrip_record(id, flag, name, data),
    };
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
