#![no_main]

use arbitrary::Arbitrary;
use commonware_coder::{
    shared, Bool, Coder, Cursor, Format, NulStr, RangeCfg, Record, RecordCoder, U16LenStr,
    U32LenArray, U8, U16, U32,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput<'a> {
    start: u8,
    data: &'a [u8],
}

fn coder() -> RecordCoder {
    RecordCoder::new(Format::register(|r| {
        r.field("version", U8::default());
        r.field("flag", Bool);
        r.generated("name", |partial: &Record| match partial.get::<u8>("version")? {
            0..=3 => Some(shared(U16LenStr::default())),
            _ => Some(shared(NulStr)),
        });
        r.field(
            "ids",
            U32LenArray::new(U32::default(), Default::default()).with_range(..1024),
        );
        r.field("tail", U16::default());
    }))
}

fn fuzz(input: FuzzInput) {
    let coder = coder();
    let mut cursor = Cursor::new(input.start as usize);
    let before = cursor.index();
    match coder.read(input.data, &mut cursor) {
        Ok(record) => {
            assert!(cursor.index() <= input.data.len());
            assert!(cursor.index() >= before);
            assert!(record.contains("tail"));
            let ids = record.get::<Vec<u32>>("ids").expect("ids were decoded");
            assert!(RangeCfg::from(..1024).contains(ids.len()));
        }
        Err(_) => {
            // Failed reads never move past the end of the input
            assert!(cursor.index() <= input.data.len().max(before));
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
