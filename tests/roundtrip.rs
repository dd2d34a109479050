mod common;

use common::{lzw_decode, FrameSpec, GifBuilder, RGBK};
use proptest::prelude::*;
use webgif::{
    decode, encode, AnyExtension, DecodeOptions, DecodingFormatError, Section, Version,
};

fn only_image_data(bytes: &[u8]) -> Vec<Vec<u8>> {
    decode(bytes)
        .unwrap()
        .images()
        .map(|image| image.data.as_bytes().to_vec())
        .collect()
}

#[test]
fn unedited_files_are_identical() {
    let mut animated = GifBuilder::new(16, 8);
    animated.app = Some(b"NETSCAPE2.0".to_vec());
    animated.comment = Some(vec![b'x'; 600]);
    let mut second = FrameSpec::new(8, 8);
    second.local_palette = Some(vec![[1, 2, 3]; 16]);
    second.transparent = Some(3);
    animated.frames.push(second);

    let mut old = GifBuilder::new(3, 3);
    old.version = b"87a";

    let mut chunky = GifBuilder::new(64, 64);
    chunky.chunk_len = 17;

    let mut no_global = GifBuilder::new(5, 5);
    no_global.palette = None;
    no_global.frames[0].local_palette = Some(RGBK.to_vec());

    for builder in [animated, old, chunky, no_global] {
        let bytes = builder.build();
        assert_eq!(encode(&decode(&bytes).unwrap()).unwrap(), bytes);
    }
}

#[test]
fn decoded_model() {
    let mut builder = GifBuilder::new(16, 8);
    builder.comment = Some(b"hello".to_vec());
    builder.frames[0].transparent = Some(2);
    let gif = decode(&builder.build()).unwrap();

    assert_eq!(gif.version(), Version::V89a);
    assert_eq!((gif.screen_width(), gif.screen_height()), (16, 8));
    assert_eq!(gif.global_color_table().unwrap().entries(), &RGBK);
    assert_eq!(gif.sections().len(), 3);
    match &gif.sections()[0] {
        Section::Extension(ext) => {
            assert_eq!(ext.label, AnyExtension(0xFE));
            assert_eq!(ext.data.payload(), b"hello");
        }
        other => panic!("expected comment, got {other:?}"),
    }
    let desc = gif.describe();
    assert_eq!(desc.transparent_index, Some(2));
    assert_eq!(desc.color_count, 4);
    assert!(!desc.interlaced);
}

#[test]
fn list_colors_of_four_entry_table() {
    let gif = decode(&GifBuilder::new(4, 4).build()).unwrap();
    let rows: Vec<_> = gif
        .list_colors()
        .iter()
        .map(|e| (e.index, e.red, e.green, e.blue))
        .collect();
    assert_eq!(
        rows,
        [(0, 0, 0, 0), (1, 255, 0, 0), (2, 0, 255, 0), (3, 0, 0, 255)]
    );
}

#[test]
fn interlace_keeps_pixels() {
    let builder = GifBuilder::new(40, 30);
    let bytes = builder.build();
    let mut gif = decode(&bytes).unwrap();
    gif.set_interlace(true);
    gif.set_interlace(true);
    let edited = encode(&gif).unwrap();

    assert_eq!(edited.len(), bytes.len());
    assert!(decode(&edited).unwrap().describe().interlaced);
    assert_eq!(only_image_data(&edited), only_image_data(&bytes));

    let image = decode(&edited).unwrap().images().next().unwrap().clone();
    let indices = lzw_decode(image.min_code_size, &image.data.payload());
    assert_eq!(indices, builder.frames[0].indices);
}

#[test]
fn transparency_edits() {
    let mut builder = GifBuilder::new(6, 6);
    builder.version = b"87a";
    builder.comment = Some(b"keep me".to_vec());
    let bytes = builder.build();

    let mut gif = decode(&bytes).unwrap();
    gif.set_transparent(Some(5));
    let set = decode(&encode(&gif).unwrap()).unwrap();
    assert_eq!(set.describe().transparent_index, Some(5));
    assert_eq!(set.version(), Version::V89a);

    let mut cleared = set.clone();
    cleared.set_transparent(None);
    let cleared = decode(&encode(&cleared).unwrap()).unwrap();
    assert_eq!(cleared.describe().transparent_index, None);

    for gif in [&set, &cleared] {
        let comment = gif.sections().iter().find_map(|s| match s {
            Section::Extension(ext) => Some(ext.data.payload()),
            _ => None,
        });
        assert_eq!(comment.as_deref(), Some(&b"keep me"[..]));
    }
    assert_eq!(only_image_data(&encode(&cleared).unwrap()), only_image_data(&bytes));
}

#[test]
fn every_frame_gets_transparency() {
    let mut builder = GifBuilder::new(8, 8);
    builder.frames[0].transparent = Some(1);
    builder.frames.push(FrameSpec::new(4, 4));
    let mut gif = decode(&builder.build()).unwrap();
    gif.set_transparent(Some(0));

    let controls: Vec<_> = gif
        .sections()
        .iter()
        .filter_map(|s| match s {
            Section::Control(ctrl) => Some(ctrl.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(controls.len(), 2);
    assert!(controls.iter().all(|c| c.transparent() == Some(0)));
    // The existing control keeps its delay.
    assert_eq!(controls[0].delay, 10);
}

#[test]
fn corrupted_flags_byte() {
    let mut bytes = GifBuilder::new(2, 2).build();
    bytes[10] |= 0x07;
    let err = decode(&bytes).unwrap_err();
    assert_eq!(
        err.kind(),
        &DecodingFormatError::InvalidColorTableSize { declared: 256 }
    );
}

#[test]
fn strict_trailing_data() {
    let mut bytes = GifBuilder::new(2, 2).build();
    bytes.extend_from_slice(&[0; 4]);
    assert!(decode(&bytes).is_ok());
    let err = DecodeOptions::new()
        .allow_trailing_data(false)
        .decode(&bytes)
        .unwrap_err();
    assert_eq!(err.kind(), &DecodingFormatError::TrailingData);
}

proptest! {
    #[test]
    fn opaque_payload_survives_edits(
        payload in proptest::collection::vec(any::<u8>(), 0..2000),
        chunk_len in 1usize..=255,
        on in any::<bool>(),
        index in proptest::option::of(any::<u8>()),
    ) {
        let mut bytes = b"GIF89a\x02\x00\x02\x00\x80\x00\x00\x00\x00\x00\xFF\xFF\xFF".to_vec();
        bytes.extend_from_slice(&[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0, 2]);
        for chunk in payload.chunks(chunk_len) {
            bytes.push(chunk.len() as u8);
            bytes.extend_from_slice(chunk);
        }
        bytes.extend_from_slice(&[0, 0x3B]);

        let mut gif = decode(&bytes).unwrap();
        prop_assert_eq!(&encode(&gif).unwrap(), &bytes);

        gif.set_interlace(on);
        gif.set_transparent(index);
        let edited = decode(&encode(&gif).unwrap()).unwrap();
        prop_assert_eq!(edited.describe().interlaced, on);
        prop_assert_eq!(edited.describe().transparent_index, index);
        prop_assert_eq!(only_image_data(&encode(&edited).unwrap()), only_image_data(&bytes));
    }

    #[test]
    fn garbage_never_panics(tail in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend_from_slice(&tail);
        if let Ok(gif) = decode(&bytes) {
            let again = decode(&encode(&gif).unwrap()).unwrap();
            prop_assert_eq!(again, gif);
        }
    }
}
