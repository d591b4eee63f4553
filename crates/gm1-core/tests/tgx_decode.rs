mod common;

use common::{RED, WHITE, numbered_palette, solid_indexed_stream, solid_stream};
use gm1_core::color::{expand_color, pack_color};
use gm1_core::error::Gm1Error;
use gm1_core::model::Rect;
use gm1_core::palette::resolve;
use gm1_core::tgx::{Tgx, Token, decode_image, decode_into};
use image::{Rgba, RgbaImage};

const FILL: Rgba<u8> = Rgba([1, 2, 3, 255]);

#[test]
fn color_expansion_shifts_channels_into_high_bits() {
    assert_eq!(expand_color(0x7C00), Rgba([248, 0, 0, 255]));
    assert_eq!(expand_color(0x03E0), Rgba([0, 248, 0, 255]));
    assert_eq!(expand_color(0x001F), Rgba([0, 0, 248, 255]));
    assert_eq!(expand_color(0x0421), Rgba([8, 8, 8, 255]));
    // top bit carries nothing
    assert_eq!(expand_color(0x8000), Rgba([0, 0, 0, 255]));
}

#[test]
fn pack_color_inverts_expansion() {
    for v in [0u16, 1, 0x1234, 0x4321, 0x7FFF, 0xFFFF] {
        assert_eq!(pack_color(expand_color(v)), v & 0x7FFF);
    }
}

#[test]
fn control_byte_splits_kind_and_length() {
    assert_eq!(Token::from_control(0x00), Some(Token::PixelStream(1)));
    assert_eq!(Token::from_control(0x3F), Some(Token::TransparentRun(32)));
    assert_eq!(Token::from_control(0x45), Some(Token::RepeatingPixel(6)));
    assert_eq!(Token::from_control(0x80), Some(Token::NewLine));
    assert_eq!(Token::from_control(0x9F), Some(Token::NewLine));
    for b in [0x60u8, 0xA0, 0xC0, 0xE0] {
        assert_eq!(Token::from_control(b), None);
    }
}

#[test]
fn transparent_run_clears_a_whole_row() {
    let mut canvas = RgbaImage::from_pixel(32, 2, FILL);
    decode_into(&mut canvas, Rect::new(0, 0, 32, 2), &[0x3F, 0x80, 0x3F], None).unwrap();
    assert!(canvas.pixels().all(|p| p[3] == 0));
}

#[test]
fn pixel_stream_reads_each_color() {
    let mut data = vec![0x01];
    data.extend_from_slice(&RED.to_le_bytes());
    data.extend_from_slice(&WHITE.to_le_bytes());
    let img = decode_image(2, 1, &data, None).unwrap();
    assert_eq!(*img.pixels.get_pixel(0, 0), expand_color(RED));
    assert_eq!(*img.pixels.get_pixel(1, 0), expand_color(WHITE));
}

#[test]
fn new_line_clears_rest_of_row() {
    let mut canvas = RgbaImage::from_pixel(4, 2, FILL);
    let mut data = vec![0x40];
    data.extend_from_slice(&RED.to_le_bytes());
    data.push(0x80);
    decode_into(&mut canvas, Rect::new(0, 0, 4, 2), &data, None).unwrap();
    assert_eq!(*canvas.get_pixel(0, 0), expand_color(RED));
    for x in 1..4 {
        assert_eq!(canvas.get_pixel(x, 0)[3], 0);
    }
    // row 1 was never visited
    assert_eq!(*canvas.get_pixel(0, 1), FILL);
}

#[test]
fn new_line_on_last_row_ends_decoding() {
    let mut data = vec![0x41];
    data.extend_from_slice(&WHITE.to_le_bytes());
    // garbage after the final new line must not be read
    data.extend_from_slice(&[0x80, 0xFF, 0xFF]);
    let img = decode_image(2, 1, &data, None).unwrap();
    assert!(img.pixels.pixels().all(|p| *p == expand_color(WHITE)));
}

#[test]
fn end_of_stream_before_last_row_is_fine() {
    let data = solid_stream(3, 1, RED);
    let img = decode_image(3, 3, &data, None).unwrap();
    assert_eq!(*img.pixels.get_pixel(2, 0), expand_color(RED));
    assert_eq!(img.pixels.get_pixel(0, 2)[3], 0);
}

#[test]
fn overrunning_the_row_is_a_range_error() {
    let err = decode_image(2, 1, &[0x22], None).unwrap_err();
    assert!(matches!(err, Gm1Error::Range(_)), "{err}");
}

#[test]
fn pixel_stream_past_right_edge_is_a_range_error() {
    let mut data = vec![0x02];
    for _ in 0..3 {
        data.extend_from_slice(&RED.to_le_bytes());
    }
    let err = decode_image(2, 1, &data, None).unwrap_err();
    assert!(matches!(err, Gm1Error::Range(_)), "{err}");
}

#[test]
fn repeating_pixel_past_right_edge_is_a_range_error() {
    let mut data = vec![0x42];
    data.extend_from_slice(&RED.to_le_bytes());
    let err = decode_image(2, 1, &data, None).unwrap_err();
    assert!(matches!(err, Gm1Error::Range(_)), "{err}");
}

#[test]
fn unknown_token_kind_is_a_decode_error() {
    let mut data = solid_stream(2, 1, RED);
    data.pop();
    let at = data.len();
    data.push(0x60);
    match decode_image(2, 2, &data, None) {
        Err(Gm1Error::Decode { offset, .. }) => assert_eq!(offset, at),
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[test]
fn truncated_pixel_token_is_a_decode_error() {
    // two pixels announced, one and a half delivered
    let err = decode_image(2, 1, &[0x01, 0x00, 0x7C, 0x00], None).unwrap_err();
    assert!(matches!(err, Gm1Error::Decode { .. }), "{err}");
}

#[test]
fn indexed_mode_reads_one_byte_per_pixel() {
    let table = numbered_palette();
    let palette = resolve(&table, 1).unwrap();
    let data = solid_indexed_stream(3, 2, 7);
    let img = decode_image(3, 2, &data, Some(palette)).unwrap();
    let expected = expand_color(256 + 7);
    assert!(img.pixels.pixels().all(|p| *p == expected));

    let mut stream = vec![0x00, 9];
    stream.push(0x80);
    let img = decode_image(1, 1, &stream, Some(palette)).unwrap();
    assert_eq!(*img.pixels.get_pixel(0, 0), expand_color(256 + 9));
}

#[test]
fn decoding_stays_inside_the_rectangle() {
    let mut canvas = RgbaImage::from_pixel(4, 4, FILL);
    let data = solid_stream(2, 2, WHITE);
    decode_into(&mut canvas, Rect::new(2, 1, 2, 2), &data, None).unwrap();
    for (x, y, p) in canvas.enumerate_pixels() {
        let inside = (2..4).contains(&x) && (1..3).contains(&y);
        if inside {
            assert_eq!(*p, expand_color(WHITE));
        } else {
            assert_eq!(*p, FILL);
        }
    }
}

#[test]
fn rectangle_outside_canvas_is_rejected() {
    let mut canvas = RgbaImage::new(4, 4);
    let err = decode_into(&mut canvas, Rect::new(3, 0, 2, 1), &[], None).unwrap_err();
    assert!(matches!(err, Gm1Error::Range(_)));
}

#[test]
fn standalone_tgx_file() {
    let mut bytes = 2u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&3u32.to_le_bytes());
    bytes.extend(solid_stream(2, 3, RED));
    let tgx = Tgx::parse(&bytes).unwrap();
    assert_eq!((tgx.width, tgx.height), (2, 3));
    let img = tgx.decode().unwrap();
    assert_eq!(img.pixels.dimensions(), (2, 3));
    assert!(img.pixels.pixels().all(|p| *p == expand_color(RED)));
}

#[test]
fn short_tgx_header_is_a_format_error() {
    let err = Tgx::parse(&[1, 0, 0, 0, 2]).unwrap_err();
    assert!(matches!(err, Gm1Error::Format(_)));
}
