mod common;

use common::{GREEN, RED, WHITE, container_of, tile_block, tile_desc};
use gm1_core::color::expand_color;
use gm1_core::container::Container;
use gm1_core::error::Gm1Error;
use gm1_core::model::{ListData, Rect};
use gm1_core::tile_object::{
    DiamondGrid, assemble_objects, decode_part, decode_parts, group_objects, layout_object,
    max_row_length,
};
use image::RgbaImage;
use std::collections::HashSet;

fn four_part_object() -> Vec<u8> {
    let parts: Vec<_> = (0..4u8)
        .map(|i| (tile_desc(30, 16, i, 4, 0), tile_block(WHITE)))
        .collect();
    container_of(3, &parts)
}

#[test]
fn objects_end_at_last_part_marker() {
    let d = [
        tile_desc(30, 16, 0, 2, 0),
        tile_desc(30, 16, 1, 2, 0),
        tile_desc(30, 16, 0, 1, 0),
        tile_desc(30, 16, 0, 3, 0),
        tile_desc(30, 16, 1, 3, 0),
    ];
    // the last run has no marker and still forms an object
    assert_eq!(group_objects(&d), vec![0..2, 2..3, 3..5]);
    assert!(group_objects(&[]).is_empty());
}

#[test]
fn row_length_is_integer_square_root() {
    assert_eq!(max_row_length(0), 0);
    assert_eq!(max_row_length(1), 1);
    assert_eq!(max_row_length(3), 1);
    assert_eq!(max_row_length(4), 2);
    assert_eq!(max_row_length(8), 2);
    assert_eq!(max_row_length(9), 3);
    assert_eq!(max_row_length(16), 4);
}

#[test]
fn nine_parts_form_a_full_diamond() {
    let cells: Vec<_> = DiamondGrid::new(9).collect();
    assert_eq!(cells.len(), 9);
    let rows: Vec<u32> = cells.iter().map(|c| c.row_len).collect();
    assert_eq!(rows, vec![1, 2, 2, 3, 3, 3, 2, 2, 1]);
    let distinct: HashSet<_> = cells.iter().map(|c| (c.xtile, c.ytile)).collect();
    assert_eq!(distinct.len(), 9);
    assert_eq!(cells.last().map(|c| c.ytile), Some(4));
}

#[test]
fn non_square_counts_continue_with_single_cells() {
    let cells: Vec<_> = DiamondGrid::new(3)
        .map(|c| (c.xtile, c.ytile, c.row_len))
        .collect();
    assert_eq!(cells, vec![(0, 0, 1), (0, 1, 1), (0, 2, 1)]);
}

#[test]
fn layout_places_rows_and_flips() {
    let d: Vec<_> = (0..4).map(|i| tile_desc(30, 16, i, 4, 0)).collect();
    let layout = layout_object(&d, 10);
    assert_eq!((layout.width, layout.height), (62, 32));
    let rects: Vec<Rect> = layout.parts.iter().map(|p| p.rect).collect();
    assert_eq!(
        rects,
        vec![
            Rect::new(16, 16, 30, 16),
            Rect::new(0, 8, 30, 16),
            Rect::new(32, 8, 30, 16),
            Rect::new(16, 0, 30, 16),
        ]
    );
    let ids: Vec<usize> = layout.parts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![10, 11, 12, 13]);
    for r in &rects {
        assert!(r.fits_in(layout.width, layout.height));
    }
}

#[test]
fn single_part_layout_fills_its_canvas() {
    let layout = layout_object(&[tile_desc(30, 40, 0, 1, 24)], 0);
    assert_eq!((layout.width, layout.height), (30, 40));
    assert_eq!(layout.parts[0].rect, Rect::new(0, 0, 30, 40));
}

#[test]
fn assembled_object_is_one_canvas() {
    let c = Container::parse(&four_part_object()).unwrap();
    let list = assemble_objects(&c, None).unwrap();
    assert_eq!(list.images.len(), 1);
    assert_eq!(list.part_count(), 4);
    let img = &list.images[0];
    assert_eq!(img.pixels.dimensions(), (62, 32));
    // widest row of the front part
    assert_eq!(*img.pixels.get_pixel(16, 23), expand_color(WHITE));
    assert_eq!(*img.pixels.get_pixel(45, 23), expand_color(WHITE));
    // corners stay empty
    assert_eq!(img.pixels.get_pixel(0, 0)[3], 0);
    assert_eq!(img.pixels.get_pixel(61, 31)[3], 0);
    assert!(matches!(
        list.data,
        ListData::Tiles {
            assembled: true,
            ..
        }
    ));
}

#[test]
fn raw_mode_keeps_one_image_per_part() {
    let c = Container::parse(&four_part_object()).unwrap();
    let list = decode_parts(&c, None).unwrap();
    assert_eq!(list.images.len(), 4);
    let ListData::Tiles { objects, assembled } = &list.data else {
        panic!("expected tile data");
    };
    assert!(!assembled);
    assert_eq!(objects.len(), 1);
    let cells: Vec<(u32, u32)> = objects[0].parts.iter().map(|p| (p.xtile, p.ytile)).collect();
    assert_eq!(cells, vec![(0, 0), (0, 1), (1, 1), (0, 2)]);
    for (p, img) in objects[0].parts.iter().zip(&list.images) {
        assert_eq!(p.rect, Rect::new(0, 0, 30, 16));
        assert_eq!(*img.pixels.get_pixel(15, 0), expand_color(WHITE));
    }
}

#[test]
fn part_stream_fills_rectangle_before_the_diamond() {
    // 30x20 part, diamond 4 rows down, stream paints the top row red
    let mut data = tile_block(GREEN);
    data.push(0x40 | 29);
    data.extend_from_slice(&RED.to_le_bytes());
    data.push(0x80);

    let mut canvas = RgbaImage::new(30, 20);
    decode_part(&mut canvas, Rect::new(0, 0, 30, 20), 4, &data).unwrap();
    assert_eq!(*canvas.get_pixel(0, 0), expand_color(RED));
    assert_eq!(*canvas.get_pixel(29, 0), expand_color(RED));
    assert_eq!(*canvas.get_pixel(15, 4), expand_color(GREEN));
    assert_eq!(canvas.get_pixel(15, 3)[3], 0);
}

#[test]
fn part_without_diamond_block_is_a_size_error() {
    let parts = [(tile_desc(30, 16, 0, 1, 0), vec![0u8; 100])];
    let c = Container::parse(&container_of(3, &parts)).unwrap();
    let err = assemble_objects(&c, None).unwrap_err();
    assert!(matches!(err, Gm1Error::Size { actual: 100, .. }), "{err}");
}

#[test]
fn diamond_below_part_rectangle_is_a_range_error() {
    let parts = [(tile_desc(30, 16, 0, 1, 8), tile_block(WHITE))];
    let c = Container::parse(&container_of(3, &parts)).unwrap();
    let err = decode_parts(&c, None).unwrap_err();
    assert!(matches!(err, Gm1Error::Range(_)), "{err}");
}
