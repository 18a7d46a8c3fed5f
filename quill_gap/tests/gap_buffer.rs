// This file is part of Quill.

// Quill is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Quill is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use quill_gap::{Direction, GapBuffer, GapError};

fn contents(buffer: &GapBuffer) -> String {
    String::from_utf8(buffer.slice(0, buffer.len()).expect("full slice")).expect("valid utf8")
}

#[test]
fn empty_buffer_from_empty_content() {
    let buffer = GapBuffer::new("scratch", b"");

    assert_eq!(buffer.len(), 0);
    assert!(buffer.is_empty());
    assert_eq!(buffer.gap_size(), buffer.capacity());
    assert_eq!(buffer.iter().next(), None);
}

#[test]
fn insert_then_backspace_multibyte() {
    let mut buffer = GapBuffer::new("scratch", b"");

    buffer.insert("héllo".as_bytes(), 0).unwrap();
    assert_eq!(buffer.len(), 6);

    let removed = buffer.delete(1, 6, Direction::Backward);
    assert_eq!(removed, 1);
    assert_eq!(contents(&buffer), "héll");
    assert_eq!(buffer.len(), 5);
}

#[test]
fn oversized_insert_is_rejected_and_leaves_length_unchanged() {
    let mut buffer = GapBuffer::new("scratch", b"seed");
    let length_before = buffer.len();
    let gap_before = buffer.gap_index();

    let oversized = vec![b'x'; buffer.gap_size() + 1];
    let result = buffer.insert(&oversized, 2);

    assert!(matches!(
        result,
        Err(GapError::InsufficientCapacity { .. })
    ));
    assert_eq!(buffer.len(), length_before);
    assert_eq!(buffer.gap_index(), gap_before);
    assert_eq!(contents(&buffer), "seed");
}

#[test]
fn length_is_conserved_across_an_edit_sequence() {
    let mut buffer = GapBuffer::new("scratch", b"");
    let mut inserted = 0usize;
    let mut removed_bytes = 0usize;

    for (text, at) in [("alpha", 0), ("beta", 2), ("γδ", 6), ("tail", 13)] {
        buffer.insert(text.as_bytes(), at).unwrap();
        inserted += text.len();
    }

    let before = buffer.len();
    buffer.delete(2, 6, Direction::Forward);
    removed_bytes += before - buffer.len();

    let before = buffer.len();
    buffer.delete(3, buffer.len(), Direction::Backward);
    removed_bytes += before - buffer.len();

    assert_eq!(buffer.len(), inserted - removed_bytes);
    assert!(buffer.len() <= buffer.capacity());
}

#[test]
fn round_trip_against_reference_string() {
    let mut buffer = GapBuffer::new("scratch", b"");
    let mut reference = String::new();

    let inserts: [(&str, usize); 5] = [
        ("hello world", 0),
        (" naïve", 5),
        ("🦀", 0),
        ("; done", 21),
        ("middle ", 10),
    ];

    for (text, at) in inserts {
        buffer.insert(text.as_bytes(), at).unwrap();
        reference.insert_str(at, text);
        assert_eq!(contents(&buffer), reference);
    }

    // Interleave rune deletions at both ends and in the middle.
    for (count, cursor, direction) in [
        (2, reference.len(), Direction::Backward),
        (3, 0, Direction::Forward),
        (1, 6, Direction::Backward),
    ] {
        buffer.delete(count, cursor, direction);

        let mut chars_removed = count;
        let mut cursor = cursor;
        while chars_removed > 0 {
            match direction {
                Direction::Backward => {
                    let Some((at, _)) = reference[..cursor].char_indices().next_back() else {
                        break;
                    };
                    reference.remove(at);
                    cursor = at;
                }
                Direction::Forward => {
                    if cursor >= reference.len() {
                        break;
                    }
                    reference.remove(cursor);
                }
            }
            chars_removed -= 1;
        }

        assert_eq!(contents(&buffer), reference);
    }
}

#[test]
fn gap_bytes_never_leak_into_slices_or_iteration() {
    // Fresh storage is zeroed, so a leaked gap byte would show up as NUL in content that
    // contains none.
    let mut buffer = GapBuffer::new("scratch", b"abcdefgh");
    buffer.delete(3, 5, Direction::Backward);
    buffer.insert(b"XY", 2).unwrap();
    buffer.move_gap_to(0);
    buffer.move_gap_to(buffer.len());

    let all = buffer.slice(0, buffer.len()).unwrap();
    assert!(!all.contains(&0));
    assert_eq!(all.len(), buffer.len());
    assert!(buffer.iter().all(|item| item.scalar != '\0'));

    for begin in 0..=buffer.len() {
        for end in begin..=buffer.len() {
            assert!(!buffer.slice(begin, end).unwrap().contains(&0));
        }
    }
}

#[test]
fn rune_operations_keep_the_gap_on_a_scalar_boundary() {
    let mut buffer = GapBuffer::new("scratch", " hållö wörld 🌍".as_bytes());
    let reference = contents(&buffer);

    for cursor in [0, 1, 3, 7, reference.len()] {
        assert!(reference.is_char_boundary(cursor));
        buffer.move_gap_to(cursor);
        assert_eq!(buffer.gap_index(), cursor);
        assert!(contents(&buffer).is_char_boundary(buffer.gap_index()));
    }

    buffer.delete(2, 7, Direction::Backward);
    assert!(contents(&buffer).is_char_boundary(buffer.gap_index()));

    buffer.delete(2, buffer.gap_index(), Direction::Forward);
    assert!(contents(&buffer).is_char_boundary(buffer.gap_index()));

    buffer.insert("é".as_bytes(), buffer.gap_index()).unwrap();
    assert!(contents(&buffer).is_char_boundary(buffer.gap_index()));
}

#[test]
fn moving_the_gap_to_its_own_position_shifts_nothing() {
    let mut buffer = GapBuffer::new("scratch", b"some content");
    buffer.move_gap_to(4);

    assert_eq!(buffer.move_gap_to(4), 0);
    assert_eq!(contents(&buffer), "some content");
}

#[test]
fn gap_move_cost_is_the_distance_moved() {
    let mut buffer = GapBuffer::new("scratch", b"0123456789");

    assert_eq!(buffer.move_gap_to(10), 10);
    assert_eq!(buffer.move_gap_to(7), 3);
    assert_eq!(buffer.move_gap_to(9), 2);
    assert_eq!(contents(&buffer), "0123456789");
}

#[test]
fn deletion_clamps_at_the_extremities() {
    let mut buffer = GapBuffer::new("scratch", b"ab");

    assert_eq!(buffer.delete(5, 0, Direction::Backward), 0);
    assert_eq!(buffer.delete(5, buffer.len(), Direction::Forward), 0);
    assert_eq!(buffer.delete(5, 1, Direction::Backward), 1);
    assert_eq!(buffer.delete(5, 0, Direction::Forward), 1);
    assert!(buffer.is_empty());
    assert_eq!(buffer.delete(1, 0, Direction::Forward), 0);
}

#[test]
fn forward_delete_walks_whole_runes() {
    let mut buffer = GapBuffer::new("scratch", "a🌍b".as_bytes());

    assert_eq!(buffer.delete(1, 1, Direction::Forward), 1);
    assert_eq!(contents(&buffer), "ab");
}

#[test]
fn slice_straddling_the_gap_is_stitched_from_both_segments() {
    let mut buffer = GapBuffer::new("scratch", b"hello world");
    buffer.move_gap_to(5);

    assert_eq!(buffer.slice(0, 11).unwrap(), b"hello world");
    assert_eq!(buffer.slice(3, 8).unwrap(), b"lo wo");
    assert_eq!(buffer.slice(5, 5).unwrap(), b"");
    assert_eq!(buffer.slice(0, 5).unwrap(), b"hello");
    assert_eq!(buffer.slice(5, 11).unwrap(), b" world");
}

#[test]
fn iterator_reports_the_cursor_position() {
    let mut buffer = GapBuffer::new("scratch", "héllo".as_bytes());
    buffer.move_gap_to(3);

    let items: Vec<_> = buffer.iter().collect();
    assert_eq!(items.len(), 5);
    assert_eq!(
        items.iter().map(|i| i.scalar).collect::<String>(),
        "héllo"
    );

    let cursor_items: Vec<_> = items.iter().filter(|i| i.on_cursor).collect();
    assert_eq!(cursor_items.len(), 1);
    assert_eq!(cursor_items[0].pos, 3);
    assert_eq!(cursor_items[0].scalar, 'l');
}

#[test]
fn iterator_positions_follow_byte_offsets() {
    let buffer = GapBuffer::new("scratch", "a🌍b".as_bytes());

    let positions: Vec<_> = buffer.iter().map(|i| i.pos).collect();
    assert_eq!(positions, [0, 1, 5]);
}

#[test]
fn iterator_substitutes_replacement_and_resynchronizes() {
    let mut buffer = GapBuffer::new("scratch", b"");
    // A lone continuation byte between valid scalars.
    buffer.insert(&[b'a', 0x80, b'b'], 0).unwrap();

    let scalars: Vec<_> = buffer.iter().map(|i| i.scalar).collect();
    assert_eq!(scalars, ['a', '\u{FFFD}', 'b']);
}

#[test]
fn iterator_restarts_from_a_given_position() {
    let buffer = GapBuffer::new("scratch", b"hello");

    let tail: String = buffer.iter_from(3).map(|i| i.scalar).collect();
    assert_eq!(tail, "lo");
}

#[test]
fn reset_reuses_storage_and_rejects_oversized_content() {
    let mut buffer = GapBuffer::new("scratch", b"old");
    let capacity = buffer.capacity();

    buffer.reset(b"new content").unwrap();
    assert_eq!(contents(&buffer), "new content");
    assert_eq!(buffer.capacity(), capacity);
    assert_eq!(buffer.gap_index(), 0);

    let oversized = vec![b'x'; capacity + 1];
    assert!(matches!(
        buffer.reset(&oversized),
        Err(GapError::InsufficientCapacity { .. })
    ));
}

#[test]
fn invalid_ranges_are_errors_not_panics() {
    let buffer = GapBuffer::new("scratch", b"abc");

    assert_eq!(
        buffer.slice(2, 1),
        Err(GapError::InvalidRange {
            begin: 2,
            end: 1,
            len: 3
        })
    );
    assert_eq!(
        buffer.slice(0, 4),
        Err(GapError::InvalidRange {
            begin: 0,
            end: 4,
            len: 3
        })
    );
}

#[test]
fn buffers_construct_directly_from_str_content() {
    let buffer = GapBuffer::from("héllo");

    assert_eq!(buffer.len(), 6);
    assert_eq!(buffer.name(), "");
    assert_eq!(buffer.chars().collect::<String>(), "héllo");
}

#[test]
fn capacity_tiers_double_and_round_up() {
    assert_eq!(GapBuffer::required_capacity(0), 4096);
    assert_eq!(GapBuffer::required_capacity(2048), 4096);
    assert_eq!(GapBuffer::required_capacity(2049), 8192);
    assert_eq!(GapBuffer::new("scratch", &[b'x'; 3000]).capacity(), 8192);
}
