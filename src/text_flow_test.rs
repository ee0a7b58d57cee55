#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::Justify;
use crate::render::FixedAdvance;

const EPSILON: f64 = 1e-6;
const FONT: f64 = 128.0;
const PREFER: f64 = 1.2;

fn mono() -> FixedAdvance {
    FixedAdvance::new(0.5)
}

fn flow(text: &str) -> TextFlow {
    TextFlow::new(text, &mono(), FONT, PREFER)
}

fn chosen(flow: &TextFlow, w: f64, h: f64) -> Vec<String> {
    let fit = flow.fit(w, h);
    flow.layouts()[fit.layout].sections.iter().map(|s| s.text.clone()).collect()
}

// =============================================================
// Candidate generation
// =============================================================

#[test]
fn empty_text_has_single_empty_layout() {
    let f = flow("   ");
    assert_eq!(f.layouts().len(), 1);
    assert_eq!(f.layouts()[0].lines(), 1);
    assert_eq!(f.layouts()[0].sections[0].text, "");
    let fit = f.fit(100.0, 100.0);
    assert_eq!(fit.actual_scale, 1.0);
    assert!(f.place(Rect::new(0.0, 0.0, 100.0, 100.0), Align::CENTER).is_empty());
}

#[test]
fn first_candidate_is_whole_string() {
    let f = flow("  hello world  ");
    assert_eq!(f.text(), "hello world");
    assert_eq!(f.layouts()[0].lines(), 1);
    assert_eq!(f.layouts()[0].sections[0].text, "hello world");
}

#[test]
fn groupings_added_for_few_chunks() {
    // 1 whole + 2 per k for k = 1..=9 + 2^(3-1) groupings
    let f = flow("a b c");
    assert_eq!(f.layouts().len(), 1 + 2 * MAX_LINES + 4);
}

#[test]
fn groupings_skipped_for_many_chunks() {
    let f = flow("a b c d e f g h i j");
    assert_eq!(f.layouts().len(), 1 + 2 * MAX_LINES);
}

#[test]
fn width_passes_reach_ten_lines() {
    let f = flow("abcdefghij");
    let most = f.layouts().iter().map(Layout::lines).max();
    assert_eq!(most, Some(MAX_LINES + 1));
    // last forward pass: one character per line
    assert_eq!(f.layouts()[1 + 2 * (MAX_LINES - 1)].lines(), 10);
}

#[test]
fn groupings_stop_at_max_lines_chunks() {
    let eight = flow("a b c d e f g h");
    assert_eq!(eight.layouts().len(), 1 + 2 * MAX_LINES + (1 << 7));
    let nine = flow("a b c d e f g h i");
    assert_eq!(nine.layouts().len(), 1 + 2 * MAX_LINES);
}

#[test]
fn groupings_skipped_for_single_word() {
    let f = flow("antidisestablishmentarianism");
    assert_eq!(f.layouts().len(), 1 + 2 * MAX_LINES);
}

#[test]
fn whitespace_chunks_keep_trailing_space() {
    assert_eq!(whitespace_chunks("ab cd e"), vec!["ab ", "cd ", "e"]);
    assert_eq!(whitespace_chunks("word"), vec!["word"]);
}

#[test]
fn groupings_enumerate_every_composition() {
    let g = groupings(&["a ", "b ", "c"]);
    assert_eq!(g.len(), 4);
    assert!(g.contains(&vec!["a b c".to_string()]));
    assert!(g.contains(&vec!["a ".to_string(), "b ".to_string(), "c".to_string()]));
    assert!(g.contains(&vec!["a b ".to_string(), "c".to_string()]));
    assert!(g.contains(&vec!["a ".to_string(), "b c".to_string()]));
}

#[test]
fn split_forward_breaks_mid_word() {
    let m = mono();
    // each char is 64 wide; close lines at 128
    let lines = split_forward("abcdef", 128.0, &m, FONT);
    assert_eq!(lines, vec!["ab", "cd", "ef", ""]);
}

#[test]
fn split_at_spaces_prefers_last_space() {
    let m = mono();
    // "ab cd" reaches 192 at "ab " -> break after space
    let lines = split_at_spaces("ab cdef", 192.0, &m, FONT);
    assert_eq!(lines[0], "ab ");
    assert_eq!(lines.concat(), "ab cdef");
}

#[test]
fn split_at_spaces_falls_back_to_mid_word() {
    let m = mono();
    let lines = split_at_spaces("abcdef", 128.0, &m, FONT);
    assert_eq!(lines, vec!["ab", "cd", "ef", ""]);
}

#[test]
fn sections_record_clean_breaks() {
    let layout = Layout::new(["ab ", "cd"], &mono(), FONT);
    assert_eq!(layout.lines(), 2);
    assert_eq!(layout.breaks, 1);
    assert_eq!(layout.sections[0].text, "ab");
    assert!(layout.sections[0].breaks);
    assert!(!layout.sections[1].breaks);
    assert_eq!(layout.width, 128.0);
}

// =============================================================
// Scoring and selection
// =============================================================

#[test]
fn short_word_in_wide_area_stays_on_one_line() {
    let f = flow("Hello");
    assert_eq!(chosen(&f, 1000.0, 200.0), vec!["Hello"]);
    let fit = f.fit(1000.0, 200.0);
    assert!((fit.actual_scale - 200.0 / FONT).abs() < EPSILON);
}

#[test]
fn two_words_in_square_area_break_at_space() {
    let f = flow("aaaa bbbb");
    assert_eq!(chosen(&f, 300.0, 300.0), vec!["aaaa", "bbbb"]);
    let fit = f.fit(300.0, 300.0);
    let expected_actual = 300.0 / 256.0;
    assert!((fit.actual_scale - expected_actual).abs() < EPSILON);
    assert!((fit.perceived_scale - expected_actual * 1.1).abs() < EPSILON);
}

#[test]
fn single_long_token_breaks_mid_word() {
    let f = flow("abcdefghij");
    let lines = chosen(&f, 100.0, 100.0);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines.concat(), "abcdefghij");
}

#[test]
fn identical_candidates_keep_the_first() {
    let f = flow("a");
    assert_eq!(f.fit(100.0, 100.0).layout, 0);
}

#[test]
fn perceived_scale_rewards_clean_breaks() {
    let m = mono();
    let clean = Layout::new(["ab ", "cd"], &m, FONT);
    let ragged = Layout::new(["ab", "cd"], &m, FONT);
    let a = clean.actual_scale(256.0, 256.0, FONT);
    assert_eq!(a, ragged.actual_scale(256.0, 256.0, FONT));
    assert!(clean.perceived_scale(256.0, 256.0, FONT, PREFER) > ragged.perceived_scale(256.0, 256.0, FONT, PREFER));
}

#[test]
fn layouts_always_fit_their_area() {
    let texts = [
        "Hi",
        "the quick brown fox jumps over the lazy dog",
        "supercalifragilisticexpialidocious",
        "one two",
        "a b c d e f g h i j k l m n o p",
        "Näive café déjà vu",
    ];
    let areas = [(50.0, 400.0), (400.0, 50.0), (300.0, 300.0), (1.0, 1.0), (1280.0, 720.0)];
    for text in texts {
        let f = flow(text);
        for (w, h) in areas {
            let fit = f.fit(w, h);
            let layout = &f.layouts()[fit.layout];
            assert!(fit.actual_scale > 0.0, "{text} in {w}x{h}");
            assert!(layout.width * fit.actual_scale <= w + EPSILON, "{text} too wide in {w}x{h}");
            #[allow(clippy::cast_precision_loss)]
            let height = layout.lines() as f64 * FONT * fit.actual_scale;
            assert!(height <= h + EPSILON, "{text} too tall in {w}x{h}");
        }
    }
}

#[test]
fn square_area_prefers_more_lines_for_long_text() {
    let f = flow("the quick brown fox jumps over the lazy dog");
    let fit = f.fit(400.0, 400.0);
    assert!(f.layouts()[fit.layout].lines() > 1);
}

// =============================================================
// Placement
// =============================================================

#[test]
fn place_centers_single_line() {
    let m = FixedAdvance::new(0.5);
    let f = TextFlow::new("ab", &m, 100.0, PREFER);
    let lines = f.place(Rect::new(0.0, 0.0, 200.0, 100.0), Align::CENTER);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "ab");
    assert!((lines[0].scale - 1.0).abs() < EPSILON);
    assert!((lines[0].origin.x - 50.0).abs() < EPSILON);
    assert!((lines[0].origin.y - 100.0).abs() < EPSILON);
}

#[test]
fn place_start_and_end_justification() {
    let m = FixedAdvance::new(0.5);
    let f = TextFlow::new("ab", &m, 100.0, PREFER);
    let area = Rect::new(10.0, 0.0, 210.0, 100.0);

    let start = f.place(area, Align::new(Justify::Start, Justify::Start));
    assert!((start[0].origin.x - 10.0).abs() < EPSILON);

    let end = f.place(area, Align::new(Justify::End, Justify::End));
    let right = end[0].origin.x + end[0].scale * 100.0;
    assert!((right - 210.0).abs() < EPSILON);
}

#[test]
fn place_stacks_lines_one_line_height_apart() {
    let f = flow("aaaa bbbb");
    let lines = f.place(Rect::new(0.0, 0.0, 300.0, 300.0), Align::CENTER);
    assert_eq!(lines.len(), 2);
    let gap = lines[1].origin.y - lines[0].origin.y;
    assert!((gap - FONT * lines[0].scale).abs() < EPSILON);
}

#[test]
fn place_lifts_baseline_by_descent() {
    let plain = TextFlow::new("ab", &FixedAdvance::new(0.5), 100.0, PREFER);
    let descending = TextFlow::new("ab", &FixedAdvance::new(0.5).with_descent(0.2), 100.0, PREFER);
    let area = Rect::new(0.0, 0.0, 200.0, 100.0);
    let a = plain.place(area, Align::CENTER);
    let b = descending.place(area, Align::CENTER);
    assert!((a[0].origin.y - b[0].origin.y - 20.0).abs() < EPSILON);
}

#[test]
fn place_in_degenerate_area_draws_nothing() {
    let f = flow("hello");
    assert!(f.place(Rect::new(0.0, 0.0, 0.0, 0.0), Align::CENTER).is_empty());
}
