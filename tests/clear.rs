//! Clearing every breakpoint from a buffer.

#[macro_use]
mod prelude;
use prelude::*;
use pybreakpoints::{clear_all, commands::CLEAR_LIMIT};

#[test]
fn clears_breakpoints_of_every_kind() {
    let source = py_source!["import os", "def main():", "    a = 1", "    b = 2", "    return a + b"];
    let classic = Config::default();
    let helper = Config {
        style: Style::Helper,
        ..Config::default()
    };
    let mut buffer = Buffer::new(source.as_str());
    toggle(&mut buffer, Selection::Cursor(2), &classic).unwrap();
    let row = buffer.row_of(buffer.text().find("    return").unwrap());
    toggle(&mut buffer, Selection::Cursor(row), &helper).unwrap();
    let a = buffer.row_of(buffer.text().find("    a = 1").unwrap());
    let outcome = toggle(
        &mut buffer,
        Selection::Lines {
            first: a,
            last: a + 1,
        },
        &classic,
    )
    .unwrap();
    assert!(matches!(outcome, Outcome::Wrapped { .. }));
    assert_eq!(breakpoint_rows(buffer.text()).len(), 3);

    assert_eq!(clear_all(&mut buffer, &classic).unwrap(), 3);
    assert_eq!(buffer.text(), source);
    assert_eq!(buffer.regions().count(), 0);
}

#[test]
fn clear_all_stops_at_limit() {
    let text: String = (0..=CLEAR_LIMIT)
        .map(|i| format!("import pdb; pdb.set_trace()  # breakpoint {i:08x} //\n"))
        .collect();
    let mut buffer = Buffer::new(text);
    assert_eq!(clear_all(&mut buffer, &Config::default()).unwrap(), CLEAR_LIMIT);
    assert_eq!(breakpoint_rows(buffer.text()).len(), 1);
}

#[test]
fn clear_all_on_clean_buffer_is_a_no_op() {
    let source = py_source!["x = 1"];
    let mut buffer = Buffer::new(source.as_str());
    assert_eq!(clear_all(&mut buffer, &Config::default()).unwrap(), 0);
    assert_eq!(buffer.text(), source);
}
