
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use host_fixture::TestHost;
use sift_view::{
    DisplaySurfaceController, InterruptToken, InvocationFlags, LifecycleHooks, Placement,
    SharedHost, SplitPlacement, StatusRegistry, ViewConfig,
};

fn lines(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn controller(
    category: &str,
    host: SharedHost,
    config: ViewConfig,
) -> (DisplaySurfaceController, Rc<RefCell<StatusRegistry>>) {
    let status = Rc::new(RefCell::new(StatusRegistry::new()));
    let view = DisplaySurfaceController::new(
        category,
        host,
        Rc::clone(&status),
        config,
        LifecycleHooks::default(),
    );
    (view, status)
}

#[test]
fn forward_populate_reaches_the_full_sequence() {
    let (_host, shared) = TestHost::new(80, 24).shared();
    let (mut view, status) = controller("populate-forward", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));

    let completed: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&completed);
    let returned = view.populate(lines(&["a", "b", "c"]), 1, &InterruptToken::new(), |all| {
        *sink.borrow_mut() = all.to_vec();
    });

    assert_eq!(view.buffer().borrow().lines(), ["a", "b", "c"]);
    assert_eq!(returned, lines(&["a", "b", "c"]));
    assert_eq!(*completed.borrow(), lines(&["a", "b", "c"]));
    let fields = status.borrow().fields("populate-forward").cloned().unwrap();
    assert_eq!(fields.total, 3);
    assert_eq!(fields.results_count, 3);
}

#[test]
fn reverse_populate_inverts_and_pins_the_cursor() {
    let (_host, shared) = TestHost::new(80, 24).shared();
    let (mut view, status) = controller("populate-reverse", shared, ViewConfig::default());
    view.set_invocation(InvocationFlags {
        reverse: true,
        ..InvocationFlags::default()
    });
    view.enter(Placement::Split(SplitPlacement::Bottom));

    view.populate(lines(&["a", "b", "c"]), 1, &InterruptToken::new(), |_| {});

    assert_eq!(view.buffer().borrow().lines(), ["c", "b", "a"]);
    let cursor = view.cursor_position().expect("cursor");
    assert_eq!(cursor.row, 2);
    let fields = status.borrow().fields("populate-reverse").cloned().unwrap();
    assert_eq!(fields.line_number, 1);
}

#[test]
fn originating_buffer_line_is_suppressed_from_display_and_count() {
    let mut fixture = TestHost::new(80, 24);
    fixture.buffer_name = Some("foo.txt".to_string());
    let (_host, shared) = fixture.shared();
    let config = ViewConfig {
        ignore_current_buffer_name: true,
        ..ViewConfig::default()
    };
    let (mut view, status) = controller("populate-suppress", shared, config);
    view.enter(Placement::Split(SplitPlacement::Bottom));

    view.populate(
        lines(&["foo.txt", "bar.txt", "baz.txt"]),
        1,
        &InterruptToken::new(),
        |_| {},
    );

    assert_eq!(view.buffer().borrow().lines(), ["bar.txt", "baz.txt"]);
    let fields = status.borrow().fields("populate-suppress").cloned().unwrap();
    assert_eq!(fields.results_count, 2);
    assert_eq!(fields.total, 3);
}

#[test]
fn slow_sources_converge_to_the_same_final_state() {
    let (_host, shared) = TestHost::new(80, 24).shared();
    let (mut view, status) = controller("populate-slow", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));

    let expected: Vec<String> = (0..40).map(|index| format!("line-{index}")).collect();
    let source = expected.clone().into_iter().map(|line| {
        std::thread::sleep(Duration::from_millis(4));
        line
    });
    view.populate(source, 1, &InterruptToken::new(), |_| {});

    assert_eq!(view.buffer().borrow().lines(), expected.as_slice());
    let fields = status.borrow().fields("populate-slow").cloned().unwrap();
    assert_eq!(fields.total, 40);
    assert_eq!(fields.running, ':');
}

#[test]
fn interrupt_stops_consumption_without_error_or_completion() {
    let (_host, shared) = TestHost::new(80, 24).shared();
    let (mut view, _status) = controller("populate-interrupt", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));

    let token = InterruptToken::new();
    let trigger = token.clone();
    let source = (0..100).map(move |index| {
        if index == 5 {
            trigger.trigger();
        }
        format!("l{index}")
    });

    let completed = Rc::new(RefCell::new(false));
    let sink = Rc::clone(&completed);
    let returned = view.populate(source, 1, &token, |_| {
        *sink.borrow_mut() = true;
    });

    assert_eq!(returned.len(), 5);
    assert!(!*completed.borrow());
    assert!(view.buffer().borrow().len() <= 5);
}

#[test]
fn pre_triggered_token_yields_nothing() {
    let (_host, shared) = TestHost::new(80, 24).shared();
    let (mut view, _status) = controller("populate-pretrigger", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));

    let token = InterruptToken::new();
    token.trigger();
    let returned = view.populate(lines(&["a", "b"]), 1, &token, |_| {
        panic!("completion must not run");
    });

    assert!(returned.is_empty());
    assert_eq!(view.buffer().borrow().len(), 0);
}

#[test]
fn unit_divisor_scales_reported_counts() {
    let (_host, shared) = TestHost::new(80, 24).shared();
    let (mut view, status) = controller("populate-unit", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));

    view.populate(
        lines(&["a1", "a2", "b1", "b2", "c1", "c2"]),
        2,
        &InterruptToken::new(),
        |_| {},
    );

    let fields = status.borrow().fields("populate-unit").cloned().unwrap();
    assert_eq!(fields.total, 3);
    assert_eq!(fields.results_count, 3);
    assert_eq!(view.buffer().borrow().len(), 6);
}
