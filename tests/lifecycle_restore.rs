
use std::cell::RefCell;
use std::rc::Rc;

use host_fixture::TestHost;
use sift_view::{
    ControllerState, CursorPos, DisplaySurfaceController, Host, LifecycleHooks, Placement,
    SharedHost, SplitPlacement, StatusRegistry, ViewConfig, ViewState,
};

fn controller(
    category: &str,
    host: SharedHost,
    config: ViewConfig,
) -> DisplaySurfaceController {
    let status = Rc::new(RefCell::new(StatusRegistry::new()));
    DisplaySurfaceController::new(category, host, status, config, LifecycleHooks::default())
}

#[test]
fn split_enter_exit_restores_windows_views_and_focus() {
    let mut fixture = TestHost::new(80, 24);
    let tab = fixture.first_tab();
    let second = fixture.add_layout_window(tab, "other", 10);
    fixture.set_view(
        second,
        ViewState {
            cursor: CursorPos { row: 7, col: 1 },
            top_line: 4,
        },
    );
    let (host, shared) = fixture.shared();

    let before_windows = host.borrow().layout_window_ids();
    let before_views: Vec<ViewState> = before_windows
        .iter()
        .map(|window| host.borrow().view(*window))
        .collect();
    let before_heights: Vec<usize> = before_windows
        .iter()
        .map(|window| host.borrow().window(*window).height)
        .collect();
    let origin = host.borrow().focused();

    let mut view = controller("lifecycle-split", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));
    assert!(view.is_open());
    assert_eq!(host.borrow().layout_window_ids().len(), 3);
    assert_eq!(
        host.borrow().focused(),
        view.surface().expect("surface").window()
    );

    view.exit();
    assert_eq!(view.state(), ControllerState::Closed);
    assert_eq!(host.borrow().layout_window_ids(), before_windows);
    for (window, view_state) in before_windows.iter().zip(&before_views) {
        assert_eq!(host.borrow().view(*window), *view_state);
    }
    for (window, height) in before_windows.iter().zip(&before_heights) {
        assert_eq!(host.borrow().window(*window).height, *height);
    }
    assert_eq!(host.borrow().focused(), origin);
    assert_eq!(host.borrow().applied_layouts.len(), 1);
    assert!(host.borrow().suppression_is_balanced());
    assert!(!host.borrow().events_suppressed);
}

#[test]
fn external_resize_discards_saved_layout() {
    let (host, shared) = TestHost::new(80, 24).shared();
    let origin = host.borrow().focused();
    let origin_height = host.borrow().window(origin).height;

    let mut view = controller("lifecycle-resize", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));
    host.borrow_mut().resize();
    view.exit();

    assert!(host.borrow().applied_layouts.is_empty());
    assert_ne!(host.borrow().window(origin).height, origin_height);
    assert_eq!(host.borrow().focused(), origin);
}

#[test]
fn full_screen_round_trip_restores_tabline_and_tab() {
    let (host, shared) = TestHost::new(80, 24).shared();
    let origin_tab = host.borrow().first_tab();

    let mut view = controller("lifecycle-tab", shared, ViewConfig::default());
    view.enter(Placement::FullScreen);
    assert!(!host.borrow().tabline);
    assert_eq!(Host::tab_count(&*host.borrow()), 2);

    view.exit();
    assert!(host.borrow().tabline);
    assert_eq!(Host::tab_count(&*host.borrow()), 1);
    assert_eq!(Host::current_tab(&*host.borrow()), origin_tab);
    assert_eq!(host.borrow().forced_blank, 0);
}

#[test]
fn full_screen_close_failure_falls_back_to_blank_window() {
    let (host, shared) = TestHost::new(80, 24).shared();

    let mut view = controller("lifecycle-tab-fallback", shared, ViewConfig::default());
    view.enter(Placement::FullScreen);
    host.borrow_mut().refuse_close_tab = true;
    view.exit();

    assert_eq!(host.borrow().forced_blank, 1);
    assert_eq!(view.state(), ControllerState::Closed);
}

#[test]
fn hooks_fire_in_lifecycle_order() {
    let (_host, shared) = TestHost::new(80, 24).shared();
    let trace: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let hook = |label: &'static str, trace: &Rc<RefCell<Vec<&'static str>>>| {
        let trace = Rc::clone(trace);
        Some(Box::new(move || trace.borrow_mut().push(label)) as Box<dyn FnMut()>)
    };
    let hooks = LifecycleHooks {
        before_enter: hook("before_enter", &trace),
        after_enter: hook("after_enter", &trace),
        before_exit: hook("before_exit", &trace),
        after_exit: hook("after_exit", &trace),
    };
    let status = Rc::new(RefCell::new(StatusRegistry::new()));
    let mut view = DisplaySurfaceController::new(
        "lifecycle-hooks",
        shared,
        status,
        ViewConfig::default(),
        hooks,
    );

    view.enter(Placement::Split(SplitPlacement::Bottom));
    view.exit();
    assert_eq!(
        *trace.borrow(),
        ["before_enter", "after_enter", "before_exit", "after_exit"]
    );
}

#[test]
fn split_reenter_reuses_the_live_surface() {
    let (host, shared) = TestHost::new(80, 24).shared();

    let mut view = controller("lifecycle-reuse", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));
    let windows_after_first = host.borrow().layout_window_ids();
    let surface_window = view.surface().expect("surface").window();

    view.enter(Placement::Split(SplitPlacement::Bottom));
    assert_eq!(host.borrow().layout_window_ids(), windows_after_first);
    assert_eq!(host.borrow().focused(), surface_window);
}

#[test]
fn last_window_exit_deletes_the_buffer() {
    let (host, shared) = TestHost::new(80, 24).shared();
    let origin = host.borrow().focused();

    let mut view = controller("lifecycle-last", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));
    // The origin window disappears out-of-band, leaving only the results
    // window in the layout.
    Host::hide_window(&mut *host.borrow_mut(), origin);
    view.exit();

    assert!(!view.buffer().borrow().valid());
    assert_eq!(view.state(), ControllerState::Closed);

    // Re-entering recreates a fresh, valid buffer.
    view.enter(Placement::Split(SplitPlacement::Bottom));
    assert!(view.buffer().borrow().valid());
    assert_eq!(view.buffer().borrow().len(), 0);
}

#[test]
fn mutated_other_window_view_survives_because_exit_resnapshots() {
    let mut fixture = TestHost::new(80, 24);
    let tab = fixture.first_tab();
    let second = fixture.add_layout_window(tab, "other", 10);
    let (host, shared) = fixture.shared();

    let mut view = controller("lifecycle-user-scroll", shared, ViewConfig::default());
    view.enter(Placement::Split(SplitPlacement::Bottom));

    // The user scrolls another window while the results view is open; exit
    // must not clobber that with the stale enter-time snapshot.
    let scrolled = ViewState {
        cursor: CursorPos { row: 42, col: 0 },
        top_line: 40,
    };
    host.borrow_mut().set_view(second, scrolled);
    view.exit();

    assert_eq!(host.borrow().view(second), scrolled);
}
