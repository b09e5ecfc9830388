//! End-to-end tab lifecycle tests
//!
//! Drives a wired shell through navigations, tab closes and logins, checking
//! that tab identity, route identity and cached page identity stay in step.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tabshell_core::{
    CacheInvalidation, Claim, ClaimId, EntryState, EventFilter, FilteredSubscriber,
    RouteCatalog, RouteDefinition, RouteKey, RouteReuseStrategy, Shell, ShellConfig, ShellEvent,
    User,
};

/// Page instance; counts destructions across the whole shell
struct Page {
    serial: usize,
    destroyed: Arc<AtomicUsize>,
}

impl Drop for Page {
    fn drop(&mut self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    shell: Shell<Page>,
    destroyed: Arc<AtomicUsize>,
}

const LOG: &str = "/basic-system/log";
const DIRECTORY: &str = "/basic-system/directory";
const VENDOR: &str = "/external-system/vendor-data";
const PAYMENT: &str = "/payment-system/payment-method";

fn claims() -> Vec<Claim> {
    vec![
        Claim::route(1, "BASIC_SYSTEM", "Basic System"),
        Claim::route(11, "BASIC_SYSTEM_LOG", "System Log").with_parent(1),
        Claim::route(12, "BASIC_SYSTEM_DIRECTORY", "System Directory").with_parent(1),
        Claim::route(2, "EXTERNAL_SYSTEM", "External System"),
        Claim::route(21, "EXTERNAL_SYSTEM_VENDOR_DATA", "Vendor Data").with_parent(2),
        Claim::route(3, "PAYMENT_SYSTEM", "Payment System"),
        Claim::route(31, "PAYMENT_SYSTEM_METHOD", "Payment Method").with_parent(3),
    ]
}

fn harness() -> Harness {
    let catalog = RouteCatalog::new(
        vec![
            RouteDefinition::new("basic-system/log", "BASIC_SYSTEM_LOG"),
            RouteDefinition::new("basic-system/directory", "BASIC_SYSTEM_DIRECTORY"),
            RouteDefinition::new("external-system/vendor-data", "EXTERNAL_SYSTEM_VENDOR_DATA"),
            RouteDefinition::new("payment-system/payment-method", "PAYMENT_SYSTEM_METHOD"),
        ],
        '-',
    )
    .unwrap();

    let destroyed = Arc::new(AtomicUsize::new(0));
    let serial = AtomicUsize::new(0);
    let counter = destroyed.clone();
    let shell = Shell::new(
        ShellConfig::default(),
        catalog,
        claims(),
        Box::new(move |_: &RouteDefinition| Page {
            serial: serial.fetch_add(1, Ordering::SeqCst),
            destroyed: counter.clone(),
        }),
    );

    shell.login(
        User::new(2, "manager"),
        [1, 11, 12, 2, 21].into_iter().map(ClaimId).collect(),
    );
    Harness { shell, destroyed }
}

fn on_screen(harness: &Harness) -> usize {
    harness.shell.host().current_instance().unwrap().serial
}

fn tab_ids(harness: &Harness) -> Vec<String> {
    harness.shell.tabs().tabs().into_iter().map(|t| t.id).collect()
}

fn key(path: &str) -> RouteKey {
    RouteKey::from_path(path)
}

#[test]
fn test_navigation_opens_tabs_in_order() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(DIRECTORY);
    h.shell.navigate(VENDOR);

    assert_eq!(
        tab_ids(&h),
        vec!["basic-system-log", "basic-system-directory", "external-system-vendor-data"]
    );
    assert_eq!(h.shell.tabs().active_tab_id(), "external-system-vendor-data");
    assert_eq!(h.shell.tabs().tabs()[1].title, "System Directory");
}

#[test]
fn test_switching_tabs_preserves_page_state() {
    let h = harness();
    h.shell.navigate(LOG);
    let log_page = on_screen(&h);
    h.shell.navigate(DIRECTORY);

    h.shell.tabs().open_tab(h.shell.tabs().tab("basic-system-log").unwrap());
    h.shell.settle();

    assert_eq!(on_screen(&h), log_page);
    assert_eq!(h.shell.tabs().active_tab_id(), "basic-system-log");
    assert_eq!(h.destroyed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_closing_active_tab_then_reopening_builds_fresh_page() {
    let h = harness();
    h.shell.navigate(DIRECTORY);
    h.shell.navigate(LOG);
    let log_page = on_screen(&h);

    // close is requested before the navigation away from the closed route
    h.shell.tabs().close_tab("basic-system-log");
    h.shell.settle();

    assert_eq!(h.shell.host().current_path(), DIRECTORY);
    assert_eq!(h.destroyed.load(Ordering::SeqCst), 1);
    assert!(!h.shell.cache().should_restore(&key(LOG)));
    assert_eq!(h.shell.cache().state(&key(LOG)), EntryState::Fresh);

    h.shell.navigate(LOG);
    assert_ne!(on_screen(&h), log_page);
    assert_eq!(tab_ids(&h), vec!["basic-system-directory", "basic-system-log"]);
}

#[test]
fn test_closing_background_tab_releases_its_cached_page() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(DIRECTORY);
    assert_eq!(h.shell.cache().state(&key(LOG)), EntryState::Cached);

    h.shell.tabs().close_tab("basic-system-log");
    h.shell.settle();

    assert_eq!(h.destroyed.load(Ordering::SeqCst), 1);
    assert_eq!(h.shell.tabs().active_tab_id(), "basic-system-directory");
    assert_eq!(h.shell.host().current_path(), DIRECTORY);
}

#[test]
fn test_close_arriving_after_navigation_away_still_evicts() {
    let h = harness();
    h.shell.navigate(LOG);
    let log_page = on_screen(&h);

    // reversed order: the page is detached and stored first
    h.shell.navigate(DIRECTORY);
    h.shell.cache().request_close(&key(LOG));

    assert!(!h.shell.cache().should_restore(&key(LOG)));
    h.shell.navigate(LOG);
    assert_ne!(on_screen(&h), log_page);
}

#[test]
fn test_pending_eviction_suppresses_one_capture_only() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(DIRECTORY);

    h.shell.tabs().close_tab("basic-system-log");
    assert_eq!(h.shell.cache().state(&key(LOG)), EntryState::PendingEviction);

    assert!(!h.shell.cache().should_capture(&key(LOG), true));
    assert!(h.shell.cache().should_capture(&key(LOG), true));
}

#[test]
fn test_close_other_tabs_scenario() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(VENDOR);
    h.shell.navigate(DIRECTORY);
    h.shell.tabs().set_active_tab("basic-system-directory");

    let mut evictions = FilteredSubscriber::new(
        h.shell.events(),
        EventFilter::new().only_types(vec!["route_evicted", "capture_suppressed"]),
    );

    assert!(h.shell.tabs().close_other_tabs("external-system-vendor-data"));
    h.shell.settle();

    assert_eq!(tab_ids(&h), vec!["external-system-vendor-data"]);
    assert_eq!(h.shell.tabs().active_tab_id(), "external-system-vendor-data");
    assert_eq!(h.shell.host().current_path(), VENDOR);

    // log was cached and is evicted; directory was on screen and is not re-captured
    assert_eq!(
        evictions.drain(),
        vec![
            ShellEvent::RouteEvicted {
                key: "basic-system/log".into()
            },
            ShellEvent::CaptureSuppressed {
                key: "basic-system/directory".into()
            },
        ]
    );
    assert_eq!(h.shell.cache().cached_keys(), vec![key(VENDOR)]);
    assert_eq!(h.destroyed.load(Ordering::SeqCst), 2);
}

#[test]
fn test_close_all_tabs_empties_everything() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(DIRECTORY);
    h.shell.navigate(VENDOR);

    h.shell.tabs().close_all_tabs();
    h.shell.settle();

    assert!(h.shell.tabs().is_empty());
    assert_eq!(h.shell.tabs().active_tab_id(), "");
    assert!(h.shell.cache().is_empty());
    assert_eq!(h.shell.host().current_path(), "/");
    assert_eq!(h.destroyed.load(Ordering::SeqCst), 3);
}

#[test]
fn test_close_all_after_guard_redirect_leaves_no_eviction_mark() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(PAYMENT);
    assert_eq!(h.shell.host().current_path(), "/unauthorized");
    assert_eq!(h.shell.tabs().active_tab_id(), "basic-system-log");

    h.shell.tabs().close_all_tabs();
    h.shell.settle();

    assert!(h.shell.cache().is_empty());
    assert_eq!(h.shell.cache().pending_len(), 0);
    assert_eq!(h.destroyed.load(Ordering::SeqCst), 1);

    // the reopened page is kept when navigated away from
    h.shell.navigate(LOG);
    let log_page = on_screen(&h);
    h.shell.navigate(DIRECTORY);
    assert_eq!(h.shell.cache().state(&key(LOG)), EntryState::Cached);

    h.shell.navigate(LOG);
    assert_eq!(on_screen(&h), log_page);
}

#[test]
fn test_closing_last_tab_returns_home() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.tabs().close_tab("basic-system-log");
    h.shell.settle();

    assert!(h.shell.tabs().is_empty());
    assert_eq!(h.shell.host().current_path(), "/");
    assert!(h.shell.host().current_instance().is_none());
    assert_eq!(h.destroyed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unauthorized_route_never_becomes_a_tab() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(PAYMENT);

    assert_eq!(h.shell.host().current_path(), "/unauthorized");
    assert_eq!(tab_ids(&h), vec!["basic-system-log"]);
}

#[test]
fn test_unknown_route_never_becomes_a_tab() {
    let h = harness();
    h.shell.navigate("/basic-system/nowhere");
    assert!(h.shell.tabs().is_empty());
}

#[test]
fn test_menu_click_opens_tab() {
    let h = harness();
    let menu = h.shell.menu();
    let labels: Vec<_> = menu.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["Basic System", "External System"]);

    let tab = menu[1].children[0].to_tab(h.shell.config().tab_id_joiner).unwrap();
    h.shell.tabs().open_tab(tab);
    h.shell.settle();

    assert_eq!(tab_ids(&h), vec!["external-system-vendor-data"]);
    assert_eq!(h.shell.host().current_path(), VENDOR);
}

#[test]
fn test_grant_replacement_rebuilds_menu() {
    let h = harness();
    h.shell.auth().login(
        User::new(1, "admin"),
        [1, 11, 12, 2, 21, 3, 31].into_iter().map(ClaimId).collect(),
    );
    assert_eq!(h.shell.menu().len(), 3);

    h.shell.navigate(PAYMENT);
    assert_eq!(tab_ids(&h), vec!["payment-system-payment-method"]);
}

#[test]
fn test_logout_resets_session() {
    let h = harness();
    h.shell.navigate(LOG);
    h.shell.navigate(DIRECTORY);

    h.shell.logout();

    assert!(h.shell.tabs().is_empty());
    assert!(h.shell.cache().is_empty());
    assert!(!h.shell.auth().is_authenticated());
    assert_eq!(h.shell.host().current_path(), "/login");
    assert_eq!(h.destroyed.load(Ordering::SeqCst), 2);

    h.shell.navigate(LOG);
    assert!(h.shell.host().current_path().starts_with("/login?returnUrl="));
    assert!(h.shell.tabs().is_empty());
}

#[test]
fn test_routes_differing_only_in_separators_get_their_own_tabs() {
    let config = ShellConfig {
        tab_id_joiner: '_',
        ..ShellConfig::default()
    };
    let catalog = RouteCatalog::new(
        vec![
            RouteDefinition::new("a/b-c", "X"),
            RouteDefinition::new("a-b/c", "Y"),
        ],
        config.tab_id_joiner,
    )
    .unwrap();
    let shell = Shell::new(
        config,
        catalog,
        vec![Claim::route(1, "X", "First"), Claim::route(2, "Y", "Second")],
        Box::new(|route: &RouteDefinition| route.path.clone()),
    );
    shell.login(User::new(1, "admin"), [1, 2].into_iter().map(ClaimId).collect());

    shell.navigate("/a/b-c");
    shell.navigate("/a-b/c");

    let tabs: Vec<_> = shell
        .tabs()
        .tabs()
        .into_iter()
        .map(|t| (t.id, t.route))
        .collect();
    assert_eq!(
        tabs,
        vec![
            ("a_b-c".to_string(), "/a/b-c".to_string()),
            ("a-b_c".to_string(), "/a-b/c".to_string()),
        ]
    );
    assert_eq!(shell.host().current_path(), "/a-b/c");
    assert_eq!(
        shell.host().current_instance().as_deref().map(String::as_str),
        Some("a-b/c")
    );
}
