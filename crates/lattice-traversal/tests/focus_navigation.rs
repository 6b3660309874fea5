//! End-to-end focus navigation over a realistic dialog.

use std::sync::Arc;

use parking_lot::Mutex;

use lattice_traversal::{
    ComponentTree, FocusChange, FocusManager, FocusReason, LayoutTraversalPolicy, NodeId, Point,
    Size, TraversalConfig,
};

/// A settings dialog:
///
/// ```text
/// [username      ] [password      ]
/// [ bold ][ italic ]            (tool bar, own focus cycle)
/// [remember me]
///                    [Cancel] [OK]
/// ```
struct Dialog {
    tree: ComponentTree,
    window: NodeId,
}

impl Dialog {
    fn new() -> Self {
        let mut tree = ComponentTree::new();
        let window = tree.insert_root("dialog");

        // Inserted out of visual order on purpose.
        let buttons = tree.insert_child(window, "buttons").unwrap();
        tree.set_geometry(buttons, Point::new(200, 120), Size::new(200, 30)).unwrap();
        for (name, x) in [("ok", 100), ("cancel", 0)] {
            let id = tree.insert_child(buttons, name).unwrap();
            tree.set_geometry(id, Point::new(x, 0), Size::new(90, 30)).unwrap();
            tree.set_focusable(id, true).unwrap();
        }

        for (name, x, y) in [("password", 200, 2), ("username", 0, 0), ("remember", 0, 80)] {
            let id = tree.insert_child(window, name).unwrap();
            tree.set_geometry(id, Point::new(x, y), Size::new(180, 24)).unwrap();
            tree.set_focusable(id, true).unwrap();
        }

        let toolbar = tree.insert_child(window, "toolbar").unwrap();
        tree.set_geometry(toolbar, Point::new(0, 40), Size::new(400, 30)).unwrap();
        tree.set_focus_cycle_root(toolbar, true).unwrap();
        for (name, x) in [("italic", 40), ("bold", 0)] {
            let id = tree.insert_child(toolbar, name).unwrap();
            tree.set_geometry(id, Point::new(x, 0), Size::new(30, 30)).unwrap();
            tree.set_focusable(id, true).unwrap();
        }

        Self { tree, window }
    }

    fn id(&self, name: &str) -> NodeId {
        self.tree.find_by_name(name).unwrap()
    }

    fn order(&self, policy: &LayoutTraversalPolicy) -> String {
        let order = policy.traversal_order(&self.tree, self.window).unwrap();
        lattice_traversal::logging::format_order(&self.tree, &order).unwrap()
    }
}

fn focused_name(dialog: &Dialog, focus: &FocusManager<NodeId>) -> String {
    dialog.tree.name(focus.focused().unwrap()).unwrap().to_owned()
}

#[test]
fn test_order_follows_layout() {
    let dialog = Dialog::new();
    let policy = LayoutTraversalPolicy::new();
    assert_eq!(
        dialog.order(&policy),
        "username -> password -> toolbar -> remember -> cancel -> ok"
    );
}

#[test]
fn test_right_to_left_config_mirrors_rows() {
    let dialog = Dialog::new();
    let config = TraversalConfig::from_toml_str(
        r#"
        [orientation]
        left_to_right = false
        "#,
    )
    .unwrap();
    let policy = LayoutTraversalPolicy::from_config(config);
    // The button box sorts as one unit; its children are mirrored inside it.
    assert_eq!(
        dialog.order(&policy),
        "password -> username -> toolbar -> remember -> ok -> cancel"
    );
}

#[test]
fn test_tab_walks_into_tool_bar_and_stays() {
    let dialog = Dialog::new();
    let mut focus = FocusManager::new();

    let mut visited = Vec::new();
    for _ in 0..5 {
        assert!(focus.focus_next(&dialog.tree, dialog.window).unwrap());
        visited.push(focused_name(&dialog, &focus));
    }
    assert_eq!(visited, ["username", "password", "bold", "italic", "bold"]);

    assert!(focus.focus_up_cycle(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "remember");

    assert!(focus.focus_next(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "cancel");
    assert!(focus.focus_next(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "ok");
    assert!(focus.focus_next(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "username");
}

#[test]
fn test_backtab_enters_tool_bar_from_the_end() {
    let dialog = Dialog::new();
    let mut focus = FocusManager::new();
    assert!(focus.set_focus(&dialog.tree, dialog.id("remember"), FocusReason::Programmatic));

    assert!(focus.focus_previous(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "italic");
}

#[test]
fn test_no_cycle_stops_at_last_component() {
    let dialog = Dialog::new();
    let config =
        TraversalConfig::from_toml_str("cycle = false\nimplicit_down_cycle = false").unwrap();
    let mut focus = FocusManager::with_policy(LayoutTraversalPolicy::from_config(config));

    assert!(focus.focus_last(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "ok");
    assert!(!focus.focus_next(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "ok");

    // Tool bar is skipped without implicit down-cycle.
    focus.set_focus(&dialog.tree, dialog.id("password"), FocusReason::Programmatic);
    assert!(focus.focus_next(&dialog.tree, dialog.window).unwrap());
    assert_eq!(focused_name(&dialog, &focus), "remember");
}

#[test]
fn test_scoped_listeners_hear_changes_newest_first() {
    let dialog = Dialog::new();
    let mut focus = FocusManager::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let first_log = log.clone();
    focus.focus_changed.connect(move |change: &FocusChange<NodeId>| {
        first_log.lock().push(("first", change.reason));
    });
    {
        let scoped_log = log.clone();
        let _guard = focus.focus_changed.connect_scoped(move |change: &FocusChange<NodeId>| {
            scoped_log.lock().push(("scoped", change.reason));
        });
        focus.focus_changed.emit(FocusChange {
            old: None,
            new: None,
            reason: FocusReason::Other,
        });
    }

    focus.focus_next(&dialog.tree, dialog.window).unwrap();
    assert_eq!(
        *log.lock(),
        vec![
            ("scoped", FocusReason::Other),
            ("first", FocusReason::Other),
            ("first", FocusReason::Tab),
        ]
    );
}
