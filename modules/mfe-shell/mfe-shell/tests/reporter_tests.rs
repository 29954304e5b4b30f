//! Status reporter never fails, whatever the surface does.

use std::rc::Rc;

use mfe_shell::StatusReporter;
use mfe_shell::test_support::{RecordingSurface, SurfaceEvent};
use tracing_test::traced_test;

#[test]
fn test_success_marks_present_region() {
    let surface = Rc::new(RecordingSurface::with_regions(["cart-mfe-container"]));
    StatusReporter::new(surface.clone()).show_success("cart-mfe-container");

    assert_eq!(
        surface.events(),
        [SurfaceEvent::Success("cart-mfe-container".to_owned())]
    );
}

#[test]
fn test_absent_region_is_a_no_op() {
    let surface = Rc::new(RecordingSurface::default());
    let reporter = StatusReporter::new(surface.clone());

    reporter.show_success("missing");
    reporter.show_error("missing", "Cart", "Vue", Some(3002));

    assert!(surface.events().is_empty());
}

#[test]
#[traced_test]
fn test_surface_errors_are_logged_not_raised() {
    let surface = Rc::new(RecordingSurface::default().broken("cart-mfe-container"));
    let reporter = StatusReporter::new(surface.clone());

    reporter.show_error("cart-mfe-container", "Cart", "Vue", Some(3002));
    reporter.show_success("cart-mfe-container");

    assert!(surface.events().is_empty());
    assert!(logs_contain("failed to show diagnostic panel"));
    assert!(logs_contain("failed to apply success treatment"));
}

#[test]
fn test_error_panel_describes_remote() {
    let surface = Rc::new(RecordingSurface::with_regions(["products-container"]));
    StatusReporter::new(surface.clone()).show_error(
        "products-container",
        "Products",
        "React",
        None,
    );

    let events = surface.events();
    let [SurfaceEvent::Panel(id, panel)] = events.as_slice() else {
        panic!("expected exactly one panel");
    };
    assert_eq!(id, "products-container");
    assert_eq!(
        panel.description,
        "The Products micro-frontend (React) is currently not responding."
    );
    assert!(panel.port_hint.is_none());
}
