mod common;

use pretty_assertions::assert_eq;

use common::{desktop, full_hd, map, FakeLayer, FakeSurface};
use novade_view_core::desktop::Owner;
use novade_view_core::layer_shell::{Anchor, Layer, LayerState, Margins};
use novade_view_core::provider::SurfaceEvent;
use novade_view_core::types::{Rect, Size};
use novade_view_core::view::ViewGeometry;

#[test]
fn layer_surface_without_output_is_closed() {
    let (mut desktop, _) = desktop();
    let panel = FakeLayer::top_panel(1920, 30);

    assert_eq!(desktop.new_layer_surface(panel.clone()), None);
    assert!(panel.surface.closed.get());
    assert_eq!(desktop.subscription_count(), 0);
}

#[test]
fn panel_is_configured_once_acknowledged() {
    let (mut desktop, _) = desktop();
    full_hd(&mut desktop);
    let panel = FakeLayer::top_panel(1920, 30);
    let layer = desktop.new_layer_surface(panel.clone()).unwrap();

    let configure = panel.surface.last_configure().unwrap();
    assert_eq!(configure.size, Size::new(1920, 30));
    assert_eq!(desktop.layer(layer).unwrap().geometry(), Rect::new(0, 0, 1920, 30));
    assert!(!desktop.layer(layer).unwrap().is_configured());

    desktop.dispatch(
        panel.provider_id(),
        SurfaceEvent::Commit {
            acked_serial: configure.serial,
        },
    );
    assert!(desktop.layer(layer).unwrap().is_configured());

    panel.state.set(LayerState {
        exclusive_zone: 40,
        desired_size: Size::new(1920, 40),
        ..panel.state.get()
    });
    desktop.dispatch(panel.provider_id(), SurfaceEvent::Commit { acked_serial: None });
    let second = panel.surface.last_configure().unwrap();
    assert_eq!(second.size, Size::new(1920, 40));
    assert!(second.serial > configure.serial);
    assert!(desktop.layer(layer).unwrap().is_configured());

    desktop.dispatch(panel.provider_id(), SurfaceEvent::Map);
    assert!(desktop.layer(layer).unwrap().is_mapped());
    desktop.dispatch(panel.provider_id(), SurfaceEvent::Unmap);
    assert!(!desktop.layer(layer).unwrap().is_mapped());
}

#[test]
fn changed_exclusive_zone_refits_maximized_views() {
    let (mut desktop, _) = desktop();
    let output = full_hd(&mut desktop);
    let panel = FakeLayer::top_panel(1920, 30);
    desktop.new_layer_surface(panel.clone()).unwrap();
    let surface = FakeSurface::new(400, 300);
    let view = desktop.new_xwayland_surface(surface.clone());
    map(&mut desktop, &surface);
    desktop.maximize(view, true).unwrap();
    assert_eq!(desktop.view(view).unwrap().geometry(), ViewGeometry::new(0.0, 30.0, 1920, 1050));

    panel.state.set(LayerState {
        exclusive_zone: 50,
        desired_size: Size::new(1920, 50),
        ..panel.state.get()
    });
    desktop.dispatch(panel.provider_id(), SurfaceEvent::Commit { acked_serial: None });

    assert_eq!(desktop.output(output).unwrap().usable_area(), Rect::new(0, 50, 1920, 1030));
    assert_eq!(desktop.view(view).unwrap().geometry(), ViewGeometry::new(0.0, 50.0, 1920, 1030));
    assert_eq!(panel.surface.last_configure().unwrap().size, Size::new(1920, 50));
}

#[test]
fn destroyed_panel_releases_its_zone() {
    let (mut desktop, _) = desktop();
    let output = full_hd(&mut desktop);
    let panel = FakeLayer::top_panel(1920, 30);
    let layer = desktop.new_layer_surface(panel.clone()).unwrap();
    let surface = FakeSurface::new(400, 300);
    let view = desktop.new_xwayland_surface(surface.clone());
    map(&mut desktop, &surface);
    desktop.maximize(view, true).unwrap();

    desktop.dispatch(panel.provider_id(), SurfaceEvent::Destroy);

    assert!(desktop.layer(layer).is_none());
    assert!(desktop.output(output).unwrap().layers().is_empty());
    assert_eq!(desktop.output(output).unwrap().usable_area(), Rect::new(0, 0, 1920, 1080));
    assert_eq!(desktop.view(view).unwrap().geometry(), ViewGeometry::new(0.0, 0.0, 1920, 1080));
    assert!(!desktop.is_subscribed(Owner::Layer(layer)));
}

#[test]
fn popups_follow_their_layer_surface() {
    let (mut desktop, _) = desktop();
    full_hd(&mut desktop);
    let panel = FakeLayer::top_panel(1920, 30);
    let layer = desktop.new_layer_surface(panel.clone()).unwrap();

    let menu = FakeSurface::at(200, 100, 10, 30);
    desktop.dispatch(panel.provider_id(), SurfaceEvent::NewPopup(menu.clone()));
    let submenu = FakeSurface::at(150, 80, 190, 20);
    desktop.dispatch(menu.provider_id(), SurfaceEvent::NewPopup(submenu.clone()));

    assert_eq!(menu.unconstrained.borrow().as_slice(), &[Rect::new(0, 0, 1920, 1080)]);
    assert_eq!(submenu.unconstrained.borrow().as_slice(), &[Rect::new(-10, -30, 1920, 1080)]);

    let outer = desktop.layer(layer).unwrap().popups()[0];
    let inner = desktop.layer_popup(outer).unwrap().children()[0];
    assert_eq!(desktop.layer_popup(inner).unwrap().parent(), Some(outer));

    desktop.dispatch(menu.provider_id(), SurfaceEvent::Map);
    assert!(desktop.layer_popup(outer).unwrap().is_mapped());

    desktop.dispatch(panel.provider_id(), SurfaceEvent::Destroy);

    assert!(desktop.layer_popup(outer).is_none());
    assert!(desktop.layer_popup(inner).is_none());
    assert!(!desktop.is_subscribed(Owner::LayerPopup(outer)));
    assert!(!desktop.is_subscribed(Owner::LayerPopup(inner)));
    assert_eq!(desktop.subscription_count(), 0);
}

#[test]
fn removing_output_closes_its_layer_surfaces() {
    let (mut desktop, _) = desktop();
    let output = full_hd(&mut desktop);
    let panel = FakeLayer::top_panel(1920, 30);
    let layer = desktop.new_layer_surface(panel.clone()).unwrap();
    let menu = FakeSurface::new(200, 100);
    desktop.dispatch(panel.provider_id(), SurfaceEvent::NewPopup(menu.clone()));

    desktop.remove_output(output).unwrap();

    assert!(panel.surface.closed.get());
    assert!(desktop.layer(layer).is_none());
    assert!(desktop.output(output).is_none());
    assert_eq!(desktop.subscription_count(), 0);
    assert!(desktop.remove_output(output).is_err());
}

#[test]
fn surface_that_cannot_fit_is_closed() {
    let (mut desktop, _) = desktop();
    let output = full_hd(&mut desktop);
    let squeezed = FakeLayer::new(LayerState {
        anchor: Anchor::LEFT | Anchor::RIGHT | Anchor::TOP,
        margin: Margins {
            top: 0,
            right: 1000,
            bottom: 0,
            left: 1000,
        },
        desired_size: Size::new(0, 40),
        exclusive_zone: 40,
        ..LayerState::new(Layer::Top)
    });

    desktop.new_layer_surface(squeezed.clone()).unwrap();

    assert!(squeezed.surface.closed.get());
    assert_eq!(desktop.output(output).unwrap().usable_area(), Rect::new(0, 0, 1920, 1080));
}

#[test]
fn requested_output_is_honoured() {
    let (mut desktop, _) = desktop();
    full_hd(&mut desktop);
    let external = desktop.add_output("HDMI-1", Rect::new(1920, 0, 2560, 1440));
    let background = FakeLayer::new(LayerState {
        anchor: Anchor::all(),
        ..LayerState::new(Layer::Background)
    });
    background.output.set(Some(external));

    let layer = desktop.new_layer_surface(background.clone()).unwrap();

    let layer = desktop.layer(layer).unwrap();
    assert_eq!(layer.output(), external);
    assert_eq!(layer.geometry(), Rect::new(0, 0, 2560, 1440));
    assert_eq!(desktop.output(external).unwrap().layers(), &[layer.id()]);
}

#[test]
fn overlay_reservation_applies_before_top() {
    let (mut desktop, _) = desktop();
    let output = full_hd(&mut desktop);
    let top = FakeLayer::top_panel(1920, 30);
    let overlay = FakeLayer::new(LayerState {
        anchor: Anchor::TOP | Anchor::LEFT | Anchor::RIGHT,
        exclusive_zone: 20,
        desired_size: Size::new(0, 20),
        ..LayerState::new(Layer::Overlay)
    });

    let top_layer = desktop.new_layer_surface(top.clone()).unwrap();
    let overlay_layer = desktop.new_layer_surface(overlay.clone()).unwrap();

    assert_eq!(desktop.layer(overlay_layer).unwrap().geometry(), Rect::new(0, 0, 1920, 20));
    assert_eq!(desktop.layer(top_layer).unwrap().geometry(), Rect::new(0, 20, 1920, 30));
    assert_eq!(desktop.output(output).unwrap().usable_area(), Rect::new(0, 50, 1920, 1030));
}
