//! Server-side decoration geometry and hit-testing.
//!
//! Decorations are drawn inside the view's outer box: a border of
//! `border_width` on every side and a titlebar of `titlebar_height` below the
//! top border. The client content fills the rest.

use bitflags::bitflags;

use crate::types::Rect;

use super::View;

bitflags! {
    /// Decoration regions under a point. Corners set two border bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DecoPart: u32 {
        const TOP_BORDER = 1;
        const BOTTOM_BORDER = 2;
        const LEFT_BORDER = 4;
        const RIGHT_BORDER = 8;
        const TITLEBAR = 16;
    }
}

impl DecoPart {
    /// Whether any border bit is set.
    pub fn is_border(&self) -> bool {
        self.intersects(DecoPart::TOP_BORDER | DecoPart::BOTTOM_BORDER | DecoPart::LEFT_BORDER | DecoPart::RIGHT_BORDER)
    }
}

impl View {
    /// Outer box including decorations, in layout coordinates.
    pub fn deco_box(&self) -> Rect {
        self.get_box()
    }

    /// Box of the client content, in layout coordinates.
    pub fn content_box(&self) -> Rect {
        let outer = self.get_box();
        let border = self.border_width();
        let titlebar = self.titlebar_height();
        Rect::new(
            outer.x + border,
            outer.y + border + titlebar,
            (outer.width - 2 * border).max(0),
            (outer.height - 2 * border - titlebar).max(0),
        )
    }

    /// Classifies a point given relative to the view's outer box.
    ///
    /// Undecorated views and points outside the box yield an empty mask.
    pub fn get_deco_part(&self, sx: f64, sy: f64) -> DecoPart {
        if !self.is_decorated() {
            return DecoPart::empty();
        }
        let geometry = self.geometry();
        let width = geometry.width as f64;
        let height = geometry.height as f64;
        let border = self.border_width() as f64;
        let titlebar = self.titlebar_height() as f64;

        if sx < 0.0 || sy < 0.0 || sx >= width || sy >= height {
            return DecoPart::empty();
        }
        if sx >= border && sx < width - border && sy >= border && sy < border + titlebar {
            return DecoPart::TITLEBAR;
        }

        let mut parts = DecoPart::empty();
        if sx < border {
            parts |= DecoPart::LEFT_BORDER;
        } else if sx >= width - border {
            parts |= DecoPart::RIGHT_BORDER;
        }
        if sy < border {
            parts |= DecoPart::TOP_BORDER;
        } else if sy >= height - border {
            parts |= DecoPart::BOTTOM_BORDER;
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecorationConfig;
    use crate::provider::{Configure, ShellGeneration, SurfaceProvider};
    use crate::types::{ProviderId, Size, ViewId, WorkspaceId};
    use crate::view::{ViewBackend, XdgShellSurface};
    use rstest::rstest;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Fixed;

    impl SurfaceProvider for Fixed {
        fn id(&self) -> ProviderId {
            ProviderId(1)
        }
        fn committed_size(&self) -> Size<u32> {
            // Content of a 200x100 decorated box.
            Size::new(192, 80)
        }
        fn send_configure(&self, _configure: &Configure) {}
        fn send_close(&self) {}
        fn terminate_client(&self) {}
    }

    fn decorated_view() -> View {
        let mut view = View::new(
            ViewId::new_v4(),
            WorkspaceId::new_v4(),
            Rc::new(Fixed),
            ViewBackend::XdgShell(XdgShellSurface::new(ShellGeneration::Stable)),
            DecorationConfig {
                border_width: 4,
                titlebar_height: 12,
            },
        );
        view.update_decorated(true);
        view.map();
        view
    }

    #[rstest]
    #[case(100.0, 50.0, DecoPart::empty())]
    #[case(2.0, 50.0, DecoPart::LEFT_BORDER)]
    #[case(198.0, 50.0, DecoPart::RIGHT_BORDER)]
    #[case(100.0, 2.0, DecoPart::TOP_BORDER)]
    #[case(100.0, 98.0, DecoPart::BOTTOM_BORDER)]
    #[case(100.0, 10.0, DecoPart::TITLEBAR)]
    #[case(1.0, 1.0, DecoPart::LEFT_BORDER | DecoPart::TOP_BORDER)]
    #[case(-1.0, 50.0, DecoPart::empty())]
    #[case(200.0, 50.0, DecoPart::empty())]
    fn classifies_points(#[case] sx: f64, #[case] sy: f64, #[case] expected: DecoPart) {
        let view = decorated_view();
        assert_eq!(view.geometry().width, 200);
        assert_eq!(view.geometry().height, 100);
        assert_eq!(view.get_deco_part(sx, sy), expected);
    }

    #[test]
    fn content_box_is_inset() {
        let view = decorated_view();
        assert_eq!(view.deco_box(), Rect::new(0, 0, 200, 100));
        assert_eq!(view.content_box(), Rect::new(4, 16, 192, 80));
    }

    #[test]
    fn undecorated_view_has_no_parts() {
        let mut view = decorated_view();
        view.update_decorated(false);
        assert_eq!(view.get_deco_part(2.0, 50.0), DecoPart::empty());
        assert_eq!(view.content_box(), view.deco_box());
    }
}
