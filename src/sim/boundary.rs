//! Viewport boundary handling
//!
//! Applied per body after position integration. An engine uses exactly one mode.

use serde::{Deserialize, Serialize};

use super::body::{Body, Viewport};
use crate::consts::{FLOOR_FRICTION, FLOOR_SPIN_DAMPING};
use crate::wrap_coord;

/// How bodies leaving the viewport are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Leave one edge, reappear at the opposite one
    Wrap,
    /// Clamp inside the walls and bounce with restitution
    Reflect,
}

/// Which walls a reflecting body touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContacts {
    pub left: bool,
    pub right: bool,
    pub floor: bool,
    pub ceiling: bool,
}

impl WallContacts {
    pub fn any(&self) -> bool {
        self.left || self.right || self.floor || self.ceiling
    }
}

impl BoundaryMode {
    /// Resolve one body against the viewport
    pub fn apply(&self, body: &mut Body, viewport: &Viewport, restitution: f32) -> WallContacts {
        match self {
            BoundaryMode::Wrap => {
                wrap(body, viewport);
                WallContacts::default()
            }
            BoundaryMode::Reflect => reflect(body, viewport, restitution),
        }
    }
}

/// Wrap both axes independently into `[0, extent)`
pub fn wrap(body: &mut Body, viewport: &Viewport) {
    body.pos.x = wrap_coord(body.pos.x, viewport.width);
    body.pos.y = wrap_coord(body.pos.y, viewport.height);
}

/// Clamp into `[radius, extent - radius]` and bounce off the touched walls.
///
/// The bounced component always points back into the viewport. Floor contact
/// also damps horizontal and angular velocity (rolling friction).
pub fn reflect(body: &mut Body, viewport: &Viewport, restitution: f32) -> WallContacts {
    let r = body.radius;
    let mut contacts = WallContacts::default();

    if body.pos.x - r < 0.0 {
        body.pos.x = r;
        body.vel.x = body.vel.x.abs() * restitution;
        contacts.left = true;
    }
    if body.pos.x + r > viewport.width {
        body.pos.x = viewport.width - r;
        body.vel.x = -body.vel.x.abs() * restitution;
        contacts.right = true;
    }
    if body.pos.y + r > viewport.height {
        body.pos.y = viewport.height - r;
        body.vel.y = -body.vel.y.abs() * restitution;
        body.vel.x *= FLOOR_FRICTION;
        body.angular_vel *= FLOOR_SPIN_DAMPING;
        contacts.floor = true;
    }
    if body.pos.y - r < 0.0 {
        body.pos.y = r;
        body.vel.y = body.vel.y.abs() * restitution;
        contacts.ceiling = true;
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_wall_bounce() {
        let viewport = Viewport::new(400.0, 300.0);
        let mut body = Body::new(Vec2::new(-1.0, 150.0), Vec2::new(-3.0, 0.0), 5.0);

        let contacts = BoundaryMode::Reflect.apply(&mut body, &viewport, 0.8);

        assert!(contacts.left);
        assert_eq!(body.pos.x, 5.0);
        assert!((body.vel.x - 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_floor_friction() {
        let viewport = Viewport::new(400.0, 300.0);
        let mut body = Body::new(Vec2::new(200.0, 298.0), Vec2::new(2.0, 4.0), 10.0)
            .with_spin(0.0, 0.1);

        let contacts = reflect(&mut body, &viewport, 0.5);

        assert!(contacts.floor);
        assert_eq!(body.pos.y, 290.0);
        assert!((body.vel.y - -2.0).abs() < 1e-6);
        assert!((body.vel.x - 1.96).abs() < 1e-6);
        assert!((body.angular_vel - 0.097).abs() < 1e-6);
    }

    #[test]
    fn test_ceiling_and_side_do_not_damp() {
        let viewport = Viewport::new(400.0, 300.0);
        let mut body = Body::new(Vec2::new(398.0, 2.0), Vec2::new(3.0, -3.0), 10.0)
            .with_spin(0.0, 0.1);

        let contacts = reflect(&mut body, &viewport, 1.0);

        assert!(contacts.right && contacts.ceiling && !contacts.floor);
        assert_eq!(body.vel, Vec2::new(-3.0, 3.0));
        assert_eq!(body.angular_vel, 0.1);
    }

    #[test]
    fn test_inside_untouched() {
        let viewport = Viewport::new(400.0, 300.0);
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::new(1.0, 1.0), 10.0);
        let contacts = reflect(&mut body, &viewport, 0.5);
        assert!(!contacts.any());
        assert_eq!(body.vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_wrap_both_axes() {
        let viewport = Viewport::new(100.0, 50.0);
        let mut body = Body::new(Vec2::new(101.0, -2.0), Vec2::ZERO, 2.0);
        BoundaryMode::Wrap.apply(&mut body, &viewport, 1.0);
        assert!((body.pos.x - 1.0).abs() < 1e-5);
        assert!((body.pos.y - 48.0).abs() < 1e-5);
    }
}
