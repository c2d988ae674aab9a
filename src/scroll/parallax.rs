use super::{
    driver::Plane,
    fixed::{Fixed, Position},
};
use crate::{config::ScrollConfig, map::MapStore};

/// Scale `camera` from the reference plane's scrollable range to another
/// plane's, on one axis.  A zero range on either side pins the plane at 0.
#[inline]
pub fn differential(camera: Fixed, extent: i32, ref_extent: i32, visible: i32) -> Fixed {
    let range = (extent - visible) as i64;
    let ref_range = (ref_extent - visible) as i64;
    if range == 0 || ref_range == 0 {
        return Fixed::ZERO;
    }
    Fixed::from_raw((camera.raw() as i64 * range / ref_range) as i32)
}

/// Position of `plane` when the `reference` plane sits at `camera`.
pub fn plane_position<M: MapStore + ?Sized>(
    map: &M,
    plane: usize,
    reference: usize,
    camera: Position,
    cfg: &ScrollConfig,
) -> Position {
    if plane == reference {
        return camera;
    }
    let (w, h) = map.plane_extent(plane);
    let (ref_w, ref_h) = map.plane_extent(reference);
    Position::new(
        differential(camera.x, w, ref_w, cfg.visible_tiles_w()),
        differential(camera.y, h, ref_h, cfg.visible_tiles_h()),
    )
}

/// Set `new_position` of every active plane from the camera.
pub fn compute_plane_positions<M: MapStore + ?Sized>(
    map: &M,
    planes: &mut [Plane],
    reference: usize,
    camera: Position,
    cfg: &ScrollConfig,
) {
    for (i, plane) in planes.iter_mut().enumerate().take(map.plane_count()) {
        plane.new_position = plane_position(map, i, reference, camera, cfg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{DemoLevel, demo_map};

    #[test]
    fn double_range_scrolls_twice_as_far() {
        // reference range 50 tiles, plane range 100 tiles
        for raw in (0..50 * 4096).step_by(0x1234) {
            let cam = Fixed::from_raw(raw);
            assert_eq!(differential(cam, 120, 70, 20).raw(), 2 * raw);
        }
    }

    #[test]
    fn half_range_rounds_towards_zero() {
        assert_eq!(differential(Fixed::from_raw(0x1FF), 45, 70, 20).raw(), 0xFF);
    }

    #[test]
    fn screen_sized_planes_do_not_scroll() {
        let cam = Fixed::from_tiles(12);
        assert_eq!(differential(cam, 20, 70, 20), Fixed::ZERO);
        assert_eq!(differential(cam, 70, 20, 20), Fixed::ZERO, "reference cannot scroll");
    }

    #[test]
    fn reference_plane_takes_the_camera() {
        let map = demo_map(&DemoLevel::default()).unwrap();
        let cfg = ScrollConfig::default();
        let cam = Position::from_tiles(54, 9);

        assert_eq!(plane_position(&map, 2, 2, cam, &cfg), cam);
        // plane 0 is 56x20: ranges 36/108 and 6/18 of the hero's
        assert_eq!(plane_position(&map, 0, 2, cam, &cfg), Position::from_tiles(18, 3));
    }
}
