//! Static level dressing. Published for drawing only; nothing here collides.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Ground,
    Hill,
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop {
    pub kind: PropKind,
    pub position: Vec3,
    /// Ground: side length. Hill: height. Tree: uniform scale.
    pub size: f32,
}

const fn prop(kind: PropKind, x: f32, z: f32, size: f32) -> Prop {
    Prop {
        kind,
        position: Vec3::new(x, 0.0, z),
        size,
    }
}

pub const GROUND_SIZE: f32 = 100.0;

pub const PROPS: [Prop; 7] = [
    prop(PropKind::Ground, 0.0, 0.0, GROUND_SIZE),
    prop(PropKind::Hill, 15.0, -20.0, 5.0),
    prop(PropKind::Hill, -25.0, -15.0, 8.0),
    prop(PropKind::Hill, 30.0, 10.0, 6.0),
    prop(PropKind::Tree, 10.0, -15.0, 2.0),
    prop(PropKind::Tree, -18.0, 12.0, 1.5),
    prop(PropKind::Tree, 25.0, 20.0, 2.2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_ground_three_hills_three_trees() {
        let count = |kind| PROPS.iter().filter(|p| p.kind == kind).count();
        assert_eq!(count(PropKind::Ground), 1);
        assert_eq!(count(PropKind::Hill), 3);
        assert_eq!(count(PropKind::Tree), 3);
    }

    #[test]
    fn props_sit_on_the_ground_plane() {
        assert!(PROPS.iter().all(|p| p.position.y == 0.0 && p.size > 0.0));
    }
}
