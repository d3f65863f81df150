//! Satellite components for the Bevy ECS system

use bevy::prelude::*;

use crate::satellite::live::TrackedObjectHandle;

/// Component marker for the tracked ISS entity
#[derive(Component)]
pub struct TrackedIss;

impl TrackedObjectHandle for Transform {
    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    fn set_orientation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_handle_keeps_scale() {
        let mut transform = Transform::from_scale(Vec3::splat(0.002));
        transform.set_position(Vec3::new(1.0, 2.0, 3.0));
        transform.set_orientation(Quat::from_rotation_y(1.0));
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.rotation, Quat::from_rotation_y(1.0));
        assert_eq!(transform.scale, Vec3::splat(0.002));
    }
}
