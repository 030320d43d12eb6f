//! Slope-aware horizontal velocity control.
//!
//! The control axis is re-derived each tick by projecting the input-space
//! right direction onto the plane of the current contact normal, so pushing
//! right on a ramp accelerates along the ramp instead of into it.

use glam::Vec3;

/// Project a direction onto the plane with the given normal and normalize it.
///
/// Returns zero when the direction is parallel to the normal.
pub fn project_direction_on_plane(direction: Vec3, normal: Vec3) -> Vec3 {
    (direction - normal * direction.dot(normal)).normalize_or_zero()
}

/// Move `current` towards `target` by at most `max_delta`, never overshooting.
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Right axis of the input space, flattened against the up axis.
///
/// Falls back to an arbitrary direction orthogonal to `up_axis` when the
/// reference direction is parallel to gravity.
pub fn input_right_axis(input_right: Option<Vec3>, up_axis: Vec3) -> Vec3 {
    let reference = input_right.unwrap_or(Vec3::X);
    let right = project_direction_on_plane(reference, up_axis);
    if right == Vec3::ZERO {
        up_axis.any_orthonormal_vector()
    } else {
        right
    }
}

/// Advance the velocity along the control axis towards the desired speed.
///
/// # Arguments
///
/// * `velocity` - Current velocity (will be modified)
/// * `right_axis` - Input-space right axis, already flattened against up
/// * `contact_normal` - Resolved contact normal of this tick
/// * `desired_x` - Desired speed along the control axis
/// * `acceleration` - Ground or air acceleration
/// * `delta_time` - Tick duration in seconds
///
/// # Returns
///
/// The control axis that was used (zero if it degenerated).
pub fn adjust_velocity(
    velocity: &mut Vec3,
    right_axis: Vec3,
    contact_normal: Vec3,
    desired_x: f32,
    acceleration: f32,
    delta_time: f32,
) -> Vec3 {
    let x_axis = project_direction_on_plane(right_axis, contact_normal);
    if x_axis == Vec3::ZERO {
        return x_axis;
    }

    let current_x = velocity.dot(x_axis);
    let max_speed_change = acceleration * delta_time;
    let new_x = move_toward(current_x, desired_x, max_speed_change);

    *velocity += x_axis * (new_x - current_x);
    x_axis
}
