use cgmath::{Deg, InnerSpace, Matrix4, Point3, Vector3, Zero, perspective};

use crate::player::input::InputState;

/// Maps OpenGL's [-1, 1] clip-space z onto wgpu's [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Free-flying camera. No physics: movement happens along the view vector
/// and the world axes.
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub move_speed: f32,
    pub sensitivity: f32,
}

impl Camera {
    pub fn new(position: Point3<f32>, fov: f32) -> Self {
        Camera {
            position,
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            fov,
            move_speed: 16.0,
            sensitivity: 0.1,
        }
    }

    pub fn look_direction(&self) -> Vector3<f32> {
        Vector3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        Vector3::new(-self.yaw.sin(), 0.0, self.yaw.cos()).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.position + self.look_direction();
        Matrix4::look_at_rh(self.position, target, Vector3::unit_y())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.fov), aspect, 0.1, 2000.0)
    }

    /// Mouse-look, in pixels of mouse travel.
    pub fn turn(&mut self, dx: f32, dy: f32) {
        self.yaw += (dx * self.sensitivity).to_radians();
        self.pitch -= (dy * self.sensitivity).to_radians();
        let limit = 89.0f32.to_radians();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    pub fn update(&mut self, input: &InputState, dt: f32) {
        let mut dir = Vector3::zero();
        if input.forward {
            dir += self.look_direction();
        }
        if input.backward {
            dir -= self.look_direction();
        }
        if input.right {
            dir += self.right();
        }
        if input.left {
            dir -= self.right();
        }
        if input.up {
            dir.y += 1.0;
        }
        if input.down {
            dir.y -= 1.0;
        }
        if !dir.is_zero() {
            self.position += dir.normalize() * self.move_speed * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), 45.0);
        camera.turn(0.0, -100_000.0);
        assert!(camera.pitch <= 89.0f32.to_radians() + 1e-5);
        camera.turn(0.0, 100_000.0);
        assert!(camera.pitch >= -89.0f32.to_radians() - 1e-5);
    }

    #[test]
    fn forward_movement_follows_the_view_vector() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), 45.0);
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        camera.update(&input, 1.0);
        let dir = camera.look_direction();
        let moved = Vector3::new(camera.position.x, camera.position.y, camera.position.z);
        assert!((moved.normalize() - dir).magnitude() < 1e-4);
    }
}
