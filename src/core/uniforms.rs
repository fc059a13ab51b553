use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix4, Point3};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub time: f32,
}

impl Uniforms {
    pub fn new() -> Self {
        Uniforms {
            view_proj: Matrix4::from_scale(1.0f32).into(),
            camera_pos: [0.0; 3],
            time: 0.0,
        }
    }

    pub fn update(&mut self, view_proj: Matrix4<f32>, camera_pos: Point3<f32>, time: f32) {
        self.view_proj = view_proj.into();
        self.camera_pos = camera_pos.into();
        self.time = time;
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::new()
    }
}
