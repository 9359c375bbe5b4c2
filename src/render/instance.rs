use bytemuck::{Pod, Zeroable};

use crate::neko::{Pose, RADIUS};

/// Per-instance data uploaded to the GPU each frame.
/// Stride = 20 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct NekoInstance {
    /// Sprite center in physical pixels.
    pub position: [f32; 2],
    /// Half the quad size in physical pixels.
    pub half_size: f32,
    /// Sprite-sheet column/row for the current pose.
    pub cell: [u32; 2],
}

impl NekoInstance {
    /// `scale` converts logical companion units to physical pixels.
    pub fn from_pose(pose: &Pose, scale: f32) -> Self {
        let (col, row) = pose.offset.cell();
        Self {
            position: (pose.position * scale).into(),
            half_size: RADIUS * scale,
            cell: [col, row],
        }
    }
}
