//! Point-cloud geometry and material.

use bytemuck::{Pod, Zeroable};

use crate::core::Id;

/// Fixed-capacity point-cloud geometry.
///
/// Two per-point attribute streams: position (3 floats) and point data
/// (2 floats: normalized age fraction, particle id). Staging arrays are
/// repacked every frame; the GPU buffers are flagged for frequent dynamic
/// updates and re-uploaded only when marked dirty. The draw range limits
/// the render pass to the live point count so unused capacity is never
/// drawn.
pub struct PointsGeometry {
    capacity: usize,
    positions: Vec<f32>,
    point_data: Vec<f32>,
    draw_count: usize,
    positions_dirty: bool,
    point_data_dirty: bool,
    gpu: Option<GeometryBuffers>,
}

struct GeometryBuffers {
    positions: wgpu::Buffer,
    point_data: wgpu::Buffer,
}

impl PointsGeometry {
    /// Number of position floats per point.
    pub const POSITION_STRIDE: usize = 3;
    /// Number of point-data floats per point.
    pub const POINT_DATA_STRIDE: usize = 2;

    /// Create geometry for at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            positions: vec![0.0; capacity * Self::POSITION_STRIDE],
            point_data: vec![0.0; capacity * Self::POINT_DATA_STRIDE],
            draw_count: 0,
            positions_dirty: false,
            point_data_dirty: false,
            gpu: None,
        }
    }

    /// Maximum point count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Write one point's attributes into the staging arrays.
    ///
    /// Precondition: `index < capacity`.
    pub fn set_point(&mut self, index: usize, position: [f32; 3], data: [f32; 2]) {
        assert!(
            index < self.capacity,
            "point index {index} exceeds geometry capacity {}",
            self.capacity
        );

        self.positions[index * Self::POSITION_STRIDE..(index + 1) * Self::POSITION_STRIDE]
            .copy_from_slice(&position);
        self.point_data[index * Self::POINT_DATA_STRIDE..(index + 1) * Self::POINT_DATA_STRIDE]
            .copy_from_slice(&data);

        self.positions_dirty = true;
        self.point_data_dirty = true;
    }

    /// Set how many points the render pass draws.
    ///
    /// Precondition: `count <= capacity`.
    pub fn set_draw_range(&mut self, count: usize) {
        assert!(
            count <= self.capacity,
            "draw range {count} exceeds geometry capacity {}",
            self.capacity
        );
        self.draw_count = count;
    }

    /// Number of points the render pass draws.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// The position staging array (`capacity * 3` floats).
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The point-data staging array (`capacity * 2` floats).
    #[inline]
    pub fn point_data(&self) -> &[f32] {
        &self.point_data
    }

    /// True if staging changes have not been uploaded yet.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.positions_dirty || self.point_data_dirty
    }

    /// Allocate the GPU vertex buffers.
    pub fn allocate_gpu(&mut self, device: &wgpu::Device) {
        let positions = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Points Position Buffer"),
            size: (self.positions.len() * std::mem::size_of::<f32>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let point_data = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Points Data Buffer"),
            size: (self.point_data.len() * std::mem::size_of::<f32>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.gpu = Some(GeometryBuffers {
            positions,
            point_data,
        });
        // Force a full first upload.
        self.positions_dirty = true;
        self.point_data_dirty = true;
    }

    /// Upload whichever staging arrays are dirty.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        let Some(gpu) = &self.gpu else {
            return;
        };

        if self.positions_dirty {
            queue.write_buffer(&gpu.positions, 0, bytemuck::cast_slice(&self.positions));
            self.positions_dirty = false;
        }
        if self.point_data_dirty {
            queue.write_buffer(&gpu.point_data, 0, bytemuck::cast_slice(&self.point_data));
            self.point_data_dirty = false;
        }
    }

    /// The GPU position buffer, if allocated.
    #[inline]
    pub fn position_buffer(&self) -> Option<&wgpu::Buffer> {
        self.gpu.as_ref().map(|g| &g.positions)
    }

    /// The GPU point-data buffer, if allocated.
    #[inline]
    pub fn point_data_buffer(&self) -> Option<&wgpu::Buffer> {
        self.gpu.as_ref().map(|g| &g.point_data)
    }
}

/// Uniform values a points shader consumes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PointsUniforms {
    /// Total elapsed time in seconds.
    pub time: f32,
    /// Spin rate in radians per second (visual only).
    pub spin_speed: f32,
    /// Pad to 16 bytes for uniform buffer layout.
    pub _padding: [f32; 2],
}

/// Material for rendered points.
///
/// Owns the named uniform slots (`time`, `spin_speed`) and, once allocated,
/// the uniform buffer carrying them to the shader.
pub struct PointsMaterial {
    uniforms: PointsUniforms,
    dirty: bool,
    buffer: Option<wgpu::Buffer>,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self::new()
    }
}

impl PointsMaterial {
    /// Create a material with zeroed uniforms.
    pub fn new() -> Self {
        Self {
            uniforms: PointsUniforms::default(),
            dirty: false,
            buffer: None,
        }
    }

    /// Current uniform values.
    #[inline]
    pub fn uniforms(&self) -> &PointsUniforms {
        &self.uniforms
    }

    /// Publish the total elapsed time.
    pub fn set_time(&mut self, time: f32) {
        self.uniforms.time = time;
        self.dirty = true;
    }

    /// Publish the spin rate.
    pub fn set_spin_speed(&mut self, spin_speed: f32) {
        self.uniforms.spin_speed = spin_speed;
        self.dirty = true;
    }

    /// Allocate the GPU uniform buffer.
    pub fn allocate_gpu(&mut self, device: &wgpu::Device) {
        use wgpu::util::DeviceExt;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Points Uniform Buffer"),
            contents: bytemuck::cast_slice(&[self.uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        self.buffer = Some(buffer);
        self.dirty = false;
    }

    /// Upload the uniforms if they changed since the last upload.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        let Some(buffer) = &self.buffer else {
            return;
        };
        if self.dirty {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[self.uniforms]));
            self.dirty = false;
        }
    }

    /// The GPU uniform buffer, if allocated.
    #[inline]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }
}

/// A point-cloud drawable: geometry plus material, identified in a group.
pub struct PointsObject {
    id: Id,
    /// The point attribute streams and draw range.
    pub geometry: PointsGeometry,
    /// The uniform slots the shader reads.
    pub material: PointsMaterial,
    /// Visibility flag for the render pass.
    pub visible: bool,
}

impl PointsObject {
    /// Create a drawable from geometry and material.
    pub fn new(geometry: PointsGeometry, material: PointsMaterial) -> Self {
        Self {
            id: Id::new(),
            geometry,
            material,
            visible: true,
        }
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }
}
