use sceneview_core::Geometry;
use wgpu::util::DeviceExt;

/// Interleaved vertex uploaded for every surface.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Local-space position.
    pub position: [f32; 3],
    /// Local-space normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout matching `VertexInput` in the surface shader.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave positions and normals for upload.
pub fn vertices_from_geometry(geometry: &Geometry) -> Vec<MeshVertex> {
    geometry
        .positions()
        .iter()
        .zip(geometry.normals())
        .map(|(position, normal)| MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
        })
        .collect()
}

/// Triangle indices that reference existing vertices only.
pub fn valid_triangle_indices(geometry: &Geometry) -> Vec<u32> {
    let count = geometry.positions().len() as u32;
    geometry
        .indices()
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| i < count))
        .flatten()
        .copied()
        .collect()
}

/// GPU-side copy of a [`Geometry`], shared by every surface that uses it.
pub struct GpuMesh {
    /// Vertex buffer on GPU.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle list index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of triangle indices to draw.
    pub index_count: u32,
    /// Line list index buffer for wireframe drawing.
    pub edge_buffer: wgpu::Buffer,
    /// Number of edge indices to draw.
    pub edge_count: u32,
}

impl GpuMesh {
    /// Upload a geometry to the GPU.
    pub fn upload(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = vertices_from_geometry(geometry);
        let indices = valid_triangle_indices(geometry);
        let count = vertices.len() as u32;
        let edges: Vec<u32> = geometry
            .edge_indices()
            .chunks_exact(2)
            .filter(|pair| pair.iter().all(|&i| i < count))
            .flatten()
            .copied()
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Edge Buffer"),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        tracing::trace!(
            vertices = vertices.len(),
            triangles = indices.len() / 3,
            "uploaded surface mesh"
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            edge_buffer,
            edge_count: edges.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn vertex_layout_is_six_floats() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
        assert_eq!(MeshVertex::layout().array_stride, 24);
    }

    #[test]
    fn interleaves_positions_and_normals() {
        let geometry = sceneview_testkit::quad_geometry(2.0);
        let vertices = vertices_from_geometry(&geometry);

        assert_eq!(vertices.len(), geometry.positions().len());
        for (vertex, position) in vertices.iter().zip(geometry.positions()) {
            assert_eq!(vertex.position, position.to_array());
        }
    }

    #[test]
    fn drops_triangles_with_out_of_range_indices() {
        let geometry = Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            None,
            vec![0, 1, 2, 0, 1, 7],
        );
        assert_eq!(valid_triangle_indices(&geometry), vec![0, 1, 2]);
    }
}
