use anyhow::{ensure, Result};
use bytemuck::{Pod, Zeroable};

/// One sprite vertex as packed by the module (7 floats).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub vert: [f32; 2],
    pub inv_tex_sample_dims: [f32; 2],
    pub tex_vert_rb: [f32; 2],
    pub flash_ratio: f32,
}

pub const SPRITE_VERTEX_STRIDE: usize = std::mem::size_of::<SpriteVertex>();

/// Decodes packed vertices from module memory.
///
/// Module memory offsets carry no alignment guarantee, so each vertex is read unaligned.
pub fn decode_sprite_vertices(bytes: &[u8]) -> Result<Vec<SpriteVertex>> {
    ensure!(
        bytes.len() % SPRITE_VERTEX_STRIDE == 0,
        "sprite payload of {} bytes is not a multiple of {SPRITE_VERTEX_STRIDE}",
        bytes.len()
    );
    Ok(bytes
        .chunks_exact(SPRITE_VERTEX_STRIDE)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_seven_floats() {
        assert_eq!(SPRITE_VERTEX_STRIDE, 28);
    }

    #[test]
    fn decodes_unaligned_payload() {
        let v = SpriteVertex {
            vert: [1.0, 2.0],
            inv_tex_sample_dims: [0.5, 0.25],
            tex_vert_rb: [3.0, 4.0],
            flash_ratio: 0.75,
        };
        let mut buf = vec![0u8];
        buf.extend_from_slice(bytemuck::bytes_of(&v));
        buf.extend_from_slice(bytemuck::bytes_of(&v));

        let out = decode_sprite_vertices(&buf[1..]).unwrap();
        assert_eq!(out, vec![v, v]);
    }

    #[test]
    fn partial_vertex_is_rejected() {
        assert!(decode_sprite_vertices(&[0u8; 30]).is_err());
        assert!(decode_sprite_vertices(&[]).unwrap().is_empty());
    }
}
