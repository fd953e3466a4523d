use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Instances are grouped by mesh (stable within a mesh, so spawn order is kept)
/// and each group becomes one batch.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    let mut visible: Vec<(u32, RenderInstance)> = entities
        .filter(|entity| entity.active)
        .filter_map(|entity| {
            let visual = entity.visual.as_ref()?;
            Some((
                visual.mesh.0,
                RenderInstance {
                    x: entity.pos.x,
                    y: entity.pos.y,
                    z: entity.pos.z,
                    heading: entity.heading,
                    scale: entity.scale,
                    mesh: visual.mesh.0 as f32,
                    variant: visual.variant as f32,
                    param: visual.param,
                },
            ))
        })
        .collect();

    visible.sort_by_key(|(mesh, _)| *mesh);

    for (_, instance) in visible {
        buffer.push(instance);
    }
}
