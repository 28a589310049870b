use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use wgpu::naga;

use crate::error::{Error, Result};

use super::uniforms::{
    UniformBlock, UniformKind, UniformLocation, UniformMember, UniformSite, UniformTable,
};
use super::{CompiledShader, ShaderStage};

/// A vertex/fragment pair whose interfaces agree, with uniform blocks reflected.
///
/// Immutable once built. GPU objects are created from it by
/// [`GpuProgram`](crate::render::GpuProgram).
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    vertex: CompiledShader,
    fragment: CompiledShader,
    blocks: Vec<UniformBlock>,
    locations: HashMap<String, UniformLocation>,
}

impl LinkedProgram {
    #[inline]
    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    #[inline]
    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }

    /// Uniform blocks ordered by `(group, binding)`.
    #[inline]
    pub fn blocks(&self) -> &[UniformBlock] {
        &self.blocks
    }

    /// Location of a uniform block member, or `None` if the program has no such uniform.
    #[inline]
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.locations.get(name).copied()
    }

    /// Looks up every name; absent names map to `None` rather than failing.
    pub fn resolve_uniforms<'n>(
        &self,
        names: &[&'n str],
    ) -> HashMap<&'n str, Option<UniformLocation>> {
        names
            .iter()
            .map(|name| (*name, self.uniform_location(name)))
            .collect()
    }

    /// Resolves a fixed site enumeration once, checking declared types.
    ///
    /// Missing sites resolve to `None` (and are logged); a site declared with
    /// another type is a link error.
    pub fn resolve_sites<U: UniformSite>(&self) -> Result<UniformTable<U>> {
        let mut slots = vec![None; U::ALL.len()];
        let mut problems = Vec::new();

        for &site in U::ALL {
            let location = self.uniform_location(site.name());
            match location {
                Some(loc) if loc.kind != site.kind() => problems.push(format!(
                    "uniform `{}` is declared as {} but expected {}",
                    site.name(),
                    loc.kind.glsl_name(),
                    site.kind().glsl_name()
                )),
                Some(_) => {}
                None => log::warn!(
                    "uniform `{}` is not declared by the program; uploads to it are ignored",
                    site.name()
                ),
            }
            slots[site.index()] = location;
        }

        if !problems.is_empty() {
            return Err(Error::link(problems.join("\n")));
        }
        Ok(UniformTable::from_slots(slots))
    }
}

/// Links a vertex and a fragment shader.
///
/// Checks, in order:
/// - the stage tags match their slots
/// - every fragment input location is written by the vertex stage
/// - uniform blocks declared by both stages at the same binding agree
/// - uniform blocks live in group 0 and fit their members
pub fn link(vertex: CompiledShader, fragment: CompiledShader) -> Result<LinkedProgram> {
    let mut problems = Vec::new();

    if vertex.stage() != ShaderStage::Vertex {
        problems.push(format!("vertex slot holds a {} shader", vertex.stage()));
    }
    if fragment.stage() != ShaderStage::Fragment {
        problems.push(format!("fragment slot holds a {} shader", fragment.stage()));
    }
    if !problems.is_empty() {
        return Err(Error::link(problems.join("\n")));
    }

    let written = varyings(&vertex, Interface::Outputs);
    for location in varyings(&fragment, Interface::Inputs) {
        if !written.contains(&location) {
            problems.push(format!(
                "fragment input at location {location} is not written by the vertex stage"
            ));
        }
    }

    let blocks = merge_blocks(&vertex, &fragment, &mut problems);

    if !problems.is_empty() {
        return Err(Error::link(problems.join("\n")));
    }

    let locations = index_members(&blocks);
    log::debug!(
        "linked program: {} uniform block(s), {} uniform(s)",
        blocks.len(),
        locations.len()
    );

    Ok(LinkedProgram {
        vertex,
        fragment,
        blocks,
        locations,
    })
}

#[derive(Copy, Clone)]
enum Interface {
    Inputs,
    Outputs,
}

/// User-defined (`layout(location = N)`) varyings of the stage's entry point.
fn varyings(shader: &CompiledShader, side: Interface) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    let Some(entry) = shader.entry_point() else { return out };
    let module = shader.module();

    match side {
        Interface::Inputs => {
            for arg in &entry.function.arguments {
                collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
            }
        }
        Interface::Outputs => {
            if let Some(result) = &entry.function.result {
                collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
            }
        }
    }
    out
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        out.insert(*location);
                    }
                }
            }
        }
    }
}

fn reflect_blocks(shader: &CompiledShader, problems: &mut Vec<String>) -> Vec<UniformBlock> {
    let module = shader.module();
    let mut blocks = Vec::new();

    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let label = var.name.as_deref().unwrap_or("<anonymous>");

        let Some(binding) = &var.binding else {
            problems.push(format!("uniform block `{label}` has no binding"));
            continue;
        };

        let naga::TypeInner::Struct { members, span } = &module.types[var.ty].inner else {
            problems.push(format!("uniform `{label}` is not declared inside a block"));
            continue;
        };

        let members = members
            .iter()
            .filter_map(|m| {
                Some(UniformMember {
                    name: m.name.clone()?,
                    offset: m.offset,
                    kind: UniformKind::from_naga(&module.types[m.ty].inner),
                })
            })
            .collect();

        blocks.push(UniformBlock {
            name: var.name.clone(),
            group: binding.group,
            binding: binding.binding,
            span: *span,
            visibility: shader.stage().visibility(),
            members,
        });
    }

    blocks
}

fn merge_blocks(
    vertex: &CompiledShader,
    fragment: &CompiledShader,
    problems: &mut Vec<String>,
) -> Vec<UniformBlock> {
    let mut merged: BTreeMap<(u32, u32), UniformBlock> = BTreeMap::new();

    for shader in [vertex, fragment] {
        for block in reflect_blocks(shader, problems) {
            match merged.entry((block.group, block.binding)) {
                Entry::Vacant(slot) => {
                    slot.insert(block);
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    if existing.span != block.span || existing.members != block.members {
                        problems.push(format!(
                            "uniform block at group {}, binding {} differs between stages",
                            block.group, block.binding
                        ));
                    } else {
                        existing.visibility |= block.visibility;
                    }
                }
            }
        }
    }

    for block in merged.values() {
        if block.group != 0 {
            problems.push(format!(
                "uniform block at group {}, binding {}: only group 0 is supported",
                block.group, block.binding
            ));
        }
        for member in &block.members {
            let end = member.offset as usize + member.kind.byte_size().unwrap_or(0);
            if end > block.span as usize {
                problems.push(format!(
                    "uniform `{}` ends at byte {end}, past the block span {}",
                    member.name, block.span
                ));
            }
        }
    }

    merged.into_values().collect()
}

fn index_members(blocks: &[UniformBlock]) -> HashMap<String, UniformLocation> {
    let mut locations = HashMap::new();

    for (index, block) in blocks.iter().enumerate() {
        for member in &block.members {
            if locations.contains_key(&member.name) {
                log::warn!(
                    "uniform `{}` is declared in more than one block; using the first",
                    member.name
                );
                continue;
            }
            locations.insert(
                member.name.clone(),
                UniformLocation {
                    block: index,
                    offset: member.offset,
                    kind: member.kind,
                },
            );
        }
    }

    locations
}
