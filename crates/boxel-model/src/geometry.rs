//! Whole-model geometry: bones plus the atlas size, JSON I/O and the bone index.

use std::collections::HashMap;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::bone::Bone;
use crate::density::DensityTier;
use crate::error::{DegenerateCube, ModelError};

/// Atlas side used for models that have never been packed.
pub const DEFAULT_TEXTURE_SIZE: u32 = 64;

fn default_texture_size() -> UVec2 {
    UVec2::splat(DEFAULT_TEXTURE_SIZE)
}

// ---------------------------------------------------------------------------
// ModelGeometry
// ---------------------------------------------------------------------------

/// Ordered bones plus the atlas their cube UVs refer to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelGeometry {
    /// Bones in authoring order. Parents need not precede children.
    pub bones: Vec<Bone>,
    /// Atlas `[width, height]` in pixels. Equal to the last pack or rescale output.
    #[serde(default = "default_texture_size")]
    pub texture_size: UVec2,
    /// Texel density the UV footprints were laid out at. Set by packing.
    #[serde(default)]
    pub pixel_density: DensityTier,
}

impl Default for ModelGeometry {
    fn default() -> Self {
        Self {
            bones: Vec::new(),
            texture_size: default_texture_size(),
            pixel_density: DensityTier::default(),
        }
    }
}

impl ModelGeometry {
    /// Creates a model from bones with the default atlas size.
    pub fn new(bones: Vec<Bone>) -> Self {
        Self {
            bones,
            texture_size: default_texture_size(),
            pixel_density: DensityTier::default(),
        }
    }

    /// Parses model JSON and validates its structure.
    ///
    /// # Errors
    ///
    /// [`ModelError::Json`] for malformed input or missing required fields,
    /// and any structural error reported by [`ModelGeometry::index`].
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: ModelGeometry = serde_json::from_str(json)?;
        model.index()?;
        Ok(model)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the name index, checking names, parent references and acyclicity.
    pub fn index(&self) -> Result<BoneIndex, ModelError> {
        BoneIndex::build(&self.bones)
    }

    /// Looks up a bone by name with a linear scan.
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    /// Total number of cubes across all bones.
    pub fn cube_count(&self) -> usize {
        self.bones.iter().map(|b| b.cubes.len()).sum()
    }

    /// Lists every cube whose size is not strictly positive or exceeds
    /// [`MAX_CUBE_EXTENT`](crate::MAX_CUBE_EXTENT).
    pub fn degenerate_cubes(&self) -> Vec<DegenerateCube> {
        self.bones
            .iter()
            .flat_map(|bone| {
                bone.cubes
                    .iter()
                    .enumerate()
                    .filter(|(_, cube)| cube.is_degenerate())
                    .map(|(i, cube)| DegenerateCube {
                        bone: bone.name.clone(),
                        cube: i,
                        size: cube.size,
                    })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// BoneIndex
// ---------------------------------------------------------------------------

/// Name → bone lookup plus a parent-before-child traversal order.
///
/// Built once per operation from the name-based parent references; it holds
/// indices into the bone slice it was built from, never references.
#[derive(Clone, Debug)]
pub struct BoneIndex {
    by_name: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    order: Vec<usize>,
}

impl BoneIndex {
    /// Indexes `bones`.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateBone`], [`ModelError::MissingParent`] or
    /// [`ModelError::CyclicParent`].
    pub fn build(bones: &[Bone]) -> Result<Self, ModelError> {
        let mut by_name = HashMap::with_capacity(bones.len());
        for (i, bone) in bones.iter().enumerate() {
            if by_name.insert(bone.name.clone(), i).is_some() {
                return Err(ModelError::DuplicateBone(bone.name.clone()));
            }
        }

        let mut parents = Vec::with_capacity(bones.len());
        let mut children = vec![Vec::new(); bones.len()];
        let mut roots = Vec::new();
        for (i, bone) in bones.iter().enumerate() {
            match &bone.parent {
                None => {
                    parents.push(None);
                    roots.push(i);
                }
                Some(parent) => {
                    let Some(&p) = by_name.get(parent) else {
                        return Err(ModelError::MissingParent {
                            bone: bone.name.clone(),
                            parent: parent.clone(),
                        });
                    };
                    parents.push(Some(p));
                    children[p].push(i);
                }
            }
        }

        // Pre-order walk from the roots. Anything unreached hangs off a cycle.
        let mut order = Vec::with_capacity(bones.len());
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(children[i].iter().rev().copied());
        }

        if order.len() != bones.len() {
            let mut visited = vec![false; bones.len()];
            for &i in &order {
                visited[i] = true;
            }
            let start = visited.iter().position(|v| !v).unwrap_or(0);
            // Walk up until a bone repeats; that bone is on the cycle.
            let mut seen = vec![false; bones.len()];
            let mut cur = start;
            while !seen[cur] {
                seen[cur] = true;
                match parents[cur] {
                    Some(p) => cur = p,
                    None => break,
                }
            }
            return Err(ModelError::CyclicParent {
                bone: bones[cur].name.clone(),
            });
        }

        Ok(Self {
            by_name,
            parents,
            children,
            roots,
            order,
        })
    }

    /// Index of the bone with this name.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Index of the parent of bone `i`.
    pub fn parent(&self, i: usize) -> Option<usize> {
        self.parents[i]
    }

    /// Children of bone `i`, in authoring order.
    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    /// Root bones, in authoring order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Every bone index, parents strictly before their children.
    pub fn parent_first_order(&self) -> &[usize] {
        &self.order
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
