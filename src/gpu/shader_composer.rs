//! Shader composition via `naga_oil`.

use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::StagehandError;

/// The shaders this crate composes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Writes each object's encoded pick id to the color target.
    PickId,
    /// Writes each fragment's packed view-space depth to the color target.
    PickDepth,
}

impl Shader {
    fn source(self) -> &'static str {
        match self {
            Self::PickId => {
                include_str!("../../assets/shaders/utility/pick_id.wgsl")
            }
            Self::PickDepth => {
                include_str!("../../assets/shaders/utility/pick_depth.wgsl")
            }
        }
    }

    fn file_path(self) -> &'static str {
        match self {
            Self::PickId => "utility/pick_id.wgsl",
            Self::PickDepth => "utility/pick_depth.wgsl",
        }
    }
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import stagehand::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: source plus the path used in error messages.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

impl ShaderComposer {
    /// Build a composer with all shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::Shader`] if a shared module fails to parse,
    /// which indicates a broken embedded asset.
    pub fn new() -> Result<Self, StagehandError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        let modules: &[ModuleDef] = &[ModuleDef {
            source: include_str!("../../assets/shaders/modules/camera.wgsl"),
            file_path: "modules/camera.wgsl",
        }];

        for m in modules {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    StagehandError::Shader(format!(
                        "failed to register shader module '{}': {e}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose one of the crate's shaders into a `wgpu::ShaderModule` ready
    /// for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, StagehandError> {
        let naga_module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.file_path()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader into a `naga::Module` without creating a wgpu shader
    /// module. Useful for testing shader composition without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, StagehandError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                StagehandError::Shader(format!(
                    "failed to compose shader '{}': {e}",
                    shader.file_path()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in [Shader::PickId, Shader::PickDepth] {
            composer.compose_naga(shader).unwrap_or_else(|e| {
                panic!("shader {shader:?} failed to compose: {e}")
            });
        }
    }
}
