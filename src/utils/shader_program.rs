//! Loading shader text from disk and swapping rebuilt programs in place.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use crate::error::ShaderError;
use crate::renderer::wgpu_context::WgpuContext;

/// WGSL text together with the file it came from.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub text: String,
}

impl ShaderSource {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Self { path, text }),
            Err(source) => Err(ShaderError::Read { path, source }),
        }
    }

    pub fn from_text(label: &str, text: impl Into<String>) -> Self {
        Self { path: PathBuf::from(label), text: text.into() }
    }

    pub fn label(&self) -> String {
        self.path.display().to_string()
    }

    /// The x dimension of the first `@workgroup_size(..)` attribute.
    pub fn declared_workgroup_size(&self) -> Result<u32, ShaderError> {
        const ATTRIBUTE: &str = "@workgroup_size(";
        self.text
            .lines()
            .map(|line| line.split("//").next().unwrap_or(""))
            .find_map(|line| {
                let start = line.find(ATTRIBUTE)? + ATTRIBUTE.len();
                let args = &line[start..];
                let first = args.split([',', ')']).next()?.trim();
                first.trim_end_matches('u').parse::<u32>().ok()
            })
            .filter(|size| *size > 0)
            .ok_or_else(|| ShaderError::MissingWorkgroupSize { label: self.label() })
    }
}

/// Identifier of a successfully built program. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(NonZeroU32);

impl ProgramId {
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for ProgramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Holds the active build of one program.
///
/// A failed rebuild never replaces (or clears) the active program.
#[derive(Debug)]
pub struct ProgramSlot<P> {
    label: String,
    active: Option<(ProgramId, P)>,
    builds: u32,
}

impl<P> ProgramSlot<P> {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), active: None, builds: 0 }
    }

    /// Installs a build result. Failures are logged and returned, and the
    /// previous program stays active.
    pub fn install(&mut self, build: Result<P, ShaderError>) -> Result<ProgramId, ShaderError> {
        match build {
            Ok(program) => {
                self.builds += 1;
                let id = ProgramId(NonZeroU32::new(self.builds).unwrap_or(NonZeroU32::MIN));
                let previous = self.active.replace((id, program)).map(|(previous, _)| previous);
                match previous {
                    Some(previous) => log::info!("Reloaded {}: program {} replaces {}", self.label, id, previous),
                    None => log::info!("Built {}: program {}", self.label, id),
                }
                Ok(id)
            }
            Err(e) => {
                match self.active_id() {
                    Some(id) => log::error!("Rebuilding {} failed, keeping program {}: {}", self.label, id, e),
                    None => log::error!("Building {} failed: {}", self.label, e),
                }
                Err(e)
            }
        }
    }

    pub fn active(&self) -> Option<&P> {
        self.active.as_ref().map(|(_, program)| program)
    }

    pub fn active_id(&self) -> Option<ProgramId> {
        self.active.as_ref().map(|(id, _)| *id)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Runs `build` inside a validation error scope and turns a captured
/// validation error into [`ShaderError::Build`].
pub fn build_checked<T>(
    wgpu_context: &WgpuContext,
    label: &str,
    build: impl FnOnce(&wgpu::Device) -> T,
) -> Result<T, ShaderError> {
    let device = wgpu_context.get_device();
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let built = build(device);
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(built),
        Some(error) => Err(ShaderError::Build { label: label.to_string(), log: error.to_string() }),
    }
}
