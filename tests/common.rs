// Not every test file will use every function.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use wgpu_profiler::{GpuProfiler, GpuProfilerSettings};
use galaxy_render::config::GalaxyConfig;
use galaxy_render::renderer::wgpu_context::WgpuContext;

// A struct to hold all the common objects for a GPU test.
pub struct TestSetup {
    pub wgpu_context: WgpuContext,
    pub gpu_profiler: GpuProfiler,
}

// Returns None (and says so) on machines without a usable adapter.
pub async fn setup() -> Option<TestSetup> {
    let wgpu_context = match WgpuContext::new_for_test().await {
        Ok(wgpu_context) => wgpu_context,
        Err(e) => {
            eprintln!("skipping GPU test, no adapter: {e}");
            return None;
        }
    };
    let gpu_profiler = GpuProfiler::new(wgpu_context.get_device(), GpuProfilerSettings::default())
        .expect("profiler settings are valid");

    Some(TestSetup { wgpu_context, gpu_profiler })
}

pub fn shader_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders")
}

pub fn test_config(particle_count: u32, star_count: u32) -> GalaxyConfig {
    GalaxyConfig {
        particle_count,
        star_count,
        shader_dir: shader_dir(),
        ..GalaxyConfig::default()
    }
}

/// Copies the shipped shaders into a fresh directory so a test can break them.
pub fn scratch_shader_dir(test_name: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let dir = std::env::temp_dir().join(format!(
        "galaxy-render-{}-{}-{}",
        test_name,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    for entry in std::fs::read_dir(shader_dir()).unwrap() {
        let path = entry.unwrap().path();
        std::fs::copy(&path, dir.join(path.file_name().unwrap())).unwrap();
    }
    dir
}
