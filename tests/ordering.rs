//! Checks the write-then-read ordering of placement against a simulated GPU
//! that only publishes writes at barriers.

use galaxy_render::galaxy::particle::{ComputeParameters, Particle};
use galaxy_render::galaxy::placement::place_slot;
use galaxy_render::galaxy::placement_pass::{place_particles, DispatchPlan, PlacementTarget};

/// Memory model: dispatches write to `pending`; readers only ever see
/// `committed`, which a barrier replaces with `pending`.
struct SimulatedGpu {
    params: ComputeParameters,
    workgroup_size: u32,
    pending: Vec<Particle>,
    committed: Vec<Particle>,
    dispatches: u32,
    barriers: u32,
}

impl SimulatedGpu {
    fn new(params: ComputeParameters, particle_count: usize, workgroup_size: u32) -> Self {
        Self {
            params,
            workgroup_size,
            pending: vec![Particle::default(); particle_count],
            committed: vec![Particle::default(); particle_count],
            dispatches: 0,
            barriers: 0,
        }
    }

    /// What a draw issued now would read.
    fn draw_reads(&self) -> &[Particle] {
        &self.committed
    }
}

impl PlacementTarget for SimulatedGpu {
    fn dispatch(&mut self, workgroups: u32) {
        self.dispatches += 1;
        let len = self.pending.len() as u32;
        // Invocations past the end return early, like the program's bounds check.
        for slot in (0..workgroups * self.workgroup_size).filter(|slot| *slot < len) {
            self.pending[slot as usize] = place_slot(&self.params, slot);
        }
    }

    fn barrier(&mut self) {
        self.barriers += 1;
        self.committed.clone_from(&self.pending);
    }
}

fn expected(params: &ComputeParameters, count: u32) -> Vec<Particle> {
    (0..count).map(|slot| place_slot(params, slot)).collect()
}

#[test]
fn draw_after_placement_sees_every_slot() {
    let params = ComputeParameters::builder().num_stars(800).build().unwrap();
    for (count, workgroup_size) in [(1000, 256), (1024, 256), (1, 256), (1000, 250), (77, 1)] {
        let mut gpu = SimulatedGpu::new(params, count as usize, workgroup_size);
        place_particles(&mut gpu, DispatchPlan { particle_count: count, workgroup_size });

        assert_eq!(gpu.dispatches, 1);
        assert_eq!(gpu.barriers, 1);
        assert_eq!(gpu.draw_reads(), expected(&params, count).as_slice(), "{count} / {workgroup_size}");
    }
}

#[test]
fn without_a_barrier_the_draw_reads_stale_memory() {
    let params = ComputeParameters::builder().num_stars(800).build().unwrap();
    let mut gpu = SimulatedGpu::new(params, 1000, 256);
    gpu.dispatch(DispatchPlan { particle_count: 1000, workgroup_size: 256 }.workgroups());

    assert!(gpu.draw_reads().iter().all(|p| *p == Particle::default()));
}

#[test]
fn reload_replaces_the_whole_buffer() {
    let first = ComputeParameters::builder().num_stars(800).seed(1).build().unwrap();
    let mut gpu = SimulatedGpu::new(first, 1000, 256);
    let plan = DispatchPlan { particle_count: 1000, workgroup_size: 256 };
    place_particles(&mut gpu, plan);

    gpu.params = ComputeParameters::builder().num_stars(800).seed(2).build().unwrap();
    place_particles(&mut gpu, plan);

    assert_eq!(gpu.draw_reads(), expected(&gpu.params, 1000).as_slice());
}

#[test]
fn workgroup_count_rounds_up() {
    assert_eq!(DispatchPlan { particle_count: 100_000, workgroup_size: 256 }.workgroups(), 391);
    assert_eq!(DispatchPlan { particle_count: 1024, workgroup_size: 256 }.workgroups(), 4);
    assert_eq!(DispatchPlan { particle_count: 0, workgroup_size: 256 }.workgroups(), 0);
}
