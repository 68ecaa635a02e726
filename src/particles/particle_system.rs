//! Particle system: owns and orchestrates emitters.

use super::emitter::Emitter;

/// Owns a dynamic set of emitters and drives them each frame.
///
/// An emitter belongs to exactly one system; `add_emitter` transfers
/// ownership. Emitters that stop being active are disposed before they
/// are removed, so terminal cleanup runs exactly once.
#[derive(Default)]
pub struct ParticleSystem {
    emitters: Vec<Emitter>,
}

impl ParticleSystem {
    /// Create an empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an emitter.
    pub fn add_emitter(&mut self, emitter: Emitter) {
        self.emitters.push(emitter);
    }

    /// Number of registered emitters.
    #[inline]
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// The registered emitters.
    #[inline]
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    /// Mutable access to the registered emitters.
    #[inline]
    pub fn emitters_mut(&mut self) -> &mut [Emitter] {
        &mut self.emitters
    }

    /// True while any registered emitter is still active.
    pub fn still_active(&self) -> bool {
        self.emitters.iter().any(|e| e.still_active())
    }

    /// Step every emitter by `dt`, dispose the ones that just became
    /// inactive, then drop them from the set.
    pub fn step(&mut self, dt: f32, total_time: f32) {
        for emitter in &mut self.emitters {
            emitter.step(dt, total_time);

            if !emitter.still_active() {
                emitter.dispose();
            }
        }

        self.emitters.retain(|e| e.still_active());
    }

    /// Dispose every emitter unconditionally. Used for full teardown.
    pub fn dispose(&mut self) {
        for emitter in &mut self.emitters {
            emitter.dispose();
        }
    }
}
