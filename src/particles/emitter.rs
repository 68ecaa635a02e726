//! Particle emitters: emission scheduling, integration, lifecycle.

use std::sync::{Arc, RwLock};

use super::particle::Particle;
use super::renderer::ParticleRenderer;
use super::shape::EmitterShape;
use crate::core::Id;
use crate::math::{consts, Quaternion, RandomSource, Vector3};

/// Gravitational acceleration applied when gravity is enabled.
const GRAVITY: Vector3 = Vector3::new(0.0, -9.8, 0.0);
/// Default linear drag coefficient.
const DRAG: f32 = 0.5;

/// Per-particle lifecycle hook.
pub type ParticleCallback = Box<dyn FnMut(&mut Particle)>;

/// Emitter configuration.
///
/// Owned exclusively by the emitter once constructed. Only `max_emission`
/// changes afterwards, forced to zero by [`Emitter::stop`].
pub struct EmitterParams {
    /// Seconds before a particle is removed.
    pub max_life: f32,
    /// Initial speed of newborn particles.
    pub velocity_magnitude: f32,
    /// Symmetric jitter on the initial speed.
    pub velocity_magnitude_variance: f32,
    /// Directional bias applied to initial velocities.
    pub rotation: Quaternion,
    /// Half-angle in radians of the emission cone.
    pub rotation_angular_variance: f32,
    /// Spin rate hint for the renderer; no physical effect.
    pub spin_speed: f32,
    /// Maximum simultaneous particles.
    pub max_particles: usize,
    /// Lifetime emission quota.
    pub max_emission: u32,
    /// Particles per second.
    pub emission_rate: f32,
    /// Whether gravity acts on particles.
    pub gravity: bool,
    /// Gravity scale factor.
    pub gravity_strength: f32,
    /// Linear velocity damping.
    pub drag_coefficient: f32,
    /// Renderer receiving the per-frame particle snapshot.
    pub renderer: Option<Arc<RwLock<ParticleRenderer>>>,
    /// Initial-position sampler.
    pub shape: EmitterShape,
    /// Invoked for each newborn particle.
    pub on_create: Option<ParticleCallback>,
    /// Invoked for each particle after integration.
    pub on_step: Option<ParticleCallback>,
    /// Invoked when a particle expires or the emitter is disposed.
    pub on_destroy: Option<ParticleCallback>,
}

impl Default for EmitterParams {
    fn default() -> Self {
        Self {
            max_life: 5.0,
            velocity_magnitude: 0.0,
            velocity_magnitude_variance: 0.0,
            rotation: Quaternion::IDENTITY,
            rotation_angular_variance: 0.0,
            spin_speed: 0.0,
            max_particles: 100,
            max_emission: 100,
            emission_rate: 1.0,
            gravity: false,
            gravity_strength: 1.0,
            drag_coefficient: DRAG,
            renderer: None,
            shape: EmitterShape::default(),
            on_create: None,
            on_step: None,
            on_destroy: None,
        }
    }
}

/// Manages a bounded set of live particles.
///
/// States: active (emitting), stopped ([`stop`](Self::stop) zeroed the
/// quota; live particles keep integrating) and dead
/// ([`kill`](Self::kill); terminal). Each [`step`](Self::step) runs
/// emission first, then integration, so particles born this frame also
/// receive this frame's integration.
pub struct Emitter {
    id: Id,
    particles: Vec<Particle>,
    emission_time: f32,
    num_emitted: u32,
    dead: bool,
    params: EmitterParams,
    rng: RandomSource,
}

impl Emitter {
    /// Create an emitter from its configuration and an injected random
    /// source.
    pub fn new(params: EmitterParams, rng: RandomSource) -> Self {
        Self {
            id: Id::new(),
            particles: Vec::new(),
            emission_time: 0.0,
            num_emitted: 0,
            dead: false,
            params,
            rng,
        }
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// The configuration this emitter was built with.
    #[inline]
    pub fn params(&self) -> &EmitterParams {
        &self.params
    }

    /// Currently live particles, in emission order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of currently live particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Total particles emitted over this emitter's lifetime.
    #[inline]
    pub fn emitted_count(&self) -> u32 {
        self.num_emitted
    }

    /// True once [`kill`](Self::kill) has been called.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// True while this emitter can still contribute: not dead, and either
    /// quota remains or particles are still live. The sole signal a
    /// [`ParticleSystem`](super::ParticleSystem) uses to decide disposal.
    pub fn still_active(&self) -> bool {
        if self.dead {
            return false;
        }

        self.num_emitted < self.params.max_emission || !self.particles.is_empty()
    }

    /// Halt future emission; particles already emitted keep integrating.
    pub fn stop(&mut self) {
        self.params.max_emission = 0;
    }

    /// Mark for disposal. No further emission; cleanup happens at the next
    /// disposal check, never mid-step.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Advance the simulation by `dt` seconds and republish the renderer
    /// buffers using `total_time`.
    pub fn step(&mut self, dt: f32, total_time: f32) {
        self.update_emission(dt);
        self.update_particles(dt);

        if let Some(renderer) = &self.params.renderer {
            if let Ok(mut renderer) = renderer.write() {
                renderer.update_from_particles(&self.particles, &self.params, total_time);
            }
        }
    }

    /// Destroy all held particles (expired or not), clear the collection
    /// and release the attached renderer. Calling twice is safe; the
    /// second call finds nothing to destroy.
    pub fn dispose(&mut self) {
        if !self.particles.is_empty() {
            log::debug!(
                "emitter {} disposed with {} live particles",
                self.id,
                self.particles.len()
            );
        }

        if let Some(on_destroy) = self.params.on_destroy.as_mut() {
            for particle in &mut self.particles {
                on_destroy(particle);
            }
        }
        self.particles.clear();

        if let Some(renderer) = &self.params.renderer {
            if let Ok(mut renderer) = renderer.write() {
                renderer.dispose();
            }
        }
    }

    fn can_create_particle(&self) -> bool {
        if self.dead {
            return false;
        }

        let seconds_per_particle = 1.0 / self.params.emission_rate;

        self.emission_time >= seconds_per_particle
            && self.particles.len() < self.params.max_particles
            && self.num_emitted < self.params.max_emission
    }

    fn emit_particle(&mut self) -> Particle {
        let mut p = self.params.shape.emit(&mut self.rng);

        p.max_life = self.params.max_life;
        p.emitter = Some(self.id);

        // Velocity direction within the emission cone: azimuth over the
        // full circle, polar angle bounded by the configured variance.
        let phi = self.rng.uniform() * consts::TWO_PI;
        let theta = self.rng.uniform() * self.params.rotation_angular_variance;

        let direction = Vector3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );

        let speed = self.params.velocity_magnitude
            + self.rng.signed_unit() * self.params.velocity_magnitude_variance;

        p.velocity = (direction * speed).apply_quaternion(&self.params.rotation);

        if let Some(on_create) = self.params.on_create.as_mut() {
            on_create(&mut p);
        }

        p
    }

    fn update_emission(&mut self, dt: f32) {
        if self.dead {
            return;
        }

        self.emission_time += dt;
        let seconds_per_particle = 1.0 / self.params.emission_rate;

        // A large dt may span several emission intervals; capacity and
        // quota bound the loop.
        while self.can_create_particle() {
            self.emission_time -= seconds_per_particle;
            self.num_emitted += 1;

            let particle = self.emit_particle();
            self.particles.push(particle);
        }
    }

    fn update_particles(&mut self, dt: f32) {
        let params = &mut self.params;

        for particle in &mut self.particles {
            // Semi-implicit Euler: gravity plus linear drag into velocity,
            // then velocity into position.
            let mut force = if params.gravity {
                GRAVITY * params.gravity_strength
            } else {
                Vector3::ZERO
            };
            force += particle.velocity * -params.drag_coefficient;

            particle.velocity += force * dt;
            particle.position += particle.velocity * dt;
            particle.age = (particle.age + dt).min(particle.max_life);

            if let Some(on_step) = params.on_step.as_mut() {
                on_step(particle);
            }

            // Expired particles get their destroy callback here; removal
            // happens in the retain pass below.
            if particle.expired() {
                if let Some(on_destroy) = params.on_destroy.as_mut() {
                    on_destroy(particle);
                }
            }
        }

        self.particles.retain(|p| !p.expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting(counter: &Rc<Cell<u32>>) -> ParticleCallback {
        let counter = Rc::clone(counter);
        Box::new(move |_| counter.set(counter.get() + 1))
    }

    fn emitter(params: EmitterParams) -> Emitter {
        Emitter::new(params, RandomSource::new(7))
    }

    #[test]
    fn test_quota_caps_emission_not_rate() {
        // Rate alone would allow 10 particles this step; the quota caps
        // it at 5.
        let mut e = emitter(EmitterParams {
            emission_rate: 10.0,
            max_emission: 5,
            max_particles: 100,
            ..Default::default()
        });

        e.step(1.0, 1.0);
        assert_eq!(e.emitted_count(), 5);
        assert_eq!(e.particle_count(), 5);
    }

    #[test]
    fn test_capacity_bounds_live_particles() {
        let mut e = emitter(EmitterParams {
            emission_rate: 100.0,
            max_emission: 1000,
            max_particles: 3,
            max_life: 100.0,
            ..Default::default()
        });

        e.step(1.0, 1.0);
        assert_eq!(e.particle_count(), 3);
        assert_eq!(e.emitted_count(), 3);

        // Capacity stays full across further steps while quota remains.
        e.step(1.0, 2.0);
        assert_eq!(e.particle_count(), 3);
    }

    #[test]
    fn test_on_create_fires_exactly_quota_times() {
        let created = Rc::new(Cell::new(0));
        let mut e = emitter(EmitterParams {
            emission_rate: 50.0,
            max_emission: 7,
            max_life: 0.05,
            on_create: Some(counting(&created)),
            ..Default::default()
        });

        for i in 0..100 {
            e.step(0.1, i as f32 * 0.1);
        }
        assert_eq!(created.get(), 7);
        assert!(!e.still_active());
    }

    #[test]
    fn test_age_is_monotone_and_bounded() {
        let mut e = emitter(EmitterParams {
            emission_rate: 10.0,
            max_emission: 1,
            max_life: 0.5,
            ..Default::default()
        });

        e.step(0.2, 0.2);
        let mut last_age = e.particles()[0].age;

        while e.particle_count() > 0 {
            e.step(0.2, 0.0);
            if let Some(p) = e.particles().first() {
                assert!(p.age >= last_age);
                assert!(p.age <= p.max_life);
                last_age = p.age;
            }
        }
    }

    #[test]
    fn test_expired_particles_are_filtered_after_destroy() {
        let destroyed = Rc::new(Cell::new(0));
        let mut e = emitter(EmitterParams {
            emission_rate: 10.0,
            max_emission: 2,
            max_life: 0.3,
            on_destroy: Some(counting(&destroyed)),
            ..Default::default()
        });

        e.step(0.2, 0.2); // both emitted
        assert_eq!(e.particle_count(), 2);

        e.step(0.3, 0.5); // both reach max_life
        assert_eq!(destroyed.get(), 2);
        assert_eq!(e.particle_count(), 0);
        assert!(!e.still_active());
    }

    #[test]
    fn test_newborns_receive_current_frame_integration() {
        let mut e = emitter(EmitterParams {
            emission_rate: 1.0,
            max_emission: 1,
            velocity_magnitude: 2.0,
            ..Default::default()
        });

        e.step(1.0, 1.0);
        let p = &e.particles()[0];
        assert!(p.age > 0.0);
        assert!(p.position.length() > 0.0);
    }

    #[test]
    fn test_gravity_and_drag_integration() {
        let mut e = emitter(EmitterParams {
            emission_rate: 1.0,
            max_emission: 1,
            gravity: true,
            gravity_strength: 1.0,
            drag_coefficient: 0.0,
            ..Default::default()
        });

        e.step(1.0, 1.0);
        let p = &e.particles()[0];
        // One Euler step under gravity from rest: v = -9.8, x = -9.8.
        assert!(p.velocity.approx_eq(&Vector3::new(0.0, -9.8, 0.0), 1e-4));
        assert!(p.position.approx_eq(&Vector3::new(0.0, -9.8, 0.0), 1e-4));
    }

    #[test]
    fn test_drag_damps_velocity() {
        let mut e = emitter(EmitterParams {
            emission_rate: 1.0,
            max_emission: 1,
            velocity_magnitude: 4.0,
            drag_coefficient: 0.5,
            max_life: 100.0,
            ..Default::default()
        });

        e.step(1.0, 1.0);
        let before = e.particles()[0].velocity.length();
        e.step(1.0, 2.0);
        let after = e.particles()[0].velocity.length();
        assert!(after < before);
    }

    #[test]
    fn test_stop_halts_emission_keeps_particles() {
        let mut e = emitter(EmitterParams {
            emission_rate: 10.0,
            max_emission: 100,
            max_life: 10.0,
            ..Default::default()
        });

        e.step(0.5, 0.5);
        let live = e.particle_count();
        assert!(live > 0);

        e.stop();
        e.step(0.5, 1.0);
        assert_eq!(e.emitted_count(), live as u32);
        assert_eq!(e.particle_count(), live);
        // Still active while survivors integrate.
        assert!(e.still_active());
    }

    #[test]
    fn test_kill_is_terminal() {
        let mut e = emitter(EmitterParams {
            emission_rate: 10.0,
            max_emission: 100,
            max_life: 10.0,
            ..Default::default()
        });

        e.step(0.5, 0.5);
        assert!(e.particle_count() > 0);

        e.kill();
        assert!(!e.still_active());

        // A dead emitter never emits again.
        e.step(1.0, 1.5);
        assert_eq!(e.emitted_count(), 5);
    }

    #[test]
    fn test_dispose_destroys_all_held_particles() {
        let destroyed = Rc::new(Cell::new(0));
        let mut e = emitter(EmitterParams {
            emission_rate: 30.0,
            max_emission: 3,
            max_life: 100.0,
            on_destroy: Some(counting(&destroyed)),
            ..Default::default()
        });

        e.step(0.2, 0.2);
        assert_eq!(e.particle_count(), 3);

        e.kill();
        e.dispose();
        assert_eq!(destroyed.get(), 3);
        assert_eq!(e.particle_count(), 0);
    }

    #[test]
    fn test_double_dispose_does_not_reinvoke_destroy() {
        let destroyed = Rc::new(Cell::new(0));
        let mut e = emitter(EmitterParams {
            emission_rate: 30.0,
            max_emission: 3,
            max_life: 100.0,
            on_destroy: Some(counting(&destroyed)),
            ..Default::default()
        });

        e.step(0.2, 0.2);
        e.dispose();
        let after_first = destroyed.get();
        e.dispose();
        assert_eq!(destroyed.get(), after_first);
    }

    #[test]
    fn test_still_active_definition() {
        let mut e = emitter(EmitterParams {
            emission_rate: 10.0,
            max_emission: 2,
            max_life: 0.3,
            ..Default::default()
        });

        // Quota remains.
        assert!(e.still_active());

        e.step(0.2, 0.2); // emits both
        assert_eq!(e.emitted_count(), 2);
        // Quota spent but particles live.
        assert!(e.still_active());

        e.step(0.2, 0.4); // all expire
        assert_eq!(e.particle_count(), 0);
        assert!(!e.still_active());
    }

    #[test]
    fn test_identical_seeds_identical_runs() {
        let run = |seed: u64| {
            let mut e = Emitter::new(
                EmitterParams {
                    emission_rate: 20.0,
                    max_emission: 10,
                    velocity_magnitude: 1.0,
                    velocity_magnitude_variance: 0.5,
                    rotation_angular_variance: 1.0,
                    max_life: 10.0,
                    ..Default::default()
                },
                RandomSource::new(seed),
            );
            e.step(0.5, 0.5);
            e.particles()
                .iter()
                .map(|p| (p.position, p.velocity, p.id))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_particles_carry_emitter_backref() {
        let mut e = emitter(EmitterParams {
            emission_rate: 10.0,
            max_emission: 1,
            ..Default::default()
        });
        e.step(0.5, 0.5);

        let p = &e.particles()[0];
        assert_eq!(p.emitter, Some(e.id()));
        assert_eq!(p.shape, Some(e.params().shape.id()));
    }
}
