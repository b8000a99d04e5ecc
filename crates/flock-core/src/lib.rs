//! Core types and the frame pipeline for the flocking simulation.
//!
//! The crate owns everything with numerical content: the 2D vector
//! primitive, per-boid state stored as dense columns, tuning resolution,
//! wall physics, the three steering rules, and the cap-and-integrate
//! motion model. Rendering, input widgets, and preference storage are
//! external collaborators that feed [`FrameInput`] and consume
//! [`FrameTelemetry`] plus the position/trail accessors.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f64::consts::TAU;
use thiserror::Error;

pub mod color;

pub use color::{ColorError, Hsl, Rgb};

/// Lower speed bound enforced after every integrated frame; the flock
/// never comes to rest.
pub const MIN_SPEED: f64 = 300.0;
/// Upper speed bound enforced after every integrated frame.
pub const MAX_SPEED: f64 = 400.0;
/// Acceleration cap before the per-frame multiplier is applied.
pub const BASE_MAX_ACCELERATION: f64 = 260.0;
/// Velocity impulse scale for the wall proximity zone.
pub const WALL_REPULSION_FORCE: f64 = 70.0;
/// Width of the boundary zone (world units) in which wall repulsion acts.
pub const WALL_REPULSION_ZONE: f64 = 100.0;
/// Base weight applied to the cohesion rule before user scaling.
pub const BASE_COHESION_WEIGHT: f64 = 0.25;
/// Base weight applied to the alignment rule before user scaling.
pub const BASE_ALIGNMENT_WEIGHT: f64 = 0.75;
/// Base weight applied to the repulsion rule before user scaling.
pub const BASE_REPULSION_WEIGHT: f64 = 2.5;
/// Base factor converting the visibility input into a radius multiplier.
pub const BASE_VISIBILITY_FACTOR: f64 = 0.35;
/// Default number of historical positions retained per boid.
pub const DEFAULT_TRAIL_CAPACITY: usize = 50;

// Over-unity restitution keeps wall bounces lively instead of damped.
// The per-edge asymmetry is deliberate tuning, not an oversight.
const RESTITUTION_RIGHT: f64 = 1.02;
const RESTITUTION_LEFT: f64 = 1.03;
const RESTITUTION_TOP: f64 = 1.03;
const RESTITUTION_BOTTOM: f64 = 1.04;

/// Axis-aligned 2D vector used for positions, velocities, and forces.
///
/// Plain value semantics; all operations are total over finite inputs
/// and NaN/Inf propagate per IEEE-754.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// In-place addition: `self += other`.
    pub fn add(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }

    /// In-place subtraction: `self -= other`.
    pub fn sub(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }

    /// In-place uniform scaling: `self *= factor`.
    pub fn scale(&mut self, factor: f64) {
        self.x *= factor;
        self.y *= factor;
    }

    /// In-place scaled addition: `self += other * scale`.
    pub fn add_scaled(&mut self, other: Self, scale: f64) {
        self.x += other.x * scale;
        self.y += other.y * scale;
    }

    /// In-place scaled subtraction: `self -= other * scale`.
    pub fn sub_scaled(&mut self, other: Self, scale: f64) {
        self.x -= other.x * scale;
        self.y -= other.y * scale;
    }

    /// Component-wise difference `a - b`.
    #[must_use]
    pub fn difference(a: Self, b: Self) -> Self {
        Self::new(a.x - b.x, a.y - b.y)
    }

    /// Component-wise sum `a + b`.
    #[must_use]
    pub fn sum(a: Self, b: Self) -> Self {
        Self::new(a.x + b.x, a.y + b.y)
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(a: Self, b: Self) -> f64 {
        (a.x - b.x).hypot(a.y - b.y)
    }
}

/// High level simulation clock (integrated frames since construction).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Frame(pub u64);

impl Frame {
    /// Returns the next sequential frame.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Resets the frame counter back to zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }
}

/// Bounded FIFO history of a boid's past positions.
///
/// Read only by renderers; the physics never consults it. Oldest entry
/// is evicted once the configured capacity is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    capacity: usize,
    points: VecDeque<Vec2>,
}

impl Trail {
    /// Create an empty trail retaining at most `capacity` positions.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a position, evicting the oldest entry when full.
    pub fn push(&mut self, point: Vec2) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Number of retained positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when no positions have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of retained positions.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest-to-newest.
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    /// Most recently recorded position, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Vec2> {
        self.points.back().copied()
    }
}

/// Errors raised when constructing a flock.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlockError {
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Construction-time configuration for a [`Flock`].
///
/// Everything here is fixed for the lifetime of the population; the
/// per-frame knobs live in [`TuningParams`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlockConfig {
    /// Number of boids to spawn.
    pub count: usize,
    /// Radius of each boid in world units (visual size and collision margin).
    pub radius: f64,
    /// Arena width used for spawn placement.
    pub width: f64,
    /// Arena height used for spawn placement.
    pub height: f64,
    /// Lower bound of the randomized spawn speed.
    pub spawn_speed_min: f64,
    /// Upper bound of the randomized spawn speed.
    pub spawn_speed_max: f64,
    /// Speed floor applied after every integrated frame.
    pub min_speed: f64,
    /// Speed cap applied after every integrated frame.
    pub max_speed: f64,
    /// Acceleration cap before the per-frame multiplier.
    pub base_max_acceleration: f64,
    /// Impulse scale for the wall proximity zone.
    pub wall_repulsion_force: f64,
    /// Positions retained per boid trail.
    pub trail_capacity: usize,
    /// Optional RNG seed for reproducible spawns.
    pub rng_seed: Option<u64>,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            count: 50,
            radius: 4.0,
            width: 800.0,
            height: 600.0,
            spawn_speed_min: 10.0,
            spawn_speed_max: 20.0,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            base_max_acceleration: BASE_MAX_ACCELERATION,
            wall_repulsion_force: WALL_REPULSION_FORCE,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            rng_seed: None,
        }
    }
}

impl FlockConfig {
    /// Validates the configuration before any boid is spawned.
    fn validate(&self) -> Result<(), FlockError> {
        if self.count == 0 {
            return Err(FlockError::InvalidConfig("count must be non-zero"));
        }
        if !(self.radius > 0.0) {
            return Err(FlockError::InvalidConfig("radius must be positive"));
        }
        if !(self.width > 4.0 * self.radius) || !(self.height > 4.0 * self.radius) {
            return Err(FlockError::InvalidConfig(
                "arena must be wider than four boid radii on each axis",
            ));
        }
        if !(self.spawn_speed_min > 0.0) || !(self.spawn_speed_max > self.spawn_speed_min) {
            return Err(FlockError::InvalidConfig(
                "spawn speed range must be positive and non-empty",
            ));
        }
        if !(self.min_speed > 0.0) || !(self.max_speed > self.min_speed) {
            return Err(FlockError::InvalidConfig(
                "speed band must satisfy 0 < min_speed < max_speed",
            ));
        }
        if !(self.base_max_acceleration > 0.0) {
            return Err(FlockError::InvalidConfig(
                "base_max_acceleration must be positive",
            ));
        }
        if self.wall_repulsion_force < 0.0 {
            return Err(FlockError::InvalidConfig(
                "wall_repulsion_force must be non-negative",
            ));
        }
        if self.trail_capacity == 0 {
            return Err(FlockError::InvalidConfig("trail_capacity must be non-zero"));
        }
        Ok(())
    }

    /// Returns the configured RNG, seeding from entropy when no seed is set.
    fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                SmallRng::seed_from_u64(seed)
            }
        }
    }
}

/// The five user-facing scalars supplied once per frame.
///
/// These are raw UI inputs; [`ResolvedTuning`] holds the weights the
/// physics actually consumes after the base factors are applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TuningParams {
    pub cohesion: f64,
    pub alignment: f64,
    pub repulsion: f64,
    pub visibility: f64,
    pub acceleration_multiplier: f64,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            cohesion: 1.0,
            alignment: 1.0,
            repulsion: 1.0,
            visibility: 1.0,
            acceleration_multiplier: 1.0,
        }
    }
}

/// Per-frame weights after base factors are folded in.
///
/// Resolved fresh every frame; nothing here survives across frames, so
/// the multiplier can never compound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResolvedTuning {
    pub cohesion_weight: f64,
    pub alignment_weight: f64,
    pub repulsion_weight: f64,
    pub visibility_radius: f64,
    pub max_acceleration: f64,
}

impl ResolvedTuning {
    /// Fold the base weights and the boid radius into the raw inputs.
    #[must_use]
    pub fn resolve(tuning: &TuningParams, config: &FlockConfig, radius: f64) -> Self {
        Self {
            cohesion_weight: BASE_COHESION_WEIGHT * tuning.cohesion,
            alignment_weight: BASE_ALIGNMENT_WEIGHT * tuning.alignment,
            repulsion_weight: BASE_REPULSION_WEIGHT * tuning.repulsion,
            visibility_radius: 2.0 * (BASE_VISIBILITY_FACTOR * tuning.visibility) * radius,
            max_acceleration: config.base_max_acceleration * tuning.acceleration_multiplier,
        }
    }
}

/// Current arena extent, supplied every frame so resizes take effect
/// immediately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ArenaBounds {
    pub width: f64,
    pub height: f64,
}

impl ArenaBounds {
    /// Construct new bounds.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Render-facing inputs passed through to telemetry.
///
/// The physics never reads these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    /// Base boid color.
    pub color: Rgb,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    /// Whether trails should be drawn.
    pub show_path: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            color: Rgb::new(224, 23, 123),
            opacity: 0.75,
            show_path: false,
        }
    }
}

/// Everything the driver supplies for one tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FrameInput {
    /// Elapsed time in seconds. Non-positive (or NaN) freezes the frame.
    pub dt: f64,
    /// Current arena extent.
    pub bounds: ArenaBounds,
    /// Raw tuning scalars for this frame.
    pub tuning: TuningParams,
    /// Render inputs echoed into telemetry.
    pub display: DisplaySettings,
}

/// Diagnostics record emitted after each step.
///
/// Reports the resolved values for the lead boid; not part of the
/// physics contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameTelemetry {
    pub frame: Frame,
    pub cohesion_weight: f64,
    pub alignment_weight: f64,
    pub repulsion_weight: f64,
    pub visibility_radius: f64,
    pub max_acceleration: f64,
    /// Resolved `rgba(...)` fill color.
    pub color: String,
    pub boid_count: usize,
    /// Occupancy of the lead boid's trail buffer.
    pub trail_len: usize,
}

/// Scalar fields for a single boid, used when snapshotting from the
/// column store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidData {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub radius: f64,
}

/// Dense structure-of-arrays storage for the population.
///
/// Boids are addressed by index; the population is sized once at
/// construction and never grows or shrinks.
#[derive(Debug, Clone, Default)]
pub struct BoidColumns {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    accelerations: Vec<Vec2>,
    radii: Vec<f64>,
}

impl BoidColumns {
    /// Create a collection with reserved capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            accelerations: Vec::with_capacity(capacity),
            radii: Vec::with_capacity(capacity),
        }
    }

    /// Number of boids in the columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if there are no boids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Push a new row onto each column.
    pub fn push(&mut self, boid: BoidData) {
        self.positions.push(boid.position);
        self.velocities.push(boid.velocity);
        self.accelerations.push(boid.acceleration);
        self.radii.push(boid.radius);
        self.debug_assert_coherent();
    }

    /// Return a copy of the scalar fields at `index`.
    #[must_use]
    pub fn snapshot(&self, index: usize) -> BoidData {
        BoidData {
            position: self.positions[index],
            velocity: self.velocities[index],
            acceleration: self.accelerations[index],
            radius: self.radii[index],
        }
    }

    /// Immutable access to the positions slice.
    #[must_use]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Mutable access to the positions slice.
    #[must_use]
    pub fn positions_mut(&mut self) -> &mut [Vec2] {
        &mut self.positions
    }

    /// Immutable access to the velocities slice.
    #[must_use]
    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    /// Mutable access to the velocities slice.
    #[must_use]
    pub fn velocities_mut(&mut self) -> &mut [Vec2] {
        &mut self.velocities
    }

    /// Immutable access to the accelerations slice.
    #[must_use]
    pub fn accelerations(&self) -> &[Vec2] {
        &self.accelerations
    }

    /// Immutable access to the per-boid radii.
    #[must_use]
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    #[inline]
    fn debug_assert_coherent(&self) {
        debug_assert_eq!(self.positions.len(), self.velocities.len());
        debug_assert_eq!(self.positions.len(), self.accelerations.len());
        debug_assert_eq!(self.positions.len(), self.radii.len());
    }
}

/// Result of the parallel compute phase for one boid.
#[derive(Debug, Clone, Copy)]
struct BoidDelta {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
}

/// The population plus the per-frame update pipeline.
///
/// One `step` call advances every boid exactly once. Forces are
/// computed against a frame-start snapshot and applied afterwards, so
/// no boid ever observes a partially updated sibling within a tick.
#[derive(Debug)]
pub struct Flock {
    config: FlockConfig,
    frame: Frame,
    columns: BoidColumns,
    trails: Vec<Trail>,
}

impl Flock {
    /// Spawn a full population from the supplied configuration.
    ///
    /// Positions are uniform inside the arena inset by two radii;
    /// headings are uniform over the circle with speed drawn from the
    /// configured spawn range.
    pub fn new(config: FlockConfig) -> Result<Self, FlockError> {
        config.validate()?;
        let mut rng = config.seeded_rng();
        let mut columns = BoidColumns::with_capacity(config.count);
        let mut trails = Vec::with_capacity(config.count);

        let border = 2.0 * config.radius;
        for _ in 0..config.count {
            let position = Vec2::new(
                rng.random_range(border..config.width - border),
                rng.random_range(border..config.height - border),
            );
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(config.spawn_speed_min..config.spawn_speed_max);
            let velocity = Vec2::new(angle.cos() * speed, angle.sin() * speed);
            columns.push(BoidData {
                position,
                velocity,
                acceleration: Vec2::ZERO,
                radius: config.radius,
            });
            trails.push(Trail::new(config.trail_capacity));
        }

        Ok(Self {
            config,
            frame: Frame::zero(),
            columns,
            trails,
        })
    }

    /// Advance the whole population by one frame.
    ///
    /// A non-positive `dt` is a skipped frame: telemetry is still
    /// resolved and returned but no boid state mutates and the frame
    /// counter stays put.
    pub fn step(&mut self, input: &FrameInput) -> FrameTelemetry {
        if !(input.dt > 0.0) {
            return self.telemetry(input);
        }

        let deltas = self.compute_deltas(input);
        self.apply_deltas(&deltas);
        self.frame = self.frame.next();
        self.telemetry(input)
    }

    /// Parallel compute phase: every boid's forces are derived from the
    /// frame-start snapshot held in the columns.
    fn compute_deltas(&self, input: &FrameInput) -> Vec<BoidDelta> {
        let positions = self.columns.positions();
        let velocities = self.columns.velocities();
        let radii = self.columns.radii();
        let config = &self.config;
        let bounds = input.bounds;
        let dt = input.dt;

        (0..self.columns.len())
            .into_par_iter()
            .map(|idx| {
                let resolved = ResolvedTuning::resolve(&input.tuning, config, radii[idx]);
                let mut position = positions[idx];
                let mut velocity = velocities[idx];
                let radius = radii[idx];

                // Order matters: wall impulses and the hard clamp touch
                // this boid's own state before the neighbor scan reads it.
                let mut acceleration = Vec2::ZERO;
                Self::apply_wall_repulsion(&mut velocity, position, bounds, config);
                Self::apply_wall_collision(&mut position, &mut velocity, radius, bounds);

                Self::accumulate_steering(
                    &mut acceleration,
                    position,
                    velocity,
                    idx,
                    positions,
                    velocities,
                    &resolved,
                );

                cap_magnitude(&mut acceleration, resolved.max_acceleration);
                velocity.add_scaled(acceleration, dt);
                clamp_speed(&mut velocity, config.min_speed, config.max_speed);
                position.add_scaled(velocity, dt);

                BoidDelta {
                    position,
                    velocity,
                    acceleration,
                }
            })
            .collect()
    }

    /// Sequential apply phase: write back columns and record trails.
    fn apply_deltas(&mut self, deltas: &[BoidDelta]) {
        debug_assert_eq!(deltas.len(), self.columns.len());
        for (idx, delta) in deltas.iter().enumerate() {
            self.columns.positions[idx] = delta.position;
            self.columns.velocities[idx] = delta.velocity;
            self.columns.accelerations[idx] = delta.acceleration;
            self.trails[idx].push(delta.position);
        }
    }

    /// Velocity impulse proportional to penetration into the boundary
    /// zone. Applied directly to velocity, outside the acceleration cap.
    fn apply_wall_repulsion(
        velocity: &mut Vec2,
        position: Vec2,
        bounds: ArenaBounds,
        config: &FlockConfig,
    ) {
        let zone = WALL_REPULSION_ZONE;
        let force = config.wall_repulsion_force;

        if position.x < zone {
            let strength = (zone - position.x) / zone;
            velocity.x += strength * force;
        } else if position.x > bounds.width - zone {
            let strength = (position.x - (bounds.width - zone)) / zone;
            velocity.x -= strength * force;
        }

        if position.y < zone {
            let strength = (zone - position.y) / zone;
            velocity.y += strength * force;
        } else if position.y > bounds.height - zone {
            let strength = (position.y - (bounds.height - zone)) / zone;
            velocity.y -= strength * force;
        }
    }

    /// Clamp the radius-inflated circle to the arena and reflect the
    /// crossing velocity component with per-edge restitution.
    fn apply_wall_collision(
        position: &mut Vec2,
        velocity: &mut Vec2,
        radius: f64,
        bounds: ArenaBounds,
    ) {
        if position.x + radius > bounds.width {
            position.x = bounds.width - radius;
            velocity.x *= -RESTITUTION_RIGHT;
        } else if position.x - radius < 0.0 {
            position.x = radius;
            velocity.x *= -RESTITUTION_LEFT;
        }

        if position.y + radius > bounds.height {
            position.y = bounds.height - radius;
            velocity.y *= -RESTITUTION_BOTTOM;
        } else if position.y - radius < 0.0 {
            position.y = radius;
            velocity.y *= -RESTITUTION_TOP;
        }
    }

    /// Brute-force neighbor scan accumulating repulsion, alignment, and
    /// cohesion into `acceleration`.
    ///
    /// Self is excluded by index; visibility uses a strict `<` so a zero
    /// radius sees nobody. A coincident neighbor contributes a finite
    /// but zero-direction repulsion thanks to the `+ 1` denominator.
    fn accumulate_steering(
        acceleration: &mut Vec2,
        position: Vec2,
        velocity: Vec2,
        idx: usize,
        positions: &[Vec2],
        velocities: &[Vec2],
        resolved: &ResolvedTuning,
    ) {
        let mut velocity_sum = Vec2::ZERO;
        let mut position_sum = Vec2::ZERO;
        let mut visible = 0usize;

        for other in 0..positions.len() {
            if other == idx {
                continue;
            }
            let dist = Vec2::distance(position, positions[other]);
            if dist < resolved.visibility_radius {
                let mut away = Vec2::difference(position, positions[other]);
                away.scale(resolved.repulsion_weight / (dist + 1.0));
                acceleration.add(away);

                velocity_sum.add(velocities[other]);
                position_sum.add(positions[other]);
                visible += 1;
            }
        }

        if visible > 0 {
            let inv = 1.0 / visible as f64;
            let mut mean_velocity = velocity_sum;
            mean_velocity.scale(inv);
            acceleration.add_scaled(
                Vec2::difference(mean_velocity, velocity),
                resolved.alignment_weight,
            );

            let mut center_of_mass = position_sum;
            center_of_mass.scale(inv);
            acceleration.add_scaled(
                Vec2::difference(center_of_mass, position),
                resolved.cohesion_weight,
            );
        }
    }

    /// Resolve this frame's diagnostics for the lead boid.
    fn telemetry(&self, input: &FrameInput) -> FrameTelemetry {
        let radius = self.columns.radii().first().copied().unwrap_or(0.0);
        let resolved = ResolvedTuning::resolve(&input.tuning, &self.config, radius);
        FrameTelemetry {
            frame: self.frame,
            cohesion_weight: resolved.cohesion_weight,
            alignment_weight: resolved.alignment_weight,
            repulsion_weight: resolved.repulsion_weight,
            visibility_radius: resolved.visibility_radius,
            max_acceleration: resolved.max_acceleration,
            color: color::rgba_string(input.display.color, input.display.opacity),
            boid_count: self.columns.len(),
            trail_len: self.trails.first().map_or(0, Trail::len),
        }
    }

    /// Returns an immutable reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Frames integrated so far (skipped frames do not count).
    #[must_use]
    pub const fn frame(&self) -> Frame {
        self.frame
    }

    /// Number of boids in the population.
    #[must_use]
    pub fn boid_count(&self) -> usize {
        self.columns.len()
    }

    /// Read-only access to the column store.
    #[must_use]
    pub fn columns(&self) -> &BoidColumns {
        &self.columns
    }

    /// Mutable access to the column store (test setup, scene editing).
    #[must_use]
    pub fn columns_mut(&mut self) -> &mut BoidColumns {
        &mut self.columns
    }

    /// Produce a copy of the scalar fields for one boid.
    #[must_use]
    pub fn boid(&self, index: usize) -> Option<BoidData> {
        if index < self.columns.len() {
            Some(self.columns.snapshot(index))
        } else {
            None
        }
    }

    /// Per-boid position history, index-aligned with the columns.
    #[must_use]
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }
}

/// Rescale `vector` down to `max` when its magnitude exceeds it,
/// preserving direction.
fn cap_magnitude(vector: &mut Vec2, max: f64) {
    let mag = vector.magnitude();
    if mag > max {
        vector.scale(max / mag);
    }
}

/// Cap speed at `max` and floor it at `min`, preserving direction.
/// A zero vector has no direction and is left untouched.
fn clamp_speed(velocity: &mut Vec2, min: f64, max: f64) {
    let mag = velocity.magnitude();
    if mag > max {
        velocity.scale(max / mag);
    } else if mag < min && mag > 0.0 {
        velocity.scale(min / mag);
    }
}
