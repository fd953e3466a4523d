use std::f32::consts::TAU;

use glam::Vec3;
use meadow_engine::Rng;

use crate::tuning::MeadowTuning;

/// What the renderer should show for a flower (published as the instance param).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowerLook {
    Full,
    InRange,
    Depleted,
}

impl FlowerLook {
    pub fn param(self) -> f32 {
        match self {
            FlowerLook::Full => 0.0,
            FlowerLook::InRange => 1.0,
            FlowerLook::Depleted => 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flower {
    /// On the ground plane (y = 0).
    pub position: Vec3,
    /// Yaw, only for visual variety.
    pub heading: f32,
    /// Colour palette index.
    pub variant: u32,
    pub has_nectar: bool,
    pub nectar_amount: u32,
    /// Highlight cue from the last sweep. Not gameplay state.
    pub in_range: bool,
}

impl Flower {
    pub fn new(position: Vec3, nectar_amount: u32) -> Self {
        Self {
            position,
            heading: 0.0,
            variant: 0,
            has_nectar: true,
            nectar_amount,
            in_range: false,
        }
    }

    pub fn look(&self) -> FlowerLook {
        if !self.has_nectar {
            FlowerLook::Depleted
        } else if self.in_range {
            FlowerLook::InRange
        } else {
            FlowerLook::Full
        }
    }
}

/// The level's flower set, in creation order.
#[derive(Debug, Clone)]
pub struct Meadow {
    flowers: Vec<Flower>,
    collection_radius: f32,
}

impl Meadow {
    pub fn new(flowers: Vec<Flower>, collection_radius: f32) -> Self {
        Self { flowers, collection_radius }
    }

    /// Seeded layout. The same tuning always gives the same meadow.
    pub fn scatter(tuning: &MeadowTuning) -> Self {
        let mut rng = Rng::new(tuning.seed);
        let extent = tuning.scatter_extent;
        let flowers = (0..tuning.flower_count)
            .map(|_| {
                let x = rng.range(-extent, extent);
                let z = rng.range(-extent, extent);
                let mut flower = Flower::new(Vec3::new(x, 0.0, z), tuning.nectar_amount);
                flower.heading = rng.range(0.0, TAU);
                flower.variant = rng.next_int(tuning.colour_variants);
                flower
            })
            .collect();
        Self::new(flowers, tuning.collection_radius)
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    /// Flowers still holding nectar.
    pub fn remaining(&self) -> usize {
        self.flowers.iter().filter(|f| f.has_nectar).count()
    }

    /// Level (re)start: every flower full again, nothing highlighted.
    pub fn refill(&mut self) {
        for flower in &mut self.flowers {
            flower.has_nectar = true;
            flower.in_range = false;
        }
    }

    /// Proximity pass for one frame.
    ///
    /// Every nectar-bearing flower strictly closer than the collection radius is
    /// highlighted. When `collect` is set they are drained in creation order,
    /// stopping once `collected` plus the gathered amount reaches `target`.
    /// Returns the nectar gathered by this call.
    pub fn sweep(&mut self, bee: Vec3, collect: bool, collected: u32, target: u32) -> u32 {
        let mut gathered = 0;
        for flower in &mut self.flowers {
            flower.in_range = flower.has_nectar && bee.distance(flower.position) < self.collection_radius;
            if !flower.in_range || !collect || collected + gathered >= target {
                continue;
            }
            flower.has_nectar = false;
            flower.in_range = false;
            gathered += flower.nectar_amount;
        }
        gathered
    }

    pub fn clear_highlights(&mut self) {
        for flower in &mut self.flowers {
            flower.in_range = false;
        }
    }
}
